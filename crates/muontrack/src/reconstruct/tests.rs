use approx::assert_abs_diff_eq;
use rand::prelude::*;

use super::*;
use crate::line_fit::LineFitOutcome;
use crate::test_utils::{hits, random_hits, uniform_hits};

fn assert_normalized(r: &Reconstruction) {
    assert!(r.theta_deg.is_finite() && r.phi_deg.is_finite());
    assert!((0.0..=180.0).contains(&r.theta_deg), "theta={}", r.theta_deg);
    assert!((0.0..360.0).contains(&r.phi_deg), "phi={}", r.phi_deg);
    assert!(r.chamber0.angle_deg.is_finite() && r.chamber1.angle_deg.is_finite());
}

#[test]
fn four_plus_four_hits_reconstruct() {
    let hits = hits(&[
        (2, 35.0, 12.0),
        (13, 48.0, 20.0),
        (27, 61.0, 33.0),
        (38, 22.0, 41.0),
        (50, 70.0, 9.0),
        (62, 15.0, 27.0),
        (75, 88.0, 14.0),
        (85, 43.0, 38.0),
    ]);
    let r = Reconstructor::default().reconstruct(&hits).unwrap();
    assert_eq!(r.chamber0_hits, 4);
    assert_eq!(r.chamber1_hits, 4);
    assert_eq!(r.chamber0.n_hits(), 4);
    assert_normalized(&r);
}

#[test]
fn reference_event_angles() {
    let hits = hits(&[
        (1, 40.0, 20.0),
        (14, 55.0, 18.0),
        (26, 35.0, 25.0),
        (60, 60.0, 22.0),
        (73, 45.0, 30.0),
        (86, 50.0, 15.0),
    ]);
    let cfg = ReconstructConfig {
        line_fit: crate::LineFitConfig {
            max_time_ms: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let r = Reconstructor::new(cfg).reconstruct(&hits).unwrap();
    assert!(matches!(r.chamber0.fit, LineFitOutcome::Converged { .. }));
    assert!(matches!(r.chamber1.fit, LineFitOutcome::Converged { .. }));
    assert_abs_diff_eq!(r.chamber0.angle_deg, 63.4349, epsilon = 1e-3);
    assert_abs_diff_eq!(r.chamber1.angle_deg, 45.3891, epsilon = 1e-3);
    assert_abs_diff_eq!(r.theta_deg, 47.8810, epsilon = 1e-3);
    assert_abs_diff_eq!(r.phi_deg, 63.1224, epsilon = 1e-3);
}

#[test]
fn audit_lists_follow_readout_order() {
    let hits = hits(&[
        (70, 30.0, 10.0),
        (3, 40.0, 11.0),
        (51, 50.0, 12.0),
        (15, 60.0, 13.0),
        (88, 70.0, 14.0),
        (29, 80.0, 15.0),
    ]);
    let reco = Reconstructor::default();
    let r = reco.reconstruct(&hits).unwrap();
    assert_eq!(r.chamber0.tube_ids, vec![3, 15, 29]);
    assert_eq!(r.chamber1.tube_ids, vec![70, 51, 88]);
    assert_eq!(r.chamber0.chamber, 0);
    assert_eq!(r.chamber1.chamber, 1);

    let cal = &reco.config().calibration;
    assert_eq!(r.chamber0.radii[0], cal.radius(40.0, 11.0));
    assert_eq!(r.chamber1.radii[2], cal.radius(70.0, 14.0));
    assert!(r.chamber0.radii.iter().all(|&x| x > 0.0 && x < 1.0));
}

#[test]
fn too_few_hits_give_no_reconstruction() {
    let reco = Reconstructor::default();
    assert!(reco.reconstruct(&[]).is_none());
    assert_eq!(
        reco.reconstruct_detailed(&uniform_hits(&[1, 14, 60])),
        Err(Rejection::TooFewHits { total: 3 })
    );
    assert_eq!(
        reco.reconstruct_detailed(&uniform_hits(&[1, 14, 26, 38, 60, 73])),
        Err(Rejection::TooFewChamberHits {
            chamber0: 4,
            chamber1: 2
        })
    );
    assert!(reco
        .reconstruct(&uniform_hits(&[60, 73, 86, 90, 2]))
        .is_none());
}

#[test]
fn mirrored_chambers_give_diagonal_azimuth() {
    let layout = [(1, 30.0, 10.0), (14, 45.0, 20.0), (26, 60.0, 30.0), (38, 75.0, 40.0)];
    let mut triples = layout.to_vec();
    triples.extend(layout.iter().map(|&(t, tof, tot)| (t + 48, tof, tot)));
    let cfg = ReconstructConfig {
        line_fit: crate::LineFitConfig {
            max_time_ms: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let r = Reconstructor::new(cfg).reconstruct(&hits(&triples)).unwrap();
    assert_abs_diff_eq!(r.chamber0.angle_deg, r.chamber1.angle_deg, epsilon = 1e-4);
    assert_abs_diff_eq!(r.phi_deg, 45.0, epsilon = 1e-4);
}

#[test]
fn vertical_chamber_line_is_ninety_degrees() {
    // Tubes 0 and 24 both sit at x = 0.5; tube 0 fires twice.
    let hits = hits(&[
        (0, 40.0, 20.0),
        (24, 40.0, 20.0),
        (0, 55.0, 30.0),
        (49, 40.0, 20.0),
        (62, 50.0, 20.0),
        (74, 60.0, 20.0),
    ]);
    let r = Reconstructor::default().reconstruct(&hits).unwrap();
    assert_eq!(r.chamber0_hits, 3);
    assert_eq!(r.chamber0.fit, LineFitOutcome::Vertical);
    assert_eq!(r.chamber0.angle_deg, 90.0);
    assert!(r.chamber0.line().is_none());
    assert_abs_diff_eq!(r.phi_deg, 90.0, epsilon = 1e-9);
    assert_normalized(&r);
}

#[test]
fn validated_config_keeps_three_hit_chamber_floor() {
    let cfg = ReconstructConfig {
        min_chamber_hits: 2,
        ..Default::default()
    };
    assert!(Reconstructor::try_new(cfg).is_err());

    // Two chamber-0 hits stay rejected under the default thresholds.
    let hits = hits(&[
        (0, 40.0, 20.0),
        (24, 40.0, 20.0),
        (49, 40.0, 20.0),
        (62, 50.0, 20.0),
        (74, 60.0, 20.0),
    ]);
    assert_eq!(
        Reconstructor::default().reconstruct_detailed(&hits),
        Err(Rejection::TooFewChamberHits {
            chamber0: 2,
            chamber1: 3
        })
    );
}

#[test]
fn non_finite_timing_is_rejected_not_raised() {
    let mut triples = vec![(1, 40.0, 20.0), (14, 55.0, 18.0), (26, f64::NAN, 25.0)];
    triples.extend([(60, 60.0, 22.0), (73, 45.0, 30.0), (86, 50.0, 15.0)]);
    let reco = Reconstructor::default();
    assert_eq!(
        reco.reconstruct_detailed(&hits(&triples)),
        Err(Rejection::NonFinite {
            stage: PipelineStage::Calibration
        })
    );
    assert!(reco.reconstruct(&hits(&triples)).is_none());
}

#[test]
fn random_events_respect_invariants() {
    let reco = Reconstructor::default();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..300 {
        let n0 = rng.gen_range(0..9);
        let n1 = rng.gen_range(0..9);
        let hits = random_hits(&mut rng, n0, n1);
        match reco.reconstruct(&hits) {
            Some(r) => {
                assert!(n0 >= 3 && n1 >= 3 && n0 + n1 >= 4);
                assert_eq!((r.chamber0_hits, r.chamber1_hits), (n0, n1));
                assert_normalized(&r);
            }
            None => assert!(n0 < 3 || n1 < 3),
        }
    }
}

#[test]
fn concurrent_reconstruction_matches_sequential() {
    let cfg = ReconstructConfig {
        line_fit: crate::LineFitConfig {
            max_time_ms: None,
            ..Default::default()
        },
        ..Default::default()
    };
    let reco = Reconstructor::new(cfg);
    let mut rng = StdRng::seed_from_u64(99);
    let events: Vec<Vec<Hit>> = (0..64).map(|_| random_hits(&mut rng, 4, 5)).collect();
    let expected: Vec<_> = events.iter().map(|h| reco.reconstruct(h)).collect();

    let (events, reco) = (&events, &reco);
    std::thread::scope(|s| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || events.iter().map(|h| reco.reconstruct(h)).collect::<Vec<_>>())
            })
            .collect();
        for w in workers {
            assert_eq!(w.join().unwrap(), expected);
        }
    });
}

#[test]
fn event_carries_reconstruction_through_json() {
    let mut event = Event::new(42);
    for (t, tof, tot) in [(2, 35.0, 12.0), (13, 48.0, 20.0), (27, 61.0, 33.0)] {
        event.add_hit(t, tof, tot).unwrap();
    }
    for (t, tof, tot) in [(50, 70.0, 9.0), (62, 15.0, 27.0), (75, 88.0, 14.0)] {
        event.add_hit(t, tof, tot).unwrap();
    }
    let reco = Reconstructor::default();
    event.reconstruction = reco.reconstruct_event(&event);
    assert!(event.reconstruction.is_some());

    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back.hits, event.hits);
    let (orig, read) = (
        event.reconstruction.as_ref().unwrap(),
        back.reconstruction.as_ref().unwrap(),
    );
    assert_eq!(read.chamber0.tube_ids, orig.chamber0.tube_ids);
    assert_eq!(read.chamber1.fit.is_fallback(), orig.chamber1.fit.is_fallback());
    assert_abs_diff_eq!(read.theta_deg, orig.theta_deg, epsilon = 1e-12);
    assert_abs_diff_eq!(read.phi_deg, orig.phi_deg, epsilon = 1e-12);

    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["reconstruction"]["chamber0"]["tube_ids"][1], 13);
    assert!(v["reconstruction"]["chamber1"]["fit"]["status"].is_string());
}

#[test]
fn free_function_matches_reconstructor() {
    let hits = uniform_hits(&[1, 14, 26, 60, 73, 86]);
    let cfg = ReconstructConfig::default();
    assert_eq!(
        reconstruct_hits(&hits, &cfg),
        Reconstructor::new(cfg.clone()).reconstruct(&hits)
    );
}

#[test]
fn zero_iteration_budget_marks_fallback() {
    let hits = uniform_hits(&[1, 14, 26, 60, 73, 86]);
    let cfg = ReconstructConfig {
        line_fit: crate::LineFitConfig {
            max_iters: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    let r = Reconstructor::try_new(cfg).unwrap().reconstruct(&hits).unwrap();
    assert!(r.used_fallback());
    assert_eq!(
        r.chamber0.fit.fallback_reason(),
        Some(crate::FallbackReason::IterationBudget)
    );

    let converged = Reconstructor::default().reconstruct(&hits).unwrap();
    assert!(!converged.used_fallback());
}

#[test]
fn accessors_expose_chambers_and_radians() {
    let hits = uniform_hits(&[1, 14, 26, 60, 73, 86]);
    let r = Reconstructor::default().reconstruct(&hits).unwrap();
    assert_eq!(r.chamber(0), Some(&r.chamber0));
    assert_eq!(r.chamber(1), Some(&r.chamber1));
    assert!(r.chamber(2).is_none());
    assert_abs_diff_eq!(r.theta(), r.theta_deg.to_radians(), epsilon = 1e-15);
    assert_abs_diff_eq!(r.phi(), r.phi_deg.to_radians(), epsilon = 1e-15);
    assert!((0.0..std::f64::consts::TAU).contains(&r.phi()));
}

#[test]
fn line_samples_follow_fit() {
    let hits = uniform_hits(&[1, 14, 26, 60, 73, 86]);
    let r = Reconstructor::default().reconstruct(&hits).unwrap();
    let (m, b) = r.chamber0.line().unwrap();
    let pts = r.chamber0.line_samples(-1.0, 12.0, 14);
    assert_eq!(pts.len(), 14);
    assert_abs_diff_eq!(pts[0][0], -1.0);
    assert_abs_diff_eq!(pts[13][0], 12.0, epsilon = 1e-12);
    assert_abs_diff_eq!(pts[5][1], m * pts[5][0] + b, epsilon = 1e-12);
}
