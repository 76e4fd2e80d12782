//! Per-event track reconstruction.
//!
//! Stages:
//!
//! 1. **Gate** – total and per-chamber hit counts.
//! 2. **Calibrate** – drift radius per hit.
//! 3. **Fit** – tangent line per chamber.
//! 4. **Combine** – chamber angles → spherical `(θ, φ)`.
//!
//! Data conditions (too few hits, non-finite intermediates) end the pipeline
//! with a [`Rejection`]; nothing in here panics on event data.

mod config;
mod result;

use crate::event::{chamber_hit_counts, Event, Hit};
use crate::line_fit::{fit_line_through_circles, DriftCircle};
use crate::spherical::combine_projection_angles;

pub use config::{ReconstructConfig, MIN_CHAMBER_HITS, MIN_TOTAL_HITS};
pub use result::{ChamberFit, Reconstruction};

/// Pipeline stage at which a non-finite value appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Calibration,
    LineFit,
    Combine,
}

/// Why an event produced no reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Fewer than `min_total_hits` hits.
    TooFewHits { total: usize },
    /// A chamber has fewer than `min_chamber_hits` hits.
    TooFewChamberHits { chamber0: usize, chamber1: usize },
    /// A NaN or infinity appeared.
    NonFinite { stage: PipelineStage },
    /// The line fitter refused its input; only reachable with an invalid config.
    InvalidInput(crate::InputError),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewHits { total } => write!(f, "too few hits: {}", total),
            Self::TooFewChamberHits { chamber0, chamber1 } => {
                write!(f, "too few chamber hits: C0={}, C1={}", chamber0, chamber1)
            }
            Self::NonFinite { stage } => write!(f, "non-finite value at {:?}", stage),
            Self::InvalidInput(e) => write!(f, "invalid fit input: {}", e),
        }
    }
}

/// Stateless track reconstructor.
///
/// Holds only read-only configuration, so one instance can serve many
/// threads by shared reference.
///
/// # Examples
///
/// ```
/// use muontrack::{Hit, Reconstructor};
///
/// let hits: Vec<Hit> = [(1, 40.0, 20.0), (14, 55.0, 18.0), (26, 35.0, 25.0),
///                       (60, 60.0, 22.0), (73, 45.0, 30.0), (86, 50.0, 15.0)]
///     .into_iter()
///     .map(|(tube, tof, tot)| Hit::new(tube, tof, tot).unwrap())
///     .collect();
///
/// let reco = Reconstructor::default().reconstruct(&hits).unwrap();
/// assert_eq!(reco.chamber0_hits, 3);
/// assert!((0.0..=180.0).contains(&reco.theta_deg));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: ReconstructConfig,
}

impl Reconstructor {
    /// Create without validating the configuration.
    pub fn new(config: ReconstructConfig) -> Self {
        Self { config }
    }

    /// Create after [`ReconstructConfig::validate`].
    pub fn try_new(config: ReconstructConfig) -> Result<Self, crate::InputError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconstructConfig {
        &self.config
    }

    /// Reconstruct a track, or `None` when the hits do not support one.
    pub fn reconstruct(&self, hits: &[Hit]) -> Option<Reconstruction> {
        match self.reconstruct_detailed(hits) {
            Ok(r) => Some(r),
            Err(reason) => {
                tracing::debug!(%reason, n_hits = hits.len(), "no reconstruction");
                None
            }
        }
    }

    /// Reconstruct the hits of an event.
    pub fn reconstruct_event(&self, event: &Event) -> Option<Reconstruction> {
        match self.reconstruct_detailed(&event.hits) {
            Ok(r) => Some(r),
            Err(reason) => {
                tracing::debug!(event_id = event.event_id, %reason, "no reconstruction");
                None
            }
        }
    }

    /// Like [`reconstruct`](Self::reconstruct) but reports why an event was rejected.
    pub fn reconstruct_detailed(&self, hits: &[Hit]) -> Result<Reconstruction, Rejection> {
        let cfg = &self.config;
        if hits.len() < cfg.min_total_hits {
            return Err(Rejection::TooFewHits { total: hits.len() });
        }
        let [n0, n1] = chamber_hit_counts(hits);
        if n0 < cfg.min_chamber_hits || n1 < cfg.min_chamber_hits {
            return Err(Rejection::TooFewChamberHits {
                chamber0: n0,
                chamber1: n1,
            });
        }

        let chamber0 = self.fit_chamber(0, hits)?;
        let chamber1 = self.fit_chamber(1, hits)?;

        let angles = combine_projection_angles(
            chamber0.fit.angle(),
            chamber1.fit.angle(),
            &cfg.spherical,
        );
        if !angles.is_finite() {
            return Err(Rejection::NonFinite {
                stage: PipelineStage::Combine,
            });
        }

        let mut phi_deg = angles.phi_deg();
        if phi_deg >= 360.0 {
            phi_deg -= 360.0;
        }

        Ok(Reconstruction {
            chamber0_hits: n0,
            chamber1_hits: n1,
            chamber0,
            chamber1,
            theta_deg: angles.theta_deg().clamp(0.0, 180.0),
            phi_deg,
        })
    }

    fn fit_chamber(&self, chamber: u8, hits: &[Hit]) -> Result<ChamberFit, Rejection> {
        let cal = &self.config.calibration;
        let chamber_hits: Vec<&Hit> = hits.iter().filter(|h| h.chamber() == chamber).collect();

        let tube_ids: Vec<u32> = chamber_hits.iter().map(|h| h.tube_number()).collect();
        let radii: Vec<f64> = chamber_hits
            .iter()
            .map(|h| cal.radius(h.time_of_flight(), h.time_over_threshold()))
            .collect();
        if !radii.iter().all(|r| r.is_finite()) {
            return Err(Rejection::NonFinite {
                stage: PipelineStage::Calibration,
            });
        }

        let circles: Vec<DriftCircle> = chamber_hits
            .iter()
            .zip(&radii)
            .map(|(h, &r)| DriftCircle::new(h.position(), r))
            .collect();
        let fit = fit_line_through_circles(&circles, &self.config.line_fit)
            .map_err(Rejection::InvalidInput)?;

        let angle = fit.angle();
        if !angle.is_finite() {
            return Err(Rejection::NonFinite {
                stage: PipelineStage::LineFit,
            });
        }
        if let Some(reason) = fit.fallback_reason() {
            tracing::debug!(chamber, ?reason, "chamber line uses OLS fallback");
        }

        Ok(ChamberFit {
            chamber,
            tube_ids,
            radii,
            fit,
            angle_deg: angle.to_degrees(),
        })
    }
}

/// One-shot reconstruction with an explicit configuration.
pub fn reconstruct_hits(hits: &[Hit], config: &ReconstructConfig) -> Option<Reconstruction> {
    Reconstructor::new(config.clone()).reconstruct(hits)
}

#[cfg(test)]
mod tests;
