//! Shared builders for hit-based unit tests.

use rand::prelude::*;

use crate::event::Hit;

/// Hits for `(tube, tof_ns, tot_ns)` triples.
pub(crate) fn hits(triples: &[(u32, f64, f64)]) -> Vec<Hit> {
    triples
        .iter()
        .map(|&(tube, tof, tot)| Hit::new(tube, tof, tot).expect("valid tube"))
        .collect()
}

/// Hits with identical mid-range timing on every tube.
pub(crate) fn uniform_hits(tubes: &[u32]) -> Vec<Hit> {
    tubes
        .iter()
        .map(|&t| Hit::new(t, 50.0, 25.0).expect("valid tube"))
        .collect()
}

/// Random hits: `n0` distinct tubes in chamber 0, `n1` in chamber 1, with
/// timing drawn from the simulated readout ranges (tof 10..100 ns, tot 5..50 ns).
pub(crate) fn random_hits(rng: &mut StdRng, n0: usize, n1: usize) -> Vec<Hit> {
    let mut tubes: Vec<u32> = (0..48).choose_multiple(rng, n0);
    tubes.extend((48..96).choose_multiple(rng, n1));
    tubes.shuffle(rng);
    tubes
        .into_iter()
        .map(|t| {
            let tof = rng.gen_range(10.0..100.0);
            let tot = rng.gen_range(5.0..50.0);
            Hit::new(t, tof, tot).expect("valid tube")
        })
        .collect()
}
