use serde::{Deserialize, Serialize};

use crate::line_fit::LineFitOutcome;

/// Fit result for one chamber, with the inputs needed to redraw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamberFit {
    /// Chamber index, 0 or 1.
    pub chamber: u8,
    /// Tube ids of the chamber hits, in readout order.
    pub tube_ids: Vec<u32>,
    /// Calibrated drift radius per entry of `tube_ids`.
    pub radii: Vec<f64>,
    /// Fitted line and how it was obtained.
    pub fit: LineFitOutcome,
    /// Line angle to the chamber x axis, degrees.
    pub angle_deg: f64,
}

impl ChamberFit {
    /// `(m, b)` of the fitted line; `None` when vertical.
    pub fn line(&self) -> Option<(f64, f64)> {
        self.fit.slope_intercept()
    }

    pub fn n_hits(&self) -> usize {
        self.tube_ids.len()
    }

    /// `n` evenly spaced points on the fitted line for `x` in `[x_min, x_max]`.
    ///
    /// A vertical line has no `x` parametrization; it is sampled along `y` in
    /// the same interval at the shared tube x.
    pub fn line_samples(&self, x_min: f64, x_max: f64, n: usize) -> Vec<[f64; 2]> {
        let step = if n > 1 {
            (x_max - x_min) / (n - 1) as f64
        } else {
            0.0
        };
        let ts = (0..n).map(move |i| x_min + step * i as f64);
        match self.line() {
            Some((m, b)) => ts.map(|x| [x, m * x + b]).collect(),
            None => {
                let x0 = self
                    .tube_ids
                    .first()
                    .map(|&t| crate::geometry::grid_position(t)[0])
                    .unwrap_or(0.0);
                ts.map(|y| [x0, y]).collect()
            }
        }
    }
}

/// Reconstructed track for one event. Built once, never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconstruction {
    pub chamber0_hits: usize,
    pub chamber1_hits: usize,
    pub chamber0: ChamberFit,
    pub chamber1: ChamberFit,
    /// Polar angle, degrees in `[0, 180]`.
    pub theta_deg: f64,
    /// Azimuth, degrees in `[0, 360)`.
    pub phi_deg: f64,
}

impl Reconstruction {
    pub fn chamber(&self, chamber: u8) -> Option<&ChamberFit> {
        match chamber {
            0 => Some(&self.chamber0),
            1 => Some(&self.chamber1),
            _ => None,
        }
    }

    pub fn theta(&self) -> f64 {
        self.theta_deg.to_radians()
    }

    pub fn phi(&self) -> f64 {
        self.phi_deg.to_radians()
    }

    /// True when either chamber used the OLS fallback line.
    pub fn used_fallback(&self) -> bool {
        self.chamber0.fit.is_fallback() || self.chamber1.fit.is_fallback()
    }
}
