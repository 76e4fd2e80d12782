//! Drift-radius calibration from hit timing.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Logistic calibration `r = sigmoid(a + b·tof + c·tot)`.
///
/// The default coefficients are placeholders until chamber data is available;
/// load real values through [`crate::ReconstructConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftCalibration {
    /// Constant term.
    pub a: f64,
    /// Time-of-flight coefficient (per ns).
    pub b: f64,
    /// Time-over-threshold coefficient (per ns).
    pub c: f64,
}

impl Default for DriftCalibration {
    fn default() -> Self {
        Self {
            a: -2.0,
            b: 2e-2,
            c: 2e-2,
        }
    }
}

impl DriftCalibration {
    /// Reject coefficients that cannot produce finite radii.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, v) in [
            ("calibration.a", self.a),
            ("calibration.b", self.b),
            ("calibration.c", self.c),
        ] {
            if !v.is_finite() {
                return Err(InputError::InvalidConfig {
                    field,
                    reason: format!("coefficient must be finite, got {}", v),
                });
            }
        }
        Ok(())
    }

    /// Calibrated drift radius in `(0, 1)` for non-NaN inputs.
    ///
    /// Increasing in `tof` and `tot` while `b > 0` and `c > 0`. A NaN timing
    /// value yields NaN.
    pub fn radius(&self, tof_ns: f64, tot_ns: f64) -> f64 {
        let z = self.a + self.b * tof_ns + self.c * tot_ns;
        if z.is_nan() && !tof_ns.is_nan() && !tot_ns.is_nan() {
            // Saturated terms of opposite sign (inf - inf): no side wins.
            return 0.5;
        }
        sigmoid(z)
    }
}

/// Free-function form of [`DriftCalibration::radius`].
pub fn calibrated_radius(tof_ns: f64, tot_ns: f64, calibration: &DriftCalibration) -> f64 {
    calibration.radius(tof_ns, tot_ns)
}

/// Logistic function kept strictly inside the open unit interval.
fn sigmoid(z: f64) -> f64 {
    let s = if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    };
    s.clamp(f64::EPSILON, 1.0 - f64::EPSILON)
}
