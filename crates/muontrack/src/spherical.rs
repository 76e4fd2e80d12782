//! Combining the two chamber projection angles into a 3D direction.
//!
//! Chamber 0 and chamber 1 are mounted orthogonally, so their fitted line
//! angles `θ1` and `θ2` are the xz and yz projections of one track:
//!
//!   tan²θ = 1/tan²θ1 + 1/tan²θ2
//!   φ     = atan2(tan θ1, tan θ2)

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

/// How a near-zero projection angle is clamped before taking reciprocals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampSign {
    /// Clamp to `+ε` regardless of the input sign.
    #[default]
    Positive,
    /// Clamp to `±ε`, keeping the sign of the input.
    PreserveSign,
}

/// Configuration for [`combine_projection_angles`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SphericalConfig {
    /// Projection angles with `|θ| < min_abs_angle` are clamped (radians).
    pub min_abs_angle: f64,
    pub clamp_sign: ClampSign,
}

impl Default for SphericalConfig {
    fn default() -> Self {
        Self {
            min_abs_angle: 1e-10,
            clamp_sign: ClampSign::Positive,
        }
    }
}

/// Polar/azimuthal track direction in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalAngles {
    /// Polar angle in `[0, π]`.
    pub theta: f64,
    /// Azimuth in `[0, 2π)`.
    pub phi: f64,
}

impl SphericalAngles {
    pub fn theta_deg(&self) -> f64 {
        self.theta.to_degrees()
    }

    pub fn phi_deg(&self) -> f64 {
        self.phi.to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.theta.is_finite() && self.phi.is_finite()
    }
}

fn clamp_small(angle: f64, config: &SphericalConfig) -> f64 {
    // NaN fails the comparison and passes through unchanged.
    if angle.abs() < config.min_abs_angle {
        match config.clamp_sign {
            ClampSign::Positive => config.min_abs_angle,
            ClampSign::PreserveSign => config.min_abs_angle.copysign(angle),
        }
    } else {
        angle
    }
}

/// Merge the chamber 0 (`theta1`) and chamber 1 (`theta2`) line angles.
///
/// Non-finite inputs propagate to non-finite outputs; callers check
/// [`SphericalAngles::is_finite`].
pub fn combine_projection_angles(
    theta1: f64,
    theta2: f64,
    config: &SphericalConfig,
) -> SphericalAngles {
    let t1 = clamp_small(theta1, config).tan();
    let t2 = clamp_small(theta2, config).tan();

    let tan_theta_sq = 1.0 / (t1 * t1) + 1.0 / (t2 * t2);
    let mut theta = tan_theta_sq.sqrt().atan();
    if theta < 0.0 {
        theta += PI;
    }

    let mut phi = t1.atan2(t2);
    if phi < 0.0 {
        phi += TAU;
    }
    if phi >= TAU {
        phi -= TAU;
    }

    SphericalAngles { theta, phi }
}
