//! Per-chamber stereo line fit.
//!
//! Finds the line `y = m x + b` that is tangent to as many drift circles as
//! possible by minimizing `Σ (r_i − dist_i)²`, where `dist_i` is the
//! perpendicular distance from circle center `i` to the line.
//!
//! The ordinary least-squares line through the circle centers seeds a BFGS
//! minimizer. When the minimizer cannot deliver a trustworthy answer the seed
//! is returned instead, tagged as [`LineFitOutcome::Fallback`].

mod config;
mod cost;
mod ols;
mod optimizer;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geometry;

pub use config::LineFitConfig;
pub use cost::tangency_cost;

use ols::{ols_line, OlsLine};
use optimizer::{bfgs_minimize, BfgsStop};

/// Minimum number of circles for a line fit.
pub const MIN_CIRCLES: usize = 2;

/// Tube center with its calibrated drift radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftCircle {
    /// Center x in grid units.
    pub x: f64,
    /// Center y in grid units.
    pub y: f64,
    /// Drift radius in grid units.
    pub r: f64,
}

impl DriftCircle {
    /// Circle of radius `r` around `center = [x, y]`.
    pub fn new(center: [f64; 2], r: f64) -> Self {
        Self {
            x: center[0],
            y: center[1],
            r,
        }
    }

    /// Center as `[x, y]`.
    pub fn center(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Why the OLS seed was returned instead of a minimized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Two circles leave the tangency problem underdetermined; not minimized.
    Underdetermined,
    /// `max_iters` reached without convergence.
    IterationBudget,
    /// `max_time_ms` exceeded.
    TimeBudget,
    /// Cost or gradient became NaN/infinite.
    NonFinite,
    /// No step along the search direction lowered the cost.
    LineSearch,
}

/// Result of one chamber line fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LineFitOutcome {
    /// Minimizer converged.
    Converged {
        m: f64,
        b: f64,
        iterations: usize,
        /// Tangency cost at `(m, b)`.
        cost: f64,
    },
    /// OLS seed returned unchanged.
    Fallback {
        m: f64,
        b: f64,
        reason: FallbackReason,
    },
    /// All circle centers share one x; the line is vertical.
    Vertical,
}

impl LineFitOutcome {
    /// `(m, b)`, or `None` for a vertical line.
    pub fn slope_intercept(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Converged { m, b, .. } | Self::Fallback { m, b, .. } => Some((m, b)),
            Self::Vertical => None,
        }
    }

    /// Line angle to the x axis in radians, `atan(m)`; exactly `π/2` when vertical.
    pub fn angle(&self) -> f64 {
        match self.slope_intercept() {
            Some((m, _)) => m.atan(),
            None => std::f64::consts::FRAC_PI_2,
        }
    }

    /// True when the OLS seed was returned.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Why the seed was returned; `None` unless [`Self::Fallback`].
    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match *self {
            Self::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Fit a line tangent to `circles`.
///
/// Fails only on contract violations (fewer than two circles). Optimizer
/// trouble never fails: it yields [`LineFitOutcome::Fallback`].
pub fn fit_line_through_circles(
    circles: &[DriftCircle],
    config: &LineFitConfig,
) -> Result<LineFitOutcome, InputError> {
    if circles.len() < MIN_CIRCLES {
        return Err(InputError::TooFewCircles {
            needed: MIN_CIRCLES,
            got: circles.len(),
        });
    }

    let centers: Vec<[f64; 2]> = circles.iter().map(DriftCircle::center).collect();
    let (m0, b0) = match ols_line(&centers) {
        OlsLine::Vertical => return Ok(LineFitOutcome::Vertical),
        OlsLine::Sloped { m, b } => (m, b),
    };

    if circles.len() == MIN_CIRCLES {
        return Ok(LineFitOutcome::Fallback {
            m: m0,
            b: b0,
            reason: FallbackReason::Underdetermined,
        });
    }

    let objective = |p: &Vector2<f64>| tangency_cost(p[0], p[1], circles);
    let result = bfgs_minimize(objective, Vector2::new(m0, b0), config);

    let reason = match result.stop {
        BfgsStop::Converged if result.x.iter().all(|v| v.is_finite()) => {
            return Ok(LineFitOutcome::Converged {
                m: result.x[0],
                b: result.x[1],
                iterations: result.iterations,
                cost: result.f,
            });
        }
        BfgsStop::Converged | BfgsStop::NonFinite => FallbackReason::NonFinite,
        BfgsStop::IterationBudget => FallbackReason::IterationBudget,
        BfgsStop::TimeBudget => FallbackReason::TimeBudget,
        BfgsStop::LineSearch => FallbackReason::LineSearch,
    };

    tracing::debug!(
        ?reason,
        iterations = result.iterations,
        n_circles = circles.len(),
        "line fit fell back to OLS seed"
    );

    Ok(LineFitOutcome::Fallback {
        m: m0,
        b: b0,
        reason,
    })
}

/// Fit a line through the drift circles of the given tubes.
///
/// `tubes` and `radii` are parallel lists; tube ids are mapped through the
/// detector geometry.
pub fn fit_chamber_line(
    tubes: &[u32],
    radii: &[f64],
    config: &LineFitConfig,
) -> Result<LineFitOutcome, InputError> {
    if tubes.len() != radii.len() {
        return Err(InputError::LengthMismatch {
            tubes: tubes.len(),
            radii: radii.len(),
        });
    }
    let centers = geometry::tube_positions(tubes)?;
    let circles: Vec<DriftCircle> = centers
        .into_iter()
        .zip(radii)
        .map(|(c, &r)| DriftCircle::new(c, r))
        .collect();
    fit_line_through_circles(&circles, config)
}
