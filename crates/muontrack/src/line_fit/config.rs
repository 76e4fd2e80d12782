use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Configuration for the per-chamber tangent-line fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFitConfig {
    /// Maximum quasi-Newton iterations before falling back to the OLS line.
    pub max_iters: usize,
    /// Optional wall-clock budget for one fit, in milliseconds.
    ///
    /// `None` bounds the fit by `max_iters` only.
    pub max_time_ms: Option<u64>,
    /// Stop when the gradient norm drops below this value.
    pub grad_tol: f64,
    /// Stop when an accepted step lowers the cost by less than
    /// `cost_tol * (1 + cost)`.
    pub cost_tol: f64,
    /// Relative step for central-difference gradients.
    pub fd_step: f64,
    /// Maximum step halvings in the backtracking line search.
    pub max_backtracks: usize,
}

impl Default for LineFitConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            max_time_ms: Some(50),
            grad_tol: 1e-8,
            cost_tol: 1e-12,
            fd_step: 1e-7,
            max_backtracks: 50,
        }
    }
}

impl LineFitConfig {
    pub fn validate(&self) -> Result<(), InputError> {
        let positive = [
            ("line_fit.grad_tol", self.grad_tol),
            ("line_fit.cost_tol", self.cost_tol),
            ("line_fit.fd_step", self.fd_step),
        ];
        for (field, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(InputError::InvalidConfig {
                    field,
                    reason: format!("must be finite and positive, got {}", v),
                });
            }
        }
        if self.max_backtracks == 0 {
            return Err(InputError::InvalidConfig {
                field: "line_fit.max_backtracks",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
