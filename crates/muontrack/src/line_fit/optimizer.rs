use std::time::{Duration, Instant};

use nalgebra::{Matrix2, Vector2};

use super::config::LineFitConfig;
use super::cost::numeric_gradient;

/// Armijo sufficient-decrease constant.
const ARMIJO_C1: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum BfgsStop {
    Converged,
    IterationBudget,
    TimeBudget,
    NonFinite,
    LineSearch,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct BfgsReport {
    pub x: Vector2<f64>,
    pub f: f64,
    pub iterations: usize,
    pub stop: BfgsStop,
}

/// BFGS on a 2-parameter objective with finite-difference gradients and a
/// backtracking line search.
///
/// Every exit other than [`BfgsStop::Converged`] means `x` must not be trusted.
pub(super) fn bfgs_minimize(
    f: impl Fn(&Vector2<f64>) -> f64,
    x0: Vector2<f64>,
    config: &LineFitConfig,
) -> BfgsReport {
    let start = Instant::now();
    let budget = config.max_time_ms.map(Duration::from_millis);

    let mut x = x0;
    let mut fx = f(&x);
    if !fx.is_finite() {
        return report(x, fx, 0, BfgsStop::NonFinite);
    }
    let mut g = numeric_gradient(&f, &x, config.fd_step);
    if !g.iter().all(|v| v.is_finite()) {
        return report(x, fx, 0, BfgsStop::NonFinite);
    }

    let mut h_inv = Matrix2::<f64>::identity();

    for iter in 0..config.max_iters {
        if g.norm() <= config.grad_tol {
            return report(x, fx, iter, BfgsStop::Converged);
        }
        if budget.is_some_and(|b| start.elapsed() >= b) {
            return report(x, fx, iter, BfgsStop::TimeBudget);
        }

        let mut dir = -(h_inv * g);
        let mut slope = g.dot(&dir);
        if !(slope < 0.0) {
            // Curvature estimate lost positive definiteness; restart from steepest descent.
            h_inv = Matrix2::identity();
            dir = -g;
            slope = g.dot(&dir);
        }

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_backtracks {
            let x_try = x + dir * alpha;
            let f_try = f(&x_try);
            if f_try.is_finite() && f_try <= fx + ARMIJO_C1 * alpha * slope {
                accepted = Some((x_try, f_try));
                break;
            }
            alpha *= 0.5;
        }
        let Some((x_new, f_new)) = accepted else {
            return report(x, fx, iter, BfgsStop::LineSearch);
        };

        let g_new = numeric_gradient(&f, &x_new, config.fd_step);
        if !g_new.iter().all(|v| v.is_finite()) {
            return report(x_new, f_new, iter + 1, BfgsStop::NonFinite);
        }

        let s = x_new - x;
        let y = g_new - g;
        let decrease = fx - f_new;
        x = x_new;
        fx = f_new;
        g = g_new;

        tracing::trace!(iter, cost = fx, m = x[0], b = x[1], "bfgs step");

        if decrease <= config.cost_tol * (1.0 + fx.abs()) {
            return report(x, fx, iter + 1, BfgsStop::Converged);
        }

        let sy = s.dot(&y);
        if sy > 1e-16 {
            let rho = 1.0 / sy;
            let i = Matrix2::<f64>::identity();
            let left = i - rho * s * y.transpose();
            let right = i - rho * y * s.transpose();
            h_inv = left * h_inv * right + rho * s * s.transpose();
        }
    }

    report(x, fx, config.max_iters, BfgsStop::IterationBudget)
}

fn report(x: Vector2<f64>, f: f64, iterations: usize, stop: BfgsStop) -> BfgsReport {
    BfgsReport {
        x,
        f,
        iterations,
        stop,
    }
}
