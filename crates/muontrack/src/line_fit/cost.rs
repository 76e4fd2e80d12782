use nalgebra::Vector2;

use super::DriftCircle;

/// Tangency cost `Σ (r_i − dist_i)²` of the line `y = m x + b`.
///
/// `dist_i` is the perpendicular distance from circle center `i` to the line.
pub fn tangency_cost(m: f64, b: f64, circles: &[DriftCircle]) -> f64 {
    let norm = (1.0 + m * m).sqrt();
    circles
        .iter()
        .map(|c| {
            let dist = (c.y - m * c.x - b).abs() / norm;
            let v = c.r - dist;
            v * v
        })
        .sum()
}

/// Central-difference gradient with a step scaled to each coordinate.
pub(super) fn numeric_gradient(
    f: &impl Fn(&Vector2<f64>) -> f64,
    p: &Vector2<f64>,
    rel_step: f64,
) -> Vector2<f64> {
    let mut g = Vector2::zeros();
    for i in 0..2 {
        let h = rel_step * p[i].abs().max(1.0);
        let mut fwd = *p;
        let mut bwd = *p;
        fwd[i] += h;
        bwd[i] -= h;
        g[i] = (f(&fwd) - f(&bwd)) / (2.0 * h);
    }
    g
}
