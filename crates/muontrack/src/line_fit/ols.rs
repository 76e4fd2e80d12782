/// Spread below which all centers are treated as sharing one x.
const VERTICAL_EPS: f64 = 1e-12;

/// Ordinary least-squares line through circle centers, radii ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum OlsLine {
    Sloped { m: f64, b: f64 },
    /// All centers share one x; the line is `x = const`.
    Vertical,
}

/// Fit `y = m x + b` on centered coordinates.
///
/// Caller guarantees at least two points.
pub(super) fn ols_line(points: &[[f64; 2]]) -> OlsLine {
    let x0 = points[0][0];
    if points.iter().all(|p| (p[0] - x0).abs() <= VERTICAL_EPS) {
        return OlsLine::Vertical;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for p in points {
        let dx = p[0] - mean_x;
        sxx += dx * dx;
        sxy += dx * (p[1] - mean_y);
    }
    if sxx <= VERTICAL_EPS * VERTICAL_EPS {
        return OlsLine::Vertical;
    }

    let m = sxy / sxx;
    OlsLine::Sloped {
        m,
        b: mean_y - m * mean_x,
    }
}
