//! Least-squares trend line for the head-count vs. output scatter

/// `y = slope * x + intercept`, plus the Pearson correlation of the points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// `None` when either variable is constant
    pub r: Option<f64>,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Human-readable equation, e.g. `y = 4.20x + 10.00`
    pub fn equation(&self) -> String {
        let sign = if self.intercept < 0.0 { '-' } else { '+' };
        format!("y = {:.2}x {} {:.2}", self.slope, sign, self.intercept.abs())
    }
}

/// Ordinary least squares over `(x, y)` points.
///
/// Needs at least two distinct x values; returns `None` otherwise.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r = (syy > 0.0).then(|| sxy / (sxx * syy).sqrt());
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r,
    })
}
