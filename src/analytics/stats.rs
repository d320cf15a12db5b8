/// Arithmetic mean. `None` for zero elements, never NaN.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Sample standard deviation (n - 1 denominator). `None` below two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values.iter().copied())?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Round to two decimals for display.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the fit was computed from.
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line through `points`. `None` with fewer than two points or when
/// every x is identical.
pub fn fit_linear(points: &[[f64; 2]]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let mx = mean(points.iter().map(|p| p[0]))?;
    let my = mean(points.iter().map(|p| p[1]))?;
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
        let dx = p[0] - mx;
        (sxy + dx * (p[1] - my), sxx + dx * dx)
    });
    if sxx.abs() < f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    Some(LinearFit {
        slope,
        intercept: my - slope * mx,
        n: points.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_nothing_is_undefined() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_std_dev_needs_two_values() {
        assert_eq!(std_dev(&[3.0]), None);
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(4.236), 4.24);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        let pts = [[1.0, 3.0], [2.0, 5.0], [3.0, 7.0]];
        let fit = fit_linear(&pts).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
        assert_eq!(fit.n, 3);
    }

    #[test]
    fn test_fit_rejects_degenerate_input() {
        assert_eq!(fit_linear(&[[1.0, 2.0]]), None);
        assert_eq!(fit_linear(&[[1.0, 2.0], [1.0, 4.0]]), None);
    }
}
