#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn evaluate(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Abscissa at which the line reaches `level`.
    pub fn crossing(&self, level: f64) -> f64 {
        (level - self.intercept) / self.slope
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinearFitError {
    #[error("line fit requires matching abscissa and ordinate lengths, got {x_len} and {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[error("line fit requires at least two points, got {count}")]
    TooFewPoints { count: usize },
    #[error("line fit abscissa values are all identical")]
    DegenerateAbscissa,
    #[error("line fit produced non-finite coefficients (slope {slope}, intercept {intercept})")]
    NonFinite { slope: f64, intercept: f64 },
}

/// Ordinary least-squares fit of `y = slope * x + intercept`, mean-centred.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit, LinearFitError> {
    if x.len() != y.len() {
        return Err(LinearFitError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(LinearFitError::TooFewPoints { count: x.len() });
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if sxx == 0.0 {
        return Err(LinearFitError::DegenerateAbscissa);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(LinearFitError::NonFinite { slope, intercept });
    }

    Ok(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::{LinearFitError, fit_line};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1.0e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn exact_line_is_recovered() {
        let x = [5.0, 5.1, 5.2, 5.3];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 12.0).collect();
        let fit = fit_line(&x, &y).expect("fit should succeed");

        assert_close(fit.slope, 2.5);
        assert_close(fit.intercept, -12.0);
        assert_close(fit.crossing(0.0), 4.8);
        assert_close(fit.evaluate(6.0), 3.0);
    }

    #[test]
    fn noisy_points_match_closed_form_least_squares() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 3.0, 2.0, 5.0];
        let fit = fit_line(&x, &y).expect("fit should succeed");

        // slope = cov(x, y) / var(x) = 1.1, intercept = 2.75 - 1.1 * 2.5
        assert_close(fit.slope, 1.1);
        assert_close(fit.intercept, 0.0);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert_eq!(
            fit_line(&[5.0], &[1.0]).expect_err("single point"),
            LinearFitError::TooFewPoints { count: 1 }
        );
        assert_eq!(
            fit_line(&[5.0, 5.0], &[1.0, 2.0]).expect_err("vertical"),
            LinearFitError::DegenerateAbscissa
        );
        assert_eq!(
            fit_line(&[5.0, 6.0], &[1.0]).expect_err("mismatch"),
            LinearFitError::LengthMismatch { x_len: 2, y_len: 1 }
        );
        assert!(matches!(
            fit_line(&[5.0, 6.0], &[f64::NAN, 1.0]).expect_err("nan"),
            LinearFitError::NonFinite { .. }
        ));
    }
}
