//! Linear trend forecast method.
//!
//! Ordinary least squares over the 0-based series index. The fit has a closed
//! form, so no iterative solver is involved.

use crate::error::{AnalyticsError, Result};
use crate::models::SeriesModel;

/// Linear trend forecaster.
///
/// Fits `value = slope * index + intercept` by OLS. With fewer than two
/// points the normal equations degenerate; instead of erroring, the model
/// falls back to repeating the single observation (or 0 for an empty series).
///
/// # Example
/// ```
/// use slicecast::models::{LinearTrend, SeriesModel};
///
/// let mut model = LinearTrend::new();
/// model.fit(&[2.0, 4.0, 6.0, 8.0]).unwrap();
///
/// // Extrapolates to indices 4 and 5.
/// let future = model.predict(2).unwrap();
/// assert!((future[0] - 10.0).abs() < 1e-9);
/// assert!((future[1] - 12.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearTrend {
    line: Option<FittedLine>,
    fitted: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
enum FittedLine {
    Ols { slope: f64, intercept: f64, n: usize },
    /// Degenerate fit (n < 2): forecast repeats this value.
    Flat(f64),
}

impl LinearTrend {
    /// Create an unfitted model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slope and intercept of the fitted line, when an OLS fit happened.
    pub fn coefficients(&self) -> Option<(f64, f64)> {
        match self.line {
            Some(FittedLine::Ols {
                slope, intercept, ..
            }) => Some((slope, intercept)),
            _ => None,
        }
    }
}

impl SeriesModel for LinearTrend {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        let n = values.len();
        if n < 2 {
            // Degenerate by definition, not an error.
            let level = values.first().copied().unwrap_or(0.0);
            self.line = Some(FittedLine::Flat(level));
            self.fitted = Some(values.to_vec());
            return Ok(());
        }

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_x2 += x * x;
        }

        // The denominator n*sum_x2 - sum_x^2 is zero only for n < 2, which is
        // handled above.
        let nf = n as f64;
        let slope = (nf * sum_xy - sum_x * sum_y) / (nf * sum_x2 - sum_x * sum_x);
        let intercept = (sum_y - slope * sum_x) / nf;

        self.fitted = Some((0..n).map(|i| slope * i as f64 + intercept).collect());
        self.line = Some(FittedLine::Ols {
            slope,
            intercept,
            n,
        });
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let line = self.line.ok_or(AnalyticsError::FitRequired)?;
        Ok(match line {
            FittedLine::Ols {
                slope,
                intercept,
                n,
            } => (0..horizon)
                .map(|k| slope * (n + k) as f64 + intercept)
                .collect(),
            FittedLine::Flat(level) => vec![level; horizon],
        })
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &'static str {
        "Linear Trend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfectly_linear_series_is_recovered_exactly() {
        let c = 3.0;
        let d = 2.5;
        let values: Vec<f64> = (0..6).map(|i| c + d * i as f64).collect();

        let mut model = LinearTrend::new();
        model.fit(&values).unwrap();

        let (slope, intercept) = model.coefficients().unwrap();
        assert_relative_eq!(slope, d, epsilon = 1e-9);
        assert_relative_eq!(intercept, c, epsilon = 1e-9);

        let fitted = model.fitted_values().unwrap();
        for (i, value) in values.iter().enumerate() {
            assert_relative_eq!(fitted[i], *value, epsilon = 1e-9);
        }

        let future = model.predict(3).unwrap();
        for (k, value) in future.iter().enumerate() {
            assert_relative_eq!(*value, c + d * (6 + k) as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn ols_on_noisy_series_matches_hand_computation() {
        // Series from the dashboard's demo upload.
        let values = [10.0, 20.0, 15.0, 25.0, 30.0];
        let mut model = LinearTrend::new();
        model.fit(&values).unwrap();

        // n=5, sum_x=10, sum_y=100, sum_xy=245, sum_x2=30
        // slope = (5*245 - 10*100) / (5*30 - 100) = 225/50 = 4.5
        // intercept = (100 - 4.5*10) / 5 = 11
        let (slope, intercept) = model.coefficients().unwrap();
        assert_relative_eq!(slope, 4.5, epsilon = 1e-9);
        assert_relative_eq!(intercept, 11.0, epsilon = 1e-9);

        let future = model.predict(2).unwrap();
        assert_relative_eq!(future[0], 4.5 * 5.0 + 11.0, epsilon = 1e-9);
        assert_relative_eq!(future[1], 4.5 * 6.0 + 11.0, epsilon = 1e-9);
    }

    #[test]
    fn single_point_falls_back_to_flat_forecast() {
        let mut model = LinearTrend::new();
        model.fit(&[9.0]).unwrap();

        assert!(model.coefficients().is_none());
        assert_eq!(model.predict(3).unwrap(), vec![9.0, 9.0, 9.0]);
        assert_eq!(model.fitted_values().unwrap(), &[9.0]);
    }

    #[test]
    fn empty_series_falls_back_to_zero() {
        let mut model = LinearTrend::new();
        model.fit(&[]).unwrap();

        assert_eq!(model.predict(2).unwrap(), vec![0.0, 0.0]);
        assert!(model.fitted_values().unwrap().is_empty());
    }

    #[test]
    fn predict_requires_fit() {
        let model = LinearTrend::new();
        assert!(matches!(model.predict(1), Err(AnalyticsError::FitRequired)));
    }

    #[test]
    fn zero_horizon_returns_empty() {
        let mut model = LinearTrend::new();
        model.fit(&[1.0, 2.0, 3.0]).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn all_zero_series_is_accepted() {
        let mut model = LinearTrend::new();
        model.fit(&[0.0, 0.0, 0.0, 0.0]).unwrap();
        for value in model.predict(3).unwrap() {
            assert_relative_eq!(value, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn downward_trend_extrapolates_below_history() {
        let values = [30.0, 24.0, 18.0, 12.0];
        let mut model = LinearTrend::new();
        model.fit(&values).unwrap();

        let future = model.predict(1).unwrap();
        assert!(future[0] < 12.0);
    }
}
