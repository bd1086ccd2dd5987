//! Moving average forecast method.
//!
//! Rolling mean over a fixed window. Future values are produced recursively:
//! each forecast step is appended to the working buffer and participates in
//! the next step's window, so the forecast decays toward a steady level
//! instead of staying flat.

use crate::error::{AnalyticsError, Result};
use crate::models::SeriesModel;

/// Default averaging window.
pub const DEFAULT_WINDOW: usize = 3;

/// Moving average forecaster.
///
/// The effective window is `min(window, series length)`; a series shorter
/// than the nominal window is averaged whole rather than rejected. Fitted
/// values inside the first window are the observations themselves (no history
/// to average yet); from the window onward each fitted value is the mean of
/// the preceding `window` actuals.
///
/// # Example
/// ```
/// use slicecast::models::{MovingAverage, SeriesModel};
///
/// let mut model = MovingAverage::new(3);
/// model.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
///
/// let future = model.predict(2).unwrap();
/// // First step: mean(3, 4, 5) = 4; second step: mean(4, 5, 4).
/// assert_eq!(future[0], 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    fitted: Option<Vec<f64>>,
    /// Last `effective window` observations, kept for recursive forecasting.
    tail: Option<Vec<f64>>,
}

impl MovingAverage {
    /// Create a model with the given nominal window. A window of 0 is bumped
    /// to 1.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            fitted: None,
            tail: None,
        }
    }

    /// The nominal window size.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl SeriesModel for MovingAverage {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(AnalyticsError::EmptyInput);
        }

        let window = self.window.min(values.len());

        let mut fitted = Vec::with_capacity(values.len());
        for (i, &y) in values.iter().enumerate() {
            if i < window {
                fitted.push(y);
            } else {
                fitted.push(mean(&values[i - window..i]));
            }
        }

        self.fitted = Some(fitted);
        self.tail = Some(values[values.len() - window..].to_vec());
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let tail = self.tail.as_ref().ok_or(AnalyticsError::FitRequired)?;
        let window = tail.len();

        // Each forecast joins the buffer and feeds later steps.
        let mut buffer = tail.clone();
        let mut future = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let next = mean(&buffer[buffer.len() - window..]);
            future.push(next);
            buffer.push(next);
        }
        Ok(future)
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &'static str {
        "Moving Average"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fitted_values_echo_series_inside_first_window() {
        let mut model = MovingAverage::new(3);
        model.fit(&[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert_relative_eq!(fitted[0], 2.0);
        assert_relative_eq!(fitted[1], 4.0);
        assert_relative_eq!(fitted[2], 6.0);
        // mean(2, 4, 6) and mean(4, 6, 8)
        assert_relative_eq!(fitted[3], 4.0);
        assert_relative_eq!(fitted[4], 6.0);
    }

    #[test]
    fn forecast_is_recursive_over_its_own_output() {
        let mut model = MovingAverage::new(3);
        model.fit(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let future = model.predict(3).unwrap();
        let step1 = (3.0 + 4.0 + 5.0) / 3.0;
        let step2 = (4.0 + 5.0 + step1) / 3.0;
        let step3 = (5.0 + step1 + step2) / 3.0;
        assert_relative_eq!(future[0], step1, epsilon = 1e-12);
        assert_relative_eq!(future[1], step2, epsilon = 1e-12);
        assert_relative_eq!(future[2], step3, epsilon = 1e-12);
    }

    #[test]
    fn short_series_shrinks_the_window() {
        let mut model = MovingAverage::new(5);
        model.fit(&[3.0, 9.0]).unwrap();

        // Effective window is 2; the first step averages the whole series.
        let future = model.predict(2).unwrap();
        assert_relative_eq!(future[0], 6.0, epsilon = 1e-12);
        assert_relative_eq!(future[1], (9.0 + 6.0) / 2.0, epsilon = 1e-12);

        // With no full window available, all fitted values echo the series.
        assert_eq!(model.fitted_values().unwrap(), &[3.0, 9.0]);
    }

    #[test]
    fn constant_series_forecasts_the_constant() {
        let mut model = MovingAverage::default();
        model.fit(&[7.0; 6]).unwrap();
        for value in model.predict(5).unwrap() {
            assert_relative_eq!(value, 7.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn empty_series_returns_error() {
        let mut model = MovingAverage::default();
        assert!(matches!(model.fit(&[]), Err(AnalyticsError::EmptyInput)));
    }

    #[test]
    fn predict_requires_fit() {
        let model = MovingAverage::default();
        assert!(matches!(model.predict(1), Err(AnalyticsError::FitRequired)));
    }

    #[test]
    fn zero_horizon_returns_empty() {
        let mut model = MovingAverage::default();
        model.fit(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn zero_window_is_bumped_to_one() {
        let model = MovingAverage::new(0);
        assert_eq!(model.window(), 1);
    }

    #[test]
    fn window_one_behaves_like_naive_forecast() {
        let mut model = MovingAverage::new(1);
        model.fit(&[4.0, 8.0, 2.0]).unwrap();
        // Every step repeats the previous value, so the forecast is flat at
        // the last observation.
        assert_eq!(model.predict(3).unwrap(), vec![2.0, 2.0, 2.0]);
    }
}
