//! Exponential smoothing forecast method.
//!
//! Single-parameter smoothing with a fixed alpha. Suitable for series without
//! a strong trend; the forecast is flat at the final smoothed level.

use crate::error::{AnalyticsError, Result};
use crate::models::SeriesModel;

/// Default smoothing parameter.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Exponential smoothing forecaster.
///
/// The level update is `level = alpha * y + (1 - alpha) * level`, seeded with
/// the first observation. The fitted value at each index is the level *before*
/// that observation is incorporated, so `fitted[0] == series[0]` and
/// `fitted[i]` is the one-step-ahead estimate for `series[i]`.
///
/// # Example
/// ```
/// use slicecast::models::{ExponentialSmoothing, SeriesModel};
///
/// let mut model = ExponentialSmoothing::new(0.5);
/// model.fit(&[10.0, 12.0, 14.0, 13.0]).unwrap();
///
/// // Flat forecast at the final level.
/// let future = model.predict(3).unwrap();
/// assert_eq!(future, vec![12.75, 12.75, 12.75]);
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialSmoothing {
    alpha: f64,
    level: Option<f64>,
    fitted: Option<Vec<f64>>,
}

impl ExponentialSmoothing {
    /// Create a model with the given smoothing parameter.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            level: None,
            fitted: None,
        }
    }

    /// The smoothing parameter.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The smoothed level after fitting.
    pub fn level(&self) -> Option<f64> {
        self.level
    }
}

impl Default for ExponentialSmoothing {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl SeriesModel for ExponentialSmoothing {
    fn fit(&mut self, values: &[f64]) -> Result<()> {
        let Some(&first) = values.first() else {
            return Err(AnalyticsError::EmptyInput);
        };

        let mut level = first;
        let mut fitted = Vec::with_capacity(values.len());
        for &y in values {
            fitted.push(level);
            level = self.alpha * y + (1.0 - self.alpha) * level;
        }

        self.level = Some(level);
        self.fitted = Some(fitted);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let level = self.level.ok_or(AnalyticsError::FitRequired)?;
        Ok(vec![level; horizon])
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_deref()
    }

    fn name(&self) -> &'static str {
        "Exponential Smoothing"
    }
}
