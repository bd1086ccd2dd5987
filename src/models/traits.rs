//! SeriesModel trait defining the common interface for forecast methods.

use crate::error::Result;

/// Common interface for the forecasting methods.
///
/// A model is fitted to the aggregated numeric series and then queried for
/// in-sample fitted values and an out-of-sample forecast. The trait is
/// object-safe so methods can be selected at runtime via `Box<dyn
/// SeriesModel>`.
pub trait SeriesModel {
    /// Fit the model to the series values.
    fn fit(&mut self, values: &[f64]) -> Result<()>;

    /// Produce `horizon` out-of-sample forecast values.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample one-step-ahead estimates, aligned index-for-index with the
    /// fitted series. `None` before [`fit`](Self::fit).
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Display name of the method.
    fn name(&self) -> &'static str;

    /// Whether the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}

/// Type alias for boxed model trait objects.
pub type BoxedModel = Box<dyn SeriesModel>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExponentialSmoothing, LinearTrend, MovingAverage};

    #[test]
    fn boxed_model_dispatch() {
        let models: Vec<BoxedModel> = vec![
            Box::new(ExponentialSmoothing::default()),
            Box::new(MovingAverage::default()),
            Box::new(LinearTrend::new()),
        ];
        for model in &models {
            assert!(!model.is_fitted());
        }
    }

    #[test]
    fn boxed_model_fit_predict() {
        let mut model: BoxedModel = Box::new(ExponentialSmoothing::default());
        model.fit(&[10.0, 12.0, 11.0, 13.0]).unwrap();
        assert!(model.is_fitted());

        let future = model.predict(5).unwrap();
        assert_eq!(future.len(), 5);
        assert_eq!(model.fitted_values().unwrap().len(), 4);
    }
}
