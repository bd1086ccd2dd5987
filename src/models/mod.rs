//! Forecasting methods.

mod traits;

pub mod exponential;
pub mod linear_trend;
pub mod moving_average;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

pub use exponential::{ExponentialSmoothing, DEFAULT_ALPHA};
pub use linear_trend::LinearTrend;
pub use moving_average::{MovingAverage, DEFAULT_WINDOW};
pub use traits::{BoxedModel, SeriesModel};

/// Method selector for forecast requests.
///
/// Parses from the wire identifiers the dashboard sends
/// (`exponential-smoothing`, `moving-average`, `linear-trend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastMethod {
    ExponentialSmoothing,
    MovingAverage,
    LinearTrend,
}

impl ForecastMethod {
    /// Wire identifier of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExponentialSmoothing => "exponential-smoothing",
            Self::MovingAverage => "moving-average",
            Self::LinearTrend => "linear-trend",
        }
    }

    /// Display label used in result payloads.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExponentialSmoothing => "Exponential Smoothing",
            Self::MovingAverage => "Moving Average",
            Self::LinearTrend => "Linear Trend",
        }
    }

    /// Short description of when the method is a good pick.
    pub fn description(&self) -> &'static str {
        match self {
            Self::ExponentialSmoothing => {
                "Weights recent observations more heavily; a good default for series with gradual shifts."
            }
            Self::MovingAverage => {
                "Averages the last few periods; suited to stable series without a strong trend."
            }
            Self::LinearTrend => {
                "Fits a straight line; suited to series rising or falling at a steady rate."
            }
        }
    }

    /// Build an unfitted model for this method with its default parameters.
    pub fn model(&self) -> BoxedModel {
        match self {
            Self::ExponentialSmoothing => Box::new(ExponentialSmoothing::default()),
            Self::MovingAverage => Box::new(MovingAverage::default()),
            Self::LinearTrend => Box::new(LinearTrend::new()),
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exponential-smoothing" => Ok(Self::ExponentialSmoothing),
            "moving-average" => Ok(Self::MovingAverage),
            "linear-trend" => Ok(Self::LinearTrend),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown forecast method '{other}'"
            ))),
        }
    }
}
