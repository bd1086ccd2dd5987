//! # slicecast
//!
//! Forecasting and recommendation engine for delivery-order analytics
//! dashboards.
//!
//! The engine is a pure compute boundary: callers hand over a delimited-text
//! table of delivery records and logical column names, and get back either a
//! time-series forecast (exponential smoothing, moving average, or linear
//! trend) or market-basket recommendations (popularity, category breakdown,
//! co-occurrence pairs, trending items), plus human-readable insight text.
//! Every request is stateless and single-pass over the supplied rows.
//!
//! ```
//! use slicecast::engine::{forecast_csv, ForecastRequest};
//! use slicecast::models::ForecastMethod;
//! use slicecast::series::ValueSemantics;
//!
//! let upload = "order_date,distance_km\n\
//!               2024-01-01,3.0\n\
//!               2024-01-02,4.0\n\
//!               2024-01-03,5.0\n";
//! let request = ForecastRequest {
//!     date_column: "order_date".into(),
//!     value_column: "distance_km".into(),
//!     semantics: ValueSemantics::Numeric,
//!     method: ForecastMethod::LinearTrend,
//!     periods: 7,
//! };
//!
//! let outcome = forecast_csv(upload, &request);
//! assert!(outcome.success);
//! assert_eq!(outcome.forecast.len(), 7);
//! ```

pub mod engine;
pub mod error;
pub mod insight;
pub mod models;
pub mod recommend;
pub mod series;
pub mod table;

pub use error::{AnalyticsError, Result};

pub mod prelude {
    pub use crate::engine::{
        forecast_csv, recommend_csv, run_forecast, run_recommendations, ForecastOutcome,
        ForecastRequest, RecommendOutcome, RecommendRequest,
    };
    pub use crate::error::{AnalyticsError, Result};
    pub use crate::insight::{describe_forecast, describe_recommendations, Metric};
    pub use crate::models::{ForecastMethod, SeriesModel};
    pub use crate::series::ValueSemantics;
    pub use crate::table::Table;
}
