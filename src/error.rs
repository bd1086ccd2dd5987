//! Error types for the slicecast analytics engine.

use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur while ingesting data or computing analytics.
///
/// Validation failures are deterministic: the same input always produces the
/// same error, so callers never need to retry. Degenerate numeric cases
/// (a two-point linear fit, a window wider than the series) are handled by
/// defined fallback values in the models and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// No data rows after parsing (blank or header-only input).
    #[error("no data in file")]
    EmptyInput,

    /// Too few aggregated periods for the operation.
    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Input exceeds the ingest row bound.
    #[error("too many rows: limit is {limit}, got {got}")]
    TooManyRows { limit: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,
}
