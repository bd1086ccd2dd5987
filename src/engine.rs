//! Request/response contract of the analytics engine.
//!
//! The HTTP layer hands over a parsed table plus logical column names and
//! receives structured outcomes. Domain validation failures come back as
//! `success: false` payloads rather than errors; nothing here panics on bad
//! uploads.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalyticsError, Result};
use crate::models::ForecastMethod;
use crate::recommend::{recommend, RecommendColumns, Recommendations};
use crate::series::{build_series, ValueSemantics, MIN_SERIES_LENGTH};
use crate::table::Table;

/// Parameters of a forecast invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Logical date column name (resolved by substring match).
    pub date_column: String,
    /// Logical value column name.
    pub value_column: String,
    /// How the value column aggregates per period.
    pub semantics: ValueSemantics,
    /// Forecast method selector.
    pub method: ForecastMethod,
    /// Number of future periods to produce.
    pub periods: usize,
}

/// One historical period with its actual and in-sample fitted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    pub actual: f64,
    pub forecast: f64,
}

/// Result payload of a forecast invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub success: bool,
    pub method: String,
    pub historical: Vec<HistoricalPoint>,
    pub forecast: Vec<f64>,
    pub periods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ForecastOutcome {
    fn failure(method: ForecastMethod, periods: usize, error: String) -> Self {
        Self {
            success: false,
            method: method.label().to_string(),
            historical: Vec::new(),
            forecast: Vec::new(),
            periods,
            error: Some(error),
        }
    }

    /// Export as `date,actual,forecast` CSV, forecast rows labeled
    /// `Forecast 1..n` with an empty actual field. This is the download
    /// format the dashboard offers.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("date,actual,forecast\n");
        for point in &self.historical {
            out.push_str(&format!(
                "{},{},{}\n",
                point.date, point.actual, point.forecast
            ));
        }
        for (i, value) in self.forecast.iter().enumerate() {
            out.push_str(&format!("Forecast {},,{}\n", i + 1, value));
        }
        out
    }
}

/// Parameters of a recommendation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub item_column: String,
    pub category_column: String,
    pub order_id_column: String,
    pub date_column: String,
    /// Entries per ranked view.
    pub top_n: usize,
}

/// Result payload of a recommendation invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendOutcome {
    pub success: bool,
    pub recommendations: Recommendations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecommendOutcome {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            recommendations: Recommendations::default(),
            error: Some(error),
        }
    }
}

/// Run a forecast over an already-parsed table.
///
/// Fails softly (`success: false`) on an empty table or when aggregation
/// yields fewer than [`MIN_SERIES_LENGTH`] periods; those are the only
/// validated preconditions.
pub fn run_forecast(table: &Table, request: &ForecastRequest) -> ForecastOutcome {
    debug!(
        method = request.method.as_str(),
        periods = request.periods,
        rows = table.len(),
        "running forecast"
    );

    if table.is_empty() {
        warn!("forecast rejected: empty table");
        return ForecastOutcome::failure(
            request.method,
            request.periods,
            AnalyticsError::EmptyInput.to_string(),
        );
    }

    let date_col = table.resolve(&request.date_column);
    let value_col = table.resolve(&request.value_column);
    let series = build_series(table.rows(), &date_col, &value_col, request.semantics);

    if series.len() < MIN_SERIES_LENGTH {
        warn!(points = series.len(), "forecast rejected: series too short");
        return ForecastOutcome::failure(
            request.method,
            request.periods,
            AnalyticsError::InsufficientData {
                needed: MIN_SERIES_LENGTH,
                got: series.len(),
            }
            .to_string(),
        );
    }

    let mut model = request.method.model();
    let (fitted, future) = match fit_predict(model.as_mut(), series.values(), request.periods) {
        Ok(pair) => pair,
        Err(err) => {
            // Unreachable after the length check, but the failure path stays
            // structured rather than panicking.
            return ForecastOutcome::failure(request.method, request.periods, err.to_string());
        }
    };

    let historical = series
        .labels()
        .iter()
        .zip(series.values())
        .zip(&fitted)
        .map(|((date, &actual), &fit)| HistoricalPoint {
            date: date.clone(),
            actual,
            forecast: fit,
        })
        .collect();

    ForecastOutcome {
        success: true,
        method: request.method.label().to_string(),
        historical,
        forecast: future,
        periods: request.periods,
        error: None,
    }
}

fn fit_predict(
    model: &mut dyn crate::models::SeriesModel,
    values: &[f64],
    periods: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    model.fit(values)?;
    let future = model.predict(periods)?;
    let fitted = model
        .fitted_values()
        .ok_or(AnalyticsError::FitRequired)?
        .to_vec();
    Ok((fitted, future))
}

/// Parse a delimited upload and run a forecast over it.
pub fn forecast_csv(text: &str, request: &ForecastRequest) -> ForecastOutcome {
    match Table::parse(text) {
        Ok(table) => run_forecast(&table, request),
        Err(err) => ForecastOutcome::failure(request.method, request.periods, err.to_string()),
    }
}

/// Compute recommendations over an already-parsed table.
pub fn run_recommendations(table: &Table, request: &RecommendRequest) -> RecommendOutcome {
    debug!(top_n = request.top_n, rows = table.len(), "running recommendations");

    if table.is_empty() {
        warn!("recommendations rejected: empty table");
        return RecommendOutcome::failure(AnalyticsError::EmptyInput.to_string());
    }

    let columns = RecommendColumns {
        item: table.resolve(&request.item_column),
        category: table.resolve(&request.category_column),
        order_id: table.resolve(&request.order_id_column),
        date: table.resolve(&request.date_column),
    };

    RecommendOutcome {
        success: true,
        recommendations: recommend(table.rows(), &columns, request.top_n),
        error: None,
    }
}

/// Parse a delimited upload and compute recommendations over it.
pub fn recommend_csv(text: &str, request: &RecommendRequest) -> RecommendOutcome {
    match Table::parse(text) {
        Ok(table) => run_recommendations(&table, request),
        Err(err) => RecommendOutcome::failure(err.to_string()),
    }
}
