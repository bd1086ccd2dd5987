//! Building ordered time series from delivery rows.
//!
//! Rows are grouped by a date column and each group is reduced to a single
//! number according to the value column's semantics. Period labels are
//! whatever the date column holds; callers wanting chronological order must
//! supply labels that sort lexicographically (e.g. `YYYY-MM-DD`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::table::{ColumnRef, Row};

/// Minimum number of aggregated periods required before forecasting.
pub const MIN_SERIES_LENGTH: usize = 3;

/// What the value column means, and therefore how a date group reduces to a
/// number.
///
/// Passing this explicitly replaces inferring the aggregation from the column
/// name at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSemantics {
    /// Numeric measurements: values are summed per period.
    Numeric,
    /// Categorical labels (pizza type, payment method, ...): the period value
    /// is the occurrence count of that period's most frequent category.
    Categorical,
    /// Order volume: each row with a date contributes 1 to its period.
    OrderCount,
}

/// An ordered series of `(period_label, value)` pairs.
///
/// Labels are unique and sorted ascending lexicographically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Period labels, ascending.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values aligned with [`labels`](Self::labels).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the series holds no periods.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Group rows by the date column and reduce each group per `semantics`.
///
/// Rows with an empty date value are skipped. For [`ValueSemantics::Numeric`],
/// unparseable values coerce to 0 (ingest leniency). For
/// [`ValueSemantics::Categorical`], rows with an empty category value are also
/// skipped, and each period records the count of its single most frequent
/// category; ties break toward the category encountered first in row order.
/// The winning count discards all other categories' volume for that period.
pub fn build_series(
    rows: &[Row],
    date_col: &ColumnRef,
    value_col: &ColumnRef,
    semantics: ValueSemantics,
) -> TimeSeries {
    let grouped: BTreeMap<String, f64> = match semantics {
        ValueSemantics::Numeric => reduce_numeric(rows, date_col, value_col, |row, col| {
            row.numeric(col)
        }),
        ValueSemantics::OrderCount => reduce_numeric(rows, date_col, value_col, |_, _| 1.0),
        ValueSemantics::Categorical => reduce_mode_count(rows, date_col, value_col),
    };

    let mut labels = Vec::with_capacity(grouped.len());
    let mut values = Vec::with_capacity(grouped.len());
    for (label, value) in grouped {
        labels.push(label);
        values.push(value);
    }
    TimeSeries { labels, values }
}

fn reduce_numeric(
    rows: &[Row],
    date_col: &ColumnRef,
    value_col: &ColumnRef,
    contribution: impl Fn(&Row, &ColumnRef) -> f64,
) -> BTreeMap<String, f64> {
    let mut grouped = BTreeMap::new();
    for row in rows {
        let date = row.get(date_col);
        if date.is_empty() {
            continue;
        }
        *grouped.entry(date.to_string()).or_insert(0.0) += contribution(row, value_col);
    }
    grouped
}

fn reduce_mode_count(
    rows: &[Row],
    date_col: &ColumnRef,
    value_col: &ColumnRef,
) -> BTreeMap<String, f64> {
    // Per period, tally categories in first-encounter order. Category counts
    // per period are small (a handful of sizes or payment methods), so a Vec
    // scan beats a map and keeps the tie-break order explicit.
    let mut tallies: BTreeMap<String, Vec<(String, u64)>> = BTreeMap::new();
    for row in rows {
        let date = row.get(date_col);
        let category = row.get(value_col);
        if date.is_empty() || category.is_empty() {
            continue;
        }
        let tally = tallies.entry(date.to_string()).or_default();
        match tally.iter_mut().find(|(c, _)| c == category) {
            Some((_, count)) => *count += 1,
            None => tally.push((category.to_string(), 1)),
        }
    }

    tallies
        .into_iter()
        .map(|(date, tally)| {
            let winner = tally.iter().map(|&(_, count)| count).max().unwrap_or(0);
            (date, winner as f64)
        })
        .collect()
}
