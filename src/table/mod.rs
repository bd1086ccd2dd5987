//! Delimited-text ingest: parsing uploads into rows and resolving columns.
//!
//! The upload format is deliberately simple: comma-separated, one header line,
//! no quoting. Values containing the delimiter will misalign columns; that is
//! a documented limitation of the format, not something this parser repairs.

use crate::error::{AnalyticsError, Result};

/// Field delimiter for uploaded tables.
pub const DELIMITER: char = ',';

/// Upper bound on data rows accepted per upload.
pub const MAX_ROWS: usize = 10_000;

/// A reference to a resolved column.
///
/// Produced by [`resolve_column`]; holds the actual header the logical name
/// resolved to, or the literal logical name when no header matched. In the
/// unmatched case every lookup through the reference yields the empty string,
/// and callers treat the resulting empty groups as "no usable data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    key: String,
    index: Option<usize>,
}

impl ColumnRef {
    /// The header (or literal logical name) this reference points at.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the logical name matched a real header.
    pub fn is_resolved(&self) -> bool {
        self.index.is_some()
    }
}

/// Resolve a logical column name against a header set.
///
/// Returns the first header containing the logical name as a case-insensitive
/// substring, in header declaration order. Falls back to the literal logical
/// name when nothing matches. Resolution is deterministic for a given header
/// order.
///
/// # Example
/// ```
/// use slicecast::table::resolve_column;
///
/// let headers = vec!["order_id".to_string(), "delivery_distance_km".to_string()];
/// let col = resolve_column(&headers, "distance_km");
/// assert_eq!(col.key(), "delivery_distance_km");
///
/// let missing = resolve_column(&headers, "delay_min");
/// assert_eq!(missing.key(), "delay_min");
/// assert!(!missing.is_resolved());
/// ```
pub fn resolve_column(headers: &[String], logical: &str) -> ColumnRef {
    let needle = logical.to_lowercase();
    for (index, header) in headers.iter().enumerate() {
        if header.contains(&needle) {
            return ColumnRef {
                key: header.clone(),
                index: Some(index),
            };
        }
    }
    ColumnRef {
        key: logical.to_string(),
        index: None,
    }
}

/// One delivery record: field values positionally aligned with the table's
/// headers. Rows are immutable once parsed.
#[derive(Debug, Clone, Default)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Field value for a resolved column, or `""` when the column did not
    /// resolve or the row is missing the trailing field.
    pub fn get(&self, column: &ColumnRef) -> &str {
        column
            .index
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Field value coerced to a number; unparseable values coerce to `0.0`
    /// so a stray non-numeric cell never aborts an upload.
    pub fn numeric(&self, column: &ColumnRef) -> f64 {
        self.get(column).parse::<f64>().unwrap_or(0.0)
    }
}

/// A parsed table: lowercased, trimmed headers plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Parse a delimited text blob.
    ///
    /// The first line is the header row; header fields are lowercased and
    /// whitespace-trimmed. Each data line is split on the delimiter and
    /// zip-matched against the headers; missing trailing fields read as empty
    /// strings. Fewer than two lines yields an empty table, which is a valid
    /// outcome rather than an error. More than [`MAX_ROWS`] data rows is
    /// rejected.
    ///
    /// # Example
    /// ```
    /// use slicecast::table::Table;
    ///
    /// let table = Table::parse("order_id,pizza_type\n1,Margherita\n2,Diavola\n").unwrap();
    /// assert_eq!(table.len(), 2);
    ///
    /// let empty = Table::parse("order_id,pizza_type\n").unwrap();
    /// assert!(empty.is_empty());
    /// ```
    pub fn parse(text: &str) -> Result<Table> {
        let mut lines = text.trim().lines();

        let Some(header_line) = lines.next() else {
            return Ok(Table::default());
        };
        let data_lines: Vec<&str> = lines.collect();

        if data_lines.is_empty() {
            return Ok(Table::default());
        }
        if data_lines.len() > MAX_ROWS {
            return Err(AnalyticsError::TooManyRows {
                limit: MAX_ROWS,
                got: data_lines.len(),
            });
        }

        let headers: Vec<String> = header_line
            .split(DELIMITER)
            .map(|h| h.trim().to_lowercase())
            .collect();

        let rows = data_lines
            .into_iter()
            .map(|line| Row {
                fields: line
                    .split(DELIMITER)
                    .map(|v| v.trim().to_string())
                    .collect(),
            })
            .collect();

        Ok(Table { headers, rows })
    }

    /// Resolve a logical column name against this table's headers.
    pub fn resolve(&self, logical: &str) -> ColumnRef {
        resolve_column(&self.headers, logical)
    }

    /// The header set, in declaration order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The data rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
