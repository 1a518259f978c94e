//! Typed chart points
//!
//! Records are mapped to `{label, value}` right after decoding so nothing
//! downstream depends on the column order of the response.

use super::error::{ReportError, ReportResult};
use crate::client::Record;
use serde::Serialize;
use serde_json::Value;

/// One labelled measurement, e.g. `("18 to 29", "1432")`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    /// Value as returned by the API; aggregates arrive as strings
    pub value: String,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Numeric view of the value
    pub fn magnitude(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

/// Per-race series for the dual-gender report, male first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderComparison {
    pub male: Vec<ChartPoint>,
    pub female: Vec<ChartPoint>,
}

/// Map records to points.
///
/// The label is read from `label_field`; the value is the first other column.
pub fn to_points(records: &[Record], label_field: &str) -> ReportResult<Vec<ChartPoint>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| to_point(index, record, label_field))
        .collect()
}

fn to_point(index: usize, record: &Record, label_field: &str) -> ReportResult<ChartPoint> {
    let malformed = |reason: String| ReportError::MalformedRecord { index, reason };

    let label = record
        .get(label_field)
        .ok_or_else(|| malformed(format!("missing label column '{}'", label_field)))?;

    let (metric_field, value) = record
        .iter()
        .find(|(key, _)| key.as_str() != label_field)
        .ok_or_else(|| malformed("missing metric column".to_string()))?;

    Ok(ChartPoint {
        label: scalar_text(label)
            .ok_or_else(|| malformed(format!("label column '{}' is not a scalar", label_field)))?,
        value: scalar_text(value)
            .ok_or_else(|| malformed(format!("metric column '{}' is not a scalar", metric_field)))?,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
