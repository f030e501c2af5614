//! Wire types for the Daktela API v6
//!
//! Every collection endpoint answers with the same envelope:
//! `{"result": {"data": [...], "total": N}}`. Filters travel as a single
//! query parameter in `field[op]=value` form.

use crate::types::{JsonValue, RawRecord};
use serde::Deserialize;

/// One filter condition applied to a collection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Field to filter on
    pub field: String,
    /// Comparison operator (`gte`, `lt`, `eq`, ...)
    pub op: String,
    /// Serialized comparison value
    pub value: String,
}

impl Filter {
    /// Create a filter condition
    pub fn new(
        field: impl Into<String>,
        op: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// Greater-or-equal condition
    pub fn gte(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, "gte", value)
    }

    /// Strictly-less condition
    pub fn lt(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, "lt", value)
    }
}

/// Encode filters into the API's `field[op]=value` form
pub fn encode_filters(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(|f| format!("{}[{}]={}", f.field, f.op, f.value))
        .collect::<Vec<_>>()
        .join("&")
}

/// One fetched page: an ordered batch of raw records plus the total the API
/// reports for the whole filtered collection. Transient; dropped as soon as
/// its records are transformed.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Records on this page
    pub records: Vec<RawRecord>,
    /// Total matching records, when the API reports it
    pub total: Option<u64>,
}

/// Response envelope for collection endpoints
#[derive(Debug, Deserialize)]
pub(super) struct Envelope {
    #[serde(default)]
    pub result: Option<EnvelopeResult>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeResult {
    #[serde(default)]
    pub data: Vec<JsonValue>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl From<Envelope> for Page {
    fn from(envelope: Envelope) -> Self {
        let Some(result) = envelope.result else {
            return Self::default();
        };

        let records = result
            .data
            .into_iter()
            .filter_map(|value| match value {
                JsonValue::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        Self {
            records,
            total: result.total,
        }
    }
}
