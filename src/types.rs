//! Common types used throughout the extractor
//!
//! Shared type definitions, type aliases and the output row container
//! handed from the transformer to the sink.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// An untyped API record, scoped to one table, as returned by one page
pub type RawRecord = serde_json::Map<String, Value>;

// ============================================================================
// Load Mode
// ============================================================================

/// How extracted rows are written to the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Replace prior data for the table
    #[default]
    Full,
    /// Append to prior data, keyed on `[server, id]`
    Incremental,
}

impl LoadMode {
    /// Build from the boolean config flag
    pub fn from_incremental(incremental: bool) -> Self {
        if incremental {
            Self::Incremental
        } else {
            Self::Full
        }
    }

    /// Check if this is incremental-append mode
    pub fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental)
    }
}

// ============================================================================
// Output Row
// ============================================================================

/// One transformed row, ordered `server`, `id`, then table columns.
///
/// Column order is the order of insertion; rows are never mutated after the
/// transformer hands them to the sink.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRow {
    columns: Vec<(String, Value)>,
}

impl OutputRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Append a column. Re-pushing an existing name overwrites in place,
    /// keeping the original position.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        if let Some(slot) = self.columns.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    /// Get a column value by name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Remove a column by name, returning its value
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let idx = self.columns.iter().position(|(c, _)| c == column)?;
        Some(self.columns.remove(idx).1)
    }

    /// Iterate over `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl FromIterator<(String, Value)> for OutputRow {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut row = Self::new();
        for (c, v) in iter {
            row.push(c, v);
        }
        row
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Render a JSON value into its flat cell representation.
///
/// Nulls become empty strings; strings pass through unquoted; anything
/// structured falls back to compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
