//! Record transformation
//!
//! Turns one raw API record into output rows: nested objects flatten into
//! `parent_field` columns, the spec's column list selects and orders fields,
//! list columns explode into one row per element, HTML noise is stripped,
//! reference keys get the server prefix and every row is stamped with the
//! compound primary key. Child rows additionally carry their parent's
//! compound key in a foreign-key column.
//!
//! Transformation is pure: no I/O, no state beyond the spec it was built
//! with. One raw record usually yields one row; list explosion may fan out.

use crate::keygen;
use crate::tables::{normalize_column, TableSpec};
use crate::types::{value_to_string, JsonValue, OutputRow, RawRecord};
use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid pattern"));

/// Transforms raw records of one table for one server
pub struct RecordTransformer<'a> {
    server: &'a str,
    spec: &'a TableSpec,
}

impl<'a> RecordTransformer<'a> {
    /// Create a transformer for one server/table pair
    pub fn new(server: &'a str, spec: &'a TableSpec) -> Self {
        Self { server, spec }
    }

    /// Transform one raw record into output rows.
    ///
    /// `parent_key` is the parent record's compound key for child tables,
    /// `None` for top-level tables.
    pub fn transform(&self, raw: &RawRecord, parent_key: Option<&str>) -> Vec<OutputRow> {
        let flat = self.select_columns(flatten(raw));

        let mut rows = vec![flat];
        for column in &self.spec.list_columns {
            rows = explode_list(rows, &normalize_column(column));
        }
        for column in &self.spec.list_of_dicts_columns {
            rows = explode_list_of_dicts(rows, &normalize_column(column));
        }

        rows.into_iter().map(|row| self.finish_row(row, parent_key)).collect()
    }

    /// Values of the natural-key fields, raw and in spec order; absent
    /// fields degrade to empty strings
    pub fn natural_key_values(&self, flat: &OutputRow) -> Vec<String> {
        self.spec
            .natural_keys
            .iter()
            .map(|key| {
                flat.get(&normalize_column(key))
                    .map(value_to_string)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Keep only the spec's columns, in spec order. A spec without columns
    /// passes everything through, as does a record sharing no field with the
    /// spec (sparse custom instances).
    fn select_columns(&self, flat: OutputRow) -> OutputRow {
        if self.spec.columns.is_empty() {
            return flat;
        }

        let selected: OutputRow = self
            .spec
            .columns
            .iter()
            .map(|c| normalize_column(c))
            .filter_map(|c| flat.get(&c).map(|v| (c.clone(), v.clone())))
            .collect();

        if selected.is_empty() {
            flat
        } else {
            selected
        }
    }

    /// Strip markup, prefix reference keys, stamp `server`/`id`/FK and fix
    /// the column order
    fn finish_row(&self, row: OutputRow, parent_key: Option<&str>) -> OutputRow {
        let mut row: OutputRow = row
            .iter()
            .map(|(c, v)| (c.to_string(), clean_html(v)))
            .collect();

        let key_values = self.natural_key_values(&row);
        let id = keygen::compound_key(self.server, &key_values);

        for column in self.spec.natural_keys.iter().chain(&self.spec.ref_keys) {
            self.prefix_column(&mut row, &normalize_column(column));
        }

        let mut finished = OutputRow::with_capacity(row.len() + 3);
        finished.push("server", JsonValue::String(self.server.to_string()));
        finished.push("id", JsonValue::String(id));
        if let (Some(fk_column), Some(parent_key)) = (self.spec.fk_column(), parent_key) {
            finished.push(fk_column, JsonValue::String(parent_key.to_string()));
        }
        for (column, value) in row.iter() {
            // Stamped columns stay authoritative over record fields that
            // happen to share their names
            if finished.get(column).is_none() {
                finished.push(column, value.clone());
            }
        }
        finished
    }

    /// Prefix a key column's value with the server name so ids from
    /// different instances cannot collide once merged
    fn prefix_column(&self, row: &mut OutputRow, column: &str) {
        let Some(value) = row.get(column) else {
            return;
        };
        if value.is_null() {
            return;
        }
        let rendered = value_to_string(value);
        if rendered.is_empty() {
            return;
        }
        row.push(
            column,
            JsonValue::String(format!("{}_{}", self.server, rendered)),
        );
    }
}

/// Flatten nested objects into `parent_field` columns; dots in API field
/// names normalize to underscores. Arrays stay whole for the explosion
/// steps.
fn flatten(raw: &RawRecord) -> OutputRow {
    let mut flat = OutputRow::with_capacity(raw.len());
    for (field, value) in raw {
        flatten_into(&normalize_column(field), value, &mut flat);
    }
    flat
}

fn flatten_into(column: &str, value: &JsonValue, out: &mut OutputRow) {
    match value {
        JsonValue::Object(map) => {
            for (field, nested) in map {
                flatten_into(&format!("{column}_{}", normalize_column(field)), nested, out);
            }
        }
        other => out.push(column, other.clone()),
    }
}

/// One row per list element; rows without a list pass through unchanged
fn explode_list(rows: Vec<OutputRow>, column: &str) -> Vec<OutputRow> {
    let mut exploded = Vec::with_capacity(rows.len());
    for mut row in rows {
        match row.get(column).cloned() {
            Some(JsonValue::Array(items)) if !items.is_empty() => {
                for item in items {
                    let mut copy = row.clone();
                    copy.push(column, item);
                    exploded.push(copy);
                }
            }
            Some(JsonValue::Array(_)) => {
                row.push(column, JsonValue::Null);
                exploded.push(row);
            }
            _ => exploded.push(row),
        }
    }
    exploded
}

/// One row per object element, the object's fields flattened under
/// `column_field`; the list column itself is dropped
fn explode_list_of_dicts(rows: Vec<OutputRow>, column: &str) -> Vec<OutputRow> {
    let mut exploded = Vec::with_capacity(rows.len());
    for mut row in rows {
        match row.remove(column) {
            Some(JsonValue::Array(items)) if !items.is_empty() => {
                for item in items {
                    let mut copy = row.clone();
                    flatten_into(column, &item, &mut copy);
                    exploded.push(copy);
                }
            }
            _ => exploded.push(row),
        }
    }
    exploded
}

/// Strip HTML tags from string values; a value that was nothing but markup
/// becomes null
fn clean_html(value: &JsonValue) -> JsonValue {
    let JsonValue::String(text) = value else {
        return value.clone();
    };
    if !text.contains('<') {
        return value.clone();
    }

    let cleaned = HTML_TAG.replace_all(text, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        JsonValue::Null
    } else {
        JsonValue::String(cleaned.to_string())
    }
}

/// Raw value of one top-level field, rendered flat. Used to collect parent
/// ids during the parent table's streaming pass.
pub fn record_field(raw: &RawRecord, field: &str) -> Option<String> {
    let value = raw.get(field)?;
    let rendered = value_to_string(value);
    if rendered.is_empty() {
        None
    } else {
        Some(rendered)
    }
}
