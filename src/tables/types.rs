//! Table specification types
//!
//! A `TableSpec` is the static metadata for one extractable table: where it
//! lives on the API, how it is filtered, which fields form its natural key
//! and which columns survive into the output. Specs are plain data; the
//! per-table behavior differences (date filtering, child fan-out, column
//! explosion) are all driven from these fields rather than from a type
//! hierarchy.

/// Link from a child table to the parent whose records drive its extraction.
///
/// Child rows only exist in the context of a parent record and are fetched
/// per parent id from `{parent_endpoint}/{id}/{segment}.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Name of the parent table spec (e.g. `activities`)
    pub table: String,
    /// Child endpoint segment under the parent record (e.g. `email`)
    pub segment: String,
    /// Parent column whose values address child collections (e.g. `name`)
    pub key_column: String,
}

/// Static metadata for one supported table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Output table name (also the request name)
    pub name: String,
    /// API endpoint path, without the `.json` suffix
    pub endpoint: String,
    /// Field the extraction window filters on, if the table is
    /// date-filterable
    pub date_field: Option<String>,
    /// Parent link for child tables
    pub parent: Option<ParentLink>,
    /// Fields forming the natural key, in digest order
    pub natural_keys: Vec<String>,
    /// Fields selected into the output; empty means pass everything through
    pub columns: Vec<String>,
    /// Reference columns that carry ids of other tables; these get the
    /// server prefix so multi-instance merges cannot collide
    pub ref_keys: Vec<String>,
    /// Columns holding plain lists, exploded one output row per element
    pub list_columns: Vec<String>,
    /// Columns holding lists of objects, exploded and flattened
    pub list_of_dicts_columns: Vec<String>,
}

impl TableSpec {
    /// Generic spec for an entity name with no registry entry.
    ///
    /// Custom Daktela entities extract with `server`, `id` and the raw
    /// fields of each record, keyed on `name`.
    pub fn passthrough(name: &str) -> Self {
        Self {
            name: name.to_string(),
            endpoint: name.to_string(),
            date_field: None,
            parent: None,
            natural_keys: vec!["name".to_string()],
            columns: Vec::new(),
            ref_keys: Vec::new(),
            list_columns: Vec::new(),
            list_of_dicts_columns: Vec::new(),
        }
    }

    /// Check whether this table is driven by a parent's records
    pub fn is_child(&self) -> bool {
        self.parent.is_some()
    }

    /// Foreign-key column name carrying the parent's compound key
    pub fn fk_column(&self) -> Option<String> {
        self.parent.as_ref().map(|p| format!("{}_id", p.table))
    }
}

/// Normalize an API field name into an output column name
pub fn normalize_column(field: &str) -> String {
    field.replace('.', "_")
}
