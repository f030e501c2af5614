//! Table specifications and the built-in registry
//!
//! # Overview
//!
//! - `TableSpec` / `ParentLink` - static metadata describing one table
//! - the registry - an immutable, process-wide map built once at startup
//! - passthrough specs for custom entities with no registry entry
//!
//! The registry is read-only after construction; nothing mutates specs at
//! runtime.

mod catalog;
mod types;

pub use types::{normalize_column, ParentLink, TableSpec};

use once_cell::sync::Lazy;
use std::collections::HashMap;

static REGISTRY: Lazy<HashMap<String, TableSpec>> = Lazy::new(|| {
    catalog::default_specs()
        .into_iter()
        .map(|spec| (spec.name.clone(), spec))
        .collect()
});

/// The built-in table registry
pub fn registry() -> &'static HashMap<String, TableSpec> {
    &REGISTRY
}

/// Look up a built-in spec by name
pub fn get(name: &str) -> Option<&'static TableSpec> {
    REGISTRY.get(name)
}

/// Resolve a name into a spec: built-in when registered, passthrough
/// otherwise
pub fn resolve(name: &str) -> TableSpec {
    get(name).cloned().unwrap_or_else(|| TableSpec::passthrough(name))
}

/// Sorted names of all built-in tables
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
