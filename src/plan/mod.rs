//! Extraction planning
//!
//! Expands a requested table set into an ordered extraction plan: every
//! required ancestor is pulled in transitively, and the output order
//! guarantees parents extract before their children. Ties among independent
//! tables keep the original request order so repeated runs extract in the
//! same sequence.
//!
//! Requested names are case-insensitive. A well-formed name with no registry
//! entry still plans as a generic passthrough table (custom Daktela
//! entities); only names that cannot be an entity path segment are rejected.

use crate::error::{Error, Result};
use crate::tables::{self, TableSpec};

/// Compute the ordered extraction plan for a set of requested table names.
pub fn plan<S: AsRef<str>>(requested: &[S]) -> Result<Vec<TableSpec>> {
    let names = normalize(requested)?;
    if names.is_empty() {
        return Err(Error::config("at least one table must be requested"));
    }

    let mut ordered: Vec<TableSpec> = Vec::with_capacity(names.len());

    for name in &names {
        push_with_ancestors(name, &mut ordered);
    }

    Ok(ordered)
}

/// Insert a table after all of its ancestors, skipping names already planned.
fn push_with_ancestors(name: &str, ordered: &mut Vec<TableSpec>) {
    if ordered.iter().any(|s| s.name == name) {
        return;
    }

    let spec = tables::resolve(name);
    if let Some(parent) = &spec.parent {
        push_with_ancestors(&parent.table.clone(), ordered);
    }
    ordered.push(spec);
}

/// Trim, lowercase and validate requested names, deduplicating while keeping
/// first-occurrence order.
fn normalize<S: AsRef<str>>(requested: &[S]) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(requested.len());

    for raw in requested {
        let name = raw.as_ref().trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        if !is_valid_name(&name) {
            return Err(Error::unknown_table(raw.as_ref().trim()));
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }

    Ok(names)
}

/// An entity name must be usable as a URL path segment: lowercase
/// alphanumerics and underscores only.
fn is_valid_name(name: &str) -> bool {
    name.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}
