//! Compound primary key generation
//!
//! Rows from several Daktela instances are merged downstream, so a record's
//! primary key mixes the server identity with its natural-key values. The
//! key is a hex MD5 digest and is fully deterministic: repeated and
//! incremental runs over the same source rows produce identical ids, which
//! is what makes downstream upsert/replace safe.
//!
//! A natural-key value that is absent from the API response degrades to an
//! empty string rather than failing the extraction. This is a deliberate
//! lossy simplification: sparse responses keep flowing, at the cost of
//! key-less rows collapsing onto one id.

/// Derive the compound primary key for one record.
///
/// The digest input is the server identity followed by each natural-key
/// value in the order the table spec declares them.
pub fn compound_key<S: AsRef<str>>(server: &str, values: &[S]) -> String {
    let mut input = String::with_capacity(
        server.len() + values.iter().map(|v| v.as_ref().len()).sum::<usize>(),
    );
    input.push_str(server);
    for value in values {
        input.push_str(value.as_ref());
    }
    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_inputs_same_key() {
        let a = compound_key("acme", &["activity-1"]);
        let b = compound_key("acme", &["activity-1"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_is_hex_md5() {
        let key = compound_key("acme", &["activity-1"]);
        assert_eq!(key.len(), 32);
        assert!(key.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_values_different_keys() {
        let a = compound_key("acme", &["activity-1"]);
        let b = compound_key("acme", &["activity-2"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_servers_different_keys() {
        let a = compound_key("acme", &["activity-1"]);
        let b = compound_key("globex", &["activity-1"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_multiple_natural_keys() {
        let a = compound_key("acme", &["user-1", "queue-1"]);
        let b = compound_key("acme", &["user-1", "queue-2"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_values_degrade_to_empty() {
        // Absent natural keys come through as empty strings; the key still
        // derives, it just stops discriminating.
        let a = compound_key("acme", &[""]);
        let b = compound_key("acme", &[""]);
        assert_eq!(a, b);
        assert_ne!(a, compound_key("acme", &["activity-1"]));
    }
}
