//! Case-insensitive substring matching shared by the list filters.

/// Lowercase a user-entered query once, before matching many records.
pub(crate) fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

/// Whether `value` contains `query_lower`; absent values never match.
pub(crate) fn contains_lower(value: Option<&str>, query_lower: &str) -> bool {
    value.is_some_and(|v| v.to_lowercase().contains(query_lower))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_value_never_matches() {
        assert!(!contains_lower(None, ""));
        assert!(contains_lower(Some("Urgencias"), ""));
        assert!(contains_lower(Some("Urgencias"), &normalize_query("URG")));
    }
}
