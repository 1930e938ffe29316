// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the zone allow-list policy.

#[cfg(test)]
mod tests {
    use crate::errors::SolverError;
    use crate::policy::{normalize_zone, ZonePolicy};

    #[test]
    fn test_normalize_zone_adds_trailing_dot() {
        assert_eq!(normalize_zone("example.com"), "example.com.");
        assert_eq!(normalize_zone("example.com."), "example.com.");
    }

    #[test]
    fn test_normalize_zone_lowercases_and_trims() {
        assert_eq!(normalize_zone("  Example.COM. "), "example.com.");
    }

    #[test]
    fn test_normalize_zone_root() {
        assert_eq!(normalize_zone(""), ".");
        assert_eq!(normalize_zone("."), ".");
    }

    #[test]
    fn test_empty_allow_list_allows_everything() {
        let policy = ZonePolicy::default();
        assert!(policy.is_allowed("example.com."));
        assert!(policy.is_allowed("anything.example.net"));
        assert!(policy.check("whatever.org.").is_ok());
    }

    #[test]
    fn test_allow_list_matching() {
        let policy = ZonePolicy::new(["example.com."]);

        assert!(policy.is_allowed("foo.example.com."));
        assert!(policy.is_allowed("example.com."));
        assert!(!policy.is_allowed("notexample.com."));
        assert!(!policy.is_allowed("foo.example.net."));
    }

    #[test]
    fn test_allow_list_is_trailing_dot_insensitive() {
        let policy = ZonePolicy::new(["example.com"]);

        assert!(policy.is_allowed("example.com."));
        assert!(policy.is_allowed("foo.example.com"));
        assert!(!policy.is_allowed("notexample.com"));
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let policy = ZonePolicy::new(["Example.Com."]);
        assert!(policy.is_allowed("sub.EXAMPLE.com."));
    }

    #[test]
    fn test_blank_entries_do_not_allow_everything() {
        let policy = ZonePolicy::new(["", " ", "example.com."]);

        assert_eq!(policy.allowed(), ["example.com.".to_string()]);
        assert!(!policy.is_allowed("example.org."));
    }

    #[test]
    fn test_check_returns_policy_denied() {
        let policy = ZonePolicy::new(["example.com."]);

        match policy.check("example.org.") {
            Err(SolverError::PolicyDenied { zone, allowed }) => {
                assert_eq!(zone, "example.org.");
                assert_eq!(allowed, vec!["example.com.".to_string()]);
            }
            other => panic!("expected PolicyDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_entries() {
        let policy = ZonePolicy::new(["example.com.", "example.org."]);

        assert!(policy.is_allowed("a.example.org."));
        assert!(policy.is_allowed("b.example.com."));
        assert!(!policy.is_allowed("example.net."));
    }
}
