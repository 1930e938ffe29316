// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for the record merge engine.

#[cfg(test)]
mod tests {
    use crate::pdns::Record;
    use crate::reconciler::merge::{contains_value, merge_add, merge_remove, quote_txt};

    fn records(contents: &[&str]) -> Vec<Record> {
        contents.iter().map(|c| Record::enabled(*c)).collect()
    }

    #[test]
    fn test_quote_txt() {
        assert_eq!(quote_txt("tok1"), "\"tok1\"");
        assert_eq!(quote_txt(""), "\"\"");
    }

    #[test]
    fn test_merge_add_into_empty() {
        assert_eq!(
            merge_add(Vec::new(), "tok1"),
            vec![Record {
                content: "\"tok1\"".to_string(),
                disabled: false,
                ..Record::default()
            }]
        );
    }

    #[test]
    fn test_merge_add_appends_and_preserves_order() {
        let merged = merge_add(records(&["\"a\"", "\"b\""]), "c");
        assert_eq!(merged, records(&["\"a\"", "\"b\"", "\"c\""]));
    }

    #[test]
    fn test_merge_add_is_idempotent() {
        let cases = [
            Vec::new(),
            records(&["\"a\""]),
            records(&["\"a\"", "\"tok\"", "\"b\""]),
        ];

        for existing in cases {
            let once = merge_add(existing, "tok");
            let twice = merge_add(once.clone(), "tok");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_merge_add_keeps_disabled_records() {
        let mut existing = records(&["\"a\""]);
        existing[0].disabled = true;

        let merged = merge_add(existing, "b");
        assert!(merged[0].disabled);
        assert!(!merged[1].disabled);
    }

    #[test]
    fn test_merge_add_does_not_match_unquoted_content() {
        // An unquoted record with the same text is a different record
        let merged = merge_add(records(&["tok"]), "tok");
        assert_eq!(merged, records(&["tok", "\"tok\""]));
    }

    #[test]
    fn test_merge_add_does_not_match_substring() {
        let merged = merge_add(records(&["\"tok-longer\""]), "tok");
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_remove_target_only() {
        let existing = records(&["\"a\"", "\"b\""]);
        assert_eq!(merge_remove(existing, "b"), records(&["\"a\""]));
    }

    #[test]
    fn test_merge_remove_preserves_order() {
        let existing = records(&["\"a\"", "\"b\"", "\"c\"", "\"d\""]);
        assert_eq!(
            merge_remove(existing, "b"),
            records(&["\"a\"", "\"c\"", "\"d\""])
        );
    }

    #[test]
    fn test_merge_remove_missing_value_is_unchanged() {
        let existing = records(&["\"a\"", "\"b\""]);
        assert_eq!(merge_remove(existing.clone(), "zzz"), existing);
    }

    #[test]
    fn test_merge_remove_only_one_duplicate() {
        let existing = records(&["\"a\"", "\"tok\"", "\"b\"", "\"tok\""]);
        let remaining = merge_remove(existing, "tok");

        assert_eq!(remaining.len(), 3);
        assert_eq!(
            remaining.iter().filter(|r| r.content == "\"tok\"").count(),
            1
        );
    }

    #[test]
    fn test_merge_remove_last_record_yields_empty() {
        assert!(merge_remove(records(&["\"tok\""]), "tok").is_empty());
    }

    #[test]
    fn test_remove_after_add_restores_original() {
        let cases = [
            Vec::new(),
            records(&["\"a\""]),
            records(&["\"x\"", "\"y\"", "\"z\""]),
        ];

        for original in cases {
            let restored = merge_remove(merge_add(original.clone(), "tok"), "tok");
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn test_contains_value() {
        let existing = records(&["\"a\"", "b"]);
        assert!(contains_value(&existing, "a"));
        assert!(!contains_value(&existing, "b"));
        assert!(!contains_value(&[], "a"));
    }
}
