// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record merge engine.
//!
//! Computes the record list to write back for a present (add) or cleanup
//! (remove). PowerDNS stores TXT content pre-quoted, so records are matched on
//! the exact quoted string produced by [`quote_txt`]. Quoting happens here and
//! nowhere else; a value that is quoted twice would never match on cleanup.

use crate::pdns::Record;

/// Wrap a challenge value in double quotes, the way PowerDNS stores TXT content.
#[must_use]
pub fn quote_txt(value: &str) -> String {
    format!("\"{value}\"")
}

/// Position of the first record whose content is exactly `content`.
fn find_record(records: &[Record], content: &str) -> Option<usize> {
    records.iter().position(|record| record.content == content)
}

/// Check whether `records` already hold the challenge value.
#[must_use]
pub fn contains_value(records: &[Record], value: &str) -> bool {
    find_record(records, &quote_txt(value)).is_some()
}

/// Add the challenge value unless it is already present.
///
/// New records are appended; existing records keep their order and content.
#[must_use]
pub fn merge_add(mut existing: Vec<Record>, value: &str) -> Vec<Record> {
    let content = quote_txt(value);
    if find_record(&existing, &content).is_none() {
        existing.push(Record::enabled(content));
    }
    existing
}

/// Remove exactly one record holding the challenge value.
///
/// The remaining records keep their order. If no record matches, `existing`
/// is returned unchanged.
#[must_use]
pub fn merge_remove(mut existing: Vec<Record>, value: &str) -> Vec<Record> {
    if let Some(index) = find_record(&existing, &quote_txt(value)) {
        existing.remove(index);
    }
    existing
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
