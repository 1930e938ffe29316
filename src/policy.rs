// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone allow-list policy.
//!
//! Decides whether a zone may be mutated at all. An empty allow-list permits
//! every zone; otherwise a zone must equal an entry or be a subdomain of one.
//! Both sides are compared in canonical form (lower-case, trailing dot) so
//! `Example.com` and `example.com.` are the same zone.

use crate::errors::SolverError;

/// Canonical form of a zone or record name: trimmed, lower-case, trailing dot.
///
/// The empty name and the root both canonicalize to `"."`.
#[must_use]
pub fn normalize_zone(zone: &str) -> String {
    let trimmed = zone.trim().trim_end_matches('.').to_ascii_lowercase();
    format!("{trimmed}.")
}

/// Allow-list of zones the solver may edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZonePolicy {
    /// Canonicalized allow-list entries
    allowed: Vec<String>,
}

impl ZonePolicy {
    /// Build a policy from raw allow-list entries.
    ///
    /// Blank entries are dropped rather than canonicalized to the root, which
    /// would otherwise allow every zone.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = entries
            .into_iter()
            .filter(|entry| !entry.as_ref().trim().trim_end_matches('.').is_empty())
            .map(|entry| normalize_zone(entry.as_ref()))
            .collect();
        Self { allowed }
    }

    /// The canonical allow-list entries.
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Check if the given zone may be edited.
    #[must_use]
    pub fn is_allowed(&self, zone: &str) -> bool {
        if self.allowed.is_empty() {
            return true;
        }

        let zone = normalize_zone(zone);
        self.allowed
            .iter()
            .any(|entry| zone == *entry || zone.ends_with(&format!(".{entry}")))
    }

    /// Like [`ZonePolicy::is_allowed`], but returns the denial as an error.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::PolicyDenied`] if the zone is not allowed.
    pub fn check(&self, zone: &str) -> Result<(), SolverError> {
        if self.is_allowed(zone) {
            Ok(())
        } else {
            Err(SolverError::PolicyDenied {
                zone: zone.to_string(),
                allowed: self.allowed.clone(),
            })
        }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod policy_tests;
