// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Challenge record reconciliation.
//!
//! Every present and cleanup runs the same pipeline against the provider:
//!
//! 1. [`ZonePolicy`] check - denied zones fail before any request is made
//! 2. [`locator::fetch_txt_rrset`] - read the current TXT set (absent = empty)
//! 3. [`merge::merge_add`] / [`merge::merge_remove`] - compute the new list
//! 4. [`dispatch::replace_rrset`] - write the whole list back as a REPLACE
//!
//! Nothing is cached between calls; each call re-reads the provider.
//!
//! # Concurrency
//!
//! Steps 2-4 are a read-modify-write with no compare-and-swap at the
//! provider. Two calls racing on the same record name can both read the same
//! set, and the later REPLACE drops the record added by the earlier one. The
//! PowerDNS API offers no precondition to guard against this, so the window
//! is accepted. Because both operations are idempotent, a caller that
//! re-invokes present after verifying the record is missing converges.

pub mod dispatch;
pub mod locator;
pub mod merge;

#[cfg(test)]
pub(crate) mod fake;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::SolverError;
use crate::pdns::ZoneApi;
use crate::policy::ZonePolicy;

/// What cleanup does when the challenge record is not there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRecordPolicy {
    /// Treat as already cleaned up and skip the write
    #[default]
    Ignore,
    /// Report [`SolverError::RecordNotFound`]
    Error,
}

/// Settings shared by every operation of one reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// TTL written on every replaced RRSet
    pub ttl: u32,
    /// Zones that may be edited
    pub policy: ZonePolicy,
    /// Cleanup behaviour for missing records
    pub missing_record: MissingRecordPolicy,
}

/// Presents and cleans up challenge TXT records on one provider.
#[derive(Debug, Clone)]
pub struct Reconciler<A> {
    api: A,
    settings: ReconcileSettings,
}

impl<A: ZoneApi> Reconciler<A> {
    /// Create a reconciler over a provider API.
    #[must_use]
    pub fn new(api: A, settings: ReconcileSettings) -> Self {
        Self { api, settings }
    }

    /// The provider API this reconciler writes to.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Ensure a TXT record holding `value` exists at `fqdn`.
    ///
    /// Safe to call repeatedly; an existing record is never duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::PolicyDenied`] if the zone is not allowed, or
    /// the provider error if reading or writing the RRSet fails.
    pub async fn present(&self, zone: &str, fqdn: &str, value: &str) -> Result<(), SolverError> {
        self.settings.policy.check(zone)?;

        let name = self.api.name_mode().record_name(fqdn);
        let existing = locator::fetch_txt_rrset(&self.api, zone, &name)
            .await?
            .map(|rrset| rrset.records)
            .unwrap_or_default();

        let already_present = merge::contains_value(&existing, value);
        let records = merge::merge_add(existing, value);

        info!(
            zone = %zone,
            name = %name,
            already_present,
            "Presenting challenge record"
        );
        dispatch::replace_rrset(&self.api, zone, &name, self.settings.ttl, records).await
    }

    /// Remove the TXT record holding `value` at `fqdn`, leaving every other
    /// record at that name in place.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::PolicyDenied`] if the zone is not allowed,
    /// [`SolverError::RecordNotFound`] if the record is missing and the
    /// policy is [`MissingRecordPolicy::Error`], or the provider error if
    /// reading or writing the RRSet fails.
    pub async fn cleanup(&self, zone: &str, fqdn: &str, value: &str) -> Result<(), SolverError> {
        self.settings.policy.check(zone)?;

        let name = self.api.name_mode().record_name(fqdn);
        let existing = locator::fetch_txt_rrset(&self.api, zone, &name)
            .await?
            .map(|rrset| rrset.records)
            .unwrap_or_default();

        if !merge::contains_value(&existing, value) {
            return match self.settings.missing_record {
                MissingRecordPolicy::Ignore => {
                    warn!(
                        zone = %zone,
                        name = %name,
                        "Challenge record already absent, nothing to clean up"
                    );
                    Ok(())
                }
                MissingRecordPolicy::Error => Err(SolverError::RecordNotFound {
                    zone: zone.to_string(),
                    name,
                    content: merge::quote_txt(value),
                }),
            };
        }

        let records = merge::merge_remove(existing, value);

        info!(
            zone = %zone,
            name = %name,
            remaining = records.len(),
            "Cleaning up challenge record"
        );
        dispatch::replace_rrset(&self.api, zone, &name, self.settings.ttl, records).await
    }
}
