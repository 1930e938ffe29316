// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! RRSet locator.
//!
//! Reads the current TXT RRSet for a record name. The provider only serves
//! whole zones, so the zone is fetched and scanned; a missing RRSet is a
//! normal state and comes back as `None`.

use tracing::debug;

use crate::errors::SolverError;
use crate::pdns::{RRSet, ZoneApi};

/// Find the TXT RRSet whose name is exactly `name`.
#[must_use]
pub fn find_txt_rrset<'a>(rrsets: &'a [RRSet], name: &str) -> Option<&'a RRSet> {
    rrsets.iter().find(|rrset| rrset.is_txt_at(name))
}

/// Fetch the TXT RRSet at `name` in `zone` with one provider round trip.
///
/// `name` must already be rendered for the provider's name mode.
///
/// # Errors
///
/// Returns the provider error if the zone cannot be read.
pub async fn fetch_txt_rrset<A: ZoneApi + ?Sized>(
    api: &A,
    zone: &str,
    name: &str,
) -> Result<Option<RRSet>, SolverError> {
    let zone_data = api.get_zone(zone).await?;
    let rrset = find_txt_rrset(&zone_data.rrsets, name).cloned();

    debug!(
        zone = %zone,
        name = %name,
        found = rrset.is_some(),
        records = rrset.as_ref().map_or(0, |set| set.records.len()),
        "Located TXT RRSet"
    );

    Ok(rrset)
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod locator_tests;
