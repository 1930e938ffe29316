// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change dispatcher.
//!
//! Writes a full record list back as a single REPLACE change. The provider
//! has no per-record patch, so the whole set is always sent; an empty list
//! removes the RRSet.

use tracing::info;

use crate::constants::RECORD_TYPE_TXT;
use crate::errors::SolverError;
use crate::pdns::{ChangeType, NameMode, RRSet, RRSets, Record, ZoneApi};

/// Build the PATCH body replacing the TXT set at `name` with `records`.
///
/// Every record shares `ttl`. Pre-v1 servers additionally need name, type
/// and TTL on each record.
#[must_use]
pub fn build_replace_change(
    name: &str,
    ttl: u32,
    records: Vec<Record>,
    name_mode: NameMode,
) -> RRSets {
    let records = match name_mode {
        NameMode::Qualified => records,
        NameMode::Unqualified => records
            .into_iter()
            .map(|record| Record {
                name: Some(name.to_string()),
                record_type: Some(RECORD_TYPE_TXT.to_string()),
                ttl: Some(ttl),
                ..record
            })
            .collect(),
    };

    RRSets {
        rrsets: vec![RRSet {
            name: Some(name.to_string()),
            record_type: Some(RECORD_TYPE_TXT.to_string()),
            ttl: Some(ttl),
            changetype: Some(ChangeType::Replace),
            records,
        }],
    }
}

/// Replace the TXT set at `name` in `zone`.
///
/// # Errors
///
/// Returns the provider error if the PATCH fails; the zone is then unchanged.
pub async fn replace_rrset<A: ZoneApi + ?Sized>(
    api: &A,
    zone: &str,
    name: &str,
    ttl: u32,
    records: Vec<Record>,
) -> Result<(), SolverError> {
    let record_count = records.len();
    let change = build_replace_change(name, ttl, records, api.name_mode());

    api.patch_zone(zone, &change).await?;

    info!(
        zone = %zone,
        name = %name,
        ttl = ttl,
        records = record_count,
        "Replaced TXT RRSet"
    );
    Ok(())
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod dispatch_tests;
