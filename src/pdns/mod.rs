// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS HTTP API access.
//!
//! This module provides the provider-API abstraction shared by the RRSet
//! locator and the change dispatcher:
//!
//! - [`ZoneApi`] - the two calls the reconciler needs (read a zone, PATCH its RRSets)
//! - [`PowerDnsClient`] - the reqwest-backed implementation
//! - [`types`] - wire types for zones, RRSets and records
//!
//! # Example
//!
//! ```rust,no_run
//! use pdns_webhook::pdns::{ClientSettings, PowerDnsClient, ZoneApi};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = ClientSettings::new("https://dns.example.com", "secret-api-key");
//! let client = PowerDnsClient::new(&settings)?;
//!
//! let zone = client.get_zone("example.com.").await?;
//! println!("{} rrsets", zone.rrsets.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::{ClientSettings, PowerDnsClient};
pub use types::{ApiVersion, ChangeType, NameMode, RRSet, RRSets, Record, Zone};

use async_trait::async_trait;

use crate::errors::SolverError;

/// Zone-level operations against an authoritative DNS provider.
///
/// Implementations perform exactly one provider round trip per call and never
/// retry; retrying is left to whoever invokes the solver.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Fetch a zone with all of its RRSets.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ProviderRequest`] on transport failure, a
    /// non-success status, or an undecodable body.
    async fn get_zone(&self, zone: &str) -> Result<Zone, SolverError>;

    /// Apply RRSet changes to a zone in a single atomic request.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ProviderRequest`] on transport failure or a
    /// non-success status.
    async fn patch_zone(&self, zone: &str, changes: &RRSets) -> Result<(), SolverError>;

    /// How record names must be rendered for this provider.
    fn name_mode(&self) -> NameMode;
}
