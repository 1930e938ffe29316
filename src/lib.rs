// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # pdns-webhook - PowerDNS DNS-01 solver for cert-manager
//!
//! Publishes and removes ACME DNS-01 challenge TXT records on a PowerDNS
//! authoritative server through its HTTP API.
//!
//! ## Overview
//!
//! PowerDNS only replaces whole RRSets, so every operation is a
//! read-modify-write: fetch the TXT set at the challenge name, add or remove
//! exactly the challenge value, and write the full list back as a single
//! REPLACE. Other records at the same name, including concurrent challenges
//! for the same domain, are preserved.
//!
//! ## Modules
//!
//! - [`solver`] - cert-manager solver facade (`present`, `cleanup`, `initialize`)
//! - [`reconciler`] - policy check, locate, merge and dispatch pipeline
//! - [`pdns`] - PowerDNS API client and wire types
//! - [`policy`] - zone allow-list
//! - [`config`] - per-issuer configuration decoding
//! - [`credentials`] - API key lookup from Kubernetes Secrets
//! - [`errors`] - error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use pdns_webhook::pdns::Record;
//! use pdns_webhook::reconciler::merge::{merge_add, merge_remove};
//!
//! let existing = vec![Record::enabled("\"other\"")];
//! let presented = merge_add(existing.clone(), "token");
//! assert_eq!(presented.len(), 2);
//! assert_eq!(merge_remove(presented, "token"), existing);
//! ```

pub mod config;
pub mod constants;
pub mod credentials;
pub mod errors;
pub mod pdns;
pub mod policy;
pub mod reconciler;
pub mod solver;
