// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the PowerDNS HTTP API.
//!
//! Every field the server may omit is optional or defaulted so partial
//! responses decode instead of failing.

use serde::{Deserialize, Serialize};

use crate::constants::RECORD_TYPE_TXT;

/// How record names are addressed in API calls.
///
/// Pre-v1 servers expect unqualified names (`_acme-challenge.example.com`),
/// v1 and later expect fully-qualified names with a trailing dot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMode {
    /// Trailing-dot FQDNs under `/api/v1`
    #[default]
    Qualified,
    /// Names without trailing dot, API rooted at `/`
    Unqualified,
}

impl NameMode {
    /// Pick the mode for the highest API version a server advertises.
    #[must_use]
    pub fn for_api_version(version: u32) -> Self {
        if version >= crate::constants::FIRST_QUALIFIED_API_VERSION {
            Self::Qualified
        } else {
            Self::Unqualified
        }
    }

    /// Render a record name the way this mode addresses it.
    ///
    /// Names are lower-cased, matching how the server returns RRSet names.
    #[must_use]
    pub fn record_name(self, name: &str) -> String {
        let bare = name.trim().trim_end_matches('.').to_ascii_lowercase();
        match self {
            Self::Qualified => format!("{bare}."),
            Self::Unqualified => bare.to_string(),
        }
    }
}

/// Kind of change applied to an RRSet by a PATCH request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Substitute the whole record list; an empty list removes the RRSet
    Replace,
}

/// A single record inside an RRSet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record data; for TXT this is the quoted value
    #[serde(default)]
    pub content: String,
    /// Whether the server ignores this record
    #[serde(default)]
    pub disabled: bool,
    /// Record name, only sent to pre-v1 servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Record type, only sent to pre-v1 servers
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// Record TTL, only sent to pre-v1 servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl Record {
    /// An enabled record with the given content.
    #[must_use]
    pub fn enabled(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
            ..Self::default()
        }
    }
}

/// A set of records sharing one name and type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    /// Owner name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Record type, e.g. `TXT`
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    /// TTL shared by every record in the set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Change to apply; only present in PATCH bodies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<ChangeType>,
    /// Records in server order
    #[serde(default)]
    pub records: Vec<Record>,
}

impl RRSet {
    /// Check whether this is the TXT set at exactly `name`.
    ///
    /// Sets with a missing name or type never match.
    #[must_use]
    pub fn is_txt_at(&self, name: &str) -> bool {
        self.record_type.as_deref() == Some(RECORD_TYPE_TXT) && self.name.as_deref() == Some(name)
    }
}

/// PATCH request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSets {
    /// Changes to apply atomically
    pub rrsets: Vec<RRSet>,
}

/// A zone as returned by `GET /servers/{server}/zones/{zone}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone id used in URLs
    #[serde(default)]
    pub id: Option<String>,
    /// Zone name
    #[serde(default)]
    pub name: Option<String>,
    /// Every RRSet in the zone
    #[serde(default)]
    pub rrsets: Vec<RRSet>,
}

/// One entry of the `GET /api` discovery response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiVersion {
    /// Path prefix of this version, e.g. `/api/v1`
    #[serde(default)]
    pub url: String,
    /// Version number
    pub version: u32,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
