// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-issuer solver configuration.
//!
//! cert-manager hands the solver the `config` block of the issuer's webhook
//! stanza as raw JSON on every challenge. This module decodes it, applies
//! defaults and validates the required fields:
//!
//! ```json
//! {
//!   "host": "https://powerdns.example.com",
//!   "apiKeySecretRef": { "name": "powerdns-api-key", "key": "api-key" },
//!   "serverID": "localhost",
//!   "ttl": 120,
//!   "timeout": 30,
//!   "headers": { "X-Tenant": "acme" },
//!   "caBundle": "<base64 PEM>",
//!   "allowedZones": ["example.com"],
//!   "nameMode": "qualified",
//!   "missingRecordPolicy": "ignore"
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer};

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SERVER_ID, DEFAULT_TXT_RECORD_TTL_SECS};
use crate::errors::SolverError;
use crate::pdns::{ClientSettings, NameMode};
use crate::policy::ZonePolicy;
use crate::reconciler::{MissingRecordPolicy, ReconcileSettings};

/// Reference to one key of a Kubernetes Secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SecretKeySelector {
    /// Name of the Secret
    #[serde(default)]
    pub name: String,
    /// Key within the Secret's data
    #[serde(default)]
    pub key: String,
}

/// How record names are rendered for the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameModeSetting {
    /// Ask the server for its API version once per client
    Auto,
    /// Fully-qualified names under `/api/v1`
    #[default]
    Qualified,
    /// Pre-v1 unqualified names
    Unqualified,
}

/// Decoded solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerDnsConfig {
    /// Base URL of the PowerDNS API (required)
    #[serde(default)]
    pub host: String,

    /// Secret key holding the API key (required)
    #[serde(default)]
    pub api_key_secret_ref: Option<SecretKeySelector>,

    /// PowerDNS server id; defaults to `localhost`
    #[serde(default, rename = "serverID")]
    pub server_id: Option<String>,

    /// Extra headers merged over the defaults
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,

    /// PEM CA bundle; base64 encoded in JSON, like any Kubernetes `[]byte`
    #[serde(default, deserialize_with = "ca_bundle_bytes")]
    pub ca_bundle: Option<Vec<u8>>,

    /// TTL of the challenge records in seconds
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Zones that may be edited; empty allows all
    #[serde(default, alias = "allowed-zones", deserialize_with = "null_as_default")]
    pub allowed_zones: Vec<String>,

    /// Record name rendering
    #[serde(default)]
    pub name_mode: NameModeSetting,

    /// Cleanup behaviour when the record is already gone
    #[serde(default)]
    pub missing_record_policy: MissingRecordPolicy,
}

impl PowerDnsConfig {
    /// Decode the raw issuer config.
    ///
    /// A missing config decodes to the defaults, which then fail
    /// [`PowerDnsConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Configuration`] if the JSON does not match the
    /// expected shape.
    pub fn from_json(raw: Option<&serde_json::Value>) -> Result<Self, SolverError> {
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Self::deserialize(value).map_err(|e| {
                SolverError::configuration(format!("error decoding solver config: {e}"))
            }),
        }
    }

    /// Check required fields and return the API key reference.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Configuration`] if the host or the API key
    /// secret reference is missing.
    pub fn validate(&self) -> Result<&SecretKeySelector, SolverError> {
        if self.host.trim().is_empty() {
            return Err(SolverError::configuration("no PowerDNS host provided"));
        }

        match &self.api_key_secret_ref {
            Some(selector) if !selector.name.trim().is_empty() => Ok(selector),
            _ => Err(SolverError::configuration("no PowerDNS API key provided")),
        }
    }

    /// Server id, falling back to `localhost`.
    #[must_use]
    pub fn server_id(&self) -> &str {
        match self.server_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_SERVER_ID,
        }
    }

    /// Record TTL; unset or zero means the default.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        self.ttl
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TXT_RECORD_TTL_SECS)
    }

    /// Request timeout; unset or zero means the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        )
    }

    /// Client settings for this config and API key.
    ///
    /// `auto` name mode starts out qualified; the solver replaces it with the
    /// detected mode.
    #[must_use]
    pub fn client_settings(&self, api_key: impl Into<String>) -> ClientSettings {
        ClientSettings {
            host: self.host.trim().to_string(),
            api_key: api_key.into(),
            server_id: self.server_id().to_string(),
            headers: self.headers.clone(),
            ca_bundle: self.ca_bundle.clone(),
            timeout: self.timeout(),
            name_mode: match self.name_mode {
                NameModeSetting::Unqualified => NameMode::Unqualified,
                NameModeSetting::Auto | NameModeSetting::Qualified => NameMode::Qualified,
            },
        }
    }

    /// Reconciler settings for this config.
    #[must_use]
    pub fn reconcile_settings(&self) -> ReconcileSettings {
        ReconcileSettings {
            ttl: self.ttl(),
            policy: ZonePolicy::new(&self.allowed_zones),
            missing_record: self.missing_record_policy,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts base64-encoded PEM, or plain PEM for hand-written configs.
fn ca_bundle_bytes<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(encoded) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with("-----BEGIN") {
        return Ok(Some(trimmed.as_bytes().to_vec()));
    }

    let compact: String = trimmed.split_whitespace().collect();
    BASE64
        .decode(compact)
        .map(Some)
        .map_err(|e| serde::de::Error::custom(format!("caBundle is not valid base64: {e}")))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
