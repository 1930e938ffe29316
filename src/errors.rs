// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the PowerDNS solver.
//!
//! This module provides the error taxonomy for challenge operations:
//! - Solver configuration problems (missing host, malformed config blob)
//! - Zone allow-list denials
//! - Credential lookup failures
//! - PowerDNS HTTP API failures (transport errors and non-2xx responses)
//! - Missing challenge records during cleanup
//!
//! Every variant carries enough context (zone, record name, URL, secret) to be
//! logged meaningfully by the caller.

use thiserror::Error;

/// Errors that can occur while presenting or cleaning up a DNS-01 challenge.
#[derive(Error, Debug, Clone)]
pub enum SolverError {
    /// Invalid or incomplete solver configuration
    ///
    /// Returned when the issuer config blob cannot be decoded, when required
    /// fields (`host`, `apiKeySecretRef`) are missing, or when values such as
    /// the CA bundle or extra headers cannot be applied to the HTTP client.
    #[error("Invalid solver configuration: {reason}")]
    Configuration {
        /// Explanation of what is invalid
        reason: String,
    },

    /// The zone is not covered by the configured allow-list
    #[error("Zone '{zone}' may not be edited per config (allowed zones are {allowed:?})")]
    PolicyDenied {
        /// The zone that was rejected
        zone: String,
        /// The configured allow-list
        allowed: Vec<String>,
    },

    /// The API key secret or the key within it could not be read
    #[error("Failed loading API key secret {namespace}/{name}: {reason}")]
    Credential {
        /// Namespace the secret was looked up in
        namespace: String,
        /// Name of the secret
        name: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// PowerDNS API request failed
    ///
    /// Covers transport failures (connection refused, timeout, TLS, unreadable
    /// body) where `status` is `None`, non-success HTTP responses where
    /// `status` holds the code and `reason` the response body, and success
    /// responses whose body does not decode.
    #[error("PowerDNS request {method} {url} failed{}: {reason}", format_status(.status))]
    ProviderRequest {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Response body or transport error description
        reason: String,
    },

    /// No TXT record with the challenge value exists at the record name
    ///
    /// Only returned by cleanup when the missing-record policy is `error`.
    #[error("No TXT record with content {content} found at '{name}' in zone '{zone}'")]
    RecordNotFound {
        /// The zone that was searched
        zone: String,
        /// The record name that was searched
        name: String,
        /// The quoted content that was not found
        content: String,
    },
}

fn format_status(status: &Option<u16>) -> String {
    status.map(|code| format!(" (HTTP {code})")).unwrap_or_default()
}

impl SolverError {
    /// Shorthand for a [`SolverError::Configuration`] error.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns true if re-invoking the same operation may succeed.
    ///
    /// Only provider failures are retryable: the fetch is read-only and the
    /// dispatched REPLACE is idempotent. A 4xx other than 429 means the
    /// request itself is wrong and will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProviderRequest { status, .. } => match status {
                None => true,
                Some(code) => *code == 429 || *code >= 500,
            },
            Self::Configuration { .. }
            | Self::PolicyDenied { .. }
            | Self::Credential { .. }
            | Self::RecordNotFound { .. } => false,
        }
    }

    /// Returns a short, stable reason code for this error.
    ///
    /// Used as a structured logging field so failures can be aggregated
    /// without parsing messages.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "ConfigurationError",
            Self::PolicyDenied { .. } => "PolicyDenied",
            Self::Credential { .. } => "CredentialError",
            Self::ProviderRequest {
                status: Some(401 | 403),
                ..
            } => "ProviderAuthFailed",
            Self::ProviderRequest {
                status: Some(404), ..
            } => "ProviderZoneNotFound",
            Self::ProviderRequest { status: None, .. } => "ProviderUnreachable",
            Self::ProviderRequest { .. } => "ProviderRequestFailed",
            Self::RecordNotFound { .. } => "RecordNotFound",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
