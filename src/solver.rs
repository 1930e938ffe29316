// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! cert-manager DNS-01 solver facade.
//!
//! [`PowerDnsSolver`] follows the contract of a cert-manager webhook solver:
//! it is initialized once per process, then asked to present and clean up
//! challenges, possibly many times and concurrently. Each call decodes the
//! issuer config carried on the [`ChallengeRequest`], resolves the API key,
//! builds a PowerDNS client and runs the [`Reconciler`] once. Nothing
//! survives between calls except the credential store.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdns_webhook::solver::{ChallengeRequest, PowerDnsSolver};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut solver = PowerDnsSolver::new("acme.example.com");
//! solver.initialize().await?;
//!
//! let challenge = ChallengeRequest {
//!     resolved_fqdn: "_acme-challenge.example.com.".to_string(),
//!     resolved_zone: "example.com.".to_string(),
//!     key: "token".to_string(),
//!     resource_namespace: "cert-manager".to_string(),
//!     config: Some(serde_json::json!({
//!         "host": "https://powerdns.example.com",
//!         "apiKeySecretRef": {"name": "pdns", "key": "api-key"}
//!     })),
//!     ..ChallengeRequest::default()
//! };
//! solver.present(&challenge).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::{NameModeSetting, PowerDnsConfig};
use crate::constants::SOLVER_NAME;
use crate::credentials::{CredentialStore, KubeSecretStore};
use crate::errors::SolverError;
use crate::pdns::PowerDnsClient;
use crate::reconciler::Reconciler;

/// A challenge as delivered by cert-manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    /// Unique id of the challenge
    #[serde(default)]
    pub uid: String,
    /// Name being validated, e.g. `*.example.com`
    #[serde(default)]
    pub dns_name: String,
    /// Record name to write, e.g. `_acme-challenge.example.com.`
    #[serde(default, rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    /// Zone holding the record, e.g. `example.com.`
    #[serde(default)]
    pub resolved_zone: String,
    /// Value to publish in the TXT record
    #[serde(default)]
    pub key: String,
    /// Namespace used to resolve the API key secret
    #[serde(default)]
    pub resource_namespace: String,
    /// The issuer's solver config block
    #[serde(default)]
    pub config: Option<serde_json::Value>,
}

/// PowerDNS implementation of the cert-manager solver contract.
#[derive(Clone)]
pub struct PowerDnsSolver {
    group_name: String,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl std::fmt::Debug for PowerDnsSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerDnsSolver")
            .field("group_name", &self.group_name)
            .field("initialized", &self.credentials.is_some())
            .finish()
    }
}

impl PowerDnsSolver {
    /// Create an uninitialized solver serving under `group_name`.
    #[must_use]
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            credentials: None,
        }
    }

    /// Use a specific credential store instead of Kubernetes Secrets.
    ///
    /// A solver built this way needs no [`PowerDnsSolver::initialize`].
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Solver name as referenced by issuers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    /// API group the solver is served under.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Connect to Kubernetes for secret lookups.
    ///
    /// Must run once before the first challenge. Does nothing if a credential
    /// store was already supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if no Kubernetes client configuration is available.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.credentials.is_some() {
            return Ok(());
        }

        debug!("Initializing Kubernetes client");
        let client = kube::Client::try_default()
            .await
            .context("Failed to create Kubernetes client")?;
        self.credentials = Some(Arc::new(KubeSecretStore::new(client)));
        info!(group = %self.group_name, solver = SOLVER_NAME, "Solver initialized");
        Ok(())
    }

    /// Publish the challenge TXT record.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping a [`SolverError`], with the zone and FQDN as
    /// context.
    pub async fn present(&self, challenge: &ChallengeRequest) -> Result<()> {
        info!(
            dns_name = %challenge.dns_name,
            resolved_zone = %challenge.resolved_zone,
            resolved_fqdn = %challenge.resolved_fqdn,
            "Presenting challenge"
        );

        let result = async {
            let reconciler = self.reconciler_for(challenge).await?;
            reconciler
                .present(
                    &challenge.resolved_zone,
                    &challenge.resolved_fqdn,
                    &challenge.key,
                )
                .await
        }
        .await;

        log_failure("present", challenge, result.as_ref().err());
        result.with_context(|| {
            format!(
                "Failed presenting challenge for {} in zone {}",
                challenge.resolved_fqdn, challenge.resolved_zone
            )
        })
    }

    /// Remove the challenge TXT record, leaving other records at the same
    /// name untouched.
    ///
    /// # Errors
    ///
    /// Returns an error wrapping a [`SolverError`], with the zone and FQDN as
    /// context.
    pub async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<()> {
        info!(
            dns_name = %challenge.dns_name,
            resolved_zone = %challenge.resolved_zone,
            resolved_fqdn = %challenge.resolved_fqdn,
            "Cleaning challenge"
        );

        let result = async {
            let reconciler = self.reconciler_for(challenge).await?;
            reconciler
                .cleanup(
                    &challenge.resolved_zone,
                    &challenge.resolved_fqdn,
                    &challenge.key,
                )
                .await
        }
        .await;

        log_failure("cleanup", challenge, result.as_ref().err());
        result.with_context(|| {
            format!(
                "Failed cleaning up challenge for {} in zone {}",
                challenge.resolved_fqdn, challenge.resolved_zone
            )
        })
    }

    /// Decode and validate the config, check the zone policy, resolve the API
    /// key and build a reconciler for one challenge.
    async fn reconciler_for(
        &self,
        challenge: &ChallengeRequest,
    ) -> Result<Reconciler<PowerDnsClient>, SolverError> {
        let config = PowerDnsConfig::from_json(challenge.config.as_ref())?;
        let selector = config.validate()?;
        let settings = config.reconcile_settings();

        // Denied zones fail before the secret is read or the server is contacted
        settings.policy.check(&challenge.resolved_zone)?;

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SolverError::configuration("solver used before initialize() was called")
        })?;
        let api_key = credentials
            .secret_value(&challenge.resource_namespace, selector)
            .await?;

        let mut client = PowerDnsClient::new(&config.client_settings(api_key))?;
        if config.name_mode == NameModeSetting::Auto {
            let mode = client.detect_name_mode().await;
            client = client.with_name_mode(mode);
        }

        Ok(Reconciler::new(client, settings))
    }
}

/// Whether re-invoking the failed operation may succeed.
///
/// Errors that did not originate in the solver are treated as retryable.
#[must_use]
pub fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SolverError>()
        .is_none_or(SolverError::is_retryable)
}

fn log_failure(operation: &str, challenge: &ChallengeRequest, err: Option<&SolverError>) {
    if let Some(e) = err {
        error!(
            operation = operation,
            resolved_zone = %challenge.resolved_zone,
            resolved_fqdn = %challenge.resolved_fqdn,
            reason = e.status_reason(),
            retryable = e.is_retryable(),
            error = %e,
            "Challenge operation failed"
        );
    }
}

#[cfg(test)]
#[path = "solver_tests.rs"]
mod solver_tests;
