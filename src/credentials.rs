// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! API key lookup.
//!
//! The issuer config only references the PowerDNS API key; the value lives in
//! a Kubernetes Secret in the challenge's resource namespace. The
//! [`CredentialStore`] trait keeps that lookup behind a seam so the solver can
//! run against a static key outside a cluster.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use tracing::debug;

use crate::config::SecretKeySelector;
use crate::errors::SolverError;

/// Resolves a secret key reference to its value.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read `selector.key` from secret `selector.name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Credential`] if the secret or the key does not
    /// exist, or the value cannot be read.
    async fn secret_value(
        &self,
        namespace: &str,
        selector: &SecretKeySelector,
    ) -> Result<String, SolverError>;
}

/// Reads API keys from Kubernetes Secrets.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Create a store over an existing Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialStore for KubeSecretStore {
    async fn secret_value(
        &self,
        namespace: &str,
        selector: &SecretKeySelector,
    ) -> Result<String, SolverError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secret_api.get(&selector.name).await.map_err(|e| {
            let reason = match &e {
                kube::Error::Api(ae) if ae.code == 404 => "secret not found".to_string(),
                _ => e.to_string(),
            };
            SolverError::Credential {
                namespace: namespace.to_string(),
                name: selector.name.clone(),
                reason,
            }
        })?;

        debug!(
            namespace = %namespace,
            secret = %selector.name,
            "Loaded API key secret"
        );

        let data: BTreeMap<String, Vec<u8>> = secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect();

        value_from_data(&data, namespace, selector)
    }
}

/// A fixed set of secrets, keyed by `(namespace, name)`.
///
/// Used by the CLI when the API key comes from the environment, and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    secrets: BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>,
    fallback: Option<String>,
}

impl StaticCredentialStore {
    /// A store that answers every lookup with `value`.
    #[must_use]
    pub fn with_fallback(value: impl Into<String>) -> Self {
        Self {
            secrets: BTreeMap::new(),
            fallback: Some(value.into()),
        }
    }

    /// Add one key of one secret.
    #[must_use]
    pub fn with_secret(
        mut self,
        namespace: &str,
        name: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        self.secrets
            .entry((namespace.to_string(), name.to_string()))
            .or_default()
            .insert(key.to_string(), value.into().into_bytes());
        self
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn secret_value(
        &self,
        namespace: &str,
        selector: &SecretKeySelector,
    ) -> Result<String, SolverError> {
        match self
            .secrets
            .get(&(namespace.to_string(), selector.name.clone()))
        {
            Some(data) => value_from_data(data, namespace, selector),
            None => self.fallback.clone().ok_or_else(|| SolverError::Credential {
                namespace: namespace.to_string(),
                name: selector.name.clone(),
                reason: "secret not found".to_string(),
            }),
        }
    }
}

/// Extract `selector.key` from secret data as a trimmed UTF-8 string.
fn value_from_data(
    data: &BTreeMap<String, Vec<u8>>,
    namespace: &str,
    selector: &SecretKeySelector,
) -> Result<String, SolverError> {
    let credential_error = |reason: String| SolverError::Credential {
        namespace: namespace.to_string(),
        name: selector.name.clone(),
        reason,
    };

    let bytes = data
        .get(&selector.key)
        .ok_or_else(|| credential_error(format!("key {:?} not found in secret", selector.key)))?;

    let value = std::str::from_utf8(bytes)
        .map_err(|e| credential_error(format!("key {:?} is not valid UTF-8: {e}", selector.key)))?
        .trim();

    if value.is_empty() {
        return Err(credential_error(format!("key {:?} is empty", selector.key)));
    }

    Ok(value.to_string())
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
