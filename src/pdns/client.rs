// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! reqwest-backed PowerDNS API client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;

use super::types::{ApiVersion, NameMode, RRSets, Zone};
use super::ZoneApi;
use crate::constants::{
    API_DISCOVERY_PATH, API_KEY_HEADER, API_V1_PREFIX, CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_SERVER_ID,
};
use crate::errors::SolverError;
use crate::policy::normalize_zone;

/// Everything needed to build a [`PowerDnsClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base URL of the PowerDNS API, e.g. `https://dns.example.com`
    pub host: String,
    /// Value sent in the `X-API-Key` header
    pub api_key: String,
    /// PowerDNS server id
    pub server_id: String,
    /// Extra headers; these override the defaults
    pub headers: BTreeMap<String, String>,
    /// PEM bundle replacing the system trust store
    pub ca_bundle: Option<Vec<u8>>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Record name rendering and API root
    pub name_mode: NameMode,
}

impl ClientSettings {
    /// Settings with defaults for everything but the host and API key.
    #[must_use]
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            server_id: DEFAULT_SERVER_ID.to_string(),
            headers: BTreeMap::new(),
            ca_bundle: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            name_mode: NameMode::default(),
        }
    }
}

/// Client for the PowerDNS HTTP API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct PowerDnsClient {
    http: HttpClient,
    base_url: Url,
    server_id: String,
    name_mode: NameMode,
}

impl PowerDnsClient {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Configuration`] if the host is not a valid base
    /// URL, a header name or value is invalid, or the CA bundle holds no
    /// certificates.
    pub fn new(settings: &ClientSettings) -> Result<Self, SolverError> {
        let base_url = Url::parse(settings.host.trim()).map_err(|e| {
            SolverError::configuration(format!("invalid PowerDNS host '{}': {e}", settings.host))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SolverError::configuration(format!(
                "PowerDNS host '{}' cannot be used as a base URL",
                settings.host
            )));
        }

        let mut builder = HttpClient::builder()
            .default_headers(build_headers(&settings.api_key, &settings.headers)?)
            .timeout(settings.timeout);

        if let Some(pem) = settings.ca_bundle.as_deref().filter(|pem| !pem.is_empty()) {
            let certificates = reqwest::Certificate::from_pem_bundle(pem).map_err(|e| {
                SolverError::configuration(format!("failed to load CA bundle: {e}"))
            })?;
            if certificates.is_empty() {
                return Err(SolverError::configuration(
                    "failed to load certificate(s) from CA bundle",
                ));
            }
            builder = builder.tls_certs_only(certificates);
        }

        let http = builder
            .build()
            .map_err(|e| SolverError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            server_id: settings.server_id.clone(),
            name_mode: settings.name_mode,
        })
    }

    /// Replace the name mode, e.g. with the result of [`Self::detect_name_mode`].
    #[must_use]
    pub fn with_name_mode(mut self, name_mode: NameMode) -> Self {
        self.name_mode = name_mode;
        self
    }

    /// Highest API version advertised by the server at `GET /api`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::ProviderRequest`] if the discovery call fails.
    pub async fn api_version(&self) -> Result<u32, SolverError> {
        let url = self.url_for(&[API_DISCOVERY_PATH])?;
        let (status, body) = self.request::<()>(Method::GET, url.clone(), None).await?;
        let versions: Vec<ApiVersion> = decode(&Method::GET, &url, status, &body)?;

        Ok(versions.iter().map(|v| v.version).max().unwrap_or(0))
    }

    /// Determine how this server addresses record names.
    ///
    /// A 404 from the discovery endpoint means the server predates it and
    /// wants unqualified names. Any other failure keeps the qualified
    /// default and logs a warning.
    pub async fn detect_name_mode(&self) -> NameMode {
        match self.api_version().await {
            Ok(version) => {
                let mode = NameMode::for_api_version(version);
                debug!(version, ?mode, "Detected PowerDNS API version");
                mode
            }
            Err(SolverError::ProviderRequest {
                status: Some(404), ..
            }) => {
                debug!("PowerDNS API discovery endpoint missing, assuming pre-v1 API");
                NameMode::Unqualified
            }
            Err(e) => {
                warn!(error = %e, "Failed to get PowerDNS API version, assuming v1");
                NameMode::Qualified
            }
        }
    }

    /// URL of a zone resource.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Configuration`] if the base URL cannot take path segments.
    pub fn zone_url(&self, zone: &str) -> Result<Url, SolverError> {
        let zone_id = normalize_zone(zone);
        let tail = ["servers", self.server_id.as_str(), "zones", zone_id.as_str()];
        match self.name_mode {
            NameMode::Qualified => {
                let mut segments: Vec<&str> = API_V1_PREFIX.to_vec();
                segments.extend(tail);
                self.url_for(&segments)
            }
            NameMode::Unqualified => self.url_for(&tail),
        }
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url, SolverError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SolverError::configuration(format!(
                    "PowerDNS host '{}' cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and return the status code and response body.
    ///
    /// Non-success statuses become [`SolverError::ProviderRequest`] carrying
    /// the status code and response body. A body that cannot be read is a
    /// transport failure.
    async fn request<T: Serialize + std::fmt::Debug + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&T>,
    ) -> Result<(u16, String), SolverError> {
        info!(
            method = %method,
            url = %url,
            body = ?body,
            "HTTP API request to PowerDNS"
        );

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(body_data) = body {
            request = request.json(body_data);
        }

        let response = request.send().await.map_err(|e| {
            error!(method = %method, url = %url, error = %e, "Failed to send HTTP request");
            SolverError::ProviderRequest {
                method: method.to_string(),
                url: url.to_string(),
                status: None,
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %e,
                "Failed to read HTTP response body"
            );
            SolverError::ProviderRequest {
                method: method.to_string(),
                url: url.to_string(),
                status: None,
                reason: format!("failed to read response body: {e}"),
            }
        })?;

        if !status.is_success() {
            error!(
                method = %method,
                url = %url,
                status = %status,
                error = %text,
                "HTTP API request failed"
            );
            return Err(SolverError::ProviderRequest {
                method: method.to_string(),
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: text,
            });
        }

        debug!(method = %method, url = %url, status = %status, "HTTP API request succeeded");
        Ok((status.as_u16(), text))
    }
}

#[async_trait]
impl ZoneApi for PowerDnsClient {
    async fn get_zone(&self, zone: &str) -> Result<Zone, SolverError> {
        let url = self.zone_url(zone)?;
        let (status, body) = self.request::<()>(Method::GET, url.clone(), None).await?;
        decode(&Method::GET, &url, status, &body)
    }

    async fn patch_zone(&self, zone: &str, changes: &RRSets) -> Result<(), SolverError> {
        let url = self.zone_url(zone)?;
        self.request(Method::PATCH, url, Some(changes)).await?;
        Ok(())
    }

    fn name_mode(&self) -> NameMode {
        self.name_mode
    }
}

/// Default headers (API key, JSON content type) overlaid with `extra`.
fn build_headers(
    api_key: &str,
    extra: &BTreeMap<String, String>,
) -> Result<HeaderMap, SolverError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-api-key"),
        sensitive_value(API_KEY_HEADER, api_key)?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            SolverError::configuration(format!("invalid header name '{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            SolverError::configuration(format!("invalid value for header '{name}': {e}"))
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn sensitive_value(name: &str, value: &str) -> Result<HeaderValue, SolverError> {
    let mut header_value = HeaderValue::from_str(value.trim()).map_err(|e| {
        SolverError::configuration(format!("invalid value for header '{name}': {e}"))
    })?;
    header_value.set_sensitive(true);
    Ok(header_value)
}

/// Decode a successful response body.
///
/// A body that does not decode keeps the response status, so it is reported
/// as a non-retryable provider failure rather than an unreachable server.
fn decode<T: serde::de::DeserializeOwned>(
    method: &Method,
    url: &Url,
    status: u16,
    body: &str,
) -> Result<T, SolverError> {
    serde_json::from_str(body).map_err(|e| SolverError::ProviderRequest {
        method: method.to_string(),
        url: url.to_string(),
        status: Some(status),
        reason: format!("failed to decode response: {e}"),
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;
