//! Opsdash capability catalog client.
//!
//! This crate owns the boundary to the permission-administration API. It
//! focuses on:
//!
//! - The [`CapabilitySource`] seam the engine's catalog loader fetches through
//! - A reqwest-backed [`DashboardClient`] that lists capability records with a
//!   bearer credential
//! - File and in-memory sources for offline use and tests
//! - A cloneable, credential-free [`CatalogError`] taxonomy
//!
//! # Example
//!
//! ```ignore
//! use opsdash_api::{CapabilitySource, DashboardClient};
//!
//! async fn load(credential: &str) -> anyhow::Result<()> {
//!     let client = DashboardClient::new("https://dashboard.example.com/api")?;
//!     let records = client.fetch_capabilities(credential).await?;
//!     println!("{} capabilities", records.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod source;

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use opsdash_types::CapabilityRecord;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use tracing::debug;

pub use error::CatalogError;
pub use source::{CapabilitySource, FileCapabilitySource, StaticCapabilitySource, decode_capability_list};

/// Environment variable overriding the API base URL.
pub const API_BASE_ENV: &str = "OPSDASH_API_BASE";
/// Base URL used when neither configuration nor environment provide one.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
/// Endpoint listing the capability catalog, relative to the base URL.
pub const DEFAULT_CAPABILITIES_PATH: &str = "/permissions";

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];
/// Upper bound on how much of an error body is echoed into messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the dashboard API.
///
/// The credential is supplied per request rather than baked into default
/// headers: it changes on re-login while the client lives for the process.
pub struct DashboardClient {
    pub base_url: String,
    pub capabilities_path: String,
    pub http: Client,
    pub user_agent: String,
}

impl DashboardClient {
    /// Construct a client against `base_url`.
    ///
    /// Non-localhost hosts must use HTTPS.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            capabilities_path: DEFAULT_CAPABILITIES_PATH.to_string(),
            http,
            user_agent: format!("opsdash/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Construct a client from `OPSDASH_API_BASE`, falling back to `fallback`
    /// and then to [`DEFAULT_API_BASE`].
    pub fn from_env(fallback: Option<&str>) -> Result<Self> {
        let base_url = env::var(API_BASE_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| fallback.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(&base_url)
    }

    /// Override the endpoint used to list capabilities.
    pub fn with_capabilities_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.capabilities_path = if path.starts_with('/') { path } else { format!("/{path}") };
        self
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path,
    /// authenticated with `credential`.
    pub fn request(&self, method: reqwest::Method, path: &str, credential: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
            .bearer_auth(credential)
    }

    /// Lists the full capability catalog. No pagination or filtering.
    pub async fn list_capabilities(&self, credential: &str) -> Result<Vec<CapabilityRecord>, CatalogError> {
        let response = self
            .request(reqwest::Method::GET, &self.capabilities_path, credential)
            .send()
            .await
            .map_err(|error| CatalogError::transport(error.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| CatalogError::transport(error.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CatalogError::Unauthorized { status: status.as_u16() });
        }
        if !status.is_success() {
            let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(CatalogError::http(status.as_u16(), excerpt));
        }

        let records = decode_capability_list(&body)?;
        debug!(count = records.len(), "capability catalog fetched");
        Ok(records)
    }
}

#[async_trait]
impl CapabilitySource for DashboardClient {
    async fn fetch_capabilities(&self, credential: &str) -> Result<Vec<CapabilityRecord>, CatalogError> {
        self.list_capabilities(credential).await
    }
}

/// Plain HTTP is only accepted for loopback hosts; everything else must use
/// https so the bearer credential never crosses the network in clear text.
fn validate_base_url(base: &str) -> Result<()> {
    let url = Url::parse(base).with_context(|| format!("Invalid API base URL '{base}'"))?;
    let Some(host) = url.host_str() else {
        bail!("API base URL '{base}' has no host");
    };

    let loopback = LOCALHOST_DOMAINS.iter().any(|local| host.eq_ignore_ascii_case(local));
    if !loopback && url.scheme() != "https" {
        bail!("API base URL must use https unless it points at localhost; got '{base}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_may_use_plain_http() {
        assert!(validate_base_url("http://localhost:8080/api").is_ok());
        assert!(validate_base_url("http://127.0.0.1:3000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        let error = validate_base_url("http://dashboard.example.com").unwrap_err();
        assert!(error.to_string().contains("https"), "unexpected error: {error}");
        assert!(validate_base_url("https://dashboard.example.com/api").is_ok());
    }

    #[test]
    fn rejects_unparsable_urls() {
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn capabilities_path_is_normalized_and_trailing_slash_trimmed() {
        let client = DashboardClient::new("http://localhost:8080/api/")
            .expect("build client")
            .with_capabilities_path("admin/permissions");
        assert_eq!(client.base_url, "http://localhost:8080/api");
        assert_eq!(client.capabilities_path, "/admin/permissions");
    }

    #[test]
    fn request_carries_bearer_credential() {
        let client = DashboardClient::new("http://localhost:8080").expect("build client");
        let request = client
            .request(reqwest::Method::GET, "/permissions", "token-123")
            .build()
            .expect("build request");
        assert_eq!(request.url().as_str(), "http://localhost:8080/permissions");
        let authorization = request.headers().get(header::AUTHORIZATION).expect("authorization header");
        assert_eq!(authorization.to_str().unwrap(), "Bearer token-123");
    }
}
