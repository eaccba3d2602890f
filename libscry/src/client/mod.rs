//! HTTP client for the registry wire protocol and the package metadata API.
//!
//! A thin client built on reqwest. Four registry endpoints (token, tags,
//! manifest by reference, blob by digest) plus the organization-scoped
//! package listing; every call is a plain GET with `Accept` and optional
//! `Authorization` headers, bounded by the configured timeout.

use crate::error::{Result, ScryError};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use sha2::{Digest as Sha2Digest, Sha256};
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Media types accepted when fetching a manifest by reference.
const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json, \
     application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json, \
     application/vnd.docker.distribution.manifest.list.v2+json";

/// Response from the token endpoint. Either field may carry the value.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Response from the tags list endpoint.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    /// Repository name
    name: String,
    /// List of tag names; null for an empty repository
    #[serde(default)]
    tags: Vec<String>,
}

/// One package as returned by the organization package listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRecord {
    /// Bare package name (no namespace)
    pub name: String,
    /// Side-channel description; often absent
    #[serde(default)]
    pub description: Option<String>,
}

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 20)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 20,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the maximum idle connections per host.
    pub fn with_max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = max;
        self
    }
}

/// HTTP client for registry and metadata-API operations.
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://ghcr.io")
    registry_url: String,
    /// Registry host without scheme, used as the token `service` value
    registry_host: String,
    /// Base metadata API URL (e.g., "https://api.github.com")
    api_url: String,
}

impl Client {
    /// Creates a new client with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libscry::client::Client;
    ///
    /// let client = Client::new("https://ghcr.io", "https://api.github.com").unwrap();
    /// ```
    pub fn new(registry_url: &str, api_url: &str) -> Result<Self> {
        Self::with_config(registry_url, api_url, ClientConfig::default())
    }

    /// Creates a new client with custom configuration.
    pub fn with_config(registry_url: &str, api_url: &str, config: ClientConfig) -> Result<Self> {
        let registry_url = Self::normalize_url(registry_url)?;
        let api_url = Self::normalize_url(api_url)?;

        let registry_host = registry_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .to_string();

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .user_agent(concat!("scry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScryError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url,
            registry_host,
            api_url,
        })
    }

    /// Normalizes a URL by ensuring it has a scheme and no trailing slash.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(ScryError::validation("URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Returns the base metadata API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Requests a pull-scoped bearer token for a repository.
    ///
    /// With `basic` identity material the request authenticates with
    /// Basic auth; otherwise it is anonymous. The returned token may be
    /// empty if the endpoint answered without one.
    pub async fn fetch_token(
        &self,
        repository: &str,
        basic: Option<(&str, &str)>,
    ) -> Result<String> {
        let url = format!(
            "{}/token?service={}&scope=repository:{}:pull",
            self.registry_url, self.registry_host, repository
        );

        let mut request = self.http_client.get(&url);
        if let Some((username, secret)) = basic {
            request = request.basic_auth(username, Some(secret));
        }

        let response = self.send(request).await?;
        let response = Self::check_response_status(response).await?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ScryError::validation_with_source("Failed to parse token response", e))?;

        Ok(body.token.or(body.access_token).unwrap_or_default())
    }

    /// Fetches one bounded page of tags for a repository.
    pub async fn fetch_tags(
        &self,
        repository: &str,
        token: Option<&str>,
        page_size: usize,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/v2/{}/tags/list?n={}",
            self.registry_url, repository, page_size
        );

        let request = Self::with_bearer(self.http_client.get(&url), token);
        let response = self.send(request).await?;
        let response = Self::check_response_status(response).await?;

        let tags_response: TagsResponse = response
            .json()
            .await
            .map_err(|e| ScryError::validation_with_source("Failed to parse tags response", e))?;

        if tags_response.name != repository {
            return Err(ScryError::validation(format!(
                "Registry returned tags for '{}' but expected '{}'",
                tags_response.name, repository
            )));
        }

        Ok(tags_response.tags)
    }

    /// Fetches a manifest by tag or digest, accepting both single-manifest
    /// and index media types.
    pub async fn fetch_manifest(
        &self,
        repository: &str,
        reference: &str,
        token: Option<&str>,
    ) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.registry_url, repository, reference
        );

        let request = Self::with_bearer(
            self.http_client.get(&url).header("Accept", MANIFEST_ACCEPT),
            token,
        );
        let response = self.send(request).await?;
        let response = Self::check_response_status(response).await?;

        let manifest_bytes = response
            .bytes()
            .await
            .map_err(|e| ScryError::network_with_source("Failed to read manifest response", e))?;

        Ok(manifest_bytes.to_vec())
    }

    /// Fetches a blob by digest and verifies its content against it.
    pub async fn fetch_blob(
        &self,
        repository: &str,
        digest: &str,
        token: Option<&str>,
    ) -> Result<Vec<u8>> {
        let (algorithm, expected_hex) = digest.split_once(':').ok_or_else(|| {
            ScryError::validation(format!("Invalid digest format: '{}'", digest))
        })?;
        if algorithm != "sha256" {
            return Err(ScryError::validation(format!(
                "Unsupported digest algorithm: {}. Only sha256 is supported",
                algorithm
            )));
        }

        let url = format!("{}/v2/{}/blobs/{}", self.registry_url, repository, digest);

        let request = Self::with_bearer(self.http_client.get(&url), token);
        let response = self.send(request).await?;
        let response = Self::check_response_status(response).await?;

        let blob_bytes = response
            .bytes()
            .await
            .map_err(|e| ScryError::network_with_source("Failed to read blob response", e))?;

        let mut hasher = Sha256::new();
        hasher.update(&blob_bytes);
        let computed_hash = format!("{:x}", hasher.finalize());

        if computed_hash != expected_hex {
            return Err(ScryError::validation(format!(
                "Blob digest mismatch: expected {}, computed sha256:{}",
                digest, computed_hash
            )));
        }

        Ok(blob_bytes.to_vec())
    }

    /// Lists one bounded page of container packages for an organization
    /// from the metadata API.
    pub async fn fetch_org_packages(
        &self,
        organization: &str,
        per_page: usize,
        bearer: Option<&str>,
    ) -> Result<Vec<PackageRecord>> {
        let url = format!(
            "{}/orgs/{}/packages?package_type=container&per_page={}",
            self.api_url, organization, per_page
        );

        let request = Self::with_bearer(
            self.http_client
                .get(&url)
                .header("Accept", "application/vnd.github+json"),
            bearer,
        );
        let response = self.send(request).await?;
        let response = Self::check_response_status(response).await?;

        response.json().await.map_err(|e| {
            ScryError::validation_with_source("Failed to parse package listing", e)
        })
    }

    /// Adds a bearer Authorization header when a non-empty token is given.
    fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| Self::translate_reqwest_error(e, &self.registry_url))
    }

    /// Translates a reqwest error into a ScryError.
    fn translate_reqwest_error(error: reqwest::Error, registry_url: &str) -> ScryError {
        if error.is_timeout() {
            ScryError::network(format!("Request to {} timed out", registry_url))
        } else if error.is_connect() {
            ScryError::network_with_source(
                format!("Failed to connect to {}", registry_url),
                error,
            )
        } else if error.is_request() {
            ScryError::network_with_source(
                format!("Failed to send request to {}", registry_url),
                error,
            )
        } else {
            ScryError::network_with_source(
                format!("Network error communicating with {}", registry_url),
                error,
            )
        }
    }

    /// Checks the HTTP response status and translates errors to ScryError.
    async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(ScryError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(ScryError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(ScryError::not_found("endpoint", &url)),
            StatusCode::TOO_MANY_REQUESTS => Err(ScryError::rate_limit(
                format!("Rate limit exceeded for {}", url),
                None,
            )),
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Err(ScryError::server(
                format!("Server error from {}: {}", url, error_body),
                status.as_u16(),
            )),
            _ => Err(ScryError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }
}
