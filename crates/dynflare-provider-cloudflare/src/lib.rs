// # Cloudflare DNS Provider
//
// Implements `DnsProvider` against the Cloudflare API v4 using global API key
// authentication (`X-Auth-Key` + `X-Auth-Email`).
//
// ## Behavior
//
// - One HTTP request per operation: no lookups, no retries, no caching
// - Record identity (id, zone, type, name) comes from configuration and is
//   sent back unchanged; only `content` differs from the configured record
// - Non-2xx statuses and `success: false` envelopes are both errors
//
// ## Security Requirements
//
// - The API key NEVER appears in logs or `Debug` output
// - Missing credentials fail when the client is built, not on first request
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones`
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dynflare_core::config::CloudflareConfig;
use dynflare_core::traits::{DnsProvider, DnsRecord, PublicIp, Zone};
use dynflare_core::{Error, Result};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider name used in errors and logs
const PROVIDER: &str = "cloudflare";

/// Envelope wrapping every Cloudflare API v4 response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: Option<T>,
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<Value>,
}

/// Cloudflare API client
///
/// # Security
///
/// The Debug implementation does NOT expose the API key.
pub struct CloudflareClient {
    /// Global API key
    /// ⚠️ NEVER log this value
    key: String,

    /// Account email
    email: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// API root, without trailing slash
    base_url: String,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareClient")
            .field("key", &"<REDACTED>")
            .field("email", &self.email)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareClient {
    /// Create a new Cloudflare client
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the email or key is empty, or the HTTP
    /// client cannot be built.
    pub fn new(config: &CloudflareConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            key: config.key.clone(),
            email: config.email.clone(),
            client,
            base_url: CLOUDFLARE_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The API root requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one authenticated request and return the raw response body
    ///
    /// `context` names the operation in error messages ("Zone listing", ...).
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&DnsRecord>,
        context: &str,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(
            url = %url,
            verb = %method,
            body = ?body,
            "Sending request to Cloudflare"
        );

        let mut request = self
            .client
            .request(method, &url)
            .header("X-Auth-Key", &self.key)
            .header("X-Auth-Email", &self.email)
            .header("Content-Type", "application/json");
        if let Some(record) = body {
            request = request.json(record);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(PROVIDER, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::network(PROVIDER, format!("Failed to read response: {}", e)))?;

        tracing::debug!(status = status.as_u16(), body = %text, "Received response from Cloudflare");

        if !status.is_success() {
            return Err(status_error(status, &text, context));
        }

        Ok(text)
    }

    /// Send a request and unwrap the `result` of a successful envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&DnsRecord>,
        context: &str,
    ) -> Result<T> {
        let text = self.send(method, path, body, context).await?;
        unwrap_envelope(&text, context)
    }
}

/// Map a non-2xx status to an error
fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let message = match status.as_u16() {
        401 | 403 => format!(
            "Authentication failed: invalid API key/email or insufficient permissions ({})",
            context
        ),
        404 => format!("{} failed: not found - {}", context, body),
        409 => "Conflict: record is being updated by another process".to_string(),
        429 => "Rate limit exceeded. Please retry later".to_string(),
        500..=599 => format!("Cloudflare server error (transient): {}", body),
        _ => format!("{} failed: {}", context, body),
    };
    Error::unexpected_status(PROVIDER, status.as_u16(), message)
}

/// Parse an API envelope and return its `result`
fn unwrap_envelope<T: DeserializeOwned>(body: &str, context: &str) -> Result<T> {
    let envelope: ApiResponse<T> = serde_json::from_str(body).map_err(|e| {
        Error::invalid_response(PROVIDER, format!("Failed to parse {} response: {}", context, e))
    })?;

    if !envelope.success {
        return Err(Error::provider_rejected(
            PROVIDER,
            describe_errors(&envelope.errors),
        ));
    }

    envelope.result.ok_or_else(|| {
        Error::invalid_response(PROVIDER, format!("{} response has no result", context))
    })
}

/// Render the envelope's `errors` array as "code: message; ..."
fn describe_errors(errors: &[Value]) -> String {
    if errors.is_empty() {
        return "success=false with no error details".to_string();
    }

    errors
        .iter()
        .map(|e| match (e.get("code"), e.get("message").and_then(Value::as_str)) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (None, Some(message)) => message.to_string(),
            _ => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    /// Overwrite one record's content
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "id": "...", "type": "A", "name": "home.example.com",
    ///   "content": "203.0.113.7", "zone_id": "..."
    /// }
    /// ```
    async fn update_record(&self, record: &DnsRecord, new_ip: &PublicIp) -> Result<DnsRecord> {
        let payload = record.with_content(new_ip);
        let path = format!("/zones/{}/dns_records/{}", record.zone_id, record.id);

        let updated: DnsRecord = self
            .call(Method::PUT, &path, Some(&payload), "Record update")
            .await?;

        tracing::debug!(name = %record.name, "Cloudflare DNS record successfully updated");
        Ok(updated)
    }

    async fn zones(&self) -> Result<Vec<Zone>> {
        self.call(Method::GET, "/zones", None, "Zone listing").await
    }

    async fn records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let path = format!("/zones/{}/dns_records", zone_id);
        self.call(Method::GET, &path, None, "Record listing").await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
