// # HTTP IP Resolver
//
// Looks up the host's public IP by asking an external echo service
// (`https://ifconfig.me/ip` by default) and reading the plain-text body.
//
// ## Behavior
//
// - One GET per call, no caching: every pass sees the address as it is now
// - Surrounding whitespace is trimmed
// - The body is not parsed as an IP address; it is compared verbatim with
//   the baseline, so any stable text the service returns works
// - An empty body is an error, never an "IP"

use dynflare_core::config::IpLookupConfig;
use dynflare_core::traits::{IpResolver, PublicIp};
use dynflare_core::{Error, Result};

use std::time::Duration;

use tracing::debug;

/// Service name used in errors and logs
const SERVICE: &str = "ip-lookup";

/// HTTP-based public IP resolver
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL returning the caller's IP as plain text
    url: String,

    /// HTTP client (carries the timeout)
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new HTTP IP resolver
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP from (e.g., "https://ifconfig.me/ip")
    /// - `timeout`: Whole-request timeout
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create from the `[ip_lookup]` configuration section
    pub fn from_config(config: &IpLookupConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn current(&self) -> Result<PublicIp> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(SERVICE, format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::unexpected_status(
                SERVICE,
                status.as_u16(),
                format!("{} answered {}: {}", self.url, status, body.trim()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(SERVICE, format!("Failed to read response: {}", e)))?;

        let ip = PublicIp::new(body);
        if ip.is_empty() {
            return Err(Error::invalid_response(
                SERVICE,
                format!("{} returned an empty body", self.url),
            ));
        }

        debug!(url = %self.url, ip = %ip, "Public IP resolved");
        Ok(ip)
    }

    fn resolver_name(&self) -> &'static str {
        "http"
    }
}
