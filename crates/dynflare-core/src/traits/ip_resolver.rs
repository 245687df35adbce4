// # IP Resolver Trait
//
// Defines the interface for fetching the caller's current public IP.
//
// ## Implementations
//
// - HTTP lookup service: `dynflare-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dynflare_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let ip = resolver.current().await?;
//     println!("public IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

/// A public IP address as reported by the lookup service
///
/// The value is kept as text and compared by exact string equality.
/// Format validation is left to the resolver, if it wants any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicIp(String);

impl PublicIp {
    /// Wrap a lookup result, trimming surrounding whitespace and newlines
    pub fn new(ip: impl AsRef<str>) -> Self {
        Self(ip.as_ref().trim().to_string())
    }

    /// The address as text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PublicIp {
    fn from(ip: &str) -> Self {
        Self::new(ip)
    }
}

impl From<String> for PublicIp {
    fn from(ip: String) -> Self {
        Self::new(ip)
    }
}

impl AsRef<str> for PublicIp {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trait for IP resolver implementations
///
/// # Contract
///
/// - Every call performs a live lookup. No caching.
/// - One request per call. No retries; retry policy belongs to whoever
///   invokes the reconciliation pass.
/// - Any non-success status is an error.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Fetch the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: The current address, trimmed
    /// - `Err(Error::Network)`: The lookup service could not be reached
    /// - `Err(Error::UnexpectedStatus)`: The lookup service answered with a non-2xx status
    async fn current(&self) -> Result<PublicIp, crate::Error>;

    /// Resolver name (for logging)
    fn resolver_name(&self) -> &'static str;
}
