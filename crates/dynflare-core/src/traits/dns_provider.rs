// # DNS Provider Trait
//
// Defines the interface for the DNS provider's API.
//
// ## Implementations
//
// - Cloudflare: `dynflare-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dynflare_core::{DnsProvider, DnsRecord, PublicIp};
//
// let provider = /* DnsProvider implementation */;
//
// for zone in provider.zones().await? {
//     for record in provider.records(&zone.id).await? {
//         println!("{} {} {}", record.name, record.record_type, record.content);
//     }
// }
//
// let updated = provider.update_record(&record, &PublicIp::from("203.0.113.7")).await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ip_resolver::PublicIp;

/// A DNS record reference plus its content value
///
/// The identity fields (`id`, `record_type`, `name`, `zone_id`) come from
/// configuration and are never looked up or inferred. Reconciliation only
/// ever changes `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider record ID
    pub id: String,
    /// Record type ("A", "AAAA", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully qualified record name
    pub name: String,
    /// Current content value
    #[serde(default)]
    pub content: String,
    /// Provider zone ID the record belongs to
    #[serde(default)]
    pub zone_id: String,
}

impl DnsRecord {
    /// Create a record reference with empty content
    pub fn new(
        id: impl Into<String>,
        record_type: impl Into<String>,
        name: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            name: name.into(),
            content: String::new(),
            zone_id: zone_id.into(),
        }
    }

    /// A copy of this record with `content` replaced by `ip`
    pub fn with_content(&self, ip: &PublicIp) -> Self {
        Self {
            content: ip.as_str().to_string(),
            ..self.clone()
        }
    }
}

/// A DNS zone (domain) on the provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider zone ID
    pub id: String,
    /// Zone name, e.g. "example.com"
    pub name: String,
    /// Provider-reported status, e.g. "active"
    #[serde(default)]
    pub status: String,
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// ## Allowed
/// - HTTP/HTTPS calls to the provider's own endpoints
/// - Parsing provider responses
///
/// ## Forbidden
/// - Retries or backoff (the caller re-runs the whole pass)
/// - Touching the baseline store
/// - Deciding whether an update is needed
/// - Spawning tasks
///
/// Every method performs exactly one API request.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Set `record.content` to `new_ip`, leaving every other field unchanged
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The record as the provider now holds it
    /// - `Err(Error::ProviderRejected)`: The provider answered with `success: false`
    /// - `Err(Error)`: Transport failure or non-2xx status
    async fn update_record(
        &self,
        record: &DnsRecord,
        new_ip: &PublicIp,
    ) -> Result<DnsRecord, crate::Error>;

    /// List the zones on the account
    async fn zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List the records in a zone
    async fn records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
