// # Baseline Store Trait
//
// Defines the interface for persisting the baseline: the last IP address
// known to have been applied to every target record.
//
// ## Purpose
//
// The baseline lets a pass skip all provider writes when the public IP has
// not moved. Exactly one baseline exists per deployment. It is overwritten,
// never appended, and only after a fully successful update.
//
// ## Implementations
//
// - File-based: single JSON document (`state::FileBaselineStore`)
// - In-memory: `state::MemoryBaselineStore`
//
// ## Usage
//
// ```rust,ignore
// use dynflare_core::{BaselineStore, PublicIp};
//
// let store = /* BaselineStore implementation */;
//
// match store.read().await {
//     Ok(baseline) => println!("last applied: {}", baseline.ip_address),
//     Err(e) => println!("no usable baseline: {}", e),
// }
//
// store.write(&PublicIp::from("203.0.113.7")).await?;
// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ip_resolver::PublicIp;

/// The last IP address confirmed applied to every target record
///
/// Serialized as `{"IpAddress": "...", "CacheTime": "<RFC 3339>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    /// The applied IP address
    #[serde(rename = "IpAddress")]
    pub ip_address: String,
    /// When the baseline was captured
    #[serde(rename = "CacheTime")]
    pub captured_at: DateTime<Utc>,
}

impl Baseline {
    /// Capture a baseline for `ip` at the current time
    pub fn capture(ip: &PublicIp) -> Self {
        Self {
            ip_address: ip.as_str().to_string(),
            captured_at: Utc::now(),
        }
    }

    /// Whether this baseline holds exactly `ip`
    pub fn matches(&self, ip: &PublicIp) -> bool {
        self.ip_address == ip.as_str()
    }
}

/// Trait for baseline store implementations
///
/// # Trust Level: Trusted (Core Component)
///
/// The store is the sole writer of the persisted baseline. It performs I/O
/// but never decides when a write should happen; that belongs to the
/// `Reconciler`.
///
/// # Concurrency
///
/// Single-process, single-instance use is assumed. No locking across
/// processes is provided.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Read the stored baseline
    ///
    /// # Returns
    ///
    /// - `Ok(Baseline)`: The stored baseline
    /// - `Err(Error::BaselineNotFound)`: Nothing has been written yet
    /// - `Err(Error::BaselineCorrupt)`: The stored value could not be read or parsed
    async fn read(&self) -> Result<Baseline, crate::Error>;

    /// Replace the stored baseline with `{ip, now}`
    ///
    /// Prior contents are fully overwritten.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Persisted
    /// - `Err(Error::BaselineWrite)`: Persisting failed
    async fn write(&self, ip: &PublicIp) -> Result<(), crate::Error>;
}
