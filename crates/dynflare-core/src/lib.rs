// # dynflare-core
//
// Core library for keeping a set of DNS records pointed at the current
// public IP address.
//
// ## Architecture Overview
//
// One reconciliation pass is the unit of work:
// - **IpResolver**: Trait for fetching the current public IP
// - **BaselineStore**: Trait for the last IP known to be applied everywhere
// - **DnsProvider**: Trait for the provider API (record writes, zone listings)
// - **RecordUpdater**: Applies a new IP to an ordered list of records
// - **Reconciler**: Resolve, compare, apply, persist
//
// ## Design Principles
//
// 1. **Explicit inputs**: Targets and the dry-run flag are arguments, not globals
// 2. **Single pass**: No scheduling, no background tasks, no retries
// 3. **Strict baseline**: The baseline only advances once every record holds the new IP
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod state;
pub mod traits;
pub mod updater;

// Re-export core types for convenience
pub use config::{CloudflareConfig, DynflareConfig, IpLookupConfig};
pub use engine::{Outcome, Reconciler};
pub use error::{Error, Result};
pub use state::{FileBaselineStore, MemoryBaselineStore};
pub use traits::{Baseline, BaselineStore, DnsProvider, DnsRecord, IpResolver, PublicIp, Zone};
pub use updater::RecordUpdater;
