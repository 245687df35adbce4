//! Core traits for dynflare
//!
//! This module defines the abstract interfaces the reconciler consumes.
//!
//! - [`IpResolver`]: Fetch the current public IP
//! - [`BaselineStore`]: Persist the last IP applied to every record
//! - [`DnsProvider`]: Write records and list zones via the provider API

pub mod baseline_store;
pub mod dns_provider;
pub mod ip_resolver;

pub use baseline_store::{Baseline, BaselineStore};
pub use dns_provider::{DnsProvider, DnsRecord, Zone};
pub use ip_resolver::{IpResolver, PublicIp};
