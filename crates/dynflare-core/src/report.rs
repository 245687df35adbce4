//! Read-only account reporting
//!
//! Lists zones and records so operators can find the IDs to put in the
//! configuration. Nothing here writes to the provider or the baseline.

use tracing::debug;

use crate::error::Result;
use crate::traits::{DnsProvider, DnsRecord, Zone};

/// A zone together with its records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecords {
    /// The zone
    pub zone: Zone,
    /// Records in the zone, in provider order
    pub records: Vec<DnsRecord>,
}

/// List every zone on the account
pub async fn list_domains(provider: &dyn DnsProvider) -> Result<Vec<Zone>> {
    let zones = provider.zones().await?;
    debug!(count = zones.len(), provider = provider.provider_name(), "Zones listed");
    Ok(zones)
}

/// List the records of every zone on the account
///
/// Zones are visited in provider order; the first failing zone aborts the listing.
pub async fn list_domain_records(provider: &dyn DnsProvider) -> Result<Vec<ZoneRecords>> {
    let zones = provider.zones().await?;
    let mut report = Vec::with_capacity(zones.len());

    for zone in zones {
        let records = provider.records(&zone.id).await?;
        debug!(zone = %zone.name, count = records.len(), "Records listed");
        report.push(ZoneRecords { zone, records });
    }

    Ok(report)
}
