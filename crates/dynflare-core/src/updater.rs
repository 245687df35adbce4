//! DNS record updater
//!
//! Applies a new IP to an ordered list of records through a [`DnsProvider`].
//!
//! ## Semantics
//!
//! - Records are written in the order supplied, one at a time
//! - Each record gets exactly one write, with only `content` changed
//! - The first failure stops the run; later records are not attempted
//! - Records written before the failure stay written (no rollback), and the
//!   error reports how many there were

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsRecord, PublicIp};

/// Applies one IP to many records via a provider
pub struct RecordUpdater<'a> {
    provider: &'a dyn DnsProvider,
}

impl<'a> RecordUpdater<'a> {
    /// Create an updater writing through `provider`
    pub fn new(provider: &'a dyn DnsProvider) -> Self {
        Self { provider }
    }

    /// Point every target at `new_ip`
    ///
    /// # Parameters
    ///
    /// - `targets`: Records to update, in order. Not modified.
    /// - `new_ip`: The content to write
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: The records as the provider now holds them, in target order
    /// - `Err(Error::UpdateFailed)`: Names the failing target and how many were already applied
    pub async fn update_all(
        &self,
        targets: &[DnsRecord],
        new_ip: &PublicIp,
    ) -> Result<Vec<DnsRecord>> {
        let mut applied = Vec::with_capacity(targets.len());

        for target in targets {
            debug!(
                id = %target.id,
                name = %target.name,
                record_type = %target.record_type,
                zone_id = %target.zone_id,
                "Updating record"
            );

            match self.provider.update_record(target, new_ip).await {
                Ok(record) => {
                    info!(
                        name = %target.name,
                        ip = %new_ip,
                        provider = self.provider.provider_name(),
                        "DNS record updated"
                    );
                    applied.push(record);
                }
                Err(e) => {
                    error!(
                        name = %target.name,
                        applied = applied.len(),
                        remaining = targets.len() - applied.len() - 1,
                        "Error updating DNS record: {}",
                        e
                    );
                    return Err(Error::UpdateFailed {
                        target: target.name.clone(),
                        applied: applied.len(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(applied)
    }
}
