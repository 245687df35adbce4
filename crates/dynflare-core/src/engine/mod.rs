//! Reconciliation engine
//!
//! The Reconciler is responsible for:
//! - Resolving the current public IP via IpResolver
//! - Comparing it with the baseline from BaselineStore
//! - Updating DNS records via DnsProvider when the IP moved
//! - Persisting the new baseline after every record was updated
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ IpResolver  │──── current IP ─────┐
//! └─────────────┘                     │
//!                                     ▼
//!                            ┌──────────────┐
//!                            │  Reconciler  │
//!                            └──────────────┘
//!                                     │
//!               ┌─────────────────────┼─────────────────────┐
//!               │                     │                     │
//!               ▼                     ▼                     ▼
//!       ┌──────────────┐     ┌────────────────┐    ┌──────────────┐
//!       │BaselineStore │     │ RecordUpdater  │    │BaselineStore │
//!       │   (read)     │     │  (DnsProvider) │    │   (write)    │
//!       └──────────────┘     └────────────────┘    └──────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! 1. Resolve the current IP (failure ends the pass)
//! 2. Read the baseline (failure means "unknown")
//! 3. Same IP: done. Different IP in dry-run: done.
//! 4. Update every record, stopping at the first failure
//! 5. Only when all records succeeded, write the new baseline

use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::traits::{Baseline, BaselineStore, DnsProvider, DnsRecord, IpResolver, PublicIp};
use crate::updater::RecordUpdater;

/// Terminal result of one reconciliation pass
#[derive(Debug)]
pub enum Outcome {
    /// The public IP equals the baseline; nothing was written
    Unchanged {
        /// The current public IP
        ip: PublicIp,
    },

    /// Every record now holds the new IP and the baseline was advanced
    Updated {
        /// The baseline IP before this pass (`None` if it was missing or unreadable)
        previous_ip: Option<String>,
        /// The IP applied
        ip: PublicIp,
        /// Records as the provider now holds them, in target order
        records: Vec<DnsRecord>,
    },

    /// The IP moved but dry-run suppressed every write
    SkippedDryRun {
        /// The baseline IP (`None` if it was missing or unreadable)
        previous_ip: Option<String>,
        /// The current public IP
        ip: PublicIp,
    },

    /// The pass failed
    ///
    /// `Error::UpdateFailed` and `Error::BaselineDiverged` mean some DNS
    /// records were already changed.
    Failed(Error),
}

impl Outcome {
    /// Whether the pass ended in `Failed`
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short name of the outcome, for logs and scripts
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Unchanged { .. } => "unchanged",
            Outcome::Updated { .. } => "updated",
            Outcome::SkippedDryRun { .. } => "skipped-dry-run",
            Outcome::Failed(_) => "failed",
        }
    }
}

/// Core reconciliation engine
///
/// Holds its collaborators and nothing else: no state survives between
/// passes except what the `BaselineStore` persists.
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Call [`Reconciler::reconcile()`] once per invocation
///
/// ## Concurrency
///
/// A pass is strictly sequential: each provider write is awaited before the
/// next starts. Running two passes at once against the same baseline store
/// is not supported.
pub struct Reconciler {
    /// Public IP lookup
    resolver: Box<dyn IpResolver>,

    /// DNS provider for record writes
    provider: Box<dyn DnsProvider>,

    /// Last applied IP
    baseline: Box<dyn BaselineStore>,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `resolver`: IP resolver implementation
    /// - `provider`: DNS provider implementation
    /// - `baseline`: Baseline store implementation
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        baseline: Box<dyn BaselineStore>,
    ) -> Self {
        Self {
            resolver,
            provider,
            baseline,
        }
    }

    /// Run one reconciliation pass
    ///
    /// # Parameters
    ///
    /// - `targets`: Records to keep on the public IP, in update order
    /// - `dry_run`: Detect changes but perform no write of any kind
    ///
    /// # Returns
    ///
    /// The pass outcome. Errors are reported as `Outcome::Failed`, never
    /// as a panic.
    pub async fn reconcile(&self, targets: &[DnsRecord], dry_run: bool) -> Outcome {
        // Step 1: Resolve
        let current_ip = match self.resolver.current().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(
                    resolver = self.resolver.resolver_name(),
                    "Failed to fetch public IP: {}",
                    e
                );
                return Outcome::Failed(e);
            }
        };
        debug!(ip = %current_ip, "Public IP fetched");

        // Step 2: Baseline lookup
        let baseline = self.read_baseline().await;
        let previous_ip = baseline.as_ref().map(|b| b.ip_address.clone());

        // Step 3: Decision
        if let Some(ref baseline) = baseline {
            if baseline.matches(&current_ip) {
                info!(
                    ip = %current_ip,
                    cached_since = %baseline.captured_at,
                    "IP is the same as the cached one"
                );
                return Outcome::Unchanged { ip: current_ip };
            }
        }

        if dry_run {
            info!(
                old_ip = previous_ip.as_deref().unwrap_or("<unknown>"),
                new_ip = %current_ip,
                records = targets.len(),
                "IP is different from cached. Not updating (dry-run on)"
            );
            return Outcome::SkippedDryRun {
                previous_ip,
                ip: current_ip,
            };
        }

        info!(
            old_ip = previous_ip.as_deref().unwrap_or("<unknown>"),
            new_ip = %current_ip,
            records = targets.len(),
            "IP is different from cached. Updating records"
        );

        // Step 4: Apply
        let records = match RecordUpdater::new(self.provider.as_ref())
            .update_all(targets, &current_ip)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                // Baseline stays behind: it must only ever hold an IP every record has
                error!("Update pass aborted, baseline left unchanged: {}", e);
                return Outcome::Failed(e);
            }
        };

        // Step 5: Persist
        if let Err(e) = self.baseline.write(&current_ip).await {
            error!(
                ip = %current_ip,
                updated = records.len(),
                "DNS records were updated but the baseline could not be saved; \
                 the next pass will re-apply the same IP: {}",
                e
            );
            return Outcome::Failed(Error::BaselineDiverged {
                ip: current_ip.to_string(),
                updated: records.len(),
                source: Box::new(e),
            });
        }

        info!(ip = %current_ip, updated = records.len(), "Reconciliation complete");
        Outcome::Updated {
            previous_ip,
            ip: current_ip,
            records,
        }
    }

    /// Read the baseline, downgrading any failure to "unknown"
    async fn read_baseline(&self) -> Option<Baseline> {
        match self.baseline.read().await {
            Ok(baseline) => Some(baseline),
            Err(e) => {
                warn!(
                    first_run = matches!(e, Error::BaselineNotFound(_)),
                    "Could not read old IP from cache, assuming it changed: {}",
                    e
                );
                None
            }
        }
    }
}
