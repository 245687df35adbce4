// # Memory Baseline Store
//
// In-memory implementation of BaselineStore.
//
// ## Purpose
//
// A baseline that lives only as long as the process. Useful for tests and
// for embedding the reconciler in a long-running host that owns its own
// persistence.
//
// ## Crash Behavior
//
// - The baseline is lost on restart
// - The first pass after a restart treats the IP as changed and updates DNS

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::baseline_store::{Baseline, BaselineStore};
use crate::traits::ip_resolver::PublicIp;

/// In-memory baseline store
///
/// Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct MemoryBaselineStore {
    inner: Arc<RwLock<Option<Baseline>>>,
}

impl MemoryBaselineStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, if any
    pub async fn get(&self) -> Option<Baseline> {
        self.inner.read().await.clone()
    }

    /// Forget the stored baseline
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl BaselineStore for MemoryBaselineStore {
    async fn read(&self) -> Result<Baseline, Error> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::BaselineNotFound("memory store is empty".to_string()))
    }

    async fn write(&self, ip: &PublicIp) -> Result<(), Error> {
        *self.inner.write().await = Some(Baseline::capture(ip));
        Ok(())
    }
}
