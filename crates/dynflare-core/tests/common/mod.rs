//! Test doubles and common utilities for reconciliation contract tests
//!
//! The doubles record every call so tests can assert on exactly which
//! writes reached the provider and the baseline store.

#![allow(dead_code)]

use dynflare_core::error::{Error, Result};
use dynflare_core::traits::{
    Baseline, BaselineStore, DnsProvider, DnsRecord, IpResolver, PublicIp, Zone,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A resolver that returns a fixed IP, or fails
#[derive(Clone)]
pub struct ScriptedResolver {
    ip: Arc<Mutex<Option<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// Resolver returning `ip` on every call
    pub fn returning(ip: &str) -> Self {
        Self {
            ip: Arc::new(Mutex::new(Some(ip.to_string()))),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolver failing every call with a network error
    pub fn unreachable() -> Self {
        Self {
            ip: Arc::new(Mutex::new(None)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the IP returned from now on
    pub fn set_ip(&self, ip: &str) {
        *self.ip.lock().unwrap() = Some(ip.to_string());
    }

    /// Number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for ScriptedResolver {
    async fn current(&self) -> Result<PublicIp> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.ip.lock().unwrap().clone() {
            Some(ip) => Ok(PublicIp::new(ip)),
            None => Err(Error::network("ip-lookup", "connection refused")),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// How the recording provider answers a write for a given record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailure {
    /// 2xx with `success: false`
    Rejected,
    /// Non-2xx status
    Status(u16),
}

/// Provider double that records writes and can fail chosen records
///
/// Clones share the call log and the failure script.
#[derive(Clone, Default)]
pub struct RecordingProvider {
    writes: Arc<Mutex<Vec<DnsRecord>>>,
    failures: Arc<Mutex<Vec<(String, WriteFailure)>>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes to `record_name` fail
    pub fn fail_on(self, record_name: &str, failure: WriteFailure) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((record_name.to_string(), failure));
        self
    }

    /// Stop failing any record
    pub fn heal(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Every write request received (including failed ones), in order
    pub fn writes(&self) -> Vec<DnsRecord> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of write requests received
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// Names of records written, in order
    pub fn written_names(&self) -> Vec<String> {
        self.writes().into_iter().map(|r| r.name).collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn update_record(&self, record: &DnsRecord, new_ip: &PublicIp) -> Result<DnsRecord> {
        let sent = record.with_content(new_ip);
        self.writes.lock().unwrap().push(sent.clone());

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| *name == record.name)
            .map(|(_, f)| *f);

        match failure {
            Some(WriteFailure::Rejected) => Err(Error::provider_rejected(
                "recording",
                "1004: DNS Validation Error",
            )),
            Some(WriteFailure::Status(status)) => Err(Error::unexpected_status(
                "recording",
                status,
                "Cloudflare server error (transient)",
            )),
            None => Ok(sent),
        }
    }

    async fn zones(&self) -> Result<Vec<Zone>> {
        Ok(Vec::new())
    }

    async fn records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>> {
        Ok(Vec::new())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Baseline store double that counts calls and can be broken
#[derive(Clone, Default)]
pub struct CountingBaselineStore {
    value: Arc<Mutex<Option<Baseline>>>,
    corrupt: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
    read_count: Arc<AtomicUsize>,
    write_count: Arc<AtomicUsize>,
}

impl CountingBaselineStore {
    /// Store with no baseline (first run)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store holding `ip`
    pub fn holding(ip: &str) -> Self {
        let store = Self::default();
        *store.value.lock().unwrap() = Some(Baseline::capture(&PublicIp::from(ip)));
        store
    }

    /// Store whose content cannot be parsed
    pub fn corrupt() -> Self {
        let store = Self::default();
        *store.corrupt.lock().unwrap() = true;
        store
    }

    /// Make every write fail from now on
    pub fn fail_writes(self) -> Self {
        *self.fail_writes.lock().unwrap() = true;
        self
    }

    /// Let writes succeed again
    pub fn repair(&self) {
        *self.fail_writes.lock().unwrap() = false;
        *self.corrupt.lock().unwrap() = false;
    }

    /// IP currently stored, if any
    pub fn stored_ip(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap()
            .as_ref()
            .map(|b| b.ip_address.clone())
    }

    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BaselineStore for CountingBaselineStore {
    async fn read(&self) -> Result<Baseline> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        if *self.corrupt.lock().unwrap() {
            return Err(Error::BaselineCorrupt(
                "expected value at line 1 column 1".to_string(),
            ));
        }
        self.value
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::BaselineNotFound("cache.json".to_string()))
    }

    async fn write(&self, ip: &PublicIp) -> Result<()> {
        self.write_count.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().unwrap() {
            return Err(Error::baseline_write("No space left on device"));
        }
        *self.value.lock().unwrap() = Some(Baseline::capture(ip));
        *self.corrupt.lock().unwrap() = false;
        Ok(())
    }
}

/// Two A records in one zone
pub fn two_targets() -> Vec<DnsRecord> {
    vec![
        DnsRecord::new("rec-home", "A", "home.example.com", "zone-1"),
        DnsRecord::new("rec-vpn", "A", "vpn.example.com", "zone-1"),
    ]
}

/// Build a reconciler from clones of the doubles, keeping the originals for assertions
pub fn reconciler(
    resolver: &ScriptedResolver,
    provider: &RecordingProvider,
    store: &CountingBaselineStore,
) -> dynflare_core::Reconciler {
    dynflare_core::Reconciler::new(
        Box::new(resolver.clone()),
        Box::new(provider.clone()),
        Box::new(store.clone()),
    )
}
