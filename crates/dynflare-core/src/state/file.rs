// # File Baseline Store
//
// File-based implementation of BaselineStore.
//
// ## Purpose
//
// Keeps the baseline across invocations so a pass can tell whether the
// public IP moved since the last successful update.
//
// ## Crash Safety
//
// - Atomic writes: the new document goes to a sibling temp file which is
//   then renamed over the cache file, so the file always holds either the
//   old or the new baseline in full
// - Missing or unparseable content is reported as `BaselineNotFound` /
//   `BaselineCorrupt`, never repaired silently
// - Only `write()` touches the disk; a missing parent directory is created
//   there, so building a store for a dry run leaves no trace
//
// ## File Format
//
// ```json
// {
//  "IpAddress": "203.0.113.7",
//  "CacheTime": "2025-01-09T12:00:00.000000Z"
// }
// ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::baseline_store::{Baseline, BaselineStore};
use crate::traits::ip_resolver::PublicIp;

/// File-based baseline store
///
/// Every `read()` goes to disk; nothing is cached in memory.
///
/// # Example
///
/// ```rust,no_run
/// use dynflare_core::state::FileBaselineStore;
/// use dynflare_core::traits::{BaselineStore, PublicIp};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileBaselineStore::new("/var/lib/dynflare/cache.json");
///
///     store.write(&PublicIp::from("203.0.113.7")).await?;
///
///     let baseline = store.read().await?;
///     assert_eq!(baseline.ip_address, "203.0.113.7");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileBaselineStore {
    path: PathBuf,
}

impl FileBaselineStore {
    /// Create a file baseline store
    ///
    /// Nothing is created or checked on disk until the first `read()` or `write()`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    async fn write_document(&self, json: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::baseline_write(format!(
                        "Failed to create cache directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let temp_path = self.temp_path();
        {
            // `create` truncates any leftover temp file from an earlier crash
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::baseline_write(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::baseline_write(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.sync_all().await.map_err(|e| {
                Error::baseline_write(format!(
                    "Failed to sync temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::baseline_write(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl BaselineStore for FileBaselineStore {
    async fn read(&self) -> Result<Baseline, Error> {
        let metadata = match fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(file = %self.path.display(), "Cache file does not exist");
                return Err(Error::BaselineNotFound(self.path.display().to_string()));
            }
            Err(e) => {
                return Err(Error::BaselineCorrupt(format!(
                    "Failed to stat cache file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if metadata.is_dir() {
            tracing::info!(file = %self.path.display(), "Cache path is not a file");
            return Err(Error::BaselineNotFound(format!(
                "{} is a directory",
                self.path.display()
            )));
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::BaselineCorrupt(format!(
                "Failed to read cache file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::BaselineCorrupt(format!(
                "Failed to parse cache file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write(&self, ip: &PublicIp) -> Result<(), Error> {
        let baseline = Baseline::capture(ip);

        let json = serde_json::to_string_pretty(&baseline)
            .map_err(|e| Error::baseline_write(format!("Failed to serialize baseline: {}", e)))?;

        self.write_document(&json).await?;

        tracing::info!(ip = %ip, file = %self.path.display(), "Stored IP in cache");
        Ok(())
    }
}
