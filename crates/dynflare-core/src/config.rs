//! Configuration types for dynflare
//!
//! This module defines the configuration structures the CLI loads and the
//! core validates. Loading from disk and environment binding happen in the
//! binary; this module only describes and checks the data.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::traits::DnsRecord;

/// Default public IP lookup endpoint
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ifconfig.me/ip";

/// Main dynflare configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynflareConfig {
    /// Cloudflare credentials
    #[serde(default)]
    pub cloudflare: CloudflareConfig,

    /// Path of the baseline cache file
    #[serde(default)]
    pub cache_file: PathBuf,

    /// Public IP lookup settings
    #[serde(default)]
    pub ip_lookup: IpLookupConfig,

    /// DNS records to keep on the public IP, in update order
    #[serde(default)]
    pub records: Vec<DnsRecord>,
}

impl DynflareConfig {
    /// Validate the configuration
    ///
    /// An empty record list is allowed: `domains` and `records` need only
    /// credentials, and an `update` pass with no records still tracks the IP.
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.cloudflare.validate()?;

        if self.cache_file.as_os_str().is_empty() {
            return Err(crate::Error::config("cache file name not specified"));
        }

        self.ip_lookup.validate()?;

        for (index, record) in self.records.iter().enumerate() {
            validate_record(index, record)?;
        }

        Ok(())
    }
}

fn validate_record(index: usize, record: &DnsRecord) -> Result<(), crate::Error> {
    let missing = if record.id.is_empty() {
        Some("ID")
    } else if record.name.is_empty() {
        Some("name")
    } else if record.zone_id.is_empty() {
        Some("zone ID")
    } else if record.record_type.is_empty() {
        Some("type")
    } else {
        None
    };

    match missing {
        Some(field) => Err(crate::Error::config(format!(
            "record #{} ({}): {} not specified",
            index + 1,
            if record.name.is_empty() { "<unnamed>" } else { record.name.as_str() },
            field
        ))),
        None => Ok(()),
    }
}

/// Cloudflare credentials
///
/// Both values are sent as request headers on every API call. The `Debug`
/// implementation redacts the key.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CloudflareConfig {
    /// Account email (`X-Auth-Email`)
    #[serde(default)]
    pub email: String,

    /// Global API key (`X-Auth-Key`)
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub key: String,
}

impl CloudflareConfig {
    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.email.is_empty() {
            return Err(crate::Error::config("Cloudflare email not specified"));
        }
        if self.key.is_empty() {
            return Err(crate::Error::config("Cloudflare key not specified"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("email", &self.email)
            .field("key", &"<REDACTED>")
            .finish()
    }
}

/// Public IP lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpLookupConfig {
    /// Plain-text lookup endpoint
    #[serde(default = "default_ip_lookup_url")]
    pub url: String,

    /// Request timeout (in seconds)
    #[serde(default = "default_ip_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpLookupConfig {
    /// Validate the lookup settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("IP lookup URL cannot be empty"));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "IP lookup URL must use HTTP or HTTPS. Got: {}",
                self.url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("IP lookup timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for IpLookupConfig {
    fn default() -> Self {
        Self {
            url: default_ip_lookup_url(),
            timeout_secs: default_ip_lookup_timeout_secs(),
        }
    }
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

fn default_ip_lookup_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DynflareConfig {
        DynflareConfig {
            cloudflare: CloudflareConfig {
                email: "ops@example.com".to_string(),
                key: "0123456789abcdef".to_string(),
            },
            cache_file: PathBuf::from("cache.json"),
            ip_lookup: IpLookupConfig::default(),
            records: vec![DnsRecord::new("rec-1", "A", "home.example.com", "zone-1")],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn each_required_field_is_checked() {
        let cases: [(&str, fn(&mut DynflareConfig)); 9] = [
            ("no id", |c| c.records[0].id.clear()),
            ("no zone id", |c| c.records[0].zone_id.clear()),
            ("no type", |c| c.records[0].record_type.clear()),
            ("no name", |c| c.records[0].name.clear()),
            ("no key", |c| c.cloudflare.key.clear()),
            ("no email", |c| c.cloudflare.email.clear()),
            ("no cache file", |c| c.cache_file = PathBuf::new()),
            ("no lookup url", |c| c.ip_lookup.url.clear()),
            ("zero timeout", |c| c.ip_lookup.timeout_secs = 0),
        ];

        for (label, mutate) in cases {
            let mut config = valid_config();
            mutate(&mut config);
            assert!(
                matches!(config.validate(), Err(crate::Error::Config(_))),
                "{} should fail validation",
                label
            );
        }
    }

    #[test]
    fn record_error_names_the_record() {
        let mut config = valid_config();
        config.records[0].zone_id.clear();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("home.example.com"));
        assert!(err.contains("zone ID"));
    }

    #[test]
    fn empty_record_list_is_allowed() {
        let mut config = valid_config();
        config.records.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn key_not_exposed_in_debug() {
        let debug_str = format!("{:?}", valid_config().cloudflare);
        assert!(!debug_str.contains("0123456789abcdef"));
        assert!(debug_str.contains("ops@example.com"));
    }
}
