//! Configuration loading
//!
//! Reads the TOML file, overlays credentials from the environment, then
//! validates. Environment values win over the file when they are non-empty.

use anyhow::{Context, Result, bail};
use dynflare_core::DynflareConfig;
use std::fs;
use std::path::Path;

/// Overrides `[cloudflare] key`
pub const AUTH_KEY_VAR: &str = "DYNFLARE_AUTH_KEY";

/// Overrides `[cloudflare] email`
pub const AUTH_EMAIL_VAR: &str = "DYNFLARE_AUTH_EMAIL";

/// Log level when neither `--verbose` nor `--dry-run` is given
pub const LOG_LEVEL_VAR: &str = "DYNFLARE_LOG_LEVEL";

/// Load and validate the configuration, reading overrides from the process environment
pub fn load(path: &Path) -> Result<DynflareConfig> {
    load_with(path, |name| std::env::var(name).ok())
}

/// Load and validate the configuration with an explicit environment lookup
pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<DynflareConfig> {
    ensure_regular_file(path)?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: DynflareConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    apply_env(&mut config, lookup);

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

/// Overlay credentials from the environment
pub fn apply_env(config: &mut DynflareConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup(AUTH_KEY_VAR).filter(|v| !v.is_empty()) {
        config.cloudflare.key = key;
    }
    if let Some(email) = lookup(AUTH_EMAIL_VAR).filter(|v| !v.is_empty()) {
        config.cloudflare.email = email;
    }
}

fn ensure_regular_file(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Cannot access config file: {}", path.display()))?;

    if !metadata.is_file() {
        bail!(
            "Config path {} is not a regular file. Must specify a file",
            path.display()
        );
    }
    Ok(())
}
