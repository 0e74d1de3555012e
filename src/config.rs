//! Persisted client settings.
//!
//! Settings live in a small TOML file (default `./config/cvx.toml`). The
//! file is optional: a missing file yields defaults, and `cvx settings`
//! writes it back whenever a value changes. The loaded [`Config`] is passed
//! explicitly to whatever talks to the backend.
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:8000"
//! timeout_secs = 30
//! ```

use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable supplying the default backend base URL.
pub const BASE_URL_ENV: &str = "CVX_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn base_url(&self) -> &str {
        &self.backend.base_url
    }

    /// Validate and store a new backend base URL.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.backend.base_url = normalize_base_url(url)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.backend.base_url)?;
        if self.backend.timeout_secs == 0 {
            bail!("backend.timeout_secs must be > 0");
        }
        Ok(())
    }
}

/// Check that `url` is an absolute http(s) URL and strip trailing slashes.
pub fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("backend.base_url must not be empty");
    }
    let parsed =
        Url::parse(trimmed).with_context(|| format!("Invalid backend base URL: '{}'", trimmed))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => bail!(
            "Unsupported URL scheme '{}' in backend base URL. Use http or https.",
            other
        ),
    }
    if parsed.host_str().is_none() {
        bail!("backend base URL has no host: '{}'", trimmed);
    }
    Ok(trimmed.to_string())
}

/// Load settings from `path`, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        let config = Config::default();
        config
            .validate()
            .with_context(|| format!("Invalid default settings (check ${})", BASE_URL_ENV))?;
        return Ok(config);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.validate()?;
    config.backend.base_url = normalize_base_url(&config.backend.base_url)?;

    Ok(config)
}

/// Persist settings to `path`, creating parent directories as needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    debug!(path = %path.display(), "settings saved");
    Ok(())
}
