use anyhow::Result;
use std::path::Path;

use crate::config::{load_config, save_config, Config};

pub fn run_settings_show(config_path: &Path, config: &Config) -> Result<()> {
    let state = if config_path.exists() {
        "saved"
    } else {
        "defaults"
    };
    println!("{:<14} {} ({})", "config", config_path.display(), state);
    println!("{:<14} {}", "base_url", config.base_url());
    println!("{:<14} {}", "timeout_secs", config.backend.timeout_secs);
    Ok(())
}

/// Validate `url`, store it and write the settings file.
pub fn run_set_base_url(config_path: &Path, url: &str) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.set_base_url(url)?;
    save_config(config_path, &config)?;
    println!("base_url set to {}", config.base_url());
    Ok(())
}
