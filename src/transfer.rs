//! Backend health check and document transfer commands.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::client::FilesClient;
use crate::config::Config;

pub async fn run_health(config: &Config) -> Result<()> {
    let client = FilesClient::new(config)?;
    let body = client
        .health()
        .await
        .with_context(|| format!("Backend at {} is not reachable", client.base_url()))?;

    println!("{:<32} {:<8} DETAILS", "BACKEND", "STATUS");
    let details = match body {
        Value::String(s) => s,
        other => other.to_string(),
    };
    println!("{:<32} {:<8} {}", client.base_url(), "OK", details);
    Ok(())
}

pub async fn run_upload(config: &Config, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("not a file: {}", path.display());
    }

    let client = FilesClient::new(config)?;
    let response = client
        .upload_pdf(path)
        .await
        .with_context(|| format!("Failed to upload {}", path.display()))?;

    println!("Uploaded {}", path.display());
    match response {
        Value::Null => {}
        Value::String(s) if s.trim().is_empty() => {}
        Value::String(s) => println!("{}", s),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

/// Destination for a download: `out`, or `<id>.pdf` in the working directory
/// (or in `out` when it is a directory).
///
/// Only the last path component of the id is used, so ids such as `../x`
/// cannot escape the target directory.
pub fn download_target(file_id: &str, out: Option<&Path>) -> PathBuf {
    let stem = Path::new(file_id)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("download");
    let file_name = format!("{}.pdf", stem);
    match out {
        Some(p) if p.is_dir() => p.join(file_name),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

pub async fn run_download(config: &Config, file_id: &str, out: Option<&Path>) -> Result<()> {
    let dest = download_target(file_id, out);
    let client = FilesClient::new(config)?;
    let written = client
        .download(file_id, &dest)
        .await
        .with_context(|| format!("Failed to download file {}", file_id))?;

    println!("Downloaded {} bytes to {}", written, dest.display());
    Ok(())
}
