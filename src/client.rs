//! HTTP client for the CV-processing backend.
//!
//! Wraps the backend's file API. Every path is relative to the configured
//! base URL:
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET`  | `/file/all` | Every processed file |
//! | `GET`  | `/file/filter/id/{file_id}` | One file by id |
//! | `GET`  | `/file/filter/date/{dd-mm-yyyy}` | Files created on a date |
//! | `GET`  | `/health` | Service health |
//! | `POST` | `/upload` | Upload a PDF (multipart field `file`) |
//! | `GET`  | `/download/{file_id}` | Original document |
//! | `GET`  | `/images/{picture_id}` | Rendered first-page picture |
//!
//! Responses with a JSON content type are decoded; any other body is
//! returned as a JSON string so it flattens to an empty listing.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use cvx_core::source::RecordSource;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} {reason}: {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid date '{0}': use dd-mm-yyyy or yyyy-mm-dd")]
    InvalidDate(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the backend answered 404. It does so for empty listings.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

/// Client for the backend file API.
pub struct FilesClient {
    client: reqwest::Client,
    base_url: String,
}

impl FilesClient {
    /// Build a client from settings.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    /// Every file the backend knows about, as returned (usually `{"data": [...]}`).
    pub async fn list_all(&self) -> Result<Value, ClientError> {
        info!(base_url = %self.base_url, "fetching file listing");
        self.get_json("/file/all").await
    }

    pub async fn get_by_id(&self, file_id: &str) -> Result<Value, ClientError> {
        self.get_json(&format!("/file/filter/id/{}", urlencoding::encode(file_id)))
            .await
    }

    /// Files created on `date`, given as `dd-mm-yyyy` or `yyyy-mm-dd`.
    pub async fn get_by_date(&self, date: &str) -> Result<Value, ClientError> {
        let date = backend_date(date)?;
        self.get_json(&format!("/file/filter/date/{}", urlencoding::encode(&date)))
            .await
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.get_json("/health").await
    }

    /// Upload a PDF from disk as multipart field `file`.
    pub async fn upload_pdf(&self, path: &Path) -> Result<Value, ClientError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        if !file_name.to_lowercase().ends_with(".pdf") {
            warn!(file = %file_name, "uploading a file without a .pdf extension");
        }

        let size = data.len();
        let part = Part::bytes(data)
            .file_name(file_name.clone())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        info!(file = %file_name, bytes = size, "uploading");
        let resp = self.client.post(self.url("/upload")).multipart(form).send().await?;
        decode(resp).await
    }

    /// Download the original document of `file_id` into `dest`.
    ///
    /// Returns the number of bytes written. A failed transfer leaves `dest`
    /// untouched.
    pub async fn download(&self, file_id: &str, dest: &Path) -> Result<u64, ClientError> {
        let url = self.download_url(file_id);
        info!(url = %url, dest = %dest.display(), "downloading");
        let mut resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(resp).await);
        }

        // Stream into a sibling temp file; `dest` is only replaced once the
        // whole body has arrived. The temp file is removed on any early return.
        let dir = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir)?;
        let mut file = tokio::fs::File::from_std(tmp.as_file().try_clone()?);
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        tmp.persist(dest).map_err(|e| e.error)?;
        debug!(bytes = written, dest = %dest.display(), "download complete");
        Ok(written)
    }

    pub fn download_url(&self, file_id: &str) -> String {
        self.url(&format!("/download/{}", urlencoding::encode(file_id)))
    }

    pub fn image_url(&self, picture_id: &str) -> String {
        self.url(&format!("/images/{}", urlencoding::encode(picture_id)))
    }
}

#[async_trait]
impl RecordSource for FilesClient {
    async fn fetch_listing(&self) -> anyhow::Result<Value> {
        Ok(self.list_all().await?)
    }
}

async fn status_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ClientError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    }
}

async fn decode(resp: reqwest::Response) -> Result<Value, ClientError> {
    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }

    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let text = resp.text().await?;
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        debug!(bytes = text.len(), "non-JSON response body");
        Ok(Value::String(text))
    }
}

/// Convert a user-supplied date into the backend's `dd-mm-yyyy` form.
pub fn backend_date(input: &str) -> Result<String, ClientError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map(|d| d.format("%d-%m-%Y").to_string())
        .map_err(|_| ClientError::InvalidDate(input.to_string()))
}
