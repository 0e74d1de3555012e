//! File listing and detail commands.
//!
//! `cvx files` prints the normalized table of every processed file (or the
//! files of one day); `cvx show <id>` prints one file with its detected
//! technologies and the structured view of its extracted data.

use anyhow::{bail, Context, Result};
use cvx_core::extract::extract_from;
use cvx_core::normalize::{coerce_records, normalize_record, NormalizedRecord, Status};
use cvx_core::profile::{build_view, CvProfile, ExtractedView, OtherInfo};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::client::{ClientError, FilesClient};
use crate::config::Config;

/// One row of `cvx files`.
#[derive(Debug, Clone, Serialize)]
pub struct FileRow {
    pub id: String,
    pub name: String,
    pub created: String,
    pub status: Status,
    pub picture_id: Option<String>,
    pub technologies: BTreeSet<String>,
}

impl From<NormalizedRecord<'_>> for FileRow {
    fn from(record: NormalizedRecord<'_>) -> Self {
        Self {
            technologies: extract_from(record.extracted),
            id: record.id,
            name: record.name,
            created: record.created,
            status: record.status,
            picture_id: record.picture_id,
        }
    }
}

/// Normalize every record of a listing response into table rows.
pub fn file_rows(listing: &Value) -> Vec<FileRow> {
    coerce_records(listing)
        .into_iter()
        .map(|raw| FileRow::from(normalize_record(raw)))
        .collect()
}

/// Fetch all files, or the files of `date`. A 404 means no files.
pub async fn fetch_listing(client: &FilesClient, date: Option<&str>) -> Result<Value> {
    let result = match date {
        Some(d) => client.get_by_date(d).await,
        None => client.list_all().await,
    };
    match result {
        Ok(listing) => Ok(listing),
        Err(e) if e.is_not_found() => {
            debug!(error = %e, "backend reported no files");
            Ok(Value::Array(Vec::new()))
        }
        Err(e) => Err(e).context("Failed to fetch file listing"),
    }
}

/// The record inside a single-file response (`{"data": {...}}` or bare).
pub fn single_record(response: &Value) -> &Value {
    match response {
        Value::Object(map) => match map.get("data") {
            Some(inner @ Value::Object(_)) => inner,
            _ => response,
        },
        Value::Array(items) => items.first().unwrap_or(response),
        _ => response,
    }
}

pub async fn run_files(config: &Config, date: Option<&str>, json: bool) -> Result<()> {
    let client = FilesClient::new(config)?;
    let listing = fetch_listing(&client, date).await?;
    let rows = file_rows(&listing);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No records.");
        return Ok(());
    }

    println!("{:<40} {:<20} {:<11} ID", "FILE", "DATE", "STATUS");
    for row in &rows {
        println!(
            "{:<40} {:<20} {:<11} {}",
            row.name,
            row.created,
            row.status.as_str(),
            row.id
        );
    }
    println!();
    println!("{} file(s)", rows.len());

    Ok(())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    id: &'a str,
    name: &'a str,
    created: &'a str,
    status: Status,
    download_url: String,
    image_url: Option<String>,
    technologies: BTreeSet<String>,
    extracted: ExtractedView<'a>,
}

pub async fn run_show(config: &Config, id: &str, raw: bool, json: bool) -> Result<()> {
    let client = FilesClient::new(config)?;
    let response = match client.get_by_id(id).await {
        Ok(r) => r,
        Err(ClientError::Status { status: 404, .. }) => bail!("file not found: {}", id),
        Err(e) => return Err(e).context("Failed to fetch file"),
    };
    let record = single_record(&response);

    if raw {
        println!("{}", serde_json::to_string_pretty(record)?);
        return Ok(());
    }

    let normalized = normalize_record(record);
    let technologies = extract_from(normalized.extracted);
    let view = build_view(normalized.extracted);

    if json {
        let out = ShowOutput {
            id: &normalized.id,
            name: &normalized.name,
            created: &normalized.created,
            status: normalized.status,
            download_url: client.download_url(&normalized.id),
            image_url: normalized.picture_id.as_deref().map(|p| client.image_url(p)),
            technologies,
            extracted: view,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("--- File ---");
    println!("id:           {}", normalized.id);
    println!("name:         {}", normalized.name);
    println!("created:      {}", normalized.created);
    println!("status:       {}", normalized.status);
    println!("download:     {}", client.download_url(&normalized.id));
    if let Some(ref picture) = normalized.picture_id {
        println!("picture:      {}", client.image_url(picture));
    }
    if technologies.is_empty() {
        println!("technologies: —");
    } else {
        let tags: Vec<&str> = technologies.iter().map(String::as_str).collect();
        println!("technologies: {}", tags.join(", "));
    }
    println!();

    println!("--- Extracted data ---");
    print_view(&view);

    Ok(())
}

fn print_pairs(pairs: &[(String, String)]) {
    for (k, v) in pairs {
        println!("  {:<24} {}", k, v);
    }
}

/// Print an [`ExtractedView`] as plain text.
pub fn print_view(view: &ExtractedView<'_>) {
    match view {
        ExtractedView::Empty => println!("No data to show."),
        ExtractedView::Text(text) => println!("{}", text),
        ExtractedView::Generic(pairs) => {
            println!("No known sections detected. Generic view:");
            print_pairs(pairs);
        }
        ExtractedView::Profile(profile) => print_profile(profile),
    }
}

fn print_profile(p: &CvProfile) {
    if let Some(ref personal) = p.personal {
        println!("[Personal data]");
        if let Some(ref name) = personal.name {
            println!("  name:    {}", name);
        }
        if !personal.emails.is_empty() {
            println!("  email:   {}", personal.emails.join(", "));
        }
        if let Some(ref phone) = personal.phone {
            println!("  phone:   {}", phone);
        }
        if let Some(ref address) = personal.address {
            println!("  address: {}", address);
        }
        if personal.is_blank() {
            println!("  —");
        }
        println!();
    }

    if !p.experience.is_empty() {
        println!("[Work experience]");
        println!("  {:<28} {:<28} PERIOD", "COMPANY", "ROLE");
        for e in &p.experience {
            println!("  {:<28} {:<28} {}", e.organization, e.title, e.period);
        }
        println!();
    }

    if !p.education.is_empty() {
        println!("[Education]");
        println!("  {:<28} {:<28} PERIOD", "INSTITUTION", "DEGREE");
        for e in &p.education {
            println!("  {:<28} {:<28} {}", e.organization, e.title, e.period);
        }
        println!();
    }

    if !p.skills.is_empty() {
        println!("[Technical skills]");
        println!("  {}", p.skills.join(", "));
        println!();
    }

    if !p.languages.is_empty() {
        println!("[Languages]");
        for l in &p.languages {
            println!("  {} — {}", l.language, l.level);
        }
        println!();
    }

    if let Some(ref certs) = p.certifications {
        println!("[Certifications and courses]");
        if certs.is_empty() {
            println!("  —");
        }
        for c in certs {
            println!("  - {}", c);
        }
        println!();
    }

    if let Some(ref other) = p.other {
        println!("[Other]");
        match other {
            OtherInfo::List(items) => {
                for item in items {
                    println!("  - {}", item);
                }
            }
            OtherInfo::Fields(pairs) => print_pairs(pairs),
            OtherInfo::Text(text) => println!("  {}", text),
        }
        println!();
    }
}
