use anyhow::Result;
use cvx_core::catalog::{is_known_tag, options_in, Category};
use cvx_core::score::relevance_stars;
use cvx_core::search::SearchSession;
use tracing::{debug, warn};

use crate::client::{ClientError, FilesClient};
use crate::config::Config;

/// Render a 0-5 star rating as `★★★☆☆`.
pub fn stars(score: u32) -> String {
    let filled = relevance_stars(score) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub async fn run_search(
    config: &Config,
    technologies: &[String],
    query: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let tags: Vec<String> = technologies
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    for tag in &tags {
        if !is_known_tag(tag) {
            warn!(tag = %tag, "unknown technology; it will never match (see `cvx technologies`)");
        }
    }

    let client = FilesClient::new(config)?;
    let mut session = SearchSession::new(client);
    session.set_selected_technologies(tags);
    session.set_search_query(query.unwrap_or_default());

    if let Err(e) = session.refresh().await {
        let no_files = e
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_not_found);
        if !no_files {
            return Err(e);
        }
        debug!("backend reported no files");
    }

    let mut results = session.results();
    if let Some(n) = limit {
        results.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let filters = session.filters();
    if session.has_active_filters() {
        let mut active = Vec::new();
        if !filters.selected_technologies.is_empty() {
            active.push(format!(
                "{} technolog{} selected",
                filters.selected_technologies.len(),
                if filters.selected_technologies.len() == 1 { "y" } else { "ies" }
            ));
        }
        if !filters.search_query.trim().is_empty() {
            active.push("text search active".to_string());
        }
        println!("Filters: {}", active.join(", "));
        println!();
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, item) in results.iter().enumerate() {
        println!(
            "{}. [{}] {} {}",
            i + 1,
            item.relevance_score,
            stars(item.relevance_score),
            item.name
        );
        if !item.technologies.is_empty() {
            // matched tags carry a trailing '*'
            let tags: Vec<String> = item
                .technologies
                .iter()
                .map(|t| {
                    if item.is_matched(t) {
                        format!("{}*", t)
                    } else {
                        t.clone()
                    }
                })
                .collect();
            println!("    technologies: {}", tags.join(", "));
        }
        println!("    created: {}", item.created);
        println!("    status: {}", item.status);
        println!("    id: {}", item.id);
        println!();
    }

    Ok(())
}

/// Print the filter catalog grouped by category.
pub fn run_technologies() -> Result<()> {
    for category in Category::ALL {
        println!("{}:", category.label());
        for option in options_in(category) {
            println!("  {:<12} {}", option.id, option.label);
        }
        println!();
    }
    Ok(())
}
