//! Search over normalized records: extraction, scoring, filtering, ranking.
//!
//! The core search function operates on an already-fetched listing and is
//! a pure function of `(records, filters)`. [`SearchSession`] wraps it
//! with the filter state and the latest listing fetched from a
//! [`RecordSource`].
//!
//! # Pipeline
//!
//! 1. Flatten the listing into records ([`coerce_records`]).
//! 2. Normalize each record and extract technologies from its payload.
//! 3. `matched_technologies = technologies ∩ selected_technologies`.
//! 4. Score ([`relevance_score`]).
//! 5. Keep records with at least one matched tag (when a selection is
//!    active) whose name contains the query (when the trimmed query is
//!    non-empty).
//! 6. Stable sort by score, descending.
//!
//! Every call recomputes from scratch; no scoring state is kept between
//! calls.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::extract::extract_from;
use crate::normalize::{coerce_records, normalize_record, Status};
use crate::score::relevance_score;
use crate::source::RecordSource;

/// User-selected filters for one search session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    pub selected_technologies: BTreeSet<String>,
    pub search_query: String,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_technologies<I, T>(&mut self, technologies: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selected_technologies = technologies.into_iter().map(Into::into).collect();
    }

    /// Select `tag` if absent, deselect it otherwise. Returns whether it is
    /// now selected.
    pub fn toggle_technology(&mut self, tag: &str) -> bool {
        if self.selected_technologies.remove(tag) {
            false
        } else {
            self.selected_technologies.insert(tag.to_string());
            true
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Reset both filters to empty.
    pub fn clear(&mut self) {
        self.selected_technologies.clear();
        self.search_query.clear();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.selected_technologies.is_empty() || !self.search_query.trim().is_empty()
    }
}

/// One ranked record.
///
/// `raw` borrows the record from the listing it was computed from; results
/// are rebuilt whenever the listing or the filters change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultItem<'a> {
    pub id: String,
    pub name: String,
    pub created: String,
    pub status: Status,
    pub technologies: BTreeSet<String>,
    /// Always a subset of `technologies`.
    pub matched_technologies: BTreeSet<String>,
    pub relevance_score: u32,
    pub raw: &'a Value,
}

impl SearchResultItem<'_> {
    pub fn is_matched(&self, tag: &str) -> bool {
        self.matched_technologies.contains(tag)
    }
}

/// Run the search pipeline over a raw listing response.
pub fn search_listing<'a>(listing: &'a Value, filters: &SearchFilters) -> Vec<SearchResultItem<'a>> {
    search(coerce_records(listing), filters)
}

/// Run the search pipeline over already-flattened records.
pub fn search<'a, I>(records: I, filters: &SearchFilters) -> Vec<SearchResultItem<'a>>
where
    I: IntoIterator<Item = &'a Value>,
{
    let selected = &filters.selected_technologies;
    let query = filters.search_query.as_str();

    let scored: Vec<SearchResultItem<'a>> = records
        .into_iter()
        .map(|raw| {
            let record = normalize_record(raw);
            let technologies = extract_from(record.extracted);
            let matched_technologies: BTreeSet<String> =
                technologies.intersection(selected).cloned().collect();
            let relevance_score = relevance_score(&technologies, selected, query, &record.name);

            SearchResultItem {
                id: record.id,
                name: record.name,
                created: record.created,
                status: record.status,
                technologies,
                matched_technologies,
                relevance_score,
                raw,
            }
        })
        .collect();
    let total = scored.len();

    let query_lower = query.to_lowercase();
    let text_active = !query.trim().is_empty();

    let mut results: Vec<SearchResultItem<'a>> = scored
        .into_iter()
        .filter(|r| selected.is_empty() || !r.matched_technologies.is_empty())
        .filter(|r| !text_active || r.name.to_lowercase().contains(&query_lower))
        .collect();

    results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    debug!(
        total,
        kept = results.len(),
        selected = selected.len(),
        "search computed"
    );
    results
}

/// Filter state plus the latest listing from a [`RecordSource`].
pub struct SearchSession<S> {
    source: S,
    filters: SearchFilters,
    listing: Option<Value>,
}

impl<S: RecordSource> SearchSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            filters: SearchFilters::default(),
            listing: None,
        }
    }

    /// Fetch a fresh listing, replacing the previous one wholesale.
    ///
    /// On failure the previous listing is kept. Returns the number of
    /// records in the new listing.
    pub async fn refresh(&mut self) -> Result<usize> {
        let listing = self
            .source
            .fetch_listing()
            .await
            .context("failed to fetch record listing")?;
        let count = coerce_records(&listing).len();
        debug!(records = count, "listing refreshed");
        self.listing = Some(listing);
        Ok(count)
    }

    /// Whether a listing has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.listing.is_some()
    }

    /// Ranked results for the current listing and filters.
    ///
    /// Empty until the first successful [`refresh`](Self::refresh).
    pub fn results(&self) -> Vec<SearchResultItem<'_>> {
        match &self.listing {
            Some(listing) => search_listing(listing, &self.filters),
            None => Vec::new(),
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn set_selected_technologies<I, T>(&mut self, technologies: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.filters.set_selected_technologies(technologies);
    }

    pub fn toggle_technology(&mut self, tag: &str) -> bool {
        self.filters.toggle_technology(tag)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.set_search_query(query);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active_filters()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::memory::InMemorySource;
    use serde_json::json;

    fn cv(id: &str, name: &str, skills: &[&str]) -> Value {
        json!({
            "file_id": id,
            "name": name,
            "results": [
                {"process": "OCR", "data": "scanned text"},
                {"process": "NER", "data": {"habilidades": skills}}
            ]
        })
    }

    fn filters(tags: &[&str], query: &str) -> SearchFilters {
        let mut f = SearchFilters::new();
        f.set_selected_technologies(tags.iter().copied());
        f.set_search_query(query);
        f
    }

    fn names<'a>(results: &'a [SearchResultItem<'_>]) -> Vec<&'a str> {
        results.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let listing = json!([cv("1", "a.pdf", &["Rust"]), cv("2", "b.pdf", &[])]);
        let results = search_listing(&listing, &SearchFilters::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.relevance_score == 0));
        assert_eq!(names(&results), vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn test_filter_conjunction() {
        let listing = json!([
            cv("1", "John_Doe_CV.pdf", &["React"]),
            cv("2", "Jane_CV.pdf", &["React"]),
            cv("3", "John_Resume.pdf", &["Vue"]),
        ]);
        let results = search_listing(&listing, &filters(&["react"], "john"));
        assert_eq!(names(&results), vec!["John_Doe_CV.pdf"]);
        assert_eq!(results[0].relevance_score, 10 + 20 + 30);
    }

    #[test]
    fn test_matched_subset_of_technologies() {
        let listing = json!([
            cv("1", "a.pdf", &["Python", "Docker"]),
            cv("2", "b.pdf", &["Python"]),
        ]);
        for r in search_listing(&listing, &filters(&["python", "docker", "kubernetes"], "")) {
            assert!(r.matched_technologies.is_subset(&r.technologies));
            assert!(r.is_matched("python"));
        }
    }

    #[test]
    fn test_sorted_by_score_desc() {
        let listing = json!([
            cv("1", "one.pdf", &["Python"]),
            cv("2", "both.pdf", &["Python", "Docker"]),
            cv("3", "none.pdf", &["Rust"]),
            cv("4", "other.pdf", &["Docker"]),
        ]);
        let results = search_listing(&listing, &filters(&["python", "docker"], ""));
        let scores: Vec<u32> = results.iter().map(|r| r.relevance_score).collect();
        assert_eq!(scores, vec![50, 10, 10]);
        // ties keep listing order
        assert_eq!(names(&results), vec!["both.pdf", "one.pdf", "other.pdf"]);
    }

    #[test]
    fn test_partial_matches_ranked_by_score() {
        let listing = json!([
            cv("a", "a.pdf", &["Python", "Docker", "Kubernetes", "AWS"]),
            cv("b", "b.pdf", &["Python"]),
            cv("c", "c.pdf", &["Python", "Docker", "Kubernetes"]),
        ]);
        let selected = ["python", "docker", "kubernetes", "aws", "mongodb"];
        let results = search_listing(&listing, &filters(&selected, ""));
        let scores: Vec<u32> = results.iter().map(|r| r.relevance_score).collect();
        assert_eq!(scores, vec![40, 30, 10]);
        assert_eq!(names(&results), vec!["a.pdf", "c.pdf", "b.pdf"]);
    }

    #[test]
    fn test_blank_query_does_not_filter() {
        let listing = json!([cv("1", "a.pdf", &[]), cv("2", "b.pdf", &[])]);
        let results = search_listing(&listing, &filters(&[], "   "));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let listing = json!([cv("1", "MARIA_cv.pdf", &[]), cv("2", "pedro.pdf", &[])]);
        let results = search_listing(&listing, &filters(&[], "maria"));
        assert_eq!(names(&results), vec!["MARIA_cv.pdf"]);
        assert_eq!(results[0].relevance_score, 20);
    }

    #[test]
    fn test_deterministic_for_identified_records() {
        let listing = json!({"data": [cv("1", "a.pdf", &["AWS"]), cv("2", "b.pdf", &["Go"])]});
        let f = filters(&["aws"], "");
        assert_eq!(search_listing(&listing, &f), search_listing(&listing, &f));
    }

    #[test]
    fn test_wrapped_listing_equals_direct() {
        let records = vec![cv("1", "a.pdf", &["AWS"]), cv("2", "b.pdf", &["Go"])];
        let direct = Value::Array(records.clone());
        let wrapped = json!({ "data": records });
        let f = SearchFilters::new();
        assert_eq!(search_listing(&direct, &f), search_listing(&wrapped, &f));
    }

    #[test]
    fn test_raw_is_original_record() {
        let listing = json!([cv("1", "a.pdf", &[])]);
        let results = search_listing(&listing, &SearchFilters::new());
        assert!(std::ptr::eq(results[0].raw, &listing[0]));
    }

    #[test]
    fn test_filters_toggle_and_clear() {
        let mut f = SearchFilters::new();
        assert!(!f.has_active_filters());
        assert!(f.toggle_technology("react"));
        assert!(f.has_active_filters());
        assert!(!f.toggle_technology("react"));
        assert!(f.selected_technologies.is_empty());

        f.set_search_query("  ");
        assert!(!f.has_active_filters());
        f.set_search_query("ana");
        f.toggle_technology("go");
        f.clear();
        assert_eq!(f, SearchFilters::default());
    }

    #[tokio::test]
    async fn test_session_refresh_and_recompute() {
        let source = InMemorySource::new(json!({"files": [cv("1", "a.pdf", &["Docker"])]}));
        let mut session = SearchSession::new(source);
        assert!(!session.is_loaded());
        assert!(session.results().is_empty());

        assert_eq!(session.refresh().await.unwrap(), 1);
        session.set_selected_technologies(["docker"]);
        assert_eq!(session.results()[0].relevance_score, 40);

        session.toggle_technology("aws");
        assert_eq!(session.results()[0].relevance_score, 10);

        session.clear_filters();
        assert!(!session.has_active_filters());
        assert_eq!(session.results()[0].relevance_score, 0);

        session
            .source()
            .replace(json!([cv("2", "b.pdf", &[]), cv("3", "c.pdf", &[])]));
        assert_eq!(session.refresh().await.unwrap(), 2);
        assert_eq!(names(&session.results()), vec!["b.pdf", "c.pdf"]);
    }
}
