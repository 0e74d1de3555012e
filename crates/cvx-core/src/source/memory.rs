//! In-memory [`RecordSource`] for tests and embedding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::RecordSource;

/// Serves a fixed listing, replaceable between fetches.
pub struct InMemorySource {
    listing: RwLock<Value>,
    fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new(listing: Value) -> Self {
        Self {
            listing: RwLock::new(listing),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace the listing served by subsequent fetches.
    pub fn replace(&self, listing: Value) {
        let mut guard = self.listing.write().unwrap_or_else(|e| e.into_inner());
        *guard = listing;
    }

    /// Number of completed fetches.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(Value::Array(Vec::new()))
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_listing(&self) -> Result<Value> {
        let listing = self
            .listing
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(listing)
    }
}
