//! Record source abstraction.
//!
//! The [`RecordSource`] trait is the single seam between the search
//! pipeline and the backend's file-listing endpoint. The HTTP client in the
//! `cvx` crate implements it; [`memory::InMemorySource`] serves fixed
//! listings for tests and embedding.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Provider of the raw listing response.
///
/// The returned value is whatever the backend sent; it is flattened into
/// records by [`coerce_records`](crate::normalize::coerce_records).
/// Retry and cancellation are the implementation's concern.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the full, unfiltered listing.
    async fn fetch_listing(&self) -> Result<Value>;
}
