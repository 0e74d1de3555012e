//! # cvx Core
//!
//! Shared, I/O-free logic for cvx: the technology pattern dictionary,
//! technology extraction, normalization of loosely-shaped backend records,
//! relevance scoring, and the search pipeline that composes them.
//!
//! This crate contains no HTTP client, filesystem access, or runtime.
//! Backend records arrive as [`serde_json::Value`] and every step degrades
//! to a sentinel value instead of failing.
//!
//! ## Pipeline
//!
//! ```text
//! listing ─▶ coerce_records ─▶ normalize_record ─▶ extract_technologies
//!                                                        │
//!                         sort ◀── filter ◀── relevance_score
//! ```

pub mod catalog;
pub mod extract;
pub mod normalize;
pub mod profile;
pub mod score;
pub mod search;
pub mod source;
