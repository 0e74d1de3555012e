//! # cvx
//!
//! Command-line companion for a CV-processing backend.
//!
//! The backend runs OCR and named-entity recognition over uploaded CVs and
//! serves the results as loosely-shaped JSON. `cvx` fetches those listings,
//! normalizes them through [`cvx_core`], and lets you browse, filter and rank
//! candidates by the technologies their CVs mention.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Backend    │──▶│ FilesClient  │──▶│   cvx-core   │
//! │  /file/all   │   │ (reqwest)    │   │ normalize +  │
//! └──────────────┘   └──────────────┘   │ score+search │
//!                                       └──────┬───────┘
//!                                              ▼
//!                                        ┌──────────┐
//!                                        │   CLI    │
//!                                        │  (cvx)   │
//!                                        └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cvx settings set-base-url http://localhost:8000
//! cvx health
//! cvx files
//! cvx search --tech react --tech docker --query maria
//! cvx show <file-id>
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Persisted TOML settings |
//! | [`client`] | HTTP client for the backend file API |
//! | [`files`] | `files` and `show` commands |
//! | [`search`] | `search` and `technologies` commands |
//! | [`transfer`] | `health`, `upload` and `download` commands |
//! | [`settings`] | `settings` commands |

pub mod client;
pub mod config;
pub mod files;
pub mod search;
pub mod settings;
pub mod transfer;
