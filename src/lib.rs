//! Track professional achievements and touchpoints.
//!
//! Ohara keeps three kinds of records in a single data directory:
//!
//! | Record | File | Mutations |
//! |--------|------|-----------|
//! | **Touchpoint** | `touchpoints.json` | create, update, delete |
//! | **Metadata** (categories, tags) | `metadata.json` | add, remove |
//! | **Report** | `reports/*.md` | create only |
//!
//! Touchpoints are validated against the metadata vocabulary when written,
//! and their free-text fields are stripped of markup first.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`store`] — The file-backed store: persistence, locking, validation, filtering
//! - [`server`] — axum HTTP API over the store

pub mod cli;
pub mod config;
pub mod server;
pub mod store;
