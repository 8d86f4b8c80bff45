//! # Release Catalog Engine
//!
//! Read-only query engine over a MusicBrainz-style PostgreSQL schema.
//!
//! ## Overview
//!
//! This crate provides:
//! - Fixed query templates for releases, tracklists and tags (`templates`)
//! - Typed parameter binding with PostgreSQL placeholders (`binder`)
//! - Column-agnostic row marshaling into ordered records (`marshal`)
//! - A paginated executor over pooled connections (`executor`)
//! - Batched top-tag enrichment of result records (`enrichment`)
//! - The sqlx-backed store adapter and pool construction (`adapters`, `db`)

pub mod adapters;
pub mod binder;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod executor;
pub mod marshal;
pub mod pagination;
pub mod templates;

pub use adapters::PgConnectionProvider;
pub use enrichment::{attach_tags, TagMap};
pub use error::{BindError, CatalogError, Result};
pub use executor::{QueryExecutor, QueryOutcome};
pub use pagination::{PageRequest, PAGE_SIZE};
pub use templates::QueryTemplate;
