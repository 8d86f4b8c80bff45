//! # Release Metadata Module
//!
//! Looks up auxiliary release metadata that does not live in the catalog
//! store.
//!
//! ## Overview
//!
//! This module handles:
//! - Cover art thumbnails from the Cover Art Archive, keyed by release group MBID

pub mod error;
pub mod providers;

pub use error::{MetadataError, Result};
pub use providers::CoverArtClient;
