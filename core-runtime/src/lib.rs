//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the release catalog:
//! - Logging and tracing infrastructure
//! - Configuration management (builder and environment sourcing)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other catalog crates depend
//! on. It establishes the logging conventions and the configuration surface
//! used to wire the store pool and the cover art client.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CatalogConfig, CatalogConfigBuilder, CoverArtConfig};
pub use error::{Error, Result};
