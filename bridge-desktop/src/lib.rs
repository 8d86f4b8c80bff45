//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for server and desktop hosts.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` (rustls, redirect following)
//!
//! The PostgreSQL connection provider lives next to the query engine in
//! `core-catalog::adapters`, since it also owns row marshaling.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! ```

mod http;

pub use http::{ReqwestHttpClient, DEFAULT_USER_AGENT};
