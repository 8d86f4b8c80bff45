//! # Host Bridge Traits
//!
//! Capability traits and shared value types that the catalog core depends on
//! but does not implement itself.
//!
//! ## Overview
//!
//! The catalog engine never talks to PostgreSQL or to the network directly.
//! It goes through the traits in this crate so that the concrete drivers
//! (sqlx, reqwest) stay in adapter crates and tests can substitute fakes.
//!
//! ## Traits
//!
//! ### Store access
//! - [`ConnectionProvider`](database::ConnectionProvider) - Hands out one short-lived
//!   connection per logical operation
//! - [`CatalogConnection`](database::CatalogConnection) - Executes a single bound
//!   statement and marshals its rows into [`Record`](record::Record)s
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP GET used by the cover art lookup
//!
//! ## Value Types
//!
//! - [`QueryValue`](database::QueryValue) - Dynamically typed column value
//! - [`Parameter`](database::Parameter) - Closed set of bindable parameter kinds
//! - [`BoundStatement`](database::BoundStatement) - SQL text plus its ordered parameters
//! - [`Record`](record::Record) - Ordered, schema-less row
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Adapter
//! implementations should:
//!
//! - Map "could not reach the store" to `ConnectionFailed`
//! - Map statement or decoding failures to `QueryFailed`
//! - Keep messages actionable (no raw credentials)
//!
//! ## Thread Safety
//!
//! Providers and HTTP clients require `Send + Sync` so they can be shared
//! across request tasks behind an `Arc`. Connections only need `Send`: a
//! connection is owned by exactly one call.

pub mod database;
pub mod error;
pub mod http;
pub mod record;

pub use error::BridgeError;

// Re-export commonly used types
pub use database::{
    BoundStatement, CatalogConnection, ConnectionProvider, DatabaseConfig, Parameter, QueryValue,
};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use record::Record;
