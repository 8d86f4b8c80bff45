//! Store adapter implementations
//!
//! Concrete implementations of the bridge `ConnectionProvider` /
//! `CatalogConnection` traits.

pub mod postgres;

pub use postgres::{PgCatalogConnection, PgConnectionProvider};
