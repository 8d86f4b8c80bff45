//! # Database Connection Pool Module
//!
//! Builds the PostgreSQL connection pool the catalog reads from.
//!
//! ## Features
//!
//! - **Connection Pooling**: Configurable min/max connections with timeouts
//! - **Statement Caching**: Prepared statement cache per connection
//! - **Health Checks**: Connection validation on eager creation
//! - **Redacted Logging**: Connection strings are logged without passwords
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bridge_traits::database::DatabaseConfig;
//! use core_catalog::db::create_pool;
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! ```
//!
//! The catalog schema is owned by the MusicBrainz mirror; nothing here runs
//! migrations.

use crate::Result;
use bridge_traits::database::DatabaseConfig;
use core_runtime::logging::redact_connection_string;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.database_url)?
        .statement_cache_capacity(config.statement_cache_capacity);
    Ok(options)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Create a configured PostgreSQL connection pool
///
/// Opens `min_connections` connections up front and runs a health check, so
/// a wrong URL or unreachable server is reported at startup.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed, the pool cannot connect or
/// the health check fails.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!(
        database_url = %redact_connection_string(&config.database_url),
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "Creating database connection pool"
    );

    let pool = pool_options(config)
        .connect_with(connect_options(config)?)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            e
        })?;

    health_check(&pool).await?;

    info!(
        connections = pool.size(),
        "Database connection pool created successfully"
    );
    Ok(pool)
}

/// Create a pool that connects on first use
///
/// No I/O happens here; an unreachable server surfaces later as acquire
/// failures, which the executor degrades to empty results.
pub fn create_lazy_pool(config: &DatabaseConfig) -> Result<PgPool> {
    debug!(
        database_url = %redact_connection_string(&config.database_url),
        "Creating lazy database connection pool"
    );

    Ok(pool_options(config).connect_lazy_with(connect_options(config)?))
}

/// Perform a health check on the connection pool
async fn health_check(pool: &PgPool) -> Result<()> {
    debug!("Performing database health check");

    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        e
    })?;

    debug!("Database health check passed");
    Ok(())
}
