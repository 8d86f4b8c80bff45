//! Catalog service façade and bootstrap helpers.
//!
//! This crate wires the query engine (`core-catalog`) and the cover art
//! lookup (`core-metadata`) into the catalog operations an HTTP layer serves.
//! Server hosts typically enable the `desktop-shims` feature (which depends
//! on `bridge-desktop`) and call [`bootstrap`] with a [`CatalogConfig`].

pub mod catalog;
pub mod error;

pub use catalog::{CatalogService, ReleaseDetails};
pub use core_runtime::config::CatalogConfig;
pub use error::{Result, ServiceError};

#[cfg(feature = "desktop-shims")]
use std::sync::Arc;

#[cfg(feature = "desktop-shims")]
use bridge_desktop::ReqwestHttpClient;
#[cfg(feature = "desktop-shims")]
use core_catalog::{db::create_pool, PgConnectionProvider, QueryExecutor};
#[cfg(feature = "desktop-shims")]
use core_metadata::CoverArtClient;
#[cfg(feature = "desktop-shims")]
use tracing::info;

/// Build a ready-to-serve catalog from configuration.
///
/// Connects the PostgreSQL pool (failing fast if the store is unreachable)
/// and, when enabled, a reqwest-backed cover art client.
///
/// ```no_run
/// # async fn example() -> core_service::Result<()> {
/// use core_service::{bootstrap, CatalogConfig};
///
/// let config = CatalogConfig::from_env()?;
/// let catalog = bootstrap(&config).await?;
/// let releases = catalog.releases_by_artist_name("Portishead", false, 0).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap(config: &CatalogConfig) -> Result<CatalogService> {
    config.validate()?;

    let pool = create_pool(&config.database).await?;
    let executor = Arc::new(QueryExecutor::new(Arc::new(PgConnectionProvider::new(pool))));

    let cover_art = if config.cover_art.enabled {
        let http = ReqwestHttpClient::with_settings(
            &config.cover_art.user_agent,
            config.cover_art.request_timeout,
        )
        .map_err(|err| ServiceError::InitializationFailed(err.to_string()))?;
        Some(Arc::new(CoverArtClient::from_config(
            Arc::new(http),
            &config.cover_art,
        )))
    } else {
        None
    };

    info!(
        cover_art = cover_art.is_some(),
        tag_limit = config.tag_limit,
        "Catalog service ready"
    );

    Ok(CatalogService::new(executor, cover_art).with_tag_limit(config.tag_limit))
}
