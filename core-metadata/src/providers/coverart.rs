//! Cover Art Archive Client
//!
//! Resolves a release group MBID to a small thumbnail URL.
//!
//! ## API Endpoint
//!
//! - **Release group art**: `https://coverartarchive.org/release-group/{mbid}`
//!
//! The endpoint answers with a redirect to the archive's storage host; the
//! HTTP client is expected to follow it. The JSON body looks like:
//!
//! ```json
//! {
//!   "images": [
//!     { "front": true, "thumbnails": { "small": "https://...-250.jpg", "large": "https://...-500.jpg" } }
//!   ],
//!   "release": "https://musicbrainz.org/release/..."
//! }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::CoverArtClient;
//!
//! let client = CoverArtClient::new(http_client, "https://coverartarchive.org", "release-catalog/0.1");
//! let thumbnail = client.thumbnail_url("1b022e01-4da6-387b-8658-8678046e4cef").await?;
//! ```

use crate::error::{MetadataError, Result};
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::CoverArtConfig;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Timeout for API requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct CoverArtResponse {
    #[serde(default)]
    images: Vec<CoverArtImage>,
}

#[derive(Debug, Deserialize)]
struct CoverArtImage {
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    small: Option<String>,
}

/// Cover Art Archive client
pub struct CoverArtClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl CoverArtClient {
    /// Creates a new client
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Archive base URL, e.g. `https://coverartarchive.org`
    /// * `user_agent` - User agent string (format: "AppName/Version (Contact)")
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Creates a client from the runtime cover art settings
    pub fn from_config(http_client: Arc<dyn HttpClient>, config: &CoverArtConfig) -> Self {
        Self::new(http_client, config.base_url.clone(), config.user_agent.clone())
            .with_timeout(config.request_timeout)
    }

    /// Overrides the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetches the small thumbnail URL of the first image of a release group
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` - Thumbnail URL
    /// - `Ok(None)` - The archive has no art for this release group
    /// - `Err` - Invalid MBID, network failure, unexpected status or body
    pub async fn thumbnail_url(&self, release_group_mbid: &str) -> Result<Option<String>> {
        let mbid = Uuid::parse_str(release_group_mbid.trim())
            .map_err(|_| MetadataError::InvalidMbid(release_group_mbid.to_string()))?;

        let url = format!("{}/release-group/{}", self.base_url, mbid.hyphenated());
        debug!(url = %url, "Fetching cover art listing");

        let request = HttpRequest::get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| MetadataError::NetworkError(format!("Cover art fetch failed: {}", e)))?;

        match response.status {
            200 => {}
            404 => {
                debug!(mbid = %mbid, "No cover art available");
                return Ok(None);
            }
            503 => {
                warn!("Cover Art Archive service unavailable (503)");
                return Ok(None);
            }
            status => {
                return Err(MetadataError::HttpError {
                    status,
                    body: String::from_utf8_lossy(&response.body).to_string(),
                })
            }
        }

        let listing: CoverArtResponse = serde_json::from_slice(&response.body).map_err(|e| {
            MetadataError::JsonParse(format!("Failed to parse cover art listing: {}", e))
        })?;

        Ok(listing
            .images
            .into_iter()
            .next()
            .and_then(|image| image.thumbnails.small))
    }
}
