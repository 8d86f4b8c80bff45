//! # Catalog Service
//!
//! The catalog operations served to clients. Each method is the body of one
//! endpoint: it runs the right template, attaches tags where listings need
//! them and assembles the payload.
//!
//! Store failures never surface here; they arrive already collapsed to empty
//! listings or absent releases. The only error a call can return is a bind
//! error, which means a template and its call site disagree.

use std::sync::Arc;

use bridge_traits::database::{Parameter, QueryValue};
use bridge_traits::record::Record;
use core_catalog::enrichment;
use core_catalog::templates::{
    QueryTemplate, RELEASES_BY_ARTIST_ID, RELEASES_BY_ARTIST_NAME, RELEASES_BY_RELEASE_NAME,
    RELEASE_BY_ID, RELEASE_BY_RELEASE_GROUP_MBID, TRACKLIST_BY_RELEASE_GROUP_ID,
    TRACKLIST_BY_RELEASE_GROUP_MBID,
};
use core_catalog::QueryExecutor;
use core_metadata::CoverArtClient;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;

/// Column linking result rows to their release group
pub const RELEASE_GROUP_FIELD: &str = "release_group_id";

/// Field carrying the cover art thumbnail URL on release details
pub const IMAGE_FIELD: &str = "image";

/// Field carrying the top tag records on release details
pub const GENRE_FIELD: &str = "genre";

const DEFAULT_TAG_LIMIT: u32 = 1;

/// A release with its tracklist.
///
/// Serializes as `{"release": {...}, "tracklist": [...]}`; an unknown release
/// serializes as an empty object rather than `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleaseDetails {
    #[serde(serialize_with = "release_or_empty")]
    pub release: Option<Record>,
    pub tracklist: Vec<Record>,
}

fn release_or_empty<S: Serializer>(
    release: &Option<Record>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match release {
        Some(record) => record.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// Read-only catalog over the query engine
#[derive(Clone)]
pub struct CatalogService {
    executor: Arc<QueryExecutor>,
    cover_art: Option<Arc<CoverArtClient>>,
    tag_limit: u32,
}

impl CatalogService {
    /// Create a service. Without a cover art client, `image` is always null.
    pub fn new(executor: Arc<QueryExecutor>, cover_art: Option<Arc<CoverArtClient>>) -> Self {
        Self {
            executor,
            cover_art,
            tag_limit: DEFAULT_TAG_LIMIT,
        }
    }

    /// Number of top tags fetched per release group for listings
    pub fn with_tag_limit(mut self, limit: u32) -> Self {
        self.tag_limit = limit;
        self
    }

    /// Access the shared executor
    pub fn executor(&self) -> Arc<QueryExecutor> {
        Arc::clone(&self.executor)
    }

    /// Full-text search on artist name, tags attached.
    ///
    /// `all = false` keeps only plain albums. Blank names return an empty
    /// listing without touching the store.
    pub async fn releases_by_artist_name(
        &self,
        name: &str,
        all: bool,
        page: u32,
    ) -> Result<Vec<Record>> {
        self.search(&RELEASES_BY_ARTIST_NAME, name, all, page).await
    }

    /// Full-text search on release group name, tags attached.
    pub async fn releases_by_release_name(
        &self,
        name: &str,
        all: bool,
        page: u32,
    ) -> Result<Vec<Record>> {
        self.search(&RELEASES_BY_RELEASE_NAME, name, all, page).await
    }

    /// Every release group of one artist, tags attached.
    pub async fn releases_by_artist_id(
        &self,
        artist_id: i64,
        all: bool,
        page: u32,
    ) -> Result<Vec<Record>> {
        let params = [Parameter::Int64(artist_id), Parameter::Bool(all)];
        let records = self
            .executor
            .query_many(&RELEASES_BY_ARTIST_ID, page, &params)
            .await?;
        self.with_tags(records).await
    }

    /// One release group by internal id, with its tracklist.
    pub async fn release_by_id(&self, release_group_id: i64) -> Result<ReleaseDetails> {
        let params = [Parameter::Int64(release_group_id)];
        let (release, tracklist) = futures::try_join!(
            self.executor.query_one(&RELEASE_BY_ID, &params),
            self.executor
                .query_many(&TRACKLIST_BY_RELEASE_GROUP_ID, 0, &params),
        )?;

        Ok(ReleaseDetails { release, tracklist })
    }

    /// One release group by MBID, with cover art, genre and tracklist.
    ///
    /// `image` is the cover art thumbnail URL, or null when unavailable.
    /// `genre` is the list of top tag records (at most one), empty when the
    /// release group has no tags. A malformed MBID is treated as an unknown
    /// release.
    pub async fn release_by_mbid(&self, mbid: &str) -> Result<ReleaseDetails> {
        let mbid = match Uuid::parse_str(mbid.trim()) {
            Ok(mbid) => mbid.hyphenated().to_string(),
            Err(_) => {
                debug!(mbid = %mbid, "Ignoring malformed release group MBID");
                return Ok(ReleaseDetails::default());
            }
        };

        let params = [Parameter::Text(mbid.clone())];
        let Some(release) = self
            .executor
            .query_one(&RELEASE_BY_RELEASE_GROUP_MBID, &params)
            .await?
        else {
            return Ok(ReleaseDetails::default());
        };

        let (image, genre, tracklist) = futures::join!(
            self.cover_image(&mbid),
            self.genre(&release),
            self.executor
                .query_many(&TRACKLIST_BY_RELEASE_GROUP_MBID, 0, &params),
        );

        let mut release = release;
        release.insert(IMAGE_FIELD, image);
        release.insert(GENRE_FIELD, genre?);

        Ok(ReleaseDetails {
            release: Some(release),
            tracklist: tracklist?,
        })
    }

    /// Tracks of a release group, one page at a time.
    pub async fn tracklist(&self, release_group_id: i64, page: u32) -> Result<Vec<Record>> {
        let records = self
            .executor
            .query_many(
                &TRACKLIST_BY_RELEASE_GROUP_ID,
                page,
                &[Parameter::Int64(release_group_id)],
            )
            .await?;
        Ok(records)
    }

    async fn search(
        &self,
        template: &QueryTemplate,
        name: &str,
        all: bool,
        page: u32,
    ) -> Result<Vec<Record>> {
        let name = name.trim();
        if name.is_empty() {
            debug!(template = template.name, "Blank search text");
            return Ok(Vec::new());
        }

        let params = [
            Parameter::Text(name.to_string()),
            Parameter::Text(name.to_string()),
            Parameter::Bool(all),
        ];
        let records = self.executor.query_many(template, page, &params).await?;
        self.with_tags(records).await
    }

    async fn with_tags(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        let records =
            enrichment::attach_tags(&self.executor, records, RELEASE_GROUP_FIELD, self.tag_limit)
                .await?;
        Ok(records)
    }

    async fn genre(&self, release: &Record) -> Result<QueryValue> {
        let tags = enrichment::fetch_tag_map(
            &self.executor,
            std::slice::from_ref(release),
            RELEASE_GROUP_FIELD,
            1,
        )
        .await?;

        let top = release
            .get(RELEASE_GROUP_FIELD)
            .and_then(enrichment::group_key)
            .map(|key| tags.top_tags(&key).to_vec())
            .unwrap_or_default();
        Ok(QueryValue::Records(top))
    }

    async fn cover_image(&self, mbid: &str) -> QueryValue {
        let Some(client) = &self.cover_art else {
            return QueryValue::Null;
        };

        match client.thumbnail_url(mbid).await {
            Ok(url) => QueryValue::from(url),
            Err(e) => {
                warn!(mbid = %mbid, error = %e, "Cover art lookup failed");
                QueryValue::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_release_serializes_as_empty_object() {
        let details = ReleaseDetails::default();
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"release":{},"tracklist":[]}"#);
    }

    #[test]
    fn test_release_details_serialization_keeps_column_order() {
        let details = ReleaseDetails {
            release: Some(Record::from_iter([
                ("year", QueryValue::Int32(1994)),
                ("release_name", QueryValue::from("Dummy")),
                ("image", QueryValue::Null),
            ])),
            tracklist: vec![Record::from_iter([
                ("track_id", QueryValue::Int32(1)),
                ("title", QueryValue::from("Mysterons")),
            ])],
        };

        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(
            json,
            r#"{"release":{"year":1994,"release_name":"Dummy","image":null},"tracklist":[{"track_id":1,"title":"Mysterons"}]}"#
        );
    }
}
