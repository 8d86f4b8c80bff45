//! # Tag Enrichment
//!
//! Decorates result records with the top tags of the release group they
//! reference, using one batched tag query per call.
//!
//! The pass never adds, drops or reorders records: output length and order
//! equal the input's. Records whose group has no tags, or that carry no
//! usable group id, come back unchanged.

use std::collections::{HashMap, HashSet};

use bridge_traits::database::{Parameter, QueryValue};
use bridge_traits::record::Record;
use tracing::{debug, warn};

use crate::error::Result;
use crate::executor::{QueryExecutor, QueryOutcome};
use crate::pagination::PageRequest;
use crate::templates::TAGS_BY_RELEASE_GROUPS;

/// Group id column of the tag query projection
pub const TAG_GROUP_FIELD: &str = "release_group_id";

/// Usage count column of the tag query projection
pub const TAG_COUNT_FIELD: &str = "count";

/// Tag name column of the tag query projection
pub const TAG_NAME_FIELD: &str = "tag";

/// Canonical map key for a group id value.
///
/// Integral values and numeric text map to the same key, so `7`, `7i64` and
/// `"7"` all address one group.
pub fn group_key(value: &QueryValue) -> Option<String> {
    match value {
        QueryValue::Int32(_) | QueryValue::Int64(_) => value.as_i64().map(|id| id.to_string()),
        QueryValue::Text(text) => text.trim().parse::<i64>().ok().map(|id| id.to_string()),
        _ => None,
    }
}

/// Group id as bound to the tag query (`INT4[]`)
fn group_id(value: &QueryValue) -> Option<i32> {
    match value {
        QueryValue::Text(text) => text.trim().parse::<i32>().ok(),
        other => other.as_i32(),
    }
}

/// Ranked tags per release group, built once per enrichment call.
#[derive(Debug, Default)]
pub struct TagMap {
    groups: HashMap<String, Vec<Record>>,
}

impl TagMap {
    /// Group tag rows by `group_field` and keep the top `limit` per group.
    ///
    /// Rows are ranked by descending `count`; ties keep the order the store
    /// returned them in. Rows without a usable group id are ignored.
    pub fn from_rows(rows: Vec<Record>, group_field: &str, limit: usize) -> Self {
        let mut groups: HashMap<String, Vec<Record>> = HashMap::new();
        for row in rows {
            let Some(key) = row.get(group_field).and_then(group_key) else {
                continue;
            };
            groups.entry(key).or_default().push(row);
        }

        for tags in groups.values_mut() {
            tags.sort_by_key(|tag| {
                std::cmp::Reverse(
                    tag.get(TAG_COUNT_FIELD)
                        .and_then(QueryValue::as_i64)
                        .unwrap_or(i64::MIN),
                )
            });
            tags.truncate(limit);
        }
        groups.retain(|_, tags| !tags.is_empty());

        Self { groups }
    }

    /// Ranked tags of one group, best first
    pub fn top_tags(&self, group: &str) -> &[Record] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The tag record merged into primary records of this group
    pub fn representative(&self, group: &str) -> Option<&Record> {
        self.top_tags(group).first()
    }

    /// Number of groups with at least one tag
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Distinct usable group ids in first-seen order
fn distinct_group_ids(records: &[Record], group_id_field: &str) -> Vec<i32> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.get(group_id_field).and_then(group_id))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Fetch the tag map for the groups referenced by `records`.
///
/// Returns an empty map without a round trip when no record carries a group
/// id. A failed tag query is logged and also yields an empty map.
///
/// Tag rows are read page by page until a short page comes back, or until
/// `limit` rows per group have been read.
///
/// # Errors
///
/// Returns `CatalogError::Bind` only on a template contract violation.
pub async fn fetch_tag_map(
    executor: &QueryExecutor,
    records: &[Record],
    group_id_field: &str,
    limit: u32,
) -> Result<TagMap> {
    if limit == 0 {
        return Ok(TagMap::default());
    }

    let ids = distinct_group_ids(records, group_id_field);
    if ids.is_empty() {
        debug!("No release group ids to enrich");
        return Ok(TagMap::default());
    }

    let group_count = ids.len();
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let max_rows = group_count.saturating_mul(limit);
    let params = [
        Parameter::Int32List(ids),
        Parameter::Int32(i32::try_from(limit).unwrap_or(i32::MAX)),
    ];

    let mut rows = Vec::new();
    let mut page = PageRequest::first();
    loop {
        let batch = match executor
            .fetch_page(&TAGS_BY_RELEASE_GROUPS, page, &params)
            .await?
        {
            QueryOutcome::Rows(batch) => batch,
            QueryOutcome::Failed(e) => {
                warn!(error = %e, group_count, page = page.page, "Tag lookup failed, returning records without tags");
                return Ok(TagMap::default());
            }
        };

        let short_page = batch.len() < page.page_size as usize;
        rows.extend(batch);
        if short_page || rows.len() >= max_rows {
            break;
        }
        page = PageRequest::new(page.page + 1);
    }

    let map = TagMap::from_rows(rows, TAG_GROUP_FIELD, limit);
    debug!(
        group_count,
        tagged_groups = map.len(),
        pages = page.page + 1,
        "Fetched release group tags"
    );
    Ok(map)
}

/// Merge each record with the representative tag of its group.
///
/// Tag fields win on key collision. Records without an entry pass through.
pub fn merge_tags(records: Vec<Record>, tags: &TagMap, group_id_field: &str) -> Vec<Record> {
    if tags.is_empty() {
        return records;
    }

    records
        .into_iter()
        .map(|record| {
            let tag = record
                .get(group_id_field)
                .and_then(group_key)
                .and_then(|key| tags.representative(&key));
            match tag {
                Some(tag) => record.merged_with(tag),
                None => record,
            }
        })
        .collect()
}

/// Attach up to `limit` top tags per release group to `records`.
///
/// One extra round trip at most; see [`fetch_tag_map`] and [`merge_tags`].
///
/// # Errors
///
/// Returns `CatalogError::Bind` only on a template contract violation.
pub async fn attach_tags(
    executor: &QueryExecutor,
    records: Vec<Record>,
    group_id_field: &str,
    limit: u32,
) -> Result<Vec<Record>> {
    let tags = fetch_tag_map(executor, &records, group_id_field, limit).await?;
    Ok(merge_tags(records, &tags, group_id_field))
}
