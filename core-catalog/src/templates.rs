//! # Catalog Query Templates
//!
//! Fixed, parameterized statements over the MusicBrainz schema. Each template
//! declares how many `?` placeholders it carries; the executor appends the
//! `LIMIT ? OFFSET ?` pair itself, so those are not counted in `arity`.
//!
//! The engine treats the SQL as opaque. Only the projected column names are
//! relied on elsewhere:
//!
//! - release listings: `year, month, artist, release_name, total_tracks,
//!   artist_id, release_group_id, release_mbid, release_group_mbid`
//! - release detail: the listing columns plus `release_id`
//! - tracklists: `track_id, title, length, position, disc_number`
//! - tags: `release_group_id, tag, count`
//!
//! ## The `all` switch
//!
//! Listing templates take a trailing boolean. `false` keeps only release
//! groups whose primary type is Album (`type = 1`) and that have no secondary
//! type (compilation, live, ...); `true` lifts the filter.
//!
//! ## Release choice
//!
//! A release group has one or more releases. Listings and detail rows pick the
//! release with the lowest id, and the tracklist templates pick the same one,
//! so `total_tracks` agrees with the tracklist length.

/// An immutable, parameterized catalog statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplate {
    /// Stable name used in logs and bind errors
    pub name: &'static str,
    /// SQL text with `?` placeholders
    pub sql: &'static str,
    /// Number of `?` placeholders in `sql`
    pub arity: usize,
}

impl QueryTemplate {
    pub const fn new(name: &'static str, sql: &'static str, arity: usize) -> Self {
        Self { name, sql, arity }
    }
}

/// Full-text search on artist name.
///
/// Parameters: `Text(name)`, `Text(name)`, `Bool(all)`.
pub const RELEASES_BY_ARTIST_NAME: QueryTemplate = QueryTemplate::new(
    "releases_by_artist_name",
    r#"SELECT
  rg_year  AS year,
  rg_month AS month,
  artist,
  release_name,
  total_tracks,
  artist_id,
  release_group_id,
  release_mbid,
  release_group_mbid
FROM (
       SELECT DISTINCT ON (release_group_id)
         sum(track_count) OVER (PARTITION BY release_id) AS total_tracks,
         *
       FROM (
              SELECT
                medium.track_count         AS track_count,
                r.id                       AS release_group_id,
                rel.id                     AS release_id,
                r.gid                      AS release_group_mbid,
                rel.gid                    AS release_mbid,
                a.id                       AS artist_id,
                a.name                     AS artist,
                r.name                     AS release_name,
                m.first_release_date_year  AS rg_year,
                m.first_release_date_month AS rg_month,
                a.rank                     AS rank
              FROM
                (SELECT
                   name,
                   id,
                   ts_rank_cd(ts_name, plainto_tsquery('mb_simple', ?), 2) AS rank
                 FROM artist
                 WHERE ts_name @@ plainto_tsquery('mb_simple', ?)
                ) AS a
                INNER JOIN artist_credit_name c ON c.artist = a.id
                INNER JOIN release_group r ON r.artist_credit = c.artist_credit
                INNER JOIN release_group_meta m ON m.id = r.id
                INNER JOIN release rel ON rel.release_group = r.id
                INNER JOIN medium ON medium.release = rel.id
              WHERE (? OR (r.type = 1
                           AND NOT exists(SELECT 1
                                          FROM release_group_secondary_type_join j
                                          WHERE j.release_group = r.id)))
            ) AS tbl
       ORDER BY release_group_id, release_id
     ) AS tbl2
ORDER BY rank DESC, year, month, release_group_id"#,
    3,
);

/// Full-text search on release group name.
///
/// Parameters: `Text(name)`, `Text(name)`, `Bool(all)`.
pub const RELEASES_BY_RELEASE_NAME: QueryTemplate = QueryTemplate::new(
    "releases_by_release_name",
    r#"SELECT
  rg_year  AS year,
  rg_month AS month,
  artist,
  release_name,
  total_tracks,
  artist_id,
  release_group_id,
  release_mbid,
  release_group_mbid
FROM (
       SELECT DISTINCT ON (release_group_id)
         sum(track_count) OVER (PARTITION BY release_id) AS total_tracks,
         *
       FROM (
              SELECT
                medium.track_count         AS track_count,
                r.id                       AS release_group_id,
                rel.id                     AS release_id,
                r.gid                      AS release_group_mbid,
                rel.gid                    AS release_mbid,
                a.id                       AS artist_id,
                a.name                     AS artist,
                r.name                     AS release_name,
                m.first_release_date_year  AS rg_year,
                m.first_release_date_month AS rg_month,
                r.rank                     AS rank
              FROM
                (SELECT
                   name,
                   type,
                   id,
                   gid,
                   artist_credit,
                   ts_rank_cd(ts_name, plainto_tsquery('mb_simple', ?), 2) AS rank
                 FROM release_group
                 WHERE ts_name @@ plainto_tsquery('mb_simple', ?)
                ) AS r
                INNER JOIN artist_credit_name c ON c.artist_credit = r.artist_credit
                INNER JOIN artist a ON a.id = c.artist
                INNER JOIN release_group_meta m ON m.id = r.id
                INNER JOIN release rel ON rel.release_group = r.id
                INNER JOIN medium ON medium.release = rel.id
              WHERE (? OR (r.type = 1
                           AND NOT exists(SELECT 1
                                          FROM release_group_secondary_type_join j
                                          WHERE j.release_group = r.id)))
            ) AS tbl
       ORDER BY release_group_id, release_id
     ) AS tbl2
ORDER BY rank DESC, year, month, release_group_id"#,
    3,
);

/// Every release group credited to one artist.
///
/// Parameters: `Int64(artist_id)`, `Bool(all)`.
pub const RELEASES_BY_ARTIST_ID: QueryTemplate = QueryTemplate::new(
    "releases_by_artist_id",
    r#"SELECT
  rg_year  AS year,
  rg_month AS month,
  artist,
  release_name,
  total_tracks,
  artist_id,
  release_group_id,
  release_mbid,
  release_group_mbid
FROM (
       SELECT DISTINCT ON (release_group_id)
         sum(track_count) OVER (PARTITION BY release_id) AS total_tracks,
         *
       FROM (
              SELECT
                medium.track_count         AS track_count,
                r.id                       AS release_group_id,
                rel.id                     AS release_id,
                r.gid                      AS release_group_mbid,
                rel.gid                    AS release_mbid,
                a.id                       AS artist_id,
                a.name                     AS artist,
                r.name                     AS release_name,
                m.first_release_date_year  AS rg_year,
                m.first_release_date_month AS rg_month
              FROM artist a
                INNER JOIN artist_credit_name c ON c.artist = a.id
                INNER JOIN release_group r ON r.artist_credit = c.artist_credit
                INNER JOIN release_group_meta m ON m.id = r.id
                INNER JOIN release rel ON rel.release_group = r.id
                INNER JOIN medium ON medium.release = rel.id
              WHERE a.id = ?
                AND (? OR (r.type = 1
                           AND NOT exists(SELECT 1
                                          FROM release_group_secondary_type_join j
                                          WHERE j.release_group = r.id)))
            ) AS tbl
       ORDER BY release_group_id, release_id
     ) AS tbl2
ORDER BY year, month, release_group_id"#,
    2,
);

/// One release group by internal id.
///
/// Parameters: `Int64(release_group_id)`.
pub const RELEASE_BY_ID: QueryTemplate = QueryTemplate::new(
    "release_by_id",
    r#"SELECT
  rg_year  AS year,
  rg_month AS month,
  artist,
  release_name,
  total_tracks,
  artist_id,
  release_group_id,
  release_id,
  release_mbid,
  release_group_mbid
FROM (
       SELECT DISTINCT ON (release_group_id)
         sum(track_count) OVER (PARTITION BY release_id) AS total_tracks,
         *
       FROM (
              SELECT
                medium.track_count         AS track_count,
                r.id                       AS release_group_id,
                rel.id                     AS release_id,
                r.gid                      AS release_group_mbid,
                rel.gid                    AS release_mbid,
                a.id                       AS artist_id,
                a.name                     AS artist,
                r.name                     AS release_name,
                m.first_release_date_year  AS rg_year,
                m.first_release_date_month AS rg_month
              FROM release_group r
                INNER JOIN artist_credit_name c ON c.artist_credit = r.artist_credit
                INNER JOIN artist a ON a.id = c.artist
                INNER JOIN release_group_meta m ON m.id = r.id
                INNER JOIN release rel ON rel.release_group = r.id
                INNER JOIN medium ON medium.release = rel.id
              WHERE r.id = ?
            ) AS tbl
       ORDER BY release_group_id, release_id
     ) AS tbl2"#,
    1,
);

/// One release group by its MusicBrainz identifier.
///
/// Parameters: `Text(release_group_mbid)`.
pub const RELEASE_BY_RELEASE_GROUP_MBID: QueryTemplate = QueryTemplate::new(
    "release_by_release_group_mbid",
    r#"SELECT
  rg_year  AS year,
  rg_month AS month,
  artist,
  release_name,
  total_tracks,
  artist_id,
  release_group_id,
  release_id,
  release_mbid,
  release_group_mbid
FROM (
       SELECT DISTINCT ON (release_group_id)
         sum(track_count) OVER (PARTITION BY release_id) AS total_tracks,
         *
       FROM (
              SELECT
                medium.track_count         AS track_count,
                r.id                       AS release_group_id,
                rel.id                     AS release_id,
                r.gid                      AS release_group_mbid,
                rel.gid                    AS release_mbid,
                a.id                       AS artist_id,
                a.name                     AS artist,
                r.name                     AS release_name,
                m.first_release_date_year  AS rg_year,
                m.first_release_date_month AS rg_month
              FROM release_group r
                INNER JOIN artist_credit_name c ON c.artist_credit = r.artist_credit
                INNER JOIN artist a ON a.id = c.artist
                INNER JOIN release_group_meta m ON m.id = r.id
                INNER JOIN release rel ON rel.release_group = r.id
                INNER JOIN medium ON medium.release = rel.id
              WHERE r.gid = CAST(? AS uuid)
            ) AS tbl
       ORDER BY release_group_id, release_id
     ) AS tbl2"#,
    1,
);

/// Tracks of the representative release of a release group.
///
/// Parameters: `Int64(release_group_id)`.
pub const TRACKLIST_BY_RELEASE_GROUP_ID: QueryTemplate = QueryTemplate::new(
    "tracklist_by_release_group_id",
    r#"SELECT
  t.id        AS track_id,
  t.name      AS title,
  t.length    AS length,
  t.position  AS position,
  m.position  AS disc_number
FROM (SELECT rel.id AS release_id
      FROM release rel
      WHERE rel.release_group = ?
      ORDER BY rel.id
      LIMIT 1) AS chosen
  INNER JOIN medium m ON m.release = chosen.release_id
  INNER JOIN track t ON t.medium = m.id
ORDER BY disc_number, t.position"#,
    1,
);

/// Tracks of the representative release, addressed by release group MBID.
///
/// Parameters: `Text(release_group_mbid)`.
pub const TRACKLIST_BY_RELEASE_GROUP_MBID: QueryTemplate = QueryTemplate::new(
    "tracklist_by_release_group_mbid",
    r#"SELECT
  t.id        AS track_id,
  t.name      AS title,
  t.length    AS length,
  t.position  AS position,
  m.position  AS disc_number
FROM (SELECT rel.id AS release_id
      FROM release rel
        INNER JOIN release_group r ON r.id = rel.release_group
      WHERE r.gid = CAST(? AS uuid)
      ORDER BY rel.id
      LIMIT 1) AS chosen
  INNER JOIN medium m ON m.release = chosen.release_id
  INNER JOIN track t ON t.medium = m.id
ORDER BY disc_number, t.position"#,
    1,
);

/// Top tags of a set of release groups, ranked per group by usage count.
///
/// Parameters: `Int32List(release_group_ids)`, `Int32(limit)`.
pub const TAGS_BY_RELEASE_GROUPS: QueryTemplate = QueryTemplate::new(
    "tags_by_release_groups",
    r#"SELECT
  release_group_id,
  tag,
  count
FROM (
       SELECT
         rgt.release_group AS release_group_id,
         t.name            AS tag,
         rgt.count         AS count,
         row_number() OVER (PARTITION BY rgt.release_group
                            ORDER BY rgt.count DESC, t.name) AS tag_rank
       FROM release_group_tag rgt
         INNER JOIN tag t ON t.id = rgt.tag
       WHERE rgt.release_group = ANY(?)
     ) AS ranked
WHERE tag_rank <= ?
ORDER BY release_group_id, tag_rank"#,
    2,
);

/// Every template, for bulk checks
pub const ALL_TEMPLATES: [QueryTemplate; 8] = [
    RELEASES_BY_ARTIST_NAME,
    RELEASES_BY_RELEASE_NAME,
    RELEASES_BY_ARTIST_ID,
    RELEASE_BY_ID,
    RELEASE_BY_RELEASE_GROUP_MBID,
    TRACKLIST_BY_RELEASE_GROUP_ID,
    TRACKLIST_BY_RELEASE_GROUP_MBID,
    TAGS_BY_RELEASE_GROUPS,
];
