//! Generic row marshaling
//!
//! Converts driver rows into schema-less [`Record`]s using only the row's own
//! column metadata. Nothing here knows which query produced the row.

use bridge_traits::database::QueryValue;
use bridge_traits::record::Record;
use futures::{Stream, TryStreamExt};

use crate::error::Result;

/// Read access to one result row.
///
/// Implemented for `sqlx::postgres::PgRow` in the PostgreSQL adapter; tests
/// implement it over plain vectors.
pub trait RowView {
    fn column_count(&self) -> usize;

    /// Column name as reported by the driver (case untouched)
    fn column_name(&self, index: usize) -> &str;

    /// Decode the value at `index`
    fn value(&self, index: usize) -> Result<QueryValue>;
}

/// How a column's store type is surfaced as a [`QueryValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    /// `INT2`, widened to `Int32`
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Text,
    /// Rendered as hyphenated text
    Uuid,
    /// Rendered as ISO 8601 text
    Date,
    Timestamp,
    TimestampTz,
    /// Anything else; surfaced as raw bytes
    Other,
}

impl ColumnKind {
    /// Classify a PostgreSQL type name (`TypeInfo::name()`).
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => Self::Bool,
            "INT2" | "SMALLINT" => Self::SmallInt,
            "INT4" | "INT" | "INTEGER" => Self::Int,
            "INT8" | "BIGINT" => Self::BigInt,
            "FLOAT4" | "REAL" => Self::Float,
            "FLOAT8" | "DOUBLE PRECISION" => Self::Double,
            "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => Self::Text,
            "UUID" => Self::Uuid,
            "DATE" => Self::Date,
            "TIMESTAMP" => Self::Timestamp,
            "TIMESTAMPTZ" => Self::TimestampTz,
            _ => Self::Other,
        }
    }
}

/// Marshal a single row into a record.
///
/// Column names are lower-cased; column order is preserved.
pub fn marshal_one<R: RowView>(row: &R) -> Result<Record> {
    let count = row.column_count();
    let mut record = Record::with_capacity(count);
    for index in 0..count {
        record.insert(row.column_name(index), row.value(index)?);
    }
    Ok(record)
}

/// Drain a row stream into records.
///
/// An exhausted stream yields an empty vector. The first driver or decode
/// error aborts the drain.
pub async fn marshal_all<S, R>(mut rows: S) -> Result<Vec<Record>>
where
    S: Stream<Item = std::result::Result<R, sqlx::Error>> + Unpin,
    R: RowView,
{
    let mut records = Vec::new();
    while let Some(row) = rows.try_next().await? {
        records.push(marshal_one(&row)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use futures::stream;

    struct FakeRow(Vec<(&'static str, QueryValue)>);

    impl RowView for FakeRow {
        fn column_count(&self) -> usize {
            self.0.len()
        }

        fn column_name(&self, index: usize) -> &str {
            self.0[index].0
        }

        fn value(&self, index: usize) -> Result<QueryValue> {
            Ok(self.0[index].1.clone())
        }
    }

    #[test]
    fn test_column_kind_mapping() {
        assert_eq!(ColumnKind::from_type_name("BOOL"), ColumnKind::Bool);
        assert_eq!(ColumnKind::from_type_name("INT2"), ColumnKind::SmallInt);
        assert_eq!(ColumnKind::from_type_name("INT4"), ColumnKind::Int);
        assert_eq!(ColumnKind::from_type_name("INT8"), ColumnKind::BigInt);
        assert_eq!(ColumnKind::from_type_name("FLOAT8"), ColumnKind::Double);
        assert_eq!(ColumnKind::from_type_name("varchar"), ColumnKind::Text);
        assert_eq!(ColumnKind::from_type_name("UUID"), ColumnKind::Uuid);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMPTZ"), ColumnKind::TimestampTz);
        assert_eq!(ColumnKind::from_type_name("NUMERIC"), ColumnKind::Other);
        assert_eq!(ColumnKind::from_type_name("INT4[]"), ColumnKind::Other);
    }

    #[test]
    fn test_marshal_one_lowercases_and_keeps_order() {
        let row = FakeRow(vec![
            ("Year", QueryValue::Int32(1997)),
            ("ARTIST", QueryValue::Text("Björk".into())),
            ("release_mbid", QueryValue::Null),
        ]);

        let record = marshal_one(&row).unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["year", "artist", "release_mbid"]);
        assert_eq!(record.get("artist"), Some(&QueryValue::Text("Björk".into())));
        assert_eq!(record.get("release_mbid"), Some(&QueryValue::Null));
    }

    #[test]
    fn test_marshal_one_empty_row() {
        let record = marshal_one(&FakeRow(vec![])).unwrap();
        assert!(record.is_empty());
    }

    #[tokio::test]
    async fn test_marshal_all_exhausted_stream_is_empty() {
        let rows = stream::iter(Vec::<std::result::Result<FakeRow, sqlx::Error>>::new());
        let records = marshal_all(rows).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_marshal_all_preserves_row_order() {
        let rows = stream::iter(vec![
            Ok(FakeRow(vec![("id", QueryValue::Int32(2))])),
            Ok(FakeRow(vec![("id", QueryValue::Int32(1))])),
            Ok(FakeRow(vec![("id", QueryValue::Int32(3))])),
        ]);

        let records = marshal_all(rows).await.unwrap();
        let ids: Vec<_> = records
            .iter()
            .map(|r| r.get("id").and_then(QueryValue::as_i32))
            .collect();
        assert_eq!(ids, vec![Some(2), Some(1), Some(3)]);
    }

    #[tokio::test]
    async fn test_marshal_all_stops_on_driver_error() {
        let rows = stream::iter(vec![
            Ok(FakeRow(vec![("id", QueryValue::Int32(1))])),
            Err(sqlx::Error::RowNotFound),
        ]);

        let err = marshal_all(rows).await.unwrap_err();
        assert!(matches!(err, CatalogError::Database(_)));
    }
}
