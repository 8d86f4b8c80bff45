//! PostgreSQL Store Adapter
//!
//! Implements the bridge connection traits on top of a `sqlx::PgPool`.
//!
//! ## Features
//!
//! - One pooled connection per statement, returned to the pool on drop
//! - Exhaustive parameter binding (`Int32List` binds as `INT4[]`)
//! - Rows marshaled through [`RowView`] using the driver's column metadata

use async_trait::async_trait;
use bridge_traits::database::{
    BoundStatement, CatalogConnection, ConnectionProvider, Parameter, QueryValue,
};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::record::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgArguments, PgPool, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::marshal::{marshal_all, marshal_one, ColumnKind, RowView};

/// Hands out pooled PostgreSQL connections
#[derive(Clone)]
pub struct PgConnectionProvider {
    pool: PgPool,
}

impl PgConnectionProvider {
    /// Wrap an already configured pool (see [`crate::db::create_pool`])
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ConnectionProvider for PgConnectionProvider {
    async fn acquire(&self) -> BridgeResult<Box<dyn CatalogConnection>> {
        let conn = self.pool.acquire().await.map_err(|e| {
            warn!(error = %e, "Failed to acquire store connection");
            BridgeError::ConnectionFailed(e.to_string())
        })?;

        Ok(Box::new(PgCatalogConnection { conn }))
    }
}

/// A single pooled connection serving one statement
pub struct PgCatalogConnection {
    conn: PoolConnection<Postgres>,
}

impl PgCatalogConnection {
    fn bind_params<'q>(
        query: Query<'q, Postgres, PgArguments>,
        params: &'q [Parameter],
    ) -> Query<'q, Postgres, PgArguments> {
        params.iter().fold(query, |query, param| match param {
            Parameter::Text(s) => query.bind(s.as_str()),
            Parameter::Int32(i) => query.bind(*i),
            Parameter::Int64(i) => query.bind(*i),
            Parameter::Bool(b) => query.bind(*b),
            Parameter::Int32List(ids) => query.bind(ids.as_slice()),
        })
    }
}

#[async_trait]
impl CatalogConnection for PgCatalogConnection {
    async fn fetch_all(&mut self, statement: &BoundStatement) -> BridgeResult<Vec<Record>> {
        debug!(sql = %statement.sql, param_count = statement.params.len(), "Executing statement");

        let query = Self::bind_params(sqlx::query(&statement.sql), &statement.params);
        let rows = query.fetch(&mut *self.conn);
        let records = marshal_all(rows).await.map_err(into_bridge_error)?;

        debug!(row_count = records.len(), "Statement executed successfully");
        Ok(records)
    }

    async fn fetch_first(&mut self, statement: &BoundStatement) -> BridgeResult<Option<Record>> {
        debug!(sql = %statement.sql, param_count = statement.params.len(), "Executing statement for first row");

        let query = Self::bind_params(sqlx::query(&statement.sql), &statement.params);
        let row = query
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| classify_sqlx_error(&e))?;

        row.as_ref()
            .map(marshal_one)
            .transpose()
            .map_err(into_bridge_error)
    }
}

impl RowView for PgRow {
    fn column_count(&self) -> usize {
        self.columns().len()
    }

    fn column_name(&self, index: usize) -> &str {
        self.columns()[index].name()
    }

    fn value(&self, index: usize) -> Result<QueryValue> {
        decode_column(self, index)
    }
}

fn decode_column(row: &PgRow, index: usize) -> Result<QueryValue> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(QueryValue::Null);
    }

    let kind = ColumnKind::from_type_name(raw.type_info().name());
    let value = match kind {
        ColumnKind::Bool => QueryValue::Bool(row.try_get::<bool, _>(index)?),
        ColumnKind::SmallInt => QueryValue::Int32(i32::from(row.try_get::<i16, _>(index)?)),
        ColumnKind::Int => QueryValue::Int32(row.try_get::<i32, _>(index)?),
        ColumnKind::BigInt => QueryValue::Int64(row.try_get::<i64, _>(index)?),
        ColumnKind::Float => QueryValue::Real(f64::from(row.try_get::<f32, _>(index)?)),
        ColumnKind::Double => QueryValue::Real(row.try_get::<f64, _>(index)?),
        ColumnKind::Text => QueryValue::Text(row.try_get::<String, _>(index)?),
        ColumnKind::Uuid => QueryValue::Text(row.try_get::<Uuid, _>(index)?.hyphenated().to_string()),
        ColumnKind::Date => {
            QueryValue::Text(row.try_get::<NaiveDate, _>(index)?.format("%Y-%m-%d").to_string())
        }
        ColumnKind::Timestamp => QueryValue::Text(
            row.try_get::<NaiveDateTime, _>(index)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        ColumnKind::TimestampTz => {
            QueryValue::Text(row.try_get::<DateTime<Utc>, _>(index)?.to_rfc3339())
        }
        ColumnKind::Other => {
            let bytes = raw
                .as_bytes()
                .map_err(|e| CatalogError::Database(sqlx::Error::Decode(e)))?;
            QueryValue::Opaque(bytes.to_vec())
        }
    };

    Ok(value)
}

/// Sort driver errors into "never reached the store" and "statement failed"
fn classify_sqlx_error(err: &sqlx::Error) -> BridgeError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => BridgeError::ConnectionFailed(err.to_string()),
        _ => BridgeError::QueryFailed(err.to_string()),
    }
}

fn into_bridge_error(err: CatalogError) -> BridgeError {
    match err {
        CatalogError::Bridge(e) => e,
        CatalogError::Database(e) => classify_sqlx_error(&e),
        other => BridgeError::QueryFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_connection_errors() {
        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        assert!(classify_sqlx_error(&io).is_connection_failure());
        assert!(classify_sqlx_error(&sqlx::Error::PoolTimedOut).is_connection_failure());
    }

    #[test]
    fn test_classify_statement_errors() {
        let err = classify_sqlx_error(&sqlx::Error::RowNotFound);
        assert!(matches!(err, BridgeError::QueryFailed(_)));

        let err = classify_sqlx_error(&sqlx::Error::ColumnNotFound("tag".into()));
        assert!(matches!(err, BridgeError::QueryFailed(_)));
    }

    #[test]
    fn test_bind_errors_become_query_failures() {
        let err = into_bridge_error(CatalogError::Bind(crate::error::BindError::LimitOverflow(1)));
        assert!(matches!(err, BridgeError::QueryFailed(_)));

        let err = into_bridge_error(CatalogError::Bridge(BridgeError::ConnectionFailed(
            "down".into(),
        )));
        assert!(err.is_connection_failure());
    }
}
