//! # Paginated Query Executor
//!
//! Runs a [`QueryTemplate`] for one page against a fresh connection and
//! returns marshaled records.
//!
//! ## Failure handling
//!
//! Store failures (cannot connect, statement rejected, row decoding failed)
//! are logged and reported as [`QueryOutcome::Failed`] by `fetch_page` and
//! `fetch_first`. The convenience methods `query_many` and `query_one`
//! collapse a failure to "no rows" so callers serving end users can prefer
//! availability. Binding errors are caller bugs and are always returned as
//! `Err(CatalogError::Bind)`.

use std::sync::Arc;

use bridge_traits::database::{ConnectionProvider, Parameter};
use bridge_traits::error::BridgeError;
use bridge_traits::record::Record;
use tracing::{debug, error, warn};

use crate::binder::bind;
use crate::error::Result;
use crate::pagination::PageRequest;
use crate::templates::QueryTemplate;

/// Result of running a statement, keeping store failures distinguishable
/// from legitimately empty results.
#[derive(Debug)]
pub enum QueryOutcome<T> {
    Rows(T),
    Failed(BridgeError),
}

impl<T> QueryOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }

    /// The rows, or `None` when the statement failed
    pub fn rows(self) -> Option<T> {
        match self {
            QueryOutcome::Rows(rows) => Some(rows),
            QueryOutcome::Failed(_) => None,
        }
    }
}

impl<T: Default> QueryOutcome<T> {
    /// The rows, or the empty value when the statement failed
    pub fn rows_or_default(self) -> T {
        self.rows().unwrap_or_default()
    }
}

/// Executes catalog templates one connection per call
#[derive(Clone)]
pub struct QueryExecutor {
    provider: Arc<dyn ConnectionProvider>,
}

impl QueryExecutor {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Run `template` for `page` and return every row of that page.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Bind` if the parameters do not fit the template.
    pub async fn fetch_page(
        &self,
        template: &QueryTemplate,
        page: PageRequest,
        params: &[Parameter],
    ) -> Result<QueryOutcome<Vec<Record>>> {
        let statement = bind(template, params, page)?;

        debug!(
            template = template.name,
            page = page.page,
            param_count = statement.params.len(),
            "Running paginated query"
        );

        let mut conn = match self.provider.acquire().await {
            Ok(conn) => conn,
            Err(e) => return Ok(self.failed(template, e)),
        };

        let outcome = match conn.fetch_all(&statement).await {
            Ok(records) => {
                debug!(template = template.name, row_count = records.len(), "Query completed");
                QueryOutcome::Rows(records)
            }
            Err(e) => self.failed(template, e),
        };

        Ok(outcome)
    }

    /// Run `template` on page 0 and return only its first row.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Bind` if the parameters do not fit the template.
    pub async fn fetch_first(
        &self,
        template: &QueryTemplate,
        params: &[Parameter],
    ) -> Result<QueryOutcome<Option<Record>>> {
        let statement = bind(template, params, PageRequest::first())?;

        debug!(
            template = template.name,
            param_count = statement.params.len(),
            "Running single-row query"
        );

        let mut conn = match self.provider.acquire().await {
            Ok(conn) => conn,
            Err(e) => return Ok(self.failed(template, e)),
        };

        let outcome = match conn.fetch_first(&statement).await {
            Ok(record) => QueryOutcome::Rows(record),
            Err(e) => self.failed(template, e),
        };

        Ok(outcome)
    }

    /// Like [`fetch_page`](Self::fetch_page), with store failures collapsed to `[]`.
    pub async fn query_many(
        &self,
        template: &QueryTemplate,
        page: u32,
        params: &[Parameter],
    ) -> Result<Vec<Record>> {
        let outcome = self
            .fetch_page(template, PageRequest::new(page), params)
            .await?;
        Ok(outcome.rows_or_default())
    }

    /// Like [`fetch_first`](Self::fetch_first), with store failures collapsed to `None`.
    pub async fn query_one(
        &self,
        template: &QueryTemplate,
        params: &[Parameter],
    ) -> Result<Option<Record>> {
        let outcome = self.fetch_first(template, params).await?;
        Ok(outcome.rows().flatten())
    }

    fn failed<T>(&self, template: &QueryTemplate, err: BridgeError) -> QueryOutcome<T> {
        if err.is_connection_failure() {
            error!(template = template.name, error = %err, "Failed to connect to the catalog store");
        } else {
            warn!(template = template.name, error = %err, "Error executing query");
        }
        QueryOutcome::Failed(err)
    }
}
