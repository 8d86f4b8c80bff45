//! Shared fakes for executor and enrichment tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bridge_traits::database::{BoundStatement, CatalogConnection, ConnectionProvider, Parameter};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::record::Record;

#[derive(Default)]
struct StoreState {
    responses: VecDeque<Result<Vec<Record>>>,
    table: Option<Vec<Record>>,
    statements: Vec<BoundStatement>,
    acquired: usize,
    released: usize,
}

/// In-memory store: answers statements with queued responses and records
/// every statement it was given.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next statement
    pub fn respond(&self, rows: Vec<Record>) -> &Self {
        self.state.lock().unwrap().responses.push_back(Ok(rows));
        self
    }

    /// Queue a failure for the next statement
    pub fn fail(&self, err: BridgeError) -> &Self {
        self.state.lock().unwrap().responses.push_back(Err(err));
        self
    }

    /// Answer every statement from `rows`, applying the bound LIMIT and
    /// OFFSET the way the store would
    pub fn serve_table(&self, rows: Vec<Record>) -> &Self {
        self.state.lock().unwrap().table = Some(rows);
        self
    }

    pub fn statements(&self) -> Vec<BoundStatement> {
        self.state.lock().unwrap().statements.clone()
    }

    /// (acquired, released) connection counts
    pub fn connection_counts(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.acquired, state.released)
    }

    pub fn provider(&self) -> Arc<dyn ConnectionProvider> {
        Arc::new(self.clone())
    }

    fn next_response(&self, statement: &BoundStatement) -> Result<Vec<Record>> {
        let mut state = self.state.lock().unwrap();
        state.statements.push(statement.clone());
        if let Some(table) = &state.table {
            let (limit, offset) = match statement.params.as_slice() {
                [.., Parameter::Int32(limit), Parameter::Int32(offset)] => {
                    (*limit as usize, *offset as usize)
                }
                _ => panic!("statement is not paginated: {}", statement.sql),
            };
            return Ok(table.iter().skip(offset).take(limit).cloned().collect());
        }
        state.responses.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl ConnectionProvider for FakeStore {
    async fn acquire(&self) -> Result<Box<dyn CatalogConnection>> {
        self.state.lock().unwrap().acquired += 1;
        Ok(Box::new(FakeConnection {
            store: self.clone(),
        }))
    }
}

struct FakeConnection {
    store: FakeStore,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.store.state.lock().unwrap().released += 1;
    }
}

#[async_trait]
impl CatalogConnection for FakeConnection {
    async fn fetch_all(&mut self, statement: &BoundStatement) -> Result<Vec<Record>> {
        self.store.next_response(statement)
    }

    async fn fetch_first(&mut self, statement: &BoundStatement) -> Result<Option<Record>> {
        self.store
            .next_response(statement)
            .map(|rows| rows.into_iter().next())
    }
}

/// Release listing row as projected by the catalog templates
pub fn release_row(group_id: i32, title: &str) -> Record {
    Record::from_iter([
        ("release_group_id", bridge_traits::QueryValue::Int32(group_id)),
        ("title", bridge_traits::QueryValue::from(title)),
    ])
}

/// Tag row as projected by the tag template
pub fn tag_row(group_id: i32, tag: &str, count: i32) -> Record {
    Record::from_iter([
        ("release_group_id", bridge_traits::QueryValue::Int32(group_id)),
        ("tag", bridge_traits::QueryValue::from(tag)),
        ("count", bridge_traits::QueryValue::Int32(count)),
    ])
}
