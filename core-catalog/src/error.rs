use bridge_traits::error::BridgeError;
use thiserror::Error;

/// A template and its parameters could not be turned into a statement.
///
/// These are caller bugs, not store conditions, so they are never collapsed
/// into empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("{template}: expected {expected} parameters, got {actual}")]
    ArityMismatch {
        template: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{template}: statement has {found} placeholders, expected {expected}")]
    PlaceholderMismatch {
        template: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Page {page} of size {page_size} overflows the OFFSET range")]
    OffsetOverflow { page: u32, page_size: u32 },

    #[error("Page size {0} overflows the LIMIT range")]
    LimitOverflow(u32),
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Bind error: {0}")]
    Bind(#[from] BindError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
