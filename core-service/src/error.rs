use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Catalog initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] core_metadata::MetadataError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
