use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Invalid MusicBrainz identifier: {0}")]
    InvalidMbid(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    JsonParse(String),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
