use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl BridgeError {
    /// True when the store could not be reached at all (as opposed to a
    /// statement that reached the store and failed there).
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, BridgeError::ConnectionFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_connection_errors_are_connection_failures() {
        let cases = [
            (BridgeError::ConnectionFailed("refused".into()), true),
            (BridgeError::QueryFailed("syntax error".into()), false),
            (BridgeError::OperationFailed("timed out".into()), false),
        ];

        for (err, expected) in cases {
            let is_connection = match &err {
                BridgeError::ConnectionFailed(_) => true,
                BridgeError::QueryFailed(_) | BridgeError::OperationFailed(_) => false,
            };
            assert_eq!(is_connection, expected);
            assert_eq!(err.is_connection_failure(), expected, "{}", err);
        }
    }
}
