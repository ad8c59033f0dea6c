//! Error types for analysis stores

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to an analysis store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A single-row request matched zero rows (or more than one)
    #[error("Expected exactly one row: {message}")]
    NoSingleRow { message: String },

    /// The store answered with an error body
    #[error("Store query failed (HTTP {status}): {message}")]
    Query {
        /// HTTP status returned by the store
        status: u16,
        /// Store-specific error code (e.g. a PostgreSQL SQLSTATE)
        code: Option<String>,
        /// Human-readable message from the store
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Store answered but the payload could not be decoded
    #[error("Failed to decode store response: {0}")]
    Decode(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Create a query error with only a status and message
    pub fn query(status: u16, message: impl Into<String>) -> Self {
        Self::Query {
            status,
            code: None,
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// True when the store itself responded with the error, as opposed to
    /// the request never completing or the response being unreadable.
    pub fn is_store_reported(&self) -> bool {
        matches!(self, StoreError::NoSingleRow { .. } | StoreError::Query { .. })
    }

    /// True for the "expected exactly one row" condition
    pub fn is_no_single_row(&self) -> bool {
        matches!(self, StoreError::NoSingleRow { .. })
    }

    /// Store error code, when the store supplied one
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_reported_classification() {
        assert!(StoreError::query(500, "boom").is_store_reported());
        assert!(StoreError::NoSingleRow {
            message: "0 rows".to_string()
        }
        .is_store_reported());

        assert!(!StoreError::Transport("connection refused".to_string()).is_store_reported());
        assert!(!StoreError::Decode("expected array".to_string()).is_store_reported());
        assert!(!StoreError::Internal("oops".to_string()).is_store_reported());
    }

    #[test]
    fn test_query_error_display_and_code() {
        let err = StoreError::Query {
            status: 400,
            code: Some("42703".to_string()),
            message: "column analyses.status does not exist".to_string(),
            details: None,
            hint: None,
        };
        assert_eq!(err.code(), Some("42703"));
        assert_eq!(
            err.to_string(),
            "Store query failed (HTTP 400): column analyses.status does not exist"
        );
        assert!(!err.is_no_single_row());
    }
}
