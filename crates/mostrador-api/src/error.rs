//! # Gateway Error Types
//!
//! Everything a backend call can fail with, flattened into one enum.
//!
//! ## Error Flow
//! ```text
//! reqwest::Error ──► ApiError (this module) ──► StoreError ──► view layer
//! ```
//!
//! The store layer decides presentation: submission errors become toasts,
//! fetch errors land in the store's `error` field with the old cache kept.

use thiserror::Error;

/// Errors from talking to the Mostrador backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Could not reach the backend (DNS, refused connection, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// The request ran past the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    ///
    /// `message` is the backend's own wording when the error body carried
    /// one, otherwise the HTTP status text.
    #[error("Server error ({status}): {message}")]
    Status { status: u16, message: String },

    /// A 404 on a specific entity lookup.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The bearer token is missing, expired or rejected (401).
    #[error("Not authenticated")]
    Unauthorized,

    /// The response body did not match the expected envelope shape.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Rewrites a generic 404 into a NotFound for the entity being looked
    /// up. Resource clients apply this on single-entity gets, where a 404
    /// can only mean one thing.
    pub fn for_missing(self, entity: &str, id: &str) -> Self {
        match self {
            ApiError::Status { status: 404, .. } => ApiError::not_found(entity, id),
            other => other,
        }
    }

    /// Whether retrying the same call might succeed (transport problems,
    /// not semantic rejections).
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout)
    }
}

/// Convert reqwest errors to ApiError.
///
/// ## Error Mapping
/// ```text
/// is_timeout()  → ApiError::Timeout
/// is_decode()   → ApiError::Decode
/// is_connect()  → ApiError::Network
/// other         → ApiError::Network
/// ```
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Result type for gateway operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_missing_rewrites_404_only() {
        let err = ApiError::Status {
            status: 404,
            message: "Not Found".to_string(),
        };
        let rewritten = err.for_missing("product", "p1");
        assert_eq!(rewritten.to_string(), "product not found: p1");

        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(
            err.for_missing("product", "p1").to_string(),
            "Server error (500): boom"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Timeout.is_transient());
        assert!(ApiError::Network("refused".to_string()).is_transient());
        assert!(!ApiError::Unauthorized.is_transient());
        assert!(!ApiError::Status {
            status: 422,
            message: "credit limit exceeded".to_string()
        }
        .is_transient());
    }
}
