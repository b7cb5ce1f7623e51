//! Store error types and result alias.
//!
//! Every backend maps its native failures onto [`StoreError`] so the
//! service layer and its callers see one taxonomy regardless of which
//! backend is configured.
//!
//! # Error Types
//!
//! - [`StoreError::Validation`] - A required input field was blank or invalid
//! - [`StoreError::NotFound`] - The record is absent or soft-deleted
//! - [`StoreError::Connection`] - Network or remote-service failure
//! - [`StoreError::Serialization`] - Stored data could not be encoded or decoded
//! - [`StoreError::Internal`] - Backend-specific internal errors
//! - [`StoreError::Timeout`] - Operation exceeded its time limit
//! - [`StoreError::Cancelled`] - The caller cancelled the operation
//!
//! # Example
//!
//! ```
//! use stockroom_store::{StoreError, StoreResult};
//!
//! fn lookup(id: &str) -> StoreResult<()> {
//!     Err(StoreError::not_found(id))
//! }
//!
//! assert!(matches!(lookup("p-1"), Err(StoreError::NotFound { .. })));
//! ```

use std::sync::Arc;

use thiserror::Error;

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store and service operations.
///
/// Errors preserve their source chain via the `#[source]` attribute.
///
/// # Non-exhaustive
///
/// New variants may be added in minor releases. Downstream match
/// expressions must include a wildcard arm.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A required field was blank or otherwise invalid.
    ///
    /// Raised before any store access and never retried.
    #[error("Validation failed for `{field}`: {message}")]
    Validation {
        /// Name of the offending input field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// The record does not exist or has been soft-deleted.
    #[error("Record not found: {id}")]
    NotFound {
        /// Identifier of the missing record.
        id: String,
    },

    /// Connection or network error talking to a remote backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Serialization or deserialization error.
    ///
    /// Usually indicates a stored item that no longer matches the
    /// record shape.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
        /// The underlying error that caused serialization to fail.
        #[source]
        source: Option<BoxError>,
    },

    /// Internal backend error that fits no other category.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("Operation timeout")]
    Timeout,

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl StoreError {
    /// Creates a new `Validation` error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Creates a new `NotFound` error for the given record id.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Serialization` error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), source: None }
    }

    /// Creates a new `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Creates a new `Cancelled` error.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::Cancelled
    }

    /// Returns `true` for failures that may succeed if the caller retries.
    ///
    /// The store itself never retries; this is a hint for the layer above.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout)
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric setting is below its allowed minimum.
    #[error("`{field}` must be at least {min}, got {value}")]
    BelowMinimum {
        /// Name of the setting.
        field: &'static str,
        /// Smallest accepted value.
        min: String,
        /// Value that was supplied.
        value: String,
    },

    /// A numeric setting is above its allowed maximum.
    #[error("`{field}` must be at most {max}, got {value}")]
    AboveMaximum {
        /// Name of the setting.
        field: &'static str,
        /// Largest accepted value.
        max: String,
        /// Value that was supplied.
        value: String,
    },

    /// A required setting is missing or blank.
    #[error("`{field}` is required")]
    Missing {
        /// Name of the setting.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::connection("reset").is_transient());
        assert!(StoreError::timeout().is_transient());
        assert!(!StoreError::not_found("p-1").is_transient());
        assert!(!StoreError::validation("name", "is required").is_transient());
        assert!(!StoreError::cancelled().is_transient());
    }

    #[test]
    fn test_source_chain_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
        let err = StoreError::connection_with_source("query failed", io);

        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("peer reset"));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            StoreError::validation("sku", "is required").to_string(),
            "Validation failed for `sku`: is required"
        );
        assert_eq!(StoreError::not_found("abc").to_string(), "Record not found: abc");
        assert_eq!(
            ConfigError::Missing { field: "user_pool_id" }.to_string(),
            "`user_pool_id` is required"
        );
    }
}
