//! Error types for the key-value backend.
//!
//! This module provides [`KvClientError`], the failure vocabulary of a
//! [`KeyValueClient`](crate::KeyValueClient), and its mapping onto the
//! generic [`StoreError`] type.

use std::sync::Arc;

use stockroom_store::{BoxError, StoreError};
use thiserror::Error;

/// Errors reported by a key-value client.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum KvClientError {
    /// The database could not be reached or dropped the request.
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
        /// The underlying transport error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The request rate exceeded the table's provisioned throughput.
    #[error("Throughput exceeded: {0}")]
    Throttled(String),

    /// The database did not answer in time.
    #[error("Request timed out")]
    Timeout,

    /// The named table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The request was malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other service-side failure.
    #[error("Service error: {0}")]
    Service(String),
}

impl KvClientError {
    /// Creates an `Unavailable` error wrapping a transport failure.
    #[must_use]
    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates an `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into(), source: None }
    }
}

impl From<KvClientError> for StoreError {
    fn from(err: KvClientError) -> Self {
        match err {
            KvClientError::Unavailable { message, source } => {
                StoreError::Connection { message, source }
            },
            KvClientError::Throttled(message) => {
                StoreError::connection(format!("Throttled: {message}"))
            },
            KvClientError::Timeout => {
                tracing::warn!("key-value request timed out");
                StoreError::timeout()
            },
            KvClientError::TableNotFound(table) => {
                StoreError::internal(format!("Table not found: {table}"))
            },
            KvClientError::Validation(message) => {
                StoreError::internal(format!("Rejected request: {message}"))
            },
            KvClientError::Config(message) => StoreError::internal(format!("Config: {message}")),
            KvClientError::Service(message) => StoreError::internal(message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::error::Error as _;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(KvClientError::unavailable("reset"), true)]
    #[case(KvClientError::Throttled("slow down".into()), true)]
    #[case(KvClientError::Timeout, true)]
    #[case(KvClientError::TableNotFound("stockroom".into()), false)]
    #[case(KvClientError::Validation("bad key".into()), false)]
    #[case(KvClientError::Service("boom".into()), false)]
    fn test_transient_mapping(#[case] err: KvClientError, #[case] transient: bool) {
        assert_eq!(StoreError::from(err).is_transient(), transient);
    }

    #[test]
    fn test_source_survives_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: StoreError = KvClientError::unavailable_with_source("query", io).into();
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("pipe closed"));
    }
}
