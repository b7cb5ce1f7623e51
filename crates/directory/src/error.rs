//! Error types for the directory adapter.
//!
//! [`ProviderError`] is the failure vocabulary of an
//! [`IdentityProvider`](crate::IdentityProvider); [`DirectoryError`] is
//! what adapter callers see. The mapping between the two lives here and
//! nowhere else.

use std::{fmt, sync::Arc};

use stockroom_store::{BoxError, Interrupted};
use thiserror::Error;

/// Result type alias for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors reported by an identity provider.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// No user with that username exists in the pool.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// A user with that username already exists.
    #[error("Username exists: {0}")]
    UsernameExists(String),

    /// The user pool does not exist.
    #[error("User pool not found: {0}")]
    PoolNotFound(String),

    /// A request parameter was rejected (bad filter, token, password...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller exceeded the provider's request rate.
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// The provider refused the caller's credentials.
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// The provider could not be reached.
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
        /// The underlying transport error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The provider did not answer in time.
    #[error("Request timed out")]
    Timeout,

    /// Any other provider-side failure.
    #[error("Service error: {0}")]
    Service(String),
}

impl ProviderError {
    /// Creates an `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into(), source: None }
    }

    /// Creates an `Unavailable` error wrapping a transport failure.
    #[must_use]
    pub fn unavailable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable { message: message.into(), source: Some(Arc::new(source)) }
    }
}

/// Errors returned by [`DirectoryAdapter`](crate::DirectoryAdapter).
///
/// # Non-exhaustive
///
/// New variants may be added in minor releases. Downstream match
/// expressions must include a wildcard arm.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// A required input was blank. Raised before the provider is called.
    #[error("Validation failed for `{field}`: {message}")]
    Validation {
        /// Name of the offending input field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// The user does not exist.
    #[error("User not found: {id}")]
    NotFound {
        /// Username that was looked up.
        id: String,
    },

    /// A user with the same username already exists.
    #[error("User already exists: {id}")]
    AlreadyExists {
        /// Conflicting username.
        id: String,
    },

    /// The provider rejected the request's parameters, including an
    /// unusable pagination token.
    #[error("Rejected by the identity provider: {message}")]
    Rejected {
        /// Provider's reason.
        message: String,
    },

    /// The provider could not be reached or is shedding load.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<BoxError>,
    },

    /// Any other failure, including misconfiguration.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("Operation timeout")]
    Timeout,

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// At least one step of a two-step user update did not apply. Steps
    /// that did apply are not rolled back.
    #[error("Partial update: name {name}, enabled {enabled}")]
    PartialUpdate {
        /// Outcome of the display-name change.
        name: StepOutcome,
        /// Outcome of the enable/disable transition.
        enabled: StepOutcome,
    },
}

impl DirectoryError {
    /// Creates a new `Validation` error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Returns `true` for failures that may succeed if the caller retries.
    ///
    /// A partial update is transient when any of its failed steps is.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Connection { .. } | Self::Timeout => true,
            Self::PartialUpdate { name, enabled } => name.is_transient() || enabled.is_transient(),
            _ => false,
        }
    }
}

impl From<Interrupted> for DirectoryError {
    fn from(reason: Interrupted) -> Self {
        match reason {
            Interrupted::Cancelled => Self::Cancelled,
            Interrupted::TimedOut => Self::Timeout,
        }
    }
}

impl From<ProviderError> for DirectoryError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UserNotFound(id) => Self::NotFound { id },
            ProviderError::UsernameExists(id) => Self::AlreadyExists { id },
            ProviderError::InvalidParameter(message) => Self::Rejected { message },
            ProviderError::TooManyRequests(message) => {
                Self::Connection { message: format!("Throttled: {message}"), source: None }
            },
            ProviderError::Unavailable { message, source } => Self::Connection { message, source },
            ProviderError::Timeout => {
                tracing::warn!("identity provider request timed out");
                Self::Timeout
            },
            ProviderError::PoolNotFound(pool) => {
                Self::internal(format!("User pool not found: {pool}"))
            },
            ProviderError::NotAuthorized(message) => {
                Self::internal(format!("Not authorized: {message}"))
            },
            ProviderError::Service(message) => Self::internal(message),
        }
    }
}

/// What happened to one step of a user update.
#[derive(Debug)]
pub enum StepOutcome {
    /// The caller did not ask for this step.
    NotRequested,
    /// The provider accepted the change.
    Applied,
    /// The provider call failed.
    Failed(Box<DirectoryError>),
    /// The request was cancelled before the step ran.
    Cancelled,
}

impl StepOutcome {
    /// Returns `true` unless the step failed or was cancelled.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::NotRequested | Self::Applied)
    }

    /// Returns `true` if the step failed with a retryable error.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Failed(err) if err.is_transient())
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => f.write_str("not requested"),
            Self::Applied => f.write_str("applied"),
            Self::Failed(err) => write!(f, "failed ({err})"),
            Self::Cancelled => f.write_str("cancelled"),
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
    #[case(ProviderError::unavailable("reset"), true)]
    #[case(ProviderError::TooManyRequests("slow down".into()), true)]
    #[case(ProviderError::Timeout, true)]
    #[case(ProviderError::UserNotFound("a@x.io".into()), false)]
    #[case(ProviderError::InvalidParameter("bad token".into()), false)]
    #[case(ProviderError::PoolNotFound("pool".into()), false)]
    fn test_transient_mapping(#[case] err: ProviderError, #[case] transient: bool) {
        assert_eq!(DirectoryError::from(err).is_transient(), transient);
    }

    #[test]
    fn test_not_found_keeps_username() {
        let err = DirectoryError::from(ProviderError::UserNotFound("a@x.io".into()));
        assert!(matches!(err, DirectoryError::NotFound { ref id } if id == "a@x.io"));
    }

    #[test]
    fn test_source_survives_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
        let err: DirectoryError = ProviderError::unavailable_with_source("list", io).into();
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("peer reset"));
    }

    #[test]
    fn test_partial_update_display() {
        let err = DirectoryError::PartialUpdate {
            name: StepOutcome::Applied,
            enabled: StepOutcome::Failed(Box::new(DirectoryError::Timeout)),
        };
        assert_eq!(
            err.to_string(),
            "Partial update: name applied, enabled failed (Operation timeout)"
        );
    }

    #[rstest]
    #[case(StepOutcome::Failed(Box::new(DirectoryError::Timeout)), StepOutcome::Applied, true)]
    #[case(StepOutcome::Applied, StepOutcome::Failed(Box::new(DirectoryError::internal("x"))), false)]
    #[case(StepOutcome::Applied, StepOutcome::Cancelled, false)]
    fn test_partial_update_transience(
        #[case] name: StepOutcome,
        #[case] enabled: StepOutcome,
        #[case] transient: bool,
    ) {
        assert_eq!(DirectoryError::PartialUpdate { name, enabled }.is_transient(), transient);
    }
}
