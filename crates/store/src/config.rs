//! Configuration for the product service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    types::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT},
};

/// Default per-operation timeout (30 seconds).
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ProductService`](crate::ProductService).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stockroom_store::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .operation_timeout(Duration::from_secs(5))
///     .default_page_limit(25)
///     .build()?;
/// assert_eq!(config.default_page_limit(), 25);
/// # Ok::<(), stockroom_store::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Upper bound on a single store operation.
    #[serde(with = "humantime_serde", default = "default_operation_timeout")]
    operation_timeout: Duration,

    /// Page size used when the caller supplies none.
    #[serde(default = "default_page_limit")]
    default_page_limit: usize,
}

fn default_operation_timeout() -> Duration {
    DEFAULT_OPERATION_TIMEOUT
}

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { operation_timeout: DEFAULT_OPERATION_TIMEOUT, default_page_limit: DEFAULT_PAGE_LIMIT }
    }
}

#[bon::bon]
impl ServiceConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `default_page_limit` is outside `[1, 200]` or
    /// `operation_timeout` is zero.
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_OPERATION_TIMEOUT)] operation_timeout: Duration,
        #[builder(default = DEFAULT_PAGE_LIMIT)] default_page_limit: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self { operation_timeout, default_page_limit };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks a configuration, typically one obtained by deserialising.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ServiceConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_timeout.is_zero() {
            return Err(ConfigError::BelowMinimum {
                field: "operation_timeout",
                min: "1ms".into(),
                value: "0s".into(),
            });
        }
        if self.default_page_limit < MIN_PAGE_LIMIT {
            return Err(ConfigError::BelowMinimum {
                field: "default_page_limit",
                min: MIN_PAGE_LIMIT.to_string(),
                value: self.default_page_limit.to_string(),
            });
        }
        if self.default_page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::AboveMaximum {
                field: "default_page_limit",
                max: MAX_PAGE_LIMIT.to_string(),
                value: self.default_page_limit.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the per-operation timeout.
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Returns the default page size.
    #[must_use]
    pub fn default_page_limit(&self) -> usize {
        self.default_page_limit
    }
}
