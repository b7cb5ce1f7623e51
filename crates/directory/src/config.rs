//! Configuration for the directory adapter.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockroom_store::{ConfigError, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT};

/// Default largest page the provider is asked for.
pub const DEFAULT_PROVIDER_PAGE_LIMIT: usize = 60;

const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`DirectoryAdapter`](crate::DirectoryAdapter).
///
/// # Example
///
/// ```
/// use stockroom_directory::DirectoryConfig;
///
/// let config = DirectoryConfig::builder().user_pool_id("eu-west-1_abc").build()?;
/// assert_eq!(config.provider_page_limit(), 60);
///
/// let parsed: DirectoryConfig = serde_json::from_str(
///     r#"{ "user_pool_id": "eu-west-1_abc", "operation_timeout": "5s" }"#,
/// ).expect("valid json");
/// parsed.validate()?;
/// # Ok::<(), stockroom_store::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Identifier of the user pool every call targets.
    user_pool_id: String,

    /// Upper bound on the page size sent to the provider, applied after
    /// the caller's limit has been clamped into `[1, 200]`.
    #[serde(default = "default_provider_page_limit")]
    provider_page_limit: usize,

    /// Upper bound on a single provider call.
    #[serde(with = "humantime_serde", default = "default_operation_timeout")]
    operation_timeout: Duration,
}

fn default_provider_page_limit() -> usize {
    DEFAULT_PROVIDER_PAGE_LIMIT
}

fn default_operation_timeout() -> Duration {
    DEFAULT_OPERATION_TIMEOUT
}

#[bon::bon]
impl DirectoryConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool id is blank, the page limit is outside
    /// `[1, 200]`, or the timeout is zero.
    #[builder]
    pub fn new(
        #[builder(into)] user_pool_id: String,
        #[builder(default = DEFAULT_PROVIDER_PAGE_LIMIT)] provider_page_limit: usize,
        #[builder(default = DEFAULT_OPERATION_TIMEOUT)] operation_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let config = Self { user_pool_id, provider_page_limit, operation_timeout };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks a configuration, typically one obtained by deserialising.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DirectoryConfig::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_pool_id.trim().is_empty() {
            return Err(ConfigError::Missing { field: "user_pool_id" });
        }
        if self.provider_page_limit < MIN_PAGE_LIMIT {
            return Err(ConfigError::BelowMinimum {
                field: "provider_page_limit",
                min: MIN_PAGE_LIMIT.to_string(),
                value: self.provider_page_limit.to_string(),
            });
        }
        if self.provider_page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::AboveMaximum {
                field: "provider_page_limit",
                max: MAX_PAGE_LIMIT.to_string(),
                value: self.provider_page_limit.to_string(),
            });
        }
        if self.operation_timeout.is_zero() {
            return Err(ConfigError::BelowMinimum {
                field: "operation_timeout",
                min: "1ms".into(),
                value: "0s".into(),
            });
        }
        Ok(())
    }

    /// Returns the user pool id.
    #[must_use]
    pub fn user_pool_id(&self) -> &str {
        &self.user_pool_id
    }

    /// Returns the provider page limit.
    #[must_use]
    pub fn provider_page_limit(&self) -> usize {
        self.provider_page_limit
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_id_is_required() {
        let err = DirectoryConfig::builder().user_pool_id(" ").build().unwrap_err();
        assert_eq!(err, ConfigError::Missing { field: "user_pool_id" });

        let missing: Result<DirectoryConfig, _> = serde_json::from_str("{}");
        assert!(missing.is_err());
    }

    #[test]
    fn test_page_limit_bounds() {
        assert!(matches!(
            DirectoryConfig::builder().user_pool_id("p").provider_page_limit(0).build(),
            Err(ConfigError::BelowMinimum { field: "provider_page_limit", .. })
        ));
        assert!(matches!(
            DirectoryConfig::builder().user_pool_id("p").provider_page_limit(201).build(),
            Err(ConfigError::AboveMaximum { field: "provider_page_limit", .. })
        ));
        assert!(DirectoryConfig::builder().user_pool_id("p").provider_page_limit(200).build().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DirectoryConfig =
            serde_json::from_str(r#"{"user_pool_id": "pool", "operation_timeout": "250ms"}"#).unwrap();
        assert_eq!(config.provider_page_limit(), DEFAULT_PROVIDER_PAGE_LIMIT);
        assert_eq!(config.operation_timeout(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<DirectoryConfig, _> =
            serde_json::from_str(r#"{"user_pool_id": "pool", "region": "eu-west-1"}"#);
        assert!(result.is_err());
    }
}
