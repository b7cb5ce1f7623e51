//! Configuration for the key-value backend and for backend selection.
//!
//! [`StoreConfig`] is read once at startup and decides which
//! [`ProductStore`](stockroom_store::ProductStore) implementation the
//! process uses; [`KvStoreConfig`] configures the key-value one.

use serde::{Deserialize, Serialize};
use stockroom_store::ConfigError;

/// Default table name.
pub const DEFAULT_TABLE_NAME: &str = "stockroom";

/// Configuration for [`KvProductStore`](crate::KvProductStore).
///
/// # Example
///
/// ```
/// use stockroom_store_kv::KvStoreConfig;
///
/// let config = KvStoreConfig::builder().table_name("products").consistent_reads(true).build()?;
/// assert_eq!(config.table_name(), "products");
/// # Ok::<(), stockroom_store::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KvStoreConfig {
    /// Name of the single table holding every tenant's products.
    #[serde(default = "default_table_name")]
    table_name: String,

    /// Use strongly consistent reads for `get` and `page_list`.
    ///
    /// Soft delete always reads consistently.
    #[serde(default)]
    consistent_reads: bool,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_owned()
}

impl Default for KvStoreConfig {
    fn default() -> Self {
        Self { table_name: default_table_name(), consistent_reads: false }
    }
}

#[bon::bon]
impl KvStoreConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the table name is blank.
    #[builder]
    pub fn new(
        #[builder(into, default = default_table_name())] table_name: String,
        #[builder(default)] consistent_reads: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self { table_name, consistent_reads };
        config.validate()?;
        Ok(config)
    }

    /// Re-checks a configuration, typically one obtained by deserialising.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the table name is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Missing { field: "table_name" });
        }
        Ok(())
    }

    /// Returns the table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns whether reads are strongly consistent.
    #[must_use]
    pub fn consistent_reads(&self) -> bool {
        self.consistent_reads
    }
}

/// Which product store implementation to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Process-local store; contents are lost on exit.
    #[default]
    Memory,
    /// Remote single-table key-value database.
    KeyValue,
}

/// Startup backend selection.
///
/// ```
/// use stockroom_store_kv::{BackendKind, StoreConfig};
///
/// let config: StoreConfig = serde_json::from_str(
///     r#"{ "backend": "key_value", "key_value": { "table_name": "erp" } }"#,
/// )?;
/// assert_eq!(config.backend, BackendKind::KeyValue);
/// assert_eq!(config.key_value.table_name(), "erp");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: BackendKind,

    /// Key-value backend settings; ignored for the memory backend.
    #[serde(default)]
    pub key_value: KvStoreConfig,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KvStoreConfig::builder().build().unwrap();
        assert_eq!(config, KvStoreConfig::default());
        assert_eq!(config.table_name(), "stockroom");
        assert!(!config.consistent_reads());

        let store: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(store.backend, BackendKind::Memory);
    }

    #[test]
    fn test_blank_table_name_rejected() {
        let err = KvStoreConfig::builder().table_name("  ").build().unwrap_err();
        assert_eq!(err, ConfigError::Missing { field: "table_name" });

        let parsed: KvStoreConfig = serde_json::from_str(r#"{"table_name": ""}"#).unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result: Result<StoreConfig, _> = serde_json::from_str(r#"{"backend": "dynamo"}"#);
        assert!(result.is_err());
    }
}
