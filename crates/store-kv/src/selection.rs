//! Startup backend selection.
//!
//! [`ProductBackend`] is the one store type a process holds. It is built
//! once from [`StoreConfig`] and dispatches statically to the chosen
//! implementation, so the service layer stays generic over a single
//! concrete [`ProductStore`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockroom_store::{
    ActorId, ConfigError, MemoryProductStore, PageRequest, PagedResult, Product, ProductStore,
    RecordId, StoreResult, TenantId,
};

use crate::{
    backend::KvProductStore,
    client::KeyValueClient,
    config::{BackendKind, StoreConfig},
};

/// The product store chosen at startup.
#[derive(Debug, Clone)]
pub enum ProductBackend {
    /// Process-local store.
    Memory(MemoryProductStore),
    /// Remote single-table key-value store.
    KeyValue(KvProductStore),
}

impl ProductBackend {
    /// Builds the backend `config` selects.
    ///
    /// `client` is only consulted for [`BackendKind::KeyValue`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the key-value backend is selected
    /// without a client, or if its configuration is invalid.
    pub fn from_config(
        config: &StoreConfig,
        client: Option<Arc<dyn KeyValueClient>>,
    ) -> Result<Self, ConfigError> {
        match config.backend {
            BackendKind::Memory => {
                tracing::info!(backend = "memory", "product store selected");
                Ok(Self::Memory(MemoryProductStore::new()))
            },
            BackendKind::KeyValue => {
                config.key_value.validate()?;
                let client = client.ok_or(ConfigError::Missing { field: "key_value_client" })?;
                tracing::info!(
                    backend = "key_value",
                    table = config.key_value.table_name(),
                    "product store selected"
                );
                Ok(Self::KeyValue(KvProductStore::new(client, config.key_value.clone())))
            },
        }
    }

    /// Returns which backend this is.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Memory(_) => BackendKind::Memory,
            Self::KeyValue(_) => BackendKind::KeyValue,
        }
    }
}

impl From<MemoryProductStore> for ProductBackend {
    fn from(store: MemoryProductStore) -> Self {
        Self::Memory(store)
    }
}

impl From<KvProductStore> for ProductBackend {
    fn from(store: KvProductStore) -> Self {
        Self::KeyValue(store)
    }
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            ProductBackend::Memory($store) => $call,
            ProductBackend::KeyValue($store) => $call,
        }
    };
}

#[async_trait]
impl ProductStore for ProductBackend {
    async fn create(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        dispatch!(self, store => store.create(tenant, product).await)
    }

    async fn get(&self, tenant: &TenantId, id: &RecordId) -> StoreResult<Option<Product>> {
        dispatch!(self, store => store.get(tenant, id).await)
    }

    async fn list(
        &self,
        tenant: &TenantId,
        keyword: Option<&str>,
        limit: i64,
    ) -> StoreResult<Vec<Product>> {
        dispatch!(self, store => store.list(tenant, keyword, limit).await)
    }

    async fn page_list(
        &self,
        tenant: &TenantId,
        request: &PageRequest,
    ) -> StoreResult<PagedResult<Product>> {
        dispatch!(self, store => store.page_list(tenant, request).await)
    }

    async fn update(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        dispatch!(self, store => store.update(tenant, product).await)
    }

    async fn soft_delete(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        dispatch!(self, store => store.soft_delete(tenant, id, actor, now).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::{config::KvStoreConfig, local::LocalKeyValueClient};

    #[test]
    fn test_memory_is_the_default() {
        let backend = ProductBackend::from_config(&StoreConfig::default(), None).unwrap();
        assert_eq!(backend.kind(), BackendKind::Memory);
    }

    #[test]
    fn test_key_value_requires_a_client() {
        let config = StoreConfig { backend: BackendKind::KeyValue, ..StoreConfig::default() };
        let err = ProductBackend::from_config(&config, None).unwrap_err();
        assert_eq!(err, ConfigError::Missing { field: "key_value_client" });

        let client: Arc<dyn KeyValueClient> = Arc::new(LocalKeyValueClient::new());
        let backend = ProductBackend::from_config(&config, Some(client)).unwrap();
        assert_eq!(backend.kind(), BackendKind::KeyValue);
    }

    #[test]
    fn test_invalid_key_value_config_rejected() {
        let key_value: KvStoreConfig = serde_json::from_str(r#"{"table_name": " "}"#).unwrap();
        let config = StoreConfig { backend: BackendKind::KeyValue, key_value };
        let client: Arc<dyn KeyValueClient> = Arc::new(LocalKeyValueClient::new());
        let err = ProductBackend::from_config(&config, Some(client)).unwrap_err();
        assert_eq!(err, ConfigError::Missing { field: "table_name" });
    }
}
