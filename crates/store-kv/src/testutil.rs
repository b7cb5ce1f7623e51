//! Shared test utilities for key-value backend testing.
//!
//! Feature-gated behind `testutil` so it never reaches production builds.
//!
//! ```toml
//! [dev-dependencies]
//! stockroom-store-kv = { path = "../store-kv", features = ["testutil"] }
//! ```

use std::sync::Arc;

use crate::{backend::KvProductStore, config::KvStoreConfig, local::LocalKeyValueClient};

/// Creates a [`KvProductStore`] over a fresh [`LocalKeyValueClient`] with
/// the default configuration.
///
/// The returned client shares state with the store, so tests can inspect
/// native calls or inject faults through it.
#[must_use]
pub fn local_store() -> (KvProductStore, LocalKeyValueClient) {
    local_store_with(KvStoreConfig::default())
}

/// Like [`local_store`], with a custom configuration. The configured table
/// is created on the local client.
#[must_use]
pub fn local_store_with(config: KvStoreConfig) -> (KvProductStore, LocalKeyValueClient) {
    let client = LocalKeyValueClient::new();
    client.create_table(config.table_name());
    let store = KvProductStore::new(Arc::new(client.clone()), config);
    (store, client)
}
