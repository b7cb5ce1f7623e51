//! Key-value product store implementation.
//!
//! This module provides [`KvProductStore`], which implements the
//! [`ProductStore`] trait on top of a remote single-table key-value
//! database reached through a [`KeyValueClient`].
//!
//! # Pagination
//!
//! `page_list` asks the database for one native page of `limit` items in
//! descending sort-key order and filters that page by keyword afterwards.
//! The next cursor is the database's last evaluated key. With a keyword
//! active a page can therefore hold fewer than `limit` matches, or none,
//! while later pages still hold matches; the walk as a whole still visits
//! every record. Without a keyword every page but the last is full.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockroom_store::{
    ActorId, KeyCursor, KeywordFilter, PageRequest, PagedResult, Product, ProductStore, RecordId,
    StoreResult, TenantId, clamp_limit,
};

use crate::{
    client::{KeyValueClient, PrimaryKey, QueryRequest},
    config::KvStoreConfig,
    item::{from_item, to_item},
    keys::{PRODUCT_PREFIX, partition_key, product_key},
};

/// Key-value backed implementation of [`ProductStore`].
///
/// # Thread Safety
///
/// `KvProductStore` is `Send + Sync` and cheap to clone; clones share the
/// client. There is no client-side locking: concurrent writers to one
/// product race and the last write wins.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use stockroom_store::{PageRequest, ProductStore, TenantId};
/// use stockroom_store_kv::{KvProductStore, KvStoreConfig, LocalKeyValueClient};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let store = KvProductStore::new(Arc::new(LocalKeyValueClient::new()), KvStoreConfig::default());
/// let page = store.page_list(&TenantId::from("t1"), &PageRequest::first()).await.unwrap();
/// assert!(page.items.is_empty());
/// # });
/// ```
#[derive(Clone)]
pub struct KvProductStore {
    client: Arc<dyn KeyValueClient>,
    config: KvStoreConfig,
}

impl std::fmt::Debug for KvProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvProductStore")
            .field("table_name", &self.config.table_name())
            .field("consistent_reads", &self.config.consistent_reads())
            .finish_non_exhaustive()
    }
}

/// Products from one native page plus the key to resume after.
struct NativePage {
    products: Vec<Product>,
    last_evaluated_key: Option<PrimaryKey>,
}

impl KvProductStore {
    /// Creates a store over `client`.
    #[must_use]
    pub fn new(client: Arc<dyn KeyValueClient>, config: KvStoreConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &KvStoreConfig {
        &self.config
    }

    fn table(&self) -> &str {
        self.config.table_name()
    }

    /// Runs one native query page and keeps the live products matching
    /// `filter`.
    async fn native_page(
        &self,
        tenant: &TenantId,
        limit: usize,
        start: Option<PrimaryKey>,
        filter: &KeywordFilter,
    ) -> StoreResult<NativePage> {
        let request = QueryRequest::builder()
            .table(self.table())
            .partition(partition_key(tenant))
            .sort_prefix(PRODUCT_PREFIX)
            .limit(limit)
            .scan_forward(false)
            .maybe_exclusive_start_key(start)
            .consistent(self.config.consistent_reads())
            .build();

        let page = self.client.query(request).await?;
        let evaluated = page.items.len();
        let products: Vec<Product> = page
            .items
            .iter()
            .map(from_item)
            .filter(|p| !p.is_deleted && filter.matches(p))
            .collect();

        tracing::debug!(
            evaluated,
            matched = products.len(),
            more = page.last_evaluated_key.is_some(),
            "native page read"
        );
        Ok(NativePage { products, last_evaluated_key: page.last_evaluated_key })
    }

    /// Decodes a caller cursor, discarding it unless it points into
    /// `tenant`'s product range.
    fn resume_key(tenant: &TenantId, cursor: Option<&str>) -> Option<PrimaryKey> {
        let cursor = KeyCursor::decode(cursor)?;
        if cursor.pk != partition_key(tenant) || !cursor.sk.starts_with(PRODUCT_PREFIX) {
            tracing::debug!("cursor belongs to another partition, restarting pagination");
            return None;
        }
        Some(PrimaryKey { partition: cursor.pk, sort: cursor.sk })
    }

    async fn put(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        self.client.put_item(self.table(), to_item(tenant, product)).await?;
        Ok(())
    }

    async fn read(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        consistent: bool,
    ) -> StoreResult<Option<Product>> {
        let key = product_key(tenant, id);
        match self.client.get_item(self.table(), &key, consistent).await? {
            Some(item) => Ok(Some(from_item(&item))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProductStore for KvProductStore {
    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn create(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        self.put(tenant, product).await
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, tenant: &TenantId, id: &RecordId) -> StoreResult<Option<Product>> {
        let product = self.read(tenant, id, self.config.consistent_reads()).await?;
        Ok(product.filter(|p| !p.is_deleted))
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        tenant: &TenantId,
        keyword: Option<&str>,
        limit: i64,
    ) -> StoreResult<Vec<Product>> {
        let page = self
            .native_page(tenant, clamp_limit(limit), None, &KeywordFilter::new(keyword))
            .await?;
        Ok(page.products)
    }

    #[tracing::instrument(skip(self))]
    async fn page_list(
        &self,
        tenant: &TenantId,
        request: &PageRequest,
    ) -> StoreResult<PagedResult<Product>> {
        let start = Self::resume_key(tenant, request.cursor());
        let filter = KeywordFilter::new(request.keyword());
        let page = self.native_page(tenant, request.limit(), start, &filter).await?;

        let next_cursor = page
            .last_evaluated_key
            .and_then(|key| KeyCursor { pk: key.partition, sk: key.sort }.encode());
        Ok(PagedResult::new(page.products, next_cursor))
    }

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn update(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        self.put(tenant, product).await
    }

    #[tracing::instrument(skip(self))]
    async fn soft_delete(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let Some(mut product) = self.read(tenant, id, true).await? else {
            tracing::debug!("nothing to delete");
            return Ok(());
        };
        if product.is_deleted {
            tracing::debug!("already deleted");
            return Ok(());
        }

        product.mark_deleted(actor, now);
        self.put(tenant, &product).await
    }
}
