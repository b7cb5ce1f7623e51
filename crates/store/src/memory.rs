//! In-memory product store.
//!
//! [`MemoryProductStore`] is the reference implementation of
//! [`ProductStore`]. Because it filters before it limits, every page holds
//! exactly `limit` items until the last one, which makes it the baseline
//! the other backends are compared against.
//!
//! # Example
//!
//! ```
//! use stockroom_store::{MemoryProductStore, PageRequest, ProductStore, TenantId};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let store = MemoryProductStore::new();
//! let page = store.page_list(&TenantId::from("t1"), &PageRequest::first()).await.unwrap();
//! assert!(page.items.is_empty());
//! assert!(page.next_cursor.is_none());
//! # });
//! ```
//!
//! # Limitations
//!
//! - Data is not persisted; all data is lost when the process exits
//! - `list` and `page_list` scan and sort the whole tenant partition

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::{
    cursor::OffsetCursor,
    error::StoreResult,
    filter::KeywordFilter,
    page::{PageRequest, PagedResult},
    product::Product,
    store::ProductStore,
    types::{ActorId, RecordId, TenantId, clamp_limit},
};

type Partition = HashMap<RecordId, Product>;

/// In-memory product store keyed by tenant, then record id.
///
/// # Cloning
///
/// `MemoryProductStore` is cheaply cloneable via [`Arc`]. All clones share
/// the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryProductStore {
    tenants: Arc<RwLock<HashMap<TenantId, Partition>>>,
}

impl MemoryProductStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored products for `tenant`, soft-deleted ones included.
    #[must_use]
    pub fn len(&self, tenant: &TenantId) -> usize {
        self.tenants.read().get(tenant).map_or(0, HashMap::len)
    }

    /// Returns `true` when `tenant` has no stored products at all.
    #[must_use]
    pub fn is_empty(&self, tenant: &TenantId) -> bool {
        self.len(tenant) == 0
    }

    /// Live products matching `filter`, newest first with ties broken by id.
    fn matching(&self, tenant: &TenantId, filter: &KeywordFilter) -> Vec<Product> {
        let guard = self.tenants.read();
        let Some(partition) = guard.get(tenant) else {
            return Vec::new();
        };

        let mut products: Vec<Product> = partition
            .values()
            .filter(|p| !p.is_deleted && filter.matches(p))
            .cloned()
            .collect();
        drop(guard);

        products.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        products
    }

    fn put(&self, tenant: &TenantId, product: &Product) {
        self.tenants
            .write()
            .entry(tenant.clone())
            .or_default()
            .insert(product.id.clone(), product.clone());
    }
}

impl std::fmt::Debug for MemoryProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProductStore")
            .field("tenants", &self.tenants.read().len())
            .finish()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn create(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        self.put(tenant, product);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, tenant: &TenantId, id: &RecordId) -> StoreResult<Option<Product>> {
        let guard = self.tenants.read();
        let product = guard.get(tenant).and_then(|partition| partition.get(id));
        Ok(product.filter(|p| !p.is_deleted).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        tenant: &TenantId,
        keyword: Option<&str>,
        limit: i64,
    ) -> StoreResult<Vec<Product>> {
        let mut products = self.matching(tenant, &KeywordFilter::new(keyword));
        products.truncate(clamp_limit(limit));
        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    async fn page_list(
        &self,
        tenant: &TenantId,
        request: &PageRequest,
    ) -> StoreResult<PagedResult<Product>> {
        let offset = OffsetCursor::decode(request.cursor()).map_or(0, |c| c.offset);
        let matching = self.matching(tenant, &KeywordFilter::new(request.keyword()));
        let total = matching.len();

        let items: Vec<Product> =
            matching.into_iter().skip(offset).take(request.limit()).collect();

        let consumed = offset.saturating_add(items.len());
        let next_cursor = if consumed < total {
            OffsetCursor { offset: consumed }.encode()
        } else {
            None
        };

        tracing::debug!(offset, returned = items.len(), total, "page served");
        Ok(PagedResult::new(items, next_cursor))
    }

    #[tracing::instrument(skip(self, product), fields(id = %product.id))]
    async fn update(&self, tenant: &TenantId, product: &Product) -> StoreResult<()> {
        self.put(tenant, product);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn soft_delete(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut guard = self.tenants.write();
        match guard.get_mut(tenant).and_then(|partition| partition.get_mut(id)) {
            Some(product) if !product.is_deleted => product.mark_deleted(actor, now),
            _ => tracing::debug!("nothing to delete"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;
    use crate::product::NewProduct;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn product(id: &str, name: &str, updated: i64) -> Product {
        let input = NewProduct::builder().name(name).sku(format!("SKU-{id}")).build();
        Product::from_new(RecordId::from(id), input, &ActorId::from("tester"), at(updated))
    }

    async fn seeded(tenant: &TenantId) -> MemoryProductStore {
        let store = MemoryProductStore::new();
        for (id, name, ts) in [
            ("a", "Apple Pie", 10),
            ("b", "Banana", 20),
            ("c", "Apple Juice", 30),
            ("d", "Cherry", 40),
            ("e", "Green Apple", 50),
        ] {
            store.create(tenant, &product(id, name, ts)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_capped() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;

        let ids: Vec<String> = store
            .list(&tenant, None, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["e", "d", "c"]);
    }

    #[tokio::test]
    async fn test_ties_break_by_id() {
        let tenant = TenantId::from("t1");
        let store = MemoryProductStore::new();
        for id in ["z", "m", "a"] {
            store.create(&tenant, &product(id, "Same", 7)).await.unwrap();
        }

        let page = store.page_list(&tenant, &PageRequest::new(None, 10, None)).await.unwrap();
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "m", "z"]);
    }

    #[tokio::test]
    async fn test_keyword_paging_fills_pages() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;

        let first = store
            .page_list(&tenant, &PageRequest::new(Some("Apple"), 2, None))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        let cursor = first.next_cursor.expect("more pages");

        let second = store
            .page_list(&tenant, &PageRequest::new(Some("Apple"), 2, Some(&cursor)))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.items[0].id.as_str(), "a");
    }

    #[tokio::test]
    async fn test_exact_fit_emits_no_cursor() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;

        let page = store.page_list(&tenant, &PageRequest::new(None, 5, None)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_cursor_past_the_end_yields_empty_last_page() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;
        let cursor = OffsetCursor { offset: 99 }.encode().unwrap();

        let page = store
            .page_list(&tenant, &PageRequest::new(None, 2, Some(&cursor)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_the_row() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;
        let id = RecordId::from("b");

        store.soft_delete(&tenant, &id, &ActorId::from("bob"), at(100)).await.unwrap();

        assert_eq!(store.len(&tenant), 5);
        assert!(store.get(&tenant, &id).await.unwrap().is_none());
        assert_eq!(store.list(&tenant, None, 200).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_replaces_whole_record() {
        let tenant = TenantId::from("t1");
        let store = seeded(&tenant).await;
        let mut replacement = product("a", "Apple Tart", 10);
        replacement.unit_price = Decimal::new(250, 2);

        store.update(&tenant, &replacement).await.unwrap();

        let stored = store.get(&tenant, &RecordId::from("a")).await.unwrap().unwrap();
        assert_eq!(stored, replacement);
    }
}
