//! The product store contract.
//!
//! This module defines [`ProductStore`], the capability set every product
//! backend implements: the in-memory [`MemoryProductStore`] and the
//! remote key-value store in `stockroom-store-kv`.
//!
//! # Contract
//!
//! - Every operation is scoped to exactly one tenant. No operation reads
//!   or writes another tenant's records.
//! - Soft-deleted records are invisible to `get`, `list` and `page_list`.
//! - `update` is an unconditional full replace: last writer wins.
//! - `soft_delete` is idempotent.
//! - Limits are clamped into `[1, 200]` by the store itself.
//! - Malformed cursors restart pagination; they are never an error.
//!
//! # Implementing a Backend
//!
//! 1. Implement [`ProductStore`]
//! 2. Map backend-specific errors to [`StoreError`](crate::StoreError)
//! 3. Run the checks in [`conformance`](crate::conformance) against it
//!
//! [`MemoryProductStore`]: crate::MemoryProductStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::StoreResult,
    page::{PageRequest, PagedResult},
    product::Product,
    types::{ActorId, RecordId, TenantId},
};

/// Tenant-scoped persistence for [`Product`] records.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`create`](ProductStore::create) | Persist a new product |
/// | [`get`](ProductStore::get) | Look up a live product by id |
/// | [`list`](ProductStore::list) | Filtered, capped, unpaginated read |
/// | [`page_list`](ProductStore::page_list) | Filtered, paginated read |
/// | [`update`](ProductStore::update) | Full replace (upsert) |
/// | [`soft_delete`](ProductStore::soft_delete) | Flag a product as deleted |
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persists a new product.
    ///
    /// Ids are unique per tenant; backends do not check for an existing
    /// record and overwrite it if one is present.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn create(&self, tenant: &TenantId, product: &Product) -> StoreResult<()>;

    /// Retrieves a product by id.
    ///
    /// Returns `Ok(None)` when the product is absent or soft-deleted.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn get(&self, tenant: &TenantId, id: &RecordId) -> StoreResult<Option<Product>>;

    /// Lists up to `limit` live products matching `keyword`.
    ///
    /// Ordering is backend-specific.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn list(
        &self,
        tenant: &TenantId,
        keyword: Option<&str>,
        limit: i64,
    ) -> StoreResult<Vec<Product>>;

    /// Returns one page of live products matching the request's keyword.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn page_list(
        &self,
        tenant: &TenantId,
        request: &PageRequest,
    ) -> StoreResult<PagedResult<Product>>;

    /// Replaces the stored product with `product`, creating it if absent.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn update(&self, tenant: &TenantId, product: &Product) -> StoreResult<()>;

    /// Sets the soft-delete flag on a product, stamping it with `actor`
    /// and `now`.
    ///
    /// A no-op when the product is absent or already deleted.
    #[must_use = "store operations may fail and errors must be handled"]
    async fn soft_delete(
        &self,
        tenant: &TenantId,
        id: &RecordId,
        actor: &ActorId,
        now: DateTime<Utc>,
    ) -> StoreResult<()>;
}
