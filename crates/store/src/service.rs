//! Record service: validation, identity, audit stamping and tenant scoping
//! in front of a [`ProductStore`].
//!
//! The service is the only layer that assigns ids and stamps audit fields.
//! Stores persist what they are given. Every operation takes a
//! [`RequestContext`], runs its store calls under the context's
//! cancellation token and the configured timeout, and never touches a
//! tenant other than the context's.

use uuid::Uuid;

use crate::{
    config::ServiceConfig,
    context::RequestContext,
    error::{StoreError, StoreResult},
    page::{PageRequest, PagedResult},
    product::{NewProduct, Product, ProductUpdate},
    store::ProductStore,
    types::RecordId,
};

/// Product operations exposed to the HTTP layer.
///
/// # Example
///
/// ```
/// use stockroom_store::{MemoryProductStore, NewProduct, ProductService, RequestContext};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let service = ProductService::new(MemoryProductStore::new());
/// let ctx = RequestContext::builder().tenant("t1").actor("alice").build();
///
/// let id = service
///     .create(&ctx, NewProduct::builder().name("Widget").sku("W-1").build())
///     .await
///     .unwrap();
/// let product = service.get(&ctx, &id).await.unwrap().unwrap();
/// assert_eq!(product.created_by.as_str(), "alice");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S: ProductStore> ProductService<S> {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Validates `input`, assigns a fresh id and persists the product.
    ///
    /// Name, SKU and category are trimmed before validation and storage.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the name or SKU is blank
    /// - Any error from the store or the request guard
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant()))]
    pub async fn create(&self, ctx: &RequestContext, input: NewProduct) -> StoreResult<RecordId> {
        let input = NewProduct {
            name: required("name", &input.name)?,
            sku: required("sku", &input.sku)?,
            category: input.category.trim().to_owned(),
            ..input
        };

        let id = RecordId::new(Uuid::new_v4().simple().to_string());
        let product = Product::from_new(id.clone(), input, ctx.actor(), ctx.now());

        ctx.run(self.config.operation_timeout(), self.store.create(ctx.tenant(), &product))
            .await?;

        tracing::debug!(id = %id, "product created");
        Ok(id)
    }

    /// Looks up a live product. Soft-deleted products are reported as absent.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), id = %id))]
    pub async fn get(&self, ctx: &RequestContext, id: &RecordId) -> StoreResult<Option<Product>> {
        ctx.run(self.config.operation_timeout(), self.store.get(ctx.tenant(), id)).await
    }

    /// Lists live products matching `keyword`.
    ///
    /// `limit` falls back to the configured default page size and is
    /// clamped by the store.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant()))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        keyword: Option<&str>,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Product>> {
        let limit = limit.unwrap_or_else(|| self.default_limit());
        ctx.run(self.config.operation_timeout(), self.store.list(ctx.tenant(), keyword, limit))
            .await
    }

    /// Returns one page of live products.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), limit = request.limit()))]
    pub async fn page_list(
        &self,
        ctx: &RequestContext,
        request: &PageRequest,
    ) -> StoreResult<PagedResult<Product>> {
        ctx.run(self.config.operation_timeout(), self.store.page_list(ctx.tenant(), request)).await
    }

    /// Builds a page request using the configured default limit when the
    /// caller supplied none.
    #[must_use]
    pub fn page_request(
        &self,
        keyword: Option<&str>,
        limit: Option<i64>,
        cursor: Option<&str>,
    ) -> PageRequest {
        PageRequest::new(keyword, limit.unwrap_or_else(|| self.default_limit()), cursor)
    }

    /// Replaces a live product's mutable fields.
    ///
    /// The name is validated before the store is consulted. Creation
    /// stamps are preserved; the update stamps are renewed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the name is blank
    /// - [`StoreError::NotFound`] if the product is absent or soft-deleted
    /// - Any error from the store or the request guard
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), id = %id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &RecordId,
        input: ProductUpdate,
    ) -> StoreResult<()> {
        let input = ProductUpdate {
            name: required("name", &input.name)?,
            category: input.category.trim().to_owned(),
            ..input
        };

        let timeout = self.config.operation_timeout();
        let mut product = ctx
            .run(timeout, self.store.get(ctx.tenant(), id))
            .await?
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;

        product.apply(input, ctx.actor(), ctx.now());
        ctx.run(timeout, self.store.update(ctx.tenant(), &product)).await
    }

    /// Soft-deletes a product. Absent or already-deleted products are a
    /// successful no-op.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), id = %id))]
    pub async fn soft_delete(&self, ctx: &RequestContext, id: &RecordId) -> StoreResult<()> {
        let timeout = self.config.operation_timeout();
        if ctx.run(timeout, self.store.get(ctx.tenant(), id)).await?.is_none() {
            tracing::debug!("product absent or already deleted");
            return Ok(());
        }

        ctx.run(timeout, self.store.soft_delete(ctx.tenant(), id, ctx.actor(), ctx.now())).await
    }

    fn default_limit(&self) -> i64 {
        i64::try_from(self.config.default_page_limit()).unwrap_or(i64::MAX)
    }
}

/// Trims a required field, rejecting it if nothing is left.
fn required(field: &'static str, value: &str) -> StoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation(field, "is required"));
    }
    Ok(trimmed.to_owned())
}
