//! Shared test utilities for product store testing.
//!
//! This module provides fixtures for building products and request
//! contexts, and assertion macros over [`StoreResult`] values. It is
//! feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! stockroom-store = { path = "../store", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use stockroom_store::testutil::{fixed_time, make_product, populated_store};
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    ProductStore,
    context::RequestContext,
    error::{StoreError, StoreResult},
    memory::MemoryProductStore,
    product::{NewProduct, Product},
    types::{ActorId, RecordId, TenantId},
};

/// A fixed instant, `secs` seconds after 2023-11-14T22:13:20Z.
///
/// Tests use it instead of `Utc::now()` so orderings are deterministic.
#[must_use]
pub fn fixed_time(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default() + Duration::seconds(secs)
}

/// Creates a deterministic record id from a prefix and index.
///
/// Produces ids like `"prefix-000042"`; zero-padding keeps lexicographic
/// order equal to numeric order.
#[must_use]
pub fn make_id(prefix: &str, idx: usize) -> RecordId {
    RecordId::new(format!("{prefix}-{idx:06}"))
}

/// Builds a live product with the given id and name, last updated at
/// `fixed_time(updated)`.
#[must_use]
pub fn make_product(id: &str, name: &str, updated: i64) -> Product {
    let input = NewProduct::builder()
        .name(name)
        .sku(format!("SKU-{id}"))
        .unit_price(Decimal::new(100, 2))
        .build();
    Product::from_new(RecordId::from(id), input, &ActorId::from("fixture"), fixed_time(updated))
}

/// Builds a request context for `tenant` and `actor` at `fixed_time(secs)`.
#[must_use]
pub fn make_context(tenant: &str, actor: &str, secs: i64) -> RequestContext {
    RequestContext::builder().tenant(tenant).actor(actor).now(fixed_time(secs)).build()
}

/// Stores `count` products named `"{prefix} {idx}"` for `tenant`, each
/// updated one second after the previous one.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn seed<S: ProductStore + ?Sized>(
    store: &S,
    tenant: &TenantId,
    prefix: &str,
    count: usize,
) -> StoreResult<Vec<RecordId>> {
    let mut ids = Vec::with_capacity(count);
    for idx in 0..count {
        let id = make_id(prefix, idx);
        let secs = i64::try_from(idx).unwrap_or(i64::MAX);
        let product = make_product(id.as_str(), &format!("{prefix} {idx}"), secs);
        store.create(tenant, &product).await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Creates a [`MemoryProductStore`] holding `count` products for `tenant`.
///
/// # Panics
///
/// Panics if seeding fails (should not happen with `MemoryProductStore`).
pub async fn populated_store(tenant: &TenantId, count: usize) -> MemoryProductStore {
    let store = MemoryProductStore::new();
    seed(&store, tenant, "item", count).await.expect("seeding the memory store failed");
    store
}

/// Assert that a [`StoreResult`] is a [`StoreError::NotFound`].
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use stockroom_store::assert_not_found;
/// use stockroom_store::{StoreError, StoreResult};
///
/// let result: StoreResult<()> = Err(StoreError::not_found("missing"));
/// assert_not_found!(result);
/// ```
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::error::StoreError::NotFound { .. })),
            "expected StoreError::NotFound, got: {:?}",
            $result,
        );
    };
    ($result:expr, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::StoreError::NotFound { .. })),
            "{}: expected StoreError::NotFound, got: {:?}",
            $msg,
            $result,
        );
    };
}

/// Assert that a [`StoreResult`] is a [`StoreError::Validation`] for the
/// named field.
#[macro_export]
macro_rules! assert_validation {
    ($result:expr, $field:literal) => {
        assert!(
            matches!($result, Err($crate::error::StoreError::Validation { field: $field, .. })),
            "expected StoreError::Validation for `{}`, got: {:?}",
            $field,
            $result,
        );
    };
}

/// Assert that a [`StoreResult`] is `Ok`.
///
/// Returns the inner value on success, panics with a descriptive message
/// on failure.
#[macro_export]
macro_rules! assert_store_ok {
    ($result:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("expected Ok, got StoreError: {e:?}"),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("{}: expected Ok, got StoreError: {e:?}", $msg),
        }
    };
}

/// Helper to verify that a result is a `NotFound` error.
pub fn is_not_found<T>(result: &StoreResult<T>) -> bool {
    matches!(result, Err(StoreError::NotFound { .. }))
}

/// Helper to verify that a result is a transient backend error.
pub fn is_transient<T>(result: &StoreResult<T>) -> bool {
    matches!(result, Err(e) if e.is_transient())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_make_id_sorts_numerically() {
        assert!(make_id("p", 9) < make_id("p", 10));
    }

    #[tokio::test]
    async fn test_populated_store() {
        let tenant = TenantId::from("t1");
        let store = populated_store(&tenant, 3).await;
        assert_eq!(store.len(&tenant), 3);
    }

    #[test]
    fn test_assert_macros() {
        let missing: StoreResult<()> = Err(StoreError::not_found("x"));
        assert_not_found!(missing);
        assert!(is_not_found(&missing));

        let invalid: StoreResult<()> = Err(StoreError::validation("sku", "is required"));
        assert_validation!(invalid, "sku");

        let ok: StoreResult<u8> = Ok(3);
        assert_eq!(assert_store_ok!(ok), 3);
    }
}
