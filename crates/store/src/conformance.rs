//! Conformance test suite for [`ProductStore`] implementations.
//!
//! Each function checks one clause of the store contract against a
//! backend. Every backend (in-memory, key-value, or third-party) runs the
//! same suite so the service layer can rely on identical semantics.
//!
//! # Usage
//!
//! Enable the `testutil` feature and call each conformance function with
//! a fresh store:
//!
//! ```no_run
//! use stockroom_store::{MemoryProductStore, conformance};
//!
//! #[tokio::test]
//! async fn tenant_isolation() {
//!     conformance::tenant_isolation(&MemoryProductStore::new()).await;
//! }
//! ```
//!
//! # Check Categories
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | CRUD | create/get/update round trips, upsert, last writer wins |
//! | Isolation | No read path crosses a tenant boundary |
//! | Soft delete | Hidden from every read, idempotent, missing ids are a no-op |
//! | Pagination | Limits are clamped, cursor walks are complete, bad cursors restart |
//!
//! Ordering is deliberately not checked: it is backend-specific.

use std::collections::HashSet;

use crate::{
    page::PageRequest,
    product::Product,
    store::ProductStore,
    testutil::{fixed_time, make_product, seed},
    types::{ActorId, RecordId, TenantId},
};

fn ids(products: &[Product]) -> HashSet<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

// ============================================================================
// CRUD
// ============================================================================

/// `get` on an unknown id returns `Ok(None)`.
pub async fn get_missing_returns_none<S: ProductStore + ?Sized>(store: &S) {
    let result = store.get(&TenantId::from("crud-missing"), &RecordId::from("ghost")).await;
    assert!(result.is_ok(), "get should not error on a missing id: {result:?}");
    assert_eq!(result.expect("checked above"), None);
}

/// `create` then `get` returns the stored product unchanged.
pub async fn create_then_get<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("crud-create");
    let product = make_product("p1", "Widget", 0);

    store.create(&tenant, &product).await.expect("create");
    let stored = store.get(&tenant, &product.id).await.expect("get");

    assert_eq!(stored, Some(product));
}

/// `update` of an absent id creates it.
pub async fn update_upserts_absent<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("crud-upsert");
    let product = make_product("p1", "Widget", 0);

    store.update(&tenant, &product).await.expect("upsert");

    assert_eq!(store.get(&tenant, &product.id).await.expect("get"), Some(product));
}

/// Two writers to the same id: the second write wins in full.
pub async fn update_last_writer_wins<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("crud-lww");
    let first = make_product("p1", "First", 0);
    let mut second = make_product("p1", "Second", 5);
    second.category = "replaced".into();

    store.update(&tenant, &first).await.expect("first write");
    store.update(&tenant, &second).await.expect("second write");

    assert_eq!(store.get(&tenant, &first.id).await.expect("get"), Some(second));
}

/// Writing identical content twice leaves identical observable fields,
/// with `updated_at` never moving backwards.
pub async fn update_is_idempotent<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("crud-idempotent");
    let original = make_product("p1", "Widget", 0);
    store.create(&tenant, &original).await.expect("create");

    let mut once = original.clone();
    once.touch(&ActorId::from("editor"), fixed_time(10));
    store.update(&tenant, &once).await.expect("first update");
    let after_first = store.get(&tenant, &original.id).await.expect("get").expect("present");

    let mut twice = after_first.clone();
    twice.touch(&ActorId::from("editor"), fixed_time(10));
    store.update(&tenant, &twice).await.expect("second update");
    let after_second = store.get(&tenant, &original.id).await.expect("get").expect("present");

    assert!(after_second.updated_at >= after_first.updated_at);
    assert!(after_second.updated_at >= after_second.created_at);
    assert_eq!(
        Product { updated_at: after_first.updated_at, ..after_second },
        after_first,
        "only updated_at may differ between identical updates"
    );
}

// ============================================================================
// Isolation
// ============================================================================

/// Records created under one tenant are invisible to every read path of
/// another, even with no keyword.
pub async fn tenant_isolation<S: ProductStore + ?Sized>(store: &S) {
    let owner = TenantId::from("iso-owner");
    let other = TenantId::from("iso-other");
    let product = make_product("shared-id", "Secret", 0);
    store.create(&owner, &product).await.expect("create");

    assert_eq!(store.get(&other, &product.id).await.expect("get"), None);
    assert!(store.list(&other, None, 200).await.expect("list").is_empty());
    assert!(store.list(&other, Some("Secret"), 200).await.expect("keyword list").is_empty());
    let page = store.page_list(&other, &PageRequest::new(None, 200, None)).await.expect("page");
    assert!(page.items.is_empty());
    assert!(page.next_cursor.is_none());
}

/// The same id under two tenants names two independent records.
pub async fn same_id_in_two_tenants<S: ProductStore + ?Sized>(store: &S) {
    let a = TenantId::from("iso-a");
    let b = TenantId::from("iso-b");
    store.create(&a, &make_product("p1", "Alpha", 0)).await.expect("create a");
    store.create(&b, &make_product("p1", "Beta", 0)).await.expect("create b");

    store
        .soft_delete(&a, &RecordId::from("p1"), &ActorId::from("x"), fixed_time(1))
        .await
        .expect("delete a");

    assert_eq!(store.get(&a, &RecordId::from("p1")).await.expect("get a"), None);
    let survivor = store.get(&b, &RecordId::from("p1")).await.expect("get b").expect("b survives");
    assert_eq!(survivor.name, "Beta");
}

// ============================================================================
// Soft delete
// ============================================================================

/// A soft-deleted record disappears from `get`, `list` and `page_list`,
/// and deleting it again is a no-op.
pub async fn soft_delete_hides_record<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("del-hide");
    let product = make_product("p1", "Widget", 0);
    store.create(&tenant, &product).await.expect("create");
    let actor = ActorId::from("remover");

    store.soft_delete(&tenant, &product.id, &actor, fixed_time(10)).await.expect("delete");
    store.soft_delete(&tenant, &product.id, &actor, fixed_time(20)).await.expect("second delete");

    assert_eq!(store.get(&tenant, &product.id).await.expect("get"), None);
    assert!(store.list(&tenant, None, 200).await.expect("list").is_empty());
    assert!(store.list(&tenant, Some("Widget"), 200).await.expect("keyword list").is_empty());
    let page = store.page_list(&tenant, &PageRequest::new(None, 200, None)).await.expect("page");
    assert!(page.items.is_empty());
}

/// Soft-deleting an id that was never stored succeeds and creates nothing.
pub async fn soft_delete_missing_is_noop<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("del-missing");
    let result = store
        .soft_delete(&tenant, &RecordId::from("ghost"), &ActorId::from("x"), fixed_time(0))
        .await;
    assert!(result.is_ok(), "deleting a missing id should not error: {result:?}");
    assert!(store.list(&tenant, None, 200).await.expect("list").is_empty());
}

// ============================================================================
// Pagination
// ============================================================================

/// Out-of-range limits are clamped into `[1, 200]`.
pub async fn limits_are_clamped<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("page-clamp");
    seed(store, &tenant, "clamp", 3).await.expect("seed");

    assert_eq!(store.list(&tenant, None, 0).await.expect("list 0").len(), 1);
    assert_eq!(store.list(&tenant, None, -10).await.expect("list -10").len(), 1);
    let page = store.page_list(&tenant, &PageRequest::new(None, 0, None)).await.expect("page 0");
    assert_eq!(page.items.len(), 1);
    assert!(page.next_cursor.is_some());
}

/// Following `next_cursor` until it is absent visits every live record
/// exactly once.
pub async fn page_walk_is_complete<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("page-walk");
    let expected: HashSet<String> = seed(store, &tenant, "walk", 7)
        .await
        .expect("seed")
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    let mut seen = Vec::new();
    let mut request = PageRequest::new(None, 3, None);
    for _ in 0..10 {
        let page = store.page_list(&tenant, &request).await.expect("page");
        assert!(page.items.len() <= 3, "page exceeds limit");
        seen.extend(page.items);
        match page.next_cursor {
            Some(cursor) => request = request.with_cursor(Some(&cursor)),
            None => break,
        }
    }

    assert_eq!(seen.len(), expected.len(), "duplicates or omissions in the walk");
    assert_eq!(ids(&seen), expected);

    let listed = store.list(&tenant, None, 200).await.expect("list");
    assert_eq!(ids(&listed), expected);
}

/// A garbage or blank cursor restarts pagination at the first page.
pub async fn malformed_cursor_restarts<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("page-malformed");
    seed(store, &tenant, "bad", 4).await.expect("seed");

    let first = store.page_list(&tenant, &PageRequest::new(None, 2, None)).await.expect("first");
    for cursor in ["!!not-a-cursor!!", "   ", "", "e30", "eyJvZmZzZXQiOiJ4In0"] {
        let page = store
            .page_list(&tenant, &PageRequest::new(None, 2, Some(cursor)))
            .await
            .expect("malformed cursor must not error");
        assert_eq!(ids(&page.items), ids(&first.items), "cursor {cursor:?} did not restart");
    }
}

/// Keyword matching is case-insensitive over name and SKU.
pub async fn keyword_matches_name_or_sku<S: ProductStore + ?Sized>(store: &S) {
    let tenant = TenantId::from("keyword");
    store.create(&tenant, &make_product("k1", "Green Apple", 0)).await.expect("create");
    store.create(&tenant, &make_product("k2", "Pear", 1)).await.expect("create");
    let mut by_sku = make_product("k3", "Crate", 2);
    by_sku.sku = "APPLE-CRATE".into();
    store.create(&tenant, &by_sku).await.expect("create");

    let found = store.list(&tenant, Some("aPPle"), 200).await.expect("list");
    assert_eq!(ids(&found), HashSet::from(["k1".to_owned(), "k3".to_owned()]));
}

/// Runs every check against `store`.
pub async fn run_all<S: ProductStore + ?Sized>(store: &S) {
    get_missing_returns_none(store).await;
    create_then_get(store).await;
    update_upserts_absent(store).await;
    update_last_writer_wins(store).await;
    update_is_idempotent(store).await;
    tenant_isolation(store).await;
    same_id_in_two_tenants(store).await;
    soft_delete_hides_record(store).await;
    soft_delete_missing_is_noop(store).await;
    limits_are_clamped(store).await;
    page_walk_is_complete(store).await;
    malformed_cursor_restarts(store).await;
    keyword_matches_name_or_sku(store).await;
}
