//! Conformance test suite for `MemoryProductStore`.
//!
//! Each test function corresponds to a single conformance check, providing
//! fine-grained failure reporting. The `run_all` test exercises the full
//! suite against one shared store to verify the checks do not interfere.

#![allow(clippy::expect_used, clippy::panic)]

use stockroom_store::{MemoryProductStore, conformance};

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn get_missing_returns_none() {
    conformance::get_missing_returns_none(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn create_then_get() {
    conformance::create_then_get(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn update_upserts_absent() {
    conformance::update_upserts_absent(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn update_last_writer_wins() {
    conformance::update_last_writer_wins(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn update_is_idempotent() {
    conformance::update_is_idempotent(&MemoryProductStore::new()).await;
}

// ============================================================================
// Isolation
// ============================================================================

#[tokio::test]
async fn tenant_isolation() {
    conformance::tenant_isolation(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn same_id_in_two_tenants() {
    conformance::same_id_in_two_tenants(&MemoryProductStore::new()).await;
}

// ============================================================================
// Soft delete
// ============================================================================

#[tokio::test]
async fn soft_delete_hides_record() {
    conformance::soft_delete_hides_record(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn soft_delete_missing_is_noop() {
    conformance::soft_delete_missing_is_noop(&MemoryProductStore::new()).await;
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn limits_are_clamped() {
    conformance::limits_are_clamped(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn page_walk_is_complete() {
    conformance::page_walk_is_complete(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn malformed_cursor_restarts() {
    conformance::malformed_cursor_restarts(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn keyword_matches_name_or_sku() {
    conformance::keyword_matches_name_or_sku(&MemoryProductStore::new()).await;
}

// ============================================================================
// Whole suite
// ============================================================================

#[tokio::test]
async fn run_all() {
    conformance::run_all(&MemoryProductStore::new()).await;
}

#[tokio::test]
async fn run_all_through_trait_object() {
    let store: Box<dyn stockroom_store::ProductStore> = Box::new(MemoryProductStore::new());
    conformance::run_all(store.as_ref()).await;
}
