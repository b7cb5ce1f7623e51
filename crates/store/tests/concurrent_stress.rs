//! Concurrent access stress tests for `MemoryProductStore`.
//!
//! These tests exercise the store under multi-threaded workloads to detect
//! torn reads, lost creates and cross-tenant leakage. The heavier ones are
//! ignored by default:
//!
//! ```bash
//! cargo test -p stockroom-store --test concurrent_stress -- --ignored
//! ```

#![allow(clippy::expect_used, clippy::panic)]

use std::collections::HashSet;

use stockroom_store::{
    MemoryProductStore, NewProduct, PageRequest, ProductService, ProductStore, RecordId, TenantId,
    testutil::{fixed_time, make_context, make_product},
};
use tokio::task::JoinSet;

/// Number of concurrent tasks for most tests.
const CONCURRENCY: usize = 16;

/// Number of operations each task performs.
const OPS_PER_TASK: usize = 50;

// ---------------------------------------------------------------------------
// Test: Parallel writers to the same record (last writer wins)
// ---------------------------------------------------------------------------

/// Every task rewrites the same record. Afterwards the record must equal
/// exactly one of the written versions: no field may come from another.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_writers_same_record() {
    let store = MemoryProductStore::new();
    let tenant = TenantId::from("t1");

    let mut tasks = JoinSet::new();
    for task in 0..CONCURRENCY {
        let store = store.clone();
        let tenant = tenant.clone();
        tasks.spawn(async move {
            for seq in 0..OPS_PER_TASK {
                let mut product = make_product("shared", &format!("task{task}"), 0);
                product.category = format!("task{task}");
                product.sku = format!("seq{seq}");
                store.update(&tenant, &product).await.expect("update");
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("task panicked");
    }

    let stored = store.get(&tenant, &RecordId::from("shared")).await.expect("get").expect("present");
    assert_eq!(stored.name, stored.category, "torn write: {stored:?}");
    assert_eq!(store.len(&tenant), 1);
}

// ---------------------------------------------------------------------------
// Test: Concurrent creates through the service are all retained
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_are_not_lost() {
    let service = ProductService::new(MemoryProductStore::new());

    let mut tasks = JoinSet::new();
    for task in 0..CONCURRENCY {
        let service = service.clone();
        tasks.spawn(async move {
            let ctx = make_context("t1", &format!("actor{task}"), 0);
            let mut ids = Vec::with_capacity(OPS_PER_TASK);
            for seq in 0..OPS_PER_TASK {
                let input = NewProduct::builder()
                    .name(format!("item {task}-{seq}"))
                    .sku(format!("SKU-{task}-{seq}"))
                    .build();
                ids.push(service.create(&ctx, input).await.expect("create"));
            }
            ids
        });
    }

    let mut created = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        created.extend(joined.expect("task panicked"));
    }
    assert_eq!(created.len(), CONCURRENCY * OPS_PER_TASK, "ids must be unique");
    assert_eq!(service.store().len(&"t1".into()), CONCURRENCY * OPS_PER_TASK);
}

// ---------------------------------------------------------------------------
// Test: Readers never observe another tenant's records under load
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Run with --ignored
async fn tenants_stay_isolated_under_load() {
    let store = MemoryProductStore::new();

    let mut tasks = JoinSet::new();
    for task in 0..CONCURRENCY {
        let store = store.clone();
        tasks.spawn(async move {
            let tenant = TenantId::new(format!("tenant-{task}"));
            for seq in 0..OPS_PER_TASK {
                let id = format!("{task}-{seq}");
                let secs = i64::try_from(seq).expect("small");
                store.create(&tenant, &make_product(&id, "Shared Name", secs)).await.expect("create");
                if seq % 3 == 0 {
                    store
                        .soft_delete(&tenant, &RecordId::new(id), &"deleter".into(), fixed_time(secs))
                        .await
                        .expect("delete");
                }

                let page = store
                    .page_list(&tenant, &PageRequest::new(Some("shared"), 200, None))
                    .await
                    .expect("page");
                let prefix = format!("{task}-");
                assert!(
                    page.items.iter().all(|p| p.id.as_str().starts_with(&prefix)),
                    "tenant-{task} saw a foreign record"
                );
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("task panicked");
    }

    for task in 0..CONCURRENCY {
        let tenant = TenantId::new(format!("tenant-{task}"));
        assert_eq!(store.len(&tenant), OPS_PER_TASK);
        let live = store.list(&tenant, None, 200).await.expect("list");
        assert_eq!(live.len(), OPS_PER_TASK - OPS_PER_TASK.div_ceil(3));
    }
}
