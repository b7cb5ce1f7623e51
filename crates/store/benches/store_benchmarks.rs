#![allow(clippy::expect_used)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use stockroom_store::{
    KeyCursor, MemoryProductStore, OffsetCursor, PageRequest, ProductStore, TenantId,
    testutil::populated_store,
};
use tokio::runtime::Runtime;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rt() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime")
}

fn tenant() -> TenantId {
    TenantId::from("bench-org")
}

fn store_of(rt: &Runtime, count: usize) -> MemoryProductStore {
    rt.block_on(populated_store(&tenant(), count))
}

// ---------------------------------------------------------------------------
// 1. cursor_codec
// ---------------------------------------------------------------------------

fn cursor_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor_codec");

    let offset = OffsetCursor { offset: 12_345 }.encode().expect("encode failed");
    let key = KeyCursor { pk: "ORG#bench-org".into(), sk: "PRODUCT#0f3c9a7e5b2d4c1a".into() }
        .encode()
        .expect("encode failed");

    group.bench_function("offset_encode", |b| b.iter(|| OffsetCursor { offset: 12_345 }.encode()));
    group.bench_function("offset_decode", |b| {
        b.iter(|| OffsetCursor::decode(Some(&offset)).expect("decode failed"));
    });
    group.bench_function("key_decode", |b| {
        b.iter(|| KeyCursor::decode(Some(&key)).expect("decode failed"));
    });
    group.bench_function("malformed_decode", |b| {
        b.iter(|| assert!(OffsetCursor::decode(Some("!!not-a-cursor!!")).is_none()));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// 2. page_list
// ---------------------------------------------------------------------------

fn page_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_list");
    let rt = rt();

    for &count in &[100usize, 1_000, 10_000] {
        let store = store_of(&rt, count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("first_page", count), &count, |b, _| {
            b.to_async(&rt).iter(|| {
                let store = store.clone();
                async move {
                    store
                        .page_list(&tenant(), &PageRequest::new(None, 50, None))
                        .await
                        .expect("page_list failed");
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("keyword_page", count), &count, |b, _| {
            b.to_async(&rt).iter(|| {
                let store = store.clone();
                async move {
                    store
                        .page_list(&tenant(), &PageRequest::new(Some("item 9"), 50, None))
                        .await
                        .expect("page_list failed");
                }
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// 3. full_walk
// ---------------------------------------------------------------------------

fn full_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_walk");
    let rt = rt();

    for &count in &[1_000usize, 5_000] {
        let store = store_of(&rt, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("limit_200", count), &count, |b, &expected| {
            b.to_async(&rt).iter(|| {
                let store = store.clone();
                async move {
                    let mut seen = 0;
                    let mut request = PageRequest::new(None, 200, None);
                    loop {
                        let page = store.page_list(&tenant(), &request).await.expect("page failed");
                        seen += page.items.len();
                        match page.next_cursor {
                            Some(cursor) => request = request.with_cursor(Some(&cursor)),
                            None => break,
                        }
                    }
                    assert_eq!(seen, expected);
                }
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Group registration
// ---------------------------------------------------------------------------

criterion_group!(benches, cursor_codec, page_list, full_walk);
criterion_main!(benches);
