//! Integration test verifying that `#[instrument]` annotations produce
//! the expected spans on `MemoryProductStore` and `ProductService`
//! operations.

#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};

use stockroom_store::{
    MemoryProductStore, NewProduct, PageRequest, ProductService, ProductStore, ProductUpdate,
    TenantId,
    testutil::{make_context, make_product},
};
use tracing::{
    Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan};

// ---------------------------------------------------------------------------
// Collecting layer: records span names and their `tenant` field
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct SpanCollector {
    spans: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

#[derive(Default)]
struct TenantVisitor(Option<String>);

impl Visit for TenantVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "tenant" {
            self.0 = Some(format!("{value:?}").trim_matches('"').to_owned());
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCollector
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let mut visitor = TenantVisitor::default();
            attrs.record(&mut visitor);
            self.spans.lock().expect("lock poisoned").push((span.name().to_owned(), visitor.0));
        }
    }
}

impl SpanCollector {
    fn names(&self) -> Vec<String> {
        self.spans.lock().expect("lock poisoned").iter().map(|(name, _)| name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn memory_store_operations_create_spans() {
    let collector = SpanCollector::default();
    let subscriber = tracing_subscriber::registry().with(collector.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let store = MemoryProductStore::new();
    let tenant = TenantId::from("t1");
    let product = make_product("p1", "Widget", 0);

    store.create(&tenant, &product).await.expect("create");
    store.get(&tenant, &product.id).await.expect("get");
    store.list(&tenant, None, 10).await.expect("list");
    store.page_list(&tenant, &PageRequest::first()).await.expect("page_list");
    store.update(&tenant, &product).await.expect("update");

    let names = collector.names();
    for expected in ["create", "get", "list", "page_list", "update"] {
        assert!(names.iter().any(|n| n == expected), "expected a '{expected}' span, got: {names:?}");
    }
}

#[tokio::test]
async fn service_spans_carry_the_tenant() {
    let collector = SpanCollector::default();
    let spans = Arc::clone(&collector.spans);
    let subscriber = tracing_subscriber::registry().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = ProductService::new(MemoryProductStore::new());
    let ctx = make_context("tenant-42", "alice", 0);

    let id = service
        .create(&ctx, NewProduct::builder().name("Widget").sku("W").build())
        .await
        .expect("create");
    service
        .update(&ctx, &id, ProductUpdate::builder().name("Gadget").build())
        .await
        .expect("update");
    service.soft_delete(&ctx, &id).await.expect("soft_delete");

    let recorded = spans.lock().expect("lock poisoned");
    for expected in ["create", "update", "soft_delete"] {
        assert!(
            recorded
                .iter()
                .any(|(name, tenant)| name == expected && tenant.as_deref() == Some("tenant-42")),
            "expected a '{expected}' span with tenant field, got: {recorded:?}"
        );
    }
}

#[tokio::test]
async fn soft_delete_span_is_recorded_for_missing_ids() {
    let collector = SpanCollector::default();
    let subscriber = tracing_subscriber::registry().with(collector.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = ProductService::new(MemoryProductStore::new());
    service
        .soft_delete(&make_context("t1", "alice", 0), &"ghost".into())
        .await
        .expect("no-op delete");

    let names = collector.names();
    assert!(names.iter().any(|n| n == "soft_delete"), "got: {names:?}");
}
