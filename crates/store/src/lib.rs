//! Tenant-scoped product store abstraction with cursor pagination.
//!
//! This crate provides the [`ProductStore`] trait, the [`ProductService`]
//! that validates and stamps records in front of it, the opaque cursor
//! codec shared by every backend, and the in-memory reference backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HTTP Layer (external)                    │
//! │   (tenant, keyword, limit, cursor, actor, now) per request  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      ProductService                         │
//! │      validation │ id assignment │ audit stamps │ guard      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   ProductStore trait                        │
//! │  (create, get, list, page_list, update, soft_delete)        │
//! ├────────────────────┬────────────────────────────────────────┤
//! │ MemoryProductStore │ KvProductStore (stockroom-store-kv)    │
//! │  offset cursors    │  key-continuation cursors              │
//! └────────────────────┴────────────────────────────────────────┘
//! ```
//!
//! Users of the identity directory go through `stockroom-directory`,
//! which shares this crate's paging contract and cursor types but not
//! the product store.
//!
//! # Quick Start
//!
//! ```
//! use stockroom_store::{MemoryProductStore, NewProduct, ProductService, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ProductService::new(MemoryProductStore::new());
//!     let ctx = RequestContext::builder().tenant("demo-org").actor("alice").build();
//!
//!     service.create(&ctx, NewProduct::builder().name("Apple").sku("APL-1").build()).await?;
//!
//!     let request = service.page_request(Some("apple"), Some(10), None);
//!     let page = service.page_list(&ctx, &request).await?;
//!     assert_eq!(page.items.len(), 1);
//!     assert!(page.next_cursor.is_none());
//!     Ok(())
//! }
//! ```
//!
//! # Pagination
//!
//! Every paginated read returns a [`PagedResult`] whose `next_cursor` is an
//! opaque, URL-safe token. Passing it back resumes the walk; its absence
//! means the walk is over. Limits are always clamped into `[1, 200]`, and
//! a malformed cursor silently restarts from the first page.
//!
//! # Error Handling
//!
//! All operations return [`StoreResult<T>`]. Backends map their native
//! failures onto [`StoreError`]; nothing in this crate retries.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module (fixtures, assertion macros) and the
//!   `conformance` suite. Enable this in `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod config;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used, clippy::panic)]
pub mod conformance;
pub mod context;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod memory;
pub mod page;
pub mod product;
pub mod service;
pub mod store;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::ServiceConfig;
pub use context::{Interrupted, RequestContext};
pub use cursor::{Cursor, KeyCursor, OffsetCursor, OpaqueToken};
pub use error::{BoxError, ConfigError, StoreError, StoreResult};
pub use filter::KeywordFilter;
pub use memory::MemoryProductStore;
pub use page::{PageRequest, PagedResult};
pub use product::{NewProduct, Product, ProductUpdate};
pub use service::ProductService;
pub use store::ProductStore;
pub use types::{
    ActorId, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MIN_PAGE_LIMIT, RecordId, TenantId, clamp_limit,
};
