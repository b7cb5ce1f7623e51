//! Single-table key-value implementation of
//! [`ProductStore`](stockroom_store::ProductStore).
//!
//! This crate provides [`KvProductStore`], which keeps every tenant's
//! products in one table of a remote key-value database, and
//! [`ProductBackend`], the startup switch between it and the in-memory
//! store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               ProductService (stockroom-store)              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      ProductBackend                         │
//! │        Memory(MemoryProductStore) │ KeyValue(KvProductStore)│
//! ├─────────────────────────────────────────────────────────────┤
//! │                    KeyValueClient trait                     │
//! │            put_item │ get_item │ query (one page)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │        Database SDK adapter │ LocalKeyValueClient           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Mapping
//!
//! | Product store              | Table                                          |
//! | -------------------------- | ---------------------------------------------- |
//! | tenant                     | partition key `ORG#{tenant}`                   |
//! | product id                 | sort key `PRODUCT#{id}`                        |
//! | `create` / `update`        | unconditional `put_item`                       |
//! | `get`                      | `get_item`, hidden if soft-deleted             |
//! | `page_list`                | one descending `query` page, then keyword filter |
//! | `soft_delete`              | consistent `get_item` + `put_item`             |
//!
//! # Pagination
//!
//! The continuation cursor is the database's last evaluated key wrapped
//! in a [`KeyCursor`](stockroom_store::KeyCursor). The keyword filter runs
//! after the native limit, so a page may hold fewer matches than `limit`,
//! even none, while a cursor is still returned. Callers must keep walking
//! until the cursor is absent.
//!
//! # Consistency
//!
//! Reads are eventually consistent unless
//! [`KvStoreConfig::consistent_reads`] is set. Soft delete always reads
//! consistently before writing. There are no conditional writes: the
//! last writer wins.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
pub mod client;
mod config;
mod error;
mod item;
pub mod keys;
mod local;
mod selection;

/// Shared test utilities for key-value backend testing.
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;

/// Key-value product store.
pub use backend::KvProductStore;
/// Native table API.
pub use client::{AttributeValue, Item, KeyValueClient, PrimaryKey, QueryPage, QueryRequest};
/// Configuration types.
pub use config::{BackendKind, DEFAULT_TABLE_NAME, KvStoreConfig, StoreConfig};
/// Client error type.
pub use error::KvClientError;
/// Item mapping.
pub use item::{from_item, to_item};
/// In-process client.
pub use local::LocalKeyValueClient;
/// Startup backend selection.
pub use selection::ProductBackend;
/// Configuration validation error type.
pub use stockroom_store::ConfigError;
