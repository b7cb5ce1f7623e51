//! Identity-directory adapter for stockroom.
//!
//! Users are not stored by stockroom. They live in a hosted identity
//! pool, and [`DirectoryAdapter`] proxies list, create, update and delete
//! calls to it through the [`IdentityProvider`] trait, returning users in
//! the same [`PagedResult`](stockroom_store::PagedResult) shape the product
//! store uses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HTTP Layer (external)                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     DirectoryAdapter                        │
//! │   keyword → filter │ limit clamp │ token pass-through       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  IdentityProvider trait                     │
//! │  list_users │ admin_create/update/enable/disable/delete     │
//! ├─────────────────────────────────────────────────────────────┤
//! │        Vendor SDK adapter │ LocalIdentityProvider           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use stockroom_directory::{
//!     DirectoryAdapter, DirectoryConfig, LocalIdentityProvider, NewUser, UserUpdate,
//! };
//! use stockroom_store::RequestContext;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(LocalIdentityProvider::new("pool-1"));
//!     let config = DirectoryConfig::builder().user_pool_id("pool-1").build()?;
//!     let directory = DirectoryAdapter::new(provider, config);
//!     let ctx = RequestContext::builder().tenant("demo-org").actor("admin").build();
//!
//!     let id = directory.create(&ctx, NewUser::builder().email("ann@example.com").build()).await?;
//!     directory
//!         .update(&ctx, &id, UserUpdate::builder().name("Ann").enabled(false).build())
//!         .await?;
//!
//!     let page = directory.list(&ctx, Some("ann"), 10, None).await?;
//!     assert_eq!(page.items[0].name.as_deref(), Some("Ann"));
//!     assert!(!page.items[0].enabled);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - **`failpoints`**: Activates the `fail` crate's fail points. The adapter declares
//!   `directory-before-enable-step` ahead of the enable/disable call of an update.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod config;
pub mod error;
pub mod filter;
mod local;
pub mod provider;
mod user;

pub use adapter::DirectoryAdapter;
pub use config::{DEFAULT_PROVIDER_PAGE_LIMIT, DirectoryConfig};
pub use error::{DirectoryError, DirectoryResult, ProviderError, StepOutcome};
pub use local::{DEFAULT_MAX_PAGE_SIZE, LocalIdentityProvider, Operation, ProviderCall};
pub use provider::{
    CreateUserRequest, IdentityProvider, ListUsersPage, ListUsersRequest, RemoteUser,
    UserAttribute,
};
pub use user::{DirectoryUser, NewUser, UpdateReport, UserStatus, UserUpdate};
