//! The identity provider API the adapter is written against.
//!
//! [`IdentityProvider`] mirrors the administrative calls of a hosted user
//! pool: list users with a filter expression and an opaque pagination
//! token, create a user, change attributes, enable, disable and delete.
//! A production deployment implements it over the vendor SDK;
//! [`LocalIdentityProvider`](crate::LocalIdentityProvider) implements it
//! in process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::error::ProviderError;

/// A named user attribute (`email`, `name`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttribute {
    /// Attribute name as the provider spells it.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl UserAttribute {
    /// Creates an attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// A user as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUser {
    /// Username, unique within the pool.
    pub username: String,
    /// Free-form attribute collection.
    pub attributes: Vec<UserAttribute>,
    /// Whether the user may sign in.
    pub enabled: bool,
    /// Vendor status string, if reported.
    pub status: Option<String>,
    /// Creation time, if reported.
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of a user listing.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct ListUsersRequest {
    /// Pool to list.
    #[builder(into)]
    pub pool_id: String,
    /// Filter expression, e.g. `email ^= "ann"`.
    #[builder(into)]
    pub filter: Option<String>,
    /// Maximum number of users to return.
    pub limit: usize,
    /// Token from the previous page.
    #[builder(into)]
    pub pagination_token: Option<String>,
}

/// Result of one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersPage {
    /// Users on this page.
    pub users: Vec<RemoteUser>,
    /// Token for the next page; `None` on the last one.
    pub pagination_token: Option<String>,
}

/// Administrative user creation.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Pool to create the user in.
    pub pool_id: String,
    /// Username of the new user.
    pub username: String,
    /// Initial attributes.
    pub attributes: Vec<UserAttribute>,
    /// Temporary credential the user must change at first sign-in.
    pub temporary_password: Option<Zeroizing<String>>,
}

/// Administrative calls of a hosted user pool.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    /// Lists one page of users.
    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersPage, ProviderError>;

    /// Creates a user and returns it.
    async fn admin_create_user(&self, request: CreateUserRequest) -> Result<RemoteUser, ProviderError>;

    /// Sets the given attributes, leaving others untouched.
    async fn admin_update_user_attributes(
        &self,
        pool_id: &str,
        username: &str,
        attributes: Vec<UserAttribute>,
    ) -> Result<(), ProviderError>;

    /// Allows the user to sign in again.
    async fn admin_enable_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError>;

    /// Prevents the user from signing in.
    async fn admin_disable_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError>;

    /// Deletes the user.
    async fn admin_delete_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError>;
}
