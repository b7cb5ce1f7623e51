//! Process-local [`IdentityProvider`].
//!
//! [`LocalIdentityProvider`] keeps one user pool in memory and behaves
//! like the hosted service where the adapter depends on it:
//!
//! - listings are ordered by username and paged with opaque tokens that
//!   the provider alone can interpret; a token it did not issue is an
//!   `InvalidParameter` error
//! - page sizes outside `[1, max_page_size]` are rejected
//! - filters use the `attribute op "value"` syntax of [`crate::filter`]
//! - enabling and disabling are separate calls
//!
//! Every call is journalled, and a fault can be queued per operation,
//! so tests can assert exactly which calls the adapter issued.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use parking_lot::Mutex;

use crate::{
    error::ProviderError,
    filter::FilterExpr,
    provider::{
        CreateUserRequest, IdentityProvider, ListUsersPage, ListUsersRequest, RemoteUser,
        UserAttribute,
    },
};

/// Default largest page the local provider serves.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 60;

const TOKEN_PREFIX: &str = "page-after:";
const MIN_PASSWORD_LEN: usize = 8;

/// Provider operations, used to target fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list_users`
    ListUsers,
    /// `admin_create_user`
    CreateUser,
    /// `admin_update_user_attributes`
    UpdateAttributes,
    /// `admin_enable_user`
    EnableUser,
    /// `admin_disable_user`
    DisableUser,
    /// `admin_delete_user`
    DeleteUser,
}

/// A journalled provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// A listing page.
    ListUsers {
        /// Filter expression sent.
        filter: Option<String>,
        /// Page size sent.
        limit: usize,
        /// Pagination token sent.
        pagination_token: Option<String>,
    },
    /// A user creation.
    CreateUser {
        /// Username.
        username: String,
        /// Names of the attributes sent.
        attributes: Vec<String>,
        /// Whether a temporary password was sent.
        with_password: bool,
    },
    /// An attribute update.
    UpdateAttributes {
        /// Username.
        username: String,
        /// Attributes sent.
        attributes: Vec<UserAttribute>,
    },
    /// An enable call.
    EnableUser(String),
    /// A disable call.
    DisableUser(String),
    /// A delete call.
    DeleteUser(String),
}

impl ProviderCall {
    fn operation(&self) -> Operation {
        match self {
            Self::ListUsers { .. } => Operation::ListUsers,
            Self::CreateUser { .. } => Operation::CreateUser,
            Self::UpdateAttributes { .. } => Operation::UpdateAttributes,
            Self::EnableUser(_) => Operation::EnableUser,
            Self::DisableUser(_) => Operation::DisableUser,
            Self::DeleteUser(_) => Operation::DeleteUser,
        }
    }
}

#[derive(Debug, Default)]
struct Pool {
    users: BTreeMap<String, RemoteUser>,
    journal: Vec<ProviderCall>,
    faults: HashMap<Operation, ProviderError>,
}

/// In-memory user pool.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    pool_id: String,
    max_page_size: usize,
    state: Mutex<Pool>,
}

impl LocalIdentityProvider {
    /// Creates an empty pool with the given id.
    #[must_use]
    pub fn new(pool_id: impl Into<String>) -> Self {
        Self::with_max_page_size(pool_id, DEFAULT_MAX_PAGE_SIZE)
    }

    /// Creates an empty pool that serves at most `max_page_size` users
    /// per page.
    #[must_use]
    pub fn with_max_page_size(pool_id: impl Into<String>, max_page_size: usize) -> Self {
        Self { pool_id: pool_id.into(), max_page_size, state: Mutex::new(Pool::default()) }
    }

    /// Stores `user` directly, bypassing creation rules. Useful for
    /// seeding users with unusual attribute sets.
    pub fn insert_user(&self, user: RemoteUser) {
        self.state.lock().users.insert(user.username.clone(), user);
    }

    /// Returns a stored user.
    #[must_use]
    pub fn user(&self, username: &str) -> Option<RemoteUser> {
        self.state.lock().users.get(username).cloned()
    }

    /// Number of users in the pool.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ProviderError) {
        self.state.lock().faults.insert(operation, error);
    }

    /// Every call received so far, in order, including failed ones.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().journal.clone()
    }

    /// Forgets the journalled calls.
    pub fn clear_calls(&self) {
        self.state.lock().journal.clear();
    }

    /// Journals `call`, consumes a queued fault for it, and checks the
    /// pool id. Runs under the pool lock.
    fn begin(&self, pool: &mut Pool, pool_id: &str, call: ProviderCall) -> Result<(), ProviderError> {
        let operation = call.operation();
        pool.journal.push(call);
        if let Some(fault) = pool.faults.remove(&operation) {
            return Err(fault);
        }
        if pool_id != self.pool_id {
            return Err(ProviderError::PoolNotFound(pool_id.to_owned()));
        }
        Ok(())
    }

    fn set_enabled(&self, pool_id: &str, username: &str, enabled: bool) -> Result<(), ProviderError> {
        let call = if enabled {
            ProviderCall::EnableUser(username.to_owned())
        } else {
            ProviderCall::DisableUser(username.to_owned())
        };
        let mut pool = self.state.lock();
        self.begin(&mut pool, pool_id, call)?;
        let user = pool
            .users
            .get_mut(username)
            .ok_or_else(|| ProviderError::UserNotFound(username.to_owned()))?;
        user.enabled = enabled;
        Ok(())
    }
}

fn encode_token(username: &str) -> String {
    STANDARD.encode(format!("{TOKEN_PREFIX}{username}"))
}

fn decode_token(token: &str) -> Result<String, ProviderError> {
    let invalid = || ProviderError::InvalidParameter("invalid pagination token".into());
    let bytes = STANDARD.decode(token).map_err(|_| invalid())?;
    let text = String::from_utf8(bytes).map_err(|_| invalid())?;
    text.strip_prefix(TOKEN_PREFIX).map(str::to_owned).ok_or_else(invalid)
}

fn attribute<'a>(user: &'a RemoteUser, name: &str) -> Option<&'a str> {
    user.attributes.iter().find(|a| a.name == name).map(|a| a.value.as_str())
}

fn matches(filter: &FilterExpr, user: &RemoteUser) -> bool {
    let candidate = match filter.attribute.as_str() {
        "username" => Some(user.username.as_str()),
        name => attribute(user, name),
    };
    candidate.is_some_and(|value| filter.matches(value))
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersPage, ProviderError> {
        let mut pool = self.state.lock();
        self.begin(
            &mut pool,
            &request.pool_id,
            ProviderCall::ListUsers {
                filter: request.filter.clone(),
                limit: request.limit,
                pagination_token: request.pagination_token.clone(),
            },
        )?;

        if request.limit == 0 || request.limit > self.max_page_size {
            return Err(ProviderError::InvalidParameter(format!(
                "limit must be between 1 and {}",
                self.max_page_size
            )));
        }
        let filter = request.filter.as_deref().map(FilterExpr::parse).transpose()?;
        let after = request.pagination_token.as_deref().map(decode_token).transpose()?;

        let mut candidates = pool
            .users
            .values()
            .filter(|u| after.as_deref().is_none_or(|after| u.username.as_str() > after))
            .filter(|u| filter.as_ref().is_none_or(|f| matches(f, u)));

        let users: Vec<RemoteUser> = candidates.by_ref().take(request.limit).cloned().collect();
        let more = candidates.next().is_some();
        let pagination_token = match users.last() {
            Some(last) if more => Some(encode_token(&last.username)),
            _ => None,
        };

        Ok(ListUsersPage { users, pagination_token })
    }

    async fn admin_create_user(&self, request: CreateUserRequest) -> Result<RemoteUser, ProviderError> {
        let mut pool = self.state.lock();
        self.begin(
            &mut pool,
            &request.pool_id,
            ProviderCall::CreateUser {
                username: request.username.clone(),
                attributes: request.attributes.iter().map(|a| a.name.clone()).collect(),
                with_password: request.temporary_password.is_some(),
            },
        )?;

        if request.username.trim().is_empty() {
            return Err(ProviderError::InvalidParameter("username is required".into()));
        }
        if request.temporary_password.as_ref().is_some_and(|p| p.chars().count() < MIN_PASSWORD_LEN) {
            return Err(ProviderError::InvalidParameter(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if pool.users.contains_key(&request.username) {
            return Err(ProviderError::UsernameExists(request.username));
        }

        let user = RemoteUser {
            username: request.username.clone(),
            attributes: request.attributes,
            enabled: true,
            status: Some("FORCE_CHANGE_PASSWORD".into()),
            created_at: Some(Utc::now()),
        };
        pool.users.insert(request.username, user.clone());
        Ok(user)
    }

    async fn admin_update_user_attributes(
        &self,
        pool_id: &str,
        username: &str,
        attributes: Vec<UserAttribute>,
    ) -> Result<(), ProviderError> {
        let mut pool = self.state.lock();
        self.begin(
            &mut pool,
            pool_id,
            ProviderCall::UpdateAttributes {
                username: username.to_owned(),
                attributes: attributes.clone(),
            },
        )?;

        let user = pool
            .users
            .get_mut(username)
            .ok_or_else(|| ProviderError::UserNotFound(username.to_owned()))?;
        for update in attributes {
            match user.attributes.iter_mut().find(|a| a.name == update.name) {
                Some(existing) => existing.value = update.value,
                None => user.attributes.push(update),
            }
        }
        Ok(())
    }

    async fn admin_enable_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError> {
        self.set_enabled(pool_id, username, true)
    }

    async fn admin_disable_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError> {
        self.set_enabled(pool_id, username, false)
    }

    async fn admin_delete_user(&self, pool_id: &str, username: &str) -> Result<(), ProviderError> {
        let mut pool = self.state.lock();
        self.begin(&mut pool, pool_id, ProviderCall::DeleteUser(username.to_owned()))?;
        pool.users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| ProviderError::UserNotFound(username.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const POOL: &str = "pool-1";

    fn user(username: &str, email: &str) -> RemoteUser {
        RemoteUser {
            username: username.into(),
            attributes: vec![UserAttribute::new("email", email)],
            enabled: true,
            status: Some("CONFIRMED".into()),
            created_at: None,
        }
    }

    fn list(limit: usize, filter: Option<&str>, token: Option<String>) -> ListUsersRequest {
        ListUsersRequest::builder()
            .pool_id(POOL)
            .limit(limit)
            .maybe_filter(filter)
            .maybe_pagination_token(token)
            .build()
    }

    fn names(page: &ListUsersPage) -> Vec<&str> {
        page.users.iter().map(|u| u.username.as_str()).collect()
    }

    #[tokio::test]
    async fn test_token_walk() {
        let provider = LocalIdentityProvider::new(POOL);
        for (name, email) in [("c", "c@x.io"), ("a", "a@x.io"), ("b", "b@x.io")] {
            provider.insert_user(user(name, email));
        }

        let first = provider.list_users(list(2, None, None)).await.unwrap();
        assert_eq!(names(&first), vec!["a", "b"]);
        let token = first.pagination_token.unwrap();

        let second = provider.list_users(list(2, None, Some(token))).await.unwrap();
        assert_eq!(names(&second), vec!["c"]);
        assert_eq!(second.pagination_token, None);
    }

    #[tokio::test]
    async fn test_prefix_filter() {
        let provider = LocalIdentityProvider::new(POOL);
        provider.insert_user(user("u1", "ann@x.io"));
        provider.insert_user(user("u2", "bob@x.io"));
        provider.insert_user(user("u3", "anna@y.io"));

        let page = provider.list_users(list(10, Some(r#"email ^= "ann""#), None)).await.unwrap();
        assert_eq!(names(&page), vec!["u1", "u3"]);
    }

    #[tokio::test]
    async fn test_rejects_foreign_tokens_and_limits() {
        let provider = LocalIdentityProvider::with_max_page_size(POOL, 5);
        for request in [
            list(10, None, None),
            list(0, None, None),
            list(2, None, Some("not a token".into())),
            list(2, Some("email ~ x"), None),
        ] {
            assert!(matches!(
                provider.list_users(request).await,
                Err(ProviderError::InvalidParameter(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_wrong_pool() {
        let provider = LocalIdentityProvider::new(POOL);
        let result = provider.admin_delete_user("other-pool", "a").await;
        assert!(matches!(result, Err(ProviderError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn test_faults_are_one_shot_and_journalled() {
        let provider = LocalIdentityProvider::new(POOL);
        provider.insert_user(user("a", "a@x.io"));
        provider.fail_next(Operation::DisableUser, ProviderError::Timeout);

        assert!(matches!(provider.admin_disable_user(POOL, "a").await, Err(ProviderError::Timeout)));
        assert!(provider.user("a").unwrap().enabled);
        provider.admin_disable_user(POOL, "a").await.unwrap();
        assert!(!provider.user("a").unwrap().enabled);

        assert_eq!(
            provider.calls(),
            vec![ProviderCall::DisableUser("a".into()), ProviderCall::DisableUser("a".into())]
        );
    }

    #[tokio::test]
    async fn test_create_rules() {
        let provider = LocalIdentityProvider::new(POOL);
        let request = |password: Option<&str>| CreateUserRequest {
            pool_id: POOL.into(),
            username: "a@x.io".into(),
            attributes: vec![UserAttribute::new("email", "a@x.io")],
            temporary_password: password.map(|p| p.to_owned().into()),
        };

        assert!(matches!(
            provider.admin_create_user(request(Some("short"))).await,
            Err(ProviderError::InvalidParameter(_))
        ));
        let created = provider.admin_create_user(request(Some("long-enough"))).await.unwrap();
        assert_eq!(created.status.as_deref(), Some("FORCE_CHANGE_PASSWORD"));
        assert!(matches!(
            provider.admin_create_user(request(None)).await,
            Err(ProviderError::UsernameExists(_))
        ));
    }
}
