//! The directory adapter.
//!
//! [`DirectoryAdapter`] exposes the users of a hosted identity pool
//! through the same paging contract as the product store. It keeps no
//! state of its own: every call is translated into provider calls.
//!
//! # Pagination
//!
//! The caller's limit is clamped into `[1, 200]` and then to the
//! provider's page limit. The cursor is the provider's own pagination
//! token, passed through and returned verbatim; the adapter never looks
//! inside it. A token the provider refuses surfaces as
//! [`DirectoryError::Rejected`].
//!
//! # Updates
//!
//! A user update is two independent provider calls: the display-name
//! change, then the enable or disable transition. Both are attempted and
//! neither is rolled back when the other fails. If either requested step
//! does not apply the update fails with [`DirectoryError::PartialUpdate`],
//! which carries the outcome of each step.

use std::{future::Future, sync::Arc};

use fail::fail_point;
use stockroom_store::{OpaqueToken, PageRequest, PagedResult, RequestContext};

use crate::{
    config::DirectoryConfig,
    error::{DirectoryError, DirectoryResult, ProviderError, StepOutcome},
    filter::email_prefix_filter,
    provider::{CreateUserRequest, IdentityProvider, ListUsersRequest, UserAttribute},
    user::{DirectoryUser, NewUser, UpdateReport, UserUpdate},
};

/// Identity directory exposed through the paging contract.
#[derive(Debug, Clone)]
pub struct DirectoryAdapter {
    provider: Arc<dyn IdentityProvider>,
    config: DirectoryConfig,
}

impl DirectoryAdapter {
    /// Creates an adapter over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, config: DirectoryConfig) -> Self {
        Self { provider, config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    fn pool(&self) -> &str {
        self.config.user_pool_id()
    }

    /// Runs one provider call under the request guard.
    async fn call<T>(
        &self,
        ctx: &RequestContext,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> DirectoryResult<T> {
        ctx.run(self.config.operation_timeout(), async { call.await.map_err(DirectoryError::from) })
            .await
    }

    /// Runs one update step, turning its result into an outcome.
    async fn step(
        &self,
        ctx: &RequestContext,
        step: &'static str,
        call: impl Future<Output = Result<(), ProviderError>>,
    ) -> StepOutcome {
        match self.call(ctx, call).await {
            Ok(()) => StepOutcome::Applied,
            Err(DirectoryError::Cancelled) => {
                tracing::warn!(step, "update step skipped, request cancelled");
                StepOutcome::Cancelled
            },
            Err(e) => {
                tracing::warn!(step, error = %e, "update step failed");
                StepOutcome::Failed(Box::new(e))
            },
        }
    }

    async fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), ProviderError> {
        fail_point!("directory-before-enable-step", |_| {
            Err(ProviderError::Service("injected failure before enable step".into()))
        });
        if enabled {
            self.provider.admin_enable_user(self.pool(), id).await
        } else {
            self.provider.admin_disable_user(self.pool(), id).await
        }
    }

    /// Lists one page of users whose email starts with `keyword`.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Rejected`] if the provider refuses the cursor
    /// - Any mapped provider error, [`DirectoryError::Timeout`] or
    ///   [`DirectoryError::Cancelled`]
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), limit = tracing::field::Empty))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        keyword: Option<&str>,
        limit: i64,
        cursor: Option<&str>,
    ) -> DirectoryResult<PagedResult<DirectoryUser>> {
        let page = PageRequest::new(keyword, limit, cursor);
        let limit = page.limit().min(self.config.provider_page_limit());
        tracing::Span::current().record("limit", limit);

        let request = ListUsersRequest::builder()
            .pool_id(self.pool())
            .maybe_filter(email_prefix_filter(page.keyword()))
            .limit(limit)
            .maybe_pagination_token(OpaqueToken::from_cursor(page.cursor()).map(OpaqueToken::into_inner))
            .build();

        let response = self.call(ctx, self.provider.list_users(request)).await?;
        let now = ctx.now();
        let users = response.users.iter().map(|u| DirectoryUser::from_remote(u, now)).collect();
        let next_cursor = response.pagination_token.filter(|t| !t.trim().is_empty());
        Ok(PagedResult::new(users, next_cursor))
    }

    /// Creates a user and returns its id.
    ///
    /// The email is the username. A blank name or temporary password is
    /// left out of the request.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Validation`] if the email is blank
    /// - [`DirectoryError::AlreadyExists`] if the username is taken
    /// - Any other mapped provider error or guard interruption
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant()))]
    pub async fn create(&self, ctx: &RequestContext, input: NewUser) -> DirectoryResult<String> {
        let email = input.email.trim();
        if email.is_empty() {
            return Err(DirectoryError::validation("email", "is required"));
        }

        let mut attributes = vec![UserAttribute::new("email", email)];
        if let Some(name) = input.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            attributes.push(UserAttribute::new("name", name));
        }
        let request = CreateUserRequest {
            pool_id: self.pool().to_owned(),
            username: email.to_owned(),
            attributes,
            temporary_password: input.temporary_password.filter(|p| !p.trim().is_empty()),
        };

        let created = self.call(ctx, self.provider.admin_create_user(request)).await?;
        if created.username.trim().is_empty() {
            Ok(email.to_owned())
        } else {
            Ok(created.username)
        }
    }

    /// Applies the requested name change and enable/disable transition.
    ///
    /// Both steps are attempted even if the first fails, and an applied
    /// step is never rolled back.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Validation`] if the id is blank
    /// - [`DirectoryError::Cancelled`] if the request is already cancelled
    /// - [`DirectoryError::PartialUpdate`] if any requested step failed or
    ///   was cancelled; the outcome of each step is inside
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), id = %id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: UserUpdate,
    ) -> DirectoryResult<UpdateReport> {
        if id.trim().is_empty() {
            return Err(DirectoryError::validation("id", "is required"));
        }
        ctx.check::<DirectoryError>()?;

        let name = match input.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => {
                let attributes = vec![UserAttribute::new("name", name)];
                self.step(
                    ctx,
                    "name",
                    self.provider.admin_update_user_attributes(self.pool(), id, attributes),
                )
                .await
            },
            None => StepOutcome::NotRequested,
        };

        let enabled = match input.enabled {
            Some(enabled) => self.step(ctx, "enabled", self.set_enabled(id, enabled)).await,
            None => StepOutcome::NotRequested,
        };

        UpdateReport { name, enabled }.into_result()
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Validation`] if the id is blank
    /// - [`DirectoryError::NotFound`] if the user does not exist
    /// - Any other mapped provider error or guard interruption
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant(), id = %id))]
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> DirectoryResult<()> {
        if id.trim().is_empty() {
            return Err(DirectoryError::validation("id", "is required"));
        }
        self.call(ctx, self.provider.admin_delete_user(self.pool(), id)).await
    }
}
