//! Per-request context and the cancellation/timeout guard.
//!
//! The HTTP layer builds one [`RequestContext`] per call. It carries the
//! tenant every operation is scoped to, the actor and clock reading used
//! for audit stamps, and a [`CancellationToken`] the caller can trip to
//! abandon the request.

use std::{future::Future, time::Duration};

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::{
    error::StoreError,
    types::{ActorId, TenantId},
};

/// Why a guarded operation stopped before producing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    /// The request's cancellation token fired.
    Cancelled,
    /// The operation outlived its timeout.
    TimedOut,
}

impl From<Interrupted> for StoreError {
    fn from(reason: Interrupted) -> Self {
        match reason {
            Interrupted::Cancelled => StoreError::cancelled(),
            Interrupted::TimedOut => StoreError::timeout(),
        }
    }
}

/// Inputs supplied by the caller for a single request.
///
/// ```
/// use stockroom_store::RequestContext;
///
/// let ctx = RequestContext::builder().tenant("t1").actor("alice").build();
/// assert_eq!(ctx.tenant().as_str(), "t1");
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct RequestContext {
    #[builder(into)]
    tenant: TenantId,
    #[builder(into)]
    actor: ActorId,
    #[builder(default = Utc::now())]
    now: DateTime<Utc>,
    #[builder(default)]
    cancellation: CancellationToken,
}

impl RequestContext {
    /// The tenant this request is scoped to.
    #[must_use]
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    /// The user performing the request.
    #[must_use]
    pub fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// The request's clock reading, used for every stamp it writes.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The token that cancels this request.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Returns `true` once the request has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Fails fast with [`Interrupted::Cancelled`] if the request is already
    /// cancelled.
    pub fn check<E: From<Interrupted>>(&self) -> Result<(), E> {
        if self.is_cancelled() { Err(Interrupted::Cancelled.into()) } else { Ok(()) }
    }

    /// Runs `operation` unless the request is cancelled first or
    /// `timeout` elapses.
    ///
    /// A single backend call is either awaited to completion or dropped
    /// before it resolves; it is never observed half-done.
    pub async fn run<T, E, F>(&self, timeout: Duration, operation: F) -> Result<T, E>
    where
        E: From<Interrupted>,
        F: Future<Output = Result<T, E>>,
    {
        self.check::<E>()?;

        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => {
                tracing::debug!("request cancelled");
                Err(Interrupted::Cancelled.into())
            }
            result = tokio::time::timeout(timeout, operation) => match result {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(timeout = ?timeout, "request timed out");
                    Err(Interrupted::TimedOut.into())
                },
            },
        }
    }
}
