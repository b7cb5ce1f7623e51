//! Directory user model and the adapter's inputs and outputs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    error::{DirectoryError, DirectoryResult, StepOutcome},
    provider::RemoteUser,
};

/// Account status as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    /// Created but not yet confirmed.
    Unconfirmed,
    /// Confirmed and usable.
    Confirmed,
    /// Archived by an administrator.
    Archived,
    /// Credentials are known to be compromised.
    Compromised,
    /// The user must reset their password before signing in.
    ResetRequired,
    /// The user must replace a temporary password at first sign-in.
    ForceChangePassword,
    /// Federated from an external identity provider.
    ExternalProvider,
    /// Absent or unrecognised status.
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    /// Parses a vendor status string; anything unrecognised is
    /// [`UserStatus::Unknown`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "UNCONFIRMED" => Self::Unconfirmed,
            "CONFIRMED" => Self::Confirmed,
            "ARCHIVED" => Self::Archived,
            "COMPROMISED" => Self::Compromised,
            "RESET_REQUIRED" => Self::ResetRequired,
            "FORCE_CHANGE_PASSWORD" => Self::ForceChangePassword,
            "EXTERNAL_PROVIDER" => Self::ExternalProvider,
            _ => Self::Unknown,
        }
    }

    /// The vendor spelling of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfirmed => "UNCONFIRMED",
            Self::Confirmed => "CONFIRMED",
            Self::Archived => "ARCHIVED",
            Self::Compromised => "COMPROMISED",
            Self::ResetRequired => "RESET_REQUIRED",
            Self::ForceChangePassword => "FORCE_CHANGE_PASSWORD",
            Self::ExternalProvider => "EXTERNAL_PROVIDER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user of the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    /// Username.
    pub id: String,
    /// Email address; empty when the provider has none.
    pub email: String,
    /// Display name, if set and not blank.
    pub name: Option<String>,
    /// Whether the user may sign in.
    pub enabled: bool,
    /// Account status.
    pub status: UserStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl DirectoryUser {
    /// Maps a provider user. Attribute names are matched
    /// case-insensitively and missing attributes degrade instead of
    /// failing; `now` stands in for a missing creation time.
    #[must_use]
    pub fn from_remote(user: &RemoteUser, now: DateTime<Utc>) -> Self {
        let attribute = |name: &str| {
            user.attributes
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(name))
                .map(|a| a.value.as_str())
        };

        Self {
            id: user.username.clone(),
            email: attribute("email").unwrap_or_default().to_owned(),
            name: attribute("name").filter(|n| !n.trim().is_empty()).map(str::to_owned),
            enabled: user.enabled,
            status: user.status.as_deref().map_or(UserStatus::Unknown, UserStatus::parse),
            created_at: user.created_at.unwrap_or(now),
        }
    }
}

/// Input for creating a user.
///
/// The temporary password is wiped from memory when the value is dropped
/// and never appears in `Debug` output.
#[derive(Clone, bon::Builder)]
pub struct NewUser {
    /// Email address, also used as the username.
    #[builder(into)]
    pub email: String,
    /// Optional display name.
    #[builder(into)]
    pub name: Option<String>,
    /// Optional temporary password.
    #[builder(into)]
    pub temporary_password: Option<Zeroizing<String>>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("temporary_password", &self.temporary_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Input for updating a user. Absent fields are left alone.
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct UserUpdate {
    /// New display name; blank counts as absent.
    #[builder(into)]
    pub name: Option<String>,
    /// Enable (`true`) or disable (`false`) sign-in.
    pub enabled: Option<bool>,
}

/// Outcomes of the two steps of an applied user update.
///
/// Returned only when every requested step applied; a step the caller did
/// not ask for is [`StepOutcome::NotRequested`]. Any other outcome turns
/// the update into [`DirectoryError::PartialUpdate`].
#[derive(Debug)]
pub struct UpdateReport {
    /// Display-name change.
    pub name: StepOutcome,
    /// Enable/disable transition.
    pub enabled: StepOutcome,
}

impl UpdateReport {
    /// Returns `true` if every requested step applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.is_ok() && self.enabled.is_ok()
    }

    /// Keeps a complete report, or fails with both outcomes.
    pub(crate) fn into_result(self) -> DirectoryResult<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(DirectoryError::PartialUpdate { name: self.name, enabled: self.enabled })
        }
    }
}
