//! Common types shared by every backend and by the service layer.

use serde::{Deserialize, Serialize};

/// Smallest page size any operation will use.
pub const MIN_PAGE_LIMIT: usize = 1;

/// Largest page size any operation will use.
pub const MAX_PAGE_LIMIT: usize = 200;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Clamps a caller-supplied limit into `[MIN_PAGE_LIMIT, MAX_PAGE_LIMIT]`.
///
/// Accepts a signed value because limits arrive straight from query
/// strings, where zero and negative numbers are possible.
///
/// ```
/// use stockroom_store::clamp_limit;
///
/// assert_eq!(clamp_limit(-5), 1);
/// assert_eq!(clamp_limit(25), 25);
/// assert_eq!(clamp_limit(10_000), 200);
/// ```
#[must_use]
pub fn clamp_limit(limit: i64) -> usize {
    let clamped = limit.clamp(MIN_PAGE_LIMIT as i64, MAX_PAGE_LIMIT as i64);
    usize::try_from(clamped).unwrap_or(MIN_PAGE_LIMIT)
}

/// Macro to define a newtype wrapper around `String` with standard trait
/// implementations.
///
/// Each generated type:
/// - Derives `Clone`, `Debug`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Serializes transparently as the inner string
/// - Implements `From<&str>` and `From<String>`
/// - Implements `Display` and `AsRef<str>`
macro_rules! define_string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_string_id!(
    /// Tenant (organization) that owns a partition of records.
    ///
    /// Every store operation is scoped to exactly one tenant; passing an
    /// [`ActorId`] where a `TenantId` is expected is a compile-time error.
    ///
    /// ```
    /// use stockroom_store::TenantId;
    ///
    /// let tenant = TenantId::from("demo-org");
    /// assert_eq!(tenant.to_string(), "demo-org");
    /// ```
    TenantId
);

define_string_id!(
    /// Identifier of a record, unique within its tenant.
    ///
    /// Assigned once at creation and never changed.
    RecordId
);

define_string_id!(
    /// Identifier of the user performing an operation, used for audit stamps.
    ActorId
);

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(i64::MIN, 1)]
    #[case(-1, 1)]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(50, 50)]
    #[case(200, 200)]
    #[case(201, 200)]
    #[case(i64::MAX, 200)]
    fn test_clamp_limit(#[case] requested: i64, #[case] expected: usize) {
        assert_eq!(clamp_limit(requested), expected);
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let id = RecordId::from("abc123");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"abc123\""));
    }

    #[test]
    fn test_ids_order_by_inner_string() {
        let mut ids = vec![RecordId::from("b"), RecordId::from("a"), RecordId::from("c")];
        ids.sort();
        let raw: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        assert_eq!(raw, vec!["a", "b", "c"]);
    }
}
