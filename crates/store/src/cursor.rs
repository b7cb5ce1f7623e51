//! Opaque continuation cursors.
//!
//! Each backend has its own native notion of "where to resume": the
//! in-memory store uses an offset into its sorted result set, the
//! key-value store resumes after the composite key of the last item it
//! returned, and the identity directory hands out its own pagination
//! token. [`Cursor`] is the tagged union over those positions and owns
//! the wire format callers see.
//!
//! # Wire format
//!
//! Offset and key positions are serialised as compact JSON and encoded
//! with unpadded base64url, so tokens are safe in a URL query parameter
//! without further escaping. Opaque tokens are passed through verbatim.
//! Callers must treat every token as opaque.
//!
//! # Decoding
//!
//! Decoding never fails. An absent, blank, oversized or corrupted token
//! yields `None`, which every backend interprets as "start from the first
//! page". Each position type rejects the other's payload shape, so a
//! token issued by one backend restarts pagination on another instead of
//! being misread.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Upper bound on accepted token length, checked before decoding.
pub const MAX_CURSOR_TOKEN_LEN: usize = 4096;

/// Resume position for the in-memory store: index into the sorted,
/// filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffsetCursor {
    /// Number of matching records already returned.
    pub offset: usize,
}

/// Resume position for the key-value store: the composite primary key of
/// the last item the native query evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyCursor {
    /// Partition key (tenant partition).
    #[serde(rename = "PK")]
    pub pk: String,
    /// Sort key (record kind plus id).
    #[serde(rename = "SK")]
    pub sk: String,
}

/// A vendor-issued pagination token, carried without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OpaqueToken(String);

/// Continuation position, tagged by the backend that issued it.
///
/// ```
/// use stockroom_store::cursor::{Cursor, OffsetCursor};
///
/// let token = Cursor::Offset(OffsetCursor { offset: 20 }).encode().unwrap();
/// assert_eq!(OffsetCursor::decode(Some(&token)), Some(OffsetCursor { offset: 20 }));
/// assert_eq!(OffsetCursor::decode(Some("not a cursor")), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// In-memory store offset.
    Offset(OffsetCursor),
    /// Key-value store continuation key.
    Key(KeyCursor),
    /// Identity directory token.
    Opaque(OpaqueToken),
}

impl Cursor {
    /// Encodes this position as an opaque, URL-safe token.
    ///
    /// Encoding is deterministic: the same position always yields the
    /// same token. Returns `None` if the position cannot be serialised, in
    /// which case the page ends instead of handing out an unusable token.
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        match self {
            Self::Offset(position) => encode_payload(position),
            Self::Key(position) => encode_payload(position),
            Self::Opaque(token) => Some(token.0.clone()),
        }
    }
}

impl From<OffsetCursor> for Cursor {
    fn from(position: OffsetCursor) -> Self {
        Self::Offset(position)
    }
}

impl From<KeyCursor> for Cursor {
    fn from(position: KeyCursor) -> Self {
        Self::Key(position)
    }
}

impl From<OpaqueToken> for Cursor {
    fn from(token: OpaqueToken) -> Self {
        Self::Opaque(token)
    }
}

impl OffsetCursor {
    /// Decodes an offset token, returning `None` for anything that is not
    /// a well-formed offset cursor.
    #[must_use]
    pub fn decode(token: Option<&str>) -> Option<Self> {
        decode_payload(token)
    }

    /// Encodes this offset as a token.
    #[must_use]
    pub fn encode(self) -> Option<String> {
        Cursor::Offset(self).encode()
    }
}

impl KeyCursor {
    /// Decodes a key-continuation token, returning `None` for anything
    /// that is not a well-formed key cursor.
    #[must_use]
    pub fn decode(token: Option<&str>) -> Option<Self> {
        decode_payload(token)
    }

    /// Encodes this key as a token.
    #[must_use]
    pub fn encode(&self) -> Option<String> {
        encode_payload(self)
    }
}

impl OpaqueToken {
    /// Wraps a vendor token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Accepts a caller cursor as a vendor token. Only absent or blank
    /// input maps to `None`; everything else is the vendor's to judge.
    #[must_use]
    pub fn from_cursor(token: Option<&str>) -> Option<Self> {
        token.filter(|t| !t.trim().is_empty()).map(Self::new)
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn encode_payload<P: Serialize>(position: &P) -> Option<String> {
    match serde_json::to_vec(position) {
        Ok(json) => Some(URL_SAFE_NO_PAD.encode(json)),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode cursor, ending pagination");
            None
        },
    }
}

fn decode_payload<P: DeserializeOwned>(token: Option<&str>) -> Option<P> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }

    if token.len() > MAX_CURSOR_TOKEN_LEN {
        tracing::debug!(len = token.len(), "cursor token too long, restarting pagination");
        return None;
    }

    let bytes = match URL_SAFE_NO_PAD.decode(token) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "cursor token is not base64url, restarting pagination");
            return None;
        },
    };

    match serde_json::from_slice(&bytes) {
        Ok(position) => Some(position),
        Err(e) => {
            tracing::debug!(error = %e, "cursor payload has the wrong shape, restarting pagination");
            None
        },
    }
}
