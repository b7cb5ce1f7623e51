//! Paged reads: the request every paginated operation takes and the
//! result it returns.

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_PAGE_LIMIT, clamp_limit};

/// One page of results plus the token for the next page.
///
/// `next_cursor` is `None` when there are no further pages. Serialises as
/// `{"items": [...], "nextCursor": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    /// Items on this page, in backend order.
    pub items: Vec<T>,
    /// Opaque continuation token, absent on the last page.
    pub next_cursor: Option<String>,
}

impl<T> PagedResult<T> {
    /// Creates a page. A blank cursor ends the walk like an absent one.
    #[must_use]
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor: next_cursor.filter(|c| !c.trim().is_empty()) }
    }

    /// An empty final page.
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new(), next_cursor: None }
    }

    /// Returns `true` when a further page may exist.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Transforms the items, keeping the cursor.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult { items: self.items.into_iter().map(f).collect(), next_cursor: self.next_cursor }
    }

    /// Splits the page into its items and cursor.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<String>) {
        (self.items, self.next_cursor)
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Parameters of a paginated read, normalised on construction.
///
/// Blank keywords and cursors become `None`; the limit is clamped into
/// `[1, 200]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    keyword: Option<String>,
    limit: usize,
    cursor: Option<String>,
}

impl PageRequest {
    /// Builds a request from raw caller input.
    #[must_use]
    pub fn new(keyword: Option<&str>, limit: i64, cursor: Option<&str>) -> Self {
        Self {
            keyword: non_blank(keyword),
            limit: clamp_limit(limit),
            cursor: non_blank(cursor),
        }
    }

    /// The first page with the default limit and no keyword.
    #[must_use]
    pub fn first() -> Self {
        Self { keyword: None, limit: DEFAULT_PAGE_LIMIT, cursor: None }
    }

    /// Returns the same request resuming from `cursor`.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<&str>) -> Self {
        self.cursor = non_blank(cursor);
        self
    }

    /// The keyword, if any.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// The clamped page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The continuation token, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_normalisation() {
        let request = PageRequest::new(Some("  "), 0, Some(""));
        assert_eq!(request.keyword(), None);
        assert_eq!(request.cursor(), None);
        assert_eq!(request.limit(), 1);

        let request = PageRequest::new(Some("apple"), 500, Some("abc"));
        assert_eq!(request.keyword(), Some("apple"));
        assert_eq!(request.cursor(), Some("abc"));
        assert_eq!(request.limit(), 200);
    }

    #[test]
    fn test_with_cursor_keeps_the_rest() {
        let request = PageRequest::new(Some("apple"), 2, None).with_cursor(Some("next"));
        assert_eq!(request.keyword(), Some("apple"));
        assert_eq!(request.limit(), 2);
        assert_eq!(request.cursor(), Some("next"));
    }

    #[test]
    fn test_blank_cursor_ends_the_walk() {
        let page = PagedResult::new(vec![1], Some(String::new()));
        assert_eq!(page.next_cursor, None);
        assert!(!page.has_more());
    }

    #[test]
    fn test_paged_result_wire_shape() {
        let page = PagedResult::new(vec![1, 2], Some("tok".to_owned()));
        let json = serde_json::to_string(&page).unwrap();
        assert_eq!(json, r#"{"items":[1,2],"nextCursor":"tok"}"#);

        let last: PagedResult<i32> = PagedResult::empty();
        assert_eq!(serde_json::to_string(&last).unwrap(), r#"{"items":[],"nextCursor":null}"#);
        assert!(!last.has_more());
    }

    #[test]
    fn test_map_keeps_cursor() {
        let page = PagedResult::new(vec![1, 2], Some("tok".to_owned())).map(|n| n * 10);
        let (items, cursor) = page.into_parts();
        assert_eq!(items, vec![10, 20]);
        assert_eq!(cursor.as_deref(), Some("tok"));
    }
}
