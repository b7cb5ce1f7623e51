//! The provider's user filter syntax.
//!
//! A filter is a single comparison, `attribute op "value"`, where `op` is
//! `=` (exact) or `^=` (prefix). Inside the quotes a backslash escapes the
//! next character.

use crate::error::ProviderError;

/// Translates a search keyword into an email prefix filter.
///
/// Blank keywords produce no filter. The keyword is otherwise used as
/// typed, with quotes and backslashes escaped so it cannot end the quoted
/// value early.
///
/// ```
/// use stockroom_directory::filter::email_prefix_filter;
///
/// assert_eq!(email_prefix_filter(Some("ann")).as_deref(), Some(r#"email ^= "ann""#));
/// assert_eq!(email_prefix_filter(Some(r#"a"b"#)).as_deref(), Some(r#"email ^= "a\"b""#));
/// assert_eq!(email_prefix_filter(Some("  ")), None);
/// ```
#[must_use]
pub fn email_prefix_filter(keyword: Option<&str>) -> Option<String> {
    let keyword = keyword.filter(|k| !k.trim().is_empty())?;
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Some(format!("email ^= \"{escaped}\""))
}

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=`
    Equals,
    /// `^=`
    StartsWith,
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    /// Attribute compared.
    pub attribute: String,
    /// Comparison.
    pub op: FilterOp,
    /// Unescaped comparison value.
    pub value: String,
}

impl FilterExpr {
    /// Parses a filter expression.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidParameter`] for anything that is not
    /// a single well-formed comparison.
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let invalid = || ProviderError::InvalidParameter(format!("invalid filter: {raw}"));

        let trimmed = raw.trim();
        let split = trimmed.find(|c: char| c.is_whitespace() || c == '=' || c == '^').ok_or_else(invalid)?;
        let (attribute, rest) = trimmed.split_at(split);
        if attribute.is_empty() {
            return Err(invalid());
        }

        let rest = rest.trim_start();
        let (op, rest) = if let Some(rest) = rest.strip_prefix("^=") {
            (FilterOp::StartsWith, rest)
        } else if let Some(rest) = rest.strip_prefix('=') {
            (FilterOp::Equals, rest)
        } else {
            return Err(invalid());
        };

        let quoted = rest.trim().strip_prefix('"').ok_or_else(invalid)?;
        let mut value = String::with_capacity(quoted.len());
        let mut chars = quoted.chars();
        loop {
            match chars.next() {
                Some('\\') => value.push(chars.next().ok_or_else(invalid)?),
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(invalid()),
            }
        }
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { attribute: attribute.to_owned(), op, value })
    }

    /// Tests an attribute value against this filter.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self.op {
            FilterOp::Equals => candidate == self.value,
            FilterOp::StartsWith => candidate.starts_with(&self.value),
        }
    }
}
