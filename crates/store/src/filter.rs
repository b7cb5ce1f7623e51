//! Keyword matching shared by every product backend.

use crate::product::Product;

/// Case-insensitive substring filter over a product's name and SKU.
///
/// A blank keyword matches everything.
///
/// ```
/// use stockroom_store::KeywordFilter;
///
/// let filter = KeywordFilter::new(Some("app"));
/// assert!(filter.matches_text("Green Apple"));
/// assert!(!filter.matches_text("Pear"));
/// assert!(KeywordFilter::new(Some("  ")).is_match_all());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordFilter {
    needle: Option<String>,
}

impl KeywordFilter {
    /// Builds a filter from an optional caller keyword.
    #[must_use]
    pub fn new(keyword: Option<&str>) -> Self {
        let needle = keyword.filter(|k| !k.trim().is_empty()).map(str::to_lowercase);
        Self { needle }
    }

    /// Returns `true` when the filter accepts every product.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.needle.is_none()
    }

    /// Tests a single piece of text against the keyword.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Tests a product: matches when either its name or SKU contains the keyword.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_text(&product.name) || self.matches_text(&product.sku)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, "anything", true)]
    #[case(Some(""), "anything", true)]
    #[case(Some("APPLE"), "green apple", true)]
    #[case(Some("apple"), "APPLE-42", true)]
    #[case(Some("apple"), "pear", false)]
    #[case(Some(" apple"), "apple", false)]
    #[case(Some("Ä"), "bär", true)]
    fn test_matches_text(#[case] keyword: Option<&str>, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(KeywordFilter::new(keyword).matches_text(text), expected);
    }
}
