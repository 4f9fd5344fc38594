//! Intent classification result.

/// Whether the user's message expresses product-search intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    ProductSearch,
    General,
}

impl Intent {
    /// Interpret the classifier's one-word answer.
    ///
    /// The prompt asks for exactly "product" or "general", but models pad;
    /// any answer mentioning "product" counts as product-search intent.
    pub fn from_classifier_output(output: &str) -> Self {
        if output.to_lowercase().contains("product") {
            Intent::ProductSearch
        } else {
            Intent::General
        }
    }
}
