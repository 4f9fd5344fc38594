//! Search criteria and similarity-search types.

use serde::{Deserialize, Serialize};

use crate::catalog::ProductCard;

/// A criteria field the model may return as a single value or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Non-empty, non-sentinel values, in the order the model produced them.
    ///
    /// The model is told to answer `"any"` (or `"any color"`) when the user
    /// did not constrain a field; those answers constrain nothing.
    pub fn values(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            OneOrMany::One(v) => vec![v.as_str()],
            OneOrMany::Many(vs) => vs.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty() && !is_any_sentinel(v))
            .collect()
    }
}

fn is_any_sentinel(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower == "any" || lower == "any color" || lower == "any colour"
}

/// Structured filter criteria extracted from the model's JSON output.
///
/// Best-effort shape: every field except `product_search` is optional and
/// values are not guaranteed to match the catalog vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub product_search: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<OneOrMany>,
}

/// Outcome of parsing the model's structured output.
///
/// Downstream logic handles both variants; `Unparsable` degrades to a
/// general reply carrying the raw text.
#[derive(Debug, Clone)]
pub enum CriteriaParse {
    Parsed(SearchCriteria),
    Unparsable(String),
}

/// Database filter derived from [`SearchCriteria`].
///
/// Every list is already cleaned: no empty strings, no `"any"` sentinels.
/// An empty filter matches all active products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Substring terms matched against name/description/short_description.
    pub type_terms: Vec<String>,
    /// Substring terms matched against category name/slug.
    pub category_terms: Vec<String>,
    /// OR-combined membership terms against available color names.
    pub colors: Vec<String>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.type_terms.is_empty() && self.category_terms.is_empty() && self.colors.is_empty()
    }
}

/// A product ranked against a query image.
#[derive(Debug, Clone, Serialize)]
pub struct RankedProduct {
    #[serde(flatten)]
    pub product: ProductCard,
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_or_many_deserializes_both_shapes() {
        let one: OneOrMany = serde_json::from_str("\"Red\"").unwrap();
        assert_eq!(one.values(), vec!["Red"]);

        let many: OneOrMany = serde_json::from_str(r#"["Red", "Blue"]"#).unwrap();
        assert_eq!(many.values(), vec!["Red", "Blue"]);
    }

    #[test]
    fn values_drops_any_sentinel_case_insensitively() {
        let v: OneOrMany = serde_json::from_str(r#"["Any", "ANY COLOR", "Red", "  "]"#).unwrap();
        assert_eq!(v.values(), vec!["Red"]);
    }

    #[test]
    fn criteria_tolerates_missing_fields() {
        let c: SearchCriteria =
            serde_json::from_str(r#"{"product_search": true, "category": "Chairs"}"#).unwrap();
        assert!(c.product_search);
        assert!(c.product_type.is_none());
        assert_eq!(c.category.unwrap().values(), vec!["Chairs"]);
    }

    #[test]
    fn criteria_reads_type_field_name() {
        let c: SearchCriteria =
            serde_json::from_str(r#"{"product_search": true, "type": "armchair"}"#).unwrap();
        assert_eq!(c.product_type.unwrap().values(), vec!["armchair"]);
    }

    #[test]
    fn empty_filter_reports_empty() {
        assert!(ProductFilter::default().is_empty());
        let f = ProductFilter { colors: vec!["Red".into()], ..Default::default() };
        assert!(!f.is_empty());
    }
}
