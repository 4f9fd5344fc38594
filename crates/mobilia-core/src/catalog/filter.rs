//! Build a database filter from extracted search criteria.

use mobilia_types::search::{ProductFilter, SearchCriteria};

/// Convert criteria into a [`ProductFilter`], dropping absent fields and
/// `"any"` sentinel values. An empty criteria object yields an empty filter
/// (matches all active products).
pub fn build_filter(criteria: &SearchCriteria) -> ProductFilter {
    let collect = |field: &Option<mobilia_types::search::OneOrMany>| -> Vec<String> {
        field
            .as_ref()
            .map(|v| v.values().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    };

    ProductFilter {
        type_terms: collect(&criteria.product_type),
        category_terms: collect(&criteria.category),
        colors: collect(&criteria.color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilia_types::search::OneOrMany;

    #[test]
    fn absent_fields_yield_empty_filter() {
        let filter = build_filter(&SearchCriteria::default());
        assert!(filter.is_empty());
    }

    #[test]
    fn any_sentinel_is_skipped() {
        let criteria = SearchCriteria {
            product_search: true,
            color: Some(OneOrMany::One("any color".to_string())),
            category: Some(OneOrMany::One("Chairs".to_string())),
            ..Default::default()
        };
        let filter = build_filter(&criteria);
        assert!(filter.colors.is_empty());
        assert_eq!(filter.category_terms, vec!["Chairs".to_string()]);
    }

    #[test]
    fn multiple_colors_are_kept_in_order() {
        let criteria = SearchCriteria {
            product_search: true,
            color: Some(OneOrMany::Many(vec![
                "Red".to_string(),
                "any".to_string(),
                "Blue".to_string(),
            ])),
            ..Default::default()
        };
        let filter = build_filter(&criteria);
        assert_eq!(filter.colors, vec!["Red".to_string(), "Blue".to_string()]);
    }

    #[test]
    fn type_terms_come_from_type_field() {
        let criteria = SearchCriteria {
            product_search: true,
            product_type: Some(OneOrMany::One("armchair".to_string())),
            ..Default::default()
        };
        assert_eq!(build_filter(&criteria).type_terms, vec!["armchair".to_string()]);
    }
}
