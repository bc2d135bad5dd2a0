// ============================================================
// Layer 3 — Category Set
// ============================================================
// The fixed, ordered list of product categories the classifier
// predicts over, with a bijective name ↔ index mapping.
//
// The index of a category is its position in the construction
// order, so the mapping is dense over [0, N). The set is created
// once when the classifier is built and never mutated afterwards —
// the classification head of the model is sized to N at
// construction, so growing the set would invalidate the weights.

use std::collections::HashMap;

/// Ordered, immutable set of product category names.
///
/// `index(name)` and `name(index)` are mutual inverses for every
/// category in the set.
#[derive(Debug, Clone)]
pub struct CategorySet {
    names: Vec<String>,
    index_by_name: HashMap<String, usize>,
}

impl CategorySet {
    /// Build a category set from an ordered list of names.
    ///
    /// Duplicate names would break the bijection invariant, so they
    /// are rejected with a panic — the category list is static
    /// configuration, not user input.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index_by_name = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let previous = index_by_name.insert(name.clone(), idx);
            assert!(previous.is_none(), "duplicate category name: '{name}'");
        }
        Self { names, index_by_name }
    }

    /// The stock catalogue of office products handled by support.
    pub fn products() -> Self {
        Self::new([
            "Printer", "Scanner", "Laptop", "Monitor", "Keyboard",
            "Mouse", "Projector", "Fax machine", "Calculator", "Shredder",
            "Photocopier", "Whiteboard", "Paper shredder", "Desk lamp",
            "External hard drive", "Conference phone", "Label maker",
            "Document camera", "Wireless presenter", "USB hub",
        ])
    }

    /// Number of categories (N).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up the dense index of a category name.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Look up the name for a category index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Iterate over names in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_has_twenty_categories() {
        assert_eq!(CategorySet::products().len(), 20);
    }

    #[test]
    fn test_name_index_bijection() {
        let cats = CategorySet::products();
        for idx in 0..cats.len() {
            let name = cats.name(idx).unwrap();
            assert_eq!(cats.index(name), Some(idx));
        }
        for name in cats.iter() {
            let idx = cats.index(name).unwrap();
            assert_eq!(cats.name(idx), Some(name));
        }
    }

    #[test]
    fn test_unknown_name_and_index() {
        let cats = CategorySet::products();
        assert_eq!(cats.index("Typewriter"), None);
        assert_eq!(cats.name(cats.len()), None);
    }

    #[test]
    #[should_panic(expected = "duplicate category name")]
    fn test_duplicate_names_rejected() {
        CategorySet::new(["Printer", "Printer"]);
    }
}
