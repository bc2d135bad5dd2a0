// ============================================================
// Layer 3 — Training Examples
// ============================================================
// A RawExample is one row of the training CSV exactly as loaded:
// free-text customer query plus the product name the support team
// assigned. A LabeledExample is the validated form: the product
// name resolved to its dense category index.
//
// Label mapping is eager — every row is resolved before any
// training step runs, and a single unknown product name fails the
// whole dataset with all offending values listed. Silently
// dropping rows would skew the label distribution without anyone
// noticing.

use serde::Deserialize;

use crate::domain::categories::CategorySet;
use crate::domain::error::TriageError;

/// One row of the `Query`/`Product` training CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExample {
    #[serde(rename = "Query")]
    pub query: String,

    #[serde(rename = "Product")]
    pub product: String,
}

/// A training example whose label has been validated against the
/// category set.
#[derive(Debug, Clone)]
pub struct LabeledExample {
    pub text: String,
    pub label: usize,
}

impl LabeledExample {
    /// Construct a single example, rejecting out-of-range labels.
    pub fn new(
        text: impl Into<String>,
        label: usize,
        categories: &CategorySet,
    ) -> Result<Self, TriageError> {
        if label >= categories.len() {
            return Err(TriageError::DataValidation(vec![format!(
                "label index {label} out of range (N = {})",
                categories.len()
            )]));
        }
        Ok(Self { text: text.into(), label })
    }

    /// Resolve every raw row's product name to a category index.
    ///
    /// Collects ALL unknown product names before failing so the
    /// error names each offender once, in first-seen order.
    pub fn map_all(
        rows: &[RawExample],
        categories: &CategorySet,
    ) -> Result<Vec<Self>, TriageError> {
        let mut examples = Vec::with_capacity(rows.len());
        let mut unknown: Vec<String> = Vec::new();

        for row in rows {
            match categories.index(&row.product) {
                Some(label) => examples.push(Self {
                    text: row.query.clone(),
                    label,
                }),
                None => {
                    if !unknown.contains(&row.product) {
                        unknown.push(row.product.clone());
                    }
                }
            }
        }

        if !unknown.is_empty() {
            return Err(TriageError::DataValidation(unknown));
        }
        Ok(examples)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn raw(query: &str, product: &str) -> RawExample {
        RawExample { query: query.into(), product: product.into() }
    }

    #[test]
    fn test_valid_label_accepted() {
        let cats = CategorySet::products();
        let ex = LabeledExample::new("printer is jammed", 0, &cats).unwrap();
        assert_eq!(ex.label, 0);
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        let cats = CategorySet::products();
        let err = LabeledExample::new("??", cats.len(), &cats);
        assert!(matches!(err, Err(TriageError::DataValidation(_))));
    }

    #[test]
    fn test_map_all_resolves_names() {
        let cats = CategorySet::products();
        let rows = vec![raw("no toner", "Printer"), raw("dead pixel", "Monitor")];
        let examples = LabeledExample::map_all(&rows, &cats).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, cats.index("Printer").unwrap());
        assert_eq!(examples[1].label, cats.index("Monitor").unwrap());
    }

    #[test]
    fn test_map_all_collects_every_unknown_name() {
        let cats = CategorySet::products();
        let rows = vec![
            raw("q1", "Typewriter"),
            raw("q2", "Printer"),
            raw("q3", "Gramophone"),
            raw("q4", "Typewriter"), // duplicate offender, reported once
        ];
        match LabeledExample::map_all(&rows, &cats) {
            Err(TriageError::DataValidation(names)) => {
                assert_eq!(names, vec!["Typewriter".to_string(), "Gramophone".to_string()]);
            }
            other => panic!("expected DataValidation, got {other:?}"),
        }
    }
}
