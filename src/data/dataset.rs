// ============================================================
// Layer 4 — Issue Dataset
// ============================================================
// The labelled example store: validated (text, label) pairs plus
// the encoder, exposed through Burn's Dataset trait so the
// DataLoader can pull one item at a time.
//
// Encoding happens per access in get(), not up front — the store
// keeps only the raw text, so the extra memory per example is
// O(1) beyond the strings themselves. With 256-token sequences,
// pre-encoding a large dataset would cost ~1 KiB per row for no
// benefit.
//
// Reference: Burn Book §4 (Dataset)

use burn::data::dataset::Dataset;

use crate::data::encoder::TextEncoder;
use crate::domain::categories::CategorySet;
use crate::domain::example::LabeledExample;

/// One encoded training item: fixed-length ids and mask plus the
/// target category index.
#[derive(Debug, Clone)]
pub struct IssueSample {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label: usize,
}

pub struct IssueDataset {
    examples: Vec<LabeledExample>,
    encoder: TextEncoder,
}

impl IssueDataset {
    /// Build the store and log the label distribution — the first
    /// thing to check when training goes sideways is class skew.
    pub fn new(
        examples: Vec<LabeledExample>,
        encoder: TextEncoder,
        categories: &CategorySet,
    ) -> Self {
        let mut counts = vec![0usize; categories.len()];
        for ex in &examples {
            counts[ex.label] += 1;
        }
        tracing::info!("Dataset ready: {} examples", examples.len());
        for (idx, count) in counts.iter().enumerate() {
            if *count > 0 {
                tracing::debug!(
                    "  {:<24} {}",
                    categories.name(idx).unwrap_or("?"),
                    count
                );
            }
        }

        Self { examples, encoder }
    }

    pub fn example_count(&self) -> usize {
        self.examples.len()
    }
}

impl Dataset<IssueSample> for IssueDataset {
    fn get(&self, index: usize) -> Option<IssueSample> {
        let example = self.examples.get(index)?;
        match self.encoder.encode(&example.text) {
            Ok(encoded) => Some(IssueSample {
                input_ids: encoded.input_ids,
                attention_mask: encoded.attention_mask,
                label: example.label,
            }),
            Err(e) => {
                tracing::error!("Cannot encode example {index}: {e:#}");
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.examples.len()
    }
}
