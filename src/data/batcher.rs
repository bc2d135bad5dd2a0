// ============================================================
// Layer 4 — Issue Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<IssueSample>
// into model-ready tensors.
//
// Input:  Vec of N IssueSamples, each with sequences of length S
// Output: IssueBatch with [N, S] id/mask tensors and [N] labels
//
// All sequences are already padded to the same length by the
// encoder, so batching is a flatten + reshape with no dynamic
// padding step. The DataLoader hands the target device to each
// batch() call, so the batcher itself carries no state.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::IssueSample;

/// A batch of encoded queries ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct IssueBatch<B: Backend> {
    /// Token id sequences — shape [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape [batch_size, seq_len]; 1 = real token
    pub attention_mask: Tensor<B, 2, Int>,

    /// Target category indices — shape [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug, Default)]
pub struct IssueBatcher;

impl IssueBatcher {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Batcher<B, IssueSample, IssueBatch<B>> for IssueBatcher {
    fn batch(&self, items: Vec<IssueSample>, device: &B::Device) -> IssueBatch<B> {
        let batch_size = items.len();
        // All sequences share one length (pre-padded by the encoder)
        let seq_len = items[0].input_ids.len();

        let ids_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(ids_flat.as_slice(), device)
            .reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(mask_flat.as_slice(), device)
            .reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), device);

        IssueBatch { input_ids, attention_mask, labels }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{default_device, InferBackend};

    fn sample(ids: &[u32], label: usize) -> IssueSample {
        IssueSample {
            input_ids: ids.to_vec(),
            attention_mask: ids.iter().map(|&id| u32::from(id != 0)).collect(),
            label,
        }
    }

    #[test]
    fn test_batch_shapes_and_labels() {
        let batcher = IssueBatcher::new();
        let device = default_device();

        let items = vec![
            sample(&[101, 7, 8, 102, 0, 0], 0),
            sample(&[101, 9, 102, 0, 0, 0], 3),
        ];
        let batch: IssueBatch<InferBackend> = batcher.batch(items, &device);

        assert_eq!(batch.input_ids.dims(), [2, 6]);
        assert_eq!(batch.attention_mask.dims(), [2, 6]);
        assert_eq!(batch.labels.dims(), [2]);

        let labels: Vec<i64> = batch.labels.into_data().to_vec().unwrap();
        assert_eq!(labels, vec![0, 3]);
    }

    #[test]
    fn test_batch_preserves_row_order() {
        let batcher = IssueBatcher::new();
        let device = default_device();

        let items = vec![sample(&[101, 5, 102], 1), sample(&[101, 6, 102], 2)];
        let batch: IssueBatch<InferBackend> = batcher.batch(items, &device);

        let ids: Vec<i64> = batch.input_ids.into_data().to_vec().unwrap();
        assert_eq!(ids, vec![101, 5, 102, 101, 6, 102]);
    }
}
