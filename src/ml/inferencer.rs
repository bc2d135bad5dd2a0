// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Evaluation-mode classification: encode the query, run one
// forward pass, softmax the logits and rank the categories.
// A pure read over the current parameters — nothing here ever
// mutates model state.

use anyhow::Result;
use burn::prelude::*;

use crate::data::encoder::TextEncoder;
use crate::domain::categories::CategorySet;
use crate::ml::model::{IssueModel, IssueModelConfig};
use crate::ml::{default_device, InferBackend};
use crate::application::train_use_case::TrainConfig;
use crate::infra::weights::WeightStore;

/// Number of ranked alternatives reported alongside the top pick
/// (fewer when the category set is smaller).
const RANKED_ALTERNATIVES: usize = 3;

/// One classification decision.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Dense category index in [0, N)
    pub index: usize,
    /// Category name for `index`
    pub name: String,
    /// Top min(3, N) categories by descending probability;
    /// ranked[0] always matches (index, name)
    pub ranked: Vec<(String, f32)>,
}

pub struct Inferencer {
    model: IssueModel<InferBackend>,
    encoder: TextEncoder,
    categories: CategorySet,
    device: <InferBackend as Backend>::Device,
}

impl Inferencer {
    pub fn new(
        model: IssueModel<InferBackend>,
        encoder: TextEncoder,
        categories: CategorySet,
        device: <InferBackend as Backend>::Device,
    ) -> Self {
        Self { model, encoder, categories, device }
    }

    /// Build the model from the saved architecture config and load
    /// persisted weights when a readable blob exists. A missing or
    /// corrupted blob is logged and the freshly initialised model is
    /// used instead — construction never fails on weight problems.
    pub fn from_weight_store(
        store: &WeightStore,
        cfg: &TrainConfig,
        encoder: TextEncoder,
        categories: CategorySet,
    ) -> Self {
        let device = default_device();
        // Dropout is forced to zero: this model only ever runs in
        // evaluation mode.
        let model_cfg = IssueModelConfig::new(
            cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
            cfg.num_heads, cfg.num_layers, cfg.d_ff, 0.0,
            categories.len(),
        );
        let model = model_cfg.init::<InferBackend>(&device);
        let model = store.load_or_fallback(model, &device);
        Self::new(model, encoder, categories, device)
    }

    /// Classify one query. Always returns a structurally valid
    /// result — an index in [0, N) with its matching name — even
    /// for an empty query or an untrained model.
    pub fn classify(&self, query: &str) -> Result<Classification> {
        let encoded = self.encoder.encode(query)?;
        let seq_len = encoded.input_ids.len();

        let ids_flat: Vec<i32> = encoded.input_ids.iter().map(|&x| x as i32).collect();
        let mask_flat: Vec<i32> = encoded.attention_mask.iter().map(|&x| x as i32).collect();

        let input_ids = Tensor::<InferBackend, 1, Int>::from_ints(
            ids_flat.as_slice(), &self.device,
        ).reshape([1, seq_len]);
        let attention_mask = Tensor::<InferBackend, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device,
        ).reshape([1, seq_len]);

        let logits = self.model.forward(input_ids, attention_mask); // [1, N]

        // Softmax over categories → probability distribution
        let probs: Vec<f32> = burn::tensor::activation::softmax(logits, 1)
            .into_data()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("cannot read probabilities: {e:?}"))?;

        // Stable arg-max: strictly-greater comparison keeps the
        // lowest index on ties.
        let mut best = 0usize;
        for (idx, &p) in probs.iter().enumerate() {
            if p > probs[best] {
                best = idx;
            }
        }

        let name = self
            .categories
            .name(best)
            .ok_or_else(|| anyhow::anyhow!("category index {best} out of range"))?
            .to_string();

        let ranked = rank_top(&probs, &self.categories, RANKED_ALTERNATIVES);

        tracing::info!("Classified query: '{}' → {} (code: {})", query, name, best);
        tracing::debug!("Top {} predictions:", ranked.len());
        for (alt_name, prob) in &ranked {
            tracing::debug!("  {}: {:.3}", alt_name, prob);
        }

        Ok(Classification { index: best, name, ranked })
    }
}

/// Top `min(k, N)` categories by descending probability, ties
/// broken by lowest index.
fn rank_top(probs: &[f32], categories: &CategorySet, k: usize) -> Vec<(String, f32)> {
    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
        .into_iter()
        .take(k)
        .filter_map(|idx| {
            categories
                .name(idx)
                .map(|name| (name.to_string(), probs[idx]))
        })
        .collect()
}
