// ============================================================
// Layer 2 — Classify Use Case
// ============================================================
// Builds the inference stack: tokenizer artifact, model rebuilt
// from the persisted architecture config, weights loaded when a
// readable blob exists. Construction always succeeds — with no
// (or corrupted) saved state the classifier runs untrained and
// still produces structurally valid answers.

use anyhow::Result;

use crate::application::train_use_case::TrainConfig;
use crate::data::encoder::TextEncoder;
use crate::domain::categories::CategorySet;
use crate::infra::{tokenizer_store::TokenizerStore, weights::WeightStore};
use crate::ml::inferencer::{Classification, Inferencer};

pub struct ClassifyUseCase {
    inferencer: Inferencer,
}

impl ClassifyUseCase {
    pub fn new(config: &TrainConfig, categories: CategorySet) -> Result<Self> {
        let store = WeightStore::new(&config.weights_dir);

        // The config persisted at training time wins: it records the
        // exact architecture the weights were trained with. The
        // caller's config only fills in when nothing was saved yet.
        let cfg = match store.load_config() {
            Ok(saved) => saved,
            Err(_) => {
                tracing::debug!("No saved training config; using provided configuration");
                config.clone()
            }
        };

        let tokenizer = TokenizerStore::new(&config.weights_dir).load_or_empty()?;
        let encoder = TextEncoder::new(tokenizer, cfg.max_seq_len);

        let inferencer = Inferencer::from_weight_store(&store, &cfg, encoder, categories);
        Ok(Self { inferencer })
    }

    /// Classify one customer query.
    pub fn classify(&self, query: &str) -> Result<Classification> {
        self.inferencer.classify(query)
    }
}
