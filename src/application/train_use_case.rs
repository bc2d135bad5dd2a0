// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 0: Skip entirely if trained weights already exist
//   Step 1: Load the Query/Product CSV        (Layer 4 - data)
//   Step 2: Map product names to label indices (Layer 3 - domain)
//   Step 3: Build / load the tokenizer         (Layer 6 - infra)
//   Step 4: Build the dataset                  (Layer 4 - data)
//   Step 5: Save config for inference          (Layer 6 - infra)
//   Step 6: Run the training loop              (Layer 5 - ml)
//
// The skip-if-trained check keys solely on weight-blob existence,
// not on dataset changes: retraining after a data refresh means
// deleting the blob first. That is deliberate — it makes train()
// idempotent and safe to call on every process start.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::IssueDataset,
    encoder::TextEncoder,
    loader::CsvQuerySource,
};
use crate::domain::categories::CategorySet;
use crate::domain::error::TriageError;
use crate::domain::example::LabeledExample;
use crate::domain::traits::ExampleSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    tokenizer_store::TokenizerStore,
    weights::WeightStore,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All knobs for a training run. Serialisable so the architecture
// half can be saved to disk and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:     String,
    pub weights_dir:      String,
    pub max_seq_len:      usize,
    pub batch_size:       usize,
    pub epochs:           usize,
    pub learning_rate:    f64,
    pub warmup_steps:     usize,
    pub weight_decay:     f64,
    /// Save a rolling checkpoint every this many optimiser steps
    /// (0 disables mid-training checkpoints)
    pub checkpoint_steps: usize,
    /// How many rolling checkpoints to retain on disk
    pub keep_checkpoints: usize,
    pub d_model:          usize,
    pub num_heads:        usize,
    pub num_layers:       usize,
    pub d_ff:             usize,
    pub dropout:          f64,
    pub vocab_size:       usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:     "data/customer_queries.csv".to_string(),
            weights_dir:      "data/results".to_string(),
            max_seq_len:      256,
            batch_size:       16,
            epochs:           5,
            learning_rate:    1e-4,
            warmup_steps:     500,
            weight_decay:     0.01,
            checkpoint_steps: 10_000,
            keep_checkpoints: 2,
            d_model:          128,
            num_heads:        4,
            num_layers:       2,
            d_ff:             512,
            dropout:          0.1,
            vocab_size:       8192,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
    categories: CategorySet,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig, categories: CategorySet) -> Self {
        Self { config, categories }
    }

    /// Execute the training pipeline end to end. Errors propagate
    /// to the caller; the TriageService boundary converts them into
    /// a `false` success flag.
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 0: Idempotent short-circuit ─────────────────────────────────
        let weight_store = WeightStore::new(&cfg.weights_dir);
        if weight_store.exists() {
            tracing::info!("Model already trained and saved. Skipping training.");
            return Ok(());
        }

        // ── Step 1: Load training rows ────────────────────────────────────────
        tracing::info!("Loading training data from '{}'", cfg.dataset_path);
        let source = CsvQuerySource::new(&cfg.dataset_path);
        let rows = source.load_all()?;

        tracing::info!("Sample of training data:");
        for row in rows.iter().take(5) {
            tracing::info!("  '{}' → {}", row.query, row.product);
        }

        // ── Step 2: Map product names to label indices ────────────────────────
        // Eager: every row is validated before any training step.
        let examples = LabeledExample::map_all(&rows, &self.categories)?;

        // ── Step 3: Build / load tokenizer ────────────────────────────────────
        // Persisted next to the weights so inference shares it.
        let corpus: Vec<String> = examples.iter().map(|e| e.text.clone()).collect();
        let tok_store = TokenizerStore::new(&cfg.weights_dir);
        let tokenizer = tok_store.load_or_build(&corpus, cfg.vocab_size)?;
        let encoder = TextEncoder::new(tokenizer, cfg.max_seq_len);

        // ── Step 4: Build the dataset ─────────────────────────────────────────
        let dataset = IssueDataset::new(examples, encoder.clone(), &self.categories);

        // ── Step 5: Save config so inference can rebuild the model ───────────
        weight_store.save_config(cfg)?;

        // ── Step 6: Run the training loop (Layer 5) ───────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.weights_dir, cfg.keep_checkpoints);
        run_training(
            cfg,
            dataset,
            &encoder,
            &self.categories,
            &ckpt_manager,
            &weight_store,
        )
        .map_err(|e| TriageError::Training(format!("{e:#}")))?;

        Ok(())
    }
}
