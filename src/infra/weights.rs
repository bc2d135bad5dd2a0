// ============================================================
// Layer 6 — Weight Store
// ============================================================
// The durable storage boundary for trained model parameters.
//
// What gets saved:
//   1. model.mpk           — all learned parameters
//   2. train_config.json   — architecture + hyperparameters
//
// Why save the config separately?
//   When loading for inference, we need the exact architecture
//   (d_model, num_layers, …) to rebuild the model before the
//   record can be loaded into it.
//
// Burn's CompactRecorder:
//   - Serialises parameters to a named MessagePack file
//   - Type-safe: loading fails if the architecture doesn't match
//
// A missing or unreadable blob is never fatal: load_or_fallback
// logs the problem and hands back the freshly initialised model,
// so classifier construction always succeeds.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::TriageError;
use crate::ml::model::IssueModel;

// Recorder appends ".mpk" to the stem.
const WEIGHTS_STEM: &str = "model";
const WEIGHTS_FILE: &str = "model.mpk";
const CONFIG_FILE: &str = "train_config.json";

/// Read/write access to the persisted parameter state.
pub struct WeightStore {
    dir: PathBuf,
}

impl WeightStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Path of the weight blob — exposed so tests and callers can
    /// check for external changes.
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_FILE)
    }

    /// True when a trained weight blob is present. Training keys
    /// its skip-if-done check on this.
    pub fn exists(&self) -> bool {
        self.weights_path().exists()
    }

    /// Persist the full parameter state of `model`.
    pub fn save<B: Backend>(&self, model: &IssueModel<B>) -> Result<()> {
        let path = self.dir.join(WEIGHTS_STEM);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("failed to save weights to '{}'", path.display()))?;
        tracing::info!("Model weights saved to '{}'", self.weights_path().display());
        Ok(())
    }

    /// Load the persisted parameters into `model`, wholesale.
    pub fn load<B: Backend>(
        &self,
        model: IssueModel<B>,
        device: &B::Device,
    ) -> Result<IssueModel<B>, TriageError> {
        let path = self.dir.join(WEIGHTS_STEM);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| {
                TriageError::ModelLoad(format!("'{}': {e}", self.weights_path().display()))
            })?;
        Ok(model.load_record(record))
    }

    /// Load persisted parameters if a readable blob exists,
    /// otherwise return the freshly initialised model unchanged.
    pub fn load_or_fallback<B: Backend>(
        &self,
        model: IssueModel<B>,
        device: &B::Device,
    ) -> IssueModel<B> {
        if !self.exists() {
            tracing::info!("No saved model found. Model will need training before use.");
            return model;
        }
        match self.load(model.clone(), device) {
            Ok(loaded) => {
                tracing::info!("Model loaded from '{}'", self.weights_path().display());
                loaded
            }
            Err(e) => {
                tracing::error!("{e}");
                tracing::warn!("Falling back to a freshly initialised model");
                model
            }
        }
    }

    /// Persist the training configuration next to the weights.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration saved alongside the weights.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read config from '{}'", path.display()))?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{default_device, InferBackend};
    use crate::ml::model::IssueModelConfig;

    fn tiny_model(device: &<InferBackend as Backend>::Device) -> IssueModel<InferBackend> {
        IssueModelConfig::new(32, 8, 16, 2, 1, 32, 0.0, 4).init(device)
    }

    #[test]
    fn test_exists_tracks_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path());
        let device = default_device();

        assert!(!store.exists());
        store.save(&tiny_model(&device)).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path());
        let device = default_device();

        let model = tiny_model(&device);
        store.save(&model).unwrap();
        store.load(tiny_model(&device), &device).unwrap();
    }

    #[test]
    fn test_corrupted_blob_falls_back_to_fresh_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path());
        let device = default_device();

        fs::write(store.weights_path(), b"definitely not messagepack").unwrap();
        assert!(store.exists());
        assert!(store.load(tiny_model(&device), &device).is_err());

        // Construction-time path: must not error or panic
        let _model = store.load_or_fallback(tiny_model(&device), &device);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = WeightStore::new(dir.path());

        let cfg = TrainConfig::default();
        store.save_config(&cfg).unwrap();
        let loaded = store.load_config().unwrap();
        assert_eq!(loaded.max_seq_len, cfg.max_seq_len);
        assert_eq!(loaded.epochs, cfg.epochs);
    }
}
