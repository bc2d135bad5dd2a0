// ============================================================
// Layer 2 — Triage Service
// ============================================================
// The long-lived facade the surrounding system holds on to: one
// instance constructed at process startup and shared (behind an
// Arc or injected handle) across request handlers.
//
// Boundary semantics, matching what callers rely on:
//   - construction always succeeds, even with no/corrupt weights
//   - train() never panics or propagates: any failure is logged
//     with full context and reported as `false`
//   - classify() is a pure read; callers may overlap reads freely
//   - is_ready() is the readiness check for handlers that must
//     reject politely before training has completed
//
// Training is blocking and CPU/accelerator-bound, so it belongs
// on a dedicated thread: spawn_training() runs a standalone
// pipeline and reports completion through the JoinHandle, after
// which a serving instance picks up the new weights via
// refresh(). There is no cancellation mechanism — a started run
// finishes or fails on its own.

use anyhow::Result;
use std::thread;

use crate::application::classify_use_case::ClassifyUseCase;
use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::domain::categories::CategorySet;
use crate::infra::weights::WeightStore;
use crate::ml::inferencer::Classification;

pub struct TriageService {
    config: TrainConfig,
    categories: CategorySet,
    classifier: ClassifyUseCase,
}

impl TriageService {
    /// Build the service, loading persisted weights when present.
    pub fn new(config: TrainConfig, categories: CategorySet) -> Result<Self> {
        tracing::info!("Initialized with {} product categories", categories.len());
        let classifier = ClassifyUseCase::new(&config, categories.clone())?;
        Ok(Self { config, categories, classifier })
    }

    /// True once trained weights are available on disk.
    pub fn is_ready(&self) -> bool {
        WeightStore::new(&self.config.weights_dir).exists()
    }

    /// Fine-tune the model on the configured dataset.
    ///
    /// Returns `true` on success (including the already-trained
    /// short-circuit) and `false` on any failure. Never panics and
    /// never leaves the service unusable — on failure the current
    /// model state, trained or not, keeps serving.
    pub fn train(&mut self) -> bool {
        tracing::info!("Starting training process...");
        let use_case = TrainUseCase::new(self.config.clone(), self.categories.clone());
        match use_case.execute() {
            Ok(()) => {
                if let Err(e) = self.refresh() {
                    tracing::warn!("Trained, but could not reload weights: {e:#}");
                }
                true
            }
            Err(e) => {
                tracing::error!("Error during training: {e:#}");
                false
            }
        }
    }

    /// Rebuild the inference stack from disk, picking up weights
    /// persisted since construction (e.g. by a training thread).
    pub fn refresh(&mut self) -> Result<()> {
        self.classifier = ClassifyUseCase::new(&self.config, self.categories.clone())?;
        Ok(())
    }

    /// Classify one customer query. Empty input is fine.
    pub fn classify(&self, query: &str) -> Result<Classification> {
        self.classifier.classify(query)
    }
}

/// Run a full training pipeline on a dedicated thread, reporting
/// the success flag through the handle. The serving instance stays
/// untouched; call `refresh()` on it once the handle resolves.
pub fn spawn_training(
    config: TrainConfig,
    categories: CategorySet,
) -> thread::JoinHandle<bool> {
    thread::spawn(move || {
        let use_case = TrainUseCase::new(config, categories);
        match use_case.execute() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error during training: {e:#}");
                false
            }
        }
    })
}

// ─── Integration Tests ────────────────────────────────────────────────────────
// End-to-end over a real (tiny) training run on the CPU backend.
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn categories() -> CategorySet {
        CategorySet::new(["Printer", "Scanner", "Laptop", "Monitor"])
    }

    fn write_dataset(path: &Path, rows: &[(&str, &str)]) {
        let mut f = fs::File::create(path).unwrap();
        writeln!(f, "Query,Product").unwrap();
        for (query, product) in rows {
            writeln!(f, "{query},{product}").unwrap();
        }
    }

    // Tiny model, many epochs: enough to overfit four examples in a
    // couple of seconds on the CPU backend.
    fn test_config(dir: &Path) -> TrainConfig {
        TrainConfig {
            dataset_path: dir.join("queries.csv").display().to_string(),
            weights_dir: dir.join("results").display().to_string(),
            max_seq_len: 16,
            batch_size: 4,
            epochs: 80,
            learning_rate: 1e-3,
            warmup_steps: 0,
            weight_decay: 0.0,
            checkpoint_steps: 0,
            keep_checkpoints: 2,
            d_model: 32,
            num_heads: 2,
            num_layers: 1,
            d_ff: 64,
            dropout: 0.0,
            vocab_size: 512,
        }
    }

    const ROWS: &[(&str, &str)] = &[
        ("printer wifi setup", "Printer"),
        ("scanner jam", "Scanner"),
        ("laptop battery", "Laptop"),
        ("monitor flicker", "Monitor"),
    ];

    #[test]
    fn test_train_then_classify_printer_query() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(&dir.path().join("queries.csv"), ROWS);

        let mut service = TriageService::new(test_config(dir.path()), categories()).unwrap();
        assert!(!service.is_ready());
        assert!(service.train());
        assert!(service.is_ready());

        let result = service.classify("my printer won't connect to wifi").unwrap();
        assert_eq!(result.name, "Printer");
        assert_eq!(result.ranked[0].0, "Printer");
        assert_eq!(result.ranked.len(), 3);
        for pair in result.ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_second_train_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(&dir.path().join("queries.csv"), ROWS);
        let cfg = test_config(dir.path());

        let mut service = TriageService::new(cfg.clone(), categories()).unwrap();
        assert!(service.train());

        let store = WeightStore::new(&cfg.weights_dir);
        let first = fs::read(store.weights_path()).unwrap();

        assert!(service.train(), "second train must short-circuit to success");
        let second = fs::read(store.weights_path()).unwrap();
        assert_eq!(first, second, "existing blob must not be rewritten");
    }

    #[test]
    fn test_unknown_product_fails_without_writing_weights() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(
            &dir.path().join("queries.csv"),
            &[("printer wifi setup", "Printer"), ("ribbon stuck", "Typewriter")],
        );
        let cfg = test_config(dir.path());

        let mut service = TriageService::new(cfg.clone(), categories()).unwrap();
        assert!(!service.train());
        assert!(!WeightStore::new(&cfg.weights_dir).exists());
        assert!(!service.is_ready());
    }

    #[test]
    fn test_missing_dataset_reports_failure_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = TriageService::new(test_config(dir.path()), categories()).unwrap();
        assert!(!service.train());
    }

    #[test]
    fn test_untrained_service_still_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let service = TriageService::new(test_config(dir.path()), categories()).unwrap();

        for query in ["monitor flicker", ""] {
            let result = service.classify(query).unwrap();
            assert!(result.index < 4);
            assert_eq!(categories().name(result.index), Some(result.name.as_str()));
        }
    }

    #[test]
    fn test_deleted_blob_yields_fresh_but_working_model() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(&dir.path().join("queries.csv"), ROWS);
        let cfg = test_config(dir.path());

        let mut service = TriageService::new(cfg.clone(), categories()).unwrap();
        assert!(service.train());

        let store = WeightStore::new(&cfg.weights_dir);
        fs::remove_file(store.weights_path()).unwrap();
        assert!(!store.exists());

        // Simulated process restart
        let service = TriageService::new(cfg, categories()).unwrap();
        assert!(!service.is_ready());
        let result = service.classify("scanner jam").unwrap();
        assert!(result.index < 4);
    }

    #[test]
    fn test_spawn_training_reports_through_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(&dir.path().join("queries.csv"), ROWS);
        let cfg = test_config(dir.path());

        let handle = spawn_training(cfg.clone(), categories());
        assert!(handle.join().unwrap());

        let mut service = TriageService::new(cfg, categories()).unwrap();
        service.refresh().unwrap();
        assert!(service.is_ready());
    }
}
