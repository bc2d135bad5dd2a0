// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// The boundary conditions the surrounding system reacts to.
// Pipeline internals use anyhow::Result with context; these
// named variants exist for the cases with distinct recovery
// behaviour:
//
//   DataValidation — train() fails fast, returns false
//   ModelLoad      — recovered locally with a fresh model
//   Training       — caught at the service boundary, never fatal

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    /// A training row named a product that is not in the category set.
    /// Carries every distinct offending value so the dataset can be
    /// fixed in one pass.
    #[error("unknown product label(s) in training data: {0:?}")]
    DataValidation(Vec<String>),

    /// A persisted weight blob was missing or unreadable.
    #[error("cannot load model weights: {0}")]
    ModelLoad(String),

    /// The training loop itself failed.
    #[error("training failed: {0}")]
    Training(String),
}
