// ============================================================
// Layer 6 — Infrastructure
// ============================================================
// Durable state at the edges of the system:
//
//   weights.rs         — final trained parameters + train config
//   checkpoint.rs      — rolling mid-training checkpoints
//   tokenizer_store.rs — the shared tokenizer artifact
//   metrics.rs         — per-epoch training metrics CSV

pub mod checkpoint;
pub mod metrics;
pub mod tokenizer_store;
pub mod weights;
