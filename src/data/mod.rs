// ============================================================
// Layer 4 — Data Layer
// ============================================================
// Everything between the raw CSV on disk and the tensors the
// model consumes:
//
//   loader.rs       — reads the Query/Product CSV
//   preprocessor.rs — normalises query text before tokenisation
//   encoder.rs      — text → fixed-length token ids + attention mask
//   dataset.rs      — burn Dataset over labelled examples,
//                     encoding each item on access
//   batcher.rs      — stacks encoded items into batch tensors
//
// Reference: Burn Book §4 (Data Loading)

pub mod batcher;
pub mod dataset;
pub mod encoder;
pub mod loader;
pub mod preprocessor;
