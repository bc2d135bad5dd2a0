// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the thin data/infra adapters that implement Burn traits.
//
//   model.rs      — transformer encoder + classification head
//   trainer.rs    — mini-batch AdamW loop with warmup,
//                   rolling checkpoints and final persistence
//   inferencer.rs — evaluation-mode classification with
//                   softmax ranking
//
// Backend selection happens here, once per build: the default is
// the CPU NdArray backend; compiling with `--features wgpu`
// switches the whole process to the GPU backend. The choice is
// fixed for the process lifetime — records persisted by one
// backend load fine on the other.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need

/// Transformer classifier architecture
pub mod model;

/// Full training loop with checkpointing
pub mod trainer;

/// Inference engine — loads weights and ranks categories
pub mod inferencer;

/// Backend used for inference (and as the inner training backend).
#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

/// Backend used for training — autodiff wrapped around the
/// inference backend, so `model.valid()` lands on InferBackend.
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

/// The one device the process computes on.
pub fn default_device() -> <InferBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}
