// ============================================================
// Layer 2 — Application Layer (Use Cases)
// ============================================================
// Orchestration only: each use case wires together the data,
// ml and infra layers to execute one operation end to end.
// Nothing in this layer touches tensors or file formats
// directly.
//
//   train_use_case.rs    — full training pipeline + TrainConfig
//   classify_use_case.rs — weight loading + single-query inference
//   service.rs           — the long-lived facade the surrounding
//                          system holds on to

pub mod classify_use_case;
pub mod service;
pub mod train_use_case;
