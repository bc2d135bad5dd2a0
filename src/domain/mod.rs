// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs and traits that define the core concepts
// of the triage system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or network calls
//   - NO ML-specific code
//
// Why keep this layer pure?
//   - Easy to unit test (no GPU needed)
//   - Easy to understand (no framework noise)
//   - Easy to swap implementations (just implement the trait)
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The fixed set of product categories the classifier predicts over
pub mod categories;

// Boundary error taxonomy
pub mod error;

// Raw CSV rows and validated (text, label) training examples
pub mod example;

// Core abstractions (traits) that other layers implement
pub mod traits;
