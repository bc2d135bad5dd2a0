// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types the
// application layer can swap implementations without changing
// the code that uses them:
//   - CsvQuerySource implements ExampleSource
//   - A future database-backed source could too, and the
//     training pipeline would not change
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::example::RawExample;

// ─── ExampleSource ────────────────────────────────────────────────────────────
/// Any component that can produce labelled training rows.
///
/// Implementations:
///   - CsvQuerySource → loads from a Query/Product CSV file
pub trait ExampleSource {
    /// Load every available training row from this source.
    fn load_all(&self) -> Result<Vec<RawExample>>;
}
