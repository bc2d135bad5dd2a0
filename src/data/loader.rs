// ============================================================
// Layer 4 — Training Data Loader
// ============================================================
// Loads the labelled query dataset from a CSV file using the
// csv crate with serde deserialisation.
//
// Expected format (header row required):
//
//   Query,Product
//   "How do I connect my printer to WiFi?",Printer
//   "The scanner is not working",Scanner
//
// Extra columns are ignored; a missing Query or Product column
// fails the whole load. Query text is normalised on the way in
// so the tokenizer never sees stray control characters.
//
// Reference: csv crate documentation, Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::preprocessor::Preprocessor;
use crate::domain::example::RawExample;
use crate::domain::traits::ExampleSource;

/// Loads training rows from a Query/Product CSV file.
pub struct CsvQuerySource {
    path: PathBuf,
}

impl CsvQuerySource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl ExampleSource for CsvQuerySource {
    fn load_all(&self) -> Result<Vec<RawExample>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("cannot open training data '{}'", self.path.display()))?;

        let prep = Preprocessor::new();
        let mut rows = Vec::new();

        for (line, record) in reader.deserialize::<RawExample>().enumerate() {
            let mut row: RawExample = record.with_context(|| {
                format!("malformed row {} in '{}'", line + 1, self.path.display())
            })?;
            row.query = prep.clean(&row.query);
            rows.push(row);
        }

        tracing::info!("Loaded {} training rows from '{}'", rows.len(), self.path.display());
        Ok(rows)
    }
}
