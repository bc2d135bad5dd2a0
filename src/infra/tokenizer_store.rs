// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Manages the tokenizer artifact shared between training and
// inference. Classification accuracy depends on both sides
// using bit-identical tokenisation, so the tokenizer is
// persisted as tokenizer.json next to the model weights and
// loaded from there whenever it exists.
//
// When no pretrained artifact is present, a WordLevel vocabulary
// is built from the training corpus and written in HuggingFace
// tokenizer.json format, which Tokenizer::from_file understands
// directly. Special token ids follow the BERT convention so the
// encoder's hardcoded [CLS]/[SEP]/[PAD] ids always line up.
//
// In tokenizers 0.15, train_from_files requires Trainer::Model
// to equal ModelWrapper; writing the JSON directly sidesteps
// that type mismatch entirely.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

const TOKENIZER_FILE: &str = "tokenizer.json";

// First id handed to corpus words; 0–103 are reserved for the
// BERT-convention specials.
const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Load the persisted tokenizer, or build one from `texts`
    /// when no artifact exists yet.
    pub fn load_or_build(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        if self.dir.join(TOKENIZER_FILE).exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load a previously saved tokenizer.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join(TOKENIZER_FILE);
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("cannot load tokenizer from '{}': {e}", path.display()))
    }

    /// Load the persisted tokenizer, or fall back to an in-memory
    /// specials-only tokenizer WITHOUT writing anything. Used when
    /// the classifier is constructed before any training has run:
    /// every word maps to [UNK], but encoding stays structurally
    /// valid, and the next training run still gets to build (and
    /// persist) the real vocabulary.
    pub fn load_or_empty(&self) -> Result<Tokenizer> {
        if self.dir.join(TOKENIZER_FILE).exists() {
            return self.load();
        }
        tracing::warn!("No tokenizer artifact found; using a specials-only tokenizer until training runs");
        let json = tokenizer_json(build_vocab(&[], 0));
        Tokenizer::from_bytes(serde_json::to_vec(&json)?)
            .map_err(|e| anyhow::anyhow!("cannot build fallback tokenizer: {e}"))
    }

    fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir).ok();

        let vocab = build_vocab(texts, vocab_size);
        let word_count = vocab.len();
        let json = tokenizer_json(vocab);

        let path = self.dir.join(TOKENIZER_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("cannot write tokenizer JSON to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            word_count,
            path.display()
        );

        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("cannot reload tokenizer: {e}"))
    }
}

/// HuggingFace tokenizer.json layout: WordLevel model, BERT-style
/// normalisation, whitespace pre-tokenisation.
fn tokenizer_json(vocab: HashMap<String, usize>) -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": {
            "type": "Whitespace"
        },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    })
}

/// Count word frequencies across the corpus and assign ids to the
/// most frequent words. Word ids start at FIRST_WORD_ID and stay
/// strictly below `vocab_size`, so an embedding table of
/// `vocab_size` rows covers every id the tokenizer can emit.
fn build_vocab(texts: &[String], vocab_size: usize) -> HashMap<String, usize> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text.split_whitespace() {
            let w = word.to_lowercase();
            let w = w.trim_matches(|c: char| !c.is_alphanumeric());
            if !w.is_empty() {
                *freq.entry(w.to_string()).or_insert(0) += 1;
            }
        }
    }

    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    // Frequency descending; ties alphabetical so rebuilds from the
    // same corpus always produce the same ids.
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(vocab_size.saturating_sub(FIRST_WORD_ID));

    let mut vocab = HashMap::new();
    vocab.insert("[PAD]".to_string(), 0);
    vocab.insert("[UNK]".to_string(), 1);
    vocab.insert("[CLS]".to_string(), 101);
    vocab.insert("[SEP]".to_string(), 102);
    vocab.insert("[MASK]".to_string(), 103);

    let mut next_id = FIRST_WORD_ID;
    for (word, _) in words {
        if !vocab.contains_key(&word) {
            vocab.insert(word, next_id);
            next_id += 1;
        }
    }
    vocab
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let corpus = vec!["printer wifi setup".to_string(), "scanner jam".to_string()];

        let built = store.load_or_build(&corpus, 1000).unwrap();
        let loaded = store.load().unwrap();

        let a = built.encode("printer jam", false).unwrap();
        let b = loaded.encode("printer jam", false).unwrap();
        assert_eq!(a.get_ids(), b.get_ids());
        assert!(!a.get_ids().is_empty());
    }

    #[test]
    fn test_existing_artifact_wins_over_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());

        store.load_or_build(&["printer wifi".to_string()], 1000).unwrap();
        // Second call with a different corpus must load, not rebuild
        let tok = store
            .load_or_build(&["completely different words".to_string()], 1000)
            .unwrap();
        let enc = tok.encode("printer", false).unwrap();
        assert_ne!(enc.get_ids()[0], 1, "known word must not map to [UNK]");
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok = store.load_or_build(&["printer wifi".to_string()], 1000).unwrap();

        let enc = tok.encode("zeppelin", false).unwrap();
        assert_eq!(enc.get_ids(), &[1]);
    }

    #[test]
    fn test_load_or_empty_does_not_persist_anything() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());

        let tok = store.load_or_empty().unwrap();
        let enc = tok.encode("printer", false).unwrap();
        assert_eq!(enc.get_ids(), &[1], "everything is [UNK] before training");
        assert!(!dir.path().join("tokenizer.json").exists());
    }

    #[test]
    fn test_vocab_ids_stay_below_vocab_size() {
        let vocab = build_vocab(&["alpha beta gamma delta".to_string()], 106);
        assert_eq!(vocab["[PAD]"], 0);
        assert_eq!(vocab["[CLS]"], 101);
        assert_eq!(vocab["[SEP]"], 102);
        // Only 2 word slots fit under vocab_size 106
        assert!(vocab.values().all(|&id| id < 106));
        assert_eq!(vocab.len(), 5 + 2);
    }
}
