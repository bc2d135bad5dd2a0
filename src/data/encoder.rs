// ============================================================
// Layer 4 — Text Encoder
// ============================================================
// Turns one query string into the fixed-length numeric form the
// model consumes: token ids and an attention mask, both exactly
// max_len entries long.
//
// Sequence format: [CLS] query tokens… [SEP] [PAD]…
//
// Longer queries are truncated so [SEP] always fits; shorter
// ones are padded with [PAD] (mask 0). The output length never
// varies — the model's position embeddings are sized to max_len.
//
// The encoder must use the SAME tokenizer artifact as training,
// otherwise token ids stop lining up with the learned embeddings
// and accuracy silently collapses. The TokenizerStore guarantees
// this by persisting tokenizer.json next to the weights.
//
// Reference: Devlin et al. (2019) BERT input representation

use anyhow::Result;
use tokenizers::Tokenizer;

/// BERT-convention special token ids, fixed by the tokenizer store.
pub const PAD_ID: u32 = 0;
pub const CLS_ID: u32 = 101;
pub const SEP_ID: u32 = 102;

/// One encoded query: ids and mask, both exactly max_len long.
/// Mask is 1 for real tokens ([CLS]/[SEP] included), 0 for padding.
#[derive(Debug, Clone)]
pub struct EncodedQuery {
    pub input_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

/// Deterministic text → fixed-length sequence adapter.
#[derive(Clone)]
pub struct TextEncoder {
    tokenizer: Tokenizer,
    max_len: usize,
}

impl TextEncoder {
    pub fn new(tokenizer: Tokenizer, max_len: usize) -> Self {
        assert!(max_len >= 2, "max_len must fit [CLS] and [SEP]");
        Self { tokenizer, max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Encode one query. Empty input is fine: it becomes
    /// [CLS] [SEP] followed by padding.
    pub fn encode(&self, text: &str) -> Result<EncodedQuery> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("tokenisation failed: {e}"))?;

        // Reserve two slots for the boundary tokens.
        let body_budget = self.max_len - 2;
        let body = &encoding.get_ids()[..encoding.get_ids().len().min(body_budget)];

        let mut input_ids = Vec::with_capacity(self.max_len);
        input_ids.push(CLS_ID);
        input_ids.extend_from_slice(body);
        input_ids.push(SEP_ID);

        let real_len = input_ids.len();
        let mut attention_mask = vec![1u32; real_len];

        input_ids.resize(self.max_len, PAD_ID);
        attention_mask.resize(self.max_len, 0);

        Ok(EncodedQuery { input_ids, attention_mask })
    }
}
