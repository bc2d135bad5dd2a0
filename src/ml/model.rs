use burn::{
    nn::{
        attention::{MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct IssueModelConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    pub dropout:     f64,
    pub num_classes: usize,
}

impl IssueModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> IssueModel<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        // The classification head is randomly initialised here; loading a
        // persisted record overwrites it wholesale.
        let class_head = LinearConfig::new(self.d_model, self.num_classes).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        IssueModel {
            token_embedding, position_embedding, layers,
            final_norm, class_head, dropout,
            max_seq_len: self.max_seq_len,
            d_model:     self.d_model,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        use burn::nn::attention::MhaInput;
        let attn_output = self.self_attn.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

/// Transformer encoder with a linear classification head: one
/// logit per product category, for one query per batch row.
#[derive(Module, Debug)]
pub struct IssueModel<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub class_head:         Linear<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
    pub d_model:            usize,
}

impl<B: Backend> IssueModel<B> {
    /// input_ids, attention_mask: [batch, seq_len] → logits: [batch, num_classes]
    pub fn forward(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for layer in &self.layers {
            x = layer.forward(x);
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]

        // Mean-pool over real tokens only — padding positions would
        // otherwise dilute short queries.
        let mask = attention_mask.float();                       // [batch, seq_len]
        let weights = mask.clone().unsqueeze_dim::<3>(2);        // [batch, seq_len, 1]
        let summed = (x * weights)
            .sum_dim(1)
            .reshape([batch_size, self.d_model]);                // [batch, d_model]
        let counts = mask.sum_dim(1).clamp_min(1.0);             // [batch, 1]
        let pooled = summed / counts;

        self.class_head.forward(pooled) // [batch, num_classes]
    }

    /// Forward pass plus cross-entropy loss against target labels.
    pub fn forward_loss(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        labels:         Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(input_ids, attention_mask);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::{default_device, InferBackend};

    fn tiny_config(num_classes: usize) -> IssueModelConfig {
        IssueModelConfig::new(64, 8, 16, 2, 1, 32, 0.0, num_classes)
    }

    #[test]
    fn test_forward_shape_is_batch_by_classes() {
        let device = default_device();
        let model: IssueModel<InferBackend> = tiny_config(5).init(&device);

        let ids = Tensor::<InferBackend, 1, Int>::from_ints(
            [1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 0, 0, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 8]);
        let mask = Tensor::<InferBackend, 1, Int>::from_ints(
            [1, 1, 1, 1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 8]);

        let logits = model.forward(ids, mask);
        assert_eq!(logits.dims(), [2, 5]);
    }

    #[test]
    fn test_all_padding_mask_does_not_panic() {
        // clamp_min on the token count keeps the pooling division finite
        let device = default_device();
        let model: IssueModel<InferBackend> = tiny_config(3).init(&device);

        let ids = Tensor::<InferBackend, 1, Int>::from_ints(
            [0, 0, 0, 0, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([1, 8]);
        let mask = ids.clone();

        let logits = model.forward(ids, mask);
        let values: Vec<f32> = logits.into_data().to_vec().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
