// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `classify`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune the classifier on a labelled query CSV
    Train(TrainArgs),

    /// Classify a customer query using the trained model
    Classify(ClassifyArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with Query and Product columns
    #[arg(long, default_value = "data/customer_queries.csv")]
    pub dataset: String,

    /// Directory for trained weights, tokenizer and checkpoints
    #[arg(long, default_value = "data/results")]
    pub weights_dir: String,

    /// Maximum number of tokens per query sequence
    /// Format: [CLS] query [SEP] + padding
    #[arg(long, default_value_t = 256)]
    pub max_seq_len: usize,

    /// Number of queries processed together in one forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Peak learning rate, reached after warmup
    #[arg(long, default_value_t = 1e-4)]
    pub learning_rate: f64,

    /// Optimiser steps over which the learning rate ramps up from
    /// zero — stabilises the early, noisiest part of training
    #[arg(long, default_value_t = 500)]
    pub warmup_steps: usize,

    /// Decoupled weight decay applied by AdamW
    #[arg(long, default_value_t = 0.01)]
    pub weight_decay: f64,

    /// Save a rolling checkpoint every this many steps (0 = off)
    #[arg(long, default_value_t = 10_000)]
    pub checkpoint_steps: usize,

    /// How many rolling checkpoints to keep on disk
    #[arg(long, default_value_t = 2)]
    pub keep_checkpoints: usize,

    /// Hidden dimension of the transformer (d_model)
    #[arg(long, default_value_t = 128)]
    pub d_model: usize,

    /// Number of attention heads — d_model must be divisible by this
    #[arg(long, default_value_t = 4)]
    pub num_heads: usize,

    /// Number of stacked encoder layers
    #[arg(long, default_value_t = 2)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network
    #[arg(long, default_value_t = 512)]
    pub d_ff: usize,

    /// Dropout probability during training
    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Total number of token ids the model can recognise
    #[arg(long, default_value_t = 8192)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_path:     a.dataset,
            weights_dir:      a.weights_dir,
            max_seq_len:      a.max_seq_len,
            batch_size:       a.batch_size,
            epochs:           a.epochs,
            learning_rate:    a.learning_rate,
            warmup_steps:     a.warmup_steps,
            weight_decay:     a.weight_decay,
            checkpoint_steps: a.checkpoint_steps,
            keep_checkpoints: a.keep_checkpoints,
            d_model:          a.d_model,
            num_heads:        a.num_heads,
            num_layers:       a.num_layers,
            d_ff:             a.d_ff,
            dropout:          a.dropout,
            vocab_size:       a.vocab_size,
        }
    }
}

/// All arguments for the `classify` command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// The customer query to classify
    #[arg(long)]
    pub query: String,

    /// Directory where weights were saved during training
    #[arg(long, default_value = "data/results")]
    pub weights_dir: String,
}
