// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — fine-tunes the classifier on a labelled CSV
//   2. `classify` — classifies a single customer query

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{ClassifyArgs, Commands, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "issue-triage",
    version = "0.1.0",
    about = "Train a transformer issue classifier on labelled customer queries, then triage new issues."
)]
pub struct Cli {
    /// The subcommand to run (train or classify)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Classify(args) => Self::run_classify(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::service::TriageService;
        use crate::domain::categories::CategorySet;

        tracing::info!("Starting training on dataset: {}", args.dataset);

        let mut service = TriageService::new(args.into(), CategorySet::products())?;
        if service.train() {
            println!("Training complete. Weights saved.");
            Ok(())
        } else {
            // The root cause is already in the logs; exit non-zero
            // without a second stack of context.
            anyhow::bail!("training failed — see logs for details")
        }
    }

    /// Handles the `classify` subcommand.
    fn run_classify(args: ClassifyArgs) -> Result<()> {
        use crate::application::train_use_case::TrainConfig;
        use crate::application::service::TriageService;
        use crate::domain::categories::CategorySet;

        let config = TrainConfig {
            weights_dir: args.weights_dir.clone(),
            ..TrainConfig::default()
        };
        let service = TriageService::new(config, CategorySet::products())?;
        if !service.is_ready() {
            tracing::warn!("No trained weights found — predictions will be untrained noise");
        }

        let result = service.classify(&args.query)?;
        println!("\nQuery:    {}", args.query);
        println!("Category: {} (code: {})", result.name, result.index);
        println!("Top predictions:");
        for (name, prob) in &result.ranked {
            println!("  {name}: {prob:.3}");
        }
        Ok(())
    }
}
