// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch AdamW fine-tuning over the issue dataset.
//
// Key Burn 0.20 insight:
//   - Training uses TrainBackend (Autodiff<InferBackend>) for gradients
//   - model.valid() returns the model on InferBackend with dropout
//     disabled, which is what gets persisted and smoke-tested
//
// The learning rate is passed to optim.step() per step, which is
// where the linear warmup is applied: the rate ramps from ~0 to
// the configured value over warmup_steps, then stays constant.
// Weight decay is handled by AdamW itself (decoupled decay).
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::IssueBatcher, dataset::IssueDataset, encoder::TextEncoder};
use crate::domain::categories::CategorySet;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
    weights::WeightStore,
};
use crate::ml::inferencer::Inferencer;
use crate::ml::model::IssueModelConfig;
use crate::ml::{default_device, TrainBackend};

/// Fixed diagnostic queries run through the freshly trained model.
/// Predictions are logged, never asserted — a bad answer here is a
/// signal to look at the data, not a training failure.
const SMOKE_TEST_QUERIES: &[&str] = &[
    "How do I connect my printer to WiFi?",
    "The scanner is not working",
    "Laptop battery not charging",
    "Monitor display is blank",
];

/// Per-step learning rate with linear warmup: ramps to `base_lr`
/// over `warmup_steps` optimiser steps, constant afterwards.
/// `step` counts completed steps (0 for the first).
pub fn warmup_learning_rate(base_lr: f64, step: usize, warmup_steps: usize) -> f64 {
    if warmup_steps == 0 || step >= warmup_steps {
        base_lr
    } else {
        base_lr * (step + 1) as f64 / warmup_steps as f64
    }
}

pub fn run_training(
    cfg: &TrainConfig,
    dataset: IssueDataset,
    encoder: &TextEncoder,
    categories: &CategorySet,
    ckpt_manager: &CheckpointManager,
    weight_store: &WeightStore,
) -> Result<()> {
    if dataset.example_count() == 0 {
        anyhow::bail!("training dataset is empty");
    }

    let device = default_device();
    tracing::info!("Using device: {:?}", device);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = IssueModelConfig::new(
        cfg.vocab_size, cfg.max_seq_len, cfg.d_model,
        cfg.num_heads, cfg.num_layers, cfg.d_ff, cfg.dropout,
        categories.len(),
    );
    let mut model = model_cfg.init::<TrainBackend>(&device);
    tracing::info!(
        "Model ready: {} layers, d_model={}, {} categories",
        cfg.num_layers, cfg.d_model, categories.len(),
    );

    // ── AdamW optimiser ───────────────────────────────────────────────────────
    let optim_cfg = AdamWConfig::new()
        .with_epsilon(1e-8)
        .with_weight_decay(cfg.weight_decay as f32);
    let mut optim = optim_cfg.init();

    // ── Training data loader ──────────────────────────────────────────────────
    let loader = DataLoaderBuilder::<TrainBackend, _, _>::new(IssueBatcher::new())
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .set_device(device.clone())
        .build(dataset);

    let metrics = MetricsLogger::new(&cfg.weights_dir)?;
    let mut global_step = 0usize;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batch_count = 0usize;
        let mut lr = cfg.learning_rate;

        for batch in loader.iter() {
            let (loss, _logits) = model.forward_loss(
                batch.input_ids,
                batch.attention_mask,
                batch.labels,
            );

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batch_count += 1;

            // Backward pass + AdamW update at the warmed-up rate
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            lr = warmup_learning_rate(cfg.learning_rate, global_step, cfg.warmup_steps);
            model = optim.step(lr, model, grads);
            global_step += 1;

            if cfg.checkpoint_steps > 0 && global_step % cfg.checkpoint_steps == 0 {
                ckpt_manager.save_step(&model, global_step)?;
            }
        }

        let avg_loss = if batch_count > 0 {
            loss_sum / batch_count as f64
        } else {
            f64::NAN
        };

        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | lr={:.2e}",
            epoch, cfg.epochs, avg_loss, lr,
        );
        metrics.log(&EpochMetrics { epoch, train_loss: avg_loss, learning_rate: lr })?;
    }

    // ── Persist final weights ─────────────────────────────────────────────────
    // valid() drops the autodiff graph and disables dropout; that
    // evaluation-mode copy is what inference will load.
    let trained = model.valid();
    weight_store.save(&trained)?;
    tracing::info!("Training complete after {} steps", global_step);

    // ── Smoke test (non-fatal diagnostics) ────────────────────────────────────
    let inferencer = Inferencer::new(trained, encoder.clone(), categories.clone(), device);
    for query in SMOKE_TEST_QUERIES {
        match inferencer.classify(query) {
            Ok(result) => tracing::info!(
                "Smoke test: '{}' → {} (code: {})",
                query, result.name, result.index,
            ),
            Err(e) => tracing::warn!("Smoke test query '{}' failed: {e:#}", query),
        }
    }

    Ok(())
}
