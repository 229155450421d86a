// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`   — fits the pipeline on a CSV and writes the artifact
//   2. `serve`   — loads the artifact and starts the HTTP service
//   3. `predict` — loads the artifact and classifies one record

pub mod commands;

use std::net::ToSocketAddrs;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, ServeArgs, TrainArgs};

use crate::api::ServeConfig;

#[derive(Parser, Debug)]
#[command(
    name = "penguin-classifier",
    version,
    about = "Train a penguin species classifier, then serve predictions over HTTP."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Serve(args)   => run_serve(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.data);

    let artifact = args.artifact.clone();
    let summary  = TrainUseCase::new(args.into()).execute()?;

    match summary.test_accuracy {
        Some(acc) => println!("Training complete. Artifact saved to {} (held-out accuracy {:.3}).", artifact, acc),
        None      => println!("Training complete. Artifact saved to {}.", artifact),
    }
    Ok(())
}

fn run_serve(args: ServeArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictionService;

    let addr = (args.host.as_str(), args.port)
        .to_socket_addrs()
        .with_context(|| format!("Cannot resolve {}:{}", args.host, args.port))?
        .next()
        .with_context(|| format!("No address for {}:{}", args.host, args.port))?;
    let config = ServeConfig { artifact_path: args.artifact, addr };

    // Loaded before the listener binds; never reloaded.
    let service = Arc::new(PredictionService::load(&config.artifact_path));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    runtime.block_on(crate::api::serve(service, config.addr));
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictionService;

    let service = PredictionService::try_load(&args.artifact)
        .with_context(|| format!("Cannot load model from '{}'", args.artifact))?;

    let prediction = service.predict(&args.record())?;

    println!("\nPrediction: {} (index {})", prediction.species, prediction.class_index);
    for (i, p) in prediction.probabilities.iter().enumerate() {
        println!("  class {}: {:.4}", i, p);
    }
    for u in &prediction.unknown_categories {
        println!("  unknown category: {}", u);
    }
    Ok(())
}
