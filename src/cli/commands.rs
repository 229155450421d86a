// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `serve` and `predict`
// and all their configurable flags.

use clap::{Args, Subcommand};

use crate::application::train_use_case::{SolverConfig, TrainConfig};
use crate::domain::feature_record::FeatureRecord;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the classifier on a CSV dataset and write the artifact
    Train(TrainArgs),

    /// Serve /predict and /health from a trained artifact
    Serve(ServeArgs),

    /// Classify one penguin from the command line
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with one row per penguin
    #[arg(long, default_value = "data/penguins.csv")]
    pub data: String,

    /// Where the trained artifact is written
    #[arg(long, default_value = "artifacts/model.json")]
    pub artifact: String,

    /// Label column
    #[arg(long, default_value = "species")]
    pub target: String,

    /// Share of rows held out for diagnostics
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Seed for the stratified split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Maximum optimiser steps
    #[arg(long, default_value_t = 1000)]
    pub max_iter: usize,

    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Stop once the loss changes less than this between steps
    #[arg(long, default_value_t = 1e-6)]
    pub tolerance: f64,

    /// Inverse L2 regularisation strength, smaller is stronger
    #[arg(long, default_value_t = 1.0)]
    pub c: f64,

    /// Optional CSV of per-class held-out metrics
    #[arg(long)]
    pub metrics_csv: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:     a.data,
            artifact_path: a.artifact,
            target:        a.target,
            test_fraction: a.test_fraction,
            seed:          a.seed,
            solver:        SolverConfig {
                max_iter:      a.max_iter,
                learning_rate: a.learning_rate,
                tolerance:     a.tolerance,
                c:             a.c,
            },
            metrics_csv:   a.metrics_csv,
        }
    }
}

/// All arguments for the `serve` command
#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "PENGUIN_ARTIFACT", default_value = "artifacts/model.json")]
    pub artifact: String,

    #[arg(long, env = "PENGUIN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "PENGUIN_PORT", default_value_t = 8000)]
    pub port: u16,
}

/// All arguments for the `predict` command.
/// Any feature left out is treated as a missing value.
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, default_value = "artifacts/model.json")]
    pub artifact: String,

    #[arg(long)]
    pub bill_length_mm: Option<f64>,

    #[arg(long)]
    pub bill_depth_mm: Option<f64>,

    #[arg(long)]
    pub flipper_length_mm: Option<f64>,

    #[arg(long)]
    pub body_mass_g: Option<f64>,

    #[arg(long)]
    pub island: Option<String>,

    #[arg(long)]
    pub sex: Option<String>,
}

impl PredictArgs {
    pub fn record(&self) -> FeatureRecord {
        FeatureRecord {
            bill_length_mm:    self.bill_length_mm,
            bill_depth_mm:     self.bill_depth_mm,
            flipper_length_mm: self.flipper_length_mm,
            body_mass_g:       self.body_mass_g,
            island:            self.island.clone(),
            sex:               self.sex.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["penguin-classifier", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();

        assert_eq!(cfg.data_path, "data/penguins.csv");
        assert_eq!(cfg.artifact_path, "artifacts/model.json");
        assert_eq!(cfg.target, "species");
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.solver, SolverConfig::default());
        assert!(cfg.metrics_csv.is_none());
    }

    #[test]
    fn test_predict_flags_build_record() {
        let cli = Cli::try_parse_from([
            "penguin-classifier",
            "predict",
            "--bill-length-mm",
            "44",
            "--island",
            "Biscoe",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        let record = args.record();

        assert_eq!(record.bill_length_mm, Some(44.0));
        assert_eq!(record.island.as_deref(), Some("Biscoe"));
        assert!(record.sex.is_none());
    }
}
