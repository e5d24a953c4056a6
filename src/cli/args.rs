//! Command line argument parsing for the spamsift CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

/// Spamsift - SMS spam classification
#[derive(Parser, Debug, Clone)]
#[command(name = "spamsift")]
#[command(about = "Train, evaluate and run a Naive Bayes SMS spam classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpamsiftArgs {
    /// Verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "SPAMSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl SpamsiftArgs {
    /// Get the effective verbosity level (0=quiet, 1=normal, 2=debug, 3+=trace)
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load or train the model, classify the sample message and evaluate
    Run(RunArgs),

    /// Train a new model and save it
    Train(TrainArgs),

    /// Classify one or more messages
    Predict(PredictArgs),

    /// Evaluate the model on the test set
    Evaluate(EvaluateArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Run(RunArgs::default())
    }
}

/// Arguments for the default run
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Model artifact path
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Message to classify instead of the configured sample
    #[arg(long, value_name = "TEXT")]
    pub message: Option<String>,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Raw training data file
    #[arg(long, value_name = "FILE")]
    pub train_data: Option<PathBuf>,

    /// ARFF cache of the training data
    #[arg(long, value_name = "FILE")]
    pub train_cache: Option<PathBuf>,

    /// Model artifact path
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: Option<PathBuf>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Messages to classify
    #[arg(value_name = "TEXT", required = true, num_args = 1..)]
    pub texts: Vec<String>,

    /// Model artifact path
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: Option<PathBuf>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Raw test data file
    #[arg(long, value_name = "FILE")]
    pub test_data: Option<PathBuf>,

    /// ARFF cache of the test data
    #[arg(long, value_name = "FILE")]
    pub test_cache: Option<PathBuf>,

    /// Model artifact path
    #[arg(short, long, value_name = "MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Include per-class detail in human output
    #[arg(long)]
    pub details: bool,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn override_path(target: &mut PathBuf, value: &Option<PathBuf>) {
    if let Some(path) = value {
        *target = path.clone();
    }
}

impl Command {
    /// Apply the path flags of this command on top of `config`.
    pub fn apply_overrides(&self, config: &mut PipelineConfig) {
        match self {
            Command::Run(args) => {
                override_path(&mut config.model_path, &args.model);
                if let Some(message) = &args.message {
                    config.sample_message = message.clone();
                }
            }
            Command::Train(args) => {
                override_path(&mut config.train_data, &args.train_data);
                override_path(&mut config.train_cache, &args.train_cache);
                override_path(&mut config.model_path, &args.model);
            }
            Command::Predict(args) => override_path(&mut config.model_path, &args.model),
            Command::Evaluate(args) => {
                override_path(&mut config.test_data, &args.test_data);
                override_path(&mut config.test_cache, &args.test_cache);
                override_path(&mut config.model_path, &args.model);
            }
        }
    }
}
