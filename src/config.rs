//! Pipeline configuration.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! {
//!   "model_path": "out/model.dat",
//!   "classifier": { "alpha": 0.5 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::classifier::naive_bayes::NaiveBayesConfig;
use crate::error::{Result, SpamsiftError};
use crate::trainer::Trainer;
use crate::vectorizer::VectorizerConfig;

/// Default raw training data.
pub const DEFAULT_TRAIN_DATA: &str = "dataset/train.txt";
/// Default ARFF cache of the training data.
pub const DEFAULT_TRAIN_CACHE: &str = "dataset/train.arff";
/// Default raw test data.
pub const DEFAULT_TEST_DATA: &str = "dataset/test.txt";
/// Default ARFF cache of the test data.
pub const DEFAULT_TEST_CACHE: &str = "dataset/test.arff";
/// Default model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/sms.dat";
/// Message classified by the default run.
pub const DEFAULT_SAMPLE_MESSAGE: &str = "Ini adalah pesan email spam yang ingin Anda uji.";

/// File locations and model settings for a [`crate::pipeline::Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub train_data: PathBuf,
    pub train_cache: PathBuf,
    pub test_data: PathBuf,
    pub test_cache: PathBuf,
    pub model_path: PathBuf,
    /// Message classified and logged by the default run.
    pub sample_message: String,
    pub vectorizer: VectorizerConfig,
    pub classifier: NaiveBayesConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            train_data: PathBuf::from(DEFAULT_TRAIN_DATA),
            train_cache: PathBuf::from(DEFAULT_TRAIN_CACHE),
            test_data: PathBuf::from(DEFAULT_TEST_DATA),
            test_cache: PathBuf::from(DEFAULT_TEST_CACHE),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            sample_message: DEFAULT_SAMPLE_MESSAGE.to_string(),
            vectorizer: VectorizerConfig::default(),
            classifier: NaiveBayesConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON configuration file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            SpamsiftError::parse(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check the model settings.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.classifier.validate()
    }

    /// Trainer built from the model settings.
    pub fn trainer(&self) -> Trainer {
        Trainer::new(self.vectorizer.clone(), self.classifier.clone())
    }
}
