//! The train / persist / predict / evaluate workflow.
//!
//! A [`Pipeline`] owns at most one active [`Model`]. It starts empty, gets a
//! model from [`Pipeline::train`] or [`Pipeline::load_model`], and replaces it
//! wholesale on every later train or load. Pipelines share nothing, so
//! several can coexist in one process.

use std::fmt;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::dataset::cache::DatasetCache;
use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamsiftError};
use crate::evaluation::{EvaluationReport, Evaluator};
use crate::model::{Model, Prediction};
use crate::store::ModelStore;

/// Where the active model came from after [`Pipeline::load_or_train`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Read from the model artifact.
    Loaded,
    /// Fitted on the training data.
    Trained,
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Loaded => write!(f, "loaded"),
            ModelSource::Trained => write!(f, "trained"),
        }
    }
}

/// SMS spam classification pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    model: Option<Model>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    /// Create a pipeline with no active model.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The active model, if any.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn active_model(&self) -> Result<&Model> {
        self.model.as_ref().ok_or(SpamsiftError::NotFitted)
    }

    /// Load the training set through its cache and fit a new model.
    pub fn train(&mut self) -> Result<()> {
        let cache = DatasetCache::new(&self.config.train_data, &self.config.train_cache);
        let dataset = cache.load_or_build()?;
        self.train_on(&dataset)
    }

    /// Fit a new model on `dataset`. The previous model is kept on failure.
    pub fn train_on(&mut self, dataset: &Dataset) -> Result<()> {
        let model = self.config.trainer().fit(dataset)?;
        info!(
            "Training complete: {} terms in vocabulary",
            model.vectorizer().vocabulary_size()
        );
        self.model = Some(model);
        Ok(())
    }

    /// Predicted label for `text`.
    pub fn predict(&self, text: &str) -> Result<Label> {
        self.active_model()?.predict(text)
    }

    /// Predicted label and class distribution for `text`.
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        self.active_model()?.classify(text)
    }

    /// Evaluate the active model on the test set, read through its cache.
    pub fn evaluate(&self) -> Result<EvaluationReport> {
        let model = self.active_model()?;
        let cache = DatasetCache::new(&self.config.test_data, &self.config.test_cache);
        let dataset = cache.load_or_build()?;
        Evaluator::evaluate(model, &dataset)
    }

    /// Evaluate the active model on `dataset`.
    pub fn evaluate_on(&self, dataset: &Dataset) -> Result<EvaluationReport> {
        Evaluator::evaluate(self.active_model()?, dataset)
    }

    /// Save the active model to the configured path.
    pub fn save_model(&self) -> Result<()> {
        self.save_model_to(&self.config.model_path)
    }

    pub fn save_model_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        ModelStore::save(self.active_model()?, path)?;
        info!("Saved model: {}", path.display());
        Ok(())
    }

    /// Replace the active model with the one at the configured path.
    pub fn load_model(&mut self) -> Result<()> {
        let path = self.config.model_path.clone();
        self.load_model_from(path)
    }

    pub fn load_model_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let model = ModelStore::load(path)?;
        info!("Loaded model: {}", path.display());
        self.model = Some(model);
        Ok(())
    }

    /// Load the saved model, or train and save a new one when there is no
    /// usable artifact.
    ///
    /// Failing to save the fresh model is logged and not returned.
    pub fn load_or_train(&mut self) -> Result<ModelSource> {
        let path = self.config.model_path.clone();
        if path.exists() {
            match self.load_model_from(&path) {
                Ok(()) => return Ok(ModelSource::Loaded),
                Err(e) => warn!("Error loading model {}: {}", path.display(), e),
            }
        } else {
            info!("No saved model at {}, training a new one.", path.display());
        }

        self.train()?;
        if let Err(e) = self.save_model() {
            warn!("Error saving model {}: {}", path.display(), e);
        }
        Ok(ModelSource::Trained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn dataset() -> Dataset {
        Dataset::from_records(
            "t",
            vec![
                Record::new(Label::Spam, "win money now"),
                Record::new(Label::Ham, "let's meet for lunch"),
            ],
        )
    }

    #[test]
    fn test_unfitted_pipeline() {
        let pipeline = Pipeline::default();
        assert!(!pipeline.is_fitted());
        assert!(pipeline.model().is_none());
        assert!(pipeline.predict("hello").unwrap_err().is_not_fitted());
        assert!(pipeline.classify("hello").unwrap_err().is_not_fitted());
        assert!(pipeline.evaluate_on(&dataset()).unwrap_err().is_not_fitted());
        assert!(pipeline.save_model().unwrap_err().is_not_fitted());
    }

    #[test]
    fn test_train_on_and_predict() {
        let mut pipeline = Pipeline::default();
        pipeline.train_on(&dataset()).unwrap();

        assert!(pipeline.is_fitted());
        assert_eq!(pipeline.predict("win money now").unwrap(), Label::Spam);
        assert_eq!(pipeline.predict("let's meet for lunch").unwrap(), Label::Ham);
        assert!(matches!(pipeline.predict(""), Err(SpamsiftError::EmptyInput)));
    }

    #[test]
    fn test_failed_training_keeps_previous_model() {
        let mut pipeline = Pipeline::default();
        pipeline.train_on(&dataset()).unwrap();
        assert!(pipeline.train_on(&Dataset::new("empty")).is_err());
        assert_eq!(pipeline.predict("win money now").unwrap(), Label::Spam);
    }

    #[test]
    fn test_model_source_display() {
        assert_eq!(ModelSource::Loaded.to_string(), "loaded");
        assert_eq!(ModelSource::Trained.to_string(), "trained");
    }
}
