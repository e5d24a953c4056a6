//! Fits a [`Model`] on a labeled dataset.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::classifier::naive_bayes::{MultinomialNaiveBayes, NaiveBayesConfig};
use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamsiftError};
use crate::model::Model;
use crate::vectorizer::{BagOfWordsVectorizer, VectorizerConfig};

/// Vectorizer and classifier settings used for fitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trainer {
    pub vectorizer: VectorizerConfig,
    pub classifier: NaiveBayesConfig,
}

impl Trainer {
    pub fn new(vectorizer: VectorizerConfig, classifier: NaiveBayesConfig) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    /// Build the vocabulary from `dataset` and fit the classifier on it.
    ///
    /// Every call produces a fresh model; nothing is carried over from
    /// earlier fits.
    pub fn fit(&self, dataset: &Dataset) -> Result<Model> {
        if dataset.is_empty() {
            return Err(SpamsiftError::empty_dataset(dataset.name()));
        }

        let [spam, ham] = dataset.class_counts();
        info!(
            "Training on {} records ({} spam, {} ham)",
            dataset.len(),
            spam,
            ham
        );

        let texts: Vec<&str> = dataset.iter().map(|r| r.text.as_str()).collect();
        let labels: Vec<Label> = dataset.iter().map(|r| r.label).collect();

        let mut vectorizer = BagOfWordsVectorizer::new(self.vectorizer.clone())?;
        let features = vectorizer.fit_transform(&texts)?;
        if vectorizer.vocabulary_size() == 0 {
            return Err(SpamsiftError::EmptyVocabulary);
        }
        debug!("Vocabulary size: {}", vectorizer.vocabulary_size());

        let mut classifier = MultinomialNaiveBayes::new(self.classifier.clone());
        classifier.fit(&features, &labels)?;

        Ok(Model::new(vectorizer, classifier))
    }
}
