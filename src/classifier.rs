//! Classifiers over bag-of-words feature vectors.
//!
//! The [`Classifier`] trait is the seam between the pipeline and the learning
//! algorithm: anything that can be fitted on feature vectors and produce a
//! class distribution can stand in for [`naive_bayes::MultinomialNaiveBayes`].

pub mod naive_bayes;

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::Result;
use crate::vectorizer::FeatureVector;

/// Posterior probability of each class, indexed like [`Label::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassDistribution {
    probabilities: [f64; Label::COUNT],
}

impl ClassDistribution {
    pub fn new(probabilities: [f64; Label::COUNT]) -> Self {
        Self { probabilities }
    }

    /// Normalize natural-log scores into probabilities.
    pub fn from_log_scores(scores: [f64; Label::COUNT]) -> Self {
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut probabilities = scores.map(|s| (s - max).exp());
        let sum: f64 = probabilities.iter().sum();
        probabilities.iter_mut().for_each(|p| *p /= sum);
        Self { probabilities }
    }

    /// Probability of one label.
    pub fn probability(&self, label: Label) -> f64 {
        self.probabilities[label.index()]
    }

    pub fn as_array(&self) -> &[f64; Label::COUNT] {
        &self.probabilities
    }

    /// Most probable label. Ties go to the label declared first.
    pub fn label(&self) -> Label {
        let mut best = Label::ALL[0];
        for label in Label::ALL.into_iter().skip(1) {
            if self.probability(label) > self.probability(best) {
                best = label;
            }
        }
        best
    }
}

/// A classifier trained on feature vectors.
pub trait Classifier {
    /// Fit on aligned feature vectors and labels, replacing any previous state.
    fn fit(&mut self, features: &[FeatureVector], labels: &[Label]) -> Result<()>;

    /// Posterior class distribution for one feature vector.
    fn distribution(&self, features: &FeatureVector) -> Result<ClassDistribution>;

    /// Most probable label for one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        Ok(self.distribution(features)?.label())
    }

    /// Whether `fit` has completed successfully.
    fn is_fitted(&self) -> bool;

    /// Get the name of this classifier (for debugging and configuration).
    fn name(&self) -> &'static str;
}
