//! Multinomial Naive Bayes.
//!
//! Class priors use Laplace smoothing, `(n_c + 1) / (N + K)`. Token
//! likelihoods use additive smoothing,
//! `(count(t, c) + alpha) / (total(c) + alpha * |V|)`, so no token seen in
//! training ever has zero probability for a class. All parameters are kept
//! as natural logs.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{ClassDistribution, Classifier};
use crate::dataset::Label;
use crate::error::{Result, SpamsiftError};
use crate::vectorizer::FeatureVector;

/// Configuration for [`MultinomialNaiveBayes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NaiveBayesConfig {
    /// Additive smoothing for token likelihoods (1.0 is Laplace).
    pub alpha: f64,
}

impl Default for NaiveBayesConfig {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl NaiveBayesConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamsiftError::invalid_config(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }
        Ok(())
    }
}

/// Multinomial Naive Bayes over sparse count vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNaiveBayes {
    config: NaiveBayesConfig,
    n_features: usize,
    class_counts: [usize; Label::COUNT],
    class_log_prior: [f64; Label::COUNT],
    /// `feature_log_prob[feature][class]`
    feature_log_prob: Vec<[f64; Label::COUNT]>,
    fitted: bool,
}

impl Default for MultinomialNaiveBayes {
    fn default() -> Self {
        Self::new(NaiveBayesConfig::default())
    }
}

impl MultinomialNaiveBayes {
    pub fn new(config: NaiveBayesConfig) -> Self {
        Self {
            config,
            n_features: 0,
            class_counts: [0; Label::COUNT],
            class_log_prior: [0.0; Label::COUNT],
            feature_log_prob: Vec::new(),
            fitted: false,
        }
    }

    pub fn config(&self) -> &NaiveBayesConfig {
        &self.config
    }

    /// Number of features the model was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Training records seen per class.
    pub fn class_counts(&self) -> [usize; Label::COUNT] {
        self.class_counts
    }

    /// Log prior of one class.
    pub fn class_log_prior(&self, label: Label) -> f64 {
        self.class_log_prior[label.index()]
    }

    /// Log likelihood of a feature given a class.
    pub fn feature_log_prob(&self, feature: usize, label: Label) -> Option<f64> {
        self.feature_log_prob
            .get(feature)
            .map(|per_class| per_class[label.index()])
    }

    /// Whether the stored parameters agree with each other.
    pub fn is_consistent(&self) -> bool {
        self.feature_log_prob.len() == self.n_features
            && self.class_log_prior.iter().all(|p| p.is_finite())
    }

    fn log_scores(&self, features: &FeatureVector) -> [f64; Label::COUNT] {
        let mut scores = self.class_log_prior;
        for (index, value) in features.iter() {
            let per_class = &self.feature_log_prob[index];
            for (score, log_prob) in scores.iter_mut().zip(per_class) {
                *score += value * log_prob;
            }
        }
        scores
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn fit(&mut self, features: &[FeatureVector], labels: &[Label]) -> Result<()> {
        self.config.validate()?;
        if features.is_empty() {
            return Err(SpamsiftError::empty_dataset("no training vectors"));
        }
        if features.len() != labels.len() {
            return Err(SpamsiftError::invalid_config(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let n_features = features[0].dimension();
        let mut class_counts = [0usize; Label::COUNT];
        let mut token_counts = vec![[0.0f64; Label::COUNT]; n_features];
        let mut class_totals = [0.0f64; Label::COUNT];

        for (vector, label) in features.iter().zip(labels) {
            if vector.dimension() != n_features {
                return Err(SpamsiftError::DimensionMismatch {
                    expected: n_features,
                    actual: vector.dimension(),
                });
            }
            let class = label.index();
            class_counts[class] += 1;
            for (index, value) in vector.iter() {
                token_counts[index][class] += value;
                class_totals[class] += value;
            }
        }

        let n_records = features.len() as f64;
        let n_classes = Label::COUNT as f64;
        let class_log_prior =
            class_counts.map(|count| ((count as f64 + 1.0) / (n_records + n_classes)).ln());

        let alpha = self.config.alpha;
        let denominators = class_totals.map(|total| (total + alpha * n_features as f64).ln());
        let feature_log_prob = token_counts
            .into_iter()
            .map(|per_class| {
                let mut log_probs = [0.0; Label::COUNT];
                for class in 0..Label::COUNT {
                    log_probs[class] = (per_class[class] + alpha).ln() - denominators[class];
                }
                log_probs
            })
            .collect();

        debug!(
            "Fitted naive bayes: {} features, class counts {:?}",
            n_features, class_counts
        );

        self.n_features = n_features;
        self.class_counts = class_counts;
        self.class_log_prior = class_log_prior;
        self.feature_log_prob = feature_log_prob;
        self.fitted = true;
        Ok(())
    }

    fn distribution(&self, features: &FeatureVector) -> Result<ClassDistribution> {
        if !self.fitted {
            return Err(SpamsiftError::NotFitted);
        }
        if features.dimension() != self.n_features {
            return Err(SpamsiftError::DimensionMismatch {
                expected: self.n_features,
                actual: features.dimension(),
            });
        }
        Ok(ClassDistribution::from_log_scores(self.log_scores(features)))
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn name(&self) -> &'static str {
        "multinomial_naive_bayes"
    }
}
