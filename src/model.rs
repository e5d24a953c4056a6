//! The fitted composite model: vectorizer plus classifier.

use serde::{Deserialize, Serialize};

use crate::classifier::naive_bayes::MultinomialNaiveBayes;
use crate::classifier::{ClassDistribution, Classifier};
use crate::dataset::Label;
use crate::error::{Result, SpamsiftError};
use crate::vectorizer::{BagOfWordsVectorizer, FeatureVector};

/// Outcome of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub distribution: ClassDistribution,
}

impl Prediction {
    /// Probability of the predicted label.
    pub fn confidence(&self) -> f64 {
        self.distribution.probability(self.label)
    }
}

/// A fitted vectorizer and the classifier trained on its features.
///
/// Both halves are always used together: a classifier is only meaningful
/// for vectors produced by the vocabulary it was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    vectorizer: BagOfWordsVectorizer,
    classifier: MultinomialNaiveBayes,
}

impl Model {
    /// Pair a vectorizer with a classifier fitted on its output.
    pub fn new(vectorizer: BagOfWordsVectorizer, classifier: MultinomialNaiveBayes) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn vectorizer(&self) -> &BagOfWordsVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &MultinomialNaiveBayes {
        &self.classifier
    }

    /// Check that the classifier is fitted and matches the vocabulary.
    pub fn validate(&self) -> Result<()> {
        if !self.classifier.is_fitted() || !self.classifier.is_consistent() {
            return Err(SpamsiftError::corrupt_model("classifier parameters are incomplete"));
        }
        if self.classifier.n_features() != self.vectorizer.vocabulary_size() {
            return Err(SpamsiftError::corrupt_model(format!(
                "classifier has {} features but the vocabulary has {} terms",
                self.classifier.n_features(),
                self.vectorizer.vocabulary_size()
            )));
        }
        Ok(())
    }

    /// Apply the stored transform to one text.
    pub fn vectorize(&self, text: &str) -> Result<FeatureVector> {
        self.vectorizer.transform(text)
    }

    /// Class distribution for a text.
    ///
    /// Texts with no known tokens are scored on the class priors alone.
    pub fn distribution(&self, text: &str) -> Result<ClassDistribution> {
        if text.trim().is_empty() {
            return Err(SpamsiftError::EmptyInput);
        }
        self.classifier.distribution(&self.vectorize(text)?)
    }

    /// Predicted label for a text.
    pub fn predict(&self, text: &str) -> Result<Label> {
        Ok(self.distribution(text)?.label())
    }

    /// Predicted label together with its distribution.
    pub fn classify(&self, text: &str) -> Result<Prediction> {
        let distribution = self.distribution(text)?;
        Ok(Prediction {
            label: distribution.label(),
            distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Record};
    use crate::trainer::Trainer;

    fn model() -> Model {
        let dataset = Dataset::from_records(
            "t",
            vec![
                Record::new(Label::Spam, "win money now"),
                Record::new(Label::Ham, "let's meet for lunch"),
            ],
        );
        Trainer::default().fit(&dataset).unwrap()
    }

    #[test]
    fn test_memorized_examples() {
        let model = model();
        assert_eq!(model.predict("win money now").unwrap(), Label::Spam);
        assert_eq!(model.predict("let's meet for lunch").unwrap(), Label::Ham);
    }

    #[test]
    fn test_empty_input() {
        let model = model();
        assert!(matches!(model.predict(""), Err(SpamsiftError::EmptyInput)));
        assert!(matches!(model.classify("  \t"), Err(SpamsiftError::EmptyInput)));
    }

    #[test]
    fn test_unknown_tokens_use_priors() {
        let model = model();
        // Equal priors, no known tokens: tie goes to spam.
        assert_eq!(model.predict("zzz qqq").unwrap(), Label::Spam);
    }

    #[test]
    fn test_classify_confidence() {
        let prediction = model().classify("WIN MONEY").unwrap();
        assert_eq!(prediction.label, Label::Spam);
        assert!(prediction.confidence() > 0.5);
    }
}
