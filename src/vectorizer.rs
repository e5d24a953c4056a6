//! Bag-of-words vectorizer.
//!
//! The vectorizer owns the text-to-feature transform: the analysis settings
//! ([`VectorizerConfig`]) and the vocabulary fitted on the training corpus.
//! Both are serialized with the model so that prediction reuses exactly the
//! transform the classifier was trained on. Tokens missing from the
//! vocabulary are ignored.
//!
//! # Examples
//!
//! ```
//! use spamsift::vectorizer::{BagOfWordsVectorizer, VectorizerConfig};
//!
//! let mut vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
//! vectorizer.fit(["Win money now", "let's meet for lunch"]).unwrap();
//!
//! let features = vectorizer.transform("WIN win unknownword").unwrap();
//! let win = vectorizer.term_index("win").unwrap();
//! assert_eq!(features.get(win), 2.0);
//! assert_eq!(features.nnz(), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::shingle::ShingleFilter;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::error::{Result, SpamsiftError};

/// Settings of the text-to-feature transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Regex matching the delimiters between tokens.
    pub token_boundary_pattern: String,
    /// Smallest word n-gram counted.
    pub ngram_min: usize,
    /// Largest word n-gram counted.
    pub ngram_max: usize,
    /// Count occurrences; when false, features are 0/1 presence flags.
    pub word_counts: bool,
    /// Terms seen fewer times than this in the training corpus are dropped.
    pub min_term_freq: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            lowercase: true,
            token_boundary_pattern: r"\W+".to_string(),
            ngram_min: 1,
            ngram_max: 1,
            word_counts: true,
            min_term_freq: 1,
        }
    }
}

impl VectorizerConfig {
    /// Check the settings without building anything.
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 {
            return Err(SpamsiftError::invalid_config("ngram_min must be at least 1"));
        }
        if self.ngram_max < self.ngram_min {
            return Err(SpamsiftError::invalid_config(format!(
                "ngram_max ({}) must be >= ngram_min ({})",
                self.ngram_max, self.ngram_min
            )));
        }
        regex::Regex::new(&self.token_boundary_pattern).map_err(|e| {
            SpamsiftError::invalid_config(format!("token_boundary_pattern: {e}"))
        })?;
        Ok(())
    }

    /// Build the analyzer described by these settings.
    pub fn build_analyzer(&self) -> Result<PipelineAnalyzer> {
        self.validate()?;

        let tokenizer = RegexTokenizer::new(&self.token_boundary_pattern)?;
        let mut analyzer = PipelineAnalyzer::new(Arc::new(tokenizer)).with_name("bag_of_words");
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if (self.ngram_min, self.ngram_max) != (1, 1) {
            analyzer = analyzer.add_filter(Arc::new(ShingleFilter::new(
                self.ngram_min,
                self.ngram_max,
            )?));
        }
        Ok(analyzer)
    }
}

/// Sparse feature vector aligned to a fitted vocabulary.
///
/// Entries are sorted by feature index and never hold zero values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from `(index, value)` pairs.
    ///
    /// Pairs are sorted, duplicates summed and zeros dropped.
    pub fn from_pairs(dimension: usize, pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut dense: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, value) in pairs {
            *dense.entry(index).or_insert(0.0) += value;
        }
        FeatureVector {
            dimension,
            entries: dense.into_iter().filter(|(_, v)| *v != 0.0).collect(),
        }
    }

    /// Size of the vocabulary this vector is aligned to.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at `index`, zero when absent.
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }
}

/// Serialized form of a fitted vectorizer; the analyzer is rebuilt from
/// `config` on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorizerState {
    pub config: VectorizerConfig,
    pub vocabulary: BTreeMap<String, usize>,
}

/// Closed-vocabulary bag-of-words vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerState", into = "VectorizerState")]
pub struct BagOfWordsVectorizer {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    analyzer: PipelineAnalyzer,
}

impl BagOfWordsVectorizer {
    /// Create an unfitted vectorizer.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        let analyzer = config.build_analyzer()?;
        Ok(Self {
            config,
            vocabulary: BTreeMap::new(),
            analyzer,
        })
    }

    /// Build the vocabulary from a training corpus, replacing any previous one.
    ///
    /// Feature indexes follow the sorted order of the terms, so the same
    /// corpus always yields the same vocabulary.
    pub fn fit<'a, I>(&mut self, documents: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut term_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            for token in self.analyzer.analyze(doc)? {
                *term_freq.entry(token.text).or_insert(0) += 1;
            }
        }

        let min_freq = self.config.min_term_freq;
        self.vocabulary = term_freq
            .into_iter()
            .filter(|(_, freq)| *freq >= min_freq)
            .enumerate()
            .map(|(index, (term, _))| (term, index))
            .collect();

        Ok(())
    }

    /// Transform one document into a feature vector over the fitted vocabulary.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.analyzer.analyze(document)? {
            if let Some(&index) = self.vocabulary.get(&token.text) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        if !self.config.word_counts {
            counts.values_mut().for_each(|v| *v = 1.0);
        }

        Ok(FeatureVector::from_pairs(self.vocabulary.len(), counts))
    }

    /// Fit on the corpus, then transform every document of it.
    pub fn fit_transform(&mut self, documents: &[&str]) -> Result<Vec<FeatureVector>> {
        self.fit(documents.iter().copied())?;
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Feature index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Terms in feature-index order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }
}

impl TryFrom<VectorizerState> for BagOfWordsVectorizer {
    type Error = SpamsiftError;

    fn try_from(state: VectorizerState) -> Result<Self> {
        let analyzer = state.config.build_analyzer()?;
        let size = state.vocabulary.len();
        if state.vocabulary.values().any(|&index| index >= size) {
            return Err(SpamsiftError::corrupt_model("vocabulary index out of range"));
        }
        Ok(Self {
            config: state.config,
            vocabulary: state.vocabulary,
            analyzer,
        })
    }
}

impl From<BagOfWordsVectorizer> for VectorizerState {
    fn from(vectorizer: BagOfWordsVectorizer) -> Self {
        VectorizerState {
            config: vectorizer.config,
            vocabulary: vectorizer.vocabulary,
        }
    }
}
