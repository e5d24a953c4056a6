//! # Spamsift
//!
//! SMS spam classification with a bag-of-words multinomial Naive Bayes
//! pipeline.
//!
//! ## Features
//!
//! - Raw two-column dataset loader with an ARFF read-through cache
//! - Regex tokenization, lowercasing and word n-grams through a text analysis pipeline
//! - Multinomial Naive Bayes with additive smoothing
//! - Versioned binary model artifacts
//! - Evaluation summary, confusion matrix and per-class detail
//!
//! ## Example
//!
//! ```
//! use spamsift::prelude::*;
//!
//! let train = Dataset::from_records(
//!     "train",
//!     vec![
//!         Record::new(Label::Spam, "win money now"),
//!         Record::new(Label::Ham, "let's meet for lunch"),
//!     ],
//! );
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default());
//! pipeline.train_on(&train).unwrap();
//! assert_eq!(pipeline.predict("WIN MONEY").unwrap(), Label::Spam);
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod trainer;
pub mod vectorizer;

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::dataset::{Dataset, Label, Record};
    pub use crate::error::{Result, SpamsiftError};
    pub use crate::evaluation::EvaluationReport;
    pub use crate::model::{Model, Prediction};
    pub use crate::pipeline::{ModelSource, Pipeline};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
