//! Error types for the spamsift library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SpamsiftError`] enum. The variants keep "nothing was trained yet",
//! "the input was unusable" and "the file system failed" apart so callers can
//! decide how to degrade.
//!
//! # Examples
//!
//! ```
//! use spamsift::error::{Result, SpamsiftError};
//!
//! fn classify(text: &str) -> Result<()> {
//!     if text.trim().is_empty() {
//!         return Err(SpamsiftError::EmptyInput);
//!     }
//!     Ok(())
//! }
//!
//! assert!(classify("").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for spamsift operations.
#[derive(Error, Debug)]
pub enum SpamsiftError {
    /// I/O errors (missing dataset, unreadable model artifact, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed content in a cache file or other structured input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration values that cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Analysis-related errors (tokenizer construction, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A dataset with no usable records was given to training or evaluation
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// Training produced no features at all
    #[error("Vocabulary is empty after fitting")]
    EmptyVocabulary,

    /// Text to classify was empty
    #[error("Input text is empty")]
    EmptyInput,

    /// Prediction or evaluation was requested before a model was trained or loaded
    #[error("Model is not fitted")]
    NotFitted,

    /// A feature vector does not match the fitted vocabulary
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Model artifact exists but cannot be decoded
    #[error("Corrupt model artifact: {0}")]
    CorruptModel(String),

    /// Binary serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with SpamsiftError.
pub type Result<T> = std::result::Result<T, SpamsiftError>;

impl SpamsiftError {
    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        SpamsiftError::Parse(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SpamsiftError::InvalidConfig(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SpamsiftError::Analysis(msg.into())
    }

    /// Create a new empty dataset error.
    pub fn empty_dataset<S: Into<String>>(name: S) -> Self {
        SpamsiftError::EmptyDataset(name.into())
    }

    /// Create a new corrupt model error.
    pub fn corrupt_model<S: Into<String>>(msg: S) -> Self {
        SpamsiftError::CorruptModel(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SpamsiftError::Serialization(msg.into())
    }

    /// True when the error means no model was available.
    pub fn is_not_fitted(&self) -> bool {
        matches!(self, SpamsiftError::NotFitted)
    }

    /// True for file system failures.
    pub fn is_io(&self) -> bool {
        matches!(self, SpamsiftError::Io(_))
    }
}

impl From<bincode::Error> for SpamsiftError {
    fn from(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(io_err) => SpamsiftError::Io(io_err),
            other => SpamsiftError::Serialization(other.to_string()),
        }
    }
}
