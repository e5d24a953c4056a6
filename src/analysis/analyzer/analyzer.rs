//! Core analyzer trait definition.
//!
//! An [`Analyzer`] is the complete text processing pipeline the vectorizer
//! runs over every message:
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Term Counts
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 ... Filter N
//! ```
//!
//! # Examples
//!
//! ```
//! use spamsift::analysis::analyzer::analyzer::Analyzer;
//! use spamsift::analysis::token::TokenStream;
//! use spamsift::error::Result;
//!
//! struct SilentAnalyzer;
//!
//! impl Analyzer for SilentAnalyzer {
//!     fn analyze(&self, _text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "silent"
//!     }
//! }
//!
//! assert_eq!(SilentAnalyzer.analyze("anything").unwrap().count(), 0);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so an analyzer can live inside a shared
/// vectorizer.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    ///
    /// This runs tokenization followed by every configured filter.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
