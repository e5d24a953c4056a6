//! Text analysis module for spamsift.
//!
//! Turns raw message text into the token stream the vectorizer counts.
//! The pieces compose the same way everywhere:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Tokens
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
