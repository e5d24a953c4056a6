//! Word n-gram (shingle) filter.
//!
//! Joins runs of adjacent tokens into single tokens so the vectorizer can
//! count phrases as well as words. With `min_size = max_size = 1` the stream
//! passes through unchanged.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::{Result, SpamsiftError};

/// Emits every n-gram of `min_size..=max_size` adjacent tokens.
///
/// Grams are ordered by start position, shortest first, and joined with a
/// single space.
///
/// # Examples
///
/// ```
/// use spamsift::analysis::token::Token;
/// use spamsift::analysis::token_filter::Filter;
/// use spamsift::analysis::token_filter::shingle::ShingleFilter;
///
/// let filter = ShingleFilter::new(1, 2).unwrap();
/// let tokens = vec![Token::new("win", 0), Token::new("cash", 1)];
/// let grams: Vec<String> = filter
///     .filter(Box::new(tokens.into_iter()))
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
///
/// assert_eq!(grams, vec!["win", "win cash", "cash"]);
/// ```
#[derive(Clone, Debug)]
pub struct ShingleFilter {
    min_size: usize,
    max_size: usize,
}

impl ShingleFilter {
    /// Create a new shingle filter.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_size` is 0 or `max_size` is less than `min_size`.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self> {
        if min_size == 0 {
            return Err(SpamsiftError::analysis("min_size must be at least 1"));
        }
        if max_size < min_size {
            return Err(SpamsiftError::analysis(format!(
                "max_size ({max_size}) must be >= min_size ({min_size})"
            )));
        }
        Ok(Self { min_size, max_size })
    }
}

impl Filter for ShingleFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        if self.min_size == 1 && self.max_size == 1 {
            return Ok(tokens);
        }

        let words: Vec<Token> = tokens.collect();
        let mut grams = Vec::new();

        for start in 0..words.len() {
            for size in self.min_size..=self.max_size {
                let end = start + size;
                if end > words.len() {
                    break;
                }
                let text = words[start..end]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                grams.push(Token::with_offsets(
                    text,
                    grams.len(),
                    words[start].start_offset,
                    words[end - 1].end_offset,
                ));
            }
        }

        Ok(Box::new(grams.into_iter()))
    }

    fn name(&self) -> &'static str {
        "shingle"
    }
}
