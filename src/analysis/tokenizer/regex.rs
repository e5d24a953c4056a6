//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, SpamsiftError};

/// Splits text on a boundary regex.
///
/// Matches of the pattern are delimiters; the non-empty runs of text between
/// them become the tokens, numbered from 0 in order of appearance.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    boundary: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a tokenizer that splits on matches of `boundary`.
    pub fn new(boundary: &str) -> Result<Self> {
        let boundary = Regex::new(boundary)
            .map_err(|e| SpamsiftError::analysis(format!("Invalid regex pattern: {e}")))?;
        Ok(RegexTokenizer {
            boundary: Arc::new(boundary),
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut last_end = 0;

        for mat in self.boundary.find_iter(text) {
            if mat.start() > last_end {
                tokens.push(Token::with_offsets(
                    &text[last_end..mat.start()],
                    tokens.len(),
                    last_end,
                    mat.start(),
                ));
            }
            last_end = mat.end();
        }

        if last_end < text.len() {
            tokens.push(Token::with_offsets(
                &text[last_end..],
                tokens.len(),
                last_end,
                text.len(),
            ));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_non_word_characters() {
        let tokenizer = RegexTokenizer::new(r"\W+").unwrap();
        let tokens: Vec<Token> = tokenizer
            .tokenize("let's meet, for LUNCH!!")
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["let", "s", "meet", "for", "LUNCH"]);

        assert_eq!(tokens[2].position, 2);
        assert_eq!(tokens[2].start_offset, 6);
        assert_eq!(tokens[2].end_offset, 10);
    }

    #[test]
    fn test_delimiters_only() {
        let tokenizer = RegexTokenizer::new(r"\W+").unwrap();
        assert_eq!(tokenizer.tokenize("?! ...").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RegexTokenizer::new("(").unwrap_err();
        assert!(matches!(err, SpamsiftError::Analysis(_)));
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(RegexTokenizer::new(r"\s+").unwrap().name(), "regex");
    }
}
