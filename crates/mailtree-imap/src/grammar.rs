//! Response grammar used while extracting a message.
//!
//! The extractor needs two things from the protocol layer: a way to split
//! the leading status line into tokens, and a way to recognize command
//! completion lines that can turn up inside a buffered response.

use std::collections::VecDeque;

use crate::Result;
use crate::lexer;

/// Protocol hooks for the extractor.
pub trait ResponseGrammar {
    /// Splits a status line into tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the line cannot be tokenized.
    fn tokenize(&self, line: &str) -> Result<VecDeque<String>>;

    /// Checks whether a normalized line (sequence prefix stripped,
    /// lower-cased) marks the end of a command's response.
    fn is_end_of_sequence(&self, line: &str) -> bool;
}

/// Standard IMAP4 grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImapGrammar;

const STATUS_WORDS: [&str; 3] = ["ok", "no", "bad"];

impl ResponseGrammar for ImapGrammar {
    fn tokenize(&self, line: &str) -> Result<VecDeque<String>> {
        lexer::tokenize(line)
    }

    fn is_end_of_sequence(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            // "OK FETCH completed" once a numeric tag has been stripped
            [status, _, ..] if STATUS_WORDS.contains(status) => true,
            // "a001 OK FETCH completed"; a header name always carries its colon
            [tag, status, .., last] if !tag.contains(':') && STATUS_WORDS.contains(status) => {
                last.starts_with("completed") || last.starts_with("success")
            }
            _ => false,
        }
    }
}
