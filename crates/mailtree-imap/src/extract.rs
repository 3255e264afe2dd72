//! Message extraction from `FETCH BODY[]` responses.
//!
//! A response arrives as buffered lines: the untagged status line
//! `* 12 FETCH (BODY[] {3456}` followed by the raw message. The extractor
//! validates the status line, then hands the rest to the MIME parser.
//!
//! # Example
//!
//! ```
//! use mailtree_imap::{BodyExtractor, Extractor};
//!
//! let lines = [
//!     "* 1 FETCH (BODY[] {42}",
//!     "Subject: Greetings",
//!     "",
//!     "Hello",
//! ];
//!
//! let messages = BodyExtractor::new().extract(&lines).unwrap();
//! assert_eq!(messages[0].subject(), Some("Greetings"));
//! assert_eq!(messages[0].body_text(), Some("Hello"));
//! ```

use mailtree_mime::{BodyParser, LineCursor, Message, ParseOptions};

use crate::grammar::{ImapGrammar, ResponseGrammar};
use crate::{Error, Result};

/// Turns the buffered lines of one response into a typed result.
pub trait Extractor<T> {
    /// Extracts a value from response lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the lines do not form a valid response.
    fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Result<T>;
}

/// Extracts complete messages from `FETCH BODY[]` responses.
#[derive(Debug, Clone, Default)]
pub struct BodyExtractor<G = ImapGrammar> {
    grammar: G,
    options: ParseOptions,
}

impl BodyExtractor {
    /// Creates an extractor with the IMAP grammar and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G: ResponseGrammar> BodyExtractor<G> {
    /// Creates an extractor with a custom grammar.
    #[must_use]
    pub fn with_grammar(grammar: G) -> Self {
        Self {
            grammar,
            options: ParseOptions::default(),
        }
    }

    /// Replaces the parse options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the parse options.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn read_literal_size(&self, line: &str) -> Result<usize> {
        let mut tokens = self
            .grammar
            .tokenize(strip_untagged_prefix(line))
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        for expected in ["FETCH", "(", "BODY[]"] {
            match tokens.pop_front() {
                Some(token) if token.eq_ignore_ascii_case(expected) => {}
                Some(token) => {
                    return Err(Error::MalformedResponse(format!(
                        "expected {expected}, got {token}"
                    )));
                }
                None => {
                    return Err(Error::MalformedResponse(format!(
                        "expected {expected} in {line:?}"
                    )));
                }
            }
        }

        let literal = tokens
            .pop_front()
            .ok_or_else(|| Error::MalformedResponse(format!("missing literal size in {line:?}")))?;
        literal
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .and_then(|s| s.trim_end_matches('+').parse().ok())
            .ok_or_else(|| Error::MalformedResponse(format!("invalid literal size {literal}")))
    }
}

impl<G: ResponseGrammar> Extractor<Vec<Message>> for BodyExtractor<G> {
    fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<Message>> {
        let mut cursor = LineCursor::new(lines);
        let first = cursor.next().map_err(|_| Error::Exhausted)?;
        let size = self.read_literal_size(first)?;

        let octets: usize = cursor.remaining().iter().map(|l| l.as_ref().len() + 2).sum();
        if octets != size {
            tracing::debug!(size, octets, "Literal size differs from buffered content");
        }

        let parser = BodyParser::with_sentinel(self.options.clone(), |line: &str| {
            self.grammar.is_end_of_sequence(line)
        });
        let message = parser.parse_entity(&mut cursor)?;
        tracing::debug!(
            mimetype = %message.mimetype(),
            parts = message.parts().len(),
            "Extracted message"
        );

        Ok(vec![message])
    }
}

/// Strips a leading `* <seq> ` from an untagged response line.
#[must_use]
pub fn strip_untagged_prefix(line: &str) -> &str {
    line.strip_prefix("* ")
        .map(mailtree_mime::strip_sequence_prefix)
        .filter(|rest| rest.len() + 2 < line.len())
        .unwrap_or(line)
}
