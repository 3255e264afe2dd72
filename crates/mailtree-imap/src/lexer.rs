//! Tokenizer for IMAP status lines.
//!
//! Splits a line such as `FETCH (BODY[] {1234}` into whitespace and
//! paren-aware tokens. Bracketed sections stay attached to their atom, so
//! `BODY[HEADER.FIELDS (FROM TO)]` is a single token.

use std::collections::VecDeque;

use crate::{Error, Result};

/// Status line lexer state.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given line.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    /// Returns the current position in the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if at end of input.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.advance();
        }
    }

    /// Reads the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error for an unterminated quoted string, literal marker,
    /// or bracketed section.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        self.skip_whitespace();
        let Some(byte) = self.peek() else {
            return Ok(None);
        };

        let start = self.pos;
        match byte {
            b'(' | b')' => {
                self.advance();
            }
            b'"' => self.read_quoted_string()?,
            b'{' => self.read_literal_marker()?,
            _ => self.read_atom()?,
        }
        self.slice(start).map(Some)
    }

    /// Reads every remaining token.
    ///
    /// # Errors
    ///
    /// See [`next_token`](Self::next_token).
    pub fn tokenize(mut self) -> Result<VecDeque<String>> {
        let mut tokens = VecDeque::new();
        while let Some(token) = self.next_token()? {
            tokens.push_back(token);
        }
        Ok(tokens)
    }

    fn read_quoted_string(&mut self) -> Result<()> {
        self.advance(); // Skip opening quote

        loop {
            match self.advance() {
                Some(b'"') => return Ok(()),
                Some(b'\\') => {
                    if self.advance().is_none() {
                        return Err(self.error("Unexpected end of line in quoted string"));
                    }
                }
                Some(_) => {}
                None => return Err(self.error("Unexpected end of line in quoted string")),
            }
        }
    }

    fn read_literal_marker(&mut self) -> Result<()> {
        self.advance(); // Skip {

        loop {
            match self.advance() {
                Some(b'}') => return Ok(()),
                Some(b'0'..=b'9' | b'+') => {}
                Some(_) => return Err(self.error("Invalid character in literal size")),
                None => return Err(self.error("Expected } after literal size")),
            }
        }
    }

    fn read_atom(&mut self) -> Result<()> {
        let mut brackets = 0usize;

        while let Some(b) = self.peek() {
            match b {
                b'[' => brackets += 1,
                b']' if brackets > 0 => brackets -= 1,
                b'(' | b')' if brackets == 0 => break,
                _ if b.is_ascii_whitespace() && brackets == 0 => break,
                _ => {}
            }
            self.advance();
        }

        if brackets > 0 {
            return Err(self.error("Unterminated section brackets"));
        }
        Ok(())
    }

    fn slice(&self, start: usize) -> Result<String> {
        std::str::from_utf8(&self.input[start..self.pos])
            .map(str::to_string)
            .map_err(|_| self.error("Invalid UTF-8 in token"))
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

/// Tokenizes a status line.
///
/// # Errors
///
/// See [`Lexer::next_token`].
pub fn tokenize(line: &str) -> Result<VecDeque<String>> {
    Lexer::new(line).tokenize()
}
