//! Forward cursor over buffered response lines.

use crate::error::{Error, Result};

/// Cursor over an ordered sequence of lines with one-step pushback.
///
/// Lines are expected to have their CRLF terminator already stripped.
#[derive(Debug)]
pub struct LineCursor<'a, S> {
    lines: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> LineCursor<'a, S> {
    /// Creates a cursor positioned before the first line.
    #[must_use]
    pub const fn new(lines: &'a [S]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Returns the index of the next line to be produced.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns true if every line has been consumed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Returns the lines not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [S] {
        &self.lines[self.pos.min(self.lines.len())..]
    }

    /// Peeks at the next line without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(AsRef::as_ref)
    }

    /// Returns the line most recently produced by [`next`](Self::next).
    #[must_use]
    pub fn last(&self) -> Option<&'a str> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(AsRef::as_ref)
    }

    /// Returns the next line and advances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] when no lines remain.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&'a str> {
        let line = self.peek().ok_or(Error::Exhausted)?;
        self.pos += 1;
        Ok(line)
    }

    /// Rewinds exactly one line so it is produced again.
    pub fn pushback(&mut self) {
        debug_assert!(self.pos > 0, "pushback before first line");
        self.pos = self.pos.saturating_sub(1);
    }
}
