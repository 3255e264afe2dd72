//! Recursive MIME body parser.
//!
//! Each entity goes through the same steps: its header section is read, its
//! content type resolved, and then it is handled as a text leaf, a binary
//! leaf, or a multipart container whose parts re-enter the same steps.
//! Parsing stops at a blank line (end of headers), a delimiter line (end of
//! a leaf), a close delimiter (end of a container), or when input runs out.

use crate::content_type::{Delimiter, MimeType};
use crate::cursor::LineCursor;
use crate::encoding::{self, DEFAULT_TRANSFER_ENCODING};
use crate::entity::{Body, Entity, EntityKind};
use crate::error::{Error, Result};
use crate::header::{self, Headers};
use crate::options::ParseOptions;

/// Builds MIME entity trees from buffered lines.
///
/// `F` recognizes protocol sentinel lines that may be interleaved with a
/// header section; such lines are discarded.
pub struct BodyParser<F> {
    options: ParseOptions,
    is_sentinel: F,
}

impl<F> std::fmt::Debug for BodyParser<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BodyParser<fn(&str) -> bool> {
    /// Creates a parser that treats no line as a sentinel.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        fn never(_: &str) -> bool {
            false
        }
        Self::with_sentinel(options, never)
    }
}

impl<F: Fn(&str) -> bool> BodyParser<F> {
    /// Creates a parser with a sentinel predicate.
    ///
    /// The predicate receives lines with any sequence-number prefix removed
    /// and lower-cased.
    #[must_use]
    pub const fn with_sentinel(options: ParseOptions, is_sentinel: F) -> Self {
        Self {
            options,
            is_sentinel,
        }
    }

    /// Returns the parser options.
    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Reads a header section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedHeader`] for a line with no `:` separator.
    pub fn parse_headers<S: AsRef<str>>(&self, cursor: &mut LineCursor<'_, S>) -> Result<Headers> {
        header::parse_header_section(cursor, self.options.duplicate_headers, &self.is_sentinel)
    }

    /// Parses a complete entity: header section followed by its body.
    ///
    /// # Errors
    ///
    /// Fails on malformed headers, undecodable text, a multipart entity
    /// without a boundary, or when a nesting or part-count limit is exceeded.
    pub fn parse_entity<S: AsRef<str>>(&self, cursor: &mut LineCursor<'_, S>) -> Result<Entity> {
        let headers = self.parse_headers(cursor)?;
        let mimetype = MimeType::resolve(&headers);
        let boundary = mimetype.boundary(self.options.boundary_grammar);
        tracing::debug!(mimetype = %mimetype, "Parsing entity");

        let kind = self.parse_body(cursor, &headers, &mimetype, boundary.as_ref())?;
        Ok(Entity::new(headers, kind))
    }

    /// Parses the body of an entity whose headers have already been read.
    ///
    /// `boundary` delimits leaf content; for a leaf it is the delimiter of
    /// the nearest enclosing container.
    ///
    /// # Errors
    ///
    /// See [`parse_entity`](Self::parse_entity).
    pub fn parse_body<S: AsRef<str>>(
        &self,
        cursor: &mut LineCursor<'_, S>,
        headers: &Headers,
        mimetype: &MimeType,
        boundary: Option<&Delimiter>,
    ) -> Result<EntityKind> {
        self.body(cursor, headers, mimetype, boundary, &mut Walk::default())
    }

    fn body<S: AsRef<str>>(
        &self,
        cursor: &mut LineCursor<'_, S>,
        headers: &Headers,
        mimetype: &MimeType,
        boundary: Option<&Delimiter>,
        walk: &mut Walk,
    ) -> Result<EntityKind> {
        if mimetype.is_text_leaf() {
            let text = read_body_text(cursor, boundary);
            let transfer_encoding = headers
                .get("Content-Transfer-Encoding")
                .unwrap_or(DEFAULT_TRANSFER_ENCODING);
            let charset = mimetype
                .charset()
                .unwrap_or(self.options.default_charset.as_str());
            tracing::trace!(transfer_encoding, charset, len = text.len(), "Decoding text body");
            let decoded = encoding::decode(&text, transfer_encoding, charset)?;
            Ok(EntityKind::Leaf(Body::Text(decoded)))
        } else if mimetype.is_multipart() {
            self.parse_multipart(cursor, mimetype, walk)
                .map(EntityKind::Container)
        } else {
            Ok(EntityKind::Leaf(Body::Bytes(read_body_bytes(cursor, boundary))))
        }
    }

    fn parse_multipart<S: AsRef<str>>(
        &self,
        cursor: &mut LineCursor<'_, S>,
        mimetype: &MimeType,
        walk: &mut Walk,
    ) -> Result<Vec<Entity>> {
        if walk.depth >= self.options.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.options.max_depth,
            });
        }
        let delimiter = mimetype
            .boundary(self.options.boundary_grammar)
            .ok_or_else(|| Error::MissingBoundary(mimetype.to_string()))?;

        let mut children = Vec::new();
        if !skip_preamble(cursor, &delimiter) {
            tracing::debug!(%delimiter, "No delimiter line found, multipart body is empty");
            return Ok(children);
        }

        while !cursor.is_exhausted() {
            walk.parts += 1;
            if walk.parts > self.options.max_parts {
                return Err(Error::TooManyParts {
                    limit: self.options.max_parts,
                });
            }

            let headers = self.parse_headers(cursor)?;
            let child_type = MimeType::resolve(&headers);
            // A part without its own boundary is delimited by ours.
            let child_boundary = child_type
                .boundary(self.options.boundary_grammar)
                .unwrap_or_else(|| delimiter.clone());
            tracing::trace!(depth = walk.depth, mimetype = %child_type, "Parsing body part");

            walk.depth += 1;
            let kind = self.body(cursor, &headers, &child_type, Some(&child_boundary), walk);
            walk.depth -= 1;
            let kind = kind?;
            // Nested containers and parts with a boundary of their own stop
            // short of our next delimiter.
            let stopped_short = !cursor.last().is_some_and(|line| delimiter.opens_part(line));
            if matches!(kind, EntityKind::Container(_)) || stopped_short {
                skip_epilogue(cursor, &delimiter);
            }
            children.push(Entity::new(headers, kind));

            match cursor.last() {
                Some(line) if delimiter.is_close_delimiter(line) => break,
                Some(line) if delimiter.opens_part(line) => {}
                _ => {
                    tracing::debug!(%delimiter, "Input ended before close delimiter");
                    break;
                }
            }
        }

        Ok(children)
    }
}

// Nesting depth and running part count for one tree.
#[derive(Debug, Default)]
struct Walk {
    depth: usize,
    parts: usize,
}

// Discards lines up to and including the first delimiter line.
fn skip_preamble<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>, delimiter: &Delimiter) -> bool {
    while let Ok(line) = cursor.next() {
        if delimiter.is_delimiter_line(line) {
            return true;
        }
    }
    false
}

// Discards a nested container's trailing lines up to our next delimiter.
fn skip_epilogue<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>, delimiter: &Delimiter) {
    while let Ok(line) = cursor.next() {
        if delimiter.opens_part(line) {
            return;
        }
    }
}

fn read_body_text<S: AsRef<str>>(
    cursor: &mut LineCursor<'_, S>,
    boundary: Option<&Delimiter>,
) -> String {
    let mut lines = Vec::new();
    while let Ok(line) = cursor.next() {
        if boundary.is_some_and(|b| b.opens_part(line)) {
            break;
        }
        lines.push(line);
    }
    lines.join("\r\n")
}

fn read_body_bytes<S: AsRef<str>>(
    cursor: &mut LineCursor<'_, S>,
    boundary: Option<&Delimiter>,
) -> Vec<u8> {
    let mut body = Vec::new();
    while let Ok(line) = cursor.next() {
        if boundary.is_some_and(|b| b.opens_part(line)) {
            break;
        }
        body.extend_from_slice(line.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body
}
