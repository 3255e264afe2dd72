//! MIME content type and boundary resolution.

use std::fmt;

use crate::header::Headers;

/// Content type assumed when an entity has no `Content-Type` header.
pub const DEFAULT_MIMETYPE: &str = "text/plain";

const BOUNDARY_PARAM: &str = "boundary=";
const CHARSET_PARAM: &str = "charset=";

/// How the `boundary=` parameter is read out of a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryGrammar {
    /// Everything after `boundary=` is the boundary, taken verbatim.
    #[default]
    Heuristic,
    /// The value runs to the next `;`, trimmed and unquoted.
    Parameter,
}

/// A resolved `Content-Type` value.
///
/// Type and subtype are compared case-insensitively; parameter values keep
/// their original case since boundaries are matched byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    raw: String,
    essence: String,
}

impl MimeType {
    /// Wraps a raw content type value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let essence = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self { raw, essence }
    }

    /// Resolves the content type of an entity from its headers.
    ///
    /// Falls back to `text/plain` when the header is absent.
    #[must_use]
    pub fn resolve(headers: &Headers) -> Self {
        Self::new(headers.get("Content-Type").unwrap_or(DEFAULT_MIMETYPE))
    }

    /// Returns the raw header value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the lower-cased `type/subtype`.
    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.essence.starts_with("multipart/")
    }

    /// Checks if this is a text type decoded into a string body.
    #[must_use]
    pub fn is_text_leaf(&self) -> bool {
        self.essence.starts_with("text/plain") || self.essence.starts_with("text/html")
    }

    /// Returns the `charset` parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        let value = param_tail(&self.raw, CHARSET_PARAM)?;
        let end = value
            .find(|c: char| c == ';' || c.is_whitespace())
            .unwrap_or(value.len());
        let charset = value[..end].trim_matches('"');
        (!charset.is_empty()).then_some(charset)
    }

    /// Resolves the delimiter declared by this content type, if any.
    #[must_use]
    pub fn boundary(&self, grammar: BoundaryGrammar) -> Option<Delimiter> {
        let value = param_tail(&self.raw, BOUNDARY_PARAM)?;
        let token = match grammar {
            BoundaryGrammar::Heuristic => value,
            BoundaryGrammar::Parameter => {
                let end = value.find(';').unwrap_or(value.len());
                value[..end].trim().trim_matches('"')
            }
        };
        Some(Delimiter::new(token))
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Text following `key` (matched case-insensitively) in `raw`.
fn param_tail<'a>(raw: &'a str, key: &str) -> Option<&'a str> {
    let idx = raw.to_ascii_lowercase().find(key)?;
    Some(&raw[idx + key.len()..])
}

/// A multipart delimiter line: `--` followed by the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter(String);

impl Delimiter {
    /// Builds the delimiter for a boundary token.
    #[must_use]
    pub fn new(boundary: &str) -> Self {
        Self(format!("--{boundary}"))
    }

    /// Returns the delimiter text including the leading `--`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the delimiter line that opens the first part.
    #[must_use]
    pub fn is_delimiter_line(&self, line: &str) -> bool {
        line == self.0
    }

    /// True for any line that ends the content preceding it.
    #[must_use]
    pub fn opens_part(&self, line: &str) -> bool {
        line.starts_with(&self.0)
    }

    /// True for the close delimiter that ends the multipart body.
    #[must_use]
    pub fn is_close_delimiter(&self, line: &str) -> bool {
        line.strip_prefix(&self.0)
            .is_some_and(|rest| rest.starts_with("--"))
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_to_text_plain() {
        let mime = MimeType::resolve(&Headers::new());
        assert_eq!(mime.essence(), "text/plain");
        assert!(mime.is_text_leaf());
        assert_eq!(mime.charset(), None);
    }

    #[test]
    fn test_essence_is_case_normalized() {
        let mime = MimeType::new("Multipart/Alternative; boundary=AbC");
        assert_eq!(mime.essence(), "multipart/alternative");
        assert!(mime.is_multipart());
        assert_eq!(mime.as_str(), "Multipart/Alternative; boundary=AbC");
    }

    #[test]
    fn test_boundary_heuristic_keeps_case_and_tail() {
        let mime = MimeType::new("multipart/mixed; BOUNDARY=XYZ");
        let delimiter = mime.boundary(BoundaryGrammar::Heuristic).unwrap();
        assert_eq!(delimiter.as_str(), "--XYZ");

        let quoted = MimeType::new("multipart/mixed; boundary=\"q\"");
        assert_eq!(
            quoted.boundary(BoundaryGrammar::Heuristic).unwrap().as_str(),
            "--\"q\""
        );
    }

    #[test]
    fn test_boundary_parameter_grammar() {
        let mime = MimeType::new("multipart/mixed; boundary=\"----=_Part_123\"; type=x");
        let delimiter = mime.boundary(BoundaryGrammar::Parameter).unwrap();
        assert_eq!(delimiter.as_str(), "------=_Part_123");
    }

    #[test]
    fn test_boundary_absent() {
        let mime = MimeType::new("text/plain; charset=utf-8");
        assert!(mime.boundary(BoundaryGrammar::Heuristic).is_none());
    }

    #[test]
    fn test_charset_parameter() {
        let mime = MimeType::new("text/plain; charset=\"ISO-8859-1\"; format=flowed");
        assert_eq!(mime.charset(), Some("ISO-8859-1"));
        assert!(MimeType::new("text/html; charset=").charset().is_none());
    }

    #[test]
    fn test_delimiter_lines() {
        let delimiter = Delimiter::new("XYZ");
        assert!(delimiter.is_delimiter_line("--XYZ"));
        assert!(!delimiter.is_delimiter_line("--XYZ  "));
        assert!(delimiter.opens_part("--XYZ  "));
        assert!(delimiter.is_close_delimiter("--XYZ--"));
        assert!(!delimiter.is_close_delimiter("--XYZ"));
        assert!(!delimiter.opens_part("XYZ"));
    }
}
