//! MIME header handling.

use std::fmt;

use crate::cursor::LineCursor;
use crate::error::{Error, Result};

/// How a header section treats repeated header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateHeaders {
    /// A later header replaces the value of an earlier one with the same name.
    #[default]
    Overwrite,
    /// Every occurrence is kept in wire order.
    Retain,
}

/// Ordered collection of email headers with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header value, keeping any earlier values.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Sets a header value, replacing any existing values.
    ///
    /// The header keeps the position of its first occurrence.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(i) => {
                self.entries[i].1 = value;
                let mut seen = false;
                self.entries.retain(|(n, _)| {
                    if !n.eq_ignore_ascii_case(&name) {
                        return true;
                    }
                    !std::mem::replace(&mut seen, true)
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Stores a header according to the duplicate policy.
    pub fn insert(&mut self, name: String, value: String, policy: DuplicateHeaders) {
        match policy {
            DuplicateHeaders::Overwrite => self.set(name, value),
            DuplicateHeaders::Retain => self.add(name, value),
        }
    }

    /// Gets the effective (last stored) value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets all values for a header in wire order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns true if the header is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of stored header lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no headers are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all headers in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Strips a leading `<digits><spaces>` sequence-number prefix.
#[must_use]
pub fn strip_sequence_prefix(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    let rest = &line[digits..];
    let trimmed = rest.trim_start_matches(' ');
    if trimmed.len() == rest.len() {
        line
    } else {
        trimmed
    }
}

/// Reads a header section from the cursor.
///
/// The section ends at an empty line (which is consumed) or when the cursor
/// runs out. Lines for which `is_sentinel` returns true after normalization
/// (sequence prefix stripped, lower-cased) are dropped. Folded continuation
/// lines are unfolded into their header's value.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] for a line that has no `:` separator.
pub fn parse_header_section<S, F>(
    cursor: &mut LineCursor<'_, S>,
    policy: DuplicateHeaders,
    is_sentinel: F,
) -> Result<Headers>
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut headers = Headers::new();

    while let Ok(line) = cursor.next() {
        if is_sentinel(&strip_sequence_prefix(line).to_lowercase()) {
            tracing::trace!(line, "Skipping end-of-sequence line in header section");
            continue;
        }
        if line.is_empty() {
            break;
        }

        let (name, value) = split_header(line)?;
        let value = unfold(cursor, value.to_string());
        headers.insert(name.to_string(), value, policy);
    }

    Ok(headers)
}

fn split_header(line: &str) -> Result<(&str, &str)> {
    let (name, value) = line
        .split_once(": ")
        .or_else(|| line.split_once(':'))
        .ok_or_else(|| Error::MalformedHeader(line.to_string()))?;
    if name.trim().is_empty() {
        return Err(Error::MalformedHeader(line.to_string()));
    }
    Ok((name, value))
}

// RFC 822 unfolding: whitespace-led lines continue the previous header.
fn unfold<S: AsRef<str>>(cursor: &mut LineCursor<'_, S>, mut value: String) -> String {
    while let Ok(next) = cursor.next() {
        if next.starts_with([' ', '\t']) {
            value.push(' ');
            value.push_str(next.trim());
        } else {
            cursor.pushback();
            break;
        }
    }
    value
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn never(_: &str) -> bool {
        false
    }

    fn parse(lines: &[&str]) -> Result<Headers> {
        let mut cursor = LineCursor::new(lines);
        parse_header_section(&mut cursor, DuplicateHeaders::Overwrite, never)
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
    }

    #[test]
    fn test_headers_set_overwrites_in_place() {
        let mut headers = Headers::new();
        headers.add("Received", "from a");
        headers.add("Subject", "Hi");
        headers.add("Received", "from b");

        headers.set("received", "from c");
        assert_eq!(headers.get_all("Received"), vec!["from c"]);
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Received", "Subject"]);
    }

    #[test]
    fn test_parse_section_stops_at_blank_line() {
        let lines = ["From: sender@example.com", "Subject: Test", "", "body"];
        let mut cursor = LineCursor::new(&lines);
        let headers =
            parse_header_section(&mut cursor, DuplicateHeaders::Overwrite, never).unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("From"), Some("sender@example.com"));
        assert_eq!(cursor.peek(), Some("body"));
    }

    #[test]
    fn test_parse_unfolds_continuation() {
        let headers = parse(&["Subject: Hello", " World", ""]).unwrap();
        assert_eq!(headers.get("Subject"), Some("Hello World"));
    }

    #[test]
    fn test_parse_unfolds_tab_continuation() {
        let headers = parse(&[
            "Content-Type: multipart/mixed;",
            "\tboundary=abc",
            "To: bob@example.com",
            "",
        ])
        .unwrap();
        assert_eq!(
            headers.get("Content-Type"),
            Some("multipart/mixed; boundary=abc")
        );
        assert_eq!(headers.get("To"), Some("bob@example.com"));
    }

    #[test]
    fn test_parse_exhaustion_ends_section() {
        let headers = parse(&["Subject: no blank line", "  folded"]).unwrap();
        assert_eq!(headers.get("Subject"), Some("no blank line folded"));
    }

    #[test]
    fn test_parse_duplicate_overwrite_and_retain() {
        let lines = ["Received: one", "Received: two", ""];

        let headers = parse(&lines).unwrap();
        assert_eq!(headers.get_all("Received"), vec!["two"]);

        let mut cursor = LineCursor::new(&lines);
        let headers = parse_header_section(&mut cursor, DuplicateHeaders::Retain, never).unwrap();
        assert_eq!(headers.get_all("Received"), vec!["one", "two"]);
        assert_eq!(headers.get("Received"), Some("two"));
    }

    #[test]
    fn test_parse_skips_sentinel_lines() {
        let lines = ["12 OK FETCH completed", "Subject: Test", ""];
        let mut cursor = LineCursor::new(&lines);
        let headers = parse_header_section(&mut cursor, DuplicateHeaders::Overwrite, |l| {
            l.starts_with("ok ")
        })
        .unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Subject"), Some("Test"));
    }

    #[test]
    fn test_parse_colon_without_space() {
        let headers = parse(&["X-Flag:yes", "Empty:", ""]).unwrap();
        assert_eq!(headers.get("X-Flag"), Some("yes"));
        assert_eq!(headers.get("Empty"), Some(""));
    }

    #[test]
    fn test_parse_value_keeps_later_separators() {
        let headers = parse(&["Subject: Re: Hello: World", ""]).unwrap();
        assert_eq!(headers.get("Subject"), Some("Re: Hello: World"));
    }

    #[test]
    fn test_parse_rejects_line_without_colon() {
        let result = parse(&["not a header", ""]);
        assert!(matches!(result, Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_strip_sequence_prefix() {
        assert_eq!(strip_sequence_prefix("12 OK done"), "OK done");
        assert_eq!(strip_sequence_prefix("12OK"), "12OK");
        assert_eq!(strip_sequence_prefix("Subject: 1"), "Subject: 1");
    }

    proptest::proptest! {
        #[test]
        fn test_unfolding_joins_with_single_space(
            first in "[A-Za-z0-9]{1,12}",
            rest in proptest::collection::vec("[A-Za-z0-9]{1,12}", 0..5),
        ) {
            let mut lines = vec![format!("Subject: {first}")];
            lines.extend(rest.iter().map(|r| format!(" \t{r}  ")));
            lines.push(String::new());

            let mut cursor = LineCursor::new(&lines);
            let headers =
                parse_header_section(&mut cursor, DuplicateHeaders::Overwrite, never).unwrap();

            let mut expected = vec![first.clone()];
            expected.extend(rest.iter().cloned());
            let expected = expected.join(" ");
            proptest::prop_assert_eq!(headers.get("Subject"), Some(expected.as_str()));
            proptest::prop_assert!(cursor.is_exhausted());
        }
    }

    #[test]
    fn test_headers_display() {
        let mut headers = Headers::new();
        headers.add("From", "sender@example.com");
        headers.add("To", "recipient@example.com");

        let s = headers.to_string();
        assert_eq!(s, "From: sender@example.com\nTo: recipient@example.com\n");
    }
}
