//! Integration tests for message extraction.
//!
//! Each test feeds the buffered lines of a `FETCH BODY[]` response through
//! the extractor, the way the session layer would hand them over.

#![allow(clippy::unwrap_used)]

use mailtree_imap::{
    Body, BodyExtractor, DuplicateHeaders, Error, Extractor, ImapGrammar, Message, ParseOptions,
};

fn extract(lines: &[&str]) -> Message {
    let mut messages = BodyExtractor::new().extract(lines).unwrap();
    assert_eq!(messages.len(), 1);
    messages.remove(0)
}

fn nested_response() -> Vec<&'static str> {
    vec![
        "* 3 FETCH (BODY[] {512}",
        "From: alice@example.com",
        "To: bob@example.com",
        "Subject: Quarterly",
        " report",
        "Content-Type: multipart/mixed; boundary=outer",
        "",
        "This is a multi-part message in MIME format.",
        "--outer",
        "Content-Type: multipart/alternative; boundary=inner",
        "",
        "--inner",
        "Content-Type: text/plain; charset=UTF-8",
        "",
        "Numbers attached.",
        "--inner",
        "Content-Type: text/html; charset=UTF-8",
        "",
        "<p>Numbers attached.</p>",
        "--inner--",
        "",
        "--outer",
        "Content-Type: application/octet-stream",
        "Content-Transfer-Encoding: base64",
        "",
        "AAECAw==",
        "--outer--",
    ]
}

#[test]
fn test_single_part_message() {
    let message = extract(&[
        "* 12 FETCH (BODY[] {64}",
        "Content-Type: text/plain; charset=UTF-8",
        "",
        "Hello",
        "World",
    ]);

    assert_eq!(message.body_text(), Some("Hello\r\nWorld"));
    assert!(message.parts().is_empty());
    assert!(!message.is_container());
}

#[test]
fn test_multipart_two_children_in_order() {
    let message = extract(&[
        "* 1 FETCH (BODY[] {128}",
        "Content-Type: multipart/mixed; boundary=XYZ",
        "",
        "--XYZ",
        "Content-Type: text/plain",
        "",
        "first",
        "--XYZ",
        "Content-Type: text/plain",
        "",
        "second",
        "--XYZ--",
        ")",
    ]);

    let parts = message.parts();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].body_text(), Some("first"));
    assert_eq!(parts[1].body_text(), Some("second"));
    assert!(message.body().is_none());
}

#[test]
fn test_header_unfolding() {
    let message = extract(&["* 1 FETCH (BODY[] {20}", "Subject: Hello", " World", "", "x"]);
    assert_eq!(message.subject(), Some("Hello World"));
}

#[test]
fn test_default_content_type() {
    let message = extract(&["* 1 FETCH (BODY[] {20}", "Subject: plain", "", "na\u{ef}ve"]);
    assert_eq!(message.mimetype().essence(), "text/plain");
    assert_eq!(message.body_text(), Some("naïve"));
}

#[test]
fn test_three_level_tree() {
    let message = extract(&nested_response());

    assert_eq!(message.subject(), Some("Quarterly report"));
    assert_eq!(message.depth(), 3);
    assert!(message.body().is_none());

    let parts = message.parts();
    assert_eq!(parts.len(), 2);

    let alternative = &parts[0];
    assert!(alternative.is_container());
    assert!(alternative.body().is_none());
    assert_eq!(alternative.parts().len(), 2);
    for leaf in alternative.parts() {
        assert!(!leaf.body_text().unwrap().is_empty());
        assert!(leaf.parts().is_empty());
    }

    assert_eq!(message.text_part(), Some("Numbers attached."));
    assert_eq!(message.html_part(), Some("<p>Numbers attached.</p>"));
    assert_eq!(
        parts[1].body(),
        Some(&Body::Bytes(b"AAECAw==\r\n".to_vec()))
    );
}

#[test]
fn test_malformed_status_line() {
    let extractor = BodyExtractor::new();
    for first in ["* 1 FETCH (FLAGS (\\Seen)", "* 1 FETCH (BODY[]", "* 1 FETCH (BODY[] {abc}"] {
        let result = extractor.extract(&[first, "Subject: x", "", "body"]);
        assert!(
            matches!(result, Err(Error::MalformedResponse(_))),
            "{first}: {result:?}"
        );
    }
}

#[test]
fn test_decode_error_surfaces() {
    let result = BodyExtractor::new().extract(&[
        "* 1 FETCH (BODY[] {40}",
        "Content-Type: text/plain",
        "Content-Transfer-Encoding: base64",
        "",
        "not*base64",
    ]);
    let err = result.unwrap_err();
    assert!(err.is_decode_error(), "{err}");
}

#[test]
fn test_sentinel_in_header_section() {
    let message = extract(&[
        "* 1 FETCH (BODY[] {40}",
        "Subject: Hi",
        "12 OK FETCH completed",
        "",
        "body",
    ]);
    assert_eq!(message.headers.len(), 1);
    assert_eq!(message.body_text(), Some("body"));
}

#[test]
fn test_headers_resembling_completions_survive() {
    let message = extract(&[
        "* 1 FETCH (BODY[] {40}",
        "Subject: No success",
        "X-Status: ok, job completed",
        "From: a@example.com",
        "",
        "body",
    ]);
    assert_eq!(message.subject(), Some("No success"));
    assert_eq!(message.headers.get("X-Status"), Some("ok, job completed"));
    assert_eq!(message.headers.len(), 3);
}

#[test]
fn test_retain_duplicate_headers() {
    let lines = [
        "* 1 FETCH (BODY[] {40}",
        "Received: from a",
        "Received: from b",
        "",
        "body",
    ];

    let message = extract(&lines);
    assert_eq!(message.headers.get_all("Received"), vec!["from b"]);

    let extractor = BodyExtractor::with_grammar(ImapGrammar).with_options(
        ParseOptions::builder()
            .duplicate_headers(DuplicateHeaders::Retain)
            .build(),
    );
    let messages = extractor.extract(&lines).unwrap();
    assert_eq!(
        messages[0].headers.get_all("Received"),
        vec!["from a", "from b"]
    );
}

#[test]
fn test_owned_lines() {
    let lines: Vec<String> = nested_response().into_iter().map(String::from).collect();
    let messages = BodyExtractor::new().extract(&lines).unwrap();
    assert_eq!(messages[0].parts().len(), 2);
}

#[test]
fn test_extraction_is_idempotent() {
    let lines = nested_response();
    let extractor = BodyExtractor::new();
    let first = extractor.extract(&lines).unwrap();
    let second = extractor.extract(&lines).unwrap();
    assert_eq!(first, second);
}

proptest::proptest! {
    #[test]
    fn test_text_parts_round_through_multipart(
        bodies in proptest::collection::vec("[a-zA-Z0-9 .,]{1,40}", 1..6),
    ) {
        let mut lines = vec![
            "* 9 FETCH (BODY[] {100}".to_string(),
            "Content-Type: multipart/mixed; boundary=b0undary".to_string(),
            String::new(),
        ];
        for body in &bodies {
            lines.push("--b0undary".to_string());
            lines.push("Content-Type: text/plain".to_string());
            lines.push(String::new());
            lines.push(body.clone());
        }
        lines.push("--b0undary--".to_string());

        let extractor = BodyExtractor::new();
        let first = extractor.extract(&lines).unwrap();
        let second = extractor.extract(&lines).unwrap();
        proptest::prop_assert_eq!(&first, &second);

        let found: Vec<&str> = first[0].parts().iter().filter_map(|p| p.body_text()).collect();
        let expected: Vec<&str> = bodies.iter().map(String::as_str).collect();
        proptest::prop_assert_eq!(found, expected);
    }
}
