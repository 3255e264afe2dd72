//! MIME entity tree.
//!
//! The root message and every nested body part share one recursive shape:
//! headers plus either a leaf body or an ordered list of child entities.

use crate::content_type::MimeType;
use crate::header::Headers;

/// Body of a leaf entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Body {
    /// Decoded text (`text/plain`, `text/html`).
    Text(String),
    /// Raw content, no decoding applied.
    Bytes(Vec<u8>),
}

impl Body {
    /// Returns the text if this is a text body.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bytes(_) => None,
        }
    }

    /// Returns the body as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Leaf or container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum EntityKind {
    /// A non-multipart entity with a body.
    Leaf(Body),
    /// A multipart entity with its child parts in wire order.
    Container(Vec<Entity>),
}

/// A MIME entity: a whole message or one of its body parts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entity {
    /// Entity headers.
    pub headers: Headers,
    /// Body or child parts.
    pub kind: EntityKind,
}

/// A complete message extracted from a fetch response.
pub type Message = Entity;

/// A part nested inside a multipart entity.
pub type BodyPart = Entity;

impl Entity {
    /// Creates an entity.
    #[must_use]
    pub const fn new(headers: Headers, kind: EntityKind) -> Self {
        Self { headers, kind }
    }

    /// Returns the resolved content type.
    #[must_use]
    pub fn mimetype(&self) -> MimeType {
        MimeType::resolve(&self.headers)
    }

    /// Checks if this entity holds child parts.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, EntityKind::Container(_))
    }

    /// Returns the child parts (empty for leaves).
    #[must_use]
    pub fn parts(&self) -> &[Self] {
        match &self.kind {
            EntityKind::Container(parts) => parts,
            EntityKind::Leaf(_) => &[],
        }
    }

    /// Returns the body (`None` for containers).
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        match &self.kind {
            EntityKind::Leaf(body) => Some(body),
            EntityKind::Container(_) => None,
        }
    }

    /// Returns the decoded text body, if this is a text leaf.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body().and_then(Body::as_text)
    }

    /// Returns the raw body bytes, if this is a leaf.
    #[must_use]
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body().map(Body::as_bytes)
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("Subject")
    }

    /// Gets the From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.headers.get("From")
    }

    /// Gets the To header.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.headers.get("To")
    }

    /// Gets the Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.headers.get("Date")
    }

    /// Gets the Message-ID header.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("Message-ID")
    }

    /// Iterates over leaf entities depth-first, in wire order.
    pub fn leaves(&self) -> impl Iterator<Item = &Self> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(entity) = stack.pop() {
                match &entity.kind {
                    EntityKind::Leaf(_) => return Some(entity),
                    EntityKind::Container(parts) => stack.extend(parts.iter().rev()),
                }
            }
            None
        })
    }

    /// Finds the first `text/plain` leaf body, depth-first.
    #[must_use]
    pub fn text_part(&self) -> Option<&str> {
        self.find_text("text/plain")
    }

    /// Finds the first `text/html` leaf body, depth-first.
    #[must_use]
    pub fn html_part(&self) -> Option<&str> {
        self.find_text("text/html")
    }

    fn find_text(&self, essence: &str) -> Option<&str> {
        self.leaves()
            .find(|leaf| leaf.mimetype().essence() == essence)
            .and_then(Self::body_text)
    }

    /// Returns the nesting depth of the tree (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.parts().iter().map(Self::depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn leaf(content_type: &str, text: &str) -> Entity {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type);
        Entity::new(headers, EntityKind::Leaf(Body::Text(text.to_string())))
    }

    fn container(content_type: &str, parts: Vec<Entity>) -> Entity {
        let mut headers = Headers::new();
        headers.add("Content-Type", content_type);
        Entity::new(headers, EntityKind::Container(parts))
    }

    #[test]
    fn test_leaf_accessors() {
        let entity = leaf("text/plain", "Hello");
        assert!(!entity.is_container());
        assert!(entity.parts().is_empty());
        assert_eq!(entity.body_text(), Some("Hello"));
        assert_eq!(entity.body_bytes(), Some(&b"Hello"[..]));
        assert_eq!(entity.depth(), 1);
    }

    #[test]
    fn test_container_accessors() {
        let entity = container("multipart/mixed; boundary=a", vec![]);
        assert!(entity.is_container());
        assert!(entity.body().is_none());
        assert!(entity.mimetype().is_multipart());
    }

    #[test]
    fn test_leaves_and_text_search() {
        let tree = container(
            "multipart/mixed; boundary=a",
            vec![
                container(
                    "multipart/alternative; boundary=b",
                    vec![leaf("text/plain", "plain"), leaf("text/html", "<p>html</p>")],
                ),
                Entity::new(Headers::new(), EntityKind::Leaf(Body::Bytes(vec![1, 2]))),
            ],
        );

        assert_eq!(tree.leaves().count(), 3);
        assert_eq!(tree.text_part(), Some("plain"));
        assert_eq!(tree.html_part(), Some("<p>html</p>"));
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_body_bytes_len() {
        let body = Body::Bytes(vec![0, 1, 2]);
        assert_eq!(body.len(), 3);
        assert!(body.as_text().is_none());
        assert!(Body::Text(String::new()).is_empty());
    }
}
