//! # mailtree-mime
//!
//! Line-oriented MIME parser that turns buffered message lines into an
//! entity tree.
//!
//! ## Features
//!
//! - **Header sections**: RFC 822 unfolding, ordered storage, configurable
//!   handling of repeated names
//! - **Content types**: type/subtype resolution, `charset` and `boundary`
//!   lookup
//! - **Decoding**: Base64 and Quoted-Printable transfer encodings followed
//!   by charset conversion
//! - **Multipart**: recursive discovery of nested containers with depth and
//!   part-count limits
//!
//! ## Quick Start
//!
//! ```
//! use mailtree_mime::{BodyParser, LineCursor, ParseOptions};
//!
//! let lines = [
//!     "Subject: Test",
//!     "Content-Type: text/plain; charset=UTF-8",
//!     "",
//!     "Hello",
//!     "World",
//! ];
//!
//! let mut cursor = LineCursor::new(&lines);
//! let message = BodyParser::new(ParseOptions::default())
//!     .parse_entity(&mut cursor)
//!     .unwrap();
//!
//! assert_eq!(message.subject(), Some("Test"));
//! assert_eq!(message.body_text(), Some("Hello\r\nWorld"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod cursor;
mod entity;
mod error;
mod header;
mod options;
mod parser;

pub mod encoding;

pub use content_type::{BoundaryGrammar, DEFAULT_MIMETYPE, Delimiter, MimeType};
pub use cursor::LineCursor;
pub use entity::{Body, BodyPart, Entity, EntityKind, Message};
pub use error::{DecodeError, Error, Result};
pub use header::{DuplicateHeaders, Headers, parse_header_section, strip_sequence_prefix};
pub use options::{
    DEFAULT_CHARSET, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PARTS, ParseOptions, ParseOptionsBuilder,
};
pub use parser::BodyParser;
