//! # mailtree-imap
//!
//! Extracts complete email messages, headers plus the full MIME body tree,
//! from the buffered lines of an IMAP `FETCH BODY[]` response.
//!
//! ## Quick Start
//!
//! ```
//! use mailtree_imap::{BodyExtractor, Extractor};
//!
//! let lines = [
//!     "* 7 FETCH (BODY[] {180}",
//!     "Subject: Report",
//!     "Content-Type: multipart/mixed; boundary=sep",
//!     "",
//!     "--sep",
//!     "Content-Type: text/plain",
//!     "",
//!     "See attached.",
//!     "--sep",
//!     "Content-Type: application/pdf",
//!     "",
//!     "JVBERi0=",
//!     "--sep--",
//! ];
//!
//! let messages = BodyExtractor::new().extract(&lines).unwrap();
//! let message = &messages[0];
//! assert_eq!(message.parts().len(), 2);
//! assert_eq!(message.text_part(), Some("See attached."));
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: the [`Extractor`] trait and [`BodyExtractor`]
//! - [`grammar`]: tokenizer and end-of-sequence hooks
//! - [`lexer`]: status line tokenizer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod extract;
pub mod grammar;
pub mod lexer;

pub use error::{Error, Result};
pub use extract::{BodyExtractor, Extractor};
pub use grammar::{ImapGrammar, ResponseGrammar};
pub use mailtree_mime::{
    Body, BodyPart, DuplicateHeaders, Entity, EntityKind, Headers, Message, ParseOptions,
};
