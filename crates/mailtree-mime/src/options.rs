//! Parser configuration.

use crate::content_type::BoundaryGrammar;
use crate::header::DuplicateHeaders;

/// Default limit on multipart nesting.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Default limit on the total number of body parts in one message.
pub const DEFAULT_MAX_PARTS: usize = 1000;

/// Charset assumed for text bodies that do not declare one.
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Options controlling how a MIME entity tree is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum multipart nesting depth.
    pub max_depth: usize,
    /// Maximum number of body parts across the whole tree.
    pub max_parts: usize,
    /// Charset used when a text entity declares none.
    pub default_charset: String,
    /// Treatment of repeated header names.
    pub duplicate_headers: DuplicateHeaders,
    /// How boundaries are read from content types.
    pub boundary_grammar: BoundaryGrammar,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_parts: DEFAULT_MAX_PARTS,
            default_charset: DEFAULT_CHARSET.to_string(),
            duplicate_headers: DuplicateHeaders::Overwrite,
            boundary_grammar: BoundaryGrammar::Heuristic,
        }
    }
}

impl ParseOptions {
    /// Creates an options builder.
    #[must_use]
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::default()
    }
}

/// Builder for [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    /// Sets the maximum nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    /// Sets the maximum total part count.
    #[must_use]
    pub const fn max_parts(mut self, parts: usize) -> Self {
        self.options.max_parts = parts;
        self
    }

    /// Sets the charset assumed for unlabeled text.
    #[must_use]
    pub fn default_charset(mut self, charset: impl Into<String>) -> Self {
        self.options.default_charset = charset.into();
        self
    }

    /// Sets the duplicate header policy.
    #[must_use]
    pub const fn duplicate_headers(mut self, policy: DuplicateHeaders) -> Self {
        self.options.duplicate_headers = policy;
        self
    }

    /// Sets the boundary grammar.
    #[must_use]
    pub const fn boundary_grammar(mut self, grammar: BoundaryGrammar) -> Self {
        self.options.boundary_grammar = grammar;
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> ParseOptions {
        self.options
    }
}
