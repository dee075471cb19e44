//! tagtree Parser
//!
//! Builds a node tree from the token stream produced by `tagtree-lexer`.
//! Elements nest by explicit open and close tags; barewords between tags
//! become text nodes. The tree lives in an arena ([`Tree`]) addressed by
//! [`NodeId`], rooted at a caller-supplied root node.
//!
//! ```text
//! "<p>Hello <em>world</em>!</p>"
//!   root
//!     p
//!       TEXT "Hello"
//!       em
//!         TEXT "world"
//!       TEXT "!"
//! ```

pub mod parser;
pub mod tree;

pub use parser::{ParseOptions, Parser};
pub use tree::{Attrs, Node, NodeId, Tree, ROOT_TAG, TEXT_TAG};

use tagtree_lexer::{LexError, TokenKind};

/// Parser error with position information and the unparsed remainder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the offending token in the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    /// Markup from the offending token onwards, rebuilt from the tokens
    /// (line breaks are not included).
    pub remaining: String,
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found} {text:?}")]
    Unexpected {
        expected: &'static str,
        found: TokenKind,
        text: String,
    },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: &'static str },

    #[error("closing tag </{tag}> has no open element to close")]
    UnbalancedClose { tag: String },

    /// Only raised when [`ParseOptions::check_closing_tags`] is set.
    #[error("closing tag </{found}> does not match open element <{open}>")]
    MismatchedClose { open: String, found: String },

    #[error("no token matches {:?}", .0.remaining)]
    Lex(LexError),
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            offset: err.offset,
            line: err.line,
            column: err.column,
            remaining: err.remaining.clone(),
            kind: ParseErrorKind::Lex(err),
        }
    }
}
