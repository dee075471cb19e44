//! tagtree Lexer
//!
//! Tokenizes markup template source into a flat stream of tokens.
//! Recognizes angle brackets, slashes, quotes, equals signs, single
//! whitespace characters, line breaks, and barewords (runs of ASCII
//! letters, digits, and `!`). Anything else is a [`LexError`].
//!
//! # Example
//!
//! ```
//! use tagtree_lexer::tokenize;
//!
//! let tokens = tokenize("<b>hi</b>").unwrap();
//! assert_eq!(tokens.len(), 8);
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind};

/// Lexer error: no token pattern matches at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: no token matches {remaining:?}")]
pub struct LexError {
    /// The unmatched remainder of the source.
    pub remaining: String,
    /// Byte offset of the remainder in the source.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// Tokenize `source`. Shorthand for [`Scanner::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Scanner::tokenize(source)
}
