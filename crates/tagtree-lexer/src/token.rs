use std::fmt;

use serde::Serialize;

/// A position in source text, tracking byte offsets plus line and column for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Token classification for markup templates.
///
/// Variant order is the match priority: the scanner tries each kind in
/// [`TokenKind::PRIORITY`] order and the first one that matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// `\n`
    LineBreak,
    /// `<`
    OpenAngle,
    /// `>`
    CloseAngle,
    /// A single whitespace character.
    Whitespace,
    /// `/`
    Slash,
    /// `"`
    Quote,
    /// `=`
    Equals,
    /// A maximal run of ASCII letters, digits, or `!`.
    Bareword,
}

impl TokenKind {
    /// Every kind, in the order the scanner tries them.
    pub const PRIORITY: [TokenKind; 8] = [
        TokenKind::LineBreak,
        TokenKind::OpenAngle,
        TokenKind::CloseAngle,
        TokenKind::Whitespace,
        TokenKind::Slash,
        TokenKind::Quote,
        TokenKind::Equals,
        TokenKind::Bareword,
    ];

    /// Length in bytes of the prefix of `rest` this kind matches, if any.
    ///
    /// Never returns `Some(0)`.
    pub fn match_prefix(self, rest: &str) -> Option<usize> {
        let first = rest.chars().next()?;
        let len = match self {
            TokenKind::LineBreak => usize::from(first == '\n'),
            TokenKind::OpenAngle => usize::from(first == '<'),
            TokenKind::CloseAngle => usize::from(first == '>'),
            TokenKind::Whitespace if is_whitespace_char(first) => first.len_utf8(),
            TokenKind::Whitespace => 0,
            TokenKind::Slash => usize::from(first == '/'),
            TokenKind::Quote => usize::from(first == '"'),
            TokenKind::Equals => usize::from(first == '='),
            // Barewords are ASCII-only, so bytes and chars coincide.
            TokenKind::Bareword => rest.bytes().take_while(|&b| is_bareword_byte(b)).count(),
        };
        (len > 0).then_some(len)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LineBreak => "line break",
            TokenKind::OpenAngle => "'<'",
            TokenKind::CloseAngle => "'>'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Slash => "'/'",
            TokenKind::Quote => "'\"'",
            TokenKind::Equals => "'='",
            TokenKind::Bareword => "bareword",
        };
        f.write_str(name)
    }
}

/// A token produced by the lexer. `text` is exactly the slice of source it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Whitespace as ECMAScript `\s` defines it: Unicode `White_Space` minus
/// U+0085 (NEL), plus U+FEFF (byte-order mark).
pub fn is_whitespace_char(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Check if a byte may appear inside a bareword.
pub fn is_bareword_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'!'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_priority_matches_declaration_order() {
        assert_eq!(TokenKind::PRIORITY[0], TokenKind::LineBreak);
        assert_eq!(TokenKind::PRIORITY[7], TokenKind::Bareword);
    }

    #[test]
    fn test_line_break_is_also_whitespace() {
        // Both match; priority decides.
        assert_eq!(TokenKind::LineBreak.match_prefix("\nx"), Some(1));
        assert_eq!(TokenKind::Whitespace.match_prefix("\nx"), Some(1));
    }

    #[test]
    fn test_bareword_is_greedy() {
        assert_eq!(TokenKind::Bareword.match_prefix("Hello! world"), Some(6));
        assert_eq!(TokenKind::Bareword.match_prefix("<div"), None);
    }

    #[test]
    fn test_whitespace_matches_one_char() {
        assert_eq!(TokenKind::Whitespace.match_prefix("   "), Some(1));
        assert_eq!(TokenKind::Whitespace.match_prefix("\u{a0}a"), Some(2));
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(TokenKind::Whitespace.match_prefix("\u{feff}<p>"), Some(3));
    }

    #[test]
    fn test_next_line_is_not_whitespace() {
        assert_eq!(TokenKind::Whitespace.match_prefix("\u{85}"), None);
        for kind in TokenKind::PRIORITY {
            assert_eq!(kind.match_prefix("\u{85}b"), None);
        }
    }

    #[test]
    fn test_empty_input_matches_nothing() {
        for kind in TokenKind::PRIORITY {
            assert_eq!(kind.match_prefix(""), None);
        }
    }
}
