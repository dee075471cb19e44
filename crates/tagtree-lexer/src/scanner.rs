use crate::token::{Span, Token, TokenKind};
use crate::LexError;

/// Markup template scanner.
///
/// Walks the source with a byte cursor. At each position every
/// [`TokenKind`] is tried in priority order against the unconsumed
/// remainder and the first match becomes the next token. Whitespace is
/// taken one character at a time; barewords are taken greedily.
///
/// Line and column are tracked only for diagnostics.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        log::debug!(
            "tokenized {} bytes into {} tokens",
            source.len(),
            scanner.tokens.len()
        );
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }
        Ok(())
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), LexError> {
        let rest = self.remaining();
        let (kind, len) = TokenKind::PRIORITY
            .into_iter()
            .find_map(|kind| kind.match_prefix(rest).map(|len| (kind, len)))
            .ok_or_else(|| self.error())?;

        let text = &rest[..len];
        let span = Span::new(self.pos, self.pos + len, self.line, self.column);
        log::trace!("{kind} {text:?} at {}:{}", span.line, span.column);
        self.tokens.push(Token::new(kind, text, span));
        self.advance(kind, len);
        Ok(())
    }

    // --- Helpers ---

    fn advance(&mut self, kind: TokenKind, len: usize) {
        if kind == TokenKind::LineBreak {
            self.line += 1;
            self.column = 1;
        } else {
            // Whitespace may be multi-byte; every other kind is ASCII.
            self.column += self.source[self.pos..self.pos + len].chars().count();
        }
        self.pos += len;
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn error(&self) -> LexError {
        LexError {
            remaining: self.remaining().to_string(),
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }
}
