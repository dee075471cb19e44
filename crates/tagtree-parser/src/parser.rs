//! Tree builder.
//!
//! Consumes a token stream (from `tagtree-lexer`) and attaches elements and
//! text nodes to a caller-supplied [`Tree`]. Decisions are made one token at
//! a time in a single loop; the chain of open elements is an explicit stack,
//! so nesting depth and input length never grow the call stack.
//!
//! Closing tags close the innermost open element by position. Their name is
//! not compared with the element being closed unless
//! [`ParseOptions::check_closing_tags`] is set.

use crate::tree::{Attrs, Node, NodeId, Tree};
use crate::{ParseError, ParseErrorKind};
use tagtree_lexer::{Token, TokenKind};

/// Knobs for the tree builder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail with [`ParseErrorKind::MismatchedClose`] when a closing tag's
    /// name differs from the element it closes.
    pub check_closing_tags: bool,
}

/// Markup tree builder.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    tree: Tree,
    /// Open elements, innermost last. Empty means the root is current.
    open: Vec<NodeId>,
    options: ParseOptions,
}

impl Parser {
    /// Create a builder that attaches nodes below the root of `tree`.
    /// Line-break tokens are dropped here.
    pub fn new(tokens: Vec<Token>, tree: Tree) -> Self {
        Self::with_options(tokens, tree, ParseOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, tree: Tree, options: ParseOptions) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| !t.is(TokenKind::LineBreak))
            .collect();
        Self {
            tokens,
            pos: 0,
            tree,
            open: Vec::new(),
            options,
        }
    }

    /// Tokenize and parse source into a fresh tree.
    pub fn parse(source: &str) -> Result<Tree, ParseError> {
        Self::parse_with(source, ParseOptions::default())
    }

    pub fn parse_with(source: &str, options: ParseOptions) -> Result<Tree, ParseError> {
        let tokens = tagtree_lexer::tokenize(source)?;
        Parser::with_options(tokens, Tree::new(), options).build()
    }

    /// Consume every token and return the finished tree.
    pub fn build(mut self) -> Result<Tree, ParseError> {
        loop {
            self.skip_whitespace();

            let Some(kind) = self.peek_kind() else {
                break;
            };

            match kind {
                TokenKind::Bareword => self.parse_text(),
                TokenKind::OpenAngle if self.peek_kind_at(1) == Some(TokenKind::Slash) => {
                    self.parse_closing_tag()?
                }
                TokenKind::OpenAngle => self.parse_opening_tag()?,
                _ => return Err(self.error_here("text or a tag")),
            }
        }

        if !self.open.is_empty() {
            log::debug!(
                "{} element(s) still open at end of input",
                self.open.len()
            );
        }
        self.open.clear();

        log::debug!("built tree with {} nodes", self.tree.len());
        Ok(self.tree)
    }

    // =========================================================================
    // Productions
    // =========================================================================

    /// A single bareword between tags.
    fn parse_text(&mut self) {
        let content = self.tokens[self.pos].text.clone();
        self.pos += 1;
        let parent = self.current();
        let _ = self.tree.append_child(parent, Node::text(content));
    }

    /// `<name attr="value" ...>`
    fn parse_opening_tag(&mut self) -> Result<(), ParseError> {
        self.pos += 1; // consume `<`
        let tag = self.expect(TokenKind::Bareword, "tag name")?.text.clone();
        let attrs = self.parse_attrs()?;
        self.expect(TokenKind::CloseAngle, "'>'")?;

        let parent = self.current();
        log::trace!("open <{tag}> at depth {}", self.tree[parent].depth + 1);
        let id = self.tree.append_child(parent, Node::element(tag, attrs));
        self.open.push(id);
        Ok(())
    }

    /// `</name>`
    fn parse_closing_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2; // consume `<` `/`
        let tag = self.expect(TokenKind::Bareword, "closing tag name")?.text.clone();
        self.expect(TokenKind::CloseAngle, "'>'")?;

        let Some(closed) = self.open.pop() else {
            return Err(self.error_at(start, ParseErrorKind::UnbalancedClose { tag }));
        };

        let open_tag = &self.tree[closed].tag;
        if self.options.check_closing_tags && *open_tag != tag {
            let kind = ParseErrorKind::MismatchedClose {
                open: open_tag.clone(),
                found: tag,
            };
            return Err(self.error_at(start, kind));
        }

        log::trace!("close <{open_tag}> with </{tag}>");
        Ok(())
    }

    /// Attributes up to (not including) the closing `>`.
    /// Every attribute is `key="value"` with a single-bareword value.
    fn parse_attrs(&mut self) -> Result<Attrs, ParseError> {
        let mut attrs = Attrs::new();
        self.skip_whitespace();

        while self.peek_kind() != Some(TokenKind::CloseAngle) {
            let key = self.expect(TokenKind::Bareword, "attribute name")?.text.clone();
            self.expect(TokenKind::Equals, "'='")?;
            self.expect(TokenKind::Quote, "opening '\"'")?;
            let value = self.expect(TokenKind::Bareword, "attribute value")?.text.clone();
            self.expect(TokenKind::Quote, "closing '\"'")?;
            // Later duplicates win.
            let _ = attrs.insert(key, value);
            self.skip_whitespace();
        }

        Ok(attrs)
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    /// Where new nodes attach: the innermost open element, else the root.
    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.tree.root())
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek_kind_at(0)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_kind() == Some(TokenKind::Whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&Token, ParseError> {
        if self.peek_kind() != Some(kind) {
            return Err(self.error_here(expected));
        }
        self.pos += 1;
        Ok(&self.tokens[self.pos - 1])
    }

    /// Error for whatever sits at the cursor, or for running out of input.
    fn error_here(&self, expected: &'static str) -> ParseError {
        let kind = match self.tokens.get(self.pos) {
            Some(token) => ParseErrorKind::Unexpected {
                expected,
                found: token.kind,
                text: token.text.clone(),
            },
            None => ParseErrorKind::UnexpectedEnd { expected },
        };
        self.error_at(self.pos, kind)
    }

    fn error_at(&self, pos: usize, kind: ParseErrorKind) -> ParseError {
        let (offset, line, column) = match self.tokens.get(pos) {
            Some(token) => (token.span.start, token.span.line, token.span.column),
            None => self.end_position(),
        };
        let remaining: String = self
            .tokens
            .get(pos..)
            .unwrap_or_default()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        ParseError {
            kind,
            offset,
            line,
            column,
            remaining,
        }
    }

    /// Position just past the last token.
    fn end_position(&self) -> (usize, usize, usize) {
        match self.tokens.last() {
            Some(last) => (
                last.span.end,
                last.span.line,
                last.span.column + last.text.chars().count(),
            ),
            None => (0, 1, 1),
        }
    }
}
