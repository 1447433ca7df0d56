//! Recursive-descent parser for nivlang.
//!
//! The parser is split by grammar family: declarations (and type
//! annotations), statements and expressions each live in their own module
//! as `impl Parser` blocks sharing the cursor defined here. Every failure is
//! a located [`CoreError::Parse`]; there is no recovery, the first error
//! aborts.

mod declarations;
mod expressions;
mod statements;

use tracing::debug;

use crate::ast::Program;
use crate::error::{CoreError, NESTING_TOO_DEEP};
use crate::lexer::{Token, TokenKind};
use crate::span::{FileId, Span};

pub type ParseResult<T> = Result<T, CoreError>;

/// Blocks, expressions and type annotations nested deeper than this are
/// rejected before the recursion can exhaust the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a token sequence (as produced by [`crate::lexer::lex`]) into a
/// [`Program`].
pub fn parse(tokens: &[Token], file: FileId) -> ParseResult<Program> {
    let mut parser = Parser::new(tokens, file);
    let program = parser.parse_program()?;
    debug!(declarations = program.declarations.len(), "parsed program");
    Ok(program)
}

/// Cursor over a token slice.
pub struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    file: FileId,
    eof: Token,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token], file: FileId) -> Self {
        // Stands in for a missing sentinel so the cursor never runs off the slice.
        let end = tokens.last().map_or(0, |token| token.span.end);
        let eof = Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            value: Default::default(),
            span: Span::empty(file, end),
        };
        Parser {
            tokens,
            current: 0,
            file,
            eof,
            depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut declarations = Vec::new();
        while !self.is_at_end() {
            declarations.push(self.parse_declaration()?);
        }

        let end = if self.current == 0 {
            0
        } else {
            self.previous()?.span.end
        };
        Ok(Program {
            declarations,
            span: Span::new(self.file, 0, end),
        })
    }

    // ---------------------------------------------------------------------
    // Cursor primitives
    // ---------------------------------------------------------------------

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn previous(&self) -> ParseResult<&Token> {
        if self.current == 0 {
            return Err(CoreError::parse(
                "No previous token",
                Span::empty(self.file, 0),
            ));
        }
        Ok(&self.tokens[self.current - 1])
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        !self.is_at_end() && kinds.contains(&self.peek().kind)
    }

    /// Advance past the current token if it has the given kind.
    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: impl Into<String>) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(CoreError::parse(message, self.peek().span))
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CoreError::parse_with_code(
                NESTING_TOO_DEEP,
                format!("Nesting exceeds {MAX_NESTING_DEPTH} levels"),
                self.peek().span,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// How the current token reads in an error message.
    fn found(&self) -> &str {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            "end of input"
        } else {
            &token.lexeme
        }
    }
}
