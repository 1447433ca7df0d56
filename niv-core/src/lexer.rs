//! Lexer for nivlang.

use tracing::debug;

use crate::error::{
    CoreError, MALFORMED_INTERPOLATION, UNEXPECTED_CHARACTER, UNTERMINATED_STRING,
    UNTERMINATED_TEMPLATE,
};
use crate::span::{FileId, SourceFile, Span};

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Dot,          // .
    Minus,        // -
    Plus,         // +
    Semicolon,    // ;
    Slash,        // /
    Star,         // *
    Colon,        // :
    Question,     // ?

    // One or two character operators
    Bang,         // !
    NotEqual,     // !=
    Equal,        // =
    EqualEqual,   // ==
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=
    ArrayType,    // [] with no space in between

    // Literals
    Identifier,
    String,
    TemplateLiteral,
    Number,

    // Keywords
    And,
    Else,
    False,
    For,
    Func,
    If,
    In,
    Import,
    Nil,
    Or,
    Return,
    Test,
    True,
    Type,
    While,

    Eof,
}

/// One piece of a template literal as scanned from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Text(String),
    /// `{name}`; the span covers only the identifier.
    Interpolation { identifier: String, span: Span },
}

/// Decoded value carried by literal tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TokenValue {
    #[default]
    None,
    Number(f64),
    /// String contents without the surrounding quotes, escapes left as written.
    Str(String),
    Template(Vec<TemplateSegment>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token.
    pub lexeme: String,
    pub value: TokenValue,
    pub span: Span,
}

impl Token {
    /// Template segments, empty for every other token kind.
    pub fn template_segments(&self) -> &[TemplateSegment] {
        match &self.value {
            TokenValue::Template(segments) => segments,
            _ => &[],
        }
    }
}

/// Lex a source file into tokens, ending with a single `Eof` token.
///
/// Stops at the first malformed character, string or template.
pub fn lex(file: &SourceFile) -> Result<Vec<Token>, CoreError> {
    let source = file.text();
    let mut lexer = Lexer {
        file_id: file.id(),
        source,
        chars: source.as_bytes(),
        len: source.len(),
        index: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    debug!(path = file.path(), tokens = lexer.tokens.len(), "lexed source");
    Ok(lexer.tokens)
}

/// Static keyword table.
pub fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "and" => TokenKind::And,
        "else" => TokenKind::Else,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "func" => TokenKind::Func,
        "if" => TokenKind::If,
        "in" => TokenKind::In,
        "import" => TokenKind::Import,
        "nil" => TokenKind::Nil,
        "or" => TokenKind::Or,
        "return" => TokenKind::Return,
        "test" => TokenKind::Test,
        "true" => TokenKind::True,
        "type" => TokenKind::Type,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

struct Lexer<'src> {
    file_id: FileId,
    source: &'src str,
    chars: &'src [u8],
    len: usize,
    index: usize,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> Result<(), CoreError> {
        while let Some(ch) = self.peek_char() {
            let start = self.index;
            self.consume_char();

            match ch {
                b' ' | b'\t' | b'\r' | b'\n' => {}
                b'(' => self.simple_token(TokenKind::LeftParen, start),
                b')' => self.simple_token(TokenKind::RightParen, start),
                b'{' => self.simple_token(TokenKind::LeftBrace, start),
                b'}' => self.simple_token(TokenKind::RightBrace, start),
                b'[' => {
                    if self.match_char(b']') {
                        self.simple_token(TokenKind::ArrayType, start)
                    } else {
                        self.simple_token(TokenKind::LeftBracket, start)
                    }
                }
                b']' => self.simple_token(TokenKind::RightBracket, start),
                b',' => self.simple_token(TokenKind::Comma, start),
                b'.' => self.simple_token(TokenKind::Dot, start),
                b'-' => self.simple_token(TokenKind::Minus, start),
                b'+' => self.simple_token(TokenKind::Plus, start),
                b';' => self.simple_token(TokenKind::Semicolon, start),
                b'*' => self.simple_token(TokenKind::Star, start),
                b':' => self.simple_token(TokenKind::Colon, start),
                b'?' => self.simple_token(TokenKind::Question, start),
                b'!' => {
                    let kind = if self.match_char(b'=') {
                        TokenKind::NotEqual
                    } else {
                        TokenKind::Bang
                    };
                    self.simple_token(kind, start)
                }
                b'=' => {
                    let kind = if self.match_char(b'=') {
                        TokenKind::EqualEqual
                    } else {
                        TokenKind::Equal
                    };
                    self.simple_token(kind, start)
                }
                b'<' => {
                    let kind = if self.match_char(b'=') {
                        TokenKind::LessEqual
                    } else {
                        TokenKind::Less
                    };
                    self.simple_token(kind, start)
                }
                b'>' => {
                    let kind = if self.match_char(b'=') {
                        TokenKind::GreaterEqual
                    } else {
                        TokenKind::Greater
                    };
                    self.simple_token(kind, start)
                }
                b'/' => {
                    if self.match_char(b'/') {
                        // Line comment
                        while let Some(next) = self.peek_char() {
                            if next == b'\n' {
                                break;
                            }
                            self.consume_char();
                        }
                    } else {
                        self.simple_token(TokenKind::Slash, start)
                    }
                }
                b'"' => self.lex_string(start)?,
                b'`' => self.lex_template(start)?,
                b'0'..=b'9' => self.lex_number(start)?,
                _ if is_ident_start(ch) => self.lex_ident_or_keyword(start),
                _ => return Err(self.unexpected_char(start)),
            }
        }

        // EOF token at end
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            value: TokenValue::None,
            span: Span::empty(self.file_id, self.len as u32),
        });
        Ok(())
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file_id, start as u32, self.index as u32)
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, value: TokenValue) {
        self.tokens.push(Token {
            kind,
            lexeme: self.source[start..self.index].to_string(),
            value,
            span: self.span_from(start),
        });
    }

    fn simple_token(&mut self, kind: TokenKind, start: usize) {
        self.push_token(kind, start, TokenValue::None);
    }

    fn unexpected_char(&self, start: usize) -> CoreError {
        // `start` may sit inside a multi-byte character; report the whole one.
        let ch = self.source[start..].chars().next().unwrap_or('\u{FFFD}');
        let end = start + ch.len_utf8();
        CoreError::lex(
            UNEXPECTED_CHARACTER,
            format!("Unexpected character: {ch}"),
            Span::new(self.file_id, start as u32, end as u32),
        )
    }

    fn lex_string(&mut self, start: usize) -> Result<(), CoreError> {
        let content_start = self.index;
        while let Some(ch) = self.peek_char() {
            match ch {
                b'"' => {
                    let content = self.source[content_start..self.index].to_string();
                    self.consume_char(); // closing quote
                    self.push_token(TokenKind::String, start, TokenValue::Str(content));
                    return Ok(());
                }
                b'\\' => {
                    // Skip over escape sequence: backslash + next char (if any)
                    self.consume_char();
                    if self.peek_char().is_some() {
                        self.consume_char();
                    }
                }
                _ => self.consume_char(),
            }
        }

        Err(CoreError::lex(
            UNTERMINATED_STRING,
            "Unterminated string.",
            self.span_from(start),
        ))
    }

    fn lex_template(&mut self, start: usize) -> Result<(), CoreError> {
        let mut segments = Vec::new();
        let mut text_start = self.index;

        while let Some(ch) = self.peek_char() {
            match ch {
                b'`' => {
                    if text_start < self.index {
                        segments.push(TemplateSegment::Text(
                            self.source[text_start..self.index].to_string(),
                        ));
                    }
                    if segments.is_empty() {
                        segments.push(TemplateSegment::Text(String::new()));
                    }
                    self.consume_char(); // closing backtick
                    self.push_token(
                        TokenKind::TemplateLiteral,
                        start,
                        TokenValue::Template(segments),
                    );
                    return Ok(());
                }
                b'{' => {
                    if text_start < self.index {
                        segments.push(TemplateSegment::Text(
                            self.source[text_start..self.index].to_string(),
                        ));
                    }
                    segments.push(self.lex_interpolation()?);
                    text_start = self.index;
                }
                _ => self.consume_char(),
            }
        }

        Err(CoreError::lex(
            UNTERMINATED_TEMPLATE,
            "Unterminated template literal.",
            self.span_from(start),
        ))
    }

    /// `{ name }` inside a template; the cursor sits on the `{`.
    fn lex_interpolation(&mut self) -> Result<TemplateSegment, CoreError> {
        let open = self.index;
        self.consume_char(); // '{'
        self.skip_horizontal_whitespace();

        let ident_start = self.index;
        if self.peek_char().is_some_and(is_ident_start) {
            while self.peek_char().is_some_and(is_ident_continue) {
                self.consume_char();
            }
        }
        let ident_end = self.index;
        if ident_start == ident_end {
            return Err(CoreError::lex(
                MALFORMED_INTERPOLATION,
                "Expected identifier in template interpolation",
                self.span_from(open),
            ));
        }

        self.skip_horizontal_whitespace();
        if !self.match_char(b'}') {
            return Err(CoreError::lex(
                MALFORMED_INTERPOLATION,
                "Expected } after template interpolation",
                self.span_from(open),
            ));
        }

        Ok(TemplateSegment::Interpolation {
            identifier: self.source[ident_start..ident_end].to_string(),
            span: Span::new(self.file_id, ident_start as u32, ident_end as u32),
        })
    }

    fn lex_number(&mut self, start: usize) -> Result<(), CoreError> {
        // digits [ '.' digits ]?
        while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
            self.consume_char();
        }

        if self.peek_char() == Some(b'.') && self.peek_next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.consume_char(); // '.'
            while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
                self.consume_char();
            }
        }

        let text = &self.source[start..self.index];
        let value = text.parse::<f64>().map_err(|_| {
            CoreError::lex(
                UNEXPECTED_CHARACTER,
                format!("Invalid number literal: {text}"),
                self.span_from(start),
            )
        })?;
        self.push_token(TokenKind::Number, start, TokenValue::Number(value));
        Ok(())
    }

    fn lex_ident_or_keyword(&mut self, start: usize) {
        while self.peek_char().is_some_and(is_ident_continue) {
            self.consume_char();
        }

        let kind = keyword(&self.source[start..self.index]).unwrap_or(TokenKind::Identifier);
        self.simple_token(kind, start);
    }

    fn skip_horizontal_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(b' ' | b'\t')) {
            self.consume_char();
        }
    }

    fn match_char(&mut self, expected: u8) -> bool {
        if self.peek_char() == Some(expected) {
            self.consume_char();
            true
        } else {
            false
        }
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.chars.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.len {
            self.index += 1;
        }
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}
