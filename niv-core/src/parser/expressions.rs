use indexmap::IndexMap;

use super::{ParseResult, Parser};
use crate::ast::{BinaryOp, Expr, ExprKind, LiteralValue, TemplatePart, UnaryOp};
use crate::error::{AMBIGUOUS_BINARY_CHAIN, CoreError};
use crate::lexer::{TemplateSegment, TokenKind, TokenValue};

const AMBIGUOUS_CHAIN_MESSAGE: &str =
    "You must use parentheses when combining more than 2 terms (e.g. \"1 + (2 * 3)\")";

/// Primary term with its postfix chain, remembering whether it was written
/// in parentheses.
struct Operand {
    expr: Expr,
    parenthesized: bool,
}

impl Operand {
    fn bare(expr: Expr) -> Self {
        Operand {
            expr,
            parenthesized: false,
        }
    }
}

impl<'t> Parser<'t> {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::parse_expression_at_depth)
    }

    fn parse_expression_at_depth(&mut self) -> ParseResult<Expr> {
        if self.check(TokenKind::TemplateLiteral) {
            return Ok(self.parse_template());
        }
        if self.check_any(&[TokenKind::LeftBracket, TokenKind::ArrayType]) {
            return self.parse_array();
        }
        if self.check(TokenKind::LeftBrace) {
            return self.parse_object();
        }

        let first = self.parse_operand()?;
        self.parse_binary(first)
    }

    /// Left-associative chain of operands. More than two operands need at
    /// least one side of each extra combination to be parenthesized.
    fn parse_binary(&mut self, first: Operand) -> ParseResult<Expr> {
        let mut left = first;
        let mut terms = 1;

        while let Some(operator) = binary_operator(self.peek().kind) {
            self.advance();
            let right = self.parse_operand()?;
            terms += 1;

            let span = left.expr.span.to(right.expr.span);
            if terms > 2 && !left.parenthesized && !right.parenthesized {
                return Err(CoreError::parse_with_code(
                    AMBIGUOUS_BINARY_CHAIN,
                    AMBIGUOUS_CHAIN_MESSAGE,
                    span,
                ));
            }

            left = Operand::bare(Expr::new(
                ExprKind::Binary {
                    left: Box::new(left.expr),
                    operator,
                    right: Box::new(right.expr),
                },
                span,
            ));
        }

        Ok(left.expr)
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let primary = self.parse_primary()?;
        let mut expr = primary.expr;
        let mut parenthesized = primary.parenthesized;

        loop {
            expr = if self.match_kind(TokenKind::LeftParen) {
                self.finish_call(expr)?
            } else if self.match_kind(TokenKind::LeftBracket) {
                let index = self.parse_expression()?;
                let close =
                    self.consume(TokenKind::RightBracket, "Expect \"]\" after array index.")?;
                let span = expr.span.to(close.span);
                Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(index),
                        computed: true,
                    },
                    span,
                )
            } else if self.match_kind(TokenKind::Dot) {
                let name =
                    self.consume(TokenKind::Identifier, "Expect property name after \".\"")?;
                let span = expr.span.to(name.span);
                Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(Expr::identifier(name.lexeme, name.span)),
                        computed: false,
                    },
                    span,
                )
            } else {
                break;
            };
            parenthesized = false;
        }

        Ok(Operand {
            expr,
            parenthesized,
        })
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.consume(TokenKind::RightParen, "Expect \")\" after arguments.")?;

        let span = callee.span.to(close.span);
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            span,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Operand> {
        let kind = self.peek().kind;
        match kind {
            TokenKind::LeftParen => {
                let open = self.advance().span;
                let inner = self.parse_expression()?;
                let close = self.consume(TokenKind::RightParen, "Expect \")\" after expression.")?;
                Ok(Operand {
                    expr: Expr::new(inner.kind, open.to(close.span)),
                    parenthesized: true,
                })
            }
            TokenKind::LeftBrace => Ok(Operand::bare(self.parse_object()?)),
            TokenKind::Minus | TokenKind::Bang => {
                let operator = if kind == TokenKind::Minus {
                    UnaryOp::Neg
                } else {
                    UnaryOp::Not
                };
                let start = self.advance().span;
                let argument = self.nested(Self::parse_operand)?.expr;
                let span = start.to(argument.span);
                Ok(Operand::bare(Expr::new(
                    ExprKind::Unary {
                        operator,
                        argument: Box::new(argument),
                    },
                    span,
                )))
            }
            _ => Ok(Operand::bare(self.parse_term("Expect expression.")?)),
        }
    }

    /// Literal or identifier.
    pub(super) fn parse_term(&mut self, message: impl Into<String>) -> ParseResult<Expr> {
        if self.check(TokenKind::Identifier) {
            return self.parse_identifier(message);
        }
        if self.check_any(&[
            TokenKind::Number,
            TokenKind::String,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Nil,
        ]) {
            return self.parse_literal();
        }
        Err(CoreError::parse(message, self.peek().span))
    }

    fn parse_literal(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let value = match (&token.kind, &token.value) {
            (TokenKind::Number, TokenValue::Number(value)) => LiteralValue::Number(*value),
            (TokenKind::String, TokenValue::Str(text)) => LiteralValue::String(text.clone()),
            (TokenKind::True, _) => LiteralValue::Bool(true),
            (TokenKind::False, _) => LiteralValue::Bool(false),
            (TokenKind::Nil, _) => LiteralValue::Nil,
            _ => return Err(CoreError::parse("Expect literal.", token.span)),
        };
        let span = self.advance().span;
        Ok(Expr::new(ExprKind::Literal(value), span))
    }

    pub(super) fn parse_identifier(&mut self, message: impl Into<String>) -> ParseResult<Expr> {
        let token = self.consume(TokenKind::Identifier, message)?;
        Ok(Expr::identifier(token.lexeme, token.span))
    }

    fn parse_array(&mut self) -> ParseResult<Expr> {
        let open = self.advance();
        if open.kind == TokenKind::ArrayType {
            // `[]` lexes as a single token
            return Ok(Expr::new(ExprKind::Array(Vec::new()), open.span));
        }

        let mut elements = Vec::new();
        if !self.check(TokenKind::RightBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.consume(TokenKind::RightBracket, "Expect \"]\" after array elements.")?;
        Ok(Expr::new(ExprKind::Array(elements), open.span.to(close.span)))
    }

    /// `{ name: value, shorthand }`
    fn parse_object(&mut self) -> ParseResult<Expr> {
        let open = self.advance().span;

        let mut properties = IndexMap::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                let message = format!("Expected property name, got {}", self.found());
                let name = self.consume(TokenKind::Identifier, message)?;
                let value = if self.match_kind(TokenKind::Colon) {
                    self.parse_expression()?
                } else {
                    Expr::identifier(name.lexeme.clone(), name.span)
                };
                properties.insert(name.lexeme, value);

                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.consume(TokenKind::RightBrace, "Expected } after object literal")?;
        Ok(Expr::new(ExprKind::Object(properties), open.to(close.span)))
    }

    fn parse_template(&mut self) -> Expr {
        let token = self.advance();
        let parts = token
            .template_segments()
            .iter()
            .map(|segment| match segment {
                TemplateSegment::Text(text) => TemplatePart::Text(text.clone()),
                TemplateSegment::Interpolation { identifier, span } => {
                    TemplatePart::Interpolation(Expr::identifier(identifier.clone(), *span))
                }
            })
            .collect();
        Expr::new(ExprKind::Template(parts), token.span)
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    let operator = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::EqualEqual => BinaryOp::Eq,
        TokenKind::NotEqual => BinaryOp::NotEq,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessEq,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterEq,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    };
    Some(operator)
}
