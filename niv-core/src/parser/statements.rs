use super::{ParseResult, Parser};
use crate::ast::{AssignmentStatement, BinaryOp, Block, BlockItem, Expr, ExprKind, Stmt, StmtKind};
use crate::error::CoreError;
use crate::lexer::TokenKind;

const CONDITION_OPERATORS: &[TokenKind] = &[
    TokenKind::EqualEqual,
    TokenKind::NotEqual,
    TokenKind::Greater,
    TokenKind::GreaterEqual,
    TokenKind::Less,
    TokenKind::LessEqual,
];

impl<'t> Parser<'t> {
    /// Block body; the opening `{` has already been consumed.
    ///
    /// Items are parsed until `return` or `}`. A `return` is followed by
    /// exactly one expression and then the closing brace.
    pub(super) fn parse_block(&mut self) -> ParseResult<Block> {
        self.nested(Self::parse_block_at_depth)
    }

    fn parse_block_at_depth(&mut self) -> ParseResult<Block> {
        let start = self.previous()?.span;

        let mut items = Vec::new();
        while !self.check_any(&[TokenKind::RightBrace, TokenKind::Return]) {
            if self.check_any(&[TokenKind::Type, TokenKind::Func]) {
                items.push(BlockItem::Declaration(self.parse_declaration()?));
            } else {
                items.push(BlockItem::Statement(self.parse_statement()?));
            }
        }

        let return_expression = if self.match_kind(TokenKind::Return) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let close = self.consume(TokenKind::RightBrace, "Expected \"}\" after a block")?;
        Ok(Block {
            items,
            return_expression,
            span: start.to(close.span),
        })
    }

    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        if self.match_kind(TokenKind::If) {
            return self.parse_if_statement();
        }
        if self.match_kind(TokenKind::While) {
            return self.parse_while_statement();
        }
        if self.match_kind(TokenKind::For) {
            return self.parse_for_statement();
        }

        let assignment = self.parse_assignment()?;
        Ok(Stmt {
            span: assignment.span,
            kind: StmtKind::Assignment(assignment),
        })
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.previous()?.span;
        let condition = self.parse_condition()?;

        self.consume(
            TokenKind::LeftBrace,
            "Expected \"{\" after if condition, before then branch",
        )?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.match_kind(TokenKind::Else) {
            self.consume(
                TokenKind::LeftBrace,
                "Expected \"{\" after \"else\" keyword, before else branch",
            )?;
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = else_branch.as_ref().unwrap_or(&then_branch).span;
        Ok(Stmt {
            kind: StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span: start.to(end),
        })
    }

    /// `IDENT cmp term`; an if condition is never an arbitrary expression.
    fn parse_condition(&mut self) -> ParseResult<Expr> {
        let left = self.parse_identifier("Expected identifier for if condition")?;

        if !self.check_any(CONDITION_OPERATORS) {
            return Err(CoreError::parse(
                "If condition must be a boolean expression.",
                self.peek().span,
            ));
        }
        let operator = match self.advance().kind {
            TokenKind::EqualEqual => BinaryOp::Eq,
            TokenKind::NotEqual => BinaryOp::NotEq,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEq,
            TokenKind::Less => BinaryOp::Less,
            _ => BinaryOp::LessEq,
        };

        let right = self.parse_term("If condition must be a boolean expression.")?;
        let span = left.span.to(right.span);
        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.previous()?.span;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::LeftBrace, "Expected \"{\" after \"while\" condition")?;
        let body = self.parse_block()?;

        Ok(Stmt {
            span: start.to(body.span),
            kind: StmtKind::While { condition, body },
        })
    }

    /// `for init; condition; increment { body }`
    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.previous()?.span;
        let initializer = self.parse_assignment()?;

        let message = format!(
            "Expected \";\" after initializer for for loop, got {}",
            self.found()
        );
        self.consume(TokenKind::Semicolon, message)?;

        let condition = self.parse_expression()?;

        let message = format!(
            "Expected \";\" after condition for for loop, got {}",
            self.found()
        );
        self.consume(TokenKind::Semicolon, message)?;

        let increment = self.parse_assignment()?;

        let message = format!(
            "Expected \"{{\" after increment for for loop, got {}",
            self.found()
        );
        self.consume(TokenKind::LeftBrace, message)?;
        let body = self.parse_block()?;

        Ok(Stmt {
            span: start.to(body.span),
            kind: StmtKind::For {
                initializer: Some(initializer),
                condition: Some(condition),
                increment: Some(increment),
                body,
            },
        })
    }

    /// `IDENT = expression`
    fn parse_assignment(&mut self) -> ParseResult<AssignmentStatement> {
        let message = format!("Expected identifier, got {}", self.found());
        let left = self.parse_identifier(message)?;
        self.consume(TokenKind::Equal, "Expect \"=\" after identifier.")?;
        let right = self.parse_expression()?;

        Ok(AssignmentStatement {
            span: left.span.to(right.span),
            left,
            right,
        })
    }
}
