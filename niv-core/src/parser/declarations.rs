//! `type` and `func` declarations plus type annotations.

use indexmap::IndexMap;

use super::{ParseResult, Parser};
use crate::ast::{
    Declaration, FunctionDeclaration, FunctionType, FunctionTypeDeclaration, InterfaceType,
    Parameter, TypeAnnotation, TypeDeclaration,
};
use crate::error::{CoreError, SIGNATURE_NAME_MISMATCH};
use crate::lexer::TokenKind;

/// What a `type` declaration turned out to be.
enum ParsedTypeDeclaration {
    Plain(TypeDeclaration),
    Signature(FunctionTypeDeclaration),
}

impl<'t> Parser<'t> {
    pub(super) fn parse_declaration(&mut self) -> ParseResult<Declaration> {
        if self.match_kind(TokenKind::Type) {
            return match self.parse_type_declaration()? {
                ParsedTypeDeclaration::Plain(declaration) => Ok(Declaration::Type(declaration)),
                ParsedTypeDeclaration::Signature(signature) => {
                    if self.match_kind(TokenKind::Func) {
                        let function = self.parse_function_declaration(Some(signature))?;
                        Ok(Declaration::Function(function))
                    } else {
                        Err(CoreError::parse(
                            "Expected function declaration after type declaration",
                            signature.span,
                        ))
                    }
                }
            };
        }

        if self.match_kind(TokenKind::Func) {
            let function = self.parse_function_declaration(None)?;
            return Ok(Declaration::Function(function));
        }

        Err(CoreError::parse(
            "Expected type or function declaration",
            self.peek().span,
        ))
    }

    /// `type NAME = annotation`, with `type` already consumed.
    fn parse_type_declaration(&mut self) -> ParseResult<ParsedTypeDeclaration> {
        let start = self.previous()?.span;
        let name = self.consume(
            TokenKind::Identifier,
            "Expected identifier after \"type\" keyword",
        )?;
        self.consume(TokenKind::Equal, "Expected \"=\" after identifier")?;

        let definition = self.parse_type_annotation()?;
        let span = start.to(definition.span());
        Ok(match definition {
            TypeAnnotation::Function(definition) => {
                ParsedTypeDeclaration::Signature(FunctionTypeDeclaration {
                    name: name.lexeme,
                    definition,
                    span,
                })
            }
            definition => ParsedTypeDeclaration::Plain(TypeDeclaration {
                name: name.lexeme,
                definition,
                span,
            }),
        })
    }

    /// `func NAME = { params } { body }`, with `func` already consumed.
    fn parse_function_declaration(
        &mut self,
        signature: Option<FunctionTypeDeclaration>,
    ) -> ParseResult<FunctionDeclaration> {
        let start = self.previous()?.span;

        let message = format!("Expected function name, got {}", self.found());
        let name = self.consume(TokenKind::Identifier, message)?.lexeme;
        let message = format!("Expected = after function name, got {}", self.found());
        self.consume(TokenKind::Equal, message)?;

        if let Some(signature) = &signature {
            if signature.name != name {
                return Err(CoreError::parse_with_code(
                    SIGNATURE_NAME_MISMATCH,
                    "Expected function name to match type name",
                    signature.span,
                ));
            }
        }

        let message = format!("Expected {{ before function parameters, got {}", self.found());
        self.consume(TokenKind::LeftBrace, message)?;
        let parameters = self.parse_parameters(signature.as_ref().map(|s| &s.definition))?;
        let message = format!("Expected }} after function parameters, got {}", self.found());
        self.consume(TokenKind::RightBrace, message)?;

        let message = format!("Expected {{ before function body, got {}", self.found());
        self.consume(TokenKind::LeftBrace, message)?;
        let body = self.parse_block()?;

        Ok(FunctionDeclaration {
            name,
            parameters,
            return_type: signature.map(|signature| *signature.definition.return_type),
            span: start.to(body.span),
            body,
        })
    }

    /// Comma-separated parameter names. Types come from the bound signature,
    /// matched by name.
    fn parse_parameters(&mut self, signature: Option<&FunctionType>) -> ParseResult<Vec<Parameter>> {
        let mut parameters = Vec::new();
        if self.check(TokenKind::RightBrace) {
            return Ok(parameters);
        }

        loop {
            let message = format!("Expected parameter name, got {}", self.found());
            let token = self.consume(TokenKind::Identifier, message)?;
            let type_annotation = signature
                .and_then(|signature| signature.parameters.properties.get(&token.lexeme))
                .cloned();
            parameters.push(Parameter {
                name: token.lexeme,
                type_annotation,
                span: token.span,
            });

            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        Ok(parameters)
    }

    /// Type annotation:
    ///
    /// - `[]T` array of `T`
    /// - `{ name: T, ... }` interface
    /// - `{ name: T, ... }: R` function taking the interface and returning `R`
    /// - `name` simple type
    pub(super) fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        self.nested(Self::parse_type_annotation_at_depth)
    }

    fn parse_type_annotation_at_depth(&mut self) -> ParseResult<TypeAnnotation> {
        if self.check(TokenKind::ArrayType) {
            let start = self.advance().span;
            let element_type = self.parse_type_annotation()?;
            return Ok(TypeAnnotation::Array {
                span: start.to(element_type.span()),
                element_type: Box::new(element_type),
            });
        }

        if self.check(TokenKind::LeftBrace) {
            return self.parse_interface_or_function_type();
        }

        let name = self.consume(TokenKind::Identifier, "Expected type name")?;
        Ok(TypeAnnotation::Simple {
            name: name.lexeme,
            span: name.span,
        })
    }

    fn parse_interface_or_function_type(&mut self) -> ParseResult<TypeAnnotation> {
        let open = self.advance().span; // '{'

        let mut properties = IndexMap::new();
        if !self.check(TokenKind::RightBrace) {
            loop {
                let message = format!("Expected property name, got {}", self.found());
                let name = self.consume(TokenKind::Identifier, message)?;
                self.consume(TokenKind::Colon, "Expected : after property name")?;
                let annotation = self.parse_type_annotation()?;
                properties.insert(name.lexeme, annotation);

                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.consume(TokenKind::RightBrace, "Expected } after interface type")?;
        let interface = InterfaceType {
            properties,
            span: open.to(close.span),
        };

        if self.match_kind(TokenKind::Colon) {
            let return_type = self.parse_type_annotation()?;
            return Ok(TypeAnnotation::Function(FunctionType {
                span: open.to(return_type.span()),
                parameters: interface,
                return_type: Box::new(return_type),
            }));
        }

        Ok(TypeAnnotation::Interface(interface))
    }
}
