//! Located syntax tree produced by the parser.
//!
//! Every node family is a closed enum so that the parser and the code
//! generator match exhaustively. All nodes carry the [`Span`] of the
//! source text they were parsed from.

use indexmap::IndexMap;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Function(FunctionDeclaration),
    Type(TypeDeclaration),
}

impl Declaration {
    pub fn span(&self) -> Span {
        match self {
            Declaration::Function(function) => function.span,
            Declaration::Type(declaration) => declaration.span,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(function) => &function.name,
            Declaration::Type(declaration) => &declaration.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
    /// Taken from the signature bound with `type name = {...}: T`.
    pub return_type: Option<TypeAnnotation>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclaration {
    pub name: String,
    pub definition: TypeAnnotation,
    pub span: Span,
}

/// `type name = {...}: T`. Only lives long enough to be bound to the
/// `func` declaration that must follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeDeclaration {
    pub name: String,
    pub definition: FunctionType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    Simple { name: String, span: Span },
    Array { element_type: Box<TypeAnnotation>, span: Span },
    Interface(InterfaceType),
    Function(FunctionType),
}

impl TypeAnnotation {
    pub fn span(&self) -> Span {
        match self {
            TypeAnnotation::Simple { span, .. } | TypeAnnotation::Array { span, .. } => *span,
            TypeAnnotation::Interface(interface) => interface.span,
            TypeAnnotation::Function(function) => function.span,
        }
    }

    /// Name of a simple type, `None` for structured types.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeAnnotation::Simple { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Structural record type. Property order follows the source.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub properties: IndexMap<String, TypeAnnotation>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameters: InterfaceType,
    pub return_type: Box<TypeAnnotation>,
    pub span: Span,
}

/// `{ ... }` body of a function or control-flow statement.
///
/// `return_expression` is always the last construct of the block and never
/// appears in `items`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<BlockItem>,
    pub return_expression: Option<Expr>,
    pub span: Span,
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.return_expression.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Statement(Stmt),
    Declaration(Declaration),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Assignment(AssignmentStatement),
    If {
        condition: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    /// The grammar requires all three clauses today.
    For {
        initializer: Option<AssignmentStatement>,
        condition: Option<Expr>,
        increment: Option<AssignmentStatement>,
        body: Block,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStatement {
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn identifier(name: impl Into<String>, span: Span) -> Self {
        Expr::new(ExprKind::Identifier(name.into()), span)
    }

    /// Binary and unary nodes are the ones the emitter parenthesizes.
    pub fn is_operation(&self) -> bool {
        matches!(self.kind, ExprKind::Binary { .. } | ExprKind::Unary { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(LiteralValue),
    Identifier(String),
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOp,
        argument: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `object.property` when not computed, `object[property]` otherwise.
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Array(Vec<Expr>),
    Object(IndexMap<String, Expr>),
    Template(Vec<TemplatePart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    /// Contents without quotes, escapes left as written.
    String(String),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Interpolation(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinaryOp {
    /// Operator spelling in generated JavaScript.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}
