//! JavaScript backend.
//!
//! Walks the AST and writes JavaScript text into a string buffer. Statements
//! are emitted line by line with two spaces of indentation per nesting
//! level; expressions render as plain strings.
//!
//! Type information is dropped: signatures bound to functions vanish and a
//! standalone type declaration leaves only a `// Type: NAME` comment.
//! Plain string literals are emitted as backtick literals, the same as
//! templates without interpolations.
//!
//! Parenthesization is structural. Any operand that is itself a binary or
//! unary operation is wrapped in parentheses, regardless of operator
//! precedence, so `1 + (2 * 3)` round-trips and `(1 + 2) * 3` keeps its
//! meaning.

use crate::ast::{
    AssignmentStatement, Block, BlockItem, Declaration, Expr, ExprKind, FunctionDeclaration,
    LiteralValue, Program, Stmt, StmtKind, TemplatePart,
};

const INDENT: &str = "  ";

/// Generate JavaScript source for a whole program.
pub fn generate_js(program: &Program) -> String {
    let mut emitter = JsEmitter::default();
    for declaration in &program.declarations {
        emitter.declaration(declaration, 0);
    }
    emitter.out
}

#[derive(Default)]
struct JsEmitter {
    out: String,
}

impl JsEmitter {
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn declaration(&mut self, declaration: &Declaration, level: usize) {
        match declaration {
            Declaration::Function(function) => self.function(function, level),
            Declaration::Type(declaration) => {
                self.line(level, &format!("// Type: {}", declaration.name));
            }
        }
    }

    fn function(&mut self, function: &FunctionDeclaration, level: usize) {
        let parameters: Vec<&str> = function
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        self.line(
            level,
            &format!("function {}({}) {{", function.name, parameters.join(", ")),
        );
        self.block(&function.body, level + 1);
        self.line(level, "}");
        self.out.push('\n');
    }

    fn block(&mut self, block: &Block, level: usize) {
        for item in &block.items {
            match item {
                BlockItem::Statement(statement) => self.statement(statement, level),
                BlockItem::Declaration(declaration) => self.declaration(declaration, level),
            }
        }
        if let Some(expr) = &block.return_expression {
            self.line(level, &format!("return {};", expression(expr)));
        }
    }

    fn statement(&mut self, statement: &Stmt, level: usize) {
        match &statement.kind {
            StmtKind::Assignment(inner) => {
                self.line(level, &format!("{};", assignment(inner)));
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(level, &format!("if ({}) {{", expression(condition)));
                self.block(then_branch, level + 1);
                if let Some(else_branch) = else_branch {
                    self.line(level, "} else {");
                    self.block(else_branch, level + 1);
                }
                self.line(level, "}");
            }
            StmtKind::While { condition, body } => {
                self.line(level, &format!("while ({}) {{", expression(condition)));
                self.block(body, level + 1);
                self.line(level, "}");
            }
            StmtKind::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                let initializer = initializer.as_ref().map(assignment).unwrap_or_default();
                let condition = condition.as_ref().map(expression).unwrap_or_default();
                let increment = increment.as_ref().map(assignment).unwrap_or_default();
                self.line(
                    level,
                    &format!("for ({initializer}; {condition}; {increment}) {{"),
                );
                self.block(body, level + 1);
                self.line(level, "}");
            }
        }
    }
}

/// `left = right` without the trailing semicolon.
fn assignment(assignment: &AssignmentStatement) -> String {
    format!(
        "{} = {}",
        expression(&assignment.left),
        expression(&assignment.right)
    )
}

/// Render an expression as JavaScript.
pub fn expression(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(value) => literal(value),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Binary {
            left,
            operator,
            right,
        } => format!(
            "{} {} {}",
            operand(left),
            operator.as_str(),
            operand(right)
        ),
        ExprKind::Unary { operator, argument } => {
            format!("{}{}", operator.as_str(), operand(argument))
        }
        ExprKind::Call { callee, arguments } => {
            let arguments: Vec<String> = arguments.iter().map(expression).collect();
            format!("{}({})", operand(callee), arguments.join(", "))
        }
        ExprKind::Member {
            object,
            property,
            computed,
        } => {
            if *computed {
                format!("{}[{}]", operand(object), expression(property))
            } else {
                format!("{}.{}", operand(object), expression(property))
            }
        }
        ExprKind::Array(elements) => {
            let elements: Vec<String> = elements.iter().map(expression).collect();
            format!("[{}]", elements.join(", "))
        }
        ExprKind::Object(properties) => {
            let properties: Vec<String> = properties
                .iter()
                .map(|(name, value)| format!("{name}: {}", expression(value)))
                .collect();
            format!("{{ {} }}", properties.join(", "))
        }
        ExprKind::Template(parts) => template(parts),
    }
}

fn operand(expr: &Expr) -> String {
    if expr.is_operation() {
        format!("({})", expression(expr))
    } else {
        expression(expr)
    }
}

fn literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Number(value) => number(*value),
        LiteralValue::String(text) => format!("`{}`", template_text(text)),
        LiteralValue::Bool(value) => value.to_string(),
        LiteralValue::Nil => "null".to_string(),
    }
}

/// Digit runs too long for an `f64` overflow to infinity.
fn number(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        format!("{sign}Infinity")
    } else {
        value.to_string()
    }
}

fn template(parts: &[TemplatePart]) -> String {
    let mut out = String::from("`");
    for part in parts {
        match part {
            TemplatePart::Text(text) => out.push_str(&template_text(text)),
            TemplatePart::Interpolation(expr) => {
                out.push_str("${");
                out.push_str(&expression(expr));
                out.push('}');
            }
        }
    }
    out.push('`');
    out
}

/// Text inside backticks. Escapes written in source pass through untouched;
/// a literal backtick or `${` would end the text early and is escaped.
fn template_text(text: &str) -> String {
    text.replace('`', "\\`").replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::ast::{BinaryOp, UnaryOp};
    use crate::lexer::lex;
    use crate::parser::parse;
    use crate::span::{FileId, SourceFile, Span};

    fn compile(source: &str) -> String {
        let file = SourceFile::new(FileId(0), "test.nl", source);
        let tokens = lex(&file).expect("lex");
        let program = parse(&tokens, FileId(0)).expect("parse");
        generate_js(&program)
    }

    fn at() -> Span {
        Span::empty(FileId(0), 0)
    }

    fn ident(name: &str) -> Expr {
        Expr::identifier(name, at())
    }

    fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            at(),
        )
    }

    #[test]
    fn emits_typed_function_without_types() {
        let js = compile(
            "type add = { a: int, b: int }: int\nfunc add = { a, b } {\n  return a + b\n}",
        );
        assert_eq!(js, "function add(a, b) {\n  return a + b;\n}\n\n");
    }

    #[test]
    fn emits_type_declaration_as_comment() {
        let js = compile("type point = { x: int, y: int }\nfunc main = {} { }");
        assert_eq!(js, "// Type: point\nfunction main() {\n}\n\n");
    }

    #[test]
    fn emits_if_else_with_shared_else_line() {
        let js = compile(
            "func max = { a, b } {\n  if a > b {\n    return a\n  } else {\n    return b\n  }\n}",
        );
        assert_eq!(
            js,
            "function max(a, b) {\n  if (a > b) {\n    return a;\n  } else {\n    return b;\n  }\n}\n\n"
        );
    }

    #[test]
    fn emits_for_header_with_bare_clauses() {
        let js = compile(
            "func sum = { arr } {\n  total = 0\n  for i = 0; i < arr.length; i = i + 1 {\n    total = total + arr[i]\n  }\n  return total\n}",
        );
        assert_eq!(
            js,
            "function sum(arr) {\n  total = 0;\n  for (i = 0; i < arr.length; i = i + 1) {\n    total = total + arr[i];\n  }\n  return total;\n}\n\n"
        );
    }

    #[test]
    fn emits_while_loop() {
        let js = compile("func count = { n } {\n  while n > 0 {\n    n = n - 1\n  }\n  return n\n}");
        assert!(js.contains("  while (n > 0) {\n    n = n - 1;\n  }\n"));
    }

    #[test]
    fn emits_nested_function_indented() {
        let js = compile("func outer = {} {\n  func inner = { x } { return x }\n  return inner\n}");
        assert_eq!(
            js,
            "function outer() {\n  function inner(x) {\n    return x;\n  }\n\n  return inner;\n}\n\n"
        );
    }

    #[test]
    fn emits_template_interpolations() {
        let js = compile("func greet = { name } { return `hello {name}!` }");
        assert!(js.contains("return `hello ${name}!`;"));
    }

    #[test]
    fn escapes_backticks_in_template_text() {
        let expr = Expr::new(
            ExprKind::Template(vec![TemplatePart::Text("a`b".to_string())]),
            at(),
        );
        assert_eq!(expression(&expr), "`a\\`b`");
    }

    #[test]
    fn expands_object_shorthand() {
        let js = compile("func point = { x, y } { return { x, y } }");
        assert!(js.contains("return { x: x, y: y };"));
    }

    #[test]
    fn emits_empty_collections() {
        let js = compile("func empty = {} {\n  a = []\n  return {}\n}");
        assert_eq!(js, "function empty() {\n  a = [];\n  return {  };\n}\n\n");

        let object = Expr::new(ExprKind::Object(IndexMap::new()), at());
        assert_eq!(expression(&object), "{  }");
    }

    #[test]
    fn parenthesizes_operation_operands() {
        let nested = binary(
            ident("a"),
            BinaryOp::Add,
            binary(ident("b"), BinaryOp::Mul, ident("c")),
        );
        assert_eq!(expression(&nested), "a + (b * c)");

        let grouped = binary(
            binary(ident("a"), BinaryOp::Add, ident("b")),
            BinaryOp::Mul,
            ident("c"),
        );
        assert_eq!(expression(&grouped), "(a + b) * c");
    }

    #[test]
    fn parenthesizes_unary_and_call_targets() {
        let negated = Expr::new(
            ExprKind::Unary {
                operator: UnaryOp::Neg,
                argument: Box::new(binary(ident("a"), BinaryOp::Sub, ident("b"))),
            },
            at(),
        );
        assert_eq!(expression(&negated), "-(a - b)");

        let js = compile("func f = { a, b } { return !done and -a }");
        assert!(js.contains("return (!done) && (-a);"));
    }

    #[test]
    fn renders_literals() {
        let js = compile("func f = {} {\n  a = 1\n  b = 2.5\n  c = true\n  d = nil\n  return \"hi\\n\"\n}");
        assert!(js.contains("  a = 1;\n"));
        assert!(js.contains("  b = 2.5;\n"));
        assert!(js.contains("  c = true;\n"));
        assert!(js.contains("  d = null;\n"));
        assert!(js.contains("  return `hi\\n`;\n"));
    }

    #[test]
    fn renders_overflowing_numbers_as_infinity() {
        let digits = "9".repeat(400);
        let js = compile(&format!("func f = {{}} {{ return {digits} }}"));
        assert_eq!(js, "function f() {\n  return Infinity;\n}\n\n");

        let negative = Expr::new(ExprKind::Literal(LiteralValue::Number(f64::NEG_INFINITY)), at());
        assert_eq!(expression(&negative), "-Infinity");
    }

    #[test]
    fn renders_plain_strings_as_backtick_literals() {
        let js = compile("func f = {} { return \"hi\" }");
        assert_eq!(js, "function f() {\n  return `hi`;\n}\n\n");

        let expr = Expr::new(
            ExprKind::Literal(LiteralValue::String("a`b ${c}\nd".to_string())),
            at(),
        );
        assert_eq!(expression(&expr), "`a\\`b \\${c}\nd`");
    }

    #[test]
    fn renders_calls_and_members() {
        let js = compile("func f = { obj } { return obj.items[0].name(1, \"x\") }");
        assert!(js.contains("return obj.items[0].name(1, `x`);"));
    }

    #[test]
    fn empty_program_emits_nothing() {
        assert_eq!(compile("// only a comment\n"), "");
    }
}
