//! Editor-facing diagnostics.
//!
//! [`check`] runs the front end (lexer and parser) without generating code
//! and reports the first failure, if any, with a 1-based line/column range.

use std::fmt;

use crate::error::CoreError;
use crate::lexer::lex;
use crate::parser;
use crate::span::{FileId, LineCol, SourceFile, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Inclusive start, exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: LineCol,
    pub end: LineCol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    /// `None` when the error is not tied to a source position.
    pub span: Option<Span>,
    /// Filled in once the diagnostic is resolved against its file.
    pub range: Option<Range>,
}

impl Diagnostic {
    /// Resolve the span to lines and columns. A diagnostic without a span
    /// covers the whole document.
    pub fn resolve(mut self, file: &SourceFile) -> Self {
        let range = match self.span {
            Some(span) => Range {
                start: file.line_col(span.start),
                end: file.line_col(span.end),
            },
            None => Range {
                start: LineCol { line: 1, column: 1 },
                end: file.line_col(file.text().len() as u32),
            },
        };
        self.range = Some(range);
        self
    }

    /// `path:line:col: error[CODE]: message`
    pub fn render(&self, path: &str) -> String {
        let start = self
            .range
            .map_or(LineCol { line: 1, column: 1 }, |range| range.start);
        match self.code {
            Some(code) => format!("{path}:{start}: {}[{code}]: {}", self.severity, self.message),
            None => format!("{path}:{start}: {}: {}", self.severity, self.message),
        }
    }
}

impl From<&CoreError> for Diagnostic {
    fn from(err: &CoreError) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: err.code(),
            message: err.message(),
            span: err.span(),
            range: None,
        }
    }
}

/// Lex and parse `source`, returning at most one resolved diagnostic.
pub fn check(source: &str, path: &str) -> Vec<Diagnostic> {
    check_file(&SourceFile::new(FileId(0), path, source))
}

pub fn check_file(file: &SourceFile) -> Vec<Diagnostic> {
    let result = lex(file).and_then(|tokens| parser::parse(&tokens, file.id()));
    match result {
        Ok(_) => Vec::new(),
        Err(err) => vec![Diagnostic::from(&err).resolve(file)],
    }
}
