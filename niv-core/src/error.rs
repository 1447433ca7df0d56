use std::path::PathBuf;

use thiserror::Error;

use crate::span::{SourceMap, Span};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("failed to write {}: {source}", path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{message}")]
    Lex {
        code: &'static str,
        message: String,
        span: Span,
    },
    #[error("{message}")]
    Parse {
        code: &'static str,
        message: String,
        span: Span,
    },
    #[error("{message} at {file}:{line}:{column}")]
    Located {
        code: &'static str,
        message: String,
        file: String,
        line: u32,
        column: u32,
    },
}

pub const UNEXPECTED_CHARACTER: &str = "E0001";
pub const UNTERMINATED_STRING: &str = "E0002";
pub const UNTERMINATED_TEMPLATE: &str = "E0003";
pub const MALFORMED_INTERPOLATION: &str = "E0004";
pub const SYNTAX_ERROR: &str = "E0100";
pub const AMBIGUOUS_BINARY_CHAIN: &str = "E0101";
pub const SIGNATURE_NAME_MISMATCH: &str = "E0102";
pub const NESTING_TOO_DEEP: &str = "E0103";

impl CoreError {
    pub fn lex(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        CoreError::Lex {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        CoreError::parse_with_code(SYNTAX_ERROR, message, span)
    }

    pub fn parse_with_code(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        CoreError::Parse {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CoreError::Lex { span, .. } | CoreError::Parse { span, .. } => Some(*span),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            CoreError::Lex { code, .. }
            | CoreError::Parse { code, .. }
            | CoreError::Located { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Bare message without any location suffix.
    pub fn message(&self) -> String {
        match self {
            CoreError::Lex { message, .. }
            | CoreError::Parse { message, .. }
            | CoreError::Located { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Resolve a spanned error against `sources` into a `file:line:column`
    /// error. Errors without a span, or whose file is unknown, pass through.
    pub fn locate(self, sources: &SourceMap) -> CoreError {
        let Some(span) = self.span() else {
            return self;
        };
        let Some(file) = sources.get(span.file) else {
            return self;
        };
        let position = file.line_col(span.start);
        match self {
            CoreError::Lex { code, message, .. } | CoreError::Parse { code, message, .. } => {
                CoreError::Located {
                    code,
                    message,
                    file: file.path().to_string(),
                    line: position.line,
                    column: position.column,
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn locates_parse_errors() {
        let mut sources = SourceMap::new();
        let file = sources.add("test.nl", "func f = {} {\n}\n  oops").id();
        let err = CoreError::parse("Expected type or function declaration", Span::new(file, 18, 22));
        let located = err.locate(&sources);
        assert_eq!(
            located.to_string(),
            "Expected type or function declaration at test.nl:3:3"
        );
        assert_eq!(located.code(), Some(SYNTAX_ERROR));
    }

    #[test]
    fn leaves_errors_without_span_untouched() {
        let sources = SourceMap::new();
        let err = CoreError::SourceIo(std::io::Error::other("boom"));
        let located = err.locate(&sources);
        assert!(matches!(located, CoreError::SourceIo(_)));
    }

    #[test]
    fn leaves_errors_for_unknown_files_untouched() {
        let sources = SourceMap::new();
        let err = CoreError::lex(UNEXPECTED_CHARACTER, "Unexpected character: @", Span::new(FileId(3), 0, 1));
        let located = err.locate(&sources);
        assert!(matches!(located, CoreError::Lex { .. }));
        assert_eq!(located.to_string(), "Unexpected character: @");
    }
}
