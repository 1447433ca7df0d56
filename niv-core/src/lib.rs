//! Core compiler pipeline for nivlang.
//!
//! nivlang is a small typed scripting language that compiles to plain
//! JavaScript. The pipeline is:
//!
//!   source .nl
//!     -> lexer      (tokens)
//!     -> parser     (located AST)
//!     -> codegen_js (JavaScript text)
//!
//! Type annotations are parsed and attached to the AST but never checked;
//! the JavaScript backend drops them. The CLI and any other tooling should
//! depend on this crate rather than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Back-end: code generation and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen_js;
pub mod compiler;
pub mod sources;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use compiler::{
    CompiledFile, compile, compile_directory, compile_file, generate, output_path_for, parse,
    tokenize, write_output,
};
pub use diagnostic::{Diagnostic, Severity, check};
pub use error::CoreError;
