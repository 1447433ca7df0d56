use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::Program;
use crate::codegen_js::generate_js;
use crate::error::CoreError;
use crate::lexer::{Token, lex};
use crate::parser;
use crate::sources::{OUTPUT_EXTENSION, discover_sources};
use crate::span::{FileId, SourceFile, SourceMap};

/// A source file compiled by [`compile_directory`] and where its output went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Lex `source`. Errors carry spans but are not resolved to lines.
pub fn tokenize(source: &str, path: &str) -> Result<Vec<Token>, CoreError> {
    lex(&SourceFile::new(FileId(0), path, source))
}

pub fn parse(tokens: &[Token], file: FileId) -> Result<Program, CoreError> {
    parser::parse(tokens, file)
}

pub fn generate(program: &Program) -> String {
    let output = generate_js(program);
    debug!(bytes = output.len(), "generated javascript");
    output
}

/// Compile nivlang source text to JavaScript.
///
/// Lexical and syntax errors come back as [`CoreError::Located`], rendered
/// as `"<message> at <path>:<line>:<column>"`.
pub fn compile(source: &str, path: &str) -> Result<String, CoreError> {
    let mut sources = SourceMap::new();
    let file = sources.add(path, source);
    let result = compile_source_file(file);
    result.map_err(|err| err.locate(&sources))
}

fn compile_source_file(file: &SourceFile) -> Result<String, CoreError> {
    let tokens = lex(file)?;
    let program = parser::parse(&tokens, file.id())?;
    Ok(generate(&program))
}

/// Read and compile one `.nl` file. The file's path is used in error
/// locations exactly as given.
pub fn compile_file(path: impl AsRef<Path>) -> Result<String, CoreError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    compile(&source, &path.display().to_string())
}

/// Sibling output path: `dir/name.nl` becomes `dir/name.js`.
pub fn output_path_for(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension(OUTPUT_EXTENSION)
}

pub fn write_output(path: impl AsRef<Path>, contents: &str) -> Result<(), CoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CoreError::OutputIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| CoreError::OutputIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile every `.nl` file under `dir`, writing each output next to its
/// source. Stops at the first failing file.
pub fn compile_directory(
    dir: impl AsRef<Path>,
    recursive: bool,
) -> Result<Vec<CompiledFile>, CoreError> {
    let mut compiled = Vec::new();
    for source in discover_sources(dir, recursive)? {
        let output = output_path_for(&source);
        let js = compile_file(&source)?;
        write_output(&output, &js)?;
        debug!(source = %source.display(), output = %output.display(), "compiled file");
        compiled.push(CompiledFile { source, output });
    }
    Ok(compiled)
}
