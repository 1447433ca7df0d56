mod logging;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use niv_core::sources::{SOURCE_EXTENSION, discover_sources, is_source_file};
use niv_core::{check, compile, compile_directory, output_path_for, write_output};
use tracing::info;

use crate::logging::LogLevel;

const STDOUT: &str = "-";
const STDIN_NAME: &str = "<stdin>";

/// Compile nivlang sources to JavaScript
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file or directory. Reads stdin when omitted.
    #[arg(value_name = "TARGET")]
    target: Option<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Output path for a single file or stdin (`-` writes to stdout)"
    )]
    output: Option<String>,

    #[arg(short, long, help = "Descend into subdirectories of a directory target")]
    recursive: bool,

    #[arg(long, help = "Only parse and report diagnostics, write nothing")]
    check: bool,

    #[arg(long, value_enum, value_name = "LEVEL", default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level);
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    match &cli.target {
        Some(target) if target.is_dir() => {
            if cli.output.is_some() {
                bail!("--output cannot be used with a directory target");
            }
            if cli.check {
                return check_directory(target, cli.recursive);
            }
            let compiled = compile_directory(target, cli.recursive)
                .with_context(|| format!("failed to compile directory {}", target.display()))?;
            for file in &compiled {
                info!(output = %file.output.display(), "wrote output");
            }
            info!(files = compiled.len(), "compiled directory");
        }
        Some(target) => {
            if !cli.check && cli.output.is_none() && !is_source_file(target) {
                bail!(
                    "{} is not a .{SOURCE_EXTENSION} file; pass --output to choose where the JavaScript goes",
                    target.display()
                );
            }
            let source = fs::read_to_string(target)
                .with_context(|| format!("failed to read input file {}", target.display()))?;
            let name = target.display().to_string();
            if cli.check {
                return report(&[(name, source)]);
            }
            let js = compile(&source, &name).with_context(|| format!("failed to compile {name}"))?;
            let output = match cli.output {
                Some(output) => output,
                None => output_path_for(target).display().to_string(),
            };
            emit(&output, &js)?;
        }
        None => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            if cli.check {
                return report(&[(STDIN_NAME.to_string(), source)]);
            }
            let js = compile(&source, STDIN_NAME).context("failed to compile stdin")?;
            emit(cli.output.as_deref().unwrap_or(STDOUT), &js)?;
        }
    }
    Ok(())
}

fn emit(output: &str, js: &str) -> Result<()> {
    if output == STDOUT {
        print!("{js}");
        return Ok(());
    }
    write_output(output, js).with_context(|| format!("failed to write output file {output}"))?;
    info!(output, "wrote output");
    Ok(())
}

fn check_directory(dir: &Path, recursive: bool) -> Result<()> {
    let mut files = Vec::new();
    for path in discover_sources(dir, recursive)? {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read input file {}", path.display()))?;
        files.push((path.display().to_string(), source));
    }
    report(&files)
}

/// Print diagnostics for every file; fails if any were found.
fn report(files: &[(String, String)]) -> Result<()> {
    let mut errors = 0;
    for (name, source) in files {
        for diagnostic in check(source, name) {
            eprintln!("{}", diagnostic.render(name));
            errors += 1;
        }
    }
    if errors > 0 {
        bail!("check found {errors} error(s)");
    }
    info!(files = files.len(), "check passed");
    Ok(())
}
