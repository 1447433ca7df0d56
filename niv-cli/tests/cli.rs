use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const ADD: &str = "type add = { a: int, b: int }: int\nfunc add = { a, b } {\n  return a + b\n}\n";
const ADD_JS: &str = "function add(a, b) {\n  return a + b;\n}\n\n";

fn niv() -> Command {
    Command::cargo_bin("niv-cli").expect("binary exists")
}

#[test]
fn compiles_file_to_sibling_js() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("add.nl");
    fs::write(&input_path, ADD).expect("write input");

    niv().arg(&input_path).assert().success();

    let js = fs::read_to_string(dir.path().join("add.js")).expect("read output");
    assert_eq!(js, ADD_JS);
}

#[test]
fn honors_explicit_output_path() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("add.nl");
    fs::write(&input_path, ADD).expect("write input");
    let output_path = dir.path().join("build").join("out.js");

    niv()
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output_path).expect("read output"), ADD_JS);
    assert!(!dir.path().join("add.js").exists());
}

#[test]
fn writes_to_stdout_with_dash() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("add.nl");
    fs::write(&input_path, ADD).expect("write input");

    niv()
        .arg(&input_path)
        .arg("-o")
        .arg("-")
        .assert()
        .success()
        .stdout(ADD_JS);
}

#[test]
fn compiles_stdin_to_stdout() {
    niv()
        .write_stdin("func greet = { name } { return `hello {name}!` }")
        .assert()
        .success()
        .stdout("function greet(name) {\n  return `hello ${name}!`;\n}\n\n");
}

#[test]
fn compiles_directory() {
    let dir = tempdir().expect("tempdir");
    let nested = dir.path().join("lib");
    fs::create_dir_all(&nested).expect("create nested dir");
    fs::write(dir.path().join("add.nl"), ADD).expect("write add");
    fs::write(nested.join("one.nl"), "func one = {} { return 1 }").expect("write one");

    niv().arg(dir.path()).assert().success();
    assert!(dir.path().join("add.js").exists());
    assert!(!nested.join("one.js").exists());

    niv().arg(dir.path()).arg("--recursive").assert().success();
    assert!(nested.join("one.js").exists());
}

#[test]
fn rejects_output_for_directory_target() {
    let dir = tempdir().expect("tempdir");

    niv()
        .arg(dir.path())
        .arg("-o")
        .arg("out.js")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output cannot be used"));
}

#[test]
fn reports_located_compile_errors() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("bad.nl");
    fs::write(&input_path, "func main = {} {\n  x = 1 + 2 * 3\n}\n").expect("write input");

    niv()
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "You must use parentheses when combining more than 2 terms",
        ))
        .stderr(predicate::str::contains("bad.nl:2:7"));

    assert!(!dir.path().join("bad.js").exists());
}

#[test]
fn check_passes_clean_sources_without_writing() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("add.nl");
    fs::write(&input_path, ADD).expect("write input");

    niv().arg(&input_path).arg("--check").assert().success();
    assert!(!dir.path().join("add.js").exists());
}

#[test]
fn check_prints_diagnostics_and_fails() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("good.nl"), ADD).expect("write good");
    fs::write(dir.path().join("bad.nl"), "func main = {} {\n  x = 1 + 2 * 3\n}\n")
        .expect("write bad");

    niv()
        .arg(dir.path())
        .arg("--check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.nl:2:7: error[E0101]"))
        .stderr(predicate::str::contains("check found 1 error(s)"));
}

#[test]
fn check_reads_stdin() {
    niv()
        .arg("--check")
        .write_stdin("x = 1")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "<stdin>:1:1: error[E0100]: Expected type or function declaration",
        ));
}

#[test]
fn refuses_to_overwrite_non_source_target() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("prog.js");
    fs::write(&input_path, ADD).expect("write input");

    niv()
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a .nl file"));
    assert_eq!(fs::read_to_string(&input_path).expect("read input"), ADD);

    let output_path = dir.path().join("out.js");
    niv()
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&output_path).expect("read output"), ADD_JS);
}

#[test]
fn reports_missing_input_file() {
    let dir = tempdir().expect("tempdir");

    niv()
        .arg(dir.path().join("missing.nl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
}

#[test]
fn debug_log_level_traces_pipeline() {
    niv()
        .arg("--log-level")
        .arg("debug")
        .write_stdin("func one = {} { return 1 }")
        .assert()
        .success()
        .stdout("function one() {\n  return 1;\n}\n\n")
        .stderr(predicate::str::contains("lexed source"))
        .stderr(predicate::str::contains("parsed program"));
}

#[test]
fn default_log_level_is_quiet() {
    niv()
        .write_stdin("func one = {} { return 1 }")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
