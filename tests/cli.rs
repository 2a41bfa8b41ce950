//! Command line integration tests

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

fn luajs() -> Command {
    Command::new(env!("CARGO_BIN_EXE_luajs"))
}

fn run_with_stdin(input: &str) -> Output {
    let mut child = luajs()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn luajs");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for luajs")
}

#[test]
fn test_stdin_to_stdout() {
    let output = run_with_stdin("let x = a != b;\nprint(x);");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "local x = a ~= b; \nprint(x);\n"
    );
}

#[test]
fn test_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("main.luajs");
    let output = dir.path().join("main.lua");
    fs::write(&input, "for (let i = 0; i <= 3; i++) { f(i); }").unwrap();

    let status = luajs().arg(&input).arg(&output).status().unwrap();
    assert!(status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "for i = 0, 3, 1 do f(i); end;\n"
    );
}

#[test]
fn test_file_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("main.luajs");
    fs::write(&input, "throw \"boom\";").unwrap();

    let output = luajs().arg(&input).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "error(\"boom\");\n");
}

#[test]
fn test_syntax_error_exit_status() {
    let output = run_with_stdin("test() \0");
    assert_eq!(output.status.code(), Some(65));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1:7 "));
}

#[test]
fn test_deeply_nested_input_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("deep.luajs");
    let depth = 200_000;
    fs::write(
        &input,
        format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth)),
    )
    .unwrap();

    let output = luajs().arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(65));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("too deeply nested"));
}

#[test]
fn test_semantic_error_exit_status() {
    let output = run_with_stdin("let x = 1; continue;");
    assert_eq!(output.status.code(), Some(65));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("1:11 continue outside of loop")
    );
}

#[test]
fn test_failed_conversion_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.luajs");
    let output = dir.path().join("bad.lua");
    fs::write(&input, "f();\ncontinue;").unwrap();
    fs::write(&output, "-- previous").unwrap();

    let status = luajs().arg(&input).arg(&output).status().unwrap();
    assert_eq!(status.code(), Some(65));
    assert_eq!(fs::read_to_string(&output).unwrap(), "-- previous");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_missing_input_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let output = luajs()
        .arg(dir.path().join("missing.luajs"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(74));
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.luajs"));
}

#[test]
fn test_unwritable_output_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("main.luajs");
    fs::write(&input, "f();").unwrap();

    let status = luajs()
        .arg(&input)
        .arg(dir.path().join("no/such/dir/main.lua"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(74));
}
