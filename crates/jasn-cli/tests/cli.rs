use std::io::Write as _;

use assert_cmd::Command;

fn jasn() -> Command {
    Command::cargo_bin("jasn").unwrap()
}

fn failure(cmd: &mut Command) -> (Option<i32>, String) {
    let output = cmd.output().unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.code(), stderr.trim_end().to_string())
}

#[test]
fn summarizes_a_valid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"a":1,"b":[2,3,{"c":null}]}"#).unwrap();

    jasn()
        .arg(file.path())
        .assert()
        .success()
        .stdout("ok: object, 7 values, ends at byte 28\n");
}

#[test]
fn prints_canonical_form_from_stdin() {
    jasn()
        .arg("--print")
        .write_stdin(" { \"a\" : [1, 2.50, \"t\\u0041b\"] }\n")
        .assert()
        .success()
        .stdout("{\"a\":[1,2.50,\"tAb\"]}\n");
}

#[test]
fn prints_deeply_nested_input() {
    let depth = 100_000;
    let mut input = "[".repeat(depth);
    input.push_str(&"]".repeat(depth));

    let output = jasn()
        .args(["--print", "--max-depth", "100000"])
        .write_stdin(input.clone())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, format!("{input}\n").into_bytes());
}

#[test]
fn dash_reads_stdin() {
    jasn()
        .arg("-")
        .write_stdin("null")
        .assert()
        .success()
        .stdout("ok: null, 1 values, ends at byte 4\n");
}

#[test]
fn parse_error_reports_line_and_column() {
    let (code, stderr) = failure(jasn().write_stdin("{\n  \"a\": [1,\n  2 3]\n}"));
    assert_eq!(code, Some(1));
    insta::assert_snapshot!(
        stderr,
        @"error: <stdin>:3:5: expected ',' or closing bracket at byte 17"
    );
}

#[test]
fn limits_come_from_flags() {
    let (code, stderr) = failure(jasn().args(["--max-depth", "2"]).write_stdin("[[[1]]]"));
    assert_eq!(code, Some(1));
    insta::assert_snapshot!(
        stderr,
        @"error: <stdin>:1:3: maximum nesting depth exceeded at byte 2"
    );

    jasn()
        .args(["--max-values", "2"])
        .write_stdin("[1, 2]")
        .assert()
        .code(1)
        .stderr("error: <stdin>:1:5: maximum value count exceeded at byte 4\n");
}

#[test]
fn trailing_content_flag() {
    jasn()
        .write_stdin("{\"a\":1} garbage")
        .assert()
        .code(1)
        .stderr("error: <stdin>:1:9: trailing content after document at byte 8\n");

    jasn()
        .arg("--allow-trailing-content")
        .write_stdin("{\"a\":1} garbage")
        .assert()
        .success()
        .stdout("ok: object, 2 values, ends at byte 7\n");
}

#[test]
fn lines_mode_reports_documents_until_first_error() {
    jasn()
        .arg("--lines")
        .write_stdin("1 [2] x 3")
        .assert()
        .code(1)
        .stdout("ok: number, 1 values, ends at byte 1\nok: array, 2 values, ends at byte 5\n")
        .stderr("error: <stdin>:1:7: unexpected token at byte 6\n");
}

#[test]
fn lines_mode_prints_ndjson() {
    jasn()
        .args(["--lines", "--print"])
        .write_stdin("{\"id\": 1}\n{\"id\": 2, \"tags\": [ ]}\n\n")
        .assert()
        .success()
        .stdout("{\"id\":1}\n{\"id\":2,\"tags\":[]}\n");
}

#[test]
fn empty_input_is_an_error() {
    jasn()
        .write_stdin("  \n")
        .assert()
        .code(1)
        .stderr("error: <stdin>:2:1: empty input at byte 3\n");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let (code, stderr) = failure(jasn().arg(&path));
    assert_eq!(code, Some(2));
    assert!(stderr.starts_with(&format!("error: {}: ", path.display())), "{stderr}");
}

#[test]
fn trailing_content_and_lines_conflict() {
    jasn()
        .args(["--lines", "--allow-trailing-content"])
        .write_stdin("1")
        .assert()
        .failure();
}
