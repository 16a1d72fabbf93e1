use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfi").unwrap();
    cmd.timeout(Duration::from_secs(5))
        .env_remove("BFI_LOG")
        .env_remove("BFI_MAX_STEPS");
    cmd
}

fn program_file(code: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(code).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn help_prints_usage_to_stdout_and_exits_zero() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:").and(predicate::str::contains("--visualize")))
        .stderr(predicate::str::is_empty());
}

#[test]
fn short_help_does_not_run_the_program() {
    let file = program_file(b"++++++++[>++++++++<-]>+.");
    cargo_bin()
        .arg(file.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:"));
}

#[test]
fn missing_path_is_a_usage_error() {
    cargo_bin()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing program path").and(predicate::str::contains("Usage:")));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cargo_bin()
        .arg("--bogus")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn unreadable_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin()
        .arg(dir.path().join("nope.bf"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read file"));
}

#[test]
fn prints_raw_bytes() {
    let file = program_file(b"++.");
    cargo_bin()
        .arg(file.path())
        .assert()
        .success()
        .stdout(vec![2u8]);
}

#[test]
fn hello_world() {
    let file = program_file(
        b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.",
    );
    cargo_bin()
        .arg(file.path())
        .assert()
        .success()
        .stdout("Hello World!\n");
}

#[test]
fn comma_echoes_stdin() {
    let file = program_file(b",.");
    cargo_bin().arg(file.path()).write_stdin("A").assert().success().stdout("A");
}

#[test]
fn cat_stops_at_end_of_input() {
    let file = program_file(b",[.,]");
    cargo_bin()
        .arg(file.path())
        .write_stdin("line one\nline two\n")
        .assert()
        .success()
        .stdout("line one\nline two\n");
}

#[test]
fn comments_are_ignored() {
    let file = program_file(b"add two: + + then print it\n.");
    cargo_bin()
        .arg(file.path())
        .assert()
        .success()
        .stdout(vec![2u8]);
}

#[test]
fn reached_unmatched_open_bracket_fails() {
    let file = program_file(b"[+");
    cargo_bin()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("unmatched bracket '['")
                .and(predicate::str::contains("at instruction 0")),
        );
}

#[test]
fn reached_unmatched_close_bracket_fails() {
    let file = program_file(b"+]");
    cargo_bin()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unmatched bracket ']'"));
}

#[test]
fn unreached_brackets_are_not_errors() {
    for code in [&b"+["[..], &b"[]]"[..]] {
        let file = program_file(code);
        cargo_bin()
            .arg(file.path())
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}

#[test]
fn running_off_the_right_edge_fails() {
    let file = program_file(&[b'>'; 30_000]);
    cargo_bin()
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pointer out of bounds"));
}

#[test]
fn step_limit_from_flag() {
    let file = program_file(b"+[]");
    cargo_bin()
        .arg(file.path())
        .args(["--max-steps", "50"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn step_limit_from_env() {
    let file = program_file(b"+[]");
    cargo_bin()
        .env("BFI_MAX_STEPS", "20")
        .arg(file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("step limit exceeded (20)"));
}

#[test]
fn output_before_an_error_is_kept() {
    let file = program_file(b"+++.]");
    cargo_bin()
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(vec![3u8])
        .stderr(predicate::str::contains("Parse error"));
}
