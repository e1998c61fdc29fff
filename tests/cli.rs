use assert_cmd::Command;
use predicates::str::contains;
use std::time::{SystemTime, UNIX_EPOCH};

fn asm64() -> Command {
    Command::new(env!("CARGO_BIN_EXE_asm64"))
}

#[test]
fn help_flag_prints_usage() {
    asm64()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Usage: asm64"))
        .stdout(contains("--tokenized"))
        .stdout(contains("--raw"))
        .stdout(contains("--high"));
}

#[test]
fn raw_mode_emits_little_endian_words() {
    let output = asm64()
        .arg("--raw")
        .write_stdin("add x1, x2, x3\n")
        .output()
        .expect("run");
    assert!(output.status.success());
    assert_eq!(output.stdout, [0x41, 0x60, 0x23, 0x8B]);
}

#[test]
fn tokenized_mode_is_the_default() {
    let tokenized = "ID add REG x1 COMMA , REG x2 COMMA , REG x3 NEWLINE";
    let output = asm64().write_stdin(tokenized).output().expect("run");
    assert!(output.status.success());
    assert_eq!(output.stdout, [0x41, 0x60, 0x23, 0x8B]);
}

#[test]
fn label_addresses_dump_to_stderr_in_definition_order() {
    let source = "loop:\nadd x1, x1, x3\nb loop\ndone:\n";
    asm64()
        .arg("--raw")
        .write_stdin(source)
        .assert()
        .success()
        .stderr(contains("loop 0\ndone 8\n"));
}

#[test]
fn high_mode_matches_raw_mode_output() {
    let pseudo = "label loop\nif x1 == x2 goto done\nx1 = x1 + x3\ngoto loop\nlabel done\nret\n";
    let raw = "loop:\ncmp x1, x2\nb.eq done\nadd x1, x1, x3\nb loop\ndone:\nbr x30\n";

    let from_high = asm64().arg("--high").write_stdin(pseudo).output().expect("run");
    let from_raw = asm64().arg("--raw").write_stdin(raw).output().expect("run");
    assert!(from_high.status.success());
    assert!(from_raw.status.success());
    assert_eq!(from_high.stdout, from_raw.stdout);
    assert_eq!(from_high.stdout.len(), 20);
}

#[test]
fn dump_ir_writes_ir_to_stderr_and_no_binary() {
    let pseudo = "label loop\nx1 = x1 + x3\nif x1 != x2 goto loop\nret\n";
    let output = asm64()
        .arg("--high")
        .arg("--dump-ir")
        .write_stdin(pseudo)
        .output()
        .expect("run");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert_eq!(
        stderr,
        "loop:\n  ADD x1, x1, x3\n  CMP_BRANCH x1 != x2, loop\n  RET\n"
    );
}

#[test]
fn dump_ir_requires_high_mode() {
    asm64()
        .arg("--dump-ir")
        .write_stdin("ret\n")
        .assert()
        .failure();
}

#[test]
fn mode_flags_are_mutually_exclusive() {
    asm64()
        .arg("--raw")
        .arg("--high")
        .write_stdin("ret\n")
        .assert()
        .failure();
}

#[test]
fn reads_input_from_a_file() {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should move forward")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("asm64-cli-{unique}.s"));
    std::fs::write(&path, ".8byte target\ntarget:\nbr x30\n").expect("write input");

    let output = asm64().arg("--raw").arg(&path).output().expect("run");
    assert!(output.status.success());
    assert_eq!(output.stdout.len(), 12);
    assert_eq!(&output.stdout[..8], &[8, 0, 0, 0, 0, 0, 0, 0]);

    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert_eq!(stderr, "target 8\n");

    std::fs::remove_file(&path).expect("cleanup");
}

#[test]
fn missing_input_file_reports_an_io_error() {
    asm64()
        .arg("--raw")
        .arg("/nonexistent/input.s")
        .assert()
        .failure()
        .stderr(contains("ERROR: cannot open file"));
}

#[test]
fn assembly_errors_exit_nonzero_with_a_single_error_line() {
    asm64()
        .arg("--raw")
        .write_stdin("frobnicate x1, x2\n")
        .assert()
        .failure()
        .stderr(contains("ERROR: unknown instruction 'frobnicate'"));

    asm64()
        .arg("--raw")
        .write_stdin("b nowhere\n")
        .assert()
        .failure()
        .stderr(contains("ERROR: undefined label 'nowhere'"));

    asm64()
        .arg("--high")
        .write_stdin("x1 = x2 ^ x3\n")
        .assert()
        .failure()
        .stderr(contains("ERROR:"));
}

#[test]
fn empty_input_produces_no_output_at_all() {
    let output = asm64().arg("--raw").write_stdin("").output().expect("run");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}
