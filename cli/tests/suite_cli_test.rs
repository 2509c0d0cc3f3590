use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::process::Command;

#[test]
fn prints_version() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("nbench")?;
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("nbench "));
    Ok(())
}

#[test]
fn help_describes_workloads() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("nbench")?;
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Time five fixed CPU workloads"));
    Ok(())
}

#[test]
fn rejects_arguments() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("nbench")?;
    cmd.arg("fibonacci");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unexpected argument"));
    Ok(())
}

#[test]
fn runs_full_suite() -> Result<(), Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("nbench")?;
    cmd.env_remove("NBENCH_TRACE");
    let output = cmd.output()?;
    assert!(
        output.status.success(),
        "nbench failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stderr.is_empty(), "unexpected stderr output");

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 9, "unexpected output:\n{stdout}");
    assert_eq!(lines[0], "Starting benchmarks...");
    assert_eq!(lines[1], "");
    assert_eq!(lines[7], "");
    assert_eq!(lines[8], "Done!");

    let expectations = [
        r"^1\. Fibonacci\(42\): \d+\.\d{2}ms \(result: 267914296\)$",
        r"^2\. Prime Sieve \(10M\): \d+\.\d{2}ms \(result: 664579\)$",
        r"^3\. Mandelbrot \(2000x2000\): \d+\.\d{2}ms \(result: \d+\)$",
        r"^4\. Matrix Multiply \(500x500\): \d+\.\d{2}ms \(result: 10291750\.0\)$",
        r"^5\. Binary Trees \(depth 18\): \d+\.\d{2}ms \(result: 524287\)$",
    ];
    for (line, pattern) in lines[2..7].iter().zip(expectations) {
        assert!(
            predicate::str::is_match(pattern)?.eval(line),
            "line {line:?} does not match {pattern}"
        );
    }
    Ok(())
}
