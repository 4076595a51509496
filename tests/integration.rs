//! End-to-end tests for the regression driver
//!
//! These tests run the real `engine-regress` binary in a scratch directory
//! against the `mock-engine` binary:
//! 1. Writing a fixture and a `regress.toml` pointing at the mock
//! 2. Running the driver with the scratch directory as working directory
//! 3. Checking exit status, call counts on stdout and banners on stderr

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Scratch directory with a fixture and config for one test
struct TestContext {
    dir: TempDir,
}

/// Captured output of one driver run
struct RunOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

impl TestContext {
    /// Create a context whose build step runs `build_program`
    fn new(fixture: &str, build_program: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("regression_tests.txt"), fixture)
            .expect("Failed to write fixture");

        let config = format!(
            "[build]\nprogram = \"{}\"\n\n[engine]\nbinary = \"{}\"\n\n[timeouts]\nprobe_secs = 10\n",
            build_program,
            mock_engine().display()
        );
        fs::write(dir.path().join("regress.toml"), config).expect("Failed to write config");

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run the driver in the scratch directory
    fn run(&self, args: &[&str]) -> RunOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_engine-regress"))
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run engine-regress");

        RunOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

fn mock_engine() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mock-engine"))
}

#[test]
fn test_all_expectations_pass() {
    let fixture = "play a\nplay b\nplay c\nsolve\n> 3:abc\n\nplay x\nsolve\n> 1:x\n";
    let ctx = TestContext::new(fixture, "true");

    let output = ctx.run(&[]);
    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("SUCCESS"), "stderr: {}", output.stderr);

    // One call count per expectation: commands seen by the mock so far.
    let counts: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(counts, vec!["4", "7"]);
}

#[test]
fn test_mismatches_are_counted_and_run_continues() {
    let fixture = "play a\nplay b\nsolve\n> 3:ab\nsolve\n> 2:abc\nsolve\n> 2:ba\n";
    let ctx = TestContext::new(fixture, "true");

    let output = ctx.run(&[]);
    assert!(!output.success);
    assert!(output.stderr.contains("2/3 FAILURES"), "stderr: {}", output.stderr);
    assert!(
        output.stdout.contains("test 1: got 2:ba; expected 3:ab"),
        "stdout: {}",
        output.stdout
    );
    assert!(
        output.stdout.contains("test 2: got 2:ba; expected 2:abc"),
        "stdout: {}",
        output.stdout
    );
    assert!(!output.stdout.contains("test 3:"), "stdout: {}", output.stdout);
}

#[test]
fn test_reset_clears_engine_state() {
    let fixture = "play a\nplay b\n\nplay c\nsolve\n> 1:c\n";
    let ctx = TestContext::new(fixture, "true");

    let output = ctx.run(&[]);
    assert!(output.success, "stdout: {}\nstderr: {}", output.stdout, output.stderr);
}

#[test]
fn test_length_sign_is_checked() {
    let fixture = "say = 3 calls, length -5:abcab\n> 5:abcab\n";
    let ctx = TestContext::new(fixture, "true");

    let output = ctx.run(&[]);
    assert!(!output.success);
    assert!(output.stdout.contains("test 1: got -5:abcab; expected 5:abcab"));
    assert!(output.stderr.contains("1/1 FAILURES"));
}

#[test]
fn test_build_failure_stops_before_tests() {
    let ctx = TestContext::new("play a\nsolve\n> 1:a\n", "false");

    let output = ctx.run(&[]);
    assert!(!output.success);
    assert!(output.stderr.contains("Build failed"), "stderr: {}", output.stderr);
    assert!(output.stdout.is_empty(), "stdout: {}", output.stdout);
    assert!(!output.stderr.contains("SUCCESS"));
}

#[test]
fn test_no_build_flag_skips_build() {
    let ctx = TestContext::new("play a\nsolve\n> 1:a\n", "false");

    let output = ctx.run(&["--no-build"]);
    assert!(output.success, "stderr: {}", output.stderr);
}

#[test]
fn test_fixture_without_expectations_succeeds() {
    let ctx = TestContext::new("play a\n\nplay b\n", "true");

    let output = ctx.run(&[]);
    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("SUCCESS"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_silent_engine_times_out() {
    let ctx = TestContext::new("hang\n> 1:a\n", "true");

    let output = ctx.run(&["--timeout", "1"]);
    assert!(!output.success);
    assert!(output.stderr.contains("no result line"), "stderr: {}", output.stderr);
}

#[test]
fn test_engine_exit_before_result_is_fatal() {
    let ctx = TestContext::new("quit\n> 1:a\n", "true");

    let output = ctx.run(&[]);
    assert!(!output.success);
    assert!(
        output.stderr.contains("closed its output before answering test 1"),
        "stderr: {}",
        output.stderr
    );
}

#[test]
fn test_malformed_expectation_is_fatal() {
    let ctx = TestContext::new("play a\n> 1a\n", "true");

    let output = ctx.run(&[]);
    assert!(!output.success);
    assert!(output.stderr.contains("fixture line 2"), "stderr: {}", output.stderr);
}

#[test]
fn test_fixture_flag_overrides_default() {
    let ctx = TestContext::new("> broken\n", "true");
    fs::write(ctx.path().join("other.txt"), "play z\nsolve\n> 1:z\n").unwrap();

    let output = ctx.run(&["--fixture", "other.txt"]);
    assert!(output.success, "stderr: {}", output.stderr);
}

#[test]
fn test_missing_engine_reported() {
    let ctx = TestContext::new("play a\n", "true");

    let output = ctx.run(&["--engine", "./not-built-yet"]);
    assert!(!output.success);
    assert!(output.stderr.contains("Engine failed to start"), "stderr: {}", output.stderr);
}
