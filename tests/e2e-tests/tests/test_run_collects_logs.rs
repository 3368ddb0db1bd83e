//! Test Scenario: `loggrab run` around a test command
//!
//! 1. Write 100 lines to a watched log
//! 2. `loggrab run` tracks the log, runs a command appending lines 101..140
//! 3. The command's exit code decides whether logs are collected
//!
//! Expected results:
//!
//! - loggrab exits with the command's exit code
//! - a failing command leaves `<out>/Advanced_Logs/<suite>/<test>/<ts>_logs.zip`
//!   holding exactly the appended lines, and the staging folder is gone
//! - a passing command leaves no archive under the default policy

#![cfg(unix)]

use e2e_tests::assertions::{assert_archive_holds_lines, assert_exit_code, assert_no_archive};
use e2e_tests::{append_lines, cleanup_test_dir, create_test_dir, get_loggrab_path, write_local_config, LoggrabRunner};
use std::path::{Path, PathBuf};

struct Setup {
    test_dir: PathBuf,
    log: PathBuf,
    output: PathBuf,
    remote_tmp: PathBuf,
    runner: LoggrabRunner,
}

fn setup(name: &str) -> Setup {
    let test_dir = create_test_dir(name);
    let logs_dir = test_dir.join("var-log");
    let remote_tmp = test_dir.join("remote-tmp");
    let output = test_dir.join("out");
    std::fs::create_dir_all(&logs_dir).unwrap();
    std::fs::create_dir_all(&remote_tmp).unwrap();

    let log = logs_dir.join("service.log");
    append_lines(&log, 1..=100);

    let config = write_local_config(&test_dir, &logs_dir, &remote_tmp);
    let runner = LoggrabRunner::new(get_loggrab_path(), config, test_dir.clone());

    Setup {
        test_dir,
        log,
        output,
        remote_tmp,
        runner,
    }
}

fn append_and_exit(log: &Path, code: i32) -> String {
    format!(
        "for i in $(seq 101 140); do echo \"line $i\"; done >> '{}'; exit {}",
        log.display(),
        code
    )
}

#[test]
fn test_failing_command_collects_appended_lines() {
    let s = setup("run-failing");
    let script = append_and_exit(&s.log, 3);

    let outcome = s
        .runner
        .run(&[
            "run",
            "--output-dir",
            s.output.to_str().unwrap(),
            "--suite",
            "Smoke/Login",
            "--test",
            "bad_password",
            "--",
            "sh",
            "-c",
            &script,
        ])
        .unwrap();

    assert_exit_code(&outcome, 3).unwrap();

    let archive = PathBuf::from(outcome.last_line().expect("archive path on stdout"));
    let test_dir = s.output.join("Advanced_Logs/Smoke/Login/bad_password");
    assert_eq!(archive.parent().unwrap(), test_dir.as_path());
    assert!(archive.file_name().unwrap().to_string_lossy().ends_with("_logs.zip"));
    assert!(!test_dir.join("logs").exists(), "staging folder should be removed");

    assert_archive_holds_lines(&archive, "_service.log.gz", 101, 140).unwrap();
    assert_eq!(std::fs::read_dir(&s.remote_tmp).unwrap().count(), 0);

    cleanup_test_dir(&s.test_dir);
}

#[test]
fn test_passing_command_skips_collection() {
    let s = setup("run-passing");
    let script = append_and_exit(&s.log, 0);

    let outcome = s
        .runner
        .run(&[
            "run",
            "--output-dir",
            s.output.to_str().unwrap(),
            "--suite",
            "Smoke",
            "--test",
            "ok",
            "--",
            "sh",
            "-c",
            &script,
        ])
        .unwrap();

    assert_exit_code(&outcome, 0).unwrap();
    assert_eq!(outcome.last_line(), Some("Log collection skipped"));
    assert_no_archive(&s.output).unwrap();

    cleanup_test_dir(&s.test_dir);
}

#[test]
fn test_always_policy_collects_passing_command() {
    let s = setup("run-always");
    let script = append_and_exit(&s.log, 0);

    let outcome = s
        .runner
        .run(&[
            "run",
            "--output-dir",
            s.output.to_str().unwrap(),
            "--suite",
            "Smoke",
            "--policy",
            "always",
            "--",
            "sh",
            "-c",
            &script,
        ])
        .unwrap();

    assert_exit_code(&outcome, 0).unwrap();
    let archive = PathBuf::from(outcome.last_line().unwrap());
    assert_eq!(archive.parent().unwrap(), s.output.join("Advanced_Logs/Smoke").as_path());
    assert_archive_holds_lines(&archive, "_service.log.gz", 101, 140).unwrap();

    cleanup_test_dir(&s.test_dir);
}
