//! Test Scenario: tracking and collection in separate invocations
//!
//! `loggrab prepare` saves the offsets to a state file, lines are appended,
//! then `loggrab collect` extracts exactly those lines from the saved state.

#![cfg(unix)]

use e2e_tests::assertions::{assert_archive_holds_lines, assert_exit_code};
use e2e_tests::{append_lines, cleanup_test_dir, create_test_dir, get_loggrab_path, write_local_config, LoggrabRunner};
use std::path::PathBuf;

#[test]
fn test_prepare_then_collect() {
    let test_dir = create_test_dir("prepare-collect");
    let logs_dir = test_dir.join("var-log");
    let remote_tmp = test_dir.join("remote-tmp");
    std::fs::create_dir_all(&logs_dir).unwrap();
    std::fs::create_dir_all(&remote_tmp).unwrap();

    let log = logs_dir.join("worker.log");
    append_lines(&log, 1..=10);

    let config = write_local_config(&test_dir, &logs_dir, &remote_tmp);
    let runner = LoggrabRunner::new(get_loggrab_path(), config, test_dir.clone());
    let state = test_dir.join("state.json");
    let output = test_dir.join("out");

    let prepared = runner
        .run(&["prepare", "--state", state.to_str().unwrap()])
        .unwrap();
    assert_exit_code(&prepared, 0).unwrap();
    assert!(state.exists());
    assert!(prepared.stdout.contains("Tracked 1 log file(s)"));

    append_lines(&log, 11..=15);

    let collected = runner
        .run(&[
            "collect",
            "--state",
            state.to_str().unwrap(),
            "--output-dir",
            output.to_str().unwrap(),
            "--suite",
            "Nightly",
            "--test",
            "worker_restart",
            "--status",
            "FAIL",
        ])
        .unwrap();
    assert_exit_code(&collected, 0).unwrap();

    let archive = PathBuf::from(collected.last_line().unwrap());
    assert!(archive.starts_with(output.join("Advanced_Logs/Nightly/worker_restart")));
    assert_archive_holds_lines(&archive, "_worker.log.gz", 11, 15).unwrap();

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_collect_without_state_fails() {
    let test_dir = create_test_dir("collect-no-state");
    let logs_dir = test_dir.join("var-log");
    std::fs::create_dir_all(&logs_dir).unwrap();

    let config = write_local_config(&test_dir, &logs_dir, &test_dir);
    let runner = LoggrabRunner::new(get_loggrab_path(), config, test_dir.clone());

    let outcome = runner
        .run(&[
            "collect",
            "--state",
            test_dir.join("missing.json").to_str().unwrap(),
            "--output-dir",
            test_dir.join("out").to_str().unwrap(),
            "--suite",
            "Nightly",
        ])
        .unwrap();

    assert!(!outcome.success());
    assert!(outcome.stderr.contains("Failed to load state"));

    cleanup_test_dir(&test_dir);
}
