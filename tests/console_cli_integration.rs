use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn taskbot(db: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("taskbot"));
    cmd.env_remove("TASKBOT_TOKEN")
        .env_remove("TASKBOT_ACCOUNT")
        .env("RUST_LOG", "warn")
        .arg("--db")
        .arg(db);
    cmd
}

#[test]
fn console_session_creates_and_lists_tasks() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("bot.db");

    taskbot(&db)
        .args(["console", "--account", "5"])
        .write_stdin("task 15 Buy milk\n/tag 1 home\nlist home\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1 saved."))
        .stdout(predicate::str::contains("Tag added to task."))
        .stdout(predicate::str::contains("Tasks tagged \"home\":\n1. Buy milk (15m)"));

    // A second session against the same file sees the task.
    taskbot(&db)
        .args(["console", "--account", "5"])
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Buy milk (15m)"));

    // Another account does not.
    taskbot(&db)
        .args(["console", "--account", "6"])
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn console_reports_usage_errors() {
    let dir = tempdir().unwrap();

    taskbot(&dir.path().join("bot.db"))
        .args(["console", "--account", "5"])
        .write_stdin("plan 2024-13-01\nest 5\nfrobnicate\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid date \"2024-13-01\""))
        .stdout(predicate::str::contains("Usage: /est <minutes> <task number>"))
        .stdout(predicate::str::contains("Unknown command /frobnicate."));
}

#[test]
fn console_sends_the_lisy_picture() {
    let dir = tempdir().unwrap();
    let asset = dir.path().join("foxes.png");
    std::fs::write(&asset, b"not really a png").unwrap();

    taskbot(&dir.path().join("bot.db"))
        .arg("--asset")
        .arg(&asset)
        .arg("console")
        .write_stdin("lisy\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[photo foxes.png, 16 bytes]"));
}

#[test]
fn serve_without_token_fails() {
    let dir = tempdir().unwrap();

    taskbot(&dir.path().join("bot.db"))
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("missing bot token"));
}
