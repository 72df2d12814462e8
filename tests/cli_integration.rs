use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn studynav(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("studynav").unwrap();
    cmd.env("STUDYNAV_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("STUDYNAV_BACKEND")
        .env_remove("STUDYNAV_LOG");
    cmd
}

#[test]
fn task_done_drops_out_of_todo_list() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["--backend", "markdown", "task", "add", "Write", "report"])
        .args(["--prio", "2", "--due", "2025-10-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task added: Write report (1)"));

    studynav(home.path())
        .args(["--backend", "markdown", "task", "list", "--status", "todo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("2025-10-20"));

    studynav(home.path())
        .args(["--backend", "markdown", "task", "done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 1 is now done"));

    studynav(home.path())
        .args(["--backend", "markdown", "task", "list", "--status", "todo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    studynav(home.path())
        .args(["--backend", "markdown", "task", "done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already done"));

    assert!(home.path().join("vault/tasks/1-write-report.md").exists());
}

#[test]
fn note_append_keeps_both_paragraphs() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["--backend", "markdown", "note", "add", "Lecture", "1"])
        .args(["--tag", "cs", "--body", "Overlapping subproblems"])
        .assert()
        .success();

    studynav(home.path())
        .args(["--backend", "markdown", "note", "append", "1", "more", "detail"])
        .assert()
        .success();

    studynav(home.path())
        .args(["--backend", "markdown", "note", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Overlapping subproblems\n\nmore detail",
        ))
        .stdout(predicate::str::contains("tags: cs"));
}

#[test]
fn missing_record_exits_nonzero() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["task", "show", "t_nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Task not found: t_nope"));

    studynav(home.path())
        .args(["note", "delete", "n_nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note not found: n_nope"));
}

#[test]
fn json_backend_is_the_default() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["note", "add", "Lecture", "1:", "DP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(n_"));

    let on_disk = fs::read_to_string(home.path().join("notes.json")).unwrap();
    assert!(on_disk.starts_with("{\n  \"items\": [\n"));
    assert!(on_disk.contains("\"title\": \"Lecture 1: DP\""));

    studynav(home.path())
        .args(["search", "dp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lecture 1: DP"))
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn where_reports_locations() {
    let home = TempDir::new().unwrap();
    let notes_file = home.path().join("notes.json");

    studynav(home.path())
        .arg("where")
        .assert()
        .success()
        .stdout(predicate::str::contains("backend  json"))
        .stdout(predicate::str::contains(notes_file.display().to_string()));
}

#[test]
fn config_switches_backend() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["config", "backend", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("backend set to markdown"));

    studynav(home.path())
        .args(["task", "add", "Read", "chapter", "3"])
        .assert()
        .success();
    assert!(home.path().join("vault/tasks/1-read-chapter-3.md").exists());

    studynav(home.path())
        .args(["config", "backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown"));

    studynav(home.path())
        .args(["config", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn env_backend_overrides_config() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .env("STUDYNAV_BACKEND", "markdown")
        .args(["task", "add", "From", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1)"));

    studynav(home.path())
        .env("STUDYNAV_BACKEND", "sqlite")
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown backend"));
}

#[test]
fn migrate_copies_json_records_into_the_vault() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["task", "add", "Write", "report", "--description", "Ten pages"])
        .assert()
        .success();

    studynav(home.path())
        .args(["migrate", "--to", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 1 tasks from json to markdown"));

    studynav(home.path())
        .args(["--backend", "markdown", "task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"));
}

#[test]
fn reads_prototype_task_file() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("tasks.json"),
        r#"[{"id": 1, "title": "Buy milk", "description": "", "completed": true, "created_at": "2025-01-02 03:04:05"}]"#,
    )
    .unwrap();

    studynav(home.path())
        .args(["task", "list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));
}

#[test]
fn corrupt_collection_is_kept_aside() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("notes.json"), "{ broken").unwrap();

    studynav(home.path())
        .args(["note", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found."));

    assert_eq!(
        fs::read_to_string(home.path().join("notes.json.corrupt")).unwrap(),
        "{ broken"
    );
}

#[test]
fn invalid_input_is_rejected() {
    let home = TempDir::new().unwrap();

    studynav(home.path())
        .args(["task", "add", "x", "--prio", "7"])
        .assert()
        .failure();

    studynav(home.path())
        .args(["task", "add", "x", "--due", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));

    studynav(home.path())
        .args(["task", "list", "--status", "later"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status"));
}
