use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project() -> TempDir {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir_all(tmp.path().join("app/src")).unwrap();
    fs::create_dir_all(tmp.path().join("app/.git")).unwrap();
    fs::write(tmp.path().join("app/src/main.rs"), "fn main() {}\n").unwrap();
    fs::write(tmp.path().join("app/notes.txt"), "remember\n").unwrap();
    fs::write(tmp.path().join("app/.git/HEAD"), "ref: main\n").unwrap();
    fs::write(tmp.path().join("app/logo.png"), "binary").unwrap();
    tmp
}

fn gpta(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gpta").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(dir.join("no-config.json"));
    cmd
}

#[test]
fn test_help_is_printed_at_startup() {
    let tmp = project();
    gpta(tmp.path())
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GPT Assist"))
        .stdout(predicate::str::contains(" -dir+ [Directory] : Adds directory to watch-list"))
        .stdout(predicate::str::contains("(000 sec) > "));
}

#[test]
fn test_first_prompt_respects_default_ignores() {
    let tmp = project();
    gpta(tmp.path())
        .write_stdin("name demo\ndir+ app\nprompt-first\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(" # Project: demo"))
        .stdout(predicate::str::contains("### File: app/src/main.rs"))
        .stdout(predicate::str::contains("### File: app/notes.txt"))
        .stdout(predicate::str::contains("logo.png").not())
        .stdout(predicate::str::contains("ref: main").not());
}

#[test]
fn test_update_prompt_only_shows_changes() {
    let tmp = project();
    let state = tmp.path().join("state.json");

    gpta(tmp.path())
        .write_stdin(format!("dir+ app\nupdate\nsave {}\n", state.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Context successfully saved"));

    fs::write(tmp.path().join("app/notes.txt"), "changed\n").unwrap();

    gpta(tmp.path())
        .arg("--load")
        .arg(&state)
        .write_stdin("prompt\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Context successfully loaded"))
        .stdout(predicate::str::contains("### Updated File: app/notes.txt"))
        .stdout(predicate::str::contains("### Updated File: app/src/main.rs").not())
        .stdout(predicate::str::contains("Updated Directory Structure").not());
}

#[test]
fn test_saved_file_uses_keyed_layout() {
    let tmp = project();
    let state = tmp.path().join("ctx.json");

    gpta(tmp.path())
        .write_stdin(format!("dir+ app\nextension+ rs\nsave {}\n", state.display()))
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).unwrap()).unwrap();
    assert_eq!(value["context"]["dir"][0], "app");
    assert_eq!(value["context"]["allowed_extensions"][".rs"], 0);
}

#[test]
fn test_printdir_shows_tree() {
    let tmp = project();
    gpta(tmp.path())
        .write_stdin("dir+ app\nprintdir\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory structure for app:"))
        .stdout(predicate::str::contains("└── src/"))
        .stdout(predicate::str::contains("fn main").not());
}

#[cfg(unix)]
#[test]
fn test_unknown_input_runs_in_shell() {
    let tmp = project();
    gpta(tmp.path())
        .write_stdin("echo passthrough-ok\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("passthrough-ok"));
}

#[test]
fn test_resolution_log() {
    let tmp = project();
    let log = tmp.path().join("resolve.log");
    gpta(tmp.path())
        .arg("--log")
        .arg(&log)
        .write_stdin("dir+ app\nnot-a-command\n")
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Time | Valid/Invalid | Command(if Valid) | InputParameters");
    assert!(lines[1].ends_with("-> Valid | dir+ | {\"dir+\": \"app\"}"));
    assert!(lines[2].contains("-> Invalid"));
}
