// Drives the one-shot subcommands of the compiled binary.
// HOME points at a temp dir so the real history database is never touched.

use std::path::Path;

use assert_cmd::Command;

fn exhale(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("exhale").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("EXHALE_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn mood_is_logged_and_shows_in_history() {
    let home = tempfile::tempdir().unwrap();

    let out = stdout_of(exhale(home.path()).args(["mood", "happy", "-i", "4", "-n", "slept well"]));
    assert!(out.contains("Logged"));
    assert!(out.contains("happy"));
    assert!(out.contains("4/5"));

    assert!(home
        .path()
        .join(".local/state/exhale/history.db")
        .exists());

    let out = stdout_of(exhale(home.path()).arg("history"));
    assert!(out.contains("0 sessions"));
    assert!(out.contains("1 check-in"));
    assert!(out.contains("average intensity 4.0"));
    assert!(out.contains("slept well"));
}

#[test]
fn empty_history_prints_zero_totals() {
    let home = tempfile::tempdir().unwrap();
    let out = stdout_of(exhale(home.path()).args(["history", "-l", "3"]));
    assert!(out.contains("Breathing: 0 sessions, 0 minutes"));
    assert!(out.contains("Moods: 0 check-ins"));
    assert!(out.contains("Journal: 0 entries"));
}

#[test]
fn out_of_range_intensity_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = exhale(home.path())
        .args(["mood", "sad", "-i", "9"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!home.path().join(".local/state/exhale/history.db").exists());
}

#[test]
fn zero_minutes_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = exhale(home.path()).args(["-m", "0"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn tui_refuses_to_run_without_a_terminal() {
    let home = tempfile::tempdir().unwrap();
    let output = exhale(home.path()).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("interactive terminal"));
}

#[test]
fn journal_entry_is_saved_and_listed() {
    let home = tempfile::tempdir().unwrap();

    let out = stdout_of(exhale(home.path()).args([
        "journal",
        "-p",
        "4",
        "Cooked a new recipe from scratch.",
    ]));
    assert!(out.contains("Saved your reflection"));
    assert!(out.contains("What are you most proud of today?"));

    let out = stdout_of(exhale(home.path()).arg("history"));
    assert!(out.contains("Journal: 1 entry"));
    assert!(out.contains("What are you most proud of today?"));
    assert!(out.contains("Cooked a new recipe from scratch."));
}

#[test]
fn journal_without_text_prints_prompts() {
    let home = tempfile::tempdir().unwrap();
    let out = stdout_of(exhale(home.path()).arg("journal"));
    assert!(out.contains("(1) What made you feel a burst of joy today?"));
    assert!(!home.path().join(".local/state/exhale/history.db").exists());
}

#[test]
fn short_journal_entry_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = exhale(home.path())
        .args(["journal", "ok"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!home.path().join(".local/state/exhale/history.db").exists());

    let output = exhale(home.path())
        .args(["journal", "-p", "99", "a long enough reflection"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
