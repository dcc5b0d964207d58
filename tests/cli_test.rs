use assert_cmd::Command;
use predicates::prelude::*;

fn macmaint() -> Command {
    Command::cargo_bin("macmaint").unwrap()
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    macmaint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("maintenance"))
        .stdout(predicate::str::contains("--yes"))
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--operation"))
        .stdout(predicate::str::contains("--only-risk"))
        .stdout(predicate::str::contains("--skip"))
        .stdout(predicate::str::contains("--min-free-gb"))
        .stdout(predicate::str::contains("--report-dir"));
}

#[test]
fn test_version_flag() {
    macmaint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("macmaint"));
}

// ─── Catalogue listing ───────────────────────────────────────────────────────

#[test]
fn test_list_shows_every_operation() {
    macmaint()
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("software-update-check"))
        .stdout(predicate::str::contains("user-cache-clean"))
        .stdout(predicate::str::contains("trash-empty"))
        .stdout(predicate::str::contains("spotlight-rebuild"))
        .stdout(predicate::str::contains("dns-flush"))
        .stdout(predicate::str::contains("network-reset"));
}

#[test]
fn test_list_preserves_declaration_order() {
    let output = macmaint().arg("--list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let first = stdout.find("software-update-check").unwrap();
    let last = stdout.find("network-reset").unwrap();
    assert!(
        first < last,
        "software-update-check must be listed before network-reset"
    );
}

#[test]
fn test_list_json_output() {
    let output = macmaint()
        .args(["--list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ops = parsed.as_array().unwrap();
    assert_eq!(ops.len(), 13);
    assert_eq!(ops[0]["id"], "software-update-check");
    assert_eq!(ops[ops.len() - 1]["id"], "network-reset");
    for op in ops {
        assert!(op["risk"].is_string());
        assert!(op["category"].is_string());
        assert!(op["description"].is_string());
    }
}

// ─── Usage errors ────────────────────────────────────────────────────────────

#[test]
fn test_unknown_operation_exits_2() {
    macmaint()
        .args(["--operation", "defrag-floppy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown operation"))
        .stderr(predicate::str::contains("defrag-floppy"));
}

#[test]
fn test_invalid_risk_level_is_rejected() {
    macmaint()
        .args(["--only-risk", "extreme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_format_is_rejected() {
    macmaint()
        .args(["--list", "--format", "yaml"])
        .assert()
        .failure();
}

// ─── Shell completions ───────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    macmaint()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("macmaint"));
}

#[test]
fn test_completions_zsh() {
    macmaint()
        .args(["--completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("macmaint"));
}
