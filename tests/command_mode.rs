//! Integration tests for the spanrow binary

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const LAYOUT: &str = r#"
[[sheet]]
title = "Contacts"
rows = [
    [{ value = "Contacts", col = 3, key = "title" }],
    ["ID", "Name", { value = "Email", key = "email" }],
    [1, "Nick", "nick@example.com"],
]
"#;

fn run_command(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let config = dir.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("Failed to write config");
    }
    let output = Command::new(env!("CARGO_BIN_EXE_spanrow"))
        .current_dir(dir)
        // Tests must not depend on a user's ~/.config/spanrow/config.toml.
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("layout.toml"), LAYOUT).expect("Failed to write layout");
    dir
}

#[test]
fn test_dump_layout() {
    let dir = workspace();
    let (stdout, _, code) = run_command(dir.path(), &["layout.toml", "--dump"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "# Contacts\nContacts\t\t\nID\tName\tEmail\n1\tNick\tnick@example.com\n"
    );
}

#[test]
fn test_keys_output() {
    let dir = workspace();
    let (stdout, _, code) = run_command(dir.path(), &["layout.toml", "--keys"]);
    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "# Contacts\nemail\tC2\tC\t2\tC2:C2\ntitle\tA1\tA\t1\tA1:C1\n"
    );
}

#[test]
fn test_output_format_from_extension() {
    let dir = workspace();
    let (_, stderr, code) = run_command(dir.path(), &["layout.toml", "-o", "out.html"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let html = std::fs::read_to_string(dir.path().join("out.html")).unwrap();
    assert!(html.contains("colspan=\"3\""));
    assert!(html.contains("nick@example.com"));
}

#[test]
fn test_default_output_uses_config() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("config.toml"),
        "[output]\nformat = \"Csv\"\nfilename = \"report\"\n",
    )
    .unwrap();
    let (_, stderr, code) = run_command(dir.path(), &["layout.toml"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let csv = std::fs::read_to_string(dir.path().join("report.csv")).unwrap();
    assert_eq!(csv, "Contacts,,\nID,Name,Email\n1,Nick,nick@example.com\n");
}

#[test]
fn test_csv_round_trip() {
    let dir = workspace();
    std::fs::write(dir.path().join("people.csv"), "a,b\n\"x,y\",2\n").unwrap();
    let (stdout, _, code) = run_command(dir.path(), &["people.csv", "--dump"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "# people\na\tb\nx,y\t2\n");
}

#[test]
fn test_binary_formats_unsupported() {
    let dir = workspace();
    let (_, stderr, code) = run_command(dir.path(), &["layout.toml", "-o", "out.xlsx"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Xlsx"), "stderr: {}", stderr);
}

#[test]
fn test_overlapping_merge_fails() {
    let dir = workspace();
    std::fs::write(
        dir.path().join("bad.toml"),
        "[[sheet]]\nrows = [[{ value = \"a\", row = 2 }], [{ value = \"b\", col = 2 }]]\n",
    )
    .unwrap();
    let (_, stderr, code) = run_command(dir.path(), &["bad.toml", "--dump"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_bad_config_warns() {
    let dir = workspace();
    std::fs::write(dir.path().join("config.toml"), "[output\n").unwrap();
    let (stdout, stderr, code) = run_command(dir.path(), &["layout.toml", "--dump"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("Warning: Failed to parse"));
    assert!(stdout.starts_with("# Contacts"));
}

#[test]
fn test_missing_input() {
    let dir = workspace();
    let (_, stderr, code) = run_command(dir.path(), &[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Usage: spanrow"));
}

#[test]
fn test_unknown_option() {
    let dir = workspace();
    let (_, stderr, code) = run_command(dir.path(), &["--frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"));
}
