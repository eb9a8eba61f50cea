//! CLI interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{BufRead as _, BufReader, Write as _};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;

/// Nothing listens on the discard port, so downloads fail fast
const UNREACHABLE_BASE: &str = "http://127.0.0.1:9/schemas/";

const MIRRORED_SETTINGS_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "$id": "https://mirror.test/paconn-settings.schema.json",
  "type": "object",
  "required": ["connectorId"]
}"#;

const GOOD_API_PROPERTIES: &str = r##"{
  "properties": {
    "iconBrandColor": "#007ee5",
    "publisher": "Contoso",
    "stackOwner": "Contoso"
  }
}"##;

const LOWERCASE_PUBLISHER: &str = r##"{
  "properties": {
    "iconBrandColor": "#007ee5",
    "publisher": "contoso",
    "stackOwner": "Contoso"
  }
}"##;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

fn lint(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("connector-lint").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .env("CONNECTOR_LINT_REMOTE_BASE", UNREACHABLE_BASE)
        .env("NO_PROXY", "127.0.0.1")
        .arg("--cache-dir")
        .arg(temp_dir.path().join("cache"));
    cmd
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("connector-lint").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("connector-lint"));
}

#[test]
fn test_help_flag() {
    let mut cmd = Command::cargo_bin("connector-lint").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validate API connector definition files",
        ));
}

#[test]
fn test_check_clean_file() {
    let temp_dir = workspace(&[("apiProperties.json", GOOD_API_PROPERTIES)]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json", "--deny-warnings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiProperties.json: ok"));
}

#[test]
fn test_check_reports_problems() {
    let temp_dir = workspace(&[("apiProperties.json", LOWERCASE_PUBLISHER)]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiProperties.json: 1 problem(s)"))
        .stdout(predicate::str::contains(
            "warning: /properties/publisher String must start with a capital letter.",
        ));
}

#[test]
fn test_deny_warnings_sets_exit_code() {
    let temp_dir = workspace(&[("apiProperties.json", LOWERCASE_PUBLISHER)]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json", "--deny-warnings"])
        .assert()
        .failure()
        .code(6);
}

#[test]
fn test_no_extended_flag_uses_base_schema() {
    let temp_dir = workspace(&[("apiProperties.json", LOWERCASE_PUBLISHER)]);

    lint(&temp_dir)
        .args(["--no-extended", "check", "apiProperties.json", "--deny-warnings"])
        .assert()
        .success();
}

#[test]
fn test_settings_file_disables_extended_validation() {
    let temp_dir = workspace(&[
        ("apiProperties.json", LOWERCASE_PUBLISHER),
        ("connector-lint.yaml", "extendedValidation: false\n"),
    ]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json", "--deny-warnings"])
        .assert()
        .success();
}

#[test]
fn test_invalid_settings_file() {
    let temp_dir = workspace(&[
        ("apiProperties.json", GOOD_API_PROPERTIES),
        ("connector-lint.yaml", "extendedValidation: sometimes\n"),
    ]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Settings validation failed"));
}

#[test]
fn test_json_output() {
    let temp_dir = workspace(&[
        ("apiProperties.json", LOWERCASE_PUBLISHER),
        ("notes.json", "{}"),
    ]);

    let output = lint(&temp_dir)
        .args(["check", "apiProperties.json", "notes.json", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["linted"], true);
    assert_eq!(
        reports[0]["diagnostics"][0]["source"],
        "JSON Schema Validation"
    );
    assert_eq!(reports[0]["diagnostics"][0]["severity"], "warning");
    assert!(
        reports[0]["uri"]
            .as_str()
            .unwrap()
            .starts_with("file://")
    );
    assert_eq!(reports[1]["linted"], false);
    assert_eq!(reports[1]["diagnostics"], serde_json::json!([]));
}

#[test]
fn test_unmapped_file_is_skipped() {
    let temp_dir = workspace(&[("package.json", "{ \"name\": \"x\" }")]);

    lint(&temp_dir)
        .args(["check", "package.json", "--deny-warnings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package.json: skipped"));
}

#[test]
fn test_missing_file() {
    let temp_dir = workspace(&[]);

    lint(&temp_dir)
        .args(["check", "settings.json"])
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_schemas_lists_identity_table() {
    let temp_dir = workspace(&[]);

    lint(&temp_dir)
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("apiproperties.json (modern, bundled)"))
        .stdout(predicate::str::contains(
            "apidefinition.swagger.json (legacy, bundled)",
        ))
        .stdout(predicate::str::contains(
            "extended: schemas/apiDefinition.swagger.extended.schema.json",
        ));
}

#[test]
fn test_schemas_reports_cached_copies() {
    let temp_dir = workspace(&[]);
    let cache = temp_dir.path().join("cache");
    fs::create_dir_all(&cache).unwrap();
    fs::write(cache.join("paconn-settings.schema.json"), "{}").unwrap();

    lint(&temp_dir)
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json (modern, cached)"));
}

/// Serve `settings_schema` for the settings schema and 404 for the rest,
/// answering one request per identity-table entry
fn schema_mirror(settings_schema: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/schemas/", listener.local_addr().unwrap());

    thread::spawn(move || {
        for stream in listener.incoming().take(3) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }

            let (status, body) = if request_line.contains("/paconn-settings.schema.json") {
                ("200 OK", settings_schema)
            } else {
                ("404 Not Found", "")
            };
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
        }
    });

    base
}

#[test]
fn test_check_refreshes_cache_before_validating() {
    let temp_dir = workspace(&[("settings.json", "{}")]);
    let mirror = schema_mirror(MIRRORED_SETTINGS_SCHEMA);

    lint(&temp_dir)
        .args(["check", "settings.json", "--remote-base", &mirror])
        .assert()
        .success()
        .stdout(predicate::str::contains("settings.json: 1 problem(s)"))
        .stdout(predicate::str::contains("connectorId"));

    let cached = fs::read_to_string(
        temp_dir
            .path()
            .join("cache")
            .join("paconn-settings.schema.json"),
    )
    .unwrap();
    assert_eq!(cached, MIRRORED_SETTINGS_SCHEMA);
}

#[test]
fn test_check_with_unreachable_source_uses_bundle() {
    let temp_dir = workspace(&[("apiProperties.json", LOWERCASE_PUBLISHER)]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiProperties.json: 1 problem(s)"))
        .stderr(predicate::str::contains("Schema refresh incomplete"));

    assert!(!temp_dir.path().join("cache").exists());
}

#[test]
fn test_check_offline_skips_download() {
    let temp_dir = workspace(&[("apiProperties.json", GOOD_API_PROPERTIES)]);

    lint(&temp_dir)
        .args(["check", "apiProperties.json", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiProperties.json: ok"))
        .stderr(predicate::str::contains("Schema refresh incomplete").not());
}

#[test]
fn test_refresh_with_unreachable_source_fails() {
    let temp_dir = workspace(&[]);

    lint(&temp_dir)
        .arg("refresh")
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("0 written, 0 unchanged, 3 failed"));
}
