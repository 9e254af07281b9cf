use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs::write;
use std::path::PathBuf;

fn trapscan(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("trapscan").unwrap();
    cmd.env_remove("TRAPSCAN_ORIGIN")
        .env_remove("TRAPSCAN_PRODUCTION_URL")
        .env_remove("TRAPSCAN_THEME_FILE")
        .args([
            "--config",
            dir.path().join("missing.toml").to_str().unwrap(),
            "--theme-file",
            dir.path().join("theme.json").to_str().unwrap(),
        ]);
    cmd
}

#[test]
fn rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    write(&file, "plain text").unwrap();

    trapscan(&dir)
        .args(["scan", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload a PDF or DOCX file."))
        .stderr(predicate::str::contains("Analyzing").not());
}

#[test]
fn reports_transport_failure_generically() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("Report.PDF");
    write(&file, "%PDF-1.7").unwrap();

    trapscan(&dir)
        .args(["--origin", "http://127.0.0.1:9", "scan", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Analyzing Report.PDF..."))
        .stderr(predicate::str::contains(
            "An error occurred while analyzing the file.",
        ))
        .stdout(predicate::str::is_empty());
}

#[test]
fn origin_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("trapscan.toml");
    write(&config, "origin = \"not a url\"\n").unwrap();
    let file = dir.path().join("a.docx");
    write(&file, "PK").unwrap();

    Command::cargo_bin("trapscan")
        .unwrap()
        .env_remove("TRAPSCAN_ORIGIN")
        .args([
            "--config",
            config.to_str().unwrap(),
            "--theme-file",
            dir.path().join("theme.json").to_str().unwrap(),
            "scan",
            file.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid origin URL `not a url`"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    trapscan(&dir)
        .args(["scan", dir.path().join("absent.pdf").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

const HIDDEN_TEXT_PAYLOAD: &str = r#"{"verdict":"high","filename":"memo.docx","file_type":"docx","total_paragraphs":12,"hidden_text":[{"paragraph":3,"property":"vanish"}],"small_text":[{"paragraph":4,"font_size":"1.5"}],"white_text":[]}"#;

fn analysis_server() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(200)
            .header("content-type", "application/json")
            .body(HIDDEN_TEXT_PAYLOAD);
    });
    server
}

fn memo(dir: &tempfile::TempDir) -> PathBuf {
    let file = dir.path().join("memo.docx");
    write(&file, "PK\x03\x04").unwrap();
    file
}

fn scan_json(args: &[&str]) -> serde_json::Value {
    let dir = tempfile::tempdir().unwrap();
    let file = memo(&dir);
    let server = analysis_server();
    let output = trapscan(&dir)
        .args(["--origin", &server.base_url(), "scan", file.to_str().unwrap()])
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn section<'a>(report: &'a serde_json::Value, category: &str) -> &'a serde_json::Value {
    report["sections"]
        .as_array()
        .unwrap()
        .iter()
        .find(|section| section["category"] == category)
        .unwrap_or_else(|| panic!("missing section {category}"))
}

#[test]
#[ignore = "requires loopback networking"]
fn human_report_shows_verdict_banner() {
    let dir = tempfile::tempdir().unwrap();
    let file = memo(&dir);
    let server = analysis_server();

    trapscan(&dir)
        .args(["--origin", &server.base_url(), "scan", "--no-color"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Analyzing memo.docx..."))
        .stdout(predicate::str::contains("TRAP DETECTED!"))
        .stdout(predicate::str::contains("Paragraphs: 12"))
        .stdout(predicate::str::contains("📍 Paragraph 3"))
        .stdout(predicate::str::contains("✓ No white/hidden text detected"));
}

#[test]
#[ignore = "requires loopback networking"]
fn json_report_carries_section_state() {
    let report = scan_json(&[]);
    assert_eq!(report["banner"]["verdict"], "high");
    assert_eq!(report["total_paragraphs"], 12);
    assert_eq!(section(&report, "hidden_text")["expanded"], true);
    assert_eq!(section(&report, "small_text")["count"], 1);
    assert_eq!(section(&report, "white_text")["expanded"], false);
}

#[test]
#[ignore = "requires loopback networking"]
fn expand_all_opens_empty_sections() {
    let report = scan_json(&["--expand-all"]);
    for category in ["white_text", "small_text", "hidden_text"] {
        assert_eq!(section(&report, category)["expanded"], true);
    }
}

#[test]
#[ignore = "requires loopback networking"]
fn html_report_is_a_themed_page() {
    let dir = tempfile::tempdir().unwrap();
    let file = memo(&dir);
    let server = analysis_server();

    trapscan(&dir)
        .args(["theme", "dark"])
        .assert()
        .success();
    trapscan(&dir)
        .args(["--origin", &server.base_url(), "scan", "--format", "html"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("data-theme=\"dark\""))
        .stdout(predicate::str::contains("verdict-card high"));
}
