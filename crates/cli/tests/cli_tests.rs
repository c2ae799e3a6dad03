//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("llmstxt").unwrap()
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_links_stdin() {
    cmd()
        .args(["links", "-"])
        .write_stdin("See [Docs](https://x.com/d) and https://y.com")
        .assert()
        .success()
        .stdout(predicate::str::contains("- [Docs](https://x.com/d)"))
        .stdout(predicate::str::contains("- [https://y.com](https://y.com)"));
}

#[test]
fn test_cli_links_file_input() {
    cmd()
        .args(["links", &get_fixture_path("links_input.txt")])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [Docs](https://x.com/d)"))
        .stdout(predicate::str::contains("- [the guide](https://z.example.org/guide)"));
}

#[test]
fn test_cli_links_dedupes_by_url() {
    let output = cmd()
        .args(["links", &get_fixture_path("links_input.txt")])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.matches("https://x.com/d").count(), 1);
}

#[test]
fn test_cli_links_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("links.md");

    cmd()
        .args(["links", "-", "-o", output.to_str().unwrap()])
        .write_stdin("https://example.com/docs")
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("- [https://example.com/docs](https://example.com/docs)"));
}

#[test]
fn test_cli_links_no_valid_links() {
    cmd()
        .args(["links", "-"])
        .write_stdin("nothing linkable here")
        .assert()
        .success()
        .stderr(predicate::str::contains("No valid links found"));
}

#[test]
fn test_cli_links_missing_file() {
    cmd().args(["links", "nonexistent.txt"]).assert().failure();
}

#[test]
fn test_cli_pages_empty_input() {
    cmd()
        .args(["pages", "-"])
        .write_stdin("not a url\n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No URLs provided"));
}

#[test]
fn test_cli_pages_unreachable_host_writes_placeholder() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args([
            "pages",
            "-",
            "--out-dir",
            tmp.path().to_str().unwrap(),
            "--timeout",
            "2",
        ])
        .write_stdin("https://nonexistent-host.invalid/page\n")
        .assert()
        .success();

    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let path = entries[0].as_ref().unwrap().path();
    assert_eq!(path.extension().unwrap(), "md");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Error processing"));
}

#[test]
fn test_cli_pages_bundle_single_stays_markdown() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args([
            "pages",
            "-",
            "--out-dir",
            tmp.path().to_str().unwrap(),
            "--bundle",
            "--timeout",
            "2",
        ])
        .write_stdin("https://nonexistent-host.invalid/only\n")
        .assert()
        .success();

    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].as_ref().unwrap().path().extension().unwrap(), "md");
}

#[test]
fn test_cli_pages_bundle_many_creates_archive() {
    let tmp = TempDir::new().unwrap();

    cmd()
        .args([
            "pages",
            "-",
            "--out-dir",
            tmp.path().to_str().unwrap(),
            "--bundle",
            "--timeout",
            "2",
        ])
        .write_stdin("https://one.invalid/a\nhttps://two.invalid/b\n")
        .assert()
        .success();

    assert!(tmp.path().join("webpage_markdown_files.zip").exists());
}

#[test]
fn test_cli_nav_requires_root_selector() {
    cmd().args(["nav", "https://example.com"]).assert().failure();
}

#[test]
fn test_cli_nav_invalid_url_fails_before_browser() {
    // No chromedriver is installed in the test environment; input
    // validation must reject the request first.
    cmd()
        .args(["nav", "not-a-url", "-s", "nav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid URL").or(predicate::str::contains("Extraction failed")));
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("nav"))
        .stdout(predicate::str::contains("links"))
        .stdout(predicate::str::contains("pages"));
}

#[test]
fn test_cli_version() {
    cmd().arg("--version").assert().success().stdout(predicate::str::contains("llmstxt"));
}
