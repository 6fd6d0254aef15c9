//! Integration tests for the html-to-org CLI.
//!
//! These tests verify the CLI works correctly with various options and edge cases.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_html-to-org"))
}

#[test]
fn test_basic_stdin() {
    cli()
        .write_stdin("<h1>Title</h1><p>Content</p>")
        .assert()
        .success()
        .stdout("* Title\n\nContent\n");
}

#[test]
fn test_file_input() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.html");
    fs::write(&input_path, "<p>Test content</p>").unwrap();

    cli()
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout("Test content\n");
}

#[test]
fn test_input_flag() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.html");
    fs::write(&input_path, "<b>Flagged</b>").unwrap();

    cli()
        .arg("-i")
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout("*Flagged*\n");
}

#[test]
fn test_file_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.org");

    cli()
        .arg("-o")
        .arg(output_path.to_str().unwrap())
        .write_stdin("<p>Output test</p>")
        .assert()
        .success()
        .stdout("");

    let output = fs::read_to_string(&output_path).unwrap();
    assert_eq!(output, "Output test\n");
}

#[test]
fn test_dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("<p>Dash test</p>")
        .assert()
        .success()
        .stdout("Dash test\n");
}

#[test]
fn test_base_url() {
    cli()
        .arg("-u")
        .arg("http://example.com/foo/")
        .write_stdin("<a href=\"../\">top</a>")
        .assert()
        .success()
        .stdout("[[http://example.com/][top]]\n");
}

#[test]
fn test_invalid_base_url_fails() {
    cli()
        .arg("--base-url")
        .arg("not a url")
        .write_stdin("<a href=\"page.html\">page</a>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn test_pretty_tables() {
    cli()
        .arg("--pretty-tables")
        .write_stdin("<table><tr><th>a</th></tr><tr><td>b</td></tr></table>")
        .assert()
        .success()
        .stdout("| A |\n|---|\n| b |\n");
}

#[test]
fn test_pretty_tables_without_org_format() {
    cli()
        .arg("--pretty-tables")
        .arg("--no-org-tables")
        .write_stdin("<table><tr><td>b</td></tr></table>")
        .assert()
        .success()
        .stdout("+---+\n| b |\n+---+\n");
}

#[test]
fn test_plain_tables_by_default() {
    cli()
        .write_stdin("<table><tr><td>a</td><td>b</td></tr></table>")
        .assert()
        .success()
        .stdout("a b\n");
}

#[test]
fn test_omit_links() {
    cli()
        .arg("--omit-links")
        .write_stdin("<a href=\"http://example.com/\">Link</a>")
        .assert()
        .success()
        .stdout("Link\n");
}

#[test]
fn test_show_noscript() {
    cli()
        .write_stdin("<noscript><p>Enable JS</p></noscript>")
        .assert()
        .success()
        .stdout("");

    cli()
        .arg("--show-noscript")
        .write_stdin("<noscript><p>Enable JS</p></noscript>")
        .assert()
        .success()
        .stdout("Enable JS\n");
}

#[test]
fn test_show_internal_anchors() {
    cli()
        .arg("--show-internal-anchors")
        .write_stdin("<a href=\"#s\">go</a><h2 id=\"s\">Section</h2>")
        .assert()
        .success()
        .stdout(predicate::str::contains("** Section <<s>>"));
}

#[test]
fn test_show_full_data_urls() {
    let payload = "A".repeat(150);
    let html = format!("<img src=\"data:image/png;base64,{payload}\">");

    cli()
        .write_stdin(html.clone())
        .assert()
        .success()
        .stdout("[[data:image/png;(omitted)]]\n");

    cli()
        .arg("--show-full-data-urls")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains(payload));
}

#[test]
fn test_break_long_lines() {
    let sentence = "word ".repeat(40);
    let output = cli()
        .arg("--break-long-lines")
        .write_stdin(format!("<blockquote>{sentence}</blockquote>"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.lines().all(|line| line.len() <= 74), "{text}");
    assert!(text.lines().count() > 3, "{text}");
}

#[test]
fn test_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("options.json");
    fs::write(&config_path, r#"{"omit_links": true, "base_url": "http://example.com/"}"#).unwrap();

    cli()
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .write_stdin("<a href=\"x\">kept</a> <img src=\"i.png\">")
        .assert()
        .success()
        .stdout("kept [[http://example.com/i.png]]\n");
}

#[test]
fn test_flags_override_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("options.json");
    fs::write(&config_path, r#"{"base_url": "http://config.example/"}"#).unwrap();

    cli()
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("-u")
        .arg("http://flag.example/")
        .write_stdin("<a href=\"x\">x</a>")
        .assert()
        .success()
        .stdout("[[http://flag.example/x][x]]\n");
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("options.json");
    fs::write(&config_path, "{not json").unwrap();

    cli()
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .write_stdin("<p>Test</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_encoding_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("test.html");
    fs::write(&input_path, "<p>Test UTF-8: 你好</p>").unwrap();

    cli()
        .arg("--encoding")
        .arg("utf-8")
        .arg(input_path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("你好"));
}

#[test]
fn test_encoding_windows_1252() {
    cli()
        .arg("--encoding")
        .arg("windows-1252")
        .write_stdin(b"<p>Se\xf1or \x97 legacy charset</p>".to_vec())
        .assert()
        .success()
        .stdout(predicate::str::contains("Señor"))
        .stdout(predicate::str::contains("legacy charset"));
}

#[test]
fn test_utf8_bom_is_stripped() {
    let mut input = vec![0xEF, 0xBB, 0xBF];
    input.extend_from_slice("<p>種新的波兰文本已成为必要</p>".as_bytes());

    cli()
        .write_stdin(input)
        .assert()
        .success()
        .stdout("種新的波兰文本已成为必要\n");
}

#[test]
fn test_encoding_invalid() {
    cli()
        .arg("--encoding")
        .arg("invalid-encoding")
        .write_stdin("<p>Test</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown encoding"));
}

#[test]
fn test_nonexistent_file() {
    cli()
        .arg("/nonexistent/file.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading file"));
}

#[test]
fn test_invalid_html() {
    cli().write_stdin("<p>Unclosed paragraph<p>Another").assert().success();
}

#[test]
fn test_empty_input() {
    cli().write_stdin("").assert().success().stdout("");
}

#[test]
fn test_verbose_flag() {
    cli().arg("--verbose").write_stdin("<p>Test</p>").assert().success().stdout("Test\n");
}

#[test]
fn test_complex_document() {
    let html = r#"
        <html>
            <head><title>Test Document</title></head>
            <body>
                <h1>Main Title</h1>
                <p>Introduction with <strong>bold</strong> and <em>italic</em>.</p>
                <ul>
                    <li>Item 1</li>
                    <li>Item 2
                        <ul>
                            <li>Nested item</li>
                        </ul>
                    </li>
                </ul>
                <pre><code>fn main() {
    println!("Hello");
}</code></pre>
                <p>Link: <a href="https://example.com">Example</a></p>
            </body>
        </html>
    "#;

    cli()
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("#+TITLE: Test Document"))
        .stdout(predicate::str::contains("* Main Title"))
        .stdout(predicate::str::contains("*bold*"))
        .stdout(predicate::str::contains("/italic/"))
        .stdout(predicate::str::contains("- Item 1"))
        .stdout(predicate::str::contains("  - Nested item"))
        .stdout(predicate::str::contains("#+begin_src\nfn main() {"))
        .stdout(predicate::str::contains("[[https://example.com][Example]]"));
}

#[test]
fn test_version_flag() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    cli()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Options:"));
}
