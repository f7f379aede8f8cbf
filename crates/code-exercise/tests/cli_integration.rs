/*
 * cli_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the code-exercise binary.
 */

//! Integration tests for the code-exercise binary.
//!
//! These tests run the built binary on decks written to a temporary
//! directory and inspect what it writes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const DECK: &str = r#"<div class="reveal"><div class="slides">
<section><h1>Welcome</h1></section>
<section data-code-exercise="" data-code-exercise-id="ex1" data-code-exercise-title="First steps">
<pre data-code-exercise-content="">
&lt;h1&gt;Hello&lt;/h1&gt;</pre>
<p data-code-exercise-custom-content="">Use a heading.</p>
</section>
<section>
<section data-code-exercise="" data-code-exercise-preview="false" data-code-exercise-monaco-font-size="18">
<pre data-code-exercise-content="">&lt;p&gt;text&lt;/p&gt;</pre>
</section>
</section>
</div></div>"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn run(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_code-exercise"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run code-exercise")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_render_writes_materialized_deck() {
    let ws = Workspace::new();
    let input = ws.write("deck.html", DECK);
    let output_path = ws.path("out.html");

    let output = run(&[
        Path::new("render"),
        &input,
        Path::new("-o"),
        &output_path,
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let html = fs::read_to_string(&output_path).unwrap();
    assert_eq!(html.matches(r#"<div class="code-exercise">"#).count(), 2);
    assert!(html.contains("<h3>First steps</h3>"));
    assert!(html.contains(r#"<iframe srcdoc="&lt;h1&gt;Hello&lt;/h1&gt;" title="Preview"></iframe>"#));
    assert_eq!(html.matches("<iframe").count(), 1);
    assert!(html.contains(r#"<p data-code-exercise-custom-content="">Use a heading.</p></div>"#));
    assert!(html.contains(r#"data-editor-options="{&quot;font&quot;:{&quot;size&quot;:18}}""#));
    assert_eq!(html.matches(r#"data-layout="ready""#).count(), 2);
    assert_eq!(html.matches(r#"<div class="spoiler-element">"#).count(), 2);
    assert!(html.contains(r#"<span class="sr-only" aria-live="polite">There are no hints yet.</span>"#));
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(!html.contains("data-code-exercise-content"));

    assert!(stderr(&output).contains("Rendered deck"));
}

#[test]
fn test_render_to_stdout_with_config() {
    let ws = Workspace::new();
    let input = ws.write("deck.html", DECK);
    let config = ws.write(
        "config.json",
        r#"{"codeExercise": {"showPreview": "false", "feedback": {"heading": "Tips:"}}}"#,
    );

    let output = run(&[
        Path::new("--quiet"),
        Path::new("render"),
        &input,
        Path::new("--config"),
        &config,
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let html = stdout(&output);
    assert!(!html.contains("<iframe"));
    assert_eq!(html.matches("<h4>Tips:</h4>").count(), 2);
    assert!(stderr(&output).is_empty());
}

#[test]
fn test_render_rejects_unsupported_type() {
    let ws = Workspace::new();
    let input = ws.write(
        "deck.html",
        r#"<div><section data-code-exercise="" data-code-exercise-type="python"></section></div>"#,
    );
    let output_path = ws.path("out.html");

    let output = run(&[
        Path::new("render"),
        &input,
        Path::new("-o"),
        &output_path,
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unsupported exercise type: python"));
    assert!(!output_path.exists());
}

#[test]
fn test_render_reports_malformed_deck() {
    let ws = Workspace::new();
    let input = ws.write("deck.html", "<section><p></section>");

    let output = run(&[Path::new("render"), &input]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid deck"));
}

#[test]
fn test_check_lists_declarations() {
    let ws = Workspace::new();
    let input = ws.write("deck.html", DECK);

    let output = run(&[Path::new("check"), &input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            r#"slide 1: html id=ex1 title="First steps" preview lines=1"#.to_string(),
            "slide 2: html lines=1".to_string(),
        ]
    );
}

#[test]
fn test_bare_marker_attributes() {
    let ws = Workspace::new();
    let input = ws.write(
        "deck.html",
        concat!(
            "<div><section data-code-exercise data-code-exercise-id=\"bare\">",
            "<pre data-code-exercise-content>&lt;p&gt;hi&lt;/p&gt;</pre>",
            "</section></div>",
        ),
    );

    let output = run(&[Path::new("check"), &input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim_end(), "slide 0: html id=bare preview lines=1");

    let output = run(&[Path::new("--quiet"), Path::new("render"), &input]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let html = stdout(&output);
    assert!(html.contains(r#"<div class="code-exercise">"#));
    assert!(html.contains(r#"<iframe srcdoc="&lt;p&gt;hi&lt;/p&gt;" title="Preview"></iframe>"#));
}

#[test]
fn test_check_json_leaves_deck_untouched() {
    let ws = Workspace::new();
    let input = ws.write("deck.html", DECK);

    let output = run(&[Path::new("check"), &input, Path::new("--json")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], "ex1");
    assert_eq!(entries[0]["customContent"], true);
    assert_eq!(entries[1]["editorOptions"], serde_json::json!({"font": {"size": 18}}));

    assert_eq!(fs::read_to_string(&input).unwrap(), DECK);
}
