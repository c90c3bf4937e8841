use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

#[allow(deprecated)]
fn repodoc() -> Command {
    let mut cmd = Command::cargo_bin("repodoc").expect("binary");
    cmd.env_remove("REPODOC_GIT_TOKEN");
    cmd
}

fn git(repo: &Path, args: &[&str]) -> String {
    let out = std::process::Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .output()
        .expect("git command");
    assert!(out.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

fn fixture(files: &[(&str, &str)]) -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let repo = dir.path();
    git(repo, &["init", "--quiet"]);
    git(repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(repo, &["config", "user.email", "test@example.com"]);
    git(repo, &["config", "user.name", "Test"]);
    for (path, content) in files {
        let full = repo.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    git(repo, &["add", "."]);
    git(repo, &["commit", "--quiet", "-m", "fixture"]);
    let url = format!("file://{}", repo.display());
    (dir, url)
}

const GREETER_TS: &str = r#"
import { format } from "./format";

/** Says hello */
export function greet(name: string): string {
  if (!name) {
    return "hello";
  }
  return format(name);
}
"#;

#[test]
fn summarize_prints_a_compact_digest() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("greeter.ts");
    fs::write(&file, GREETER_TS).unwrap();

    let output = repodoc()
        .arg("summarize")
        .arg(&file)
        .output()
        .expect("run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    let digest: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(digest["kind"], "Module");
    let names: Vec<&str> = digest["children"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|child| child["name"].as_str())
        .collect();
    assert!(names.contains(&"greet"), "children: {names:?}");
}

#[test]
fn summarize_rejects_unsupported_files() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("main.py");
    fs::write(&file, "def main(): pass\n").unwrap();

    repodoc()
        .arg("summarize")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported language"));
}

#[test]
fn ingest_json_reports_listing_and_contents() {
    let (_src, url) = fixture(&[
        ("src/greeter.ts", GREETER_TS),
        ("README.md", "# greeter\n"),
        ("node_modules/dep/index.js", "module.exports = 1;\n"),
    ]);
    let temp_root = tempdir().unwrap();

    let output = repodoc()
        .arg("ingest")
        .arg(&url)
        .arg("--json")
        .arg("--temp-dir")
        .arg(temp_root.path())
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["branch"], "main");
    let structure = body["structure"].as_str().unwrap();
    assert!(structure.contains("src (directory)\n  src/greeter.ts (file)\n"));
    assert!(structure.contains("node_modules (directory)\n"));
    let contents = body["fileContents"].as_object().unwrap();
    assert_eq!(
        contents.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["src/greeter.ts"]
    );
    assert_eq!(body["truncated"], false);
    assert!(fs::read_dir(temp_root.path()).unwrap().next().is_none());
}

#[test]
fn ingest_honours_the_file_cap() {
    let (_src, url) = fixture(&[
        ("a.js", "let a;\n"),
        ("b.js", "let b;\n"),
        ("c.js", "let c;\n"),
    ]);

    let output = repodoc()
        .args(["ingest", &url, "--json", "--max-files", "2"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["fileContents"].as_object().unwrap().len(), 2);
    assert_eq!(body["truncated"], true);
}

#[test]
fn prompts_embed_structural_digests() {
    let (_src, url) = fixture(&[("src/greeter.ts", GREETER_TS), ("util.py", "x = 1\n")]);

    let output = repodoc()
        .args(["prompts", &url, "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["path"], "src/greeter.ts");
    let prompt = entries[0]["prompt"].as_str().unwrap();
    assert!(prompt.contains("File: src/greeter.ts (typescript)\nStructural digest"));
    assert!(prompt.contains("\"greet\""));
    assert_eq!(entries[1]["path"], "util.py");
    assert!(entries[1]["prompt"]
        .as_str()
        .unwrap()
        .contains("```python\nx = 1\n```"));
}

#[test]
fn prompts_raw_mode_skips_summaries() {
    let (_src, url) = fixture(&[("index.ts", "export const answer = 42;\n")]);

    repodoc()
        .args(["prompts", &url, "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("===== index.ts ====="))
        .stdout(predicate::str::contains(
            "Source:\n```typescript\nexport const answer = 42;\n```",
        ));
}

#[test]
fn unreachable_repository_fails_without_leaking_the_token() {
    let temp_root = tempdir().unwrap();
    let url = format!("file://{}/missing", temp_root.path().display());

    repodoc()
        .args(["ingest", &url, "--token", "hunter2"])
        .arg("--temp-dir")
        .arg(temp_root.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ingestion failed"))
        .stderr(predicate::str::contains("hunter2").not());
    assert!(fs::read_dir(temp_root.path()).unwrap().next().is_none());
}

#[test]
fn malformed_header_is_rejected_before_cloning() {
    repodoc()
        .args(["ingest", "https://example.invalid/a/b.git", "--header", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Name: value"));
}
