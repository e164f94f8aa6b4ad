//! Integration tests for `crossbake compile`
//!
//! These tests run the real binary inside a temporary project and point
//! `CROSSBAKE_BUILD_TOOL` at a shell script that imitates `bun build
//! --compile`: it writes the `--outfile` and fails for `$FAKE_FAIL_TARGET`.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_BUN: &str = r#"#!/bin/sh
out=""
target=""
while [ $# -gt 0 ]; do
  case "$1" in
    --outfile) out="$2"; shift ;;
    --target) target="$2"; shift ;;
  esac
  shift
done
if [ "$target" = "$FAKE_FAIL_TARGET" ]; then
  echo "error: Could not resolve \"./missing\"" >&2
  exit 1
fi
echo "built $target" > "$out"
"#;

struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create test directory");
        fs::create_dir_all(dir.path().join("src")).expect("Failed to create src directory");
        fs::write(
            dir.path().join("src").join("main.ts"),
            "console.log('Hello from test!');\n",
        )
        .expect("Failed to write entry");

        let tool = dir.path().join("fake-bun");
        fs::write(&tool, FAKE_BUN).expect("Failed to write fake build tool");
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark fake build tool executable");

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn dist(&self) -> PathBuf {
        self.path().join("dist")
    }

    fn run(&self, args: &[&str], fail_target: Option<&str>) -> Output {
        Command::new(env!("CARGO_BIN_EXE_crossbake"))
            .args(args)
            .current_dir(self.path())
            .env("CROSSBAKE_BUILD_TOOL", self.path().join("fake-bun"))
            .env("FAKE_FAIL_TARGET", fail_target.unwrap_or("none"))
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run crossbake")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_compile_two_targets() {
    let project = TestProject::new();
    let output = project.run(
        &[
            "compile",
            "src/main.ts",
            "--target",
            "linux-x64",
            "darwin-arm64",
            "--concurrency",
            "2",
        ],
        None,
    );

    assert!(
        output.status.success(),
        "compile failed.\nstdout: {}\nstderr: {}",
        stdout(&output),
        stderr(&output)
    );
    assert!(stdout(&output).contains("Successfully compiled 2 target(s)"));
    assert_eq!(
        fs::read_to_string(project.dist().join("linux-x64")).unwrap().trim(),
        "built bun-linux-x64"
    );
    assert!(project.dist().join("darwin-arm64").exists());
}

#[test]
fn test_failing_target_fails_the_run_but_not_the_others() {
    let project = TestProject::new();
    let output = project.run(
        &[
            "compile",
            "src/main.ts",
            "-t",
            "linux-x64",
            "darwin-x64",
            "linux-arm64",
        ],
        Some("bun-darwin-x64"),
    );

    let out = stdout(&output);
    assert!(!output.status.success(), "run should fail: {}", out);
    assert!(out.contains("Compilation completed with 1 failure(s)"));
    assert!(out.contains("Could not resolve"));
    assert!(out.contains("Successfully compiled 2 target(s)"));
    assert!(project.dist().join("linux-x64").exists());
    assert!(project.dist().join("linux-arm64").exists());
    assert!(!project.dist().join("darwin-x64").exists());
}

#[test]
fn test_json_summary_keeps_target_order() {
    let project = TestProject::new();
    let output = project.run(
        &[
            "compile",
            "src/main.ts",
            "--target",
            "linux-arm64-musl",
            "darwin-x64",
            "linux-x64",
            "--prefix",
            "app",
            "--json",
        ],
        Some("bun-darwin-x64"),
    );

    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(json["success"], false);
    assert_eq!(json["success_count"], 2);
    assert_eq!(json["failure_count"], 1);

    let targets: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["target"].as_str().unwrap())
        .collect();
    assert_eq!(targets, vec!["linux-arm64-musl", "darwin-x64", "linux-x64"]);
    assert!(project.dist().join("app-linux-x64").exists());
    assert_eq!(json["stats"]["total_targets"], 3);
}

#[test]
fn test_invalid_concurrency_runs_nothing() {
    let project = TestProject::new();
    let output = project.run(
        &[
            "compile",
            "src/main.ts",
            "--target",
            "linux-x64",
            "--concurrency",
            "0",
        ],
        None,
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("maxConcurrency must be between 1 and 16"));
    assert!(!project.dist().exists());
}

#[test]
fn test_unknown_targets_without_prompt_fail() {
    let project = TestProject::new();
    let output = project.run(
        &["compile", "src/main.ts", "--target", "windows-x64", "--no-prompt"],
        None,
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("At least one target has to be provided"));
    assert!(!project.dist().exists());
}

#[test]
fn test_missing_entry_is_reported() {
    let project = TestProject::new();
    let output = project.run(&["compile", "src/nope.ts", "--target", "linux-x64"], None);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Entry file not found"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let project = TestProject::new();
    fs::write(
        project.path().join("crossbake.toml"),
        r#"[compile]
outdir = "out"
prefix = "tool"
targets = ["darwin-arm64"]
"#,
    )
    .unwrap();

    let output = project.run(&["compile", "src/main.ts", "--no-prompt"], None);
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        stdout(&output),
        stderr(&output)
    );
    assert!(project.path().join("out").join("tool-darwin-arm64").exists());

    // CLI flags win over the file
    let output = project.run(
        &["compile", "src/main.ts", "--outdir", "cli-out", "-t", "linux-x64"],
        None,
    );
    assert!(output.status.success());
    assert!(project.path().join("cli-out").join("tool-linux-x64").exists());
}

#[test]
fn test_clean_is_announced_and_json_stays_parseable() {
    let project = TestProject::new();
    fs::create_dir_all(project.dist()).unwrap();
    fs::write(project.dist().join("stale"), "old").unwrap();

    let output = project.run(
        &["compile", "src/main.ts", "-t", "linux-x64", "--clean"],
        None,
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Cleaning dist directory..."));
    assert!(!project.dist().join("stale").exists());

    let output = project.run(
        &["compile", "src/main.ts", "-t", "linux-x64", "--clean", "--json"],
        None,
    );
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(json["success"], true);
}

#[test]
fn test_target_and_current_conflict() {
    let project = TestProject::new();
    let output = project.run(
        &["compile", "src/main.ts", "--target", "linux-x64", "--current"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("cannot be used with"));
}
