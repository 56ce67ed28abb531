//! CLI integration tests for backlog
//!
//! These tests drive the binary end to end: project setup, the breakdown
//! commands on files and stdin, and full runs against shell-script plugins.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the backlog binary
fn backlog_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("backlog"));
    cmd.env_remove("RUST_LOG").env_remove("BACKLOG_FORMAT");
    cmd
}

/// Create a temporary directory and initialize a backlog project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    backlog_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

const BREAKDOWN: &str = "Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3, Dependencies: \n\
Summary: Implement OAuth, Issue Type: Task, Epic Name: Auth, Story Points: 8, Dependencies: Design login page\n\
Summary: Auth, Issue Type: Epic, Epic Name: , Story Points: ";

fn write_breakdown(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("breakdown.txt");
    fs::write(&path, BREAKDOWN).unwrap();
    path
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized backlog project"));

    assert!(dir.path().join(".backlog").is_dir());
    assert!(dir.path().join(".backlog/plugins").is_dir());
    assert!(dir.path().join(".backlog/cache").is_dir());
    assert!(dir.path().join(".backlog/transcripts").is_dir());
    assert!(dir.path().join(".backlog/config.toml").is_file());
    assert!(dir.path().join(".backlog/.gitignore").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    backlog_cmd().arg("init").arg(dir.path()).assert().success();
    fs::write(dir.path().join(".backlog/config.toml"), "[cache]\nenabled = false\n").unwrap();
    backlog_cmd().arg("init").arg(dir.path()).assert().success();

    let config = fs::read_to_string(dir.path().join(".backlog/config.toml")).unwrap();
    assert_eq!(config, "[cache]\nenabled = false\n");
}

// =============================================================================
// Breakdown Tests
// =============================================================================

#[test]
fn test_parse_file() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Design login page"))
        .stdout(predicate::str::contains("Implement OAuth"))
        .stdout(predicate::str::contains("Parsed 3 record(s), skipped 0 line(s)"));
}

#[test]
fn test_parse_json_from_stdin() {
    let dir = TempDir::new().unwrap();

    let output = backlog_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "parse", "-"])
        .write_stdin(format!("{}\nnot a breakdown line\n", BREAKDOWN))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = report["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], "r-1");
    assert_eq!(records[0]["summary"], "Design login page");
    assert_eq!(records[1]["dependencies"], "Design login page");
    assert_eq!(records[2]["issue_kind"], "Epic");
    assert_eq!(report["skipped"].as_array().unwrap().len(), 1);
    assert_eq!(report["nonempty_lines"], 4);
}

#[test]
fn test_parse_empty_input() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No records parsed."));
}

#[test]
fn test_parse_strict_schema_skips_short_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .args(["parse", "--schema", "with-dependencies"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 2 record(s), skipped 1 line(s)"));
}

#[test]
fn test_parse_missing_file() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["parse", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read breakdown"));
}

#[test]
fn test_parse_warns_about_duplicate_summaries() {
    let dir = TempDir::new().unwrap();
    let text = "Summary: Login, Issue Type: Task, Epic Name: A, Story Points: 1\n\
                Summary: Login, Issue Type: Task, Epic Name: B, Story Points: 2";

    backlog_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .write_stdin(text)
        .assert()
        .success()
        .stderr(predicate::str::contains("'Login' names more than one record"));
}

#[test]
fn test_graph_edges() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .arg("graph")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Auth -> Design login page [contains]"))
        .stdout(predicate::str::contains("Auth -> Implement OAuth [contains]"))
        .stdout(predicate::str::contains(
            "Implement OAuth -> Design login page [depends_on]",
        ));
}

#[test]
fn test_graph_json() {
    let dir = TempDir::new().unwrap();

    let output = backlog_cmd()
        .current_dir(dir.path())
        .args(["-f", "json", "graph"])
        .write_stdin(BREAKDOWN)
        .output()
        .unwrap();
    assert!(output.status.success());

    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(graph["edges"].as_array().unwrap().len(), 3);
    assert_eq!(graph["nodes"][0]["name"], "Auth");
    assert_eq!(graph["nodes"][0]["kind"], "epic");
    assert_eq!(graph["has_cycle"], false);
}

#[test]
fn test_graph_dot() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["graph", "--dot"])
        .write_stdin(BREAKDOWN)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph"))
        .stdout(predicate::str::contains("Implement OAuth"));
}

#[test]
fn test_graph_empty() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .arg("graph")
        .write_stdin("\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph is empty."));
}

#[test]
fn test_matrix_text() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .arg("matrix")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            "\tDesign login page\tImplement OAuth\n\
             Design login page\t0\t0\n\
             Implement OAuth\t1\t0\n",
        );
}

#[test]
fn test_matrix_json() {
    let dir = TempDir::new().unwrap();

    let output = backlog_cmd()
        .current_dir(dir.path())
        .args(["--format", "json", "matrix"])
        .write_stdin(BREAKDOWN)
        .output()
        .unwrap();
    assert!(output.status.success());

    let matrix: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        matrix["labels"],
        serde_json::json!(["Design login page", "Implement OAuth"])
    );
    assert_eq!(
        matrix["cells"],
        serde_json::json!([[false, false], [true, false]])
    );
}

#[test]
fn test_table_csv_stdout() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .args(["table", "--csv"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Summary,IssueType,EpicName,StoryPoints,Dependencies\n",
        ))
        .stdout(predicate::str::contains(
            "Implement OAuth,Task,Auth,8,Design login page\n",
        ))
        .stdout(predicate::str::contains("Auth,Epic,,,\n"));
}

#[test]
fn test_table_writes_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = write_breakdown(dir.path());
    let out = dir.path().join("backlog.csv");

    backlog_cmd()
        .current_dir(dir.path())
        .arg("table")
        .arg(&path)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 row(s)"));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.starts_with("Summary,IssueType,EpicName,StoryPoints,Dependencies"));
}

#[test]
fn test_table_keeps_issue_type_text() {
    let dir = TempDir::new().unwrap();
    let text = "Summary: Login, Issue Type: task, Epic Name: Auth, Story Points: 2\n\
                Summary: Auth, Issue Type: EPIC, Epic Name: , Story Points: ";

    backlog_cmd()
        .current_dir(dir.path())
        .args(["table", "--csv"])
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("Login,task,Auth,2,\n"))
        .stdout(predicate::str::contains("Auth,EPIC,,,\n"));
}

#[test]
fn test_parse_flags_shifted_fields() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "parse"])
        .write_stdin("Summary: A, Issue Type: Task, Bogus: x, Epic Name: E, Story Points: 1")
        .assert()
        .success()
        .stderr(predicate::str::contains("Line 1: labels do not follow the schema"));
}

#[test]
fn test_table_ignores_fields_past_dependencies() {
    let dir = TempDir::new().unwrap();
    let text = "Summary: Deploy, Issue Type: Task, Epic Name: Ops, Story Points: 2, Dependencies: Build; Test, extra";

    backlog_cmd()
        .current_dir(dir.path())
        .args(["table", "--csv"])
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy,Task,Ops,2,Build; Test\n"));
}

#[test]
fn test_project_config_sets_schema() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".backlog/config.toml"),
        "[parser]\nschema = \"with_dependencies\"\n",
    )
    .unwrap();
    let path = write_breakdown(dir.path());

    backlog_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed 2 record(s), skipped 1 line(s)"));
}

#[test]
fn test_invalid_project_config_fails() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".backlog/config.toml"),
        "[parser]\ndependency_separator = \"  \"\n",
    )
    .unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .write_stdin(BREAKDOWN)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project config"));
}

#[test]
fn test_verbose_reports_skipped_lines() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["--verbose", "parse"])
        .write_stdin("just chatter\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:parse] Skipped line 1"));
}

// =============================================================================
// Cache Tests
// =============================================================================

#[test]
fn test_cache_commands_need_project() {
    let dir = TempDir::new().unwrap();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["cache", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("backlog init"));
}

#[test]
fn test_cache_stats_empty() {
    let dir = setup_project();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["cache", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 0"));
}

#[test]
fn test_cache_clear_empty() {
    let dir = setup_project();

    backlog_cmd()
        .current_dir(dir.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 0 cached response(s)"));
}

// =============================================================================
// Pipeline Tests (shell-script plugins)
// =============================================================================

#[cfg(unix)]
mod pipeline {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const CONFIG: &str = r#"[services]
transcriber = "backlog-stub"
summarizer = "backlog-stub"
breakdown = "backlog-stub"
publisher = "backlog-stub"

[publish]
page_id = "42"
"#;

    const MANIFEST: &str = r#"{"name":"backlog-stub","version":"0.1.0","description":"Test stub","roles":["transcriber","summarizer","breakdown","publisher"],"operations":["transcribe","summarize","breakdown","publish","test"]}"#;

    const TRANSCRIBED: &str = r#"{"success":true,"data":{"text":"We need a login page and OAuth."}}"#;
    const SUMMARIZED: &str = r#"{"success":true,"data":{"text":"Build login, then OAuth."}}"#;
    const BROKEN_DOWN: &str = r#"{"success":true,"data":{"text":"Summary: Design login page, Issue Type: Task, Epic Name: Auth, Story Points: 3, Dependencies: \nSummary: Implement OAuth, Issue Type: Task, Epic Name: Auth, Story Points: 8, Dependencies: Design login page\nSummary: Auth, Issue Type: Epic, Epic Name: , Story Points: "}}"#;
    const PUBLISHED: &str = r#"{"success":true,"data":{"status":"updated","url":"https://wiki.example/42"}}"#;
    const TESTED: &str = r#"{"success":true,"data":{}}"#;

    /// Responses the stub gives, per operation
    struct Stub {
        transcribe: &'static str,
        summarize: &'static str,
        breakdown: &'static str,
        publish: &'static str,
    }

    impl Default for Stub {
        fn default() -> Self {
            Self {
                transcribe: TRANSCRIBED,
                summarize: SUMMARIZED,
                breakdown: BROKEN_DOWN,
                publish: PUBLISHED,
            }
        }
    }

    /// Project with `backlog-stub` bound to every stage and a recording
    fn setup_pipeline(stub: Stub) -> TempDir {
        let dir = setup_project();
        fs::write(dir.path().join(".backlog/config.toml"), CONFIG).unwrap();
        fs::write(dir.path().join("standup.mp3"), b"fake audio").unwrap();

        let calls = dir.path().join("calls.log");
        let script = format!(
            r#"#!/bin/sh
if [ "$1" = "--manifest" ]; then
  printf '%s\n' '{manifest}'
  exit 0
fi
read -r request
case "$request" in
  *'"operation":"transcribe"'*) echo transcribe >> '{calls}'; printf '%s\n' '{transcribe}' ;;
  *'"operation":"summarize"'*) echo summarize >> '{calls}'; printf '%s\n' '{summarize}' ;;
  *'"operation":"breakdown"'*) echo breakdown >> '{calls}'; printf '%s\n' '{breakdown}' ;;
  *'"operation":"publish"'*) echo publish >> '{calls}'; printf '%s\n' '{publish}' ;;
  *) printf '%s\n' '{tested}' ;;
esac
"#,
            manifest = MANIFEST,
            calls = calls.display(),
            transcribe = stub.transcribe,
            summarize = stub.summarize,
            breakdown = stub.breakdown,
            publish = stub.publish,
            tested = TESTED,
        );

        let path = dir.path().join(".backlog/plugins/backlog-stub");
        fs::write(&path, script).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();

        dir
    }

    fn calls(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_run_produces_records_and_artifacts() {
        let dir = setup_pipeline(Stub::default());

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Implement OAuth"))
            .stdout(predicate::str::contains("Parsed 3 record(s), skipped 0 line(s)"));

        let transcripts = dir.path().join(".backlog/transcripts");
        assert_eq!(
            fs::read_to_string(transcripts.join("standup.transcript.txt")).unwrap(),
            "We need a login page and OAuth."
        );
        assert_eq!(
            fs::read_to_string(transcripts.join("standup.summary.txt")).unwrap(),
            "Build login, then OAuth."
        );
        assert!(fs::read_to_string(transcripts.join("standup.breakdown.txt"))
            .unwrap()
            .starts_with("Summary: Design login page"));
        assert_eq!(calls(dir.path()), ["transcribe", "summarize", "breakdown"]);
    }

    #[test]
    fn test_run_json_output() {
        let dir = setup_pipeline(Stub::default());

        let output = backlog_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "run", "standup.mp3"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["records"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_run_uses_response_cache() {
        let dir = setup_pipeline(Stub::default());

        for _ in 0..2 {
            backlog_cmd()
                .current_dir(dir.path())
                .args(["run", "standup.mp3"])
                .assert()
                .success();
        }
        assert_eq!(calls(dir.path()), ["transcribe", "summarize", "breakdown"]);

        backlog_cmd()
            .current_dir(dir.path())
            .args(["cache", "stats"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Entries: 3"));

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3", "--no-cache"])
            .assert()
            .success();
        assert_eq!(calls(dir.path()).len(), 6);

        backlog_cmd()
            .current_dir(dir.path())
            .args(["cache", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 3 cached response(s)"));
    }

    #[test]
    fn test_run_from_transcript_skips_transcription() {
        let dir = setup_pipeline(Stub::default());
        fs::write(dir.path().join("notes.txt"), "typed meeting notes").unwrap();

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "--transcript", "notes.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Parsed 3 record(s)"));

        assert_eq!(calls(dir.path()), ["summarize", "breakdown"]);
    }

    #[test]
    fn test_run_service_failure() {
        let dir = setup_pipeline(Stub {
            summarize: r#"{"success":false,"error":"quota exceeded"}"#,
            ..Stub::default()
        });

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("summarization service failed"))
            .stderr(predicate::str::contains("quota exceeded"));

        assert!(dir
            .path()
            .join(".backlog/transcripts/standup.transcript.txt")
            .is_file());
        assert!(!dir
            .path()
            .join(".backlog/transcripts/standup.summary.txt")
            .exists());
    }

    #[test]
    fn test_run_unusable_breakdown() {
        let dir = setup_pipeline(Stub {
            breakdown: r#"{"success":true,"data":{"text":"Sorry, I could not find any tasks."}}"#,
            ..Stub::default()
        });

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No usable breakdown"))
            .stderr(predicate::str::contains("service failed").not());
    }

    #[test]
    fn test_run_without_configured_plugin() {
        let dir = setup_pipeline(Stub::default());
        fs::write(dir.path().join(".backlog/config.toml"), "").unwrap();

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("services.transcriber"));
    }

    #[test]
    fn test_run_publishes_summary() {
        let dir = setup_pipeline(Stub::default());

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3", "--publish", "--title", "Standup"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Published summary to https://wiki.example/42"));

        assert_eq!(
            calls(dir.path()),
            ["transcribe", "summarize", "breakdown", "publish"]
        );
    }

    #[test]
    fn test_run_publish_json_is_one_document() {
        let dir = setup_pipeline(Stub::default());

        let output = backlog_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "run", "standup.mp3", "--publish"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["report"]["records"].as_array().unwrap().len(), 3);
        assert_eq!(result["published"]["status"], "updated");
        assert_eq!(result["published"]["url"], "https://wiki.example/42");
    }

    #[test]
    fn test_publish_failure_json_keeps_report() {
        let dir = setup_pipeline(Stub {
            publish: r#"{"success":false,"error":"page locked"}"#,
            ..Stub::default()
        });

        let output = backlog_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "run", "standup.mp3", "--publish"])
            .output()
            .unwrap();
        assert!(!output.status.success());

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["records"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_publish_failure_keeps_records() {
        let dir = setup_pipeline(Stub {
            publish: r#"{"success":false,"error":"page locked"}"#,
            ..Stub::default()
        });

        backlog_cmd()
            .current_dir(dir.path())
            .args(["run", "standup.mp3", "--publish"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("Parsed 3 record(s)"))
            .stderr(predicate::str::contains("publishing failed"))
            .stderr(predicate::str::contains("page locked"));
    }

    #[test]
    fn test_plugin_list_shows_bindings() {
        let dir = setup_pipeline(Stub::default());

        let output = backlog_cmd()
            .current_dir(dir.path())
            .args(["--format", "json", "plugin", "list"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let plugins: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let stub = plugins
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["name"] == "backlog-stub")
            .unwrap();
        assert_eq!(
            stub["bound_to"],
            serde_json::json!(["transcribe", "summarize", "breakdown", "publish"])
        );
        assert_eq!(stub["roles"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_plugin_list_by_role() {
        let dir = setup_pipeline(Stub::default());

        backlog_cmd()
            .current_dir(dir.path())
            .args(["plugin", "list", "--role", "publisher"])
            .assert()
            .success()
            .stdout(predicate::str::contains("backlog-stub"));
    }

    #[test]
    fn test_plugin_test() {
        let dir = setup_pipeline(Stub::default());

        backlog_cmd()
            .current_dir(dir.path())
            .args(["plugin", "test", "backlog-stub"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Roles: transcribe, summarize, breakdown, publish"))
            .stdout(predicate::str::contains("is working correctly"));
    }

    #[test]
    fn test_plugin_test_unknown() {
        let dir = setup_project();

        backlog_cmd()
            .current_dir(dir.path())
            .args(["plugin", "test", "backlog-nope"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Plugin not found"));
    }
}
