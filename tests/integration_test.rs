use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn mindnotes_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mindnotes"));
    cmd.env_remove("MINDNOTES_LOG");
    cmd
}

fn run(tmp: &TempDir, args: &[&str]) -> std::process::Output {
    mindnotes_cmd()
        .current_dir(tmp.path())
        .args(args)
        .output()
        .unwrap()
}

fn init() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let output = run(&tmp, &["init"]);
    assert!(output.status.success());
    tmp
}

#[test]
fn test_init_creates_project_directory() {
    let tmp = init();

    assert!(tmp.path().join(".mindnotes").exists());
    assert!(tmp.path().join(".mindnotes/loro.db").exists());
    assert!(tmp.path().join(".mindnotes/config.yaml").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = init();

    let output = run(&tmp, &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_add_without_init_fails() {
    let tmp = TempDir::new().unwrap();

    let output = run(&tmp, &["add", "Ideas"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a mindnotes project"));
}

#[test]
fn test_add_and_get_note() {
    let tmp = init();

    let output = run(
        &tmp,
        &["add", "Ideas", "-c", "Explore graph rendering", "-t", "design, graphs"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Saved note 'Ideas'"));

    let output = run(&tmp, &["get", "Ideas", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Ideas");
    assert_eq!(json["content"], "Explore graph rendering");
    assert_eq!(json["tags"], serde_json::json!(["design", "graphs"]));
    assert_eq!(json["attachments"], serde_json::json!([]));
    assert!(json["createdAt"].as_str().unwrap().contains('T'));
}

#[test]
fn test_resave_reports_update() {
    let tmp = init();

    run(&tmp, &["add", "Ideas", "-c", "first"]);
    let output = run(&tmp, &["get", "Ideas", "--json"]);
    let first: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let output = run(&tmp, &["add", "Ideas", "-c", "second"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Updated note 'Ideas'"));

    let output = run(&tmp, &["list", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["content"], "second");
    assert_eq!(json[0]["createdAt"], first["createdAt"]);
}

#[test]
fn test_blank_title_is_rejected() {
    let tmp = init();

    let output = run(&tmp, &["add", "   ", "-c", "orphan"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Title is required"));

    let output = run(&tmp, &["list"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No notes found."));
}

#[test]
fn test_add_reads_stdin() {
    let tmp = init();

    let mut child = mindnotes_cmd()
        .current_dir(tmp.path())
        .args(["add", "Piped", "--stdin"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"  from a pipe  \n")
        .unwrap();
    assert!(child.wait_with_output().unwrap().status.success());

    let output = run(&tmp, &["get", "Piped", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["content"], "from a pipe");
}

#[test]
fn test_add_reads_piped_stdin_without_flag() {
    let tmp = init();

    let mut child = mindnotes_cmd()
        .current_dir(tmp.path())
        .args(["add", "Piped"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"from a pipe\n")
        .unwrap();
    assert!(child.wait_with_output().unwrap().status.success());

    let output = run(&tmp, &["get", "Piped", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["content"], "from a pipe");
}

#[test]
fn test_content_flag_wins_over_piped_stdin() {
    let tmp = init();

    let mut child = mindnotes_cmd()
        .current_dir(tmp.path())
        .args(["add", "Flagged", "-c", "from the flag"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    // The child never reads stdin and may already have exited.
    let _ = child.stdin.take().unwrap().write_all(b"ignored");
    assert!(child.wait_with_output().unwrap().status.success());

    let output = run(&tmp, &["get", "Flagged", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["content"], "from the flag");
}

#[test]
fn test_missing_attachment_is_rejected() {
    let tmp = init();

    let output = run(&tmp, &["add", "Ideas", "-a", "nope.png"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Attachment not found"));
}

#[test]
fn test_search_filters_cards() {
    let tmp = init();
    run(&tmp, &["add", "Ideas", "-c", "Explore graph rendering"]);
    run(&tmp, &["add", "Plan", "-c", "Ship the GRAPH view"]);
    run(&tmp, &["add", "Groceries", "-c", "milk"]);

    let output = run(&tmp, &["search", "graph"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ideas"));
    assert!(stdout.contains("Plan"));
    assert!(!stdout.contains("Groceries"));
    assert!(stdout.contains("Explore graph rendering..."));

    let output = run(&tmp, &["search", "zzz"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No notes match 'zzz'."));
}

#[test]
fn test_link_workflow() {
    let tmp = init();
    run(&tmp, &["add", "Ideas"]);
    run(&tmp, &["add", "Plan"]);

    let output = run(&tmp, &["link", "Ideas", "Plan"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Linked 'Ideas' -> 'Plan'"));

    let output = run(&tmp, &["link", "Ideas", "Plan"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("already exists"));

    let output = run(&tmp, &["links", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, serde_json::json!([{ "source": "Ideas", "target": "Plan" }]));
}

#[test]
fn test_self_link_is_rejected() {
    let tmp = init();
    run(&tmp, &["add", "Ideas"]);

    let output = run(&tmp, &["link", "Ideas", "Ideas"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Cannot link a note to itself!"));

    let output = run(&tmp, &["links"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No links found."));
}

#[test]
fn test_link_to_unknown_note_is_rejected() {
    let tmp = init();
    run(&tmp, &["add", "Ideas"]);

    let output = run(&tmp, &["link", "Ideas", "Ghost"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown note: Ghost"));
}

#[test]
fn test_titles_in_insertion_order() {
    let tmp = init();
    run(&tmp, &["add", "Zeta"]);
    run(&tmp, &["add", "Alpha"]);

    let output = run(&tmp, &["titles"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Zeta\nAlpha\n");
}

#[test]
fn test_graph_raw_description() {
    let tmp = init();
    run(&tmp, &["add", "A"]);
    run(&tmp, &["add", "B"]);
    run(&tmp, &["link", "A", "B"]);

    let output = run(&tmp, &["graph", "--raw"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "graph TD\n  A[\"A\"]\n  B[\"B\"]\n  A --> B\n"
    );
}

#[test]
fn test_graph_with_missing_renderer_falls_back() {
    let tmp = init();
    std::fs::write(
        tmp.path().join(".mindnotes/config.yaml"),
        "graph:\n  renderer: mermaid-cli\n  command: mindnotes-no-such-renderer\n",
    )
    .unwrap();
    run(&tmp, &["add", "My Idea"]);

    let output = run(&tmp, &["graph"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Mermaid Error:\ngraph TD"));
    assert!(stdout.contains("My_Idea[\"My Idea\"]"));
}

#[test]
fn test_snapshot_writes_markdown() {
    let tmp = init();
    run(&tmp, &["add", "Ideas", "-c", "Explore", "-t", "design"]);

    let output = run(&tmp, &["snapshot"]);

    assert!(output.status.success());
    let dir = tmp.path().join(".mindnotes/snapshot");
    assert!(dir.join("README.md").exists());
    assert!(dir.join("graph.mmd").exists());
    assert!(dir.join("notes/ideas.md").exists());
}

#[test]
fn test_remote_log_with_remote_disabled() {
    let tmp = init();

    let output = run(&tmp, &["remote-log"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Fetched 0 remote notes"));
}
