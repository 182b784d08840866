use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn test_root(name: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("json-shelf-cli-{name}-{nonce}"))
}

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_jsonshelf"))
}

fn write_tasks(root: &Path, count: usize) {
    let items: Vec<String> = (1..=count)
        .map(|i| format!(r#"{{"id": {i}, "title": "task {i}"}}"#))
        .collect();
    fs::write(root.join("tasks.json"), format!("[{}]", items.join(","))).expect("write tasks");
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .expect("run cli")
}

#[test]
fn cli_reports_thirty_records_for_default_registry() {
    let root = test_root("tasks");
    fs::create_dir_all(&root).expect("create root");
    write_tasks(&root, 30);

    let output = run(&["--cli", "--base", root.to_string_lossy().as_ref()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("tasks.json"));
    assert!(lines[0].contains("30 records"));
    assert!(lines[0].contains("Array"));
    assert_eq!(lines[1], "Files: 1 | Records: 30");
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_prints_no_results_for_unmatched_query() {
    let root = test_root("nomatch");
    fs::create_dir_all(&root).expect("create root");
    write_tasks(&root, 3);

    let output = run(&[
        "--cli",
        "--base",
        root.to_string_lossy().as_ref(),
        "xyz-nomatch",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("No results"));
    assert!(stdout.contains("Files: 1 | Records: 3"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_query_is_matched_verbatim() {
    let root = test_root("verbatim");
    fs::create_dir_all(&root).expect("create root");
    write_tasks(&root, 3);

    let base = root.to_string_lossy();
    let padded = run(&["--cli", "--base", base.as_ref(), " tasks"]);
    let inner = run(&["--cli", "--base", base.as_ref(), "de tareas"]);

    assert!(padded.status.success());
    assert!(String::from_utf8_lossy(&padded.stdout).starts_with("No results"));
    assert!(inner.status.success());
    assert!(String::from_utf8_lossy(&inner.stdout).contains("tasks.json"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_skips_files_that_fail_to_load() {
    let root = test_root("partial");
    fs::create_dir_all(&root).expect("create root");
    write_tasks(&root, 4);
    let registry = root.join("registry.json");
    fs::write(
        &registry,
        r#"[{"name": "absent.json"}, {"name": "tasks.json", "description": "tareas"}]"#,
    )
    .expect("write registry");

    let output = run(&[
        "--cli",
        "--base",
        root.to_string_lossy().as_ref(),
        "--registry",
        registry.to_string_lossy().as_ref(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("absent.json"));
    assert!(stdout.contains("Files: 1 | Records: 4"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn export_html_escapes_descriptions() {
    let root = test_root("html");
    fs::create_dir_all(&root).expect("create root");
    write_tasks(&root, 2);
    let registry = root.join("registry.json");
    fs::write(
        &registry,
        r#"[{"name": "tasks.json", "description": "<script>alert(1)</script>"}]"#,
    )
    .expect("write registry");
    let page = root.join("grid.html");

    let output = run(&[
        "--base",
        root.to_string_lossy().as_ref(),
        "--registry",
        registry.to_string_lossy().as_ref(),
        "--export-html",
        page.to_string_lossy().as_ref(),
    ]);

    assert!(output.status.success());
    let html = fs::read_to_string(&page).expect("read page");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
    let _ = fs::remove_dir_all(&root);
}

#[test]
fn cli_returns_non_zero_when_registry_is_missing() {
    let missing = test_root("missing").join("registry.json");

    let output = run(&[
        "--cli",
        "--registry",
        missing.to_string_lossy().as_ref(),
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read registry"));
}
