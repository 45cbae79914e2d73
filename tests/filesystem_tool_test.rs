use std::fs;
use std::sync::Arc;

use agentloop::tools::{register_filesystem_tools, FileSystemError, FileSystemTool};
use agentloop::ToolRegistry;
use serde_json::json;
use tempfile::TempDir;

fn fixture() -> (TempDir, FileSystemTool) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("invoice.txt"), "Invoice #42\nTotal: $100\n").unwrap();
    fs::write(
        temp_dir.path().join("notes.txt"),
        "line 1\nline 2\nline 3\nline 4\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("image.png"), "not text").unwrap();
    let tool = FileSystemTool::new(temp_dir.path());
    (temp_dir, tool)
}

#[test]
fn lists_only_txt_files_sorted_by_name() {
    let (_dir, tool) = fixture();
    let entries = tool.list_text_files(".").unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["invoice.txt", "notes.txt"]);
    assert!(entries.iter().all(|e| e.size > 0));
}

#[test]
fn read_file_head_truncates() {
    let (_dir, tool) = fixture();
    let head = tool.read_file_head("notes.txt", 2).unwrap();
    assert_eq!(head, "line 1\nline 2");

    // Asking for more lines than the file has returns the whole file.
    let all = tool.read_file_head("notes.txt", 100).unwrap();
    assert_eq!(all.lines().count(), 4);
}

#[test]
fn read_full_file_returns_everything() {
    let (_dir, tool) = fixture();
    let content = tool.read_full_file("invoice.txt").unwrap();
    assert_eq!(content, "Invoice #42\nTotal: $100\n");
}

#[test]
fn missing_file_is_not_found() {
    let (_dir, tool) = fixture();
    let err = tool.read_full_file("nope.txt").unwrap_err();
    assert_eq!(err, FileSystemError::NotFound("nope.txt".to_string()));
}

#[test]
fn create_directory_and_copy_file() {
    let (dir, tool) = fixture();
    tool.create_directory("invoice").unwrap();
    let copied = tool.copy_file("invoice.txt", "invoice").unwrap();
    assert_eq!(copied, "invoice.txt");

    let copy_path = dir.path().join("invoice").join("invoice.txt");
    assert_eq!(fs::read_to_string(copy_path).unwrap(), "Invoice #42\nTotal: $100\n");
}

#[test]
fn copy_into_missing_directory_fails() {
    let (_dir, tool) = fixture();
    let err = tool.copy_file("invoice.txt", "missing").unwrap_err();
    assert_eq!(err, FileSystemError::NotADirectory("missing".to_string()));
}

#[test]
fn traversal_is_rejected() {
    let (_dir, tool) = fixture();
    assert_eq!(
        tool.read_full_file("../etc/passwd").unwrap_err(),
        FileSystemError::PathTraversal("../etc/passwd".to_string())
    );
    assert_eq!(
        tool.read_full_file("/etc/passwd").unwrap_err(),
        FileSystemError::PathTraversal("/etc/passwd".to_string())
    );
    assert_eq!(
        tool.create_directory("ok/../../escape").unwrap_err(),
        FileSystemError::PathTraversal("ok/../../escape".to_string())
    );
}

#[tokio::test]
async fn registered_tools_answer_with_formatted_text() {
    let (_dir, tool) = fixture();
    let mut registry = ToolRegistry::new();
    register_filesystem_tools(&mut registry, Arc::new(tool));
    assert_eq!(registry.len(), 5);

    let listing = registry
        .execute("list_text_files", json!({}))
        .await
        .unwrap();
    assert!(listing.starts_with("Found 2 .txt files:"));
    assert!(listing.contains("invoice.txt"));
    assert!(listing.contains("notes.txt"));

    let head = registry
        .execute("read_file_head", json!({"filepath": "notes.txt", "lines": 2}))
        .await
        .unwrap();
    assert!(head.starts_with("First 2 lines of notes.txt:"));
    assert!(head.contains("line 2"));
    assert!(!head.contains("line 3"));

    let created = registry
        .execute("create_directory", json!({"directory": "note"}))
        .await
        .unwrap();
    assert_eq!(created, "Created directory: note");

    let copied = registry
        .execute("copy_file", json!({"source": "notes.txt", "destination": "note"}))
        .await
        .unwrap();
    assert_eq!(copied, "Copied notes.txt to note/");
}

#[tokio::test]
async fn registered_tool_failure_propagates_as_execution_error() {
    let (_dir, tool) = fixture();
    let mut registry = ToolRegistry::new();
    register_filesystem_tools(&mut registry, Arc::new(tool));

    let err = registry
        .execute("read_full_file", json!({"filepath": "../secret"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("read_full_file"));
    assert!(err.to_string().contains("sandbox"));
}
