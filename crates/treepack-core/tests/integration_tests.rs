//! Integration tests for treepack-core.
//!
//! These tests drive the public pipeline end to end with real filesystem
//! workspaces.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::TimeZone;
use chrono::Utc;
use std::fs;
use tempfile::TempDir;
use treepack_core::FixedClock;
use treepack_core::PackConfig;
use treepack_core::PackError;
use treepack_core::PackOutcome;
use treepack_core::Workspace;
use treepack_core::archive::build_archive;
use treepack_core::materialize::materialize;
use treepack_core::pack_structure;
use treepack_core::structure::parse_structure;
use treepack_core::test_utils::read_zip_entries;
use treepack_core::test_utils::structure_json;

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 58).unwrap())
}

fn isolated_config() -> (TempDir, PackConfig) {
    let parent = TempDir::new().expect("failed to create temp dir");
    let config = PackConfig::default().with_workspace_parent(Some(parent.path().to_path_buf()));
    (parent, config)
}

fn residual_entries(parent: &TempDir) -> usize {
    fs::read_dir(parent.path()).unwrap().count()
}

#[test]
fn test_project_scaffold_roundtrip() {
    let (parent, config) = isolated_config();
    let files = [
        ("Cargo.toml", Some("[package]\nname = \"demo\"\n")),
        ("src/main.rs", Some("fn main() {\n    println!(\"hi\");\n}\n")),
        ("src/lib/mod.rs", None),
        ("README.md", Some("# Demo\n")),
        (".gitignore", Some("/target\n")),
    ];

    let result = pack_structure(&structure_json(&files), &config, &clock()).unwrap();

    assert_eq!(result.summary.total_files, files.len());
    let mut expected: Vec<(String, Vec<u8>)> = files
        .iter()
        .map(|(name, content)| {
            (
                (*name).to_string(),
                content.unwrap_or_default().as_bytes().to_vec(),
            )
        })
        .collect();
    expected.sort();
    assert_eq!(read_zip_entries(&result.archive.data), expected);
    assert_eq!(residual_entries(&parent), 0);
}

#[test]
fn test_result_metadata() {
    let (_parent, config) = isolated_config();
    let raw = structure_json(&[("b.txt", Some("b")), ("a.txt", None), ("b.txt", Some("again"))]);

    let result = pack_structure(&raw, &config, &clock()).unwrap();

    assert_eq!(result.summary.total_files, 2);
    assert_eq!(result.summary.created_files, vec!["b.txt", "a.txt"]);
    assert_eq!(result.summary.file_structure, vec!["b.txt", "a.txt", "b.txt"]);
    assert_eq!(result.summary.timestamp, "2025-06-30T23:59:58+00:00");
    assert_eq!(result.archive.filename, "created_files_20250630_235958.zip");
    assert_eq!(result.archive.mime_type, "application/zip");
}

#[test]
fn test_normalized_paths_collapse() {
    let (_parent, config) = isolated_config();
    let raw = structure_json(&[
        ("dir/a.txt", Some("one")),
        ("./dir//a.txt", Some("two")),
        ("dir\\a.txt", Some("three")),
    ]);

    let result = pack_structure(&raw, &config, &clock()).unwrap();

    assert_eq!(result.summary.total_files, 1);
    assert_eq!(
        read_zip_entries(&result.archive.data),
        vec![("dir/a.txt".to_string(), b"one".to_vec())]
    );
}

#[test]
fn test_archive_names_use_forward_slashes() {
    let (_parent, config) = isolated_config();
    let raw = structure_json(&[("a/b/c/d.txt", Some("deep"))]);

    let result = pack_structure(&raw, &config, &clock()).unwrap();

    let entries = read_zip_entries(&result.archive.data);
    assert_eq!(entries[0].0, "a/b/c/d.txt");
    assert!(!entries[0].0.contains('\\'));
}

#[test]
fn test_unsafe_paths_rejected_without_archive() {
    let (parent, config) = isolated_config();
    for name in ["../escape.txt", "/abs.txt", "ok/../../x.txt", "C:\\x.txt"] {
        let raw = structure_json(&[("fine.txt", Some("x")), (name, Some("payload"))]);
        let outcome = PackOutcome::from_result(pack_structure(&raw, &config, &clock()));

        match outcome {
            PackOutcome::Failure(report) => assert_eq!(report.error, "UnsafePath", "{name}"),
            PackOutcome::Success(_) => panic!("{name} should have been rejected"),
        }
    }
    assert_eq!(residual_entries(&parent), 0);
}

#[test]
fn test_malformed_input_leaves_no_workspace() {
    let (parent, config) = isolated_config();
    let cases = [
        ("this is not json", "InvalidInput"),
        ("", "InvalidInput"),
        ("[]", "InvalidInput"),
        (r#"{"nope": []}"#, "ParseError"),
        (r#"{"files": [{"content": "x"}]}"#, "ParseError"),
    ];

    for (raw, category) in cases {
        let err = pack_structure(raw, &config, &clock()).unwrap_err();
        assert_eq!(err.category(), category, "input {raw:?}");
    }
    assert_eq!(residual_entries(&parent), 0);
}

#[test]
fn test_write_failure_reports_cause() {
    let (parent, config) = isolated_config();
    let raw = structure_json(&[("a", Some("file")), ("a/b.txt", None)]);

    let err = pack_structure(&raw, &config, &clock()).unwrap_err();

    match &err {
        PackError::Write { path, .. } => assert!(path.ends_with("a")),
        other => panic!("expected Write error, got {other:?}"),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(residual_entries(&parent), 0);
}

#[test]
fn test_stages_compose_manually() {
    let config = PackConfig::default();
    let structure = parse_structure(
        &structure_json(&[("x/y.txt", Some("y")), ("x.txt", Some("x"))]),
        &config,
    )
    .unwrap();

    let workspace = Workspace::acquire(&config).unwrap();
    let created = materialize(&structure, &workspace).unwrap();
    let bytes = build_archive(workspace.root(), &created, &config).unwrap();
    let root = workspace.root().to_path_buf();
    workspace.close().unwrap();

    assert!(!root.exists());
    let names: Vec<String> = read_zip_entries(&bytes).into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["x.txt", "x/y.txt"]);
}

#[test]
fn test_concurrent_invocations_are_independent() {
    let (parent, config) = isolated_config();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let config = &config;
                scope.spawn(move || {
                    let name = format!("worker_{i}.txt");
                    let raw = structure_json(&[(name.as_str(), Some("data"))]);
                    pack_structure(&raw, config, &clock()).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap();
            assert_eq!(result.summary.created_files, vec![format!("worker_{i}.txt")]);
        }
    });

    assert_eq!(residual_entries(&parent), 0);
}

#[test]
fn test_stored_entries_match_deflated_content() {
    let (_parent, config) = isolated_config();
    let body = "abc".repeat(500);
    let raw = structure_json(&[("a.txt", Some(body.as_str()))]);

    let deflated = pack_structure(&raw, &config, &clock()).unwrap();
    let stored = pack_structure(&raw, &config.clone().with_stored_entries(), &clock()).unwrap();

    assert_eq!(
        read_zip_entries(&deflated.archive.data),
        read_zip_entries(&stored.archive.data)
    );
    assert!(deflated.archive.size() < stored.archive.size());
}
