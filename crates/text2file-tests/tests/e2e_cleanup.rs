//! End-to-End Cleanup Tests for text2file
//!
//! Tests verify:
//! - Invalid files are removed and valid ones kept
//! - Dry runs report the same removals without deleting
//! - Unknown extensions are never touched

use pretty_assertions::assert_eq;
use std::path::PathBuf;

use text2file_cli::cleanup::{run, CleanupOptions};
use text2file_tests::harness::TestHarness;

fn options(harness: &TestHarness, recursive: bool, dry_run: bool) -> CleanupOptions {
    CleanupOptions {
        root: harness.path().to_path_buf(),
        recursive,
        dry_run,
        ..Default::default()
    }
}

fn seed(harness: &TestHarness) -> (PathBuf, PathBuf, PathBuf, PathBuf) {
    let good = harness.write("good.csv", b"a,b\n1,2\n");
    let bad = harness.write("bad.csv", b"\"unterminated");
    let unknown = harness.write("image.webp", b"not checked");
    let nested_bad = harness.write("nested/bad.json", b"{");
    (good, bad, unknown, nested_bad)
}

#[test]
fn test_dry_run_matches_real_run() {
    let harness = TestHarness::new();
    let (good, bad, unknown, nested_bad) = seed(&harness);

    let preview = run(&harness.registry, &options(&harness, true, true)).unwrap();
    assert!(preview.dry_run);
    assert_eq!(preview.removed, vec![bad.clone(), nested_bad.clone()]);
    assert!(bad.exists() && nested_bad.exists());

    let real = run(&harness.registry, &options(&harness, true, false)).unwrap();
    assert_eq!(real.removed, preview.removed);
    assert!(!bad.exists());
    assert!(!nested_bad.exists());
    assert!(good.exists());
    assert!(unknown.exists());
    assert_eq!(real.skipped, vec![unknown]);
    assert!(real.failures.is_empty());
}

#[test]
fn test_non_recursive_leaves_subdirectories() {
    let harness = TestHarness::new();
    let (_, bad, _, nested_bad) = seed(&harness);

    let report = run(&harness.registry, &options(&harness, false, false)).unwrap();
    assert_eq!(report.removed, vec![bad]);
    assert!(nested_bad.exists());
}

#[test]
fn test_second_run_finds_nothing() {
    let harness = TestHarness::new();
    seed(&harness);
    run(&harness.registry, &options(&harness, true, false)).unwrap();
    let again = run(&harness.registry, &options(&harness, true, false)).unwrap();
    assert!(again.removed.is_empty());
    assert_eq!(again.inspected.len(), 1);
}

#[test]
fn test_generated_files_survive_cleanup() {
    let harness = TestHarness::new();
    let results = harness.generate("keep me", &["txt", "json", "xml", "yaml", "csv"]);
    assert!(results.iter().all(|r| r.succeeded));

    let report = run(&harness.registry, &options(&harness, false, false)).unwrap();
    assert!(report.removed.is_empty());
    assert_eq!(report.inspected.len(), 5);
    assert_eq!(harness.file_names().len(), 5);
}

#[test]
fn test_report_serializes() {
    let harness = TestHarness::new();
    seed(&harness);
    let report = run(&harness.registry, &options(&harness, false, true)).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["removed"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["skipped"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_files_over_the_size_limit_are_kept() {
    let harness = TestHarness::new();
    let big = harness.write("big.txt", "a".repeat(8192));
    let bad = harness.write("bad.csv", b"\"unterminated");

    let report = run(
        &harness.registry,
        &CleanupOptions {
            max_file_bytes: 4096,
            ..options(&harness, false, false)
        },
    )
    .unwrap();
    assert_eq!(report.removed, vec![bad]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, big);
    assert!(big.exists());
}
