//! End-to-End Generation Tests for text2file
//!
//! Tests verify:
//! - Every available format round-trips through its own validator
//! - Per-extension failures never stop the rest of a batch
//! - File naming, duplicate extensions and no-clobber writes

use pretty_assertions::assert_eq;
use std::fs;

use chrono::{Local, TimeZone};
use text2file_cli::batch::generate_batch_at;
use text2file_spec::{FailureKind, Format, GenerateOptions, GenerationRequest, GenerationResult};
use text2file_tests::harness::{available_formats, TestHarness};

fn failure_kind(result: &GenerationResult) -> Option<FailureKind> {
    result.error.as_ref().map(|failure| failure.kind)
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_every_available_format_round_trips() {
    let harness = TestHarness::new();
    let formats = available_formats(&harness.registry);
    let extensions: Vec<&str> = formats.iter().map(|f| f.extension()).collect();

    let results = harness.generate("Name,Qty\nbolt,12\nnut,3", &extensions);
    assert_eq!(results.len(), formats.len());

    for (format, result) in formats.iter().zip(&results) {
        assert!(result.succeeded, "{format}: {:?}", result.error);
        assert!(result.path.exists(), "{format}: missing output");
        let validation = harness.validate(&result.path);
        assert!(validation.valid, "{format}: {:?}", validation.reason);

        let bytes = fs::read(&result.path).unwrap();
        assert_eq!(result.bytes, Some(bytes.len() as u64));
        assert_eq!(
            result.hash.as_deref(),
            Some(blake3::hash(&bytes).to_hex().as_str())
        );
    }
}

#[test]
fn test_control_characters_never_yield_invalid_files() {
    let harness = TestHarness::new();
    let formats = available_formats(&harness.registry);
    let extensions: Vec<&str> = formats.iter().map(|f| f.extension()).collect();

    let results = harness.generate("ding\u{7} done\u{1b}[0m", &extensions);
    for (format, result) in formats.iter().zip(&results) {
        if result.succeeded {
            let validation = harness.validate(&result.path);
            assert!(validation.valid, "{format}: {:?}", validation.reason);
        } else {
            assert_eq!(failure_kind(result), Some(FailureKind::InvalidOption), "{format}");
            assert!(!result.path.exists(), "{format}: failed item left a file");
        }
    }

    let txt = &results[formats.iter().position(|f| *f == Format::Txt).unwrap()];
    assert!(!txt.succeeded);
    let json = &results[formats.iter().position(|f| *f == Format::Json).unwrap()];
    assert!(json.succeeded);
}

#[test]
fn test_text_output_follows_newline_policy() {
    let harness = TestHarness::new();
    let results = harness.generate("line one\nline two", &["txt", "md", "py"]);
    for result in &results {
        assert_eq!(fs::read_to_string(&result.path).unwrap(), "line one\nline two\n");
    }

    let results = harness.generate("", &["txt"]);
    assert_eq!(fs::read(&results[0].path).unwrap(), b"");
}

#[test]
fn test_json_content_is_kept_or_wrapped() {
    let harness = TestHarness::new();
    let results = harness.generate("{\"a\": 1}", &["json"]);
    assert_eq!(fs::read_to_string(&results[0].path).unwrap(), "{\"a\": 1}\n");

    let results = harness.generate("plain words", &["json"]);
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&results[0].path).unwrap()).unwrap();
    assert_eq!(value["content"], "plain words");
}

#[test]
fn test_csv_pads_ragged_rows() {
    let harness = TestHarness::new();
    let results = harness.generate("A,B\n1,2\n3", &["csv"]);
    assert_eq!(fs::read_to_string(&results[0].path).unwrap(), "A,B\n1,2\n3,\n");
}

// ============================================================================
// Batch isolation
// ============================================================================

#[test]
fn test_one_failure_does_not_block_the_batch() {
    let harness = TestHarness::new();
    let results = harness.generate("Hello", &["txt", "unknownext", "md"]);

    assert_eq!(results.len(), 3);
    assert!(results[0].succeeded);
    assert!(!results[1].succeeded);
    assert!(results[2].succeeded);
    assert_eq!(failure_kind(&results[1]), Some(FailureKind::UnsupportedFormat));
    assert_eq!(harness.file_names().len(), 2);
}

#[test]
fn test_invalid_image_size_only_fails_image_items() {
    let harness = TestHarness::new();
    let options = GenerateOptions {
        width: Some(0),
        ..Default::default()
    };
    let results = harness.generate_with("Hello", &["png", "txt"], options);
    let expected = if harness.registry.resolve_generator("png").is_ok() {
        FailureKind::InvalidOption
    } else {
        FailureKind::MissingDependency
    };
    assert_eq!(failure_kind(&results[0]), Some(expected));
    assert!(results[1].succeeded);
}

#[test]
fn test_results_keep_request_order_and_tokens() {
    let harness = TestHarness::new();
    let results = harness.generate("x", &[".MD", "txt", "Text"]);
    let extensions: Vec<&str> = results.iter().map(|r| r.extension.as_str()).collect();
    assert_eq!(extensions, vec!["md", "txt", "text"]);
    assert!(results.iter().all(|r| r.succeeded));
}

// ============================================================================
// Naming and collisions
// ============================================================================

#[test]
fn test_duplicate_extensions_get_distinct_files() {
    let harness = TestHarness::new();
    let results = harness.generate("dup", &["txt", "txt", "TXT"]);
    assert!(results.iter().all(|r| r.succeeded));

    let names = harness.file_names();
    assert_eq!(names.len(), 3);
    let first = results[0].path.file_name().unwrap().to_string_lossy().into_owned();
    let stem = first.trim_end_matches(".txt");
    assert!(names.contains(&format!("{stem}_2.txt")));
    assert!(names.contains(&format!("{stem}_3.txt")));
}

#[test]
fn test_names_follow_prefix_and_timestamp() {
    let harness = TestHarness::new();
    let results = harness.generate("x", &["txt"]);
    let name = results[0].path.file_name().unwrap().to_string_lossy().into_owned();
    // generated_YYYYMMDD_HHMMSS_micros.txt
    let stamp = name
        .strip_prefix("generated_")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .unwrap();
    let parts: Vec<&str> = stamp.split('_').collect();
    assert_eq!(parts.len(), 3, "{name}");
    assert_eq!(parts[0].len(), 8);
    assert_eq!(parts[1].len(), 6);
    assert_eq!(parts[2].len(), 6);
    assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
}

#[test]
fn test_existing_files_are_never_overwritten() {
    let harness = TestHarness::new();
    let when = Local.with_ymd_and_hms(2026, 10, 18, 10, 15, 0).unwrap();

    let first = GenerationRequest::new("original", ["txt"], harness.path());
    let first = generate_batch_at(&harness.registry, &first, when).unwrap();
    assert!(first[0].succeeded);

    let second = GenerationRequest::new("replacement", ["txt"], harness.path());
    let second = generate_batch_at(&harness.registry, &second, when).unwrap();
    assert_eq!(second[0].path, first[0].path);
    assert_eq!(failure_kind(&second[0]), Some(FailureKind::WriteFailure));
    assert_eq!(fs::read_to_string(&first[0].path).unwrap(), "original\n");
    assert_eq!(harness.file_names().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_shell_scripts_are_executable() {
    use std::os::unix::fs::PermissionsExt;
    let harness = TestHarness::new();
    let results = harness.generate("echo hi", &["sh", "py"]);
    let mode = |r: &GenerationResult| fs::metadata(&r.path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&results[0]), 0o755);
    assert_eq!(mode(&results[1]), 0o644);
}

#[test]
fn test_archive_member_is_the_content() {
    let harness = TestHarness::new();
    if harness.registry.resolve_generator("zip").is_err() {
        return;
    }
    let results = harness.generate("packed text", &["zip"]);
    let validation = harness.validate(&results[0].path);
    assert_eq!(validation.detail.as_deref(), Some("zip, 1 member"));
    assert_eq!(Format::from_path(&results[0].path).map(|(_, f)| f), Some(Format::Zip));
}
