//! Tests for rule-file loading.
//!
//! Covers each supported file layout plus the error paths rule authors hit
//! most often: malformed lines, bad regexes and empty patterns.

use super::*;
use crate::ruler::{InvalidPatternError, PatternSet};
use std::fs;
use tempfile::tempdir;

const PROGLANG_JSONL: &str = r#"{"label": "PROGLANG", "pattern": [{"LOWER": "python"}]}
{"label": "PROGLANG", "pattern": [{"LOWER": "python"}, {"TEXT": {"REGEX": "(\\d+\\.?\\d*.?\\d*)"}}]}

{"label": "PROGLANG", "pattern": [{"LOWER": {"IN": ["node", "nodejs", "js", "javascript"]}}]}
"#;

#[test]
fn test_parse_jsonl_skips_blank_lines() {
    let records = parse_jsonl_records(PROGLANG_JSONL).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.label == "PROGLANG"));
}

#[test]
fn test_parse_jsonl_reports_line_number() {
    let content = "{\"label\": \"A\", \"pattern\": [{\"LOWER\": \"a\"}]}\n\n{not json}\n";
    let err = parse_jsonl_records(content).unwrap_err();
    assert!(err.to_string().contains("line 3"), "{err:#}");
}

#[test]
fn test_parse_json_array() {
    let content = r#"[
        {"label": "PROGLANG", "pattern": [{"LOWER": "rust"}]},
        {"label": "ORG", "pattern": "Mozilla Foundation", "id": "mozilla"}
    ]"#;
    let records = parse_json_records(content).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].id.as_deref(), Some("mozilla"));
    assert_eq!(records[1].pattern, PatternBody::Phrase("Mozilla Foundation".to_string()));
}

#[test]
fn test_parse_yaml_list() {
    let content = r#"
- label: PROGLANG
  pattern:
    - LOWER: go
- label: PROGLANG
  pattern:
    - LOWER:
        IN: [golang, go-lang]
- label: ORG
  pattern: Google LLC
"#;
    let records = parse_yaml_records(content).unwrap();
    assert_eq!(records.len(), 3);
    let set = PatternSet::build(&records).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.patterns()[2].len(), 2);
}

#[test]
fn test_parse_empty_yaml() {
    assert!(parse_yaml_records("  \n").unwrap().is_empty());
}

#[test]
fn test_load_pattern_set_from_jsonl_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("proglang.jsonl");
    fs::write(&path, PROGLANG_JSONL).unwrap();

    let set = load_pattern_set(&path).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.labels(), vec!["PROGLANG"]);
    assert_eq!(set.max_pattern_len(), 2);
}

#[test]
fn test_unknown_extension_reads_as_jsonl() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("patterns.txt");
    fs::write(&path, PROGLANG_JSONL).unwrap();

    assert_eq!(load_pattern_records(&path).unwrap().len(), 3);
}

#[test]
fn test_load_missing_file_names_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.jsonl");
    let err = load_pattern_records(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.jsonl"), "{err:#}");
}

#[test]
fn test_load_pattern_set_rejects_bad_regex() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    fs::write(
        &path,
        r#"{"label": "PROGLANG", "pattern": [{"LOWER": {"REGEX": "(py"}}]}"#,
    )
    .unwrap();

    let err = load_pattern_set(&path).unwrap_err();
    let pattern_err = err
        .downcast_ref::<InvalidPatternError>()
        .expect("root cause should be an InvalidPatternError");
    assert!(matches!(pattern_err, InvalidPatternError::InvalidRegex { .. }));
    assert!(format!("{err:#}").contains("bad.jsonl"));
}

#[test]
fn test_load_pattern_set_rejects_empty_pattern() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, r#"[{"label": "PROGLANG", "pattern": []}]"#).unwrap();

    let err = load_pattern_set(&path).unwrap_err();
    assert_eq!(
        err.downcast_ref::<InvalidPatternError>(),
        Some(&InvalidPatternError::EmptyPattern { record: 0 })
    );
}

#[test]
fn test_load_directory_in_file_name_order() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("b.jsonl"),
        r#"{"label": "SECOND", "pattern": [{"LOWER": "x"}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("a.yml"),
        "- label: FIRST\n  pattern:\n    - LOWER: x\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.md"), "not a rule file").unwrap();

    let records = load_pattern_records_from_dir(dir.path()).unwrap();
    let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["FIRST", "SECOND"]);

    let set = load_pattern_set(dir.path()).unwrap();
    assert_eq!(set.patterns()[0].label, "FIRST");
}

#[test]
fn test_load_directory_fails_on_bad_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{").unwrap();
    assert!(load_pattern_records_from_dir(dir.path()).is_err());
}

#[test]
fn test_duplicates_are_kept() {
    let content = r#"{"label": "PROGLANG", "pattern": [{"LOWER": "rust"}]}
{"label": "PROGLANG", "pattern": [{"LOWER": "rust"}]}"#;
    let dir = tempdir().unwrap();
    let path = dir.path().join("dupes.jsonl");
    fs::write(&path, content).unwrap();

    assert_eq!(load_pattern_set(&path).unwrap().len(), 2);
}
