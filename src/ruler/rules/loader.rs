//! Read pattern records from rule files.
//!
//! Supported layouts, chosen by file extension:
//! - `.jsonl`: one JSON record per line, blank lines ignored
//! - `.json`: a JSON array of records
//! - `.yml` / `.yaml`: a YAML sequence of records
//!
//! Any other extension is read as JSONL.

use crate::ruler::pattern::PatternSet;
use crate::ruler::rules::record::{PatternBody, PatternRecord};
use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const RULE_EXTENSIONS: &[&str] = &["jsonl", "json", "yml", "yaml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleFormat {
    JsonLines,
    Json,
    Yaml,
}

impl RuleFormat {
    fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => RuleFormat::Json,
            Some("yml") | Some("yaml") => RuleFormat::Yaml,
            _ => RuleFormat::JsonLines,
        }
    }
}

/// Parse JSONL content. Line numbers in errors are 1-based.
pub fn parse_jsonl_records(content: &str) -> Result<Vec<PatternRecord>> {
    let mut records = Vec::new();

    for (line_number, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: PatternRecord = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid pattern record on line {}", line_number + 1))?;
        records.push(record);
    }

    Ok(records)
}

pub fn parse_json_records(content: &str) -> Result<Vec<PatternRecord>> {
    serde_json::from_str(content).context("Expected a JSON array of pattern records")
}

pub fn parse_yaml_records(content: &str) -> Result<Vec<PatternRecord>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(content).context("Expected a YAML list of pattern records")
}

/// Load the pattern records of one rule file.
pub fn load_pattern_records(path: &Path) -> Result<Vec<PatternRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule file: {}", path.display()))?;

    let records = match RuleFormat::from_path(path) {
        RuleFormat::JsonLines => parse_jsonl_records(&content),
        RuleFormat::Json => parse_json_records(&content),
        RuleFormat::Yaml => parse_yaml_records(&content),
    }
    .with_context(|| format!("Failed to parse rule file: {}", path.display()))?;

    debug!("Read {} pattern records from {}", records.len(), path.display());
    Ok(records)
}

/// Load every rule file directly inside `dir`, in file-name order.
///
/// Files without a rule extension are skipped. A file that fails to parse
/// fails the whole load.
pub fn load_pattern_records_from_dir(dir: &Path) -> Result<Vec<PatternRecord>> {
    if !dir.is_dir() {
        return Err(anyhow!("Rules path is not a directory: {}", dir.display()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read rules directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_rule_file(path))
        .collect();
    paths.sort();

    let mut records = Vec::new();
    for path in &paths {
        records.extend(load_pattern_records(path)?);
    }

    Ok(records)
}

/// Load a rule file or a directory of rule files and compile it.
pub fn load_pattern_set(path: &Path) -> Result<PatternSet> {
    let records = if path.is_dir() {
        load_pattern_records_from_dir(path)?
    } else {
        load_pattern_records(path)?
    };

    validate_records(&records);

    let patterns = PatternSet::build(&records)
        .with_context(|| format!("Invalid pattern in {}", path.display()))?;

    info!(
        "Loaded {} patterns with {} labels from {}",
        patterns.len(),
        patterns.labels().len(),
        path.display()
    );

    Ok(patterns)
}

fn is_rule_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RULE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Warn about duplicate records. Duplicates are kept; they cannot change
/// the outcome of matching, only slow it down.
fn validate_records(records: &[PatternRecord]) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicate_count = 0;

    for record in records {
        let key = match &record.pattern {
            PatternBody::Phrase(phrase) => format!("{}\u{0}{}", record.label, phrase),
            PatternBody::Tokens(specs) => format!(
                "{}\u{0}{}",
                record.label,
                serde_json::to_string(specs).unwrap_or_default()
            ),
        };
        if !seen.insert(key) {
            duplicate_count += 1;
        }
    }

    if duplicate_count > 0 {
        warn!(
            "Found {} duplicate pattern record(s) during rule validation",
            duplicate_count
        );
    }
}
