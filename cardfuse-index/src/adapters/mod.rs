//! Source adapters
//!
//! One module per input source. Each adapter reads its file into typed rows
//! and turns those rows into a [`FusionPass`](crate::ledger::FusionPass):
//! a list of `(link hint, field updates)` partial records plus the linking
//! strategy the ledger should use for them.
//!
//! Readers here only fail on whole-file problems (unreadable file, broken
//! syntax). Row-level gaps degrade to empty values.

pub mod baitu_tiers;
pub mod catalog;
pub mod chen_overrides;
pub mod chen_tiers;
pub mod english_ratings;
pub mod export;
pub mod name_overlay;
pub mod spreadsheet;
pub mod stats;

use cardfuse_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Whether a missing source file aborts the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// Check that a source file exists
///
/// A missing required source is fatal. A missing optional source is logged
/// and yields `Ok(None)`, so that adapter simply contributes nothing.
pub fn locate(source_name: &str, path: &Path, requirement: Requirement) -> Result<Option<PathBuf>> {
    if path.is_file() {
        return Ok(Some(path.to_path_buf()));
    }

    match requirement {
        Requirement::Required => Err(Error::MissingInput {
            source_name: source_name.to_string(),
            path: path.to_path_buf(),
        }),
        Requirement::Optional => {
            warn!(
                source = source_name,
                path = %path.display(),
                "Optional source not found, skipping"
            );
            Ok(None)
        }
    }
}

/// Read a JSON array of objects
pub fn read_json_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::invalid_input(path, e))
}

/// Read a comma-separated file with one header row into typed rows
pub fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|e| Error::invalid_input(path, e))
}

/// Accept a string, number or boolean where a string is expected; null → empty
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_string")]
        no: String,
    }

    #[test]
    fn test_missing_optional_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let located = locate("rater", &dir.path().join("absent.json"), Requirement::Optional).unwrap();
        assert!(located.is_none());
    }

    #[test]
    fn test_missing_required_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = locate("catalog", &dir.path().join("absent.csv"), Requirement::Required);
        assert!(matches!(result, Err(Error::MissingInput { .. })));
    }

    #[test]
    fn test_lenient_string_accepts_numbers_and_null() {
        let rows: Vec<Row> = serde_json::from_str(r#"[{"no": 12}, {"no": null}, {}, {"no": "A001"}]"#).unwrap();
        let values: Vec<&str> = rows.iter().map(|r| r.no.as_str()).collect();
        assert_eq!(values, vec!["12", "", "", "A001"]);
    }

    #[test]
    fn test_broken_json_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();

        let result: Result<Vec<Row>> = read_json_rows(&path);
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }
}
