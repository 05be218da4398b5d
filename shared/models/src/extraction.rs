//! Extraction result models.
//!
//! The extractor hands exactly one `ExtractionResult` per run to the
//! uploader. Ordered output from the tabular readers and the structured ODS
//! walk is kept apart from the unordered output of the ODS regex scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

use crate::identifier::Identifier;
use crate::record::RawRecord;

/// Report file formats understood by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Txt,
    Xls,
    Xlsx,
    Ods,
}

impl SourceFormat {
    /// Map a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Txt),
            "xls" => Some(Self::Xls),
            "xlsx" => Some(Self::Xlsx),
            "ods" => Some(Self::Ods),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
            Self::Ods => "ods",
        }
    }

    pub fn is_delimited(&self) -> bool {
        matches!(self, Self::Csv | Self::Txt)
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers produced by one extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "identifiers", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Ordered by first occurrence in the source
    Structured(Vec<Identifier>),
    /// Best-effort regex scan; no source order
    Heuristic(BTreeSet<Identifier>),
}

impl ExtractionOutcome {
    pub fn len(&self) -> usize {
        match self {
            Self::Structured(ids) => ids.len(),
            Self::Heuristic(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_heuristic(&self) -> bool {
        matches!(self, Self::Heuristic(_))
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &Identifier> + '_> {
        match self {
            Self::Structured(ids) => Box::new(ids.iter()),
            Self::Heuristic(ids) => Box::new(ids.iter()),
        }
    }

    pub fn to_vec(&self) -> Vec<Identifier> {
        self.iter().cloned().collect()
    }
}

/// Complete output of one extraction run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub run_id: Uuid,
    pub source: PathBuf,
    pub format: SourceFormat,
    pub outcome: ExtractionOutcome,
    /// Records the identifiers were taken from, kept for the backup snapshot
    pub records: Vec<RawRecord>,
    pub selected_column: Option<String>,
    pub warnings: Vec<String>,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    pub fn new(source: impl Into<PathBuf>, format: SourceFormat, outcome: ExtractionOutcome) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source: source.into(),
            format,
            outcome,
            records: Vec::new(),
            selected_column: None,
            warnings: Vec::new(),
            extracted_at: Utc::now(),
        }
    }

    pub fn count(&self) -> usize {
        self.outcome.len()
    }

    pub fn identifiers(&self) -> Vec<Identifier> {
        self.outcome.to_vec()
    }

    /// Identifiers as plain strings, in outcome order
    pub fn identifier_strings(&self) -> Vec<String> {
        self.outcome.iter().map(|id| id.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<Identifier> {
        values.iter().filter_map(|v| Identifier::parse(v)).collect()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("CSV"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_extension("xlsx"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_extension("Ods"), Some(SourceFormat::Ods));
        assert_eq!(SourceFormat::from_extension("pdf"), None);
        assert!(SourceFormat::Txt.is_delimited());
        assert!(!SourceFormat::Xls.is_delimited());
    }

    #[test]
    fn test_structured_outcome_keeps_order() {
        let outcome = ExtractionOutcome::Structured(ids(&["b2", "a1"]));
        assert_eq!(outcome.len(), 2);
        assert!(!outcome.is_heuristic());
        assert_eq!(outcome.to_vec(), ids(&["b2", "a1"]));
    }

    #[test]
    fn test_result_counts() {
        let outcome = ExtractionOutcome::Heuristic(ids(&["foo123", "bar456"]).into_iter().collect());
        let result = ExtractionResult::new("report.ods", SourceFormat::Ods, outcome);
        assert_eq!(result.count(), 2);
        assert!(result.outcome.is_heuristic());
        assert!(result.identifier_strings().contains(&"foo123".to_string()));
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = ExtractionOutcome::Structured(ids(&["A-1"]));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "structured");
        assert_eq!(json["identifiers"][0], "A-1");
    }
}
