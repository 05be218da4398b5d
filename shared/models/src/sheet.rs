//! Spreadsheet upload payload.

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

pub const DEFAULT_RANGE: &str = "Arkusz1!A1";
pub const DEFAULT_LABEL: &str = "wyp";

/// Column layout of the uploaded table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SheetLayout {
    /// Header `["id"]`
    IdOnly,
    /// Header `["id", "custom_label_2"]`, every row carries the same label
    IdWithLabel { label: String },
}

impl SheetLayout {
    pub fn header(&self) -> Vec<String> {
        match self {
            Self::IdOnly => vec!["id".to_string()],
            Self::IdWithLabel { .. } => vec!["id".to_string(), "custom_label_2".to_string()],
        }
    }

    pub fn row(&self, id: &Identifier) -> Vec<String> {
        match self {
            Self::IdOnly => vec![id.to_string()],
            Self::IdWithLabel { label } => vec![id.to_string(), label.clone()],
        }
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::IdWithLabel {
            label: DEFAULT_LABEL.to_string(),
        }
    }
}

/// How the target range is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Overwrite the range starting at the anchor cell
    #[default]
    Overwrite,
    /// Clear the sheet range first, then write
    ClearThenWrite,
}

/// Table handed to a sheet writer; `values[0]` is the header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPayload {
    pub range: String,
    pub write_mode: WriteMode,
    pub values: Vec<Vec<String>>,
}

impl SheetPayload {
    pub fn build<'a, I>(ids: I, layout: &SheetLayout, range: impl Into<String>, write_mode: WriteMode) -> Self
    where
        I: IntoIterator<Item = &'a Identifier>,
    {
        let mut values = vec![layout.header()];
        values.extend(ids.into_iter().map(|id| layout.row(id)));

        Self {
            range: range.into(),
            write_mode,
            values,
        }
    }

    /// Number of data rows, header excluded
    pub fn row_count(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn cell_count(&self) -> usize {
        self.values.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_label() {
        let ids: Vec<Identifier> = ["119133-2097", "119140"]
            .iter()
            .filter_map(|v| Identifier::parse(v))
            .collect();
        let payload = SheetPayload::build(&ids, &SheetLayout::default(), DEFAULT_RANGE, WriteMode::Overwrite);

        assert_eq!(payload.values[0], vec!["id", "custom_label_2"]);
        assert_eq!(payload.values[1], vec!["119133-2097", "wyp"]);
        assert_eq!(payload.row_count(), 2);
        assert_eq!(payload.cell_count(), 6);
        assert_eq!(payload.range, "Arkusz1!A1");
    }

    #[test]
    fn test_payload_id_only() {
        let ids = vec![Identifier::parse("A-1").unwrap()];
        let payload = SheetPayload::build(&ids, &SheetLayout::IdOnly, "Sheet1!A1", WriteMode::ClearThenWrite);

        assert_eq!(payload.values, vec![vec!["id".to_string()], vec!["A-1".to_string()]]);
        assert_eq!(payload.write_mode, WriteMode::ClearThenWrite);
    }

    #[test]
    fn test_empty_payload_keeps_header() {
        let payload = SheetPayload::build(&Vec::new(), &SheetLayout::IdOnly, DEFAULT_RANGE, WriteMode::Overwrite);
        assert_eq!(payload.row_count(), 0);
        assert_eq!(payload.values.len(), 1);
    }
}
