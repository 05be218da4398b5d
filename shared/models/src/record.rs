use serde::{Deserialize, Serialize};

/// Location of a value inside the source report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    /// 0-based data row (header row excluded)
    pub row: usize,
    pub column: usize,
}

/// One raw cell or text fragment as read from the source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub text: String,
    pub position: CellPosition,
    pub column_name: Option<String>,
}

impl RawRecord {
    pub fn new(text: impl Into<String>, row: usize, column: usize) -> Self {
        Self {
            text: text.into(),
            position: CellPosition { row, column },
            column_name: None,
        }
    }

    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
