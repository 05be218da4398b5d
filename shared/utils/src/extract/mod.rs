//! Report Extraction Module
//!
//! Multi-format reader turning vendor report exports into identifier lists.
//! Supports CSV/TXT, Excel (XLS/XLSX) and ODS.

pub mod delimited;
pub mod extractor;
pub mod format;
pub mod ods;
pub mod selector;
pub mod spreadsheet;
pub mod table;

pub use extractor::IdentifierExtractor;
pub use format::detect_format;
pub use ods::{OdsExtraction, OdsReader, StructuredParseError};
pub use selector::{split_on_first_separator, ColumnSelector, SelectedColumn};
pub use table::Table;
