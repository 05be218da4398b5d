//! Workbook reader (XLS/XLSX, and ODS in column mode).

use calamine::{open_workbook_auto, DataType, Reader};
use std::path::Path;

use super::table::Table;
use crate::error::{ExtractionError, ExtractionOutput};

/// Read the first sheet of a workbook; the first row becomes the headers
pub fn read_spreadsheet(path: &Path) -> ExtractionOutput<Table> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ExtractionError::unreadable(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractionError::unreadable(path, "No sheets found in workbook"))?
        .map_err(|e| ExtractionError::unreadable(path, e))?;

    tracing::debug!(
        path = %path.display(),
        rows = range.height(),
        columns = range.width(),
        "Read first worksheet"
    );

    Ok(Table::from_rows(
        range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>()),
    ))
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
