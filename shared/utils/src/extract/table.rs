/// In-memory table produced by the tabular readers; the first source row
/// becomes `headers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_rows<I>(mut rows: I) -> Self
    where
        I: Iterator<Item = Vec<String>>,
    {
        let headers = rows
            .next()
            .map(|h| h.into_iter().map(|c| c.trim().to_string()).collect())
            .unwrap_or_default();
        Self {
            headers,
            rows: rows.collect(),
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// True when there are no data rows, or every data cell is blank
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.trim().is_empty()))
    }
}
