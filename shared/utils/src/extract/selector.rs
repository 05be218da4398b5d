//! Column selection and cell normalization.
//!
//! Shared by every tabular reader: pick the identifier column by header
//! keyword, then turn its cells into deduplicated identifiers.

use std::collections::HashSet;

use reportsync_models::{Identifier, RawRecord};

use super::table::Table;

/// Split `value` on the first separator from `separators` it contains.
///
/// Only that one separator type is used. Parts are trimmed and blank parts
/// dropped. A value with no separator comes back whole (trimmed).
pub fn split_on_first_separator<'a>(value: &'a str, separators: &[char]) -> Vec<&'a str> {
    match separators.iter().find(|sep| value.contains(**sep)) {
        Some(sep) => value
            .split(*sep)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
        None => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed]
            }
        }
    }
}

/// Insertion-ordered identifier set
#[derive(Debug, Default)]
pub struct OrderedIdentifiers {
    seen: HashSet<Identifier>,
    items: Vec<Identifier>,
}

impl OrderedIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value is blank or already present
    pub fn push(&mut self, raw: &str) -> bool {
        match Identifier::parse(raw) {
            Some(id) => self.insert(id),
            None => false,
        }
    }

    /// Like `push`, also adding the bare product id of a composite code when
    /// `expand_product_ids` is set
    pub fn push_expanded(&mut self, raw: &str, expand_product_ids: bool) -> bool {
        let Some(id) = Identifier::parse(raw) else {
            return false;
        };
        let product = if expand_product_ids && id.is_composite() {
            Identifier::parse(id.product_id())
        } else {
            None
        };
        let added = self.insert(id);
        if let Some(product) = product {
            self.insert(product);
        }
        added
    }

    pub fn insert(&mut self, id: Identifier) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.items.push(id);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Identifier> {
        self.items
    }
}

/// Column picked as identifier source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedColumn {
    pub index: usize,
    pub name: String,
    /// True when no header matched a keyword and the first column was used
    pub fallback: bool,
}

/// Output of running the selector over a table
#[derive(Debug)]
pub struct Selection {
    pub column: SelectedColumn,
    pub identifiers: Vec<Identifier>,
    pub records: Vec<RawRecord>,
}

/// Keyword-matched column selector
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    keywords: Vec<String>,
    separators: Vec<char>,
    expand_product_ids: bool,
}

impl ColumnSelector {
    pub fn new(keywords: &[String], separators: &[char]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.trim().to_lowercase()).collect(),
            separators: separators.to_vec(),
            expand_product_ids: false,
        }
    }

    /// Also emit the bare product id after each composite code
    pub fn with_product_ids(mut self, expand: bool) -> Self {
        self.expand_product_ids = expand;
        self
    }

    /// First header whose lowercased name contains any keyword, else the first column
    pub fn select_column(&self, headers: &[String]) -> Option<SelectedColumn> {
        let matched = headers.iter().position(|header| {
            let lowered = header.to_lowercase();
            self.keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && lowered.contains(keyword.as_str()))
        });

        match matched {
            Some(index) => Some(SelectedColumn {
                index,
                name: headers[index].clone(),
                fallback: false,
            }),
            None => headers.first().map(|name| SelectedColumn {
                index: 0,
                name: name.clone(),
                fallback: true,
            }),
        }
    }

    /// Select the identifier column and normalize its cells.
    ///
    /// Returns `None` for a table without columns.
    pub fn extract(&self, table: &Table) -> Option<Selection> {
        let column = self.select_column(&table.headers)?;
        if column.fallback {
            tracing::warn!(
                column = %column.name,
                "No identifier column matched {:?}, using first column",
                self.keywords
            );
        }

        let mut identifiers = OrderedIdentifiers::new();
        let mut records = Vec::new();

        for (row_idx, row) in table.rows.iter().enumerate() {
            let cell = match row.get(column.index) {
                Some(cell) if !cell.trim().is_empty() => cell,
                _ => continue,
            };
            records.push(RawRecord::new(cell.clone(), row_idx, column.index).with_column_name(&column.name));

            for part in split_on_first_separator(cell, &self.separators) {
                identifiers.push_expanded(part, self.expand_product_ids);
            }
        }

        Some(Selection {
            column,
            identifiers: identifiers.into_vec(),
            records,
        })
    }
}
