use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{MatrixError, Result};
use super::header::{flatten_header, CategoryIndex, HeaderCell};
use super::normalize::{normalize, CoercionReport, NormalizedTable};

// ---------------------------------------------------------------------------
// RawCell – a single cell as read from the source sheet
// ---------------------------------------------------------------------------

/// A cell value before any score coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// Build a cell from text, mapping blank strings to [`RawCell::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }
}

impl From<f64> for RawCell {
    fn from(v: f64) -> Self {
        RawCell::Number(v)
    }
}

impl From<i64> for RawCell {
    fn from(v: i64) -> Self {
        RawCell::Number(v as f64)
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> Self {
        RawCell::text(s)
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Number(v) => write!(f, "{v}"),
            RawCell::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the sheet as handed over by the loader
// ---------------------------------------------------------------------------

/// A table with a two-level header. Column 0 is the employee identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub header: Vec<HeaderCell>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Build a table, checking that every row has one cell per header column.
    pub fn new(header: Vec<HeaderCell>, rows: Vec<Vec<RawCell>>) -> Result<Self> {
        if header.is_empty() {
            return Err(MatrixError::EmptyHeader);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(MatrixError::RowWidth {
                    row: i,
                    expected: header.len(),
                    found: row.len(),
                });
            }
        }
        Ok(RawTable { header, rows })
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FlatTable – raw cells under flattened column names
// ---------------------------------------------------------------------------

/// The raw table after header flattening: unique flat names, raw cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    /// Flat column names; index 0 is the identifier column.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl FlatTable {
    pub fn identifier_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SkillMatrix – everything derived once per source file
// ---------------------------------------------------------------------------

/// The parsed, indexed and normalized form of one source sheet.
///
/// Built once per file and shared read-only by every filter evaluation.
#[derive(Debug, Clone)]
pub struct SkillMatrix {
    pub table: NormalizedTable,
    pub categories: CategoryIndex,
    pub coercions: CoercionReport,
}

impl SkillMatrix {
    /// Flatten the header, index categories and normalize all score cells.
    pub fn from_raw(raw: RawTable) -> Result<Self> {
        let flat = flatten_header(&raw.header)?;
        let table = FlatTable {
            columns: flat.names,
            rows: raw.rows,
        };
        let (table, coercions) = normalize(&table);
        if !coercions.is_empty() {
            log::warn!(
                "{} score cells could not be read as numbers and were set to 0",
                coercions.len()
            );
        }
        log::info!(
            "Skill matrix: {} employees, {} score columns, {} categories",
            table.len(),
            table.score_columns().len(),
            flat.categories.len()
        );
        Ok(SkillMatrix {
            table,
            categories: flat.categories,
            coercions,
        })
    }

    pub fn identifier_column(&self) -> &str {
        self.table.identifier_column()
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
