//! Score coercion and canonical score formatting.
//!
//! Every non-identifier cell is read as a number. Cells that do not parse are
//! corrected to `0` and recorded in a [`CoercionReport`]; this is a data-quality
//! signal, never an error.

use serde::{Deserialize, Serialize};

use super::model::{FlatTable, RawCell};

// ---------------------------------------------------------------------------
// ScoreCell – the outcome of coercing one cell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreCell {
    Parsed(f64),
    /// The cell was empty or not a finite number; it counts as `0`.
    Defaulted,
}

impl ScoreCell {
    pub fn value(self) -> f64 {
        match self {
            ScoreCell::Parsed(v) => v,
            ScoreCell::Defaulted => 0.0,
        }
    }
}

/// Read a raw cell as a score.
pub fn coerce_cell(cell: &RawCell) -> ScoreCell {
    let parsed = match cell {
        RawCell::Empty => None,
        RawCell::Number(v) => Some(*v),
        RawCell::Text(s) => s.trim().parse::<f64>().ok(),
    };
    match parsed {
        Some(v) if v.is_finite() => ScoreCell::Parsed(v),
        _ => ScoreCell::Defaulted,
    }
}

/// Minimal decimal text for a score: `3.0 → "3"`, `3.50 → "3.5"`.
pub fn canonical_score(value: f64) -> String {
    if value == 0.0 {
        // Also folds -0.0.
        return "0".to_string();
    }
    let text = value.to_string();
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

// ---------------------------------------------------------------------------
// CoercionReport – side channel for defaulted cells
// ---------------------------------------------------------------------------

/// A score cell that was corrected to `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coercion {
    pub row: usize,
    pub column: String,
    /// The cell's original text (empty for blank cells).
    pub original: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoercionReport {
    pub cells: Vec<Coercion>,
}

impl CoercionReport {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of defaulted cells in one column.
    pub fn count_for(&self, column: &str) -> usize {
        self.cells.iter().filter(|c| c.column == column).count()
    }
}

// ---------------------------------------------------------------------------
// NormalizedTable
// ---------------------------------------------------------------------------

/// A flat table whose score columns hold only numbers.
///
/// `scores` is what filters compare against; `display` holds the canonical
/// text of the same values for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    /// All flat column names; index 0 is the identifier column.
    pub columns: Vec<String>,
    /// Identifier value per row.
    pub identifiers: Vec<String>,
    /// `scores[row][i]` is the value of score column `columns[i + 1]`.
    pub scores: Vec<Vec<f64>>,
    pub display: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn identifier_column(&self) -> &str {
        &self.columns[0]
    }

    pub fn score_columns(&self) -> &[String] {
        &self.columns[1..]
    }

    /// Position of a score column within each row of `scores`.
    pub fn score_index(&self, column: &str) -> Option<usize> {
        self.score_columns().iter().position(|c| c == column)
    }

    pub fn score(&self, row: usize, column: &str) -> Option<f64> {
        let idx = self.score_index(column)?;
        self.scores.get(row).and_then(|r| r.get(idx)).copied()
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// A table with only the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> NormalizedTable {
        NormalizedTable {
            columns: self.columns.clone(),
            identifiers: rows.iter().map(|&r| self.identifiers[r].clone()).collect(),
            scores: rows.iter().map(|&r| self.scores[r].clone()).collect(),
            display: rows.iter().map(|&r| self.display[r].clone()).collect(),
        }
    }

    /// Back to raw cells, with every score as a number.
    pub fn to_flat(&self) -> FlatTable {
        let rows = self
            .identifiers
            .iter()
            .zip(&self.scores)
            .map(|(id, scores)| {
                std::iter::once(RawCell::text(id.as_str()))
                    .chain(scores.iter().map(|&v| RawCell::Number(v)))
                    .collect()
            })
            .collect();
        FlatTable {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Coerce every score cell of a flat table.
///
/// Missing trailing cells in a short row count as empty.
pub fn normalize(table: &FlatTable) -> (NormalizedTable, CoercionReport) {
    let width = table.columns.len().saturating_sub(1);
    let mut report = CoercionReport::default();
    let mut identifiers = Vec::with_capacity(table.len());
    let mut scores = Vec::with_capacity(table.len());
    let mut display = Vec::with_capacity(table.len());

    for (row_no, row) in table.rows.iter().enumerate() {
        identifiers.push(row.first().map(ToString::to_string).unwrap_or_default());

        let mut row_scores = Vec::with_capacity(width);
        let mut row_display = Vec::with_capacity(width);
        for col in 0..width {
            let cell = row.get(col + 1).unwrap_or(&RawCell::Empty);
            let score = coerce_cell(cell);
            if score == ScoreCell::Defaulted {
                let column = &table.columns[col + 1];
                log::debug!("Row {row_no}, {column}: '{cell}' is not a score, using 0");
                report.cells.push(Coercion {
                    row: row_no,
                    column: column.clone(),
                    original: cell.to_string(),
                });
            }
            let value = score.value();
            row_scores.push(value);
            row_display.push(canonical_score(value));
        }
        scores.push(row_scores);
        display.push(row_display);
    }

    let normalized = NormalizedTable {
        columns: table.columns.clone(),
        identifiers,
        scores,
        display,
    };
    (normalized, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(rows: Vec<Vec<RawCell>>) -> FlatTable {
        FlatTable {
            columns: vec![
                "Name".to_string(),
                "Coding_Python".to_string(),
                "Coding_Go".to_string(),
            ],
            rows,
        }
    }

    #[test]
    fn test_coerce_cell() {
        assert_eq!(coerce_cell(&RawCell::Number(4.0)), ScoreCell::Parsed(4.0));
        assert_eq!(coerce_cell(&"3.50".into()), ScoreCell::Parsed(3.5));
        assert_eq!(coerce_cell(&" 2 ".into()), ScoreCell::Parsed(2.0));
        assert_eq!(coerce_cell(&"N/A".into()), ScoreCell::Defaulted);
        assert_eq!(coerce_cell(&RawCell::Empty), ScoreCell::Defaulted);
        assert_eq!(coerce_cell(&RawCell::Number(f64::NAN)), ScoreCell::Defaulted);
        assert_eq!(coerce_cell(&"inf".into()), ScoreCell::Defaulted);
    }

    #[test]
    fn test_canonical_score() {
        assert_eq!(canonical_score(3.0), "3");
        assert_eq!(canonical_score(3.50), "3.5");
        assert_eq!(canonical_score(3.0_f64.trunc()), "3");
        assert_eq!(canonical_score(0.25), "0.25");
        assert_eq!(canonical_score(-0.0), "0");
        assert_eq!(canonical_score(10.0), "10");
        assert_eq!(canonical_score(4.125), "4.125");
    }

    #[test]
    fn test_normalize_defaults_bad_cells() {
        let table = flat(vec![
            vec!["Alice".into(), RawCell::Number(4.0), "N/A".into()],
            vec!["Bob".into(), "3.50".into(), RawCell::Empty],
        ]);
        let (normalized, report) = normalize(&table);
        assert_eq!(normalized.identifiers, vec!["Alice", "Bob"]);
        assert_eq!(normalized.scores, vec![vec![4.0, 0.0], vec![3.5, 0.0]]);
        assert_eq!(normalized.display, vec![vec!["4", "0"], vec!["3.5", "0"]]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.count_for("Coding_Go"), 2);
        assert_eq!(
            report.cells[0],
            Coercion {
                row: 0,
                column: "Coding_Go".to_string(),
                original: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_pads_short_rows() {
        let table = flat(vec![vec!["Alice".into(), RawCell::Number(1.0)]]);
        let (normalized, report) = normalize(&table);
        assert_eq!(normalized.scores, vec![vec![1.0, 0.0]]);
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = flat(vec![
            vec!["Alice".into(), "4.0".into(), "oops".into()],
            vec!["Bob".into(), RawCell::Number(2.75), RawCell::Number(5.0)],
        ]);
        let (once, _) = normalize(&table);
        let (twice, report) = normalize(&once.to_flat());
        assert_eq!(once, twice);
        assert!(report.is_empty());
    }

    #[test]
    fn test_score_lookup_and_select_rows() {
        let table = flat(vec![
            vec!["Alice".into(), RawCell::Number(4.0), RawCell::Number(2.0)],
            vec!["Bob".into(), RawCell::Number(3.0), RawCell::Number(5.0)],
        ]);
        let (normalized, _) = normalize(&table);
        assert_eq!(normalized.score(1, "Coding_Go"), Some(5.0));
        assert_eq!(normalized.score(0, "Coding_Rust"), None);

        let picked = normalized.select_rows(&[1]);
        assert_eq!(picked.identifiers, vec!["Bob"]);
        assert_eq!(picked.columns, normalized.columns);
    }
}
