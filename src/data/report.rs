//! Display and export projections of a filtered table.

use serde::{Deserialize, Serialize};

use super::filter::{apply_filter, FilterSpec};
use super::header::subcategory_label;
use super::model::SkillMatrix;
use super::normalize::NormalizedTable;
use crate::color::{ScoreColor, ScoreColorizer};

// ---------------------------------------------------------------------------
// Display projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayCell {
    pub value: f64,
    /// Canonical text: no decimal point for whole scores.
    pub text: String,
    pub color: ScoreColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    /// 1-based position in the filtered result.
    pub index: usize,
    pub identifier: String,
    pub cells: Vec<DisplayCell>,
}

/// Identifier column plus the selected score columns, labelled by
/// subcategory only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub identifier_label: String,
    pub labels: Vec<String>,
    pub rows: Vec<DisplayRow>,
}

// ---------------------------------------------------------------------------
// Export projection
// ---------------------------------------------------------------------------

/// The same selection as [`DisplayTable`] under the original flat names, with
/// canonical values and no styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub display: DisplayTable,
    pub export: ExportTable,
}

/// Result of running a filter. Callers keep `Option<ReportOutcome>` so that
/// "not run yet" stays distinct from [`ReportOutcome::NoMatches`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportOutcome {
    NoMatches,
    Ready(Report),
}

impl ReportOutcome {
    pub fn report(&self) -> Option<&Report> {
        match self {
            ReportOutcome::Ready(report) => Some(report),
            ReportOutcome::NoMatches => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReportOutcome::NoMatches)
    }
}

/// Project a filtered table onto the identifier and `columns`.
///
/// `columns` are flat names in selection order; names missing from the table
/// are skipped.
pub fn assemble_report(
    filtered: &NormalizedTable,
    identifier_column: &str,
    columns: &[&str],
    colorizer: &ScoreColorizer,
) -> ReportOutcome {
    if filtered.is_empty() {
        return ReportOutcome::NoMatches;
    }

    let selected: Vec<(&str, usize)> = columns
        .iter()
        .filter_map(|&c| filtered.score_index(c).map(|idx| (c, idx)))
        .collect();

    let rows = filtered
        .identifiers
        .iter()
        .enumerate()
        .map(|(row, identifier)| DisplayRow {
            index: row + 1,
            identifier: identifier.clone(),
            cells: selected
                .iter()
                .map(|&(_, idx)| {
                    let value = filtered.scores[row][idx];
                    DisplayCell {
                        value,
                        text: filtered.display[row][idx].clone(),
                        color: colorizer.color_for(value),
                    }
                })
                .collect(),
        })
        .collect();

    let display = DisplayTable {
        identifier_label: identifier_column.to_string(),
        labels: selected
            .iter()
            .map(|&(c, _)| subcategory_label(c).to_string())
            .collect(),
        rows,
    };

    let export = ExportTable {
        columns: std::iter::once(identifier_column.to_string())
            .chain(selected.iter().map(|&(c, _)| c.to_string()))
            .collect(),
        rows: filtered
            .identifiers
            .iter()
            .enumerate()
            .map(|(row, identifier)| {
                std::iter::once(identifier.clone())
                    .chain(
                        selected
                            .iter()
                            .map(|&(_, idx)| filtered.display[row][idx].clone()),
                    )
                    .collect()
            })
            .collect(),
    };

    ReportOutcome::Ready(Report { display, export })
}

/// Filter `matrix` with `spec` and project the predicate columns.
pub fn build_report(
    matrix: &SkillMatrix,
    spec: &FilterSpec,
    colorizer: &ScoreColorizer,
) -> ReportOutcome {
    let filtered = apply_filter(&matrix.table, spec);
    assemble_report(
        &filtered,
        matrix.identifier_column(),
        &spec.columns(),
        colorizer,
    )
}
