//! Error types for the skill-matrix core.

use thiserror::Error;

/// Structural failures of the skill-matrix core.
///
/// Bad score cells are not errors: they are corrected to `0` and recorded in a
/// [`CoercionReport`](super::normalize::CoercionReport). Filters that match no
/// rows are not errors either; see [`ReportOutcome`](super::report::ReportOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// The header has no columns at all, so there is no identifier column.
    #[error("header has no columns")]
    EmptyHeader,

    /// A score column's flat name cannot be split into category and subcategory.
    #[error("malformed header: column {position} ('{name}') has no category/subcategory separator")]
    MalformedHeader { position: usize, name: String },

    /// A data row does not have one cell per header column.
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A filter was requested without any predicates.
    #[error("filter has no predicates")]
    EmptyFilterSpec,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
