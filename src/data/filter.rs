use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{MatrixError, Result};
use super::header::flat_column_name;
use super::normalize::NormalizedTable;

/// Lowest minimum score a predicate can ask for.
pub const MIN_SCORE: u8 = 1;
/// Highest minimum score a predicate can ask for.
pub const MAX_SCORE: u8 = 5;
/// Minimum score preselected for a newly chosen subcategory.
pub const DEFAULT_MIN_SCORE: u8 = 3;

// ---------------------------------------------------------------------------
// Predicate: column ≥ minimum
// ---------------------------------------------------------------------------

/// A single `column >= minimum` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: String,
    pub minimum: u8,
}

impl Predicate {
    /// The minimum is clamped into `MIN_SCORE..=MAX_SCORE`.
    pub fn new(column: impl Into<String>, minimum: u8) -> Self {
        Predicate {
            column: column.into(),
            minimum: minimum.clamp(MIN_SCORE, MAX_SCORE),
        }
    }

    pub fn passes(&self, score: f64) -> bool {
        score >= f64::from(self.minimum)
    }
}

// ---------------------------------------------------------------------------
// Composition mode
// ---------------------------------------------------------------------------

/// How per-predicate results combine into a row decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompositionMode {
    /// Every predicate must pass.
    #[default]
    All,
    /// At least one predicate must pass.
    Any,
}

impl CompositionMode {
    pub const ALL_MODES: [CompositionMode; 2] = [CompositionMode::All, CompositionMode::Any];

    pub fn label(self) -> &'static str {
        match self {
            CompositionMode::All => "Match All Conditions",
            CompositionMode::Any => "Match At Least One",
        }
    }
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FilterSpec and its builder
// ---------------------------------------------------------------------------

/// An ordered, non-empty set of predicates plus a composition mode.
///
/// Only [`FilterSpecBuilder::build`] creates one, and it refuses an empty
/// predicate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
    mode: CompositionMode,
}

impl FilterSpec {
    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    /// Predicate columns in selection order.
    pub fn columns(&self) -> Vec<&str> {
        self.predicates.iter().map(|p| p.column.as_str()).collect()
    }
}

/// Collects predicates from the selection UI in one pass.
#[derive(Debug, Clone, Default)]
pub struct FilterSpecBuilder {
    predicates: Vec<Predicate>,
    mode: CompositionMode,
}

impl FilterSpecBuilder {
    pub fn mode(mut self, mode: CompositionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add `column >= minimum`. Adding a column again keeps its original
    /// position and takes the new minimum.
    pub fn predicate(mut self, column: impl Into<String>, minimum: u8) -> Self {
        let predicate = Predicate::new(column, minimum);
        match self
            .predicates
            .iter_mut()
            .find(|p| p.column == predicate.column)
        {
            Some(existing) => existing.minimum = predicate.minimum,
            None => self.predicates.push(predicate),
        }
        self
    }

    /// Add a predicate on the column for `category`/`subcategory`.
    pub fn subcategory(self, category: &str, subcategory: &str, minimum: u8) -> Self {
        self.predicate(flat_column_name(category, subcategory), minimum)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn build(self) -> Result<FilterSpec> {
        if self.predicates.is_empty() {
            return Err(MatrixError::EmptyFilterSpec);
        }
        Ok(FilterSpec {
            predicates: self.predicates,
            mode: self.mode,
        })
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return indices of rows that satisfy `spec`, in table order.
///
/// Predicates on columns the table does not have are ignored. When none of
/// the predicates refer to a present column, every row is kept.
pub fn matching_rows(table: &NormalizedTable, spec: &FilterSpec) -> Vec<usize> {
    let active: Vec<(usize, &Predicate)> = spec
        .predicates
        .iter()
        .filter_map(|p| match table.score_index(&p.column) {
            Some(idx) => Some((idx, p)),
            None => {
                log::debug!("Ignoring filter on missing column '{}'", p.column);
                None
            }
        })
        .collect();

    if active.is_empty() {
        return (0..table.len()).collect();
    }

    table
        .scores
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let mut results = active.iter().map(|(idx, p)| p.passes(row[*idx]));
            match spec.mode {
                CompositionMode::All => results.all(|ok| ok),
                CompositionMode::Any => results.any(|ok| ok),
            }
        })
        .map(|(i, _)| i)
        .collect()
}

/// Apply `spec` to `table`, keeping all columns and the original row order.
pub fn apply_filter(table: &NormalizedTable, spec: &FilterSpec) -> NormalizedTable {
    let rows = matching_rows(table, spec);
    log::info!(
        "Filter ({}, {} predicates) kept {} of {} rows",
        spec.mode,
        spec.predicates.len(),
        rows.len(),
        table.len()
    );
    table.select_rows(&rows)
}
