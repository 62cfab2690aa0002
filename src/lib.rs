//! Employee skill matrix: two-level skill sheets, score filters and
//! color-coded reports.

pub mod color;
pub mod data;

pub use color::{ScoreColor, ScoreColorizer};
pub use data::error::{MatrixError, Result};
pub use data::filter::{apply_filter, CompositionMode, FilterSpec, FilterSpecBuilder, Predicate};
pub use data::header::{flatten_header, CategoryIndex, HeaderCell};
pub use data::model::{RawCell, RawTable, SkillMatrix};
pub use data::normalize::{normalize, NormalizedTable};
pub use data::report::{assemble_report, build_report, Report, ReportOutcome};
