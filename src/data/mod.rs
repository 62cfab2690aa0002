//! Data layer: core types, header flattening, normalization, filtering and
//! report assembly, plus the file loader and cache used by the dashboard.
//!
//! Architecture:
//! ```text
//!  .xlsx / .ods / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read sheet → RawTable (two header rows + cells)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  header   │  (category, subcategory) → unique flat names + CategoryIndex
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  cells → numeric scores + canonical text
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSpec (ALL / ANY of column ≥ minimum) → kept rows
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  report   │  display projection + export projection ──► export (CSV)
//!   └──────────┘
//! ```
//!
//! `cache` sits beside the pipeline and memoizes loader + model per file.

pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod header;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod report;
