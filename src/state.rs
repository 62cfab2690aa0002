use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use skill_matrix::color::ScoreColorizer;
use skill_matrix::data::cache::TableCache;
use skill_matrix::data::export;
use skill_matrix::data::filter::{
    CompositionMode, FilterSpec, FilterSpecBuilder, DEFAULT_MIN_SCORE,
};
use skill_matrix::data::header::{flat_column_name, CategoryIndex};
use skill_matrix::data::loader::list_data_files;
use skill_matrix::data::model::SkillMatrix;
use skill_matrix::data::report::{build_report, ReportOutcome};

pub const NO_FILE_MESSAGE: &str = "Please select a spreadsheet from the data folder.";
pub const EMPTY_SELECTION_MESSAGE: &str = concat!(
    "Please select at least one category, subcategory, and score filter ",
    "before generating the report!"
);
pub const NO_MATCH_MESSAGE: &str = "No matching records found!";

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Warning(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Selection: categories → subcategories → minimum scores
// ---------------------------------------------------------------------------

/// What the user has ticked in the side panel, in the order they ticked it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub categories: Vec<String>,
    pub subcategories: HashMap<String, Vec<String>>,
    /// Minimum score per flat column name.
    pub minimums: HashMap<String, u8>,
}

impl Selection {
    pub fn is_category_selected(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn toggle_category(&mut self, category: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category.to_string());
        }
    }

    pub fn is_subcategory_selected(&self, category: &str, subcategory: &str) -> bool {
        self.subcategories
            .get(category)
            .is_some_and(|subs| subs.iter().any(|s| s == subcategory))
    }

    pub fn toggle_subcategory(&mut self, category: &str, subcategory: &str) {
        let subs = self.subcategories.entry(category.to_string()).or_default();
        if let Some(pos) = subs.iter().position(|s| s == subcategory) {
            subs.remove(pos);
        } else {
            subs.push(subcategory.to_string());
        }
    }

    /// Slider value for a subcategory, created at the default on first use.
    pub fn minimum_mut(&mut self, category: &str, subcategory: &str) -> &mut u8 {
        self.minimums
            .entry(flat_column_name(category, subcategory))
            .or_insert(DEFAULT_MIN_SCORE)
    }

    /// Drop ticked categories and subcategories that `index` no longer has.
    pub fn retain_available(&mut self, index: &CategoryIndex) {
        self.categories.retain(|c| index.subcategories(c).is_some());
        self.subcategories.retain(|category, subs| {
            let Some(available) = index.subcategories(category) else {
                return false;
            };
            subs.retain(|s| available.contains(s));
            !subs.is_empty()
        });
    }

    /// Predicates for every ticked subcategory of every ticked category.
    pub fn filter_builder(&self, mode: CompositionMode) -> FilterSpecBuilder {
        let mut builder = FilterSpec::builder().mode(mode);
        for category in &self.categories {
            let Some(subs) = self.subcategories.get(category) else {
                continue;
            };
            for sub in subs {
                let minimum = self
                    .minimums
                    .get(&flat_column_name(category, sub))
                    .copied()
                    .unwrap_or(DEFAULT_MIN_SCORE);
                builder = builder.subcategory(category, sub, minimum);
            }
        }
        builder
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Folder listed in the file selector.
    pub data_dir: PathBuf,
    pub available_files: Vec<PathBuf>,
    pub selected_file: Option<PathBuf>,

    /// Parsed sheets, one entry per distinct file content.
    pub cache: TableCache,

    /// Sheet behind the current file (None until a file parses).
    pub matrix: Option<Arc<SkillMatrix>>,

    pub selection: Selection,
    pub mode: CompositionMode,

    /// Result of the last "Apply Filters"; None until it has been pressed.
    pub outcome: Option<ReportOutcome>,

    pub colorizer: ScoreColorizer,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, sheet: &str) -> Self {
        let mut state = Self {
            data_dir,
            available_files: Vec::new(),
            selected_file: None,
            cache: TableCache::new(sheet),
            matrix: None,
            selection: Selection::default(),
            mode: CompositionMode::default(),
            outcome: None,
            colorizer: ScoreColorizer::new(),
            status: None,
        };
        state.refresh_files();
        if let Some(first) = state.available_files.first().cloned() {
            state.select_file(first);
        }
        state
    }

    /// Re-scan the data folder.
    pub fn refresh_files(&mut self) {
        match list_data_files(&self.data_dir) {
            Ok(files) => {
                log::info!("{} skill sheets in {}", files.len(), self.data_dir.display());
                self.available_files = files;
                if self.available_files.is_empty() && self.matrix.is_none() {
                    self.status = Some(Status::Info(NO_FILE_MESSAGE.to_string()));
                }
            }
            Err(e) => {
                log::error!("Failed to list data folder: {e:#}");
                self.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }

    /// Load (or fetch from cache) a sheet and make it current.
    pub fn select_file(&mut self, path: PathBuf) {
        self.outcome = None;
        match self.cache.get_or_load(&path) {
            Ok(matrix) => {
                log::info!(
                    "Loaded {} employees with categories {:?}",
                    matrix.len(),
                    matrix.categories.categories().collect::<Vec<_>>()
                );
                self.selection.retain_available(&matrix.categories);
                self.status = (!matrix.coercions.is_empty()).then(|| {
                    Status::Info(format!(
                        "{} score cells were not numbers and count as 0",
                        matrix.coercions.len()
                    ))
                });
                self.matrix = Some(matrix);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.matrix = None;
                self.status = Some(Status::Error(format!("Cannot parse this file: {e:#}")));
            }
        }
        if !self.available_files.contains(&path) {
            self.available_files.push(path.clone());
        }
        self.selected_file = Some(path);
    }

    /// Build the filter from the current selection and run it.
    pub fn apply_filters(&mut self) {
        let Some(matrix) = &self.matrix else {
            self.status = Some(Status::Info(NO_FILE_MESSAGE.to_string()));
            return;
        };
        match self.selection.filter_builder(self.mode).build() {
            Ok(spec) => {
                let outcome = build_report(matrix, &spec, &self.colorizer);
                self.status = outcome
                    .is_empty()
                    .then(|| Status::Warning(NO_MATCH_MESSAGE.to_string()));
                self.outcome = Some(outcome);
            }
            Err(_) => {
                self.outcome = None;
                self.status = Some(Status::Warning(EMPTY_SELECTION_MESSAGE.to_string()));
            }
        }
    }

    /// Write the current report's export table to `path`.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let report = self
            .outcome
            .as_ref()
            .and_then(ReportOutcome::report)
            .context("no report to export")?;
        export::write_csv(&report.export, path)
    }
}
