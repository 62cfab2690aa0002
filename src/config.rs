//! Command-line configuration for the dashboard.

use std::path::PathBuf;

use clap::Parser;
use skill_matrix::data::loader::DEFAULT_SHEET;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skill-matrix",
    version,
    about = "Employee Skill Matrix - filter staff by minimum skill scores",
    long_about = "Browse a two-level skill spreadsheet (category / subcategory), filter \
                  employees by minimum scores and export the result as CSV."
)]
pub struct Cli {
    /// Folder scanned for skill sheets (.xlsx, .xlsm, .xls, .ods, .csv).
    #[arg(value_name = "DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Worksheet read from workbooks; the first sheet is used if it is missing.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// Log loads, cache hits and filter results (RUST_LOG still takes precedence).
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["skill-matrix"]);
        assert_eq!(cli.data_dir, PathBuf::from("."));
        assert_eq!(cli.sheet, "Employees sheet");
        assert_eq!(cli.default_log_level(), "warn");
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["skill-matrix", "data", "--sheet", "Team", "-v"]);
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.sheet, "Team");
        assert_eq!(cli.default_log_level(), "info");
    }
}
