use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};

use super::header::HeaderCell;
use super::model::{RawCell, RawTable};

/// Sheet read from workbooks unless configured otherwise.
pub const DEFAULT_SHEET: &str = "Employees sheet";

/// Extensions offered in the file picker and data-folder listing.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods", "csv"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl SourceFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "csv" => Ok(SourceFormat::Csv),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }
}

/// Load a skill sheet from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – the `sheet` worksheet (first sheet if absent)
/// * `.csv` – first two records are the category and subcategory header rows
pub fn load_file(path: &Path, sheet: &str) -> Result<RawTable> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    load_bytes(&bytes, SourceFormat::from_path(path)?, sheet)
}

/// Parse already-read file contents.
pub fn load_bytes(bytes: &[u8], format: SourceFormat, sheet: &str) -> Result<RawTable> {
    let grid = match format {
        SourceFormat::Workbook => read_workbook(bytes, sheet)?,
        SourceFormat::Csv => read_csv(bytes)?,
    };
    table_from_grid(grid)
}

/// Supported files directly inside `dir`, sorted by name.
pub fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("reading directory entry")?.path();
        if path.is_file() && SourceFormat::from_path(&path).is_ok() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook(bytes: &[u8], sheet: &str) -> Result<Vec<Vec<RawCell>>> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).context("opening workbook")?;

    let sheet_names = workbook.sheet_names().to_owned();
    let name = if sheet_names.iter().any(|s| s == sheet) {
        sheet.to_string()
    } else {
        let first = sheet_names
            .first()
            .cloned()
            .context("workbook has no sheets")?;
        log::warn!("Sheet '{sheet}' not found, reading '{first}' instead");
        first
    };

    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading worksheet {name}"))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect())
}

fn data_to_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::String(s) => RawCell::text(s.as_str()),
        Data::Error(e) => RawCell::Text(format!("{e:?}")),
        other => RawCell::text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<RawCell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        grid.push(record.iter().map(RawCell::text).collect());
    }
    Ok(grid)
}

// ---------------------------------------------------------------------------
// Grid → RawTable
// ---------------------------------------------------------------------------

fn header_text(cell: Option<&RawCell>) -> Option<String> {
    let text = cell?.to_string();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Split a cell grid into the two header rows and the data rows.
///
/// A blank category cell after the identifier column repeats the category to
/// its left, which is how merged header cells come out of spreadsheets.
/// Blank rows are dropped; data rows are padded or cut to the header width.
pub fn table_from_grid(grid: Vec<Vec<RawCell>>) -> Result<RawTable> {
    let mut rows = grid
        .into_iter()
        .filter(|row| row.iter().any(|c| !c.is_empty()));

    let (Some(top), Some(bottom)) = (rows.next(), rows.next()) else {
        bail!("expected two header rows (categories and subcategories)");
    };

    let width = top
        .iter()
        .rposition(|c| !c.is_empty())
        .max(bottom.iter().rposition(|c| !c.is_empty()))
        .map_or(0, |last| last + 1);

    let mut header = Vec::with_capacity(width);
    let mut category: Option<String> = None;
    for col in 0..width {
        let mut top_text = header_text(top.get(col));
        if col > 0 {
            match &top_text {
                Some(t) => category = Some(t.clone()),
                None => top_text = category.clone(),
            }
        }
        header.push(HeaderCell {
            top: top_text,
            bottom: header_text(bottom.get(col)),
        });
    }

    let data: Vec<Vec<RawCell>> = rows
        .map(|mut row| {
            row.resize(width, RawCell::Empty);
            row
        })
        .collect();

    log::debug!("Read {} columns, {} data rows", width, data.len());
    Ok(RawTable::new(header, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Name,Coding,,Soft Skills
,Python,Go,Communication
Alice,4,2,3.50
Bob,3,5,N/A
,,,
";

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SourceFormat::from_path(Path::new("team.XLSX")).unwrap(),
            SourceFormat::Workbook
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("team.csv")).unwrap(),
            SourceFormat::Csv
        );
        assert!(SourceFormat::from_path(Path::new("team.parquet")).is_err());
    }

    #[test]
    fn test_csv_two_row_header() {
        let table = load_bytes(SAMPLE_CSV.as_bytes(), SourceFormat::Csv, DEFAULT_SHEET).unwrap();
        assert_eq!(
            table.header,
            vec![
                HeaderCell::identifier("Name"),
                HeaderCell::new("Coding", "Python"),
                HeaderCell::new("Coding", "Go"),
                HeaderCell::new("Soft Skills", "Communication"),
            ]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][3], RawCell::Text("N/A".to_string()));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "Name,Coding\n,Python\nAlice\n";
        let table = load_bytes(csv.as_bytes(), SourceFormat::Csv, DEFAULT_SHEET).unwrap();
        assert_eq!(table.rows, vec![vec![RawCell::text("Alice"), RawCell::Empty]]);
    }

    #[test]
    fn test_missing_header_rows() {
        let err = load_bytes(b"Name,Coding\n", SourceFormat::Csv, DEFAULT_SHEET).unwrap_err();
        assert!(err.to_string().contains("two header rows"));
    }

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Int(4)), RawCell::Number(4.0));
        assert_eq!(data_to_cell(&Data::Float(3.5)), RawCell::Number(3.5));
        assert_eq!(data_to_cell(&Data::String(" ".to_string())), RawCell::Empty);
        assert_eq!(data_to_cell(&Data::Empty), RawCell::Empty);
    }

    /// An `.xlsx` with one worksheet per `(name, rows)`; numeric text is
    /// written as a number, blank text is left empty.
    fn workbook(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, text) in row.iter().enumerate() {
                    let (r, c) = (r as u32, c as u16);
                    if text.is_empty() {
                        continue;
                    }
                    match text.parse::<f64>() {
                        Ok(v) => worksheet.write_number(r, c, v).unwrap(),
                        Err(_) => worksheet.write_string(r, c, *text).unwrap(),
                    };
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    const SKILLS: &[&[&str]] = &[
        &["Name", "Coding", "", "Soft Skills"],
        &["", "Python", "Go", "Communication"],
        &["Alice", "4", "2", "3.5"],
        &["Bob", "3", "5", "N/A"],
    ];

    const NOTES: &[&[&str]] = &[
        &["Team", "Misc"],
        &["", "Notes"],
        &["Platform", "1"],
    ];

    #[test]
    fn test_workbook_reads_named_sheet() {
        let bytes = workbook(&[("Notes", NOTES), (DEFAULT_SHEET, SKILLS)]);
        let table = load_bytes(&bytes, SourceFormat::Workbook, DEFAULT_SHEET).unwrap();
        assert_eq!(
            table.header,
            vec![
                HeaderCell::identifier("Name"),
                HeaderCell::new("Coding", "Python"),
                HeaderCell::new("Coding", "Go"),
                HeaderCell::new("Soft Skills", "Communication"),
            ]
        );
        assert_eq!(
            table.rows,
            vec![
                vec![
                    RawCell::text("Alice"),
                    RawCell::Number(4.0),
                    RawCell::Number(2.0),
                    RawCell::Number(3.5),
                ],
                vec![
                    RawCell::text("Bob"),
                    RawCell::Number(3.0),
                    RawCell::Number(5.0),
                    RawCell::text("N/A"),
                ],
            ]
        );
    }

    #[test]
    fn test_workbook_without_named_sheet_reads_first() {
        let bytes = workbook(&[("Sheet1", SKILLS), ("Notes", NOTES)]);
        let table = load_bytes(&bytes, SourceFormat::Workbook, DEFAULT_SHEET).unwrap();
        assert_eq!(table.width(), 4);
        assert_eq!(table.rows[0][0], RawCell::text("Alice"));
    }

    #[test]
    fn test_load_file_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team.xlsx");
        std::fs::write(&path, workbook(&[(DEFAULT_SHEET, SKILLS)])).unwrap();
        let table = load_file(&path, DEFAULT_SHEET).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_list_data_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let files = list_data_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.xlsx"]);
    }

    #[test]
    fn test_load_file_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skills.csv");
        std::fs::write(&path, SAMPLE_CSV).unwrap();
        let table = load_file(&path, DEFAULT_SHEET).unwrap();
        assert_eq!(table.width(), 4);
    }
}
