//! Historical match ingestion from CSV files and spreadsheets.
//!
//! The header row must name `fuerza_rival, localia, pases, tiros, goles` (any order, extra
//! columns ignored). Fully blank rows are skipped; any other malformed cell is an error that
//! names its 1-based data row and column.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::Reader;
use tracing::{info, warn};

use crate::engine::sampler::{MAX_OPPONENT_STRENGTH, MIN_OPPONENT_STRENGTH};
use crate::engine::HistoricalRecord;
use crate::error::{Result, SimError};

pub const COLUMN_OPPONENT_STRENGTH: &str = "fuerza_rival";
pub const COLUMN_IS_HOME: &str = "localia";
pub const COLUMN_PASSES: &str = "pases";
pub const COLUMN_SHOTS: &str = "tiros";
pub const COLUMN_GOALS: &str = "goles";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_OPPONENT_STRENGTH,
    COLUMN_IS_HOME,
    COLUMN_PASSES,
    COLUMN_SHOTS,
    COLUMN_GOALS,
];

/// Load history from `.csv`, or from the first sheet of `.xlsx`/`.xlsm`/`.xls`/`.ods`.
pub fn load_history(path: impl AsRef<Path>) -> Result<Vec<HistoricalRecord>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let records = match extension.as_str() {
        "csv" => parse_history_csv(File::open(path)?)?,
        "xlsx" | "xlsm" | "xls" | "ods" => load_history_workbook(path)?,
        other => {
            return Err(SimError::Parse {
                path: path.display().to_string(),
                reason: format!(
                    "unsupported file extension '{other}' (expected csv, xlsx, xls or ods)"
                ),
            })
        }
    };

    info!(path = %path.display(), records = records.len(), "loaded match history");
    Ok(records)
}

pub fn parse_history_csv<R: Read>(reader: R) -> Result<Vec<HistoricalRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for row in reader.records() {
        rows.push(row?.iter().map(str::to_string).collect::<Vec<_>>());
    }
    records_from_rows(&header, rows)
}

fn load_history_workbook(path: &Path) -> Result<Vec<HistoricalRecord>> {
    let workbook_error = |reason: String| SimError::Workbook {
        path: path.display().to_string(),
        reason,
    };

    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| workbook_error("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_str).collect::<Vec<String>>());
    let header = rows.next().unwrap_or_default();
    records_from_rows(&header, rows)
}

fn cell_str(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.trim().to_string(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        other => format!("{other:?}"),
    }
}

/// Column positions resolved from the header, keyed by required column name.
fn resolve_columns(header: &[String]) -> Result<HashMap<&'static str, usize>> {
    let mut columns = HashMap::new();
    for name in REQUIRED_COLUMNS {
        if let Some(index) = header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
        {
            columns.insert(name, index);
        }
    }

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(*name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(SimError::MissingColumns { columns: missing });
    }
    Ok(columns)
}

fn records_from_rows<I>(header: &[String], rows: I) -> Result<Vec<HistoricalRecord>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let columns = resolve_columns(header)?;
    let mut records = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            warn!(row = row_number, "skipping blank history row");
            continue;
        }

        let number = |name: &str| parse_number(cell_value(&row, &columns, name), row_number, name);
        let non_negative = |name: &str| -> Result<f64> {
            let value = number(name)?;
            if value < 0.0 {
                return Err(invalid(row_number, name, format!("must not be negative, got {value}")));
            }
            Ok(value)
        };

        let opponent_strength = number(COLUMN_OPPONENT_STRENGTH)?;
        if !(MIN_OPPONENT_STRENGTH..=MAX_OPPONENT_STRENGTH).contains(&opponent_strength) {
            return Err(invalid(
                row_number,
                COLUMN_OPPONENT_STRENGTH,
                format!(
                    "must be between {MIN_OPPONENT_STRENGTH} and {MAX_OPPONENT_STRENGTH}, \
                     got {opponent_strength}"
                ),
            ));
        }

        let is_home = match number(COLUMN_IS_HOME)? {
            v if v == 1.0 => true,
            v if v == 0.0 => false,
            v => {
                return Err(invalid(row_number, COLUMN_IS_HOME, format!("must be 0 or 1, got {v}")))
            }
        };

        let passes = non_negative(COLUMN_PASSES)?;
        let shots = non_negative(COLUMN_SHOTS)?;
        let goals = non_negative(COLUMN_GOALS)?;
        if goals.fract() != 0.0 || goals > u32::MAX as f64 {
            return Err(invalid(
                row_number,
                COLUMN_GOALS,
                format!("must be a whole number, got {goals}"),
            ));
        }

        records.push(HistoricalRecord {
            opponent_strength,
            is_home,
            passes,
            shots,
            goals: goals as u32,
        });
    }

    Ok(records)
}

fn cell_value<'a>(
    row: &'a [String],
    columns: &HashMap<&'static str, usize>,
    name: &str,
) -> &'a str {
    columns
        .get(name)
        .and_then(|&index| row.get(index))
        .map(|s| s.trim())
        .unwrap_or("")
}

fn invalid(row: usize, field: &str, reason: impl Into<String>) -> SimError {
    SimError::InvalidRecord {
        row,
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_number(raw: &str, row: usize, field: &str) -> Result<f64> {
    if raw.is_empty() {
        return Err(invalid(row, field, "missing value"));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(row, field, format!("'{raw}' is not a number"))),
    }
}
