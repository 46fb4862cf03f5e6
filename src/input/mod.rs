use std::path::Path;

use thiserror::Error;

pub mod sheet;
pub mod source;

use sheet::{ColumnMap, parse_sheet};
use source::open_maybe_gz;

pub const COL_SAMPLE_ID: &str = "Sample ID";
pub const COL_SAMPLE_TYPE: &str = "Sample Type";
pub const COL_TARGET: &str = "Mean (per analysis type)";
pub const COL_PPM: &str = "PPM";
pub const COL_ADJUSTED_ABS: &str = "Adjusted ABS";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_SAMPLE_ID,
    COL_SAMPLE_TYPE,
    COL_TARGET,
    COL_PPM,
    COL_ADJUSTED_ABS,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub sample_id: String,
    pub sample_type: String,
    /// Reference concentration for the analysis type.
    pub target_value: Option<f64>,
    pub measured_value: Option<f64>,
    /// Adjusted absorbance; carried through to the calibration listing only.
    pub secondary_value: Option<f64>,
}

impl Record {
    /// A row with no identifier and no numbers is spreadsheet padding.
    pub fn is_blank(&self) -> bool {
        self.sample_id.trim().is_empty()
            && self.target_value.is_none()
            && self.measured_value.is_none()
            && self.secondary_value.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_dropped_blank: usize,
}

#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub stats: LoadStats,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("configuration error: missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("input is empty: {0}")]
    Empty(String),
    #[error("configuration error: header row {row} is out of range (input has {available} row(s))")]
    HeaderRowOutOfRange { row: usize, available: usize },
}

pub fn load_records(path: &Path, header_row: usize) -> Result<RecordBatch, InputError> {
    let reader = open_maybe_gz(path)?;
    let sheet = parse_sheet(reader, header_row)?;
    if sheet.header.is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }

    let columns = ColumnMap::resolve(&sheet.header, &REQUIRED_COLUMNS)?;
    tracing::info!(
        path = %path.display(),
        header_row,
        columns = sheet.header.len(),
        "resolved required columns"
    );

    let batch = build_records(&sheet.rows, &columns);
    tracing::info!(
        rows_read = batch.stats.rows_read,
        records = batch.records.len(),
        dropped_blank = batch.stats.rows_dropped_blank,
        "loaded instrument records"
    );
    Ok(batch)
}

pub fn build_records(rows: &[Vec<String>], columns: &ColumnMap) -> RecordBatch {
    let mut records = Vec::with_capacity(rows.len());
    let mut stats = LoadStats::default();

    for row in rows {
        stats.rows_read += 1;
        let record = Record {
            sample_id: to_str(columns.get(row, COL_SAMPLE_ID)),
            sample_type: to_str(columns.get(row, COL_SAMPLE_TYPE)),
            target_value: to_float(columns.get(row, COL_TARGET)),
            measured_value: to_float(columns.get(row, COL_PPM)),
            secondary_value: to_float(columns.get(row, COL_ADJUSTED_ABS)),
        };
        if record.is_blank() {
            stats.rows_dropped_blank += 1;
            continue;
        }
        records.push(record);
    }

    RecordBatch { records, stats }
}

pub fn to_str(value: Option<&str>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Empty and unparseable cells are absent, never zero.
pub fn to_float(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
