use serde::Serialize;

use crate::model::bounds::{CheckKind, flag_for};
use crate::model::profile::QcProfile;

pub mod json;
pub mod text;

pub const CALIBRATION_TABLE: &str = "Calibration";
pub const QC_TABLE: &str = "QC";
pub const SAMPLES_TABLE: &str = "Samples";
pub const REPORTED_RESULTS_TABLE: &str = "Reported Results";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCell {
    pub value: CellValue,
    /// Set when the value failed this check and must be highlighted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<CheckKind>,
}

impl ReportCell {
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            flag: None,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(s.into()),
            flag: None,
        }
    }

    pub fn number(v: Option<f64>) -> Self {
        match v {
            Some(v) => Self {
                value: CellValue::Number(v),
                flag: None,
            },
            None => Self::empty(),
        }
    }

    /// Number cell carrying the bounds-check result; undefined values stay
    /// empty and unchecked.
    pub fn checked(v: Option<f64>, check: CheckKind, profile: &QcProfile) -> Self {
        let mut cell = Self::number(v);
        if flag_for(v, check, profile) {
            cell.flag = Some(check);
        }
        cell
    }

    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }

    pub fn render(&self) -> String {
        match &self.value {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(v) => format_f64_6(*v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Detail,
    Summary,
    Separator,
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub kind: RowKind,
    pub cells: Vec<ReportCell>,
}

/// Rectangular grid with a fixed header. Summary rows are interleaved
/// with the detail rows they summarise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new(name: &str, header: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Short rows are padded with empty cells to the header width.
    pub fn push_row(&mut self, kind: RowKind, mut cells: Vec<ReportCell>) {
        debug_assert!(cells.len() <= self.header.len());
        cells.resize(self.header.len(), ReportCell::empty());
        self.rows.push(ReportRow { kind, cells });
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn flagged_cells(&self) -> impl Iterator<Item = FlaggedCell<'_>> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row, r)| {
            r.cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.flag.map(|check| FlaggedCell {
                    table: &self.name,
                    row,
                    column: &self.header[col],
                    cell,
                    check,
                })
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct FlaggedCell<'a> {
    pub table: &'a str,
    pub row: usize,
    pub column: &'a str,
    pub cell: &'a ReportCell,
    pub check: CheckKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcReport {
    pub calibration: ReportTable,
    pub qc: ReportTable,
    pub samples: ReportTable,
    pub reported_results: ReportTable,
}

impl QcReport {
    pub fn tables(&self) -> [&ReportTable; 4] {
        [
            &self.calibration,
            &self.qc,
            &self.samples,
            &self.reported_results,
        ]
    }

    pub fn flagged_count(&self) -> usize {
        self.tables().iter().map(|t| t.flagged_cells().count()).sum()
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
