use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::profile::QcProfile;
use crate::report::json::render_report_json;
use crate::report::text::render_summary_text;
use crate::report::{QcReport, ReportTable};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Stage6Input<'a> {
    pub report: &'a QcReport,
    pub profile: &'a QcProfile,
    pub input_label: String,
}

pub fn table_file_name(table: &ReportTable) -> String {
    format!("{}.tsv", table.name.to_ascii_lowercase().replace(' ', "_"))
}

pub fn write_reports(input: &Stage6Input<'_>, out_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    // serialize first so a failure leaves no partial output behind
    let json = render_report_json(input.report, input.profile, &input.input_label)?;
    let summary = render_summary_text(input.report, input.profile);

    fs::create_dir_all(out_dir).map_err(|source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for table in input.report.tables() {
        let path = out_dir.join(table_file_name(table));
        if table.is_empty() {
            tracing::info!(table = %table.name, "table has no rows; sheet omitted");
            remove_stale(&path)?;
            continue;
        }
        with_file(&path, |w| write_table_tsv(table, w))?;
        written.push(path);
    }

    let flags_path = out_dir.join("flags.tsv");
    with_file(&flags_path, |w| write_flags_tsv(input.report, w))?;
    written.push(flags_path);

    let json_path = out_dir.join("report.json");
    with_file(&json_path, |w| w.write_all(json.as_bytes()))?;
    written.push(json_path);

    let summary_path = out_dir.join("summary.txt");
    with_file(&summary_path, |w| w.write_all(summary.as_bytes()))?;
    written.push(summary_path);

    for path in &written {
        tracing::info!(path = %path.display(), "wrote report file");
    }
    Ok(written)
}

pub fn write_table_tsv<W: Write>(table: &ReportTable, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "{}", table.header.join("\t"))?;
    for row in &table.rows {
        let line = row
            .cells
            .iter()
            .map(|c| sanitize(&c.render()))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

/// One line per highlighted cell. `row` is 1-based below the header, as it
/// appears in the table's sheet.
pub fn write_flags_tsv<W: Write>(report: &QcReport, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "table\trow\tsample_id\tcolumn\tvalue\tcheck")?;
    for table in report.tables() {
        for flagged in table.flagged_cells() {
            let sample_id = table.rows[flagged.row]
                .cells
                .first()
                .map(|c| c.render())
                .unwrap_or_default();
            writeln!(
                w,
                "{}\t{}\t{}\t{}\t{}\t{}",
                flagged.table,
                flagged.row + 1,
                sanitize(&sample_id),
                flagged.column,
                flagged.cell.render(),
                flagged.check.name()
            )?;
        }
    }
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), ReportError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed stale sheet");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ReportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn sanitize(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

fn with_file<F>(path: &Path, f: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    f(&mut w).map_err(io_err)?;
    w.flush().map_err(io_err)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
