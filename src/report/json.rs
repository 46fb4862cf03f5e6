use serde::Serialize;

use crate::model::profile::QcProfile;
use crate::report::{QcReport, ReportTable};

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    tool: &'a str,
    version: &'a str,
    input: &'a str,
    profile: &'a QcProfile,
    flagged_cells: usize,
    tables: [&'a ReportTable; 4],
}

pub fn render_report_json(
    report: &QcReport,
    profile: &QcProfile,
    input: &str,
) -> Result<String, serde_json::Error> {
    let doc = ReportDocument {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        input,
        profile,
        flagged_cells: report.flagged_count(),
        tables: report.tables(),
    };
    serde_json::to_string_pretty(&doc)
}
