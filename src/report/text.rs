use std::fmt::Write;

use crate::model::profile::QcProfile;
use crate::report::{QcReport, RowKind, format_f64_6};

pub fn render_summary_text(report: &QcReport, profile: &QcProfile) -> String {
    let mut out = String::new();

    out.push_str("Analytical QC Report\n");
    out.push_str("====================\n\n");

    out.push_str("1. Profile\n");
    let _ = writeln!(
        out,
        "Recovery targets: MDL={}, QCS={}, CCV={}",
        format_f64_6(profile.mdl_target),
        format_f64_6(profile.qcs_target),
        format_f64_6(profile.ccv_target)
    );
    let _ = writeln!(
        out,
        "QC recovery window: {}..{} %",
        profile.qc_recovery.min, profile.qc_recovery.max
    );
    let _ = writeln!(
        out,
        "MDL recovery window: {}..{} %",
        profile.mdl_recovery.min, profile.mdl_recovery.max
    );
    let _ = writeln!(out, "Max duplicate RPD: {} %", profile.duplicate_precision_max);
    let _ = writeln!(
        out,
        "Conversion: PPM * 1000 / {} -> {}\n",
        profile.conversion_factor, profile.result_unit
    );

    out.push_str("2. Tables\n");
    for table in report.tables() {
        let summaries = table
            .rows
            .iter()
            .filter(|r| matches!(r.kind, RowKind::Summary | RowKind::Average))
            .count();
        let _ = writeln!(
            out,
            "{}: {} row(s), {} summary row(s), {} flagged",
            table.name,
            table.rows.len(),
            summaries,
            table.flagged_cells().count()
        );
    }
    out.push('\n');

    out.push_str("3. Flagged values\n");
    let mut any = false;
    for table in report.tables() {
        for flagged in table.flagged_cells() {
            any = true;
            let id = table.rows[flagged.row]
                .cells
                .first()
                .map(|c| c.render())
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{} / {} / {}: {} ({})",
                flagged.table,
                id,
                flagged.column,
                flagged.cell.render(),
                flagged.check.name()
            );
        }
    }
    if !any {
        out.push_str("none\n");
    }

    out
}
