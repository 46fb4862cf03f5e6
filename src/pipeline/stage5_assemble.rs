use crate::input::Record;
use crate::model::bounds::{CheckKind, recovery_check_for};
use crate::model::category::Category;
use crate::model::profile::QcProfile;
use crate::pipeline::stage2_classify::{Classified, is_calibration_type};
use crate::pipeline::stage3_group::{SampleGroup, group_by, sample_id_key};
use crate::pipeline::stage4_stats::{GroupStats, mean};
use crate::report::{
    CALIBRATION_TABLE, QC_TABLE, QcReport, REPORTED_RESULTS_TABLE, ReportCell, ReportTable,
    RowKind, SAMPLES_TABLE,
};

pub const CALIBRATION_COLUMNS: [&str; 5] = [
    "Sample ID",
    "Sample Type",
    "Mean (per analysis type)",
    "PPM",
    "Adjusted ABS",
];
pub const QC_COLUMNS: [&str; 6] = ["Sample ID", "Sample Type", "PPM", "Mean PPM", "%R", "RPD"];
pub const AVERAGE_LABEL: &str = "Average";
pub const SUMMARY_LABEL: &str = "Summary";
pub const BLANKS_LABEL: &str = "QCB/CCB";

#[derive(Debug, Clone)]
pub struct Stage5Inputs<'a> {
    pub records: &'a [Record],
    pub classified: &'a [Classified<'a>],
    pub profile: &'a QcProfile,
}

pub fn run_stage5(inputs: &Stage5Inputs<'_>) -> QcReport {
    let calibration = build_calibration_table(inputs.records);
    let qc = build_qc_table(inputs.classified, inputs.profile);
    let (samples, reported_results) = build_sample_tables(inputs.classified, inputs.profile);

    let report = QcReport {
        calibration,
        qc,
        samples,
        reported_results,
    };
    for table in report.tables() {
        tracing::info!(
            table = %table.name,
            rows = table.rows.len(),
            flagged = table.flagged_cells().count(),
            "assembled table"
        );
    }
    report
}

pub fn build_calibration_table(records: &[Record]) -> ReportTable {
    let mut rows = records
        .iter()
        .filter(|r| is_calibration_type(&r.sample_type))
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));

    let mut table = ReportTable::new(CALIBRATION_TABLE, &CALIBRATION_COLUMNS);
    for r in rows {
        table.push_row(
            RowKind::Detail,
            vec![
                ReportCell::text(&r.sample_id),
                ReportCell::text(&r.sample_type),
                ReportCell::number(r.target_value),
                ReportCell::number(r.measured_value),
                ReportCell::number(r.secondary_value),
            ],
        );
    }
    table
}

/// MDL, QCS, CCV1..n blocks with a summary row each; then QCB, CCB1..n
/// detail rows closed by one pooled average row.
pub fn build_qc_table(classified: &[Classified<'_>], profile: &QcProfile) -> ReportTable {
    let mut table = ReportTable::new(QC_TABLE, &QC_COLUMNS);

    let mut recovery = group_by(classified, |c| {
        c.category.is_recovery_control().then_some(c.category)
    });
    recovery.sort_by_key(|g| block_order(g.key));

    let mut blanks = group_by(classified, |c| {
        c.category.is_blank_control().then_some(c.category)
    });
    blanks.sort_by_key(|g| block_order(g.key));

    for group in &recovery {
        push_detail_rows(&mut table, group);

        let records = group.records.iter().map(|c| c.record).collect::<Vec<_>>();
        let stats = GroupStats::compute(
            &records,
            profile.recovery_target(group.key),
            profile.conversion_factor,
        );
        log_undefined(&group.key.label(), &stats);

        let label = group.key.label();
        let recovery_check = recovery_check_for(&label);
        table.push_row(
            RowKind::Summary,
            vec![
                ReportCell::text(label),
                ReportCell::text(SUMMARY_LABEL),
                ReportCell::empty(),
                ReportCell::number(stats.mean),
                ReportCell::checked(stats.percent_recovery, recovery_check, profile),
                ReportCell::checked(stats.rpd, CheckKind::DuplicatePrecision, profile),
            ],
        );
    }

    if !recovery.is_empty() && !blanks.is_empty() {
        table.push_row(RowKind::Separator, Vec::new());
    }

    if !blanks.is_empty() {
        let mut pooled = Vec::new();
        for group in &blanks {
            push_detail_rows(&mut table, group);
            pooled.extend(group.records.iter().map(|c| c.record.measured_value));
        }
        let average = mean(&pooled);
        if average.is_none() {
            tracing::warn!("no measured values among QCB/CCB blanks; average left empty");
        }
        table.push_row(
            RowKind::Average,
            vec![
                ReportCell::text(AVERAGE_LABEL),
                ReportCell::text(BLANKS_LABEL),
                ReportCell::empty(),
                ReportCell::number(average),
            ],
        );
    }

    table
}

pub fn sample_columns(unit: &str) -> Vec<String> {
    vec![
        "Sample ID".to_string(),
        "Sample Type".to_string(),
        "PPM".to_string(),
        "Mean PPM".to_string(),
        "RPD".to_string(),
        format!("Converted ({unit})"),
    ]
}

pub fn reported_columns(unit: &str) -> Vec<String> {
    vec!["Sample ID".to_string(), format!("Result ({unit})")]
}

pub fn build_sample_tables(
    classified: &[Classified<'_>],
    profile: &QcProfile,
) -> (ReportTable, ReportTable) {
    let sample_header = sample_columns(&profile.result_unit);
    let reported_header = reported_columns(&profile.result_unit);
    let mut samples = ReportTable::new(
        SAMPLES_TABLE,
        &sample_header.iter().map(String::as_str).collect::<Vec<_>>(),
    );
    let mut reported = ReportTable::new(
        REPORTED_RESULTS_TABLE,
        &reported_header.iter().map(String::as_str).collect::<Vec<_>>(),
    );

    let groups = group_by(classified, |c| {
        if c.category == Category::Sample {
            sample_id_key(&c.record.sample_id)
        } else {
            None
        }
    });
    tracing::info!(groups = groups.len(), "grouped field samples");

    for group in &groups {
        let records = group.records.iter().map(|c| c.record).collect::<Vec<_>>();
        let stats = GroupStats::compute(&records, None, profile.conversion_factor);
        log_undefined(&group.key, &stats);

        let last = records.len() - 1;
        for (i, r) in records.iter().enumerate() {
            let mut cells = vec![
                ReportCell::text(&r.sample_id),
                ReportCell::text(&r.sample_type),
                ReportCell::number(r.measured_value),
            ];
            if i == last {
                cells.push(ReportCell::number(stats.mean));
                cells.push(ReportCell::checked(
                    stats.rpd,
                    CheckKind::DuplicatePrecision,
                    profile,
                ));
                cells.push(ReportCell::number(stats.converted));
                samples.push_row(RowKind::Summary, cells);
            } else {
                samples.push_row(RowKind::Detail, cells);
            }
        }

        reported.push_row(
            RowKind::Detail,
            vec![
                ReportCell::text(&group.key),
                ReportCell::number(stats.converted),
            ],
        );
    }

    (samples, reported)
}

fn push_detail_rows(table: &mut ReportTable, group: &SampleGroup<Category, Classified<'_>>) {
    for c in &group.records {
        table.push_row(
            RowKind::Detail,
            vec![
                ReportCell::text(&c.record.sample_id),
                ReportCell::text(&c.record.sample_type),
                ReportCell::number(c.record.measured_value),
            ],
        );
    }
}

fn block_order(category: Category) -> (u8, u32) {
    match category {
        Category::Mdl => (0, 0),
        Category::Qcs => (1, 0),
        Category::Ccv(n) => (2, n),
        Category::Qcb => (3, 0),
        Category::Ccb(n) => (4, n),
        _ => (u8::MAX, 0),
    }
}

fn log_undefined(group: &str, stats: &GroupStats) {
    if stats.mean.is_none() {
        tracing::warn!(group, "no measured values; statistics left empty");
    } else if stats.rpd.is_none() {
        tracing::debug!(group, "fewer than two measurements; RPD left empty");
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_assemble.rs"]
mod tests;
