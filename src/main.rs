mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::{InputError, Record, load_records};
use crate::model::profile::{ProfileError, QcProfile, load_profile};
use crate::pipeline::stage2_classify::run_stage2;
use crate::pipeline::stage5_assemble::{Stage5Inputs, run_stage5};
use crate::pipeline::stage6_report::{ReportError, Stage6Input, write_reports};
use crate::report::QcReport;

#[derive(Parser, Debug)]
#[command(name = "kira-chemqc")]
#[command(about = "Analytical-chemistry batch QC: calibration, recovery, duplicate RPD and reported results")]
#[command(version)]
struct Cli {
    /// Debug-level logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the QC report for one tab-separated instrument export
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Instrument export (.tsv, optionally .gz)
    #[arg(long)]
    input: PathBuf,

    /// Output directory for the report files
    #[arg(long)]
    out: PathBuf,

    /// JSON QC profile; keys left out keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// 1-based row holding the column titles
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    header_row: u32,

    /// Use the historical 18 PPM QCS target
    #[arg(long)]
    legacy_qcs18: bool,

    /// Override the QCS recovery target (PPM)
    #[arg(long)]
    qcs_target: Option<f64>,

    /// Override the molar mass used for unit conversion (g/mol)
    #[arg(long)]
    conversion_factor: Option<f64>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("configuration error: {0}")]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match &cli.command {
        Command::Run(args) => run(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<(), RunError> {
    let profile = resolve_profile(args)?;
    tracing::info!(
        qcs_target = profile.qcs_target,
        conversion_factor = profile.conversion_factor,
        "using QC profile"
    );

    let batch = load_records(&args.input, args.header_row as usize)?;
    let report = build_report(&batch.records, &profile);

    let input = Stage6Input {
        report: &report,
        profile: &profile,
        input_label: args.input.display().to_string(),
    };
    let written = write_reports(&input, &args.out)?;
    tracing::info!(
        files = written.len(),
        flagged = report.flagged_count(),
        out = %args.out.display(),
        "report complete"
    );
    Ok(())
}

/// Preset or config file first, then individual CLI overrides.
fn resolve_profile(args: &RunArgs) -> Result<QcProfile, ProfileError> {
    let mut profile = match &args.config {
        Some(path) => load_profile(path)?,
        None => QcProfile::default_v1(),
    };
    if args.legacy_qcs18 {
        profile.qcs_target = QcProfile::legacy_qcs18().qcs_target;
    }
    if let Some(target) = args.qcs_target {
        profile.qcs_target = target;
    }
    if let Some(factor) = args.conversion_factor {
        profile.conversion_factor = factor;
    }
    profile.validate()?;
    Ok(profile)
}

fn build_report(records: &[Record], profile: &QcProfile) -> QcReport {
    let stage2 = run_stage2(records);
    run_stage5(&Stage5Inputs {
        records,
        classified: &stage2.classified,
        profile,
    })
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
