use super::*;
use crate::report::CellValue;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_chemqc_main_test_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_args(extra: &[&str]) -> RunArgs {
    let mut argv = vec!["kira-chemqc", "run", "--input", "data.tsv", "--out", "out"];
    argv.extend_from_slice(extra);
    let cli = Cli::try_parse_from(argv).unwrap();
    match cli.command {
        Command::Run(args) => args,
    }
}

fn number(cell: &crate::report::ReportCell) -> Option<f64> {
    match cell.value {
        CellValue::Number(v) => Some(v),
        _ => None,
    }
}

#[test]
fn test_parse_args_defaults() {
    let args = run_args(&[]);
    assert_eq!(args.header_row, 1);
    assert!(args.config.is_none());
    assert_eq!(resolve_profile(&args).unwrap(), QcProfile::default_v1());
}

#[test]
fn test_header_row_zero_rejected() {
    let argv = ["kira-chemqc", "run", "--input", "a", "--out", "b", "--header-row", "0"];
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn test_profile_overrides() {
    let args = run_args(&["--legacy-qcs18", "--conversion-factor", "14.0067"]);
    let profile = resolve_profile(&args).unwrap();
    assert_eq!(profile.qcs_target, 18.0);
    assert_eq!(profile.conversion_factor, 14.0067);

    let args = run_args(&["--legacy-qcs18", "--qcs-target", "12.5"]);
    assert_eq!(resolve_profile(&args).unwrap().qcs_target, 12.5);
}

#[test]
fn test_profile_from_config_file() {
    let dir = make_temp_dir();
    let path = dir.join("profile.json");
    std::fs::write(&path, r#"{"mdl_target": 0.5}"#).unwrap();
    let args = run_args(&["--config", path.to_str().unwrap()]);
    let profile = resolve_profile(&args).unwrap();
    assert_eq!(profile.mdl_target, 0.5);
    assert_eq!(profile.qcs_target, 10.0);
}

#[test]
fn test_mdl_and_duplicate_scenario() {
    let records = vec![
        record("MDL", "", 0.18),
        record("MDL", "", 0.22),
        record("S1", "Samples", 50.0),
        record("S1", "Samples", 52.0),
    ];
    let report = build_report(&records, &QcProfile::default_v1());

    let qc = &report.qc;
    let mean_col = qc.column("Mean PPM").unwrap();
    let mdl_summary = &qc.rows[2];
    assert!((number(&mdl_summary.cells[mean_col]).unwrap() - 0.20).abs() < 1e-9);

    let samples = &report.samples;
    assert_eq!(samples.rows.len(), 2);
    let last = &samples.rows[1];
    let mean = number(&last.cells[samples.column("Mean PPM").unwrap()]).unwrap();
    let rpd = number(&last.cells[samples.column("RPD").unwrap()]).unwrap();
    assert!((mean - 51.0).abs() < 1e-9);
    assert!((rpd - 3.92).abs() < 0.005);
    assert!(number(&samples.rows[0].cells[samples.column("Mean PPM").unwrap()]).is_none());

    assert_eq!(report.reported_results.rows.len(), 1);
    assert!(report.calibration.is_empty());
}

#[test]
fn test_run_end_to_end() {
    let dir = make_temp_dir();
    let input = dir.join("batch.tsv");
    std::fs::write(
        &input,
        "Sample ID\tSample Type\tMean (per analysis type)\tPPM\tAdjusted ABS\n\
         Std 1\tCalibration\t1\t1.02\t0.05\n\
         MDL\t\t\t0.18\t\n\
         MDL\t\t\t0.22\t\n\
         S1\tSamples\t\t50\t\n\
         S1\tSamples\t\t52\t\n\
         \t\t\t\t\n",
    )
    .unwrap();
    let out = dir.join("out");
    let args = run_args(&[]);
    let args = RunArgs {
        input: input.clone(),
        out: out.clone(),
        ..args
    };

    run(&args).unwrap();
    for name in [
        "calibration.tsv",
        "qc.tsv",
        "samples.tsv",
        "reported_results.tsv",
        "flags.tsv",
        "report.json",
        "summary.txt",
    ] {
        assert!(out.join(name).exists(), "{name}");
    }
    let reported = std::fs::read_to_string(out.join("reported_results.tsv")).unwrap();
    assert!(reported.starts_with("Sample ID\tResult (µmol/L)\nS1\t"));
}

#[test]
fn test_run_missing_columns_writes_nothing() {
    let dir = make_temp_dir();
    let input = dir.join("bad.tsv");
    std::fs::write(&input, "Sample ID\tPPM\nS1\t1\n").unwrap();
    let out = dir.join("out");
    let args = RunArgs {
        input,
        out: out.clone(),
        ..run_args(&[])
    };

    let err = run(&args).unwrap_err();
    assert!(matches!(err, RunError::Input(InputError::MissingColumns(_))));
    assert!(err.to_string().contains("Adjusted ABS"));
    assert!(!out.exists());
}

fn record(id: &str, ty: &str, ppm: f64) -> Record {
    Record {
        sample_id: id.to_string(),
        sample_type: ty.to_string(),
        target_value: None,
        measured_value: Some(ppm),
        secondary_value: None,
    }
}
