use super::*;

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

#[test]
fn test_mean() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[None, None]), None);
    assert_eq!(mean(&[Some(10.0), Some(20.0)]), Some(15.0));
    assert_eq!(mean(&[Some(10.0), None, Some(20.0)]), Some(15.0));
}

#[test]
fn test_rpd_requires_two_values() {
    assert_eq!(rpd(&[], Some(10.0)), None);
    assert_eq!(rpd(&[Some(5.0)], Some(10.0)), None);
    assert_eq!(rpd(&[Some(5.0), None], Some(10.0)), None);
    assert!(approx(rpd(&[Some(9.8), Some(10.2)], Some(10.0)), 4.0));
}

#[test]
fn test_rpd_uses_first_two_present_values() {
    let values = [None, Some(10.0), Some(12.0), Some(30.0)];
    assert!(approx(rpd(&values, Some(10.0)), 20.0));
}

#[test]
fn test_rpd_undefined_reference() {
    let values = [Some(1.0), Some(2.0)];
    assert_eq!(rpd(&values, None), None);
    assert_eq!(rpd(&values, Some(0.0)), None);
}

#[test]
fn test_percent_recovery() {
    assert!(approx(
        percent_recovery(&[Some(9.5), Some(10.5)], Some(10.0)),
        100.0
    ));
    assert_eq!(percent_recovery(&[], Some(10.0)), None);
    assert_eq!(percent_recovery(&[Some(1.0)], None), None);
    assert_eq!(percent_recovery(&[Some(1.0)], Some(0.0)), None);
}

#[test]
fn test_resolve_target() {
    let targets = [None, Some(0.5), Some(0.7)];
    assert_eq!(resolve_target(Some(10.0), &targets), Some(10.0));
    assert_eq!(resolve_target(None, &targets), Some(0.5));
    assert_eq!(resolve_target(None, &[None]), None);
}

#[test]
fn test_convert_units() {
    assert!(approx(convert_units(Some(120.1057), 12.01057), 10000.0));
    assert_eq!(convert_units(None, 12.01057), None);
    assert_eq!(convert_units(Some(1.0), 0.0), None);
}

#[test]
fn test_group_stats_duplicate_pair() {
    let a = record(Some(50.0), None);
    let b = record(Some(52.0), None);
    let stats = GroupStats::compute(&[&a, &b], None, 12.01057);
    assert!(approx(stats.mean, 51.0));
    assert!(approx(stats.rpd, 2.0 / 51.0 * 100.0));
    assert_eq!(stats.percent_recovery, None);
    assert!(approx(stats.converted, 51.0 * 1000.0 / 12.01057));
}

#[test]
fn test_group_stats_falls_back_to_record_target() {
    let a = record(Some(4.0), Some(5.0));
    let b = record(Some(6.0), None);
    let stats = GroupStats::compute(&[&a, &b], None, 12.01057);
    assert!(approx(stats.percent_recovery, 100.0));

    let overridden = GroupStats::compute(&[&a, &b], Some(10.0), 12.01057);
    assert!(approx(overridden.percent_recovery, 50.0));
}

#[test]
fn test_group_stats_all_absent() {
    let a = record(None, Some(5.0));
    let stats = GroupStats::compute(&[&a], None, 12.01057);
    assert_eq!(stats, GroupStats::default());
}

fn record(ppm: Option<f64>, target: Option<f64>) -> Record {
    Record {
        sample_id: "S".to_string(),
        sample_type: "Samples".to_string(),
        target_value: target,
        measured_value: ppm,
        secondary_value: None,
    }
}
