//! Group statistics. Every function is total: inputs that cannot support a
//! result yield `None`, which later renders as an empty cell.

use crate::input::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStats {
    pub mean: Option<f64>,
    pub rpd: Option<f64>,
    pub percent_recovery: Option<f64>,
    pub converted: Option<f64>,
}

impl GroupStats {
    /// `target_override` replaces the group's own target column when set.
    pub fn compute(records: &[&Record], target_override: Option<f64>, conversion_factor: f64) -> Self {
        let measured = records.iter().map(|r| r.measured_value).collect::<Vec<_>>();
        let targets = records.iter().map(|r| r.target_value).collect::<Vec<_>>();

        let mean = mean(&measured);
        let target = resolve_target(target_override, &targets);
        Self {
            mean,
            rpd: rpd(&measured, mean),
            percent_recovery: percent_recovery(&measured, target),
            converted: convert_units(mean, conversion_factor),
        }
    }
}

pub fn present(values: &[Option<f64>]) -> impl Iterator<Item = f64> + '_ {
    values.iter().flatten().copied()
}

pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in present(values) {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Relative percent difference of the first two present values, in
/// encounter order, against `reference_mean`.
pub fn rpd(values: &[Option<f64>], reference_mean: Option<f64>) -> Option<f64> {
    let reference = nonzero(reference_mean?)?;
    let mut it = present(values);
    let v1 = it.next()?;
    let v2 = it.next()?;
    Some((v1 - v2).abs() / reference * 100.0)
}

pub fn percent_recovery(values: &[Option<f64>], target: Option<f64>) -> Option<f64> {
    let target = nonzero(target?)?;
    let m = mean(values)?;
    Some(m / target * 100.0)
}

pub fn resolve_target(override_target: Option<f64>, targets: &[Option<f64>]) -> Option<f64> {
    override_target.or_else(|| present(targets).next())
}

/// PPM to µmol/L style conversion: `value * 1000 / conversion_factor`.
pub fn convert_units(value: Option<f64>, conversion_factor: f64) -> Option<f64> {
    let factor = nonzero(conversion_factor)?;
    Some(value? * 1000.0 / factor)
}

fn nonzero(v: f64) -> Option<f64> {
    if v == 0.0 || !v.is_finite() { None } else { Some(v) }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_stats.rs"]
mod tests;
