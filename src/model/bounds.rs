use serde::Serialize;

use crate::model::category::normalize_id;
use crate::model::profile::QcProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckKind {
    QcRecovery,
    MdlRecovery,
    DuplicatePrecision,
}

impl CheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::QcRecovery => "QC_RECOVERY",
            CheckKind::MdlRecovery => "MDL_RECOVERY",
            CheckKind::DuplicatePrecision => "DUPLICATE_PRECISION",
        }
    }
}

/// Recovery rows whose identifier mentions MDL use the wide MDL window.
pub fn recovery_check_for(sample_id: &str) -> CheckKind {
    if normalize_id(sample_id).contains("MDL") {
        CheckKind::MdlRecovery
    } else {
        CheckKind::QcRecovery
    }
}

/// `true` when `value` passes. Boundaries pass; NaN and infinities fail.
pub fn in_bounds(value: f64, check: CheckKind, profile: &QcProfile) -> bool {
    if !value.is_finite() {
        return false;
    }
    match check {
        CheckKind::QcRecovery => profile.qc_recovery.contains(value),
        CheckKind::MdlRecovery => profile.mdl_recovery.contains(value),
        CheckKind::DuplicatePrecision => value <= profile.duplicate_precision_max,
    }
}

/// Flag state for a computed cell. Undefined statistics are not checked.
pub fn flag_for(value: Option<f64>, check: CheckKind, profile: &QcProfile) -> bool {
    match value {
        Some(v) => !in_bounds(v, check, profile),
        None => false,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/bounds.rs"]
mod tests;
