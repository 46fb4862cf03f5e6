use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::category::Category;

/// Closed interval; a value inside `[min, max]` passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryBounds {
    pub min: f64,
    pub max: f64,
}

impl RecoveryBounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcProfile {
    pub mdl_target: f64,
    pub qcs_target: f64,
    pub ccv_target: f64,
    pub qc_recovery: RecoveryBounds,
    pub mdl_recovery: RecoveryBounds,
    pub duplicate_precision_max: f64,
    /// Molar mass (g/mol) used to turn PPM into µmol/L.
    pub conversion_factor: f64,
    pub result_unit: String,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid profile {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid profile: {0}")]
    Invalid(String),
}

impl Default for QcProfile {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl QcProfile {
    pub fn default_v1() -> Self {
        Self {
            mdl_target: 0.2,
            qcs_target: 10.0,
            ccv_target: 10.0,
            qc_recovery: RecoveryBounds::new(90.0, 110.0),
            mdl_recovery: RecoveryBounds::new(45.0, 145.0),
            duplicate_precision_max: 10.0,
            conversion_factor: 12.01057,
            result_unit: "µmol/L".to_string(),
        }
    }

    /// Older batches were run against an 18 PPM QCS standard.
    pub fn legacy_qcs18() -> Self {
        let mut base = Self::default_v1();
        base.qcs_target = 18.0;
        base
    }

    /// Expected concentration for a recovery control; `None` means the
    /// group's own `Mean (per analysis type)` column is used instead.
    pub fn recovery_target(&self, category: Category) -> Option<f64> {
        match category {
            Category::Mdl => Some(self.mdl_target),
            Category::Qcs => Some(self.qcs_target),
            Category::Ccv(_) => Some(self.ccv_target),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        for (name, bounds) in [
            ("qc_recovery", self.qc_recovery),
            ("mdl_recovery", self.mdl_recovery),
        ] {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(ProfileError::Invalid(format!(
                    "{name} bounds must be finite with min <= max (got {} .. {})",
                    bounds.min, bounds.max
                )));
            }
        }
        if !self.duplicate_precision_max.is_finite() || self.duplicate_precision_max < 0.0 {
            return Err(ProfileError::Invalid(
                "duplicate_precision_max must be a finite, non-negative number".to_string(),
            ));
        }
        if !self.conversion_factor.is_finite() {
            return Err(ProfileError::Invalid(
                "conversion_factor must be finite".to_string(),
            ));
        }
        for (name, target) in [
            ("mdl_target", self.mdl_target),
            ("qcs_target", self.qcs_target),
            ("ccv_target", self.ccv_target),
        ] {
            if !target.is_finite() {
                return Err(ProfileError::Invalid(format!("{name} must be finite")));
            }
        }
        Ok(())
    }
}

/// Reads a JSON profile. Keys left out keep their `default_v1` values.
pub fn load_profile(path: &Path) -> Result<QcProfile, ProfileError> {
    let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let profile = parse_profile(&text).map_err(|source| ProfileError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    profile.validate()?;
    Ok(profile)
}

pub fn parse_profile(text: &str) -> Result<QcProfile, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
