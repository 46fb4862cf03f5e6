use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Mdl,
    Qcs,
    Ccv(u32),
    Qcb,
    Ccb(u32),
    Rinse,
    Sample,
}

impl Category {
    pub fn label(&self) -> String {
        match self {
            Category::Mdl => "MDL".to_string(),
            Category::Qcs => "QCS".to_string(),
            Category::Ccv(n) => format!("CCV{n}"),
            Category::Qcb => "QCB".to_string(),
            Category::Ccb(n) => format!("CCB{n}"),
            Category::Rinse => "Rinse".to_string(),
            Category::Sample => "Sample".to_string(),
        }
    }

    pub fn is_recovery_control(&self) -> bool {
        matches!(self, Category::Mdl | Category::Qcs | Category::Ccv(_))
    }

    pub fn is_blank_control(&self) -> bool {
        matches!(self, Category::Qcb | Category::Ccb(_))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Matching form of a sample identifier: whitespace removed, uppercased.
/// `"ccv 1"`, `"CCV1"` and `" Ccv1 "` all become `"CCV1"`.
pub fn normalize_id(raw: &str) -> String {
    raw.split_whitespace().collect::<String>().to_uppercase()
}
