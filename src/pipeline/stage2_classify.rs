use crate::input::Record;
use crate::model::category::{Category, normalize_id};

pub type IdRule = fn(&str) -> Option<Category>;

/// Identifier rules in priority order. Each takes the normalized identifier.
pub const ID_RULES: [(&str, IdRule); 4] = [
    ("rinse", match_rinse),
    ("exact_control", match_exact_control),
    ("ccv", match_ccv),
    ("ccb", match_ccb),
];

#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub record: &'a Record,
    pub category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct Stage2Output<'a> {
    pub classified: Vec<Classified<'a>>,
    pub unreportable: usize,
}

pub fn run_stage2(records: &[Record]) -> Stage2Output<'_> {
    let mut out = Stage2Output::default();
    for record in records {
        match classify(&record.sample_id, &record.sample_type) {
            Some(category) => out.classified.push(Classified { record, category }),
            None => {
                tracing::debug!(
                    sample_id = %record.sample_id,
                    sample_type = %record.sample_type,
                    "unreportable row excluded"
                );
                out.unreportable += 1;
            }
        }
    }
    tracing::info!(
        classified = out.classified.len(),
        unreportable = out.unreportable,
        "classified records"
    );
    out
}

/// `None` keeps the row out of the QC and sample tables. Calibration
/// standards are picked up by sample type alone, see `is_calibration_type`.
pub fn classify(sample_id: &str, sample_type: &str) -> Option<Category> {
    if let Some(category) = classify_id(sample_id) {
        return Some(category);
    }
    is_samples_type(sample_type).then_some(Category::Sample)
}

pub fn classify_id(sample_id: &str) -> Option<Category> {
    let normalized = normalize_id(sample_id);
    if normalized.is_empty() {
        return None;
    }
    ID_RULES
        .iter()
        .find_map(|(_, rule)| rule(normalized.as_str()))
}

pub fn is_samples_type(sample_type: &str) -> bool {
    sample_type.trim().eq_ignore_ascii_case("samples")
}

pub fn is_calibration_type(sample_type: &str) -> bool {
    sample_type.to_ascii_lowercase().contains("cal")
}

fn match_rinse(id: &str) -> Option<Category> {
    id.contains("RINSE").then_some(Category::Rinse)
}

fn match_exact_control(id: &str) -> Option<Category> {
    match id {
        "MDL" => Some(Category::Mdl),
        "QCS" => Some(Category::Qcs),
        "QCB" => Some(Category::Qcb),
        _ => None,
    }
}

fn match_ccv(id: &str) -> Option<Category> {
    numbered_suffix(id, "CCV").map(Category::Ccv)
}

fn match_ccb(id: &str) -> Option<Category> {
    numbered_suffix(id, "CCB").map(Category::Ccb)
}

fn numbered_suffix(id: &str, prefix: &str) -> Option<u32> {
    let digits = id.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_classify.rs"]
mod tests;
