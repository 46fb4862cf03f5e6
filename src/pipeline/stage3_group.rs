use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleGroup<K, T> {
    pub key: K,
    pub records: Vec<T>,
}

/// Partitions `items` by `key` in one pass. Groups come out in the order
/// their key was first seen and keep the original order inside each group.
/// Items whose key is `None` belong to no group.
pub fn group_by<T, K, F>(items: &[T], key: F) -> Vec<SampleGroup<K, T>>
where
    T: Clone,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> Option<K>,
{
    let mut slot_by_key: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<SampleGroup<K, T>> = Vec::new();

    for item in items {
        let Some(k) = key(item) else {
            continue;
        };
        match slot_by_key.get(&k) {
            Some(&slot) => groups[slot].records.push(item.clone()),
            None => {
                slot_by_key.insert(k.clone(), groups.len());
                groups.push(SampleGroup {
                    key: k,
                    records: vec![item.clone()],
                });
            }
        }
    }

    groups
}

pub fn sample_id_key(sample_id: &str) -> Option<String> {
    let trimmed = sample_id.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_group.rs"]
mod tests;
