use std::collections::HashSet;

use log::info;

use super::model::Dataset;

/// Duplicate-detection key: trimmed, lowercased, whitespace runs collapsed
/// to a single space.
pub fn normalization_key(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep the first record for each normalization key and drop every later
/// one. Labels of dropped records are not reconciled with the kept one.
pub fn dedup(dataset: Dataset) -> Dataset {
    let before = dataset.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let kept: Dataset = dataset
        .records
        .into_iter()
        .filter(|r| seen.insert(normalization_key(&r.text)))
        .collect();
    info!("dedup: kept {} of {} rows", kept.len(), before);
    kept
}
