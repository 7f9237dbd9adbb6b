//! Per-label resampling to equal class counts.
//!
//! Groups are processed in label declaration order and emitted in that
//! order. Each resampled group costs exactly one index sample from the RNG;
//! groups kept whole cost nothing. Datasets with fewer than two labels
//! present pass through without touching the RNG.

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::index;

use crate::config::BalanceMode;
use crate::data::model::{Dataset, Record};

/// `amount` records drawn from `group` without replacement, in draw order.
fn sample_without_replacement<R: Rng + ?Sized>(
    group: &[Record],
    amount: usize,
    rng: &mut R,
) -> Vec<Record> {
    index::sample(rng, group.len(), amount)
        .into_iter()
        .map(|i| group[i].clone())
        .collect()
}

/// Shrink every label to the smallest label count.
pub fn downsample<R: Rng + ?Sized>(dataset: Dataset, rng: &mut R) -> Dataset {
    let counts = dataset.label_counts();
    let Some(&min) = counts.values().min() else {
        return dataset;
    };
    if counts.len() < 2 {
        warn!("downsample: fewer than two labels present, nothing to balance");
        return dataset;
    }
    debug!("downsample: per-label counts {counts:?}, target {min}");

    let mut out = Vec::with_capacity(min * counts.len());
    for (_, group) in dataset.group_by_label() {
        out.extend(sample_without_replacement(&group, min, rng));
    }
    info!("downsample: {} rows ({} per label)", out.len(), min);
    Dataset::from_records(out)
}

/// Grow every label to the largest label count: whole copies of the group
/// followed by a random remainder drawn without replacement.
pub fn upsample<R: Rng + ?Sized>(dataset: Dataset, rng: &mut R) -> Dataset {
    let counts = dataset.label_counts();
    let Some(&max) = counts.values().max() else {
        return dataset;
    };
    if counts.len() < 2 {
        warn!("upsample: fewer than two labels present, nothing to balance");
        return dataset;
    }
    debug!("upsample: per-label counts {counts:?}, target {max}");

    let mut out = Vec::with_capacity(max * counts.len());
    for (label, group) in dataset.group_by_label() {
        let c = group.len();
        if c == max {
            out.extend(group);
            continue;
        }
        let reps = max / c;
        let rem = max % c;
        debug!("upsample: '{label}' x{reps} + {rem} sampled");
        for _ in 0..reps {
            out.extend(group.iter().cloned());
        }
        out.extend(sample_without_replacement(&group, rem, rng));
    }
    info!("upsample: {} rows ({} per label)", out.len(), max);
    Dataset::from_records(out)
}

/// Apply the selected balancing policy.
pub fn balance<R: Rng + ?Sized>(mode: BalanceMode, dataset: Dataset, rng: &mut R) -> Dataset {
    match mode {
        BalanceMode::None => dataset,
        BalanceMode::Downsample => downsample(dataset, rng),
        BalanceMode::Upsample => upsample(dataset, rng),
    }
}
