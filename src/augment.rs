//! Synthetic variants of existing rows.
//!
//! Each source row yields up to four candidates built from its text
//! (leetspeak, trailing punctuation, trailing emoji, doubled spaces). The
//! candidate list is shuffled and truncated to the requested count.
//!
//! Random draws per source row happen in this order and nowhere else:
//! 1. punctuation token choice
//! 2. emoji token choice
//! 3. one Bernoulli draw per space, left to right
//! 4. Fisher–Yates shuffle of the candidate list
//!
//! Rows shorter than [`MIN_AUGMENT_CHARS`] make no draws at all.

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::model::{Dataset, Label, Record};

/// Texts with fewer characters than this get no variants.
pub const MIN_AUGMENT_CHARS: usize = 6;

/// Emphasis suffixes.
pub const PUNCT_TOKENS: [&str; 4] = ["!!!", "!!", "!?", "..."];

/// Emoji suffixes.
pub const EMOJI_TOKENS: [&str; 10] = ["🙂", "😉", "✅", "🔥", "💰", "💥", "📣", "🚀", "🤑", "✨"];

/// Chance that any single space is doubled.
pub const SPACE_JITTER_PROB: f64 = 0.3;

// ---------------------------------------------------------------------------
// Variant rules
// ---------------------------------------------------------------------------

/// Apply the fixed substitution table `a→@ e→3 i→1 o→0 s→$`.
pub fn leetspeak(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a' => '@',
            'e' => '3',
            'i' => '1',
            'o' => '0',
            's' => '$',
            other => other,
        })
        .collect()
}

/// Replace each single space by two spaces with [`SPACE_JITTER_PROB`].
pub fn whitespace_jitter<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if c == ' ' && rng.gen_bool(SPACE_JITTER_PROB) {
            out.push_str("  ");
        } else {
            out.push(c);
        }
    }
    out
}

fn with_suffix<R: Rng + ?Sized>(text: &str, tokens: &[&str], rng: &mut R) -> String {
    // choose() only returns None on an empty slice; token tables are const.
    let token = tokens.choose(rng).copied().unwrap_or_default();
    format!("{text} {token}")
}

/// Candidate variants of `text`, in rule order (unshuffled).
/// Empty when the text is shorter than [`MIN_AUGMENT_CHARS`].
pub fn candidate_variants<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Vec<String> {
    if text.chars().count() < MIN_AUGMENT_CHARS {
        return Vec::new();
    }
    let mut variants = Vec::with_capacity(4);

    let leet = leetspeak(text);
    if leet != text {
        variants.push(leet);
    }
    variants.push(with_suffix(text, &PUNCT_TOKENS, rng));
    variants.push(with_suffix(text, &EMOJI_TOKENS, rng));
    variants.push(whitespace_jitter(text, rng));
    variants
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Augmentation stage settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Augmenter {
    /// Variants requested per source row; `0` disables the stage.
    pub count: usize,
    /// Only rows of the minority label are used as sources.
    pub minority_only: bool,
}

impl Augmenter {
    pub fn new(count: usize, minority_only: bool) -> Self {
        Augmenter {
            count,
            minority_only,
        }
    }

    /// The label with the smallest count among labels present. Ties go to
    /// the label declared first (`Ham`).
    pub fn minority_label(dataset: &Dataset) -> Option<Label> {
        dataset
            .label_counts()
            .into_iter()
            .min_by_key(|(_, count)| *count)
            .map(|(label, _)| label)
    }

    /// Append variants after the existing rows. New rows inherit label and
    /// language from their source and skip dedup and length filtering.
    pub fn apply<R: Rng + ?Sized>(&self, mut dataset: Dataset, rng: &mut R) -> Dataset {
        if self.count == 0 {
            return dataset;
        }

        let source_label = if self.minority_only {
            match Self::minority_label(&dataset) {
                Some(label) => {
                    debug!("augmenting minority label '{label}' only");
                    Some(label)
                }
                None => return dataset,
            }
        } else {
            None
        };

        let mut generated = Vec::new();
        for rec in &dataset.records {
            if source_label.is_some_and(|l| l != rec.label) {
                continue;
            }
            generated.extend(augment_record(rec, self.count, rng));
        }

        info!(
            "augmentation: generated {} rows from {} source rows",
            generated.len(),
            dataset.len()
        );
        dataset.extend(generated);
        dataset
    }
}

/// Variants of one record as new records: shuffled, then cut to `count`.
pub fn augment_record<R: Rng + ?Sized>(rec: &Record, count: usize, rng: &mut R) -> Vec<Record> {
    let mut variants = candidate_variants(&rec.text, rng);
    variants.shuffle(rng);
    variants.truncate(count);
    variants.into_iter().map(|v| rec.with_text(v)).collect()
}
