//! Stage composition.
//!
//! ```text
//!  sources ─▶ load ─▶ length filter ─▶ dedup ─▶ augment ─▶ balance ─▶ shuffle ─▶ output
//! ```
//!
//! One `ChaCha8Rng` is created from the seed when the pipeline is built and
//! lent to augmentation, balancing and the final shuffle, in that order.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::balance::balance;
use crate::config::{BalanceMode, PrepConfig};
use crate::data::dedup::dedup;
use crate::data::loader::load_sources;
use crate::data::model::{Dataset, Label};
use crate::data::writer::write_csv;
use crate::error::{PrepError, Result};
use crate::lang::LanguageDetector;

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Row counts observed after each stage of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrepReport {
    pub seed: u64,
    pub loaded: usize,
    pub after_filter: usize,
    pub after_dedup: usize,
    pub augmented: usize,
    pub balance: BalanceMode,
    pub labels_before_balance: BTreeMap<Label, usize>,
    pub labels_after_balance: BTreeMap<Label, usize>,
    pub written: usize,
}

impl PrepReport {
    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| PrepError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| PrepError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline<'a> {
    config: &'a PrepConfig,
    rng: ChaCha8Rng,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PrepConfig) -> Self {
        Pipeline {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Run stages 2–6 on an already loaded dataset.
    pub fn process(&mut self, loaded: Dataset) -> (Dataset, PrepReport) {
        let mut report = PrepReport {
            seed: self.config.seed,
            loaded: loaded.len(),
            balance: self.config.balance,
            ..PrepReport::default()
        };

        let ds = self.config.length_filter().apply(loaded);
        report.after_filter = ds.len();

        let ds = dedup(ds);
        report.after_dedup = ds.len();

        let ds = self.config.augmenter().apply(ds, &mut self.rng);
        report.augmented = ds.len() - report.after_dedup;
        report.labels_before_balance = ds.label_counts();

        let mut ds = balance(self.config.balance, ds, &mut self.rng);
        report.labels_after_balance = ds.label_counts();

        ds.records.shuffle(&mut self.rng);
        report.written = ds.len();
        (ds, report)
    }

    /// Load every input, process, and write the output file. Nothing is
    /// written unless every stage succeeds.
    pub fn run(mut self, detector: &dyn LanguageDetector) -> Result<PrepReport> {
        let loaded = load_sources(&self.config.inputs, detector)?;
        let (ds, report) = self.process(loaded);
        write_csv(&ds, &self.config.output)?;
        info!("wrote {} rows to {}", ds.len(), self.config.output.display());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::augment::PUNCT_TOKENS;
    use crate::data::dedup::normalization_key;
    use crate::data::model::Record;
    use crate::lang::NoDetector;

    fn write_source(dir: &tempfile::TempDir, name: &str, rows: &[(&str, &str)]) -> PathBuf {
        let mut body = String::from("text,label,lang\n");
        for (text, label) in rows {
            body.push_str(&format!("{text},{label},en\n"));
        }
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn two_sources(dir: &tempfile::TempDir) -> Vec<PathBuf> {
        vec![
            write_source(
                dir,
                "a.csv",
                &[
                    ("lunch at noon?", "ham"),
                    ("see you tomorrow", "ham"),
                    ("call mom back", "ham"),
                    ("free cash prize now", "spam"),
                ],
            ),
            write_source(
                dir,
                "b.csv",
                &[
                    ("meeting moved to 3pm", "ham"),
                    ("you won a cruise", "spam"),
                    ("cheap meds online", "spam"),
                ],
            ),
        ]
    }

    #[test]
    fn test_downsample_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = PrepConfig::new(two_sources(&dir), dir.path().join("out.csv"));
        cfg.balance = BalanceMode::Downsample;
        cfg.seed = 7;

        let report = Pipeline::new(&cfg).run(&NoDetector).unwrap();
        assert_eq!(report.loaded, 7);
        assert_eq!(report.after_dedup, 7);
        assert_eq!(report.written, 6);
        assert_eq!(report.labels_after_balance[&Label::Ham], 3);
        assert_eq!(report.labels_after_balance[&Label::Spam], 3);

        let body = fs::read_to_string(&cfg.output).unwrap();
        assert_eq!(body.lines().count(), 7);
        assert_eq!(body.lines().next(), Some("text,label,lang"));
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = two_sources(&dir);
        let mut outputs = Vec::new();
        for name in ["one.csv", "two.csv"] {
            let mut cfg = PrepConfig::new(inputs.clone(), dir.path().join(name));
            cfg.augment = 2;
            cfg.balance = BalanceMode::Upsample;
            Pipeline::new(&cfg).run(&NoDetector).unwrap();
            outputs.push(fs::read(&cfg.output).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn test_different_seed_changes_order() {
        let records: Vec<Record> = (0..40)
            .map(|i| Record::new(format!("message number {i}"), Label::Ham, "en"))
            .collect();
        let cfg_a = PrepConfig::new(vec![], PathBuf::from("unused.csv"));
        let mut cfg_b = cfg_a.clone();
        cfg_b.seed = 43;

        let (a, _) = Pipeline::new(&cfg_a).process(Dataset::from_records(records.clone()));
        let (b, _) = Pipeline::new(&cfg_b).process(Dataset::from_records(records));
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    #[test]
    fn test_stage_order_filter_dedup_augment() {
        let mut cfg = PrepConfig::new(vec![], PathBuf::from("unused.csv"));
        cfg.min_chars = 3;
        cfg.augment = 1;
        let loaded = Dataset::from_records(vec![
            Record::new("hi", Label::Ham, "en"),
            Record::new("hello friend", Label::Ham, "en"),
            Record::new("HELLO  friend", Label::Spam, "en"),
            Record::new("abc", Label::Spam, "en"),
        ]);
        let (out, report) = Pipeline::new(&cfg).process(loaded);
        assert_eq!(report.after_filter, 3);
        assert_eq!(report.after_dedup, 2);
        // "abc" is too short for variants; "hello friend" yields one.
        assert_eq!(report.augmented, 1);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_variants_skip_filter_and_dedup() {
        let mut cfg = PrepConfig::new(vec![], PathBuf::from("unused.csv"));
        cfg.max_chars = 12;
        cfg.augment = 4;
        let loaded = Dataset::from_records(vec![Record::new("hello friend", Label::Ham, "en")]);

        let (out, report) = Pipeline::new(&cfg).process(loaded);
        assert_eq!(report.augmented, 4);
        assert_eq!(out.len(), 5);

        // Punctuation and emoji variants exceed the window but stay; the
        // jitter variant may too, if it doubled the space.
        let too_long = out.records.iter().filter(|r| r.char_len() > 12).count();
        assert!(too_long >= 2, "only {too_long} rows over the window");
        assert!(out.records.iter().any(|r| r.text.starts_with("hello friend ")
            && PUNCT_TOKENS.iter().any(|p| r.text.ends_with(p))));

        // The jitter variant shares its source's key and is not deduplicated.
        let same_key = out
            .records
            .iter()
            .filter(|r| normalization_key(&r.text) == "hello friend")
            .count();
        assert_eq!(same_key, 2);
    }

    #[test]
    fn test_validation_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write_source(&dir, "bad.csv", &[("hello", "maybe")]);
        let cfg = PrepConfig::new(vec![bad], dir.path().join("out.csv"));
        let err = Pipeline::new(&cfg).run(&NoDetector).unwrap_err();
        assert!(matches!(err, PrepError::Validation { .. }));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = PrepReport {
            seed: 1,
            written: 2,
            ..PrepReport::default()
        };
        report.labels_after_balance.insert(Label::Spam, 2);
        report.write_json(&path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["written"], 2);
        assert_eq!(value["balance"], "none");
        assert_eq!(value["labels_after_balance"]["spam"], 2);
    }
}
