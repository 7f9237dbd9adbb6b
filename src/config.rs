use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::augment::Augmenter;
use crate::data::filter::LengthFilter;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

// ---------------------------------------------------------------------------
// Balance mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Leave class counts as they are.
    #[default]
    None,
    /// Shrink every class to the smallest class count.
    Downsample,
    /// Grow every class to the largest class count.
    Upsample,
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one preparation run needs, independent of how it was parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Variants per source row; `0` disables augmentation.
    pub augment: usize,
    pub augment_minority: bool,
    pub balance: BalanceMode,
    /// `0` = unbounded.
    pub min_chars: usize,
    /// `0` = unbounded.
    pub max_chars: usize,
    pub seed: u64,
    /// Language code used for sources without a language column.
    pub assume_lang: Option<String>,
}

impl PrepConfig {
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        PrepConfig {
            inputs,
            output,
            augment: 0,
            augment_minority: false,
            balance: BalanceMode::None,
            min_chars: 0,
            max_chars: 0,
            seed: DEFAULT_SEED,
            assume_lang: None,
        }
    }

    pub fn length_filter(&self) -> LengthFilter {
        LengthFilter::new(self.min_chars, self.max_chars)
    }

    pub fn augmenter(&self) -> Augmenter {
        Augmenter::new(self.augment, self.augment_minority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PrepConfig::new(vec!["a.csv".into()], "out.csv".into());
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.balance, BalanceMode::None);
        assert!(cfg.length_filter().is_noop());
        assert_eq!(cfg.augmenter(), Augmenter::default());
    }

    #[test]
    fn test_balance_mode_names() {
        assert_eq!(
            BalanceMode::from_str("downsample", false).unwrap(),
            BalanceMode::Downsample
        );
        assert_eq!(serde_json::to_string(&BalanceMode::Upsample).unwrap(), "\"upsample\"");
    }
}
