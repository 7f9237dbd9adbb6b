use log::info;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Length window
// ---------------------------------------------------------------------------

/// Inclusive character-length window. A bound of `0` means "unbounded" on
/// that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthFilter {
    pub min_chars: usize,
    pub max_chars: usize,
}

impl LengthFilter {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        LengthFilter {
            min_chars,
            max_chars,
        }
    }

    /// Whether neither bound is set.
    pub fn is_noop(&self) -> bool {
        self.min_chars == 0 && self.max_chars == 0
    }

    /// Whether a text of `len` characters passes both active bounds.
    pub fn accepts(&self, len: usize) -> bool {
        if self.min_chars != 0 && len < self.min_chars {
            return false;
        }
        if self.max_chars != 0 && len > self.max_chars {
            return false;
        }
        true
    }

    /// Drop records outside the window. Retained records are untouched.
    pub fn apply(&self, dataset: Dataset) -> Dataset {
        if self.is_noop() {
            return dataset;
        }
        let before = dataset.len();
        let kept: Dataset = dataset
            .records
            .into_iter()
            .filter(|r| self.accepts(r.char_len()))
            .collect();
        info!(
            "length filter [{}, {}]: kept {} of {} rows",
            self.min_chars,
            self.max_chars,
            kept.len(),
            before
        );
        kept
    }
}
