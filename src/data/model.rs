use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Label – the binary class of a record
// ---------------------------------------------------------------------------

/// Class label. Declaration order (`Ham` before `Spam`) is the order used
/// for grouping and tie-breaking everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Parse a raw cell case-insensitively. Only `ham` / `spam` map.
    pub fn parse(raw: &str) -> Option<Label> {
        match raw.to_lowercase().as_str() {
            "ham" => Some(Label::Ham),
            "spam" => Some(Label::Spam),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the working set
// ---------------------------------------------------------------------------

/// Sentinel language code for rows whose language could not be determined.
pub const UNKNOWN_LANGUAGE: &str = "unk";

/// A single labelled text row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub label: Label,
    /// ISO-639-ish code or [`UNKNOWN_LANGUAGE`]. Serialised as `lang`.
    #[serde(rename = "lang")]
    pub language: String,
}

impl Record {
    pub fn new(text: impl Into<String>, label: Label, language: impl Into<String>) -> Self {
        Record {
            text: text.into(),
            label,
            language: language.into(),
        }
    }

    /// Length of the text in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Copy label and language onto a new text.
    pub fn with_text(&self, text: String) -> Self {
        Record {
            text,
            label: self.label,
            language: self.language.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the ordered working set
// ---------------------------------------------------------------------------

/// Ordered sequence of records flowing through the stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-label counts. Labels with no records are absent from the map.
    pub fn label_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for rec in &self.records {
            *counts.entry(rec.label).or_insert(0) += 1;
        }
        counts
    }

    /// Split into per-label groups, keeping dataset order inside each group.
    /// Iteration order of the map is label declaration order.
    pub fn group_by_label(self) -> BTreeMap<Label, Vec<Record>> {
        let mut groups: BTreeMap<Label, Vec<Record>> = BTreeMap::new();
        for rec in self.records {
            groups.entry(rec.label).or_default().push(rec);
        }
        groups
    }

    /// Append records to the end of the dataset.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_is_case_insensitive() {
        assert_eq!(Label::parse("SPAM"), Some(Label::Spam));
        assert_eq!(Label::parse("Ham"), Some(Label::Ham));
        assert_eq!(Label::parse("unknown"), None);
        assert_eq!(Label::parse(" ham"), None);
    }

    #[test]
    fn label_counts_skip_absent_labels() {
        let ds = Dataset::from_records(vec![
            Record::new("a", Label::Spam, "en"),
            Record::new("b", Label::Spam, "en"),
        ]);
        let counts = ds.label_counts();
        assert_eq!(counts.get(&Label::Spam), Some(&2));
        assert!(!counts.contains_key(&Label::Ham));
    }

    #[test]
    fn group_by_label_keeps_order() {
        let ds = Dataset::from_records(vec![
            Record::new("s1", Label::Spam, "en"),
            Record::new("h1", Label::Ham, "en"),
            Record::new("s2", Label::Spam, "en"),
        ]);
        let groups = ds.group_by_label();
        let labels: Vec<Label> = groups.keys().copied().collect();
        assert_eq!(labels, vec![Label::Ham, Label::Spam]);
        let spam: Vec<&str> = groups[&Label::Spam].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(spam, vec!["s1", "s2"]);
    }

    #[test]
    fn char_len_counts_characters() {
        let rec = Record::new("héllo🔥", Label::Ham, "unk");
        assert_eq!(rec.char_len(), 6);
    }
}
