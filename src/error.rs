use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a preparation run.
///
/// None of these are recovered from inside the pipeline: a run either
/// writes the complete output or nothing.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A source lacks a required column.
    #[error("{}: missing required column(s): {}", .path.display(), .missing.join(", "))]
    Schema {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    /// One or more rows carry a label other than ham/spam.
    #[error(
        "{}: {count} row(s) have labels outside of {{ham, spam}} (e.g. {})",
        .path.display(),
        format_examples(.examples)
    )]
    Validation {
        path: PathBuf,
        count: usize,
        examples: Vec<(usize, String)>,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed delimited text: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: malformed JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: unsupported file extension '.{extension}'", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
}

fn format_examples(examples: &[(usize, String)]) -> String {
    examples
        .iter()
        .map(|(row, value)| format!("row {row}: {value:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PrepError>;
