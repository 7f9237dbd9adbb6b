use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde_json::{Map, Value as JsonValue};

use super::model::{Dataset, Label, Record};
use crate::error::{PrepError, Result};
use crate::lang::{LanguageDetector, detect_or_unknown};

/// Maximum number of offending rows quoted in a validation error.
const MAX_LABEL_EXAMPLES: usize = 5;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and concatenate several sources, in the order given.
pub fn load_sources<P: AsRef<Path>>(
    paths: &[P],
    detector: &dyn LanguageDetector,
) -> Result<Dataset> {
    let mut merged = Dataset::default();
    for path in paths {
        let ds = load_file(path.as_ref(), detector)?;
        merged.extend(ds.records);
    }
    info!("merged {} source(s) into {} rows", paths.len(), merged.len());
    Ok(merged)
}

/// Load one labelled source. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited, header row required
/// * `.tsv` / `.tab` – tab-delimited, header row required
/// * `.json`         – `[{ "text": ..., "label": ..., "lang": ... }, ...]`
pub fn load_file(path: &Path, detector: &dyn LanguageDetector) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b',')?,
        "tsv" | "tab" => read_delimited(path, b'\t')?,
        "json" => read_json(path)?,
        _ => {
            return Err(PrepError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            });
        }
    };

    let records = validate_rows(path, rows, detector)?;
    info!("{}: loaded {} rows", path.display(), records.len());
    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Source schema
// ---------------------------------------------------------------------------

/// Column positions of one source. `language` is `None` when the source
/// has neither a `lang` nor a `language` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub text: usize,
    pub label: usize,
    pub language: Option<usize>,
}

impl SourceSchema {
    /// Resolve column positions from a header row.
    pub fn from_headers<S: AsRef<str>>(path: &Path, headers: &[S]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.as_ref() == name);

        let text = position("text");
        let label = position("label");
        let (Some(text), Some(label)) = (text, label) else {
            let mut missing = Vec::new();
            if text.is_none() {
                missing.push("text");
            }
            if label.is_none() {
                missing.push("label");
            }
            return Err(PrepError::Schema {
                path: path.to_path_buf(),
                missing,
            });
        };

        Ok(SourceSchema {
            text,
            label,
            language: position("lang").or_else(|| position("language")),
        })
    }
}

/// One row as read from disk, before label validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRow {
    text: String,
    label: String,
    language: Option<String>,
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<RawRow>> {
    let file = File::open(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| PrepError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let schema = SourceSchema::from_headers(path, &headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        rows.push(RawRow {
            text: record.get(schema.text).unwrap_or("").to_string(),
            label: record.get(schema.label).unwrap_or("").to_string(),
            language: schema
                .language
                .map(|idx| record.get(idx).unwrap_or("").to_string()),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
/// A column counts as present when any object carries the key; objects
/// lacking a present key read it as the empty string.
fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).map_err(|source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let objects: Vec<Map<String, JsonValue>> =
        serde_json::from_str(&text).map_err(|source| PrepError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let columns: Vec<String> = objects
        .iter()
        .flat_map(|obj| obj.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let schema = SourceSchema::from_headers(path, &columns)?;

    let cell = |obj: &Map<String, JsonValue>, idx: usize| {
        obj.get(&columns[idx]).map(json_to_text).unwrap_or_default()
    };

    Ok(objects
        .iter()
        .map(|obj| RawRow {
            text: cell(obj, schema.text),
            label: cell(obj, schema.label),
            language: schema.language.map(|idx| cell(obj, idx)),
        })
        .collect())
}

/// Coerce any JSON cell to text.
fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Map labels and fill languages. Any unmappable label fails the whole
/// source; nothing is skipped row by row.
fn validate_rows(
    path: &Path,
    rows: Vec<RawRow>,
    detector: &dyn LanguageDetector,
) -> Result<Vec<Record>> {
    let bad: Vec<(usize, String)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| Label::parse(&row.label).is_none())
        .map(|(i, row)| (i, row.label.clone()))
        .collect();
    if !bad.is_empty() {
        return Err(PrepError::Validation {
            path: path.to_path_buf(),
            count: bad.len(),
            examples: bad.into_iter().take(MAX_LABEL_EXAMPLES).collect(),
        });
    }

    if rows.first().is_some_and(|r| r.language.is_none()) {
        debug!("{}: no language column, detecting per row", path.display());
    }

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let label = Label::parse(&row.label)?;
            let language = match row.language {
                Some(code) => code,
                None => detect_or_unknown(detector, &row.text),
            };
            Some(Record {
                text: row.text,
                label,
                language,
            })
        })
        .collect())
}
