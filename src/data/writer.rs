use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::model::Dataset;
use crate::error::{PrepError, Result};

/// Output header, in column order.
pub const OUTPUT_HEADER: [&str; 3] = ["text", "label", "lang"];

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PrepError + '_ {
    move |source| PrepError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Serialise the dataset as comma-delimited text with a `text,label,lang`
/// header. Labels are written as `ham` / `spam`.
pub fn to_csv_bytes(dataset: &Dataset, path: &Path) -> Result<Vec<u8>> {
    let csv_err = |source| PrepError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(OUTPUT_HEADER).map_err(csv_err)?;
    for rec in &dataset.records {
        writer.serialize(rec).map_err(csv_err)?;
    }
    writer.into_inner().map_err(|e| PrepError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })
}

/// Write the dataset to `path`, creating parent directories as needed.
///
/// The rows go to a sibling temporary file first and are renamed into
/// place, so `path` is either fully written or left untouched.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(dataset, path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }

    let tmp = staging_path(path);
    let staged = fs::write(&tmp, &bytes)
        .map_err(io_err(&tmp))
        .and_then(|()| fs::rename(&tmp, path).map_err(io_err(path)));
    if staged.is_err() {
        // Best effort; a failed write may not have created the file.
        let _ = fs::remove_file(&tmp);
    }
    staged?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Label, Record};

    #[test]
    fn test_writes_header_and_quoted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");
        let ds = Dataset::from_records(vec![
            Record::new("hi, there", Label::Ham, "en"),
            Record::new("WIN \"big\"", Label::Spam, "unk"),
        ]);
        write_csv(&ds, &path).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        assert_eq!(
            body,
            "text,label,lang\n\"hi, there\",ham,en\n\"WIN \"\"big\"\"\",spam,unk\n"
        );
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_empty_dataset_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&Dataset::default(), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "text,label,lang\n");
    }

    #[test]
    fn test_failed_write_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory at the destination makes the rename fail.
        let path = dir.path().join("out.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let ds = Dataset::from_records(vec![Record::new("hello", Label::Ham, "en")]);
        let err = write_csv(&ds, &path).unwrap_err();
        assert!(matches!(err, PrepError::Io { .. }));
        assert!(!staging_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let p = staging_path(Path::new("/data/out.csv"));
        assert_eq!(p, PathBuf::from("/data/out.csv.partial"));
    }
}
