//! Extension-dispatched dataset saving.

use crate::error::{DashmartError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Persists `df` to `path` based on its extension, creating parent
/// directories on demand.
///
/// Supported: `csv`, `parquet`, `json`, `jsonl`/`ndjson`. Anything else is
/// [`DashmartError::UnsupportedFormat`].
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = File::create(path)?;
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
        "parquet" => {
            let file = File::create(path)?;
            ParquetWriter::new(file).finish(df)?;
        }
        "json" => {
            let file = File::create(path)?;
            JsonWriter::new(file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        "jsonl" | "ndjson" => {
            let file = File::create(path)?;
            JsonWriter::new(file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
        _ => return Err(DashmartError::UnsupportedFormat(ext)),
    }

    tracing::info!(path = %path.display(), rows = df.height(), "saved dataset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::loader::load_dataset;

    #[test]
    fn test_unknown_extension_rejected() {
        let mut df = df! { "a" => &[1i64] }.expect("valid test frame");
        let err = save_dataset(&mut df, Path::new("out.pkl")).unwrap_err();
        assert!(matches!(err, DashmartError::UnsupportedFormat(ext) if ext == "pkl"));
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("out.csv");

        let mut df = df! {
            "id" => &[1i64, 2, 3],
            "category" => &["A", "B", "A"],
        }
        .expect("valid test frame");

        save_dataset(&mut df, &path).expect("save succeeds");
        let restored = load_dataset(&path).expect("load succeeds");
        assert!(df.equals_missing(&restored));
    }
}
