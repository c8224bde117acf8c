//! Extension-dispatched dataset loading.

use crate::error::{DashmartError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Loads a tabular dataset from `path` based on its extension.
///
/// Supported: `csv` (lazy scan with date parsing), `parquet`, `json`,
/// `jsonl`/`ndjson`. Anything else is
/// [`DashmartError::UnsupportedFormat`].
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let df = match ext.as_str() {
        "csv" => LazyCsvReader::new(path.to_string_lossy().to_string())
            .with_try_parse_dates(true)
            .finish()?
            .collect()?,
        "parquet" => {
            let file = File::open(path)?;
            ParquetReader::new(file).finish()?
        }
        "json" => {
            let file = File::open(path)?;
            JsonReader::new(file).finish()?
        }
        "jsonl" | "ndjson" => JsonLineReader::from_path(path)?.finish()?,
        _ => return Err(DashmartError::UnsupportedFormat(ext)),
    };

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded dataset"
    );
    Ok(df)
}
