//! Dimension table extraction for categorical columns.

use crate::error::Result;
use crate::schema::metadata::ColumnMetadata;
use polars::prelude::*;
use std::collections::HashMap;

/// One row of a dimension table: a surrogate id and the original value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionEntry {
    /// Zero-based surrogate id, assigned in first-occurrence order
    pub id: i64,

    /// Original categorical value
    pub label: String,
}

/// Lookup table mapping surrogate ids to the distinct values of one
/// categorical column. Entry order is the first-occurrence order of the
/// values in the dataset, which makes extraction deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionTable {
    /// Name of the dataset column this table describes
    pub column: String,

    /// Deduplicated (id, value) pairs
    pub entries: Vec<DimensionEntry>,
}

impl DimensionTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Surrogate id for an original value, if present.
    pub fn id_of(&self, value: &str) -> Option<i64> {
        self.entries.iter().find(|e| e.label == value).map(|e| e.id)
    }

    /// Original value for a surrogate id, if present.
    pub fn label_of(&self, id: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.label.as_str())
    }

    /// Renders the table as a two-column DataFrame (`value`, `label`) for
    /// persistence, matching the warehouse dimension layout.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<i64> = self.entries.iter().map(|e| e.id).collect();
        let labels: Vec<&str> = self.entries.iter().map(|e| e.label.as_str()).collect();
        df! {
            "value" => ids,
            "label" => labels,
        }
    }
}

/// Builds one dimension table per column flagged categorical in `metadata`.
///
/// Distinct values keep their first-occurrence order and receive surrogate
/// ids `0..k-1` in that order. Nulls never receive an entry; they stay null
/// in the fact table. Columns with zero or one distinct value produce a
/// degenerate table like any other.
pub fn extract_dimensions(
    df: &DataFrame,
    metadata: &[ColumnMetadata],
) -> Result<Vec<DimensionTable>> {
    let mut tables = Vec::new();

    for meta in metadata.iter().filter(|m| m.is_categorical) {
        let column = df.column(&meta.name)?;
        let series = column.as_materialized_series();
        let ca = series.str()?;

        let mut seen: HashMap<String, i64> = HashMap::new();
        let mut entries = Vec::new();
        for value in ca.into_iter().flatten() {
            if !seen.contains_key(value) {
                let id = entries.len() as i64;
                seen.insert(value.to_owned(), id);
                entries.push(DimensionEntry {
                    id,
                    label: value.to_owned(),
                });
            }
        }

        tracing::info!(
            column = %meta.name,
            distinct = entries.len(),
            "built dimension table"
        );
        tables.push(DimensionTable {
            column: meta.name.clone(),
            entries,
        });
    }

    tracing::info!(tables = tables.len(), "built dimension tables");
    Ok(tables)
}
