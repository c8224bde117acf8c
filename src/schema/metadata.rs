//! Column metadata inference.
//!
//! For every column of a dataset this module derives a human-readable label,
//! the SQL type its native type maps to, and whether the column is
//! categorical (bounded-cardinality text) and therefore eligible for
//! dimension extraction.

use crate::error::{DashmartError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default distinct-value ceiling for a text column to count as categorical.
pub const DEFAULT_CATEGORICAL_THRESHOLD: i64 = 50;

/// Metadata record for a single dataset column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name in the dataset (unique, stable)
    pub name: String,

    /// Human-readable label, caller-supplied or derived from the name
    pub label: String,

    /// Native Polars dtype, rendered as a string
    pub native_type: String,

    /// SQL type the native type maps to
    pub sql_type: String,

    /// Whether the column is categorical (text with bounded cardinality)
    pub is_categorical: bool,
}

/// Maps a native Polars dtype to a SQL type name.
///
/// Total and deterministic: anything outside the fixed table falls back to
/// `VARCHAR` rather than failing.
pub fn sql_type_for(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::String => "VARCHAR",
        DataType::Int64 => "INTEGER",
        DataType::Float64 => "DOUBLE",
        DataType::Datetime(_, _) => "TIMESTAMP",
        DataType::Boolean => "BOOLEAN",
        _ => "VARCHAR",
    }
}

/// Default label for a column name: underscores become spaces and each word
/// is capitalized, so `unit_price` renders as `Unit Price`.
pub fn default_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Infers metadata for every column of `df`, in column order.
///
/// A column is categorical iff its native type is text and its distinct
/// non-null value count is at most `categorical_threshold` (inclusive).
/// Nulls are excluded from the count but otherwise pass through untouched.
///
/// # Errors
///
/// Returns [`DashmartError::InvalidThreshold`] when the threshold is
/// negative, before any column is examined. A threshold of zero simply means
/// no column is ever flagged.
pub fn infer_metadata(
    df: &DataFrame,
    categorical_threshold: i64,
    column_labels: Option<&HashMap<String, String>>,
) -> Result<Vec<ColumnMetadata>> {
    if categorical_threshold < 0 {
        return Err(DashmartError::InvalidThreshold(categorical_threshold));
    }

    let mut metadata = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let dtype = col.dtype();

        let label = column_labels
            .and_then(|labels| labels.get(&name))
            .cloned()
            .unwrap_or_else(|| default_label(&name));

        let mut is_categorical = false;
        if dtype.is_string() {
            let distinct = col.as_materialized_series().drop_nulls().n_unique()?;
            if distinct as i64 <= categorical_threshold {
                is_categorical = true;
                tracing::info!(
                    column = %name,
                    distinct,
                    "text column is within the categorical threshold"
                );
            } else {
                tracing::warn!(
                    column = %name,
                    distinct,
                    threshold = categorical_threshold,
                    "text column exceeds the categorical threshold"
                );
            }
        }

        metadata.push(ColumnMetadata {
            name,
            label,
            native_type: dtype.to_string(),
            sql_type: sql_type_for(dtype).to_owned(),
            is_categorical,
        });
    }

    tracing::info!(columns = metadata.len(), "inferred column metadata");
    Ok(metadata)
}

/// Renders a metadata sequence as a DataFrame for persistence.
pub fn metadata_to_dataframe(metadata: &[ColumnMetadata]) -> PolarsResult<DataFrame> {
    let names: Vec<&str> = metadata.iter().map(|m| m.name.as_str()).collect();
    let labels: Vec<&str> = metadata.iter().map(|m| m.label.as_str()).collect();
    let native_types: Vec<&str> = metadata.iter().map(|m| m.native_type.as_str()).collect();
    let sql_types: Vec<&str> = metadata.iter().map(|m| m.sql_type.as_str()).collect();
    let categorical: Vec<bool> = metadata.iter().map(|m| m.is_categorical).collect();

    df! {
        "name" => names,
        "label" => labels,
        "native_type" => native_types,
        "sql_type" => sql_types,
        "is_categorical" => categorical,
    }
}
