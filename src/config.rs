//! Build configuration loaded from a JSON file.
//!
//! Everything in the config can also be supplied (or overridden) by CLI
//! flags; see `dashmart build --help`.

use crate::error::{DashmartError, Result};
use crate::schema::DEFAULT_CATEGORICAL_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Names of the warehouse tables the build produces.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TableNames {
    #[serde(default = "default_metadata_table")]
    pub metadata: String,

    #[serde(default = "default_fact_table")]
    pub fact: String,

    /// Prefix for per-column dimension tables (`dim_category`, ...)
    #[serde(default = "default_dimension_prefix")]
    pub dimension_prefix: String,
}

fn default_metadata_table() -> String {
    "metadata".to_owned()
}

fn default_fact_table() -> String {
    "fact_table".to_owned()
}

fn default_dimension_prefix() -> String {
    "dim_".to_owned()
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            metadata: default_metadata_table(),
            fact: default_fact_table(),
            dimension_prefix: default_dimension_prefix(),
        }
    }
}

/// Configuration for one warehouse build.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BuildConfig {
    /// Path to the input dataset (csv, parquet, json, jsonl)
    pub input: Option<PathBuf>,

    /// Path to the DuckDB database file; omitted means in-memory
    pub database: Option<PathBuf>,

    #[serde(default = "default_threshold")]
    pub categorical_threshold: i64,

    /// Display-label overrides by column name
    #[serde(default)]
    pub column_labels: HashMap<String, String>,

    #[serde(default)]
    pub tables: TableNames,
}

fn default_threshold() -> i64 {
    DEFAULT_CATEGORICAL_THRESHOLD
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: None,
            database: None,
            categorical_threshold: default_threshold(),
            column_labels: HashMap::new(),
            tables: TableNames::default(),
        }
    }
}

/// Loads a [`BuildConfig`] from a JSON file.
pub fn load_build_config(path: &Path) -> Result<BuildConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DashmartError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Loads display-label overrides from a JSON file of the form
/// `{"column_name": "Label", ...}`.
pub fn load_column_labels(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DashmartError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;
    let labels = serde_json::from_str(&content)?;
    Ok(labels)
}
