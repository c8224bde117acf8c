//! Schema orchestration: metadata -> dimensions -> fact, each computed once.

use crate::error::{DashmartError, Result};
use crate::schema::dimensions::{extract_dimensions, DimensionTable};
use crate::schema::fact::materialize_fact;
use crate::schema::metadata::{
    infer_metadata, ColumnMetadata, DEFAULT_CATEGORICAL_THRESHOLD,
};
use polars::prelude::*;
use std::collections::HashMap;

/// Complete output of a schema build: the three artifact families a
/// persistence adapter needs to materialize a star schema.
#[derive(Debug, Clone)]
pub struct StarSchema {
    /// One record per input column, in column order
    pub metadata: Vec<ColumnMetadata>,

    /// One lookup table per categorical column, in column order
    pub dimensions: Vec<DimensionTable>,

    /// The input dataset with categorical values replaced by surrogate ids
    pub fact: DataFrame,
}

/// Sequences metadata inference, dimension extraction, and fact
/// materialization over one dataset.
///
/// Each stage is computed at most once per builder instance; requesting a
/// later stage triggers any missing earlier stage. The stage slots are plain
/// `Option`s, so "already computed" is explicit state rather than a
/// reflection trick. A new build requires a new builder.
///
/// ```no_run
/// use dashmart::schema::SchemaBuilder;
/// use polars::prelude::*;
///
/// # fn run() -> dashmart::error::Result<()> {
/// let df = df! { "category" => &["A", "B", "A"] }.unwrap();
/// let schema = SchemaBuilder::new(df).with_threshold(10).build()?;
/// println!("{} dimension tables", schema.dimensions.len());
/// # Ok(())
/// # }
/// ```
pub struct SchemaBuilder {
    df: DataFrame,
    categorical_threshold: i64,
    column_labels: Option<HashMap<String, String>>,
    metadata: Option<Vec<ColumnMetadata>>,
    dimensions: Option<Vec<DimensionTable>>,
    fact: Option<DataFrame>,
}

impl SchemaBuilder {
    /// Creates a builder over `df` with the default categorical threshold.
    /// The builder owns its copy of the dataset; the caller's data is never
    /// mutated.
    pub fn new(df: DataFrame) -> Self {
        Self {
            df,
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            column_labels: None,
            metadata: None,
            dimensions: None,
            fact: None,
        }
    }

    /// Sets the distinct-value ceiling for categorical detection.
    /// Validated when metadata inference runs.
    pub fn with_threshold(mut self, categorical_threshold: i64) -> Self {
        self.categorical_threshold = categorical_threshold;
        self
    }

    /// Sets display-label overrides by column name.
    pub fn with_labels(mut self, column_labels: HashMap<String, String>) -> Self {
        self.column_labels = Some(column_labels);
        self
    }

    /// The dataset this builder operates on.
    pub fn dataset(&self) -> &DataFrame {
        &self.df
    }

    /// Column metadata, inferred on first call and cached afterwards.
    pub fn metadata_table(&mut self) -> Result<&[ColumnMetadata]> {
        if self.metadata.is_none() {
            let metadata = infer_metadata(
                &self.df,
                self.categorical_threshold,
                self.column_labels.as_ref(),
            )?;
            self.metadata = Some(metadata);
        }
        Ok(self.metadata.as_deref().unwrap_or(&[]))
    }

    /// Dimension tables for the categorical columns, extracted on first call
    /// and cached afterwards. Triggers metadata inference when needed.
    pub fn dimension_tables(&mut self) -> Result<&[DimensionTable]> {
        if self.dimensions.is_none() {
            self.metadata_table()?;
            let metadata = self.metadata.as_deref().unwrap_or(&[]);
            let dimensions = extract_dimensions(&self.df, metadata)?;
            self.dimensions = Some(dimensions);
        }
        Ok(self.dimensions.as_deref().unwrap_or(&[]))
    }

    /// The fact table, materialized on first call and cached afterwards.
    /// Triggers any missing earlier stage.
    pub fn fact_table(&mut self) -> Result<&DataFrame> {
        if self.fact.is_none() {
            self.dimension_tables()?;
            let dimensions = self.dimensions.as_deref().unwrap_or(&[]);
            let fact = materialize_fact(&self.df, dimensions)?;
            self.fact = Some(fact);
        }
        match &self.fact {
            Some(fact) => Ok(fact),
            None => Err(DashmartError::DataProcessing(
                "fact table missing after materialization".to_owned(),
            )),
        }
    }

    /// Runs the full pipeline and returns all three artifacts together.
    /// On error nothing is exposed; the caller re-invokes with fixed input.
    pub fn build(mut self) -> Result<StarSchema> {
        self.fact_table()?;

        match (self.metadata, self.dimensions, self.fact) {
            (Some(metadata), Some(dimensions), Some(fact)) => Ok(StarSchema {
                metadata,
                dimensions,
                fact,
            }),
            _ => Err(DashmartError::DataProcessing(
                "schema build finished with a missing stage".to_owned(),
            )),
        }
    }
}
