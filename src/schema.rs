//! Star-schema construction engine.
//!
//! Pipeline: [`metadata::infer_metadata`] flags the categorical columns,
//! [`dimensions::extract_dimensions`] builds one lookup table per flag, and
//! [`fact::materialize_fact`] swaps categorical values for surrogate ids.
//! [`builder::SchemaBuilder`] sequences the three and caches each stage.
//!
//! The engine performs no I/O and never mutates caller-owned data; feeding
//! the result into a warehouse is [`crate::db`]'s job.

pub mod builder;
pub mod dimensions;
pub mod fact;
pub mod metadata;

pub use builder::{SchemaBuilder, StarSchema};
pub use dimensions::{extract_dimensions, DimensionEntry, DimensionTable};
pub use fact::materialize_fact;
pub use metadata::{
    default_label, infer_metadata, metadata_to_dataframe, sql_type_for, ColumnMetadata,
    DEFAULT_CATEGORICAL_THRESHOLD,
};
