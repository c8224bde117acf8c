//! # Dashmart - Star-Schema Warehouse Builder
//!
//! Dashmart turns a flat tabular dataset into a small star-schema data
//! warehouse: a fact table, a dimension (lookup) table per categorical
//! column, and a metadata table describing every column. The result is
//! written into an embedded DuckDB database ready for dashboarding.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dashmart::schema::SchemaBuilder;
//! use dashmart::db::WarehouseWriter;
//! use dashmart::storage::load_dataset;
//! use std::path::Path;
//!
//! # fn example() -> dashmart::error::Result<()> {
//! let df = load_dataset(Path::new("sales.csv"))?;
//!
//! let schema = SchemaBuilder::new(df).with_threshold(50).build()?;
//! for dim in &schema.dimensions {
//!     println!("{}: {} distinct values", dim.column, dim.len());
//! }
//!
//! let writer = WarehouseWriter::open(Path::new("warehouse.duckdb"))?;
//! writer.write_schema(&schema)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`schema`]: metadata inference, dimension extraction, fact
//!   materialization, and the builder that sequences them
//! - [`db`]: DuckDB persistence adapter consuming the builder's output
//! - [`storage`]: extension-dispatched dataset loading and saving
//! - [`config`]: JSON build configuration
//! - [`error`]: error types and the crate [`error::Result`] alias
//! - [`logging`]: tracing setup (console + rolling file)
//!
//! ## Key Concepts
//!
//! A text column whose distinct non-null value count stays at or below the
//! categorical threshold becomes a *dimension*: its values get surrogate
//! ids (0-based, first-occurrence order) and the fact table stores the ids
//! instead of the values. Everything else passes through unchanged. The
//! build never mutates the input dataset and is deterministic: the same
//! dataset and threshold always produce identical tables.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod schema;
pub mod storage;
