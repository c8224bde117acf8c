use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use dashmart::config::{load_build_config, load_column_labels, BuildConfig};
use dashmart::db::WarehouseWriter;
use dashmart::schema::SchemaBuilder;
use dashmart::storage::load_dataset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dashmart", about = "Star-schema warehouse builder for dashboard datasets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the warehouse: metadata, dimension, and fact tables in DuckDB
    Build {
        /// Path to the input dataset (CSV, Parquet, JSON, JSONL)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Path to the DuckDB database file. Omitted means in-memory
        /// (useful only for a dry run).
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Maximum distinct values for a text column to become a dimension
        #[arg(short, long)]
        threshold: Option<i64>,

        /// Path to a JSON file of column-label overrides
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Path to a JSON build configuration; flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Name of the metadata table
        #[arg(long)]
        metadata_table: Option<String>,

        /// Name of the fact table
        #[arg(long)]
        fact_table: Option<String>,

        /// Prefix for dimension table names
        #[arg(long)]
        dim_prefix: Option<String>,
    },
    /// Infer and print column metadata without writing a database
    Inspect {
        /// Path to the input dataset (CSV, Parquet, JSON, JSONL)
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum distinct values for a text column to become a dimension
        #[arg(short, long, default_value_t = dashmart::schema::DEFAULT_CATEGORICAL_THRESHOLD)]
        threshold: i64,

        /// Path to a JSON file of column-label overrides
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Print the metadata as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            input,
            database,
            threshold,
            labels,
            config,
            metadata_table,
            fact_table,
            dim_prefix,
        } => {
            let config = resolve_config(
                config,
                input,
                database,
                threshold,
                labels,
                metadata_table,
                fact_table,
                dim_prefix,
            )?;
            handle_build(config)
        }
        Commands::Inspect {
            input,
            threshold,
            labels,
            json,
        } => handle_inspect(input, threshold, labels, json),
    }
}

/// Starts from the config file when given, then lets CLI flags win.
#[allow(clippy::too_many_arguments)]
fn resolve_config(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    database: Option<PathBuf>,
    threshold: Option<i64>,
    labels_path: Option<PathBuf>,
    metadata_table: Option<String>,
    fact_table: Option<String>,
    dim_prefix: Option<String>,
) -> Result<BuildConfig> {
    let mut config = match config_path {
        Some(path) => load_build_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BuildConfig::default(),
    };

    if let Some(input) = input {
        config.input = Some(input);
    }
    if let Some(database) = database {
        config.database = Some(database);
    }
    if let Some(threshold) = threshold {
        config.categorical_threshold = threshold;
    }
    if let Some(path) = labels_path {
        config.column_labels = load_column_labels(&path)
            .with_context(|| format!("Failed to load labels from {}", path.display()))?;
    }
    if let Some(name) = metadata_table {
        config.tables.metadata = name;
    }
    if let Some(name) = fact_table {
        config.tables.fact = name;
    }
    if let Some(prefix) = dim_prefix {
        config.tables.dimension_prefix = prefix;
    }

    Ok(config)
}

fn handle_build(config: BuildConfig) -> Result<()> {
    let input = config
        .input
        .ok_or_else(|| anyhow::anyhow!("No input dataset provided (--input or config file)"))?;

    let df = load_dataset(&input).context("Failed to load dataset")?;
    println!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        input.display()
    );

    let mut builder = SchemaBuilder::new(df).with_threshold(config.categorical_threshold);
    if !config.column_labels.is_empty() {
        builder = builder.with_labels(config.column_labels);
    }
    let schema = builder.build().context("Failed to build star schema")?;
    println!(
        "Built schema: {} columns, {} dimension tables",
        schema.metadata.len(),
        schema.dimensions.len()
    );

    let writer = match &config.database {
        Some(path) => WarehouseWriter::open(path)?,
        None => {
            println!("No database path given; writing to an in-memory database (discarded on exit).");
            WarehouseWriter::open_in_memory()?
        }
    };
    writer.write_schema_as(
        &schema,
        &config.tables.metadata,
        &config.tables.fact,
        &config.tables.dimension_prefix,
    )?;

    println!("Created tables:");
    for table in writer.table_names()? {
        println!("  {table}: {} rows", writer.row_count(&table)?);
        for (column, column_type) in writer.describe(&table)? {
            println!("    {column}: {column_type}");
        }
    }
    if let Some(path) = &config.database {
        println!("Warehouse written to {}", path.display());
    }
    Ok(())
}

fn handle_inspect(
    input: PathBuf,
    threshold: i64,
    labels_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let df = load_dataset(&input).context("Failed to load dataset")?;

    let mut builder = SchemaBuilder::new(df).with_threshold(threshold);
    if let Some(path) = labels_path {
        let labels = load_column_labels(&path)
            .with_context(|| format!("Failed to load labels from {}", path.display()))?;
        builder = builder.with_labels(labels);
    }
    let metadata = builder.metadata_table()?;

    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    println!(
        "{:<24} {:<24} {:<16} {:<10} categorical",
        "name", "label", "native_type", "sql_type"
    );
    for column in metadata {
        println!(
            "{:<24} {:<24} {:<16} {:<10} {}",
            column.name, column.label, column.native_type, column.sql_type, column.is_categorical
        );
    }
    Ok(())
}
