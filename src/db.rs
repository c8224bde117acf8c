//! DuckDB persistence adapter.
//!
//! Consumes a [`StarSchema`] and materializes it as warehouse tables: one
//! metadata table, one `dim_<column>` table per categorical column
//! (`value` id + `label` columns), and the fact table, created through a
//! staging table joined against every dimension so the foreign-key
//! relationships are exercised at load time.
//!
//! The schema engine knows nothing about this module; it hands over plain
//! data and this adapter does the rest.

use crate::error::Result;
use crate::schema::dimensions::DimensionTable;
use crate::schema::metadata::{metadata_to_dataframe, ColumnMetadata};
use crate::schema::StarSchema;
use duckdb::types::Value;
use duckdb::{appender_params_from_iter, Connection};
use polars::prelude::*;
use std::path::Path;

pub const DEFAULT_METADATA_TABLE: &str = "metadata";
pub const DEFAULT_FACT_TABLE: &str = "fact_table";
pub const DEFAULT_DIMENSION_PREFIX: &str = "dim_";

const FACT_STAGING_TABLE: &str = "_fact_staging";

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// DuckDB column type for a Polars dtype. The warehouse keeps all integer
/// widths as BIGINT so surrogate ids join without casts.
fn duckdb_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "BIGINT",
        DataType::Float32 | DataType::Float64 => "DOUBLE",
        DataType::Boolean => "BOOLEAN",
        DataType::Date => "DATE",
        DataType::Datetime(_, _) => "TIMESTAMP",
        _ => "VARCHAR",
    }
}

fn duckdb_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Boolean(b),
        AnyValue::String(s) => Value::Text(s.to_owned()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        AnyValue::Int8(v) => Value::BigInt(v as i64),
        AnyValue::Int16(v) => Value::BigInt(v as i64),
        AnyValue::Int32(v) => Value::BigInt(v as i64),
        AnyValue::Int64(v) => Value::BigInt(v),
        AnyValue::UInt8(v) => Value::BigInt(v as i64),
        AnyValue::UInt16(v) => Value::BigInt(v as i64),
        AnyValue::UInt32(v) => Value::BigInt(v as i64),
        AnyValue::UInt64(v) => Value::BigInt(v as i64),
        AnyValue::Float32(v) => Value::Double(v as f64),
        AnyValue::Float64(v) => Value::Double(v),
        AnyValue::Date(days) => Value::Date32(days),
        AnyValue::Datetime(v, unit, _) => Value::Timestamp(duckdb_time_unit(unit), v),
        AnyValue::DatetimeOwned(v, unit, _) => Value::Timestamp(duckdb_time_unit(unit), v),
        other => Value::Text(other.to_string()),
    }
}

fn duckdb_time_unit(unit: TimeUnit) -> duckdb::types::TimeUnit {
    match unit {
        TimeUnit::Nanoseconds => duckdb::types::TimeUnit::Nanosecond,
        TimeUnit::Microseconds => duckdb::types::TimeUnit::Microsecond,
        TimeUnit::Milliseconds => duckdb::types::TimeUnit::Millisecond,
    }
}

/// Writes star-schema artifacts into a DuckDB database.
pub struct WarehouseWriter {
    conn: Connection,
}

impl WarehouseWriter {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "opened warehouse database");
        Ok(Self { conn })
    }

    /// Opens an in-memory database, discarded on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates `table` with a schema derived from `df` and bulk-loads every
    /// row through an appender.
    fn create_table_from_df(&self, table: &str, df: &DataFrame) -> Result<()> {
        let schema = df.schema();
        let mut column_definitions = Vec::with_capacity(df.width());
        for (name, dtype) in schema.iter() {
            column_definitions.push(format!("{} {}", quote_ident(name), duckdb_type(dtype)));
        }

        self.conn.execute_batch(&format!(
            "CREATE TABLE {} ({});",
            quote_ident(table),
            column_definitions.join(", ")
        ))?;

        let columns = df.get_columns();
        let mut appender = self.conn.appender(table)?;
        for row in 0..df.height() {
            let mut values = Vec::with_capacity(columns.len());
            for column in columns {
                values.push(duckdb_value(column.get(row)?));
            }
            appender.append_row(appender_params_from_iter(values))?;
        }
        appender.flush()?;

        Ok(())
    }

    /// Writes the column-metadata table.
    pub fn write_metadata(&self, metadata: &[ColumnMetadata], table: &str) -> Result<()> {
        let df = metadata_to_dataframe(metadata)?;
        self.create_table_from_df(table, &df)?;
        tracing::info!(table, "wrote metadata table");
        Ok(())
    }

    /// Writes one `<prefix><column>` table per dimension.
    pub fn write_dimensions(&self, dimensions: &[DimensionTable], prefix: &str) -> Result<()> {
        for dim in dimensions {
            let table = format!("{prefix}{}", dim.column);
            let df = dim.to_dataframe()?;
            self.create_table_from_df(&table, &df)?;
            tracing::info!(table, rows = dim.len(), "wrote dimension table");
        }
        Ok(())
    }

    /// Writes the fact table. The DataFrame lands in a staging table first,
    /// then the final table is created through a `SELECT` that left-joins
    /// every dimension on `fact.<column> = dim.value`, which both validates
    /// the surrogate-id references and mirrors how dashboards will query
    /// the schema. The staging table is dropped afterwards.
    pub fn write_fact(
        &self,
        fact: &DataFrame,
        dimensions: &[DimensionTable],
        table: &str,
        dimension_prefix: &str,
    ) -> Result<()> {
        self.create_table_from_df(FACT_STAGING_TABLE, fact)?;

        let staging = quote_ident(FACT_STAGING_TABLE);
        let mut join_clauses = Vec::with_capacity(dimensions.len());
        for dim in dimensions {
            let dim_table = quote_ident(&format!("{dimension_prefix}{}", dim.column));
            join_clauses.push(format!(
                "LEFT JOIN {dim_table} ON {staging}.{column} = {dim_table}.\"value\"",
                column = quote_ident(&dim.column),
            ));
        }

        // Drop the staging table whether or not the join succeeds, so a
        // failed build leaves no residue in a file-backed database.
        let created = self.conn.execute_batch(&format!(
            "CREATE TABLE {table} AS SELECT {staging}.* FROM {staging} {joins};",
            table = quote_ident(table),
            joins = join_clauses.join(" "),
        ));
        let dropped = self
            .conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {staging};"));
        created?;
        dropped?;

        tracing::info!(table, rows = fact.height(), "wrote fact table");
        Ok(())
    }

    /// Writes all three table families with the default names.
    pub fn write_schema(&self, schema: &StarSchema) -> Result<()> {
        self.write_schema_as(
            schema,
            DEFAULT_METADATA_TABLE,
            DEFAULT_FACT_TABLE,
            DEFAULT_DIMENSION_PREFIX,
        )
    }

    /// Writes all three table families with caller-chosen names.
    pub fn write_schema_as(
        &self,
        schema: &StarSchema,
        metadata_table: &str,
        fact_table: &str,
        dimension_prefix: &str,
    ) -> Result<()> {
        self.write_metadata(&schema.metadata, metadata_table)?;
        self.write_dimensions(&schema.dimensions, dimension_prefix)?;
        self.write_fact(&schema.fact, &schema.dimensions, fact_table, dimension_prefix)?;
        Ok(())
    }

    /// Names of all tables in the database.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SHOW TABLES")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Column name/type pairs of one table, as reported by `DESCRIBE`.
    pub fn describe(&self, table: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare(&format!("DESCRIBE {}", quote_ident(table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Row count of one table.
    pub fn row_count(&self, table: &str) -> Result<i64> {
        let count = self.conn.query_row(
            &format!("SELECT count(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count)
    }
}
