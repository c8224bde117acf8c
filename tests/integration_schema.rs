//! Integration tests for the full warehouse-build workflow.
//!
//! These run the complete pipeline on a realistic dashboard dataset and
//! verify the end-to-end results, including the DuckDB output.

use dashmart::db::WarehouseWriter;
use dashmart::schema::SchemaBuilder;
use dashmart::storage::{load_dataset, save_dataset};
use polars::prelude::*;
use std::collections::HashMap;

/// Typical dashboard input: an id, two bounded text columns, a measure,
/// and a text column with too many distinct values to be a dimension.
fn sample_df() -> DataFrame {
    df! {
        "id" => &[1i64, 2, 3, 4, 5],
        "category" => &["A", "B", "A", "C", "B"],
        "value" => &[0.12f64, 3.4, 2.2, 9.9, 4.5],
        "status" => &["active", "inactive", "active", "active", "inactive"],
        "high_cardinality" => &["val_100", "val_101", "val_102", "val_103", "val_104"],
    }
    .expect("valid fixture frame")
}

#[test]
fn test_full_build_on_sample_dataset() {
    let mut labels = HashMap::new();
    labels.insert("id".to_owned(), "Identifier".to_owned());
    labels.insert("category".to_owned(), "Category Name".to_owned());

    let schema = SchemaBuilder::new(sample_df())
        .with_threshold(4)
        .with_labels(labels)
        .build()
        .expect("build succeeds");

    // metadata covers every column in order
    let names: Vec<&str> = schema.metadata.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "category", "value", "status", "high_cardinality"]
    );

    // label overrides and defaults
    assert_eq!(schema.metadata[0].label, "Identifier");
    assert_eq!(schema.metadata[1].label, "Category Name");
    assert_eq!(schema.metadata[4].label, "High Cardinality");

    // category (3 distinct) and status (2 distinct) are within threshold 4;
    // high_cardinality (5 distinct) is not
    let categorical: Vec<&str> = schema
        .metadata
        .iter()
        .filter(|m| m.is_categorical)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(categorical, vec!["category", "status"]);

    // dimension sizes match distinct counts, ids contiguous from zero
    for dim in &schema.dimensions {
        let ids: Vec<i64> = dim.entries.iter().map(|e| e.id).collect();
        let expected: Vec<i64> = (0..dim.len() as i64).collect();
        assert_eq!(ids, expected, "ids not contiguous for {}", dim.column);
    }

    // fact table: same height, categorical columns now integer ids
    assert_eq!(schema.fact.height(), 5);
    let category_ids: Vec<i64> = schema
        .fact
        .column("category")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(category_ids, vec![0, 1, 0, 2, 1]);

    // non-categorical columns pass through untouched
    assert!(schema
        .fact
        .column("high_cardinality")
        .unwrap()
        .dtype()
        .is_string());
}

#[test]
fn test_round_trip_law() {
    let df = sample_df();
    let schema = SchemaBuilder::new(df.clone())
        .with_threshold(4)
        .build()
        .expect("build succeeds");

    for dim in &schema.dimensions {
        let original: Vec<String> = df
            .column(&dim.column)
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .map(str::to_owned)
            .collect();

        let restored: Vec<String> = schema
            .fact
            .column(&dim.column)
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .map(|id| dim.label_of(id).expect("id resolves").to_owned())
            .collect();

        assert_eq!(original, restored, "round trip failed for {}", dim.column);
    }
}

#[test]
fn test_build_twice_yields_identical_schemas() {
    let first = SchemaBuilder::new(sample_df())
        .with_threshold(4)
        .build()
        .expect("build succeeds");
    let second = SchemaBuilder::new(sample_df())
        .with_threshold(4)
        .build()
        .expect("build succeeds");

    assert_eq!(first.metadata, second.metadata);
    assert_eq!(first.dimensions, second.dimensions);
    assert!(first.fact.equals_missing(&second.fact));
}

#[test]
fn test_threshold_zero_produces_no_dimensions() {
    let schema = SchemaBuilder::new(sample_df())
        .with_threshold(0)
        .build()
        .expect("build succeeds");

    assert!(schema.dimensions.is_empty());
    assert!(schema.metadata.iter().all(|m| !m.is_categorical));
    // the fact table is then just a copy of the input
    assert!(schema.fact.equals_missing(&sample_df()));
}

#[test]
fn test_csv_to_duckdb_end_to_end() {
    let dir = tempfile::tempdir().expect("temp dir");

    // stage the fixture as a CSV file, as a real invocation would see it
    let csv_path = dir.path().join("input.csv");
    let mut df = sample_df();
    save_dataset(&mut df, &csv_path).expect("fixture saved");

    let loaded = load_dataset(&csv_path).expect("fixture loads");
    let schema = SchemaBuilder::new(loaded)
        .with_threshold(4)
        .build()
        .expect("build succeeds");

    let db_path = dir.path().join("warehouse.duckdb");
    let writer = WarehouseWriter::open(&db_path).expect("open database");
    writer.write_schema(&schema).expect("write succeeds");

    let mut tables = writer.table_names().expect("table listing");
    tables.sort();
    assert_eq!(
        tables,
        vec!["dim_category", "dim_status", "fact_table", "metadata"]
    );

    assert_eq!(writer.row_count("fact_table").unwrap(), 5);
    assert_eq!(writer.row_count("metadata").unwrap(), 5);
    assert_eq!(writer.row_count("dim_category").unwrap(), 3);
    assert_eq!(writer.row_count("dim_status").unwrap(), 2);

    // foreign-key-style join restores original labels
    let active_rows: i64 = writer
        .connection()
        .query_row(
            "SELECT count(*) FROM fact_table \
             JOIN dim_status ON fact_table.status = dim_status.value \
             WHERE dim_status.label = 'active'",
            [],
            |row| row.get(0),
        )
        .expect("join query");
    assert_eq!(active_rows, 3);
}
