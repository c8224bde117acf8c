//! Fact table materialization.

use crate::error::{DashmartError, Result};
use crate::schema::dimensions::DimensionTable;
use polars::prelude::*;
use std::collections::HashMap;

/// Produces the fact table: a full copy of `df` with every dimension
/// column's values replaced by surrogate ids (Int64). Columns without a
/// dimension table pass through unchanged, nulls included.
///
/// # Errors
///
/// Returns [`DashmartError::InconsistentDimension`] when a non-null value
/// has no entry in its dimension table. Dimensions extracted from the same
/// dataset always cover every value, so hitting this means the caller
/// supplied mismatched dimensions; the build aborts with no partial result.
pub fn materialize_fact(df: &DataFrame, dimensions: &[DimensionTable]) -> Result<DataFrame> {
    let mut columns = df.get_columns().to_vec();

    for dim in dimensions {
        let idx = df.get_column_index(&dim.column).ok_or_else(|| {
            DashmartError::DataProcessing(format!(
                "dimension column '{}' not found in dataset",
                dim.column
            ))
        })?;

        let lookup: HashMap<&str, i64> =
            dim.entries.iter().map(|e| (e.label.as_str(), e.id)).collect();

        let series = columns[idx].as_materialized_series();
        let ca = series.str()?;

        let mut ids: Vec<Option<i64>> = Vec::with_capacity(ca.len());
        for value in ca {
            match value {
                None => ids.push(None),
                Some(value) => match lookup.get(value) {
                    Some(id) => ids.push(Some(*id)),
                    None => {
                        return Err(DashmartError::InconsistentDimension {
                            column: dim.column.clone(),
                            value: value.to_owned(),
                        });
                    }
                },
            }
        }

        let replaced = Series::new(dim.column.as_str().into(), ids);
        columns[idx] = Column::from(replaced);
        tracing::info!(column = %dim.column, "replaced values with surrogate ids");
    }

    let fact = DataFrame::new(columns)?;
    debug_assert_eq!(fact.height(), df.height());
    tracing::info!(rows = fact.height(), "built fact table");
    Ok(fact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::dimensions::{extract_dimensions, DimensionEntry};
    use crate::schema::metadata::infer_metadata;

    fn sample_df() -> DataFrame {
        df! {
            "category" => &["A", "B", "A", "C", "B"],
            "value" => &[10i64, 20, 30, 40, 50],
        }
        .expect("valid test frame")
    }

    fn dimensions_for(df: &DataFrame, threshold: i64) -> Vec<DimensionTable> {
        let metadata = infer_metadata(df, threshold, None).expect("inference succeeds");
        extract_dimensions(df, &metadata).expect("extraction succeeds")
    }

    #[test]
    fn test_categorical_values_replaced_by_ids() {
        let df = sample_df();
        let dims = dimensions_for(&df, 4);
        let fact = materialize_fact(&df, &dims).expect("materialization succeeds");

        let ids: Vec<i64> = fact
            .column("category")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(ids, vec![0, 1, 0, 2, 1]);
    }

    #[test]
    fn test_non_categorical_columns_untouched() {
        let df = sample_df();
        let dims = dimensions_for(&df, 4);
        let fact = materialize_fact(&df, &dims).expect("materialization succeeds");

        let values: Vec<i64> = fact
            .column("value")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_row_count_preserved() {
        let df = sample_df();
        let dims = dimensions_for(&df, 4);
        let fact = materialize_fact(&df, &dims).expect("materialization succeeds");
        assert_eq!(fact.height(), df.height());
    }

    #[test]
    fn test_input_dataset_not_mutated() {
        let df = sample_df();
        let dims = dimensions_for(&df, 4);
        let _ = materialize_fact(&df, &dims).expect("materialization succeeds");

        // source column still holds the original strings
        assert!(df.column("category").unwrap().dtype().is_string());
    }

    #[test]
    fn test_nulls_stay_null() {
        let df = df! {
            "status" => &[Some("active"), None, Some("inactive")],
        }
        .expect("valid test frame");
        let dims = dimensions_for(&df, 50);
        let fact = materialize_fact(&df, &dims).expect("materialization succeeds");

        let col = fact.column("status").unwrap();
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.i64().unwrap().get(0), Some(0));
        assert_eq!(col.i64().unwrap().get(1), None);
    }

    #[test]
    fn test_round_trip_restores_original_values() {
        let df = sample_df();
        let dims = dimensions_for(&df, 4);
        let fact = materialize_fact(&df, &dims).expect("materialization succeeds");

        let dim = &dims[0];
        let restored: Vec<&str> = fact
            .column("category")
            .unwrap()
            .i64()
            .unwrap()
            .into_no_null_iter()
            .map(|id| dim.label_of(id).expect("id has a label"))
            .collect();
        assert_eq!(restored, vec!["A", "B", "A", "C", "B"]);
    }

    #[test]
    fn test_mismatched_dimensions_fail_fast() {
        let df = sample_df();
        let dims = vec![DimensionTable {
            column: "category".to_owned(),
            entries: vec![DimensionEntry { id: 0, label: "A".to_owned() }],
        }];

        let err = materialize_fact(&df, &dims).unwrap_err();
        match err {
            DashmartError::InconsistentDimension { column, value } => {
                assert_eq!(column, "category");
                assert_eq!(value, "B");
            }
            other => panic!("expected InconsistentDimension, got {other}"),
        }
    }
}
