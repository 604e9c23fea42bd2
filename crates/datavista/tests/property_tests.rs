//! Property-based tests for DataVista.
//!
//! These tests use proptest to generate random tables and verify that
//! profiling, coercion and null remediation keep their invariants.
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p datavista --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p datavista --test property_tests
//! ```

use proptest::prelude::*;

use datavista::{
    CoercionResult, Column, DataType, DataVista, Profiler, SourceFormat, Table, Value,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Generate a single cell of any kind, nulls included.
fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => Just(Value::Null),
        2 => (-1000i64..1000).prop_map(Value::Integer),
        1 => (-1.0e6f64..1.0e6).prop_map(Value::Float),
        1 => any::<bool>().prop_map(Value::Boolean),
        2 => "[a-z0-9 .\\-]{0,12}".prop_map(Value::text),
    ]
}

/// Generate a column of mixed cells with between 1 and 40 rows.
fn mixed_column() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(cell(), 1..40)
}

/// Generate text cells that look numeric, with the occasional blank.
fn numeric_like() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            3 => (-10_000i64..10_000).prop_map(|i| Value::text(i.to_string())),
            1 => "[a-z]{1,4}".prop_map(Value::text),
            1 => Just(Value::Null),
        ],
        1..40,
    )
}

fn table_of(values: Vec<Value>) -> Table {
    Table::new(vec![Column::inferred("target", values)]).expect("single column table")
}

// =============================================================================
// Profiling Properties
// =============================================================================

mod profile_tests {
    use super::*;

    proptest! {
        /// Nulls and non-nulls always add up to the row count.
        #[test]
        fn counts_partition_rows(values in mixed_column()) {
            let table = table_of(values);
            let profile = Profiler::new().profile(&table).unwrap();
            let column = &profile.columns[0];

            prop_assert_eq!(column.null_count + column.total_count, table.row_count());
            prop_assert!(column.unique_count <= column.total_count);
            prop_assert_eq!(column.duplicate_count, column.total_count - column.unique_count);
        }

        /// Profiling is deterministic.
        #[test]
        fn profiling_is_deterministic(values in mixed_column()) {
            let table = table_of(values);
            let first = Profiler::new().profile(&table).unwrap();
            let second = Profiler::new().profile(&table).unwrap();

            prop_assert_eq!(first, second);
        }
    }
}

// =============================================================================
// Coercion Properties
// =============================================================================

mod coercion_tests {
    use super::*;

    proptest! {
        /// A rejected coercion leaves the table exactly as it was.
        #[test]
        fn rejection_leaves_table_untouched(values in numeric_like()) {
            let mut table = table_of(values);
            let before = table.clone();

            let result = DataVista::new()
                .coerce(&mut table, "target", DataType::Integer)
                .unwrap();

            match result {
                CoercionResult::Rejected(rows) => {
                    prop_assert!(!rows.is_empty());
                    prop_assert!(rows.windows(2).all(|w| w[0] < w[1]));
                    prop_assert_eq!(table, before);
                }
                CoercionResult::Success(column) => {
                    prop_assert_eq!(column.data_type, DataType::Integer);
                    prop_assert_eq!(column.null_count(), before.columns()[0].null_count());
                }
            }
        }

        /// Coercion never panics, whatever the cells and target.
        #[test]
        fn never_panics(
            values in mixed_column(),
            target in prop::sample::select(DataType::TARGETS.to_vec()),
        ) {
            let mut table = table_of(values);
            let _ = DataVista::new().coerce(&mut table, "target", target);
        }

        /// Text coercion always succeeds and keeps nulls where they were.
        #[test]
        fn text_keeps_null_positions(values in mixed_column()) {
            let mut table = table_of(values);
            let nulls = table.columns()[0].null_rows();

            let result = DataVista::new()
                .coerce(&mut table, "target", DataType::Text)
                .unwrap();

            prop_assert!(result.is_success());
            prop_assert_eq!(table.columns()[0].null_rows(), nulls);
        }
    }
}

// =============================================================================
// Null Remediation Properties
// =============================================================================

mod remediation_tests {
    use super::*;

    proptest! {
        /// Replacement fills exactly the rows find_nulls reported.
        #[test]
        fn replace_fills_reported_rows(
            values in mixed_column(),
            literal in "[a-z0-9]{1,8}",
        ) {
            let vista = DataVista::new();
            let mut table = table_of(values);
            let nulls = vista.find_nulls(&table, "target").unwrap();

            let replacement = vista.replace_nulls(&mut table, "target", &literal).unwrap();

            prop_assert_eq!(&replacement.rows, &nulls);
            prop_assert!(vista.find_nulls(&table, "target").unwrap().is_empty());
            for row in nulls {
                prop_assert_eq!(table.get(row, 0), Some(&Value::text(literal.as_str())));
            }
        }
    }
}

// =============================================================================
// Export Properties
// =============================================================================

mod export_tests {
    use super::*;

    proptest! {
        /// Exported text cells reload to the same table.
        #[test]
        fn export_reloads_text_columns(
            rows in prop::collection::vec(("v[a-z ,]{0,10}", "w[a-z]{0,6}"), 1..20),
        ) {
            let vista = DataVista::new();
            let (left, right): (Vec<String>, Vec<String>) = rows.into_iter().unzip();
            let table = Table::new(vec![
                Column::inferred("left", left.into_iter().map(Value::from).collect()),
                Column::inferred("right", right.into_iter().map(Value::from).collect()),
            ])
            .unwrap();

            let export = vista.export_csv(&table).unwrap();
            let reloaded = vista.load_bytes(export.bytes(), SourceFormat::Csv).unwrap();

            prop_assert_eq!(reloaded.shape(), table.shape());
            for row in 0..table.row_count() {
                prop_assert_eq!(reloaded.get(row, 0), table.get(row, 0));
                prop_assert_eq!(reloaded.get(row, 1), table.get(row, 1));
            }
        }
    }
}
