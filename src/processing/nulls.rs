//! Missing-value substitution.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::{DataSet, DataType, Value};

/// Replacement for missing values in text columns.
pub const UNKNOWN_TEXT: &str = "UNKNOWN";

/// Replace every missing value according to the column's committed type.
///
/// - Text columns: the literal `"UNKNOWN"`.
/// - Numeric columns: `0` / `0.0`.
/// - Date columns: the statistical mode of the column, tie-broken by the
///   first value achieving the maximum frequency in column order; an
///   entirely-missing date column falls back to the Unix epoch.
///
/// After this pass no [`Value::Null`] remains anywhere in the dataset.
pub fn resolve_nulls(mut dataset: DataSet) -> DataSet {
    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let filler = match field.data_type {
            DataType::Utf8 => Value::Utf8(UNKNOWN_TEXT.to_string()),
            DataType::Int64 => Value::Int64(0),
            DataType::Float64 => Value::Float64(0.0),
            DataType::Date => Value::Date(date_mode(&dataset, idx)),
        };
        for row in &mut dataset.rows {
            if row.get(idx).is_some_and(Value::is_null) {
                row[idx] = filler.clone();
            }
        }
    }
    dataset
}

/// Most frequent date in the column; first-in-column-order wins ties.
fn date_mode(dataset: &DataSet, idx: usize) -> NaiveDate {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for value in dataset.column(idx) {
        if let Value::Date(d) = value {
            *counts.entry(*d).or_insert(0) += 1;
        }
    }

    let Some(max) = counts.values().copied().max() else {
        // Mode of an empty column is undefined; fall back to the epoch.
        return NaiveDate::default();
    };
    dataset
        .column(idx)
        .find_map(|value| match value {
            Value::Date(d) if counts.get(d) == Some(&max) => Some(*d),
            _ => None,
        })
        .unwrap_or_default()
}
