//! Column type inference and coercion.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{DataSet, DataType, Field, RawDataset, Schema, Value};

/// Date formats accepted by the date rule, in match order.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Timestamp formats accepted by the date rule; the time part is discarded.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Infer and apply one type per column, producing a typed [`DataSet`].
///
/// For each column the coercion rules are tried in strict priority order —
/// integer, float, date, text — and the first rule that **every** non-missing
/// value satisfies is committed for the whole column. A single failing value
/// demotes the column to the next rule; text always succeeds, so no column is
/// ever an error. Missing cells are ignored by inference and coerce to
/// [`Value::Null`] (an entirely-missing column vacuously commits to integer).
pub fn normalize(raw: RawDataset) -> DataSet {
    let fields: Vec<Field> = raw
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let committed = infer_column_type(
                raw.rows
                    .iter()
                    .filter_map(|row| row.get(idx).and_then(|cell| cell.as_deref())),
            );
            Field::new(name.clone(), committed)
        })
        .collect();

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            fields
                .iter()
                .enumerate()
                .map(|(idx, field)| {
                    coerce(row.get(idx).and_then(|cell| cell.as_deref()), field.data_type)
                })
                .collect()
        })
        .collect();

    DataSet::new(Schema::new(fields), rows)
}

/// Decide the committed type for one column from its non-missing values.
pub fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> DataType {
    let mut all_int = true;
    let mut all_float = true;
    let mut all_date = true;

    for raw in values {
        let v = raw.trim();
        if all_int && v.parse::<i64>().is_err() {
            all_int = false;
        }
        if all_float && v.parse::<f64>().is_err() {
            all_float = false;
        }
        if all_date && parse_date(v).is_none() {
            all_date = false;
        }
        if !all_int && !all_float && !all_date {
            return DataType::Utf8;
        }
    }

    if all_int {
        DataType::Int64
    } else if all_float {
        DataType::Float64
    } else if all_date {
        DataType::Date
    } else {
        DataType::Utf8
    }
}

/// Parse one calendar date or timestamp.
pub fn parse_date(v: &str) -> Option<NaiveDate> {
    let v = v.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn coerce(cell: Option<&str>, committed: DataType) -> Value {
    let Some(v) = cell else {
        return Value::Null;
    };
    // The committed rule already held for every non-missing value; a failing
    // parse here can only come from hand-built raw data and degrades to Null.
    match committed {
        DataType::Int64 => v
            .trim()
            .parse::<i64>()
            .map(Value::Int64)
            .unwrap_or(Value::Null),
        DataType::Float64 => v
            .trim()
            .parse::<f64>()
            .map(Value::Float64)
            .unwrap_or(Value::Null),
        DataType::Date => parse_date(v).map(Value::Date).unwrap_or(Value::Null),
        DataType::Utf8 => Value::Utf8(v.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(columns: &[&str], rows: &[&[Option<&str>]]) -> RawDataset {
        RawDataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    #[test]
    fn all_integer_column_commits_int64() {
        let ds = normalize(raw(&["n"], &[&[Some("1")], &[Some("-7")], &[Some("042")]]));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(ds.rows[2][0], Value::Int64(42));
    }

    #[test]
    fn decimal_value_demotes_to_float64() {
        let ds = normalize(raw(&["n"], &[&[Some("1")], &[Some("2.5")]]));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(ds.rows[0][0], Value::Float64(1.0));
        assert_eq!(ds.rows[1][0], Value::Float64(2.5));
    }

    #[test]
    fn date_column_commits_date() {
        let ds = normalize(raw(
            &["d"],
            &[&[Some("2019-05-21")], &[Some("2019-06-23 14:00:00")]],
        ));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Date);
        assert_eq!(
            ds.rows[0][0],
            Value::Date(NaiveDate::from_ymd_opt(2019, 5, 21).unwrap())
        );
        assert_eq!(
            ds.rows[1][0],
            Value::Date(NaiveDate::from_ymd_opt(2019, 6, 23).unwrap())
        );
    }

    #[test]
    fn one_bad_value_rejects_the_whole_column() {
        // All-or-nothing per column: one non-numeric cell demotes everything.
        let ds = normalize(raw(&["n"], &[&[Some("1")], &[Some("two")], &[Some("3")]]));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Utf8);
        assert_eq!(ds.rows[0][0], Value::Utf8("1".to_string()));
    }

    #[test]
    fn missing_values_are_ignored_by_inference() {
        let ds = normalize(raw(&["n"], &[&[Some("1")], &[None], &[Some("3")]]));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
        assert_eq!(ds.rows[1][0], Value::Null);
    }

    #[test]
    fn entirely_missing_column_commits_int64() {
        let ds = normalize(raw(&["n"], &[&[None], &[None]]));
        assert_eq!(ds.schema.fields[0].data_type, DataType::Int64);
        assert!(ds.rows.iter().all(|row| row[0].is_null()));
    }

    #[test]
    fn per_column_decisions_are_independent() {
        let ds = normalize(raw(
            &["id", "lat", "seen", "label"],
            &[&[Some("1"), Some("40.64"), Some("2019-05-21"), Some("x")]],
        ));
        let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Int64, DataType::Float64, DataType::Date, DataType::Utf8]
        );
    }

    #[test]
    fn parse_date_accepts_known_formats_only() {
        assert!(parse_date("2019-05-21").is_some());
        assert!(parse_date("2019/05/21").is_some());
        assert!(parse_date("05/21/2019").is_some());
        assert!(parse_date("2019-05-21T08:30:00").is_some());
        assert!(parse_date("21 May 2019").is_none());
        assert!(parse_date("not a date").is_none());
    }
}
