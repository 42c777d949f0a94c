//! The fixed 16-field listing record and its extraction from a cleaned
//! dataset.

use chrono::NaiveDate;

use crate::error::{SyncError, SyncResult};
use crate::sync::table::TrackedFields;
use crate::types::{DataSet, Schema, Value};

/// One listing record, the unit of reconciliation.
///
/// `id` is the identity key: unique, immutable once inserted, and the sole
/// lookup key against the target table.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub host_id: i64,
    pub host_name: String,
    pub neighbourhood_group: String,
    pub neighbourhood: String,
    pub latitude: f64,
    pub longitude: f64,
    pub room_type: String,
    pub price: i64,
    pub minimum_nights: i64,
    pub number_of_reviews: i64,
    pub last_review: NaiveDate,
    pub reviews_per_month: f64,
    pub calculated_host_listings_count: i64,
    pub availability_365: i64,
}

impl Listing {
    /// Project the mutable fields whose change triggers an update.
    pub fn tracked(&self) -> TrackedFields {
        TrackedFields {
            price: self.price,
            minimum_nights: self.minimum_nights,
            last_review: Some(self.last_review),
            reviews_per_month: Some(self.reviews_per_month),
        }
    }

    /// Extract listings from a normalized, null-resolved dataset.
    ///
    /// The dataset must provide all 16 listing columns with committed types
    /// compatible with the contract (integer columns accept `Int64`, float
    /// columns additionally accept widened `Int64`).
    ///
    /// # Errors
    ///
    /// [`SyncError::SchemaMismatch`] if a required column is absent,
    /// [`SyncError::TypeMismatch`] if a committed column type cannot satisfy
    /// the contract.
    pub fn from_dataset(dataset: &DataSet) -> SyncResult<Vec<Listing>> {
        let cols = Columns::resolve(&dataset.schema)?;
        dataset
            .rows
            .iter()
            .map(|row| {
                Ok(Listing {
                    id: int_field(row, cols.id, "id")?,
                    name: text_field(row, cols.name, "name")?,
                    host_id: int_field(row, cols.host_id, "host_id")?,
                    host_name: text_field(row, cols.host_name, "host_name")?,
                    neighbourhood_group: text_field(
                        row,
                        cols.neighbourhood_group,
                        "neighbourhood_group",
                    )?,
                    neighbourhood: text_field(row, cols.neighbourhood, "neighbourhood")?,
                    latitude: float_field(row, cols.latitude, "latitude")?,
                    longitude: float_field(row, cols.longitude, "longitude")?,
                    room_type: text_field(row, cols.room_type, "room_type")?,
                    price: int_field(row, cols.price, "price")?,
                    minimum_nights: int_field(row, cols.minimum_nights, "minimum_nights")?,
                    number_of_reviews: int_field(row, cols.number_of_reviews, "number_of_reviews")?,
                    last_review: date_field(row, cols.last_review, "last_review")?,
                    reviews_per_month: float_field(row, cols.reviews_per_month, "reviews_per_month")?,
                    calculated_host_listings_count: int_field(
                        row,
                        cols.calculated_host_listings_count,
                        "calculated_host_listings_count",
                    )?,
                    availability_365: int_field(row, cols.availability_365, "availability_365")?,
                })
            })
            .collect()
    }
}

/// Resolved column indexes for the listing contract.
struct Columns {
    id: usize,
    name: usize,
    host_id: usize,
    host_name: usize,
    neighbourhood_group: usize,
    neighbourhood: usize,
    latitude: usize,
    longitude: usize,
    room_type: usize,
    price: usize,
    minimum_nights: usize,
    number_of_reviews: usize,
    last_review: usize,
    reviews_per_month: usize,
    calculated_host_listings_count: usize,
    availability_365: usize,
}

impl Columns {
    fn resolve(schema: &Schema) -> SyncResult<Self> {
        let index = |name: &str| {
            schema.index_of(name).ok_or_else(|| SyncError::SchemaMismatch {
                message: format!(
                    "missing required column '{name}'. columns={:?}",
                    schema.field_names().collect::<Vec<_>>()
                ),
            })
        };
        Ok(Self {
            id: index("id")?,
            name: index("name")?,
            host_id: index("host_id")?,
            host_name: index("host_name")?,
            neighbourhood_group: index("neighbourhood_group")?,
            neighbourhood: index("neighbourhood")?,
            latitude: index("latitude")?,
            longitude: index("longitude")?,
            room_type: index("room_type")?,
            price: index("price")?,
            minimum_nights: index("minimum_nights")?,
            number_of_reviews: index("number_of_reviews")?,
            last_review: index("last_review")?,
            reviews_per_month: index("reviews_per_month")?,
            calculated_host_listings_count: index("calculated_host_listings_count")?,
            availability_365: index("availability_365")?,
        })
    }
}

fn mismatch(column: &str, expected: &'static str, found: &Value) -> SyncError {
    SyncError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: format!("{found:?}"),
    }
}

fn int_field(row: &[Value], idx: usize, column: &str) -> SyncResult<i64> {
    match row.get(idx) {
        Some(Value::Int64(v)) => Ok(*v),
        Some(other) => Err(mismatch(column, "integer", other)),
        None => Err(mismatch(column, "integer", &Value::Null)),
    }
}

fn float_field(row: &[Value], idx: usize, column: &str) -> SyncResult<f64> {
    match row.get(idx) {
        Some(Value::Float64(v)) => Ok(*v),
        // A float column whose snapshot values all happened to be whole
        // numbers commits as Int64; widen it.
        Some(Value::Int64(v)) => Ok(*v as f64),
        Some(other) => Err(mismatch(column, "float", other)),
        None => Err(mismatch(column, "float", &Value::Null)),
    }
}

fn text_field(row: &[Value], idx: usize, column: &str) -> SyncResult<String> {
    match row.get(idx) {
        Some(Value::Utf8(v)) => Ok(v.clone()),
        Some(other) => Err(mismatch(column, "text", other)),
        None => Err(mismatch(column, "text", &Value::Null)),
    }
}

fn date_field(row: &[Value], idx: usize, column: &str) -> SyncResult<NaiveDate> {
    match row.get(idx) {
        Some(Value::Date(v)) => Ok(*v),
        Some(other) => Err(mismatch(column, "date", other)),
        None => Err(mismatch(column, "date", &Value::Null)),
    }
}
