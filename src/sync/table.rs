//! The table-handle seam the reconciliation engine writes through.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::SyncResult;
use crate::listing::Listing;

/// The mutable fields whose change on an existing row triggers an update and
/// an audit-date bump.
///
/// Comparison is derived `PartialEq`: exact value equality, including
/// `reviews_per_month` (bit-exact floats; representation drift between the
/// snapshot and the stored row forces an update rather than a miss).
/// `last_review` and `reviews_per_month` are optional because rows written
/// before the null policy may hold SQL NULL; NULL versus any snapshot value
/// counts as a change.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFields {
    pub price: i64,
    pub minimum_nights: i64,
    pub last_review: Option<NaiveDate>,
    pub reviews_per_month: Option<f64>,
}

/// Handle to the persistent listing table.
///
/// One handle is owned exclusively by the reconciliation engine for the
/// duration of a run. Writes accumulate until [`ListingTable::commit`];
/// whether an uncommitted run leaves partial state is up to the backing
/// store.
#[async_trait]
pub trait ListingTable: Send {
    /// Create the table if it does not exist. Idempotent.
    async fn ensure_table(&mut self, name: &str, ddl: &str) -> SyncResult<()>;

    /// Fetch the tracked fields of the row with this `id`, if present.
    async fn lookup(&mut self, id: i64) -> SyncResult<Option<TrackedFields>>;

    /// Insert a new row with all 16 fields; the store assigns
    /// `last_updated_date` from its current processing date.
    async fn insert(&mut self, listing: &Listing) -> SyncResult<()>;

    /// Overwrite exactly the tracked fields of an existing row and advance
    /// `last_updated_date` to the current processing date.
    async fn update(&mut self, id: i64, fields: &TrackedFields) -> SyncResult<()>;

    /// Commit the run's accumulated writes as one unit.
    async fn commit(&mut self) -> SyncResult<()>;

    /// Release the handle's resources; uncommitted writes are discarded.
    async fn close(&mut self) -> SyncResult<()>;
}

/// Bootstrap DDL for the 17-column listing table (16 listing fields plus the
/// server-stamped `last_updated_date`).
pub fn default_listing_ddl(table_name: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table_name} (\n\
         \x20   id BIGINT PRIMARY KEY,\n\
         \x20   name VARCHAR(255),\n\
         \x20   host_id BIGINT,\n\
         \x20   host_name VARCHAR(255),\n\
         \x20   neighbourhood_group VARCHAR(255),\n\
         \x20   neighbourhood VARCHAR(255),\n\
         \x20   latitude DOUBLE PRECISION,\n\
         \x20   longitude DOUBLE PRECISION,\n\
         \x20   room_type VARCHAR(255),\n\
         \x20   price BIGINT,\n\
         \x20   minimum_nights BIGINT,\n\
         \x20   number_of_reviews BIGINT,\n\
         \x20   last_review DATE,\n\
         \x20   reviews_per_month DOUBLE PRECISION,\n\
         \x20   calculated_host_listings_count BIGINT,\n\
         \x20   availability_365 BIGINT,\n\
         \x20   last_updated_date DATE\n\
         )"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ddl_names_all_seventeen_columns() {
        let ddl = default_listing_ddl("listings");
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS listings"));
        for column in [
            "id",
            "name",
            "host_id",
            "host_name",
            "neighbourhood_group",
            "neighbourhood",
            "latitude",
            "longitude",
            "room_type",
            "price",
            "minimum_nights",
            "number_of_reviews",
            "last_review",
            "reviews_per_month",
            "calculated_host_listings_count",
            "availability_365",
            "last_updated_date",
        ] {
            assert!(ddl.contains(column), "ddl is missing column {column}");
        }
    }

    #[test]
    fn tracked_fields_compare_exactly() {
        let a = TrackedFields {
            price: 100,
            minimum_nights: 2,
            last_review: None,
            reviews_per_month: Some(0.3),
        };
        let mut b = a.clone();
        assert_eq!(a, b);
        b.reviews_per_month = Some(0.3 + f64::EPSILON);
        assert_ne!(a, b);
        b.reviews_per_month = None;
        assert_ne!(a, b);
    }
}
