//! Shared test support: an in-memory listing table that records every
//! operation the engine performs against it.

// Each integration-test binary uses its own subset of this module.
#![allow(dead_code)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use listing_sync::error::{SyncError, SyncResult};
use listing_sync::listing::Listing;
use listing_sync::sync::{ListingTable, TrackedFields};

/// One operation the engine performed against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    EnsureTable,
    Lookup(i64),
    Insert(i64),
    Update(i64),
    Commit,
}

#[derive(Debug, Clone)]
pub struct StoredRow {
    pub listing: Listing,
    pub last_updated_date: NaiveDate,
}

/// In-memory [`ListingTable`] with an injected processing date and an
/// optional injected write fault.
pub struct MemoryTable {
    pub today: NaiveDate,
    pub rows: BTreeMap<i64, StoredRow>,
    pub ops: Vec<Op>,
    pub commits: usize,
    pub closed: bool,
    pub fail_inserts: bool,
}

impl MemoryTable {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            rows: BTreeMap::new(),
            ops: Vec::new(),
            commits: 0,
            closed: false,
            fail_inserts: false,
        }
    }

    /// Pre-populate rows as if written by an earlier run on `stamped`.
    pub fn seeded(today: NaiveDate, stamped: NaiveDate, listings: Vec<Listing>) -> Self {
        let mut table = Self::new(today);
        for listing in listings {
            table.rows.insert(
                listing.id,
                StoredRow {
                    listing,
                    last_updated_date: stamped,
                },
            );
        }
        table
    }

    /// Number of write operations (inserts + updates) recorded so far.
    pub fn writes(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Insert(_) | Op::Update(_)))
            .count()
    }
}

#[async_trait]
impl ListingTable for MemoryTable {
    async fn ensure_table(&mut self, _name: &str, _ddl: &str) -> SyncResult<()> {
        self.ops.push(Op::EnsureTable);
        Ok(())
    }

    async fn lookup(&mut self, id: i64) -> SyncResult<Option<TrackedFields>> {
        self.ops.push(Op::Lookup(id));
        Ok(self.rows.get(&id).map(|row| TrackedFields {
            price: row.listing.price,
            minimum_nights: row.listing.minimum_nights,
            last_review: Some(row.listing.last_review),
            reviews_per_month: Some(row.listing.reviews_per_month),
        }))
    }

    async fn insert(&mut self, listing: &Listing) -> SyncResult<()> {
        if self.fail_inserts {
            return Err(SyncError::Storage("injected insert failure".to_string()));
        }
        self.ops.push(Op::Insert(listing.id));
        self.rows.insert(
            listing.id,
            StoredRow {
                listing: listing.clone(),
                last_updated_date: self.today,
            },
        );
        Ok(())
    }

    async fn update(&mut self, id: i64, fields: &TrackedFields) -> SyncResult<()> {
        self.ops.push(Op::Update(id));
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| SyncError::Storage(format!("update of missing id {id}")))?;
        row.listing.price = fields.price;
        row.listing.minimum_nights = fields.minimum_nights;
        if let Some(d) = fields.last_review {
            row.listing.last_review = d;
        }
        if let Some(r) = fields.reviews_per_month {
            row.listing.reviews_per_month = r;
        }
        row.last_updated_date = self.today;
        Ok(())
    }

    async fn commit(&mut self) -> SyncResult<()> {
        self.ops.push(Op::Commit);
        self.commits += 1;
        Ok(())
    }

    async fn close(&mut self) -> SyncResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// A fully-populated listing with per-test id; other fields are stable
/// defaults tests override as needed.
pub fn listing(id: i64) -> Listing {
    Listing {
        id,
        name: format!("Listing {id}"),
        host_id: id * 10,
        host_name: "Ada".to_string(),
        neighbourhood_group: "Brooklyn".to_string(),
        neighbourhood: "Kensington".to_string(),
        latitude: 40.64749,
        longitude: -73.97237,
        room_type: "Private room".to_string(),
        price: 149,
        minimum_nights: 1,
        number_of_reviews: 9,
        last_review: NaiveDate::from_ymd_opt(2019, 5, 21).unwrap(),
        reviews_per_month: 0.21,
        calculated_host_listings_count: 6,
        availability_365: 365,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
