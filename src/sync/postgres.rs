//! sqlx-backed PostgreSQL table handle.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres};
use sqlx::{PgConnection, Transaction};

use crate::config::SyncConfig;
use crate::connectors::credentials::{CredentialKind, CredentialProvider};
use crate::error::{SyncError, SyncResult};
use crate::listing::Listing;

use super::table::{ListingTable, TrackedFields};

/// One connection, one transaction per run: writes accumulate on the
/// transaction and become visible at [`ListingTable::commit`].
pub struct PgListingTable {
    pool: PgPool,
    txn: Option<Transaction<'static, Postgres>>,
    table_name: String,
}

#[derive(sqlx::FromRow)]
struct TrackedRow {
    price: i64,
    minimum_nights: i64,
    last_review: Option<NaiveDate>,
    reviews_per_month: Option<f64>,
}

impl From<TrackedRow> for TrackedFields {
    fn from(row: TrackedRow) -> Self {
        TrackedFields {
            price: row.price,
            minimum_nights: row.minimum_nights,
            last_review: row.last_review,
            reviews_per_month: row.reviews_per_month,
        }
    }
}

impl PgListingTable {
    /// Connect to the configured database and open the run's transaction.
    ///
    /// Database credentials come from the injected provider (`key` is the
    /// username, `secret` the password); host, port, and database name come
    /// from [`SyncConfig::database`].
    pub async fn connect(
        config: &SyncConfig,
        provider: &dyn CredentialProvider,
    ) -> SyncResult<Self> {
        let creds = provider.get_credentials(CredentialKind::Database)?;
        let options = PgConnectOptions::new()
            .host(&config.database.host)
            .port(config.database.port)
            .database(&config.database.database)
            .username(&creds.key)
            .password(&creds.secret);

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let txn = pool.begin().await?;

        Ok(Self {
            pool,
            txn: Some(txn),
            table_name: config.table_name.clone(),
        })
    }

    fn conn(&mut self) -> SyncResult<&mut PgConnection> {
        self.txn
            .as_deref_mut()
            .ok_or_else(|| SyncError::Storage("transaction already closed".to_string()))
    }
}

#[async_trait]
impl ListingTable for PgListingTable {
    async fn ensure_table(&mut self, name: &str, ddl: &str) -> SyncResult<()> {
        let conn = self.conn()?;
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

        if !exists {
            sqlx::query(ddl).execute(&mut *conn).await?;
        }
        Ok(())
    }

    async fn lookup(&mut self, id: i64) -> SyncResult<Option<TrackedFields>> {
        let sql = format!(
            "SELECT price, minimum_nights, last_review, reviews_per_month \
             FROM {} WHERE id = $1",
            self.table_name
        );
        let conn = self.conn()?;
        let row = sqlx::query_as::<_, TrackedRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(TrackedFields::from))
    }

    async fn insert(&mut self, listing: &Listing) -> SyncResult<()> {
        let sql = format!(
            "INSERT INTO {} (\
                 id, name, host_id, host_name, neighbourhood_group, neighbourhood, \
                 latitude, longitude, room_type, price, minimum_nights, number_of_reviews, \
                 last_review, reviews_per_month, calculated_host_listings_count, \
                 availability_365, last_updated_date\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, CURRENT_DATE)",
            self.table_name
        );
        let conn = self.conn()?;
        sqlx::query(&sql)
            .bind(listing.id)
            .bind(&listing.name)
            .bind(listing.host_id)
            .bind(&listing.host_name)
            .bind(&listing.neighbourhood_group)
            .bind(&listing.neighbourhood)
            .bind(listing.latitude)
            .bind(listing.longitude)
            .bind(&listing.room_type)
            .bind(listing.price)
            .bind(listing.minimum_nights)
            .bind(listing.number_of_reviews)
            .bind(listing.last_review)
            .bind(listing.reviews_per_month)
            .bind(listing.calculated_host_listings_count)
            .bind(listing.availability_365)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn update(&mut self, id: i64, fields: &TrackedFields) -> SyncResult<()> {
        let sql = format!(
            "UPDATE {} SET \
                 price = $1, \
                 minimum_nights = $2, \
                 last_review = $3, \
                 reviews_per_month = $4, \
                 last_updated_date = CURRENT_DATE \
             WHERE id = $5",
            self.table_name
        );
        let conn = self.conn()?;
        sqlx::query(&sql)
            .bind(fields.price)
            .bind(fields.minimum_nights)
            .bind(fields.last_review)
            .bind(fields.reviews_per_month)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn commit(&mut self) -> SyncResult<()> {
        let txn = self
            .txn
            .take()
            .ok_or_else(|| SyncError::Storage("transaction already closed".to_string()))?;
        txn.commit().await?;
        Ok(())
    }

    async fn close(&mut self) -> SyncResult<()> {
        if let Some(txn) = self.txn.take() {
            txn.rollback().await?;
        }
        self.pool.close().await;
        Ok(())
    }
}
