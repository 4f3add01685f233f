use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::core::constraints::CompiledPredicate;
use crate::models::BookableUnit;

/// Errors that can occur when interacting with the catalog store.
///
/// These are the only errors that abort a screening request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
}

/// Read-only access to the product catalog.
///
/// The store evaluates compiled predicates with null-aware comparisons and
/// returns full rows including the precomputed embeddings.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Total number of rows in the catalog, for the cardinality trail
    async fn count_all(&self) -> Result<usize, CatalogError>;

    /// Rows matching the compiled hard-constraint predicate
    async fn fetch_matching(
        &self,
        predicate: &CompiledPredicate,
    ) -> Result<Vec<BookableUnit>, CatalogError>;

    async fn health_check(&self) -> Result<(), CatalogError>;
}

const CATALOG_COLUMNS: &str = "product_id, option_id, unit_id, search_text, country, \
     embedding, latitude, longitude, location, start_date, end_date, \
     min_age, max_age, max_pax, price_amount, currency";

/// PostgreSQL-backed catalog store
pub struct PostgresCatalog {
    pool: PgPool,
    table: String,
}

impl PostgresCatalog {
    pub async fn new(
        database_url: &str,
        table: String,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool, table })
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalog {
    async fn count_all(&self) -> Result<usize, CatalogError> {
        let query = format!("SELECT COUNT(*) AS total FROM {}", self.table);
        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let total: i64 = row.get("total");
        Ok(total as usize)
    }

    async fn fetch_matching(
        &self,
        predicate: &CompiledPredicate,
    ) -> Result<Vec<BookableUnit>, CatalogError> {
        // Predicate values were escaped at compile time; the clause body is
        // appended verbatim as the WHERE condition
        let query = format!(
            "SELECT {} FROM {} WHERE {}",
            CATALOG_COLUMNS,
            self.table,
            predicate.sql()
        );

        tracing::debug!("Catalog query WHERE: {}", predicate.sql());

        let units = sqlx::query_as::<_, BookableUnit>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(units)
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
