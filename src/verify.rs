//! Sanity checks shown after each cycle
//!
//! Field checks look only at the in-memory ranked list. Storage checks compare
//! that list against a fresh read-back from the store. Neither ever aborts the
//! cycle: a failing check is something to display.

use crate::config::ConnectionConfig;
use crate::db::ProductStore;
use crate::error::DbResult;
use crate::scrape::types::{ProductRecord, StoredRow};

const RATING_EPSILON: f64 = 1e-6;

/// Field-level validity of the ranked products
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChecks {
    pub total: usize,
    /// Ratings within [1, 5]
    pub valid_ratings: usize,
    /// Prices carrying the currency marker
    pub valid_prices: usize,
}

impl FieldChecks {
    pub fn compute(products: &[ProductRecord], currency: &str) -> Self {
        Self {
            total: products.len(),
            valid_ratings: products
                .iter()
                .filter(|p| (1.0..=5.0).contains(&p.rating))
                .count(),
            valid_prices: products
                .iter()
                .filter(|p| p.price.starts_with(currency))
                .count(),
        }
    }

    pub fn ratings_pass(&self) -> bool {
        self.valid_ratings == self.total
    }

    pub fn prices_pass(&self) -> bool {
        self.valid_prices == self.total
    }
}

/// What the store holds compared with what was scraped
#[derive(Debug, Clone, PartialEq)]
pub struct StorageChecks {
    pub scraped_count: usize,
    pub stored_count: i64,
    pub scraped_top: Option<ProductRecord>,
    pub stored_top: Option<StoredRow>,
}

impl StorageChecks {
    pub fn count_matches(&self) -> bool {
        i64::try_from(self.scraped_count).is_ok_and(|n| n == self.stored_count)
    }

    pub fn top_matches(&self) -> bool {
        match (&self.scraped_top, &self.stored_top) {
            (Some(scraped), Some(stored)) => {
                scraped.name == stored.name
                    && (scraped.rating - stored.rating).abs() < RATING_EPSILON
            }
            (None, None) => true,
            _ => false,
        }
    }
}

/// All checks for one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub fields: FieldChecks,
    /// Read-back failure is kept as its message for display
    pub storage: Result<StorageChecks, String>,
}

/// First product with the highest rating
pub fn top_rated(products: &[ProductRecord]) -> Option<&ProductRecord> {
    products.iter().fold(None, |best, p| match best {
        Some(b) if b.rating >= p.rating => Some(b),
        _ => Some(p),
    })
}

/// Read the store back and compare it with the ranked products
pub async fn verify_storage(
    store: &dyn ProductStore,
    config: &ConnectionConfig,
    products: &[ProductRecord],
) -> DbResult<StorageChecks> {
    let stored_count = store.count_rows(config).await?;
    let stored_top = store.top_rated_row(config).await?;
    Ok(StorageChecks {
        scraped_count: products.len(),
        stored_count,
        scraped_top: top_rated(products).cloned(),
        stored_top,
    })
}

/// Run field and storage checks; storage errors become display text
pub async fn verify(
    store: &dyn ProductStore,
    config: &ConnectionConfig,
    products: &[ProductRecord],
    currency: &str,
) -> Verification {
    let fields = FieldChecks::compute(products, currency);
    let storage = verify_storage(store, config, products)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "storage verification failed");
            format!("Database verification failed: {}", e)
        });
    Verification { fields, storage }
}
