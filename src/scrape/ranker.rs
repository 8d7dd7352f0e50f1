//! Top-N ranking by rating

use crate::scrape::types::ProductRecord;

/// How many products a cycle keeps
pub const TOP_N: usize = 5;

/// Sort by rating, highest first, and keep the first `n`.
///
/// The sort is stable: equal ratings keep their input order.
pub fn rank_top(mut records: Vec<ProductRecord>, n: usize) -> Vec<ProductRecord> {
    records.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    records.truncate(n);
    records
}
