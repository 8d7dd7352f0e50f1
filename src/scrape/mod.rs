//! Product scraping
//!
//! Fetching marketplace search results and ranking them.

pub mod fetcher;
pub mod ranker;
pub mod types;

pub use fetcher::{ProductSource, ProxyFetcher};
pub use ranker::{TOP_N, rank_top};
pub use types::{ProductRecord, RawListing, StoredRow};
