//! Marketplace search scraping
//!
//! One GET through the scraping proxy, then HTML parsing into product records.

use crate::config::settings::ScraperSettings;
use crate::error::{FetchError, FetchResult};
use crate::scrape::types::{ProductRecord, RawListing};
use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Everything except RFC 3986 unreserved characters gets encoded
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Marketplace search-result selectors
struct ListingSelectors {
    item: Selector,
    name: Selector,
    price: Selector,
    rating: Selector,
    reviews: Selector,
}

static SELECTORS: LazyLock<ListingSelectors> = LazyLock::new(|| ListingSelectors {
    item: selector(".s-main-slot .s-result-item"),
    name: selector(".a-size-medium.a-color-base.a-text-normal"),
    price: selector(".a-price-whole"),
    rating: selector(".a-icon-alt"),
    reviews: selector(".s-link-style .a-size-base"),
});

fn selector(css: &str) -> Selector {
    // Only called with the literals above.
    Selector::parse(css).expect("static selector must parse")
}

/// Source of product records for a search query
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetch and parse listings for `query`. Records are complete but unranked.
    async fn fetch(&self, query: &str) -> FetchResult<Vec<ProductRecord>>;
}

/// Fetches marketplace search pages through a scraping proxy
pub struct ProxyFetcher {
    client: reqwest::Client,
    settings: ScraperSettings,
}

impl ProxyFetcher {
    pub fn new(settings: ScraperSettings) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Marketplace search URL for a query (also shown for manual checking)
    pub fn search_url(&self, query: &str) -> String {
        search_url(&self.settings.marketplace_url, query)
    }

    /// Full proxy request URL, carrying the search URL as a parameter
    pub fn request_url(&self, query: &str) -> FetchResult<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FetchError::MissingApiKey)?;

        let mut url = format!(
            "{}?api_key={}&url={}",
            self.settings.endpoint,
            utf8_percent_encode(api_key, QUERY_VALUE),
            utf8_percent_encode(&self.search_url(query), QUERY_VALUE)
        );
        if self.settings.render {
            url.push_str("&render=true");
        }
        Ok(url)
    }
}

/// `<marketplace>?k=<query>`
pub fn search_url(marketplace_url: &str, query: &str) -> String {
    format!(
        "{}?k={}",
        marketplace_url,
        utf8_percent_encode(query, QUERY_VALUE)
    )
}

#[async_trait]
impl ProductSource for ProxyFetcher {
    async fn fetch(&self, query: &str) -> FetchResult<Vec<ProductRecord>> {
        let url = self.request_url(query)?;

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(query, error = %e, "scraping proxy request failed");
            FetchError::Request(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(query, %status, "scraping proxy returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let records = parse_listings(&body, &self.settings.currency);
        tracing::info!(query, count = records.len(), "parsed marketplace listings");
        Ok(records)
    }
}

/// Extract the raw text fields of every search-result element
pub fn extract_listings(html: &str) -> Vec<RawListing> {
    let doc = Html::parse_document(html);
    let sel = &*SELECTORS;

    doc.select(&sel.item)
        .map(|item| RawListing {
            name: first_text(&item, &sel.name),
            price: first_text(&item, &sel.price),
            rating: first_text(&item, &sel.rating),
            reviews: first_text(&item, &sel.reviews),
        })
        .collect()
}

/// Parse a search page into complete records, skipping incomplete listings
pub fn parse_listings(html: &str, currency: &str) -> Vec<ProductRecord> {
    let listings = extract_listings(html);
    let total = listings.len();

    let records: Vec<ProductRecord> = listings
        .into_iter()
        .filter_map(|raw| {
            let record = raw.clone().into_record(currency);
            if record.is_none() {
                tracing::debug!(?raw, "skipping incomplete listing");
            }
            record
        })
        .collect();

    if records.len() < total {
        tracing::debug!(kept = records.len(), total, "dropped incomplete listings");
    }
    records
}

fn first_text(item: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    item.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
