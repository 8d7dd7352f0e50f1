//! Product record types
//!
//! A [`RawListing`] is what the HTML gave us; a [`ProductRecord`] is a listing
//! that had everything we need.

/// Text pulled out of one search-result element, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub name: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub reviews: Option<String>,
}

/// A complete, validated product listing
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    /// Currency-prefixed price text, e.g. `₹12,999`
    pub price: String,
    /// Star rating, nominally 1–5
    pub rating: f64,
    pub reviews: u32,
}

/// A persisted product row
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub rating: f64,
    pub reviews: u32,
}

impl RawListing {
    /// Validate into a record.
    ///
    /// Returns `None` when name, price or rating is missing or the rating
    /// text does not start with a finite number.
    pub fn into_record(self, currency: &str) -> Option<ProductRecord> {
        let name = non_empty(self.name)?;
        let price = non_empty(self.price)?;
        let rating = parse_rating(self.rating.as_deref()?)?;
        let reviews = self.reviews.as_deref().and_then(parse_reviews).unwrap_or(0);

        Some(ProductRecord {
            name,
            price: format_price(&price, currency),
            rating,
            reviews,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the leading number of a rating such as `"4.5 out of 5 stars"`
pub fn parse_rating(text: &str) -> Option<f64> {
    text.split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
}

/// Parse a thousands-separated review count such as `"1,234"`
pub fn parse_reviews(text: &str) -> Option<u32> {
    text.trim().replace(',', "").parse::<u32>().ok()
}

/// Prefix the currency marker; the marketplace leaves a trailing `.` on whole prices
pub fn format_price(whole: &str, currency: &str) -> String {
    let whole = whole.trim().trim_end_matches('.');
    format!("{}{}", currency, whole)
}

impl ProductRecord {
    /// Number of filled stars when the rating is shown on a 5-star scale
    pub fn star_count(&self) -> usize {
        self.rating.round().clamp(0.0, 5.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, price: &str, rating: &str, reviews: Option<&str>) -> RawListing {
        RawListing {
            name: Some(name.to_string()),
            price: Some(price.to_string()),
            rating: Some(rating.to_string()),
            reviews: reviews.map(str::to_string),
        }
    }

    #[test]
    fn test_into_record_full_listing() {
        let record = listing("Washing Machine X", "12,999", "4.5 out of 5 stars", Some("1,234"))
            .into_record("\u{20b9}")
            .unwrap();
        assert_eq!(
            record,
            ProductRecord {
                name: "Washing Machine X".to_string(),
                price: "\u{20b9}12,999".to_string(),
                rating: 4.5,
                reviews: 1234,
            }
        );
    }

    #[test]
    fn test_missing_reviews_default_to_zero() {
        let record = listing("Fridge", "20,000", "4.1 out of 5 stars", None)
            .into_record("\u{20b9}")
            .unwrap();
        assert_eq!(record.reviews, 0);
    }

    #[test]
    fn test_malformed_reviews_default_to_zero() {
        let record = listing("Fridge", "20,000", "4.1 out of 5 stars", Some("(2.1K)"))
            .into_record("\u{20b9}")
            .unwrap();
        assert_eq!(record.reviews, 0);
    }

    #[test]
    fn test_missing_required_fields() {
        let mut raw = listing("A", "1", "4.0 out of 5 stars", None);
        raw.name = None;
        assert!(raw.into_record("$").is_none());

        let mut raw = listing("A", "1", "4.0 out of 5 stars", None);
        raw.price = None;
        assert!(raw.into_record("$").is_none());

        let mut raw = listing("A", "1", "4.0 out of 5 stars", None);
        raw.rating = None;
        assert!(raw.into_record("$").is_none());
    }

    #[test]
    fn test_blank_name_counts_as_missing() {
        assert!(listing("   ", "1", "4.0", None).into_record("$").is_none());
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
        assert_eq!(parse_rating("  3 stars"), Some(3.0));
        assert_eq!(parse_rating("five stars"), None);
        assert_eq!(parse_rating("NaN out of 5"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn test_parse_reviews() {
        assert_eq!(parse_reviews("1,234"), Some(1234));
        assert_eq!(parse_reviews(" 12,345,678 "), Some(12_345_678));
        assert_eq!(parse_reviews("abc"), None);
    }

    #[test]
    fn test_format_price_strips_trailing_point() {
        assert_eq!(format_price("12,999.", "\u{20b9}"), "\u{20b9}12,999");
        assert_eq!(format_price(" 499 ", "$"), "$499");
    }

    #[test]
    fn test_star_count() {
        let mut record = listing("A", "1", "4.5", None).into_record("$").unwrap();
        assert_eq!(record.star_count(), 5);
        record.rating = 4.4;
        assert_eq!(record.star_count(), 4);
        record.rating = 9.0;
        assert_eq!(record.star_count(), 5);
    }
}
