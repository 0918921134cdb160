//! Extraction strategy contract and the ordered strategy registry.

use crate::platforms::{CraigslistStrategy, EbayStrategy, FacebookStrategy, OfferUpStrategy};
use chrono::{DateTime, Utc};
use rigscout_core::{Listing, Platform, SellerInfo};
use scraper::Html;
use std::sync::Arc;
use tracing::debug;

/// Listing fields as printed on the page, before enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawListing {
    /// Listing title, empty when missing
    pub title: String,
    /// Body text, empty when missing
    pub description: String,
    /// Asking price, 0 when missing or unparseable
    pub price: f64,
    /// ISO currency code
    pub currency: String,
    /// Location label, "Unknown" when missing
    pub location: String,
    /// Posting time if the page exposes one
    pub posted_at: Option<DateTime<Utc>>,
}

impl Default for RawListing {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: 0.0,
            currency: "USD".to_string(),
            location: "Unknown".to_string(),
            posted_at: None,
        }
    }
}

/// Per-marketplace page reader.
///
/// Every method must return defaults for missing fields instead of failing;
/// a page that yields nothing is still a listing with an empty title.
pub trait ExtractionStrategy: Send + Sync {
    /// Marketplace this strategy reads.
    fn platform(&self) -> Platform;

    /// True if this strategy understands pages at `url`.
    fn can_handle(&self, url: &str) -> bool;

    /// Title, description, price, currency, location and posting time.
    fn extract(&self, doc: &Html) -> RawListing;

    /// Seller metadata.
    fn extract_seller(&self, doc: &Html) -> SellerInfo;

    /// Absolute image URLs, deduplicated, in page order.
    fn extract_images(&self, doc: &Html, base_url: &str) -> Vec<String>;

    /// Run every extraction step and assemble a [`Listing`].
    fn extract_listing(&self, doc: &Html, url: &str) -> Listing {
        let raw = self.extract(doc);
        let mut listing = Listing::new(self.platform(), url, raw.title, raw.price);
        listing.description = raw.description;
        listing.currency = raw.currency;
        listing.location = raw.location;
        listing.posted_at = raw.posted_at;
        listing.seller = self.extract_seller(doc);
        listing.images = self.extract_images(doc, url);
        listing
    }
}

/// Ordered list of strategies; the first one that can handle a URL wins.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn ExtractionStrategy>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in marketplace strategies.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CraigslistStrategy));
        registry.register(Arc::new(FacebookStrategy));
        registry.register(Arc::new(OfferUpStrategy));
        registry.register(Arc::new(EbayStrategy));
        registry
    }

    /// Append a strategy. Earlier registrations take precedence.
    pub fn register(&mut self, strategy: Arc<dyn ExtractionStrategy>) {
        debug!(platform = %strategy.platform(), "registered extraction strategy");
        self.strategies.push(strategy);
    }

    /// First strategy that can handle `url`.
    #[must_use]
    pub fn select(&self, url: &str) -> Option<Arc<dyn ExtractionStrategy>> {
        self.strategies.iter().find(|s| s.can_handle(url)).cloned()
    }

    /// Platforms in registration order.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.strategies.iter().map(|s| s.platform()).collect()
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// True if no strategy is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Lowercased host of `url` without a leading `www.` or `m.`.
pub(crate) fn host_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host)
        .to_string();
    Some(host)
}

/// Path component of `url`, empty when unparseable.
pub(crate) fn path_of(url: &str) -> String {
    url::Url::parse(url.trim())
        .map(|u| u.path().to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Catchall;

    impl ExtractionStrategy for Catchall {
        fn platform(&self) -> Platform {
            Platform::Craigslist
        }
        fn can_handle(&self, _url: &str) -> bool {
            true
        }
        fn extract(&self, _doc: &Html) -> RawListing {
            RawListing::default()
        }
        fn extract_seller(&self, _doc: &Html) -> SellerInfo {
            SellerInfo::default()
        }
        fn extract_images(&self, _doc: &Html, _base_url: &str) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn test_default_registry_routes_by_host() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.len(), 4);

        let cases = [
            ("https://sfbay.craigslist.org/sby/sys/d/gaming-pc/7712345678.html", Platform::Craigslist),
            ("https://www.facebook.com/marketplace/item/123456789/", Platform::FacebookMarketplace),
            ("https://offerup.com/item/detail/1234567890", Platform::OfferUp),
            ("https://www.ebay.com/itm/204512345678", Platform::Ebay),
        ];
        for (url, platform) in cases {
            let strategy = registry.select(url).expect("strategy for url");
            assert_eq!(strategy.platform(), platform, "{url}");
        }
    }

    #[test]
    fn test_unknown_host_has_no_strategy() {
        let registry = StrategyRegistry::with_defaults();
        assert!(registry.select("https://example.com/listing/1").is_none());
        assert!(registry.select("https://www.facebook.com/groups/pcmr").is_none());
        assert!(registry.select("not a url").is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = StrategyRegistry::new();
        registry.register(Arc::new(Catchall));
        registry.register(Arc::new(EbayStrategy));
        let chosen = registry.select("https://www.ebay.com/itm/1").unwrap();
        assert_eq!(chosen.platform(), Platform::Craigslist);
    }

    #[test]
    fn test_host_of_strips_prefixes() {
        assert_eq!(host_of("https://WWW.eBay.com/itm/1").as_deref(), Some("ebay.com"));
        assert_eq!(host_of("https://m.facebook.com/marketplace/item/1").as_deref(), Some("facebook.com"));
        assert_eq!(host_of("garbage"), None);
    }
}
