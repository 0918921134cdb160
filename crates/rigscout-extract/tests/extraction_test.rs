use async_trait::async_trait;
use rigscout_core::Platform;
use rigscout_extract::{DocumentSource, FetchError, ParsedDocument, StrategyRegistry};
use std::collections::HashMap;

/// Serves canned markup keyed by URL.
struct FixtureSource {
    pages: HashMap<String, String>,
}

#[async_trait]
impl DocumentSource for FixtureSource {
    async fn fetch_and_parse(&self, url: &str) -> Result<ParsedDocument, FetchError> {
        self.pages
            .get(url)
            .map(|html| ParsedDocument::new(url, html.clone()))
            .ok_or_else(|| FetchError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn fixture_source() -> FixtureSource {
    let mut pages = HashMap::new();
    pages.insert(
        "https://denver.craigslist.org/sys/d/gaming-pc/7700000001.html".to_string(),
        r#"<html><body>
            <span id="titletextonly">Budget gaming PC GTX 1660 Super</span>
            <span class="price">$400</span>
            <section id="postingbody">i5-9400F, 16GB DDR4, 500GB SSD.</section>
        </body></html>"#
            .to_string(),
    );
    pages.insert(
        "https://www.ebay.com/itm/1111".to_string(),
        r#"<html><head>
            <meta property="og:title" content="Workstation Xeon">
            <script type="application/ld+json">
              {"@type":"Product","name":"Dell Precision Xeon W-2135","offers":{"price":"350.00","priceCurrency":"USD"}}
            </script>
        </head><body></body></html>"#
            .to_string(),
    );
    FixtureSource { pages }
}

#[tokio::test]
async fn test_fetch_select_extract() {
    let source = fixture_source();
    let registry = StrategyRegistry::with_defaults();

    let url = "https://denver.craigslist.org/sys/d/gaming-pc/7700000001.html";
    let doc = source.fetch_and_parse(url).await.unwrap();
    let strategy = registry.select(&doc.url).unwrap();
    let listing = strategy.extract_listing(&doc.parse(), &doc.url);

    assert_eq!(listing.platform, Platform::Craigslist);
    assert_eq!(listing.title, "Budget gaming PC GTX 1660 Super");
    assert!((listing.price - 400.0).abs() < f64::EPSILON);
    assert!(listing.full_text().contains("16GB DDR4"));
}

#[tokio::test]
async fn test_json_ld_fallback_when_markup_missing() {
    let source = fixture_source();
    let registry = StrategyRegistry::with_defaults();

    let url = "https://www.ebay.com/itm/1111";
    let doc = source.fetch_and_parse(url).await.unwrap();
    let listing = registry
        .select(url)
        .unwrap()
        .extract_listing(&doc.parse(), url);

    assert_eq!(listing.platform, Platform::Ebay);
    assert_eq!(listing.title, "Dell Precision Xeon W-2135");
    assert!((listing.price - 350.0).abs() < f64::EPSILON);
    assert_eq!(listing.location, "Unknown");
    assert!(listing.images.is_empty());
}

#[tokio::test]
async fn test_missing_page_is_http_error() {
    let source = fixture_source();
    let err = source
        .fetch_and_parse("https://offerup.com/item/detail/404")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 404, .. }));
}
