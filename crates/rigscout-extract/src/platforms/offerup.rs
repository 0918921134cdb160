use crate::html::{
    absolutize, account_age_days, body_text, dedupe_images, detect_currency, exists,
    json_ld_product, member_since_year, meta_content, parse_price_or_free, select_all_attr,
    select_attr, select_text,
};
use crate::strategy::{host_of, ExtractionStrategy, RawListing};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Platform, SellerInfo};
use scraper::Html;

const TITLE: &[&str] = &[r#"[data-testid="item-title"]"#, "h1"];
const PRICE: &[&str] = &[r#"[data-testid="item-price"]"#, r#"p[data-testid="item-detail-price"]"#];
const DESCRIPTION: &[&str] = &[
    r#"[data-testid="item-description"]"#,
    r#"[data-testid="item-detail-description"]"#,
];
const LOCATION: &[&str] = &[r#"[data-testid="item-location"]"#, r#"a[href*="/explore/"] span"#];
const SELLER_NAME: &[&str] = &[r#"[data-testid="seller-name"]"#, r#"a[href*="/p/"] span"#];
const SELLER_LINK: &[&str] = &[r#"a[data-testid="seller-link"]"#, r#"a[href*="/p/"]"#];
const RATING: &[&str] = &[r#"[data-testid="seller-rating"]"#];

static JOINED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)joined\s+(?:in\s+)?(?:[a-z]+\s+)?(\d{4})").expect("valid regex")
});
static RATING_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\((\d+)\)|\b(\d+)\s+ratings?\b").expect("valid regex"));
static STARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d(?:\.\d)?)\s*(?:out of 5|stars?)").expect("valid regex"));

/// OfferUp item pages (`offerup.com/item/detail/..`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferUpStrategy;

impl ExtractionStrategy for OfferUpStrategy {
    fn platform(&self) -> Platform {
        Platform::OfferUp
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url).is_some_and(|h| h == "offerup.com")
    }

    fn extract(&self, doc: &Html) -> RawListing {
        // OfferUp ships complete Product JSON-LD; prefer it over the rendered markup.
        let ld = json_ld_product(doc).unwrap_or_default();

        let title = ld
            .name
            .or_else(|| select_text(doc, TITLE))
            .or_else(|| meta_content(doc, "og:title"))
            .unwrap_or_default();

        let price_text = select_text(doc, PRICE).unwrap_or_default();
        let price = ld
            .price
            .or_else(|| parse_price_or_free(&price_text))
            .unwrap_or(0.0);
        let currency = ld
            .currency
            .unwrap_or_else(|| detect_currency(&price_text).to_string());

        let description = ld
            .description
            .or_else(|| select_text(doc, DESCRIPTION))
            .or_else(|| meta_content(doc, "og:description"))
            .unwrap_or_default();

        let location = select_text(doc, LOCATION)
            .or(ld.locality)
            .unwrap_or_else(|| "Unknown".to_string());

        RawListing {
            title,
            description,
            price,
            currency,
            location,
            posted_at: None,
        }
    }

    fn extract_seller(&self, doc: &Html) -> SellerInfo {
        let text = body_text(doc);
        let mut seller = SellerInfo {
            name: select_text(doc, SELLER_NAME)
                .or_else(|| json_ld_product(doc).and_then(|ld| ld.seller))
                .unwrap_or_else(|| "Unknown".to_string()),
            profile_url: select_attr(doc, SELLER_LINK, "href")
                .map(|href| absolutize("https://offerup.com", &href)),
            verified: exists(doc, r#"[data-testid="truyou-badge"]"#)
                || text.to_ascii_lowercase().contains("truyou"),
            ..SellerInfo::default()
        };

        if let Some(caps) = JOINED.captures(&text) {
            let since = caps[0].trim().to_string();
            seller.account_age_days = member_since_year(&since)
                .and_then(|year| account_age_days(year, Utc::now()));
            seller.member_since = Some(since);
        }

        let rating_label = select_attr(doc, RATING, "aria-label")
            .or_else(|| select_text(doc, RATING))
            .unwrap_or_default();
        seller.rating = STARS
            .captures(&rating_label)
            .and_then(|caps| caps[1].parse::<f32>().ok())
            .filter(|r| (0.0..=5.0).contains(r));
        seller.review_count = RATING_COUNT
            .captures(&rating_label)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        seller
    }

    fn extract_images(&self, doc: &Html, base_url: &str) -> Vec<String> {
        let mut images = json_ld_product(doc).map(|ld| ld.images).unwrap_or_default();
        images.extend(select_all_attr(doc, r#"[data-testid="item-image"] img"#, "src"));
        if images.is_empty() {
            images.extend(meta_content(doc, "og:image"));
        }
        dedupe_images(images.iter().map(|src| absolutize(base_url, src)).collect())
    }
}
