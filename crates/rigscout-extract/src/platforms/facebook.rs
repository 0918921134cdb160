use crate::html::{
    absolutize, account_age_days, body_text, dedupe_images, detect_currency, exists,
    json_ld_product, member_since_year, meta_content, parse_price_or_free, select_all_attr,
    select_attr, select_text,
};
use crate::strategy::{host_of, path_of, ExtractionStrategy, RawListing};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Platform, SellerInfo};
use scraper::Html;

const TITLE: &[&str] = &[
    r#"[data-testid="marketplace_pdp_title"]"#,
    r#"div[role="main"] h1 span"#,
    "h1",
];
const PRICE: &[&str] = &[
    r#"[data-testid="marketplace_pdp_price"]"#,
    r#"div[role="main"] h1 + div span"#,
];
const DESCRIPTION: &[&str] = &[
    r#"[data-testid="marketplace_pdp_description"]"#,
    r#"div[role="main"] div[style*="pre-wrap"] span"#,
];
const LOCATION: &[&str] = &[
    r#"[data-testid="marketplace_pdp_location"]"#,
    r#"a[href*="/marketplace/"][href*="/location/"] span"#,
];
const SELLER_LINK: &[&str] = &[r#"a[href*="/marketplace/profile/"]"#];

static JOINED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)joined facebook in\s+(\d{4})").expect("valid regex"));
static RATINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\((\d+)\)\s*(?:seller\s+)?ratings?|\b(\d+)\s+ratings?\b").expect("valid regex"));
static LISTINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s+(?:active\s+)?listings?\b").expect("valid regex"));

/// Facebook Marketplace item pages (`facebook.com/marketplace/item/..`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FacebookStrategy;

impl ExtractionStrategy for FacebookStrategy {
    fn platform(&self) -> Platform {
        Platform::FacebookMarketplace
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url).is_some_and(|h| h == "facebook.com" || h == "web.facebook.com")
            && path_of(url).starts_with("/marketplace/")
    }

    fn extract(&self, doc: &Html) -> RawListing {
        let ld = json_ld_product(doc).unwrap_or_default();

        let title = select_text(doc, TITLE)
            .or_else(|| meta_content(doc, "og:title"))
            .or(ld.name)
            .unwrap_or_default();

        let price_text = select_text(doc, PRICE)
            .or_else(|| meta_content(doc, "product:price:amount"))
            .unwrap_or_default();
        let price = parse_price_or_free(&price_text).or(ld.price).unwrap_or(0.0);
        let currency = meta_content(doc, "product:price:currency")
            .or(ld.currency)
            .unwrap_or_else(|| detect_currency(&price_text).to_string());

        let description = select_text(doc, DESCRIPTION)
            .or_else(|| meta_content(doc, "og:description"))
            .or(ld.description)
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
            name: select_text(doc, SELLER_LINK).unwrap_or_else(|| "Unknown".to_string()),
            profile_url: select_attr(doc, SELLER_LINK, "href")
                .map(|href| absolutize("https://www.facebook.com", &href)),
            ..SellerInfo::default()
        };

        if let Some(caps) = JOINED.captures(&text) {
            let since = caps[0].trim().to_string();
            seller.account_age_days = member_since_year(&since)
                .and_then(|year| account_age_days(year, Utc::now()));
            seller.member_since = Some(since);
        }
        if let Some(caps) = RATINGS.captures(&text) {
            seller.review_count = caps
                .get(1)
                .or_else(|| caps.get(2))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
        }
        seller.active_listings = LISTINGS
            .captures(&text)
            .and_then(|caps| caps[1].parse().ok());
        seller.verified = exists(doc, r#"[aria-label="Verified"]"#);
        seller
    }

    fn extract_images(&self, doc: &Html, base_url: &str) -> Vec<String> {
        let mut images = select_all_attr(doc, r#"div[role="main"] img[src*="scontent"]"#, "src");
        images.extend(select_all_attr(doc, r#"img[alt^="Product photo"]"#, "src"));
        if images.is_empty() {
            images.extend(meta_content(doc, "og:image"));
        }
        dedupe_images(images.iter().map(|src| absolutize(base_url, src)).collect())
    }
}
