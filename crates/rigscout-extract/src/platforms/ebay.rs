use crate::html::{
    absolutize, body_text, clean_text, dedupe_images, detect_currency, exists, json_ld_product,
    meta_content, parse_price, select_all_attr, select_all_text, select_attr, select_text,
};
use crate::strategy::{host_of, path_of, ExtractionStrategy, RawListing};
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Platform, SellerInfo};
use scraper::Html;

const TITLE: &[&str] = &["h1.x-item-title__mainTitle span", "h1#itemTitle", "h1"];
const PRICE: &[&str] = &[".x-price-primary span", "#prcIsum", "#mm-saleDscPrc"];
const DESCRIPTION: &[&str] = &[".x-item-description", "#desc_div", "#viTabs_0_is"];
const SPECIFICS: &str = ".ux-layout-section-evo__col";
const LOCATION: &[&str] = &[".ux-labels-values--itemLocation .ux-textspans--SECONDARY"];
const SELLER_NAME: &[&str] = &[
    ".x-sellercard-atf__info__about-seller a span",
    ".ux-seller-section__item--seller a span",
];
const SELLER_LINK: &[&str] = &[
    ".x-sellercard-atf__info__about-seller a",
    ".ux-seller-section__item--seller a",
];
const SELLER_STATS: &[&str] = &[".x-sellercard-atf__data-item", ".x-sellercard-atf"];

static LOCATED_IN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)located in:\s*([^\n]+?)\s*(?:\n|$|shipping)").expect("valid regex"));
static FEEDBACK_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([\d,]+)\)").expect("valid regex"));
static POSITIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3}(?:\.\d)?)%\s*positive").expect("valid regex"));
static ITEMS_FOR_SALE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\d,]+)\s+items?\s+for\s+sale").expect("valid regex"));

/// eBay item pages (`ebay.*/itm/..`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EbayStrategy;

fn parse_count(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}

impl ExtractionStrategy for EbayStrategy {
    fn platform(&self) -> Platform {
        Platform::Ebay
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url).is_some_and(|h| h == "ebay.com" || h.starts_with("ebay."))
            && path_of(url).starts_with("/itm/")
    }

    fn extract(&self, doc: &Html) -> RawListing {
        let ld = json_ld_product(doc).unwrap_or_default();

        let title = select_text(doc, TITLE)
            .or(ld.name)
            .or_else(|| meta_content(doc, "og:title"))
            .unwrap_or_default();

        let price_text = select_text(doc, PRICE).unwrap_or_default();
        let price = parse_price(&price_text).or(ld.price).unwrap_or(0.0);
        let currency = ld
            .currency
            .unwrap_or_else(|| detect_currency(&price_text).to_string());

        // The seller's description lives in an iframe; item specifics are the
        // richest text available in the main document.
        let specifics = select_all_text(doc, SPECIFICS).join("\n");
        let description = select_text(doc, DESCRIPTION)
            .or_else(|| (!specifics.is_empty()).then(|| clean_text(&specifics)))
            .or(ld.description)
            .or_else(|| meta_content(doc, "og:description"))
            .unwrap_or_default();

        let location = select_text(doc, LOCATION)
            .map(|loc| loc.trim_start_matches("Located in:").trim().to_string())
            .or_else(|| {
                LOCATED_IN
                    .captures(&body_text(doc))
                    .map(|caps| caps[1].trim().to_string())
            })
            .filter(|loc| !loc.is_empty())
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
        let stats = SELLER_STATS
            .iter()
            .flat_map(|sel| select_all_text(doc, sel))
            .collect::<Vec<_>>()
            .join(" ");

        SellerInfo {
            name: select_text(doc, SELLER_NAME).unwrap_or_else(|| "Unknown".to_string()),
            profile_url: select_attr(doc, SELLER_LINK, "href")
                .map(|href| absolutize("https://www.ebay.com", &href)),
            // eBay reports percent positive; map it onto a five-point scale.
            rating: POSITIVE
                .captures(&stats)
                .and_then(|caps| caps[1].parse::<f32>().ok())
                .map(|pct| (pct / 20.0).clamp(0.0, 5.0)),
            review_count: FEEDBACK_COUNT
                .captures(&stats)
                .and_then(|caps| parse_count(&caps[1]))
                .unwrap_or(0),
            active_listings: ITEMS_FOR_SALE
                .captures(&stats)
                .and_then(|caps| parse_count(&caps[1])),
            verified: exists(doc, ".x-sellercard-atf__top-rated"),
            ..SellerInfo::default()
        }
    }

    fn extract_images(&self, doc: &Html, base_url: &str) -> Vec<String> {
        let mut images = select_all_attr(doc, ".ux-image-carousel-item img", "data-zoom-src");
        images.extend(select_all_attr(doc, ".ux-image-carousel-item img", "src"));
        images.extend(select_all_attr(doc, "#icImg", "src"));
        if images.is_empty() {
            images.extend(json_ld_product(doc).map(|ld| ld.images).unwrap_or_default());
        }
        if images.is_empty() {
            images.extend(meta_content(doc, "og:image"));
        }
        dedupe_images(images.iter().map(|src| absolutize(base_url, src)).collect())
    }
}
