use crate::html::{
    absolutize, clean_text, dedupe_images, detect_currency, meta_content, parse_price_or_free,
    parse_timestamp, select_all_attr, select_attr, select_text,
};
use crate::strategy::{host_of, ExtractionStrategy, RawListing};
use rigscout_core::{Platform, SellerInfo};
use scraper::Html;

const TITLE: &[&str] = &["#titletextonly", ".postingtitletext .titletextonly", "h1.postingtitle"];
const PRICE: &[&str] = &[".postingtitletext .price", "span.price", ".price"];
const BODY: &[&str] = &["#postingbody", "section.userbody"];
const LOCATION: &[&str] = &[".postingtitletext small", ".postingtitle small"];
const POSTED: &[&str] = &[".postinginfos time.timeago", "time.date.timeago", "time"];

/// Boilerplate Craigslist injects at the top of every posting body.
const QR_NOTICE: &str = "QR Code Link to This Post";

/// Craigslist postings (`*.craigslist.org`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CraigslistStrategy;

impl ExtractionStrategy for CraigslistStrategy {
    fn platform(&self) -> Platform {
        Platform::Craigslist
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url).is_some_and(|h| h == "craigslist.org" || h.ends_with(".craigslist.org"))
    }

    fn extract(&self, doc: &Html) -> RawListing {
        let title = select_text(doc, TITLE)
            .or_else(|| meta_content(doc, "og:title"))
            .unwrap_or_default();
        let price_text = select_text(doc, PRICE).unwrap_or_default();
        let description = select_text(doc, BODY)
            .map(|body| clean_text(&body.replace(QR_NOTICE, "")))
            .or_else(|| meta_content(doc, "og:description"))
            .unwrap_or_default();
        let location = select_text(doc, LOCATION)
            .map(|loc| loc.trim_matches(|c| c == '(' || c == ')' || c == ' ').to_string())
            .filter(|loc| !loc.is_empty())
            .or_else(|| meta_content(doc, "geo.placename"))
            .unwrap_or_else(|| "Unknown".to_string());

        RawListing {
            title,
            description,
            price: parse_price_or_free(&price_text).unwrap_or(0.0),
            currency: detect_currency(&price_text).to_string(),
            location,
            posted_at: select_attr(doc, POSTED, "datetime").and_then(|t| parse_timestamp(&t)),
        }
    }

    fn extract_seller(&self, _doc: &Html) -> SellerInfo {
        // Craigslist postings are anonymous.
        SellerInfo::default()
    }

    fn extract_images(&self, doc: &Html, base_url: &str) -> Vec<String> {
        let mut images = select_all_attr(doc, "#thumbs a", "href");
        images.extend(select_all_attr(doc, ".gallery .swipe img", "src"));
        images.extend(select_all_attr(doc, ".gallery img", "src"));
        if images.is_empty() {
            images.extend(meta_content(doc, "og:image"));
        }
        dedupe_images(images.iter().map(|src| absolutize(base_url, src)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://sfbay.craigslist.org/sby/sys/d/san-jose-gaming-pc/7712345678.html";

    fn fixture() -> Html {
        Html::parse_document(
            r#"<html><head>
                <meta property="og:image" content="https://images.craigslist.org/og.jpg">
            </head><body>
            <h1 class="postingtitle"><span class="postingtitletext">
                <span id="titletextonly">Gaming PC RTX 3070 Ryzen 5 5600X</span>
                <span class="price">$850</span>
                <small> (san jose south)</small>
            </span></h1>
            <div class="gallery"><div id="thumbs">
                <a href="https://images.craigslist.org/00a_1.jpg"></a>
                <a href="https://images.craigslist.org/00b_1.jpg"></a>
                <a href="https://images.craigslist.org/00a_1.jpg"></a>
            </div></div>
            <section id="postingbody">
                <div class="print-qrcode-container">QR Code Link to This Post</div>
                Selling my gaming PC. 32GB DDR4 3200MHz, 1TB NVMe.
                Cash only, local pickup.
            </section>
            <div class="postinginfos"><p class="postinginfo">posted:
                <time class="date timeago" datetime="2024-03-01T10:15:00-0800">2024-03-01</time></p></div>
            </body></html>"#,
        )
    }

    #[test]
    fn test_extract_listing_fields() {
        let listing = CraigslistStrategy.extract_listing(&fixture(), URL);
        assert_eq!(listing.platform, Platform::Craigslist);
        assert_eq!(listing.title, "Gaming PC RTX 3070 Ryzen 5 5600X");
        assert!((listing.price - 850.0).abs() < f64::EPSILON);
        assert_eq!(listing.currency, "USD");
        assert_eq!(listing.location, "san jose south");
        assert!(listing.description.starts_with("Selling my gaming PC."));
        assert!(!listing.description.contains("QR Code"));
        assert!(listing.posted_at.is_some());
        assert_eq!(listing.seller.name, "Unknown");
        assert_eq!(listing.images.len(), 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let doc = Html::parse_document("<html><body><p>deleted</p></body></html>");
        let raw = CraigslistStrategy.extract(&doc);
        assert_eq!(raw.title, "");
        assert!(raw.price.abs() < f64::EPSILON);
        assert_eq!(raw.location, "Unknown");
        assert!(CraigslistStrategy.extract_images(&doc, URL).is_empty());
    }

    #[test]
    fn test_can_handle() {
        assert!(CraigslistStrategy.can_handle(URL));
        assert!(!CraigslistStrategy.can_handle("https://craigslist.org.evil.com/x"));
        assert!(!CraigslistStrategy.can_handle("https://offerup.com/item/detail/1"));
    }
}
