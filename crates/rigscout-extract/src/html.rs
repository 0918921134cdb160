//! Selector, metadata and price helpers shared by the platform strategies.
//!
//! Invalid selectors are skipped rather than reported: strategies carry
//! ordered fallback lists and a bad entry should not abort extraction.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

static PRICE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?").expect("valid regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").expect("valid regex"));

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19[89]\d|20\d{2})\b").expect("valid regex"));

/// Collapse runs of spaces and blank lines, trim the ends.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let collapsed = WHITESPACE.replace_all(raw, " ");
    let lines: Vec<&str> = collapsed.lines().map(str::trim).collect();
    BLANK_LINES
        .replace_all(lines.join("\n").trim(), "\n\n")
        .into_owned()
}

fn element_text(el: &ElementRef) -> String {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first element matched by the first selector that yields
/// non-empty text.
#[must_use]
pub fn select_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        doc.select(&selector)
            .map(|el| element_text(&el))
            .find(|text| !text.is_empty())
    })
}

/// Text of every element matched by `selector`.
#[must_use]
pub fn select_all_text(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&selector)
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Attribute of the first element matched by the first selector that has it.
#[must_use]
pub fn select_attr(doc: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    selectors.iter().find_map(|sel| {
        let selector = Selector::parse(sel).ok()?;
        doc.select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(ToString::to_string)
    })
}

/// Attribute values of every element matched by `selector`.
#[must_use]
pub fn select_all_attr(doc: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// True if any element matches `selector`.
#[must_use]
pub fn exists(doc: &Html, selector: &str) -> bool {
    Selector::parse(selector).is_ok_and(|s| doc.select(&s).next().is_some())
}

/// Content of a `<meta property=..>` or `<meta name=..>` tag.
#[must_use]
pub fn meta_content(doc: &Html, key: &str) -> Option<String> {
    select_attr(
        doc,
        &[
            &format!(r#"meta[property="{key}"]"#),
            &format!(r#"meta[name="{key}"]"#),
        ],
        "content",
    )
}

/// Visible text of the whole body.
#[must_use]
pub fn body_text(doc: &Html) -> String {
    select_text(doc, &["body"]).unwrap_or_default()
}

/// Product data found in embedded JSON-LD blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonLdProduct {
    /// `name`
    pub name: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `offers.price`
    pub price: Option<f64>,
    /// `offers.priceCurrency`
    pub currency: Option<String>,
    /// `image`, string or array
    pub images: Vec<String>,
    /// `offers.seller.name`
    pub seller: Option<String>,
    /// `offers.availableAtOrFrom.address.addressLocality`
    pub locality: Option<String>,
}

/// First JSON-LD object typed `Product` (or carrying `offers`).
#[must_use]
pub fn json_ld_product(doc: &Html) -> Option<JsonLdProduct> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    doc.select(&selector)
        .filter_map(|el| serde_json::from_str::<Value>(&el.text().collect::<String>()).ok())
        .flat_map(|value| match value {
            Value::Array(items) => items,
            Value::Object(_) => match value.get("@graph") {
                Some(Value::Array(items)) => items.clone(),
                _ => vec![value],
            },
            _ => Vec::new(),
        })
        .find(|item| {
            item.get("@type").and_then(Value::as_str) == Some("Product")
                || item.get("offers").is_some()
        })
        .map(|item| product_from_value(&item))
}

fn json_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn product_from_value(item: &Value) -> JsonLdProduct {
    let offers = match item.get("offers") {
        Some(Value::Array(list)) => list.first(),
        other => other,
    };
    let images = match item.get("image") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|v| json_string(Some(v)).or_else(|| json_string(v.get("url"))))
            .collect(),
        Some(obj @ Value::Object(_)) => json_string(obj.get("url")).into_iter().collect(),
        _ => Vec::new(),
    };

    JsonLdProduct {
        name: json_string(item.get("name")),
        description: json_string(item.get("description")),
        price: offers
            .and_then(|o| json_string(o.get("price")))
            .and_then(|p| parse_price(&p)),
        currency: offers.and_then(|o| json_string(o.get("priceCurrency"))),
        images,
        seller: offers.and_then(|o| json_string(o.get("seller").and_then(|s| s.get("name")))),
        locality: offers.and_then(|o| {
            json_string(
                o.get("availableAtOrFrom")
                    .and_then(|a| a.get("address"))
                    .and_then(|a| a.get("addressLocality")),
            )
        }),
    }
}

/// Parse the first amount in a price string such as `"$1,200"` or `"US $849.99"`.
///
/// Strings without digits yield `None`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let caps = PRICE_NUMBER.captures(raw)?;
    let whole: String = caps.get(1)?.as_str().chars().filter(char::is_ascii_digit).collect();
    let cents = caps.get(2).map_or("0", |m| m.as_str());
    format!("{whole}.{cents}").parse().ok()
}

/// Parse a price, treating "free" as zero and anything else as unknown.
#[must_use]
pub fn parse_price_or_free(raw: &str) -> Option<f64> {
    parse_price(raw).or_else(|| raw.to_ascii_lowercase().contains("free").then_some(0.0))
}

/// ISO currency code implied by the symbols in a price string.
#[must_use]
pub fn detect_currency(raw: &str) -> &'static str {
    let upper = raw.to_ascii_uppercase();
    if upper.contains("C $") || upper.contains("C$") || upper.contains("CAD") {
        "CAD"
    } else if upper.contains("AU $") || upper.contains("AU$") || upper.contains("AUD") {
        "AUD"
    } else if raw.contains('€') || upper.contains("EUR") {
        "EUR"
    } else if raw.contains('£') || upper.contains("GBP") {
        "GBP"
    } else {
        "USD"
    }
}

/// Parse the timestamp formats marketplaces put in `datetime` attributes.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

/// First plausible year in a "member since" style string.
#[must_use]
pub fn member_since_year(raw: &str) -> Option<i32> {
    YEAR.captures(raw)?.get(1)?.as_str().parse().ok()
}

/// Approximate account age in days for an account created in `year`.
#[must_use]
pub fn account_age_days(year: i32, now: DateTime<Utc>) -> Option<u32> {
    use chrono::Datelike;
    let years = now.year().checked_sub(year)?;
    u32::try_from(years).ok().map(|y| y * 365)
}

/// Resolve `href` against `base`, leaving absolute URLs untouched.
#[must_use]
pub fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    url::Url::parse(base)
        .and_then(|b| b.join(href))
        .map_or_else(|_| href.to_string(), String::from)
}

/// Drop empty and duplicate entries, keeping first occurrences.
#[must_use]
pub fn dedupe_images(images: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    images
        .into_iter()
        .filter(|src| !src.is_empty() && !src.starts_with("data:"))
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$1,200"), Some(1200.0));
        assert_eq!(parse_price("US $849.99"), Some(849.99));
        assert_eq!(parse_price("$650 OBO"), Some(650.0));
        assert_eq!(parse_price("C $1,000,000"), Some(1_000_000.0));
        assert_eq!(parse_price("contact me"), None);
        assert_eq!(parse_price_or_free("FREE"), Some(0.0));
    }

    #[test]
    fn test_detect_currency() {
        assert_eq!(detect_currency("$500"), "USD");
        assert_eq!(detect_currency("C $500"), "CAD");
        assert_eq!(detect_currency("€450"), "EUR");
        assert_eq!(detect_currency("£300"), "GBP");
    }

    #[test]
    fn test_select_text_falls_through_selectors() {
        let doc = Html::parse_document(
            r#"<html><body><h1 class="empty"></h1><h2 class="title"> Gaming   PC </h2></body></html>"#,
        );
        assert_eq!(
            select_text(&doc, &["h1.empty", "[[invalid", "h2.title"]),
            Some("Gaming PC".to_string())
        );
        assert_eq!(select_text(&doc, &["h3"]), None);
    }

    #[test]
    fn test_meta_content() {
        let doc = Html::parse_document(
            r#"<html><head>
                <meta property="og:title" content="RTX 3080 build">
                <meta name="description" content="Works great">
            </head></html>"#,
        );
        assert_eq!(meta_content(&doc, "og:title"), Some("RTX 3080 build".to_string()));
        assert_eq!(meta_content(&doc, "description"), Some("Works great".to_string()));
        assert_eq!(meta_content(&doc, "og:image"), None);
    }

    #[test]
    fn test_json_ld_product() {
        let doc = Html::parse_document(
            r#"<html><head><script type="application/ld+json">
            {"@context":"https://schema.org","@type":"Product","name":"Ryzen 7 5800X PC",
             "description":"32GB DDR4","image":["https://img.example/1.jpg","https://img.example/2.jpg"],
             "offers":{"@type":"Offer","price":"900","priceCurrency":"USD",
                       "seller":{"name":"Dana"},
                       "availableAtOrFrom":{"address":{"addressLocality":"Austin"}}}}
            </script></head></html>"#,
        );
        let product = json_ld_product(&doc).expect("product block");
        assert_eq!(product.name.as_deref(), Some("Ryzen 7 5800X PC"));
        assert_eq!(product.price, Some(900.0));
        assert_eq!(product.currency.as_deref(), Some("USD"));
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.seller.as_deref(), Some("Dana"));
        assert_eq!(product.locality.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_json_ld_ignores_malformed_blocks() {
        let doc = Html::parse_document(
            r#"<script type="application/ld+json">{not json</script>
               <script type="application/ld+json">{"@type":"BreadcrumbList"}</script>"#,
        );
        assert!(json_ld_product(&doc).is_none());
    }

    #[test]
    fn test_account_age() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(member_since_year("Joined Facebook in 2019"), Some(2019));
        assert_eq!(account_age_days(2019, now), Some(5 * 365));
        assert_eq!(account_age_days(2030, now), None);
    }

    #[test]
    fn test_absolutize_and_dedupe() {
        assert_eq!(
            absolutize("https://sfbay.craigslist.org/sby/sys/1.html", "/images/a.jpg"),
            "https://sfbay.craigslist.org/images/a.jpg"
        );
        let images = dedupe_images(vec![
            "a.jpg".to_string(),
            String::new(),
            "a.jpg".to_string(),
            "data:image/gif;base64,AAAA".to_string(),
            "b.jpg".to_string(),
        ]);
        assert_eq!(images, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-03-01T10:15:00-0800").is_some());
        assert!(parse_timestamp("2024-03-01T10:15:00Z").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
