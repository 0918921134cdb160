//! Case and CPU cooler detection.

use crate::matcher::{find_brand, num, window};
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Case, Cooling, CoolingKind};

const CASE_BRANDS: &[(&str, &str)] = &[
    ("nzxt", "NZXT"),
    ("lian li", "Lian Li"),
    ("fractal", "Fractal Design"),
    ("phanteks", "Phanteks"),
    ("corsair", "Corsair"),
    ("cooler master", "Cooler Master"),
    ("be quiet", "be quiet!"),
    ("thermaltake", "Thermaltake"),
    ("montech", "Montech"),
    ("deepcool", "DeepCool"),
    ("hyte", "HYTE"),
];

static CASE_MODEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(o11\s*(?:dynamic|air|vision)?(?:\s*(?:evo|mini|xl))?|lancool\s*(?:ii|iii|\d{3})?|[2-7]000[dx](?:\s*airflow)?|meshify\s*(?:2|c)?|define\s*(?:7|r[56])|torrent|pop\s+air|p[345]00a|eclipse\s*g?\d{3}a?|y[46]0|h[5-9]\s*flow|4000d)\b",
    )
    .expect("valid regex")
});

static CASE_MENTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:full|mid|mini)[\s-]?tower\b|\bcase\s*[:\-]|\b(?:pc|atx|itx|glass|airflow|gaming)\s+(?:case|chassis)\b")
        .expect("valid regex")
});

static TOWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(full|mid|mini)[\s-]?tower\b|\b(sff|small\s+form\s+factor|itx\s+case)\b").expect("valid regex")
});

/// Detect the case in `text` (already lowercased). Form factor defaults to "Mid Tower".
pub(crate) fn detect_case(text: &str) -> Option<Case> {
    let model = CASE_MODEL.find(text);
    let mention = CASE_MENTION.find(text);
    let anchor = model.or(mention)?;

    let brand = find_brand(window(text, anchor.start(), anchor.end(), 25), CASE_BRANDS)
        .unwrap_or_else(|| "Unknown".to_string());

    let form_factor = TOWER
        .captures(text)
        .map(|caps| match caps.get(1).map(|m| m.as_str()) {
            Some("full") => "Full Tower",
            Some("mini") => "Mini Tower",
            Some(_) => "Mid Tower",
            None => "Small Form Factor",
        })
        .unwrap_or("Mid Tower");

    Some(Case {
        brand,
        model: model.map(|m| title_case(m.as_str())),
        form_factor: form_factor.to_string(),
        tempered_glass: text.contains("tempered glass") || text.contains(" tg "),
        value: None,
    })
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().collect::<String>() + chars.as_str())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static AIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(120|140|240|280|360|420)\s*mm\s*(?:aio|liquid|water|rad(?:iator)?)|\b(?:aio|liquid\s+cool(?:er|ing|ed)|water\s*cool(?:er|ing|ed)|kraken|liquid\s+freezer|galahad|h1[05]0i)\b")
        .expect("valid regex")
});

static RADIATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(120|140|240|280|360|420)\s*mm\b").expect("valid regex"));

static AIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(noctua|nh-[du]\d{2}\w*|hyper\s*212|dark\s+rock|ak[46]\d0|peerless\s+assassin|phantom\s+spirit|fuma|tower\s+cooler|air\s+cooler)\b")
        .expect("valid regex")
});

static STOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:stock\s+(?:cpu\s+)?(?:cooler|fan|heatsink)|wraith\s+(?:stealth|spire|prism)|box\s+cooler)\b").expect("valid regex")
});

const COOLER_BRANDS: &[(&str, &str)] = &[
    ("corsair", "Corsair"),
    ("nzxt", "NZXT"),
    ("kraken", "NZXT"),
    ("arctic", "Arctic"),
    ("liquid freezer", "Arctic"),
    ("lian li", "Lian Li"),
    ("galahad", "Lian Li"),
    ("deepcool", "DeepCool"),
    ("cooler master", "Cooler Master"),
    ("hyper 212", "Cooler Master"),
    ("noctua", "Noctua"),
    ("nh-", "Noctua"),
    ("be quiet", "be quiet!"),
    ("dark rock", "be quiet!"),
    ("thermalright", "Thermalright"),
    ("peerless assassin", "Thermalright"),
    ("phantom spirit", "Thermalright"),
    ("ekwb", "EKWB"),
];

/// Detect the CPU cooler in `text` (already lowercased).
pub(crate) fn detect_cooling(text: &str) -> Option<Cooling> {
    if let Some(caps) = AIO.captures(text) {
        let m = caps.get(0)?;
        let radiator_mm = num(&caps, 1).or_else(|| {
            RADIATOR
                .captures(window(text, m.start(), m.end(), 30))
                .and_then(|c| num(&c, 1))
        });
        return Some(Cooling {
            kind: CoolingKind::Liquid,
            brand: find_brand(window(text, m.start(), m.end(), 30), COOLER_BRANDS)
                .unwrap_or_else(|| "Unknown".to_string()),
            radiator_mm,
            value: None,
        });
    }

    if let Some(m) = AIR.find(text) {
        return Some(Cooling {
            kind: CoolingKind::Air,
            brand: find_brand(window(text, m.start(), m.end(), 20), COOLER_BRANDS)
                .unwrap_or_else(|| "Unknown".to_string()),
            radiator_mm: None,
            value: None,
        });
    }

    STOCK.find(text).map(|m| Cooling {
        kind: CoolingKind::Stock,
        brand: if m.as_str().starts_with("wraith") {
            "AMD".to_string()
        } else {
            "Stock".to_string()
        },
        radiator_mm: None,
        value: None,
    })
}
