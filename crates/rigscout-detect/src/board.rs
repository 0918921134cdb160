//! Motherboard and power supply detection.

use crate::matcher::{find_brand, first_match, nearest_brand, num, Matcher};
use crate::specs::SpecTable;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rigscout_core::{Motherboard, Psu, PsuModularity};

static BOARD_MATCHERS: Lazy<Vec<Matcher<Motherboard>>> = Lazy::new(|| {
    vec![
        Matcher::new(
            r"(nzxt\s+)?\b(a[3-6]20|b[3-8][56]0|h[3-8][1-7]0|x[3-8][7-9]0e?|z[3-8][7-9]0)\b",
            chipset,
        ),
        Matcher::new(
            r"\b(asus|msi|gigabyte|asrock|evga|biostar)\b[^\n.,;]{0,40}?\b(?:motherboard|mobo|mainboard)\b",
            branded_board,
        ),
    ]
});

const BOARD_BRANDS: &[(&str, &str)] = &[
    ("asus", "ASUS"),
    ("rog strix", "ASUS"),
    ("tuf gaming", "ASUS"),
    ("msi", "MSI"),
    ("gigabyte", "Gigabyte"),
    ("aorus", "Gigabyte"),
    ("asrock", "ASRock"),
    ("evga", "EVGA"),
    ("biostar", "Biostar"),
];

static FORM_FACTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(e-?atx|micro[\s-]?atx|m-?atx|mini[\s-]?itx|itx)\b").expect("valid regex")
});

/// Socket served by a chipset.
fn chipset_socket(chipset: &str) -> Option<&'static str> {
    let chipset = chipset.trim_end_matches('e');
    Some(match chipset {
        "a320" | "b350" | "x370" | "b450" | "x470" | "a520" | "b550" | "x570" => "AM4",
        "a620" | "b650" | "x670" | "b850" | "x870" => "AM5",
        "h310" | "b360" | "b365" | "h370" | "z370" | "z390" => "LGA1151",
        "h410" | "b460" | "h470" | "z490" | "h510" | "b560" | "h570" | "z590" => "LGA1200",
        "h610" | "b660" | "h670" | "z690" | "b760" | "h770" | "z790" => "LGA1700",
        "b860" | "z890" => "LGA1851",
        _ => return None,
    })
}

fn chipset(caps: &Captures<'_>, _specs: &dyn SpecTable) -> Option<Motherboard> {
    // NZXT H510/H710 are cases, not Intel chipsets.
    if caps.get(1).is_some() {
        return None;
    }
    let chipset = caps[2].to_ascii_uppercase();
    Some(Motherboard {
        brand: "Unknown".to_string(),
        socket: chipset_socket(&caps[2]).map(ToString::to_string),
        chipset: Some(chipset),
        form_factor: "ATX".to_string(),
        value: None,
    })
}

fn branded_board(caps: &Captures<'_>, _specs: &dyn SpecTable) -> Option<Motherboard> {
    Some(Motherboard {
        brand: find_brand(&caps[1], BOARD_BRANDS)?,
        chipset: None,
        socket: None,
        form_factor: "ATX".to_string(),
        value: None,
    })
}

fn canonical_form_factor(raw: &str) -> &'static str {
    let compact: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    match compact.as_str() {
        "eatx" => "E-ATX",
        "microatx" | "matx" => "Micro-ATX",
        _ => "Mini-ITX",
    }
}

/// Detect the motherboard in `text` (already lowercased).
pub(crate) fn detect_motherboard(text: &str, specs: &dyn SpecTable) -> Option<Motherboard> {
    let mut board = first_match(&BOARD_MATCHERS, text, specs)?;
    if board.brand == "Unknown" {
        // Prefer a brand next to the chipset; GPU vendors like EVGA and MSI
        // often appear earlier in the text.
        let nearby = board.chipset.as_deref().and_then(|chipset| {
            let start = text.find(&chipset.to_ascii_lowercase())?;
            nearest_brand(text, start, start + chipset.len(), 30, BOARD_BRANDS)
        });
        if let Some(brand) = nearby.or_else(|| find_brand(text, BOARD_BRANDS)) {
            board.brand = brand;
        }
    }
    if let Some(caps) = FORM_FACTOR.captures(text) {
        board.form_factor = canonical_form_factor(&caps[1]).to_string();
    }
    Some(board)
}

static PSU_CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:psu|power\s+supply)\b|80\s*(?:\+|plus)").expect("valid regex"));

static WATTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{3,4})\s*w(?:att)?s?\b").expect("valid regex"));

static RATING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"80\s*(?:\+|plus)\s*(titanium|platinum|gold|silver|bronze|white)?").expect("valid regex")
});

const PSU_BRANDS: &[(&str, &str)] = &[
    ("corsair", "Corsair"),
    ("evga", "EVGA"),
    ("seasonic", "Seasonic"),
    ("be quiet", "be quiet!"),
    ("thermaltake", "Thermaltake"),
    ("cooler master", "Cooler Master"),
    ("super flower", "Super Flower"),
    ("fsp", "FSP"),
    ("nzxt", "NZXT"),
    ("msi", "MSI"),
    ("antec", "Antec"),
    ("silverstone", "SilverStone"),
    ("xpg", "XPG"),
    ("rosewill", "Rosewill"),
    ("deepcool", "DeepCool"),
    ("gigabyte", "Gigabyte"),
];

/// Detect the power supply in `text` (already lowercased).
///
/// Requires PSU context; a wattage is accepted only within 40 characters of
/// a PSU keyword and within 300..=2000 W.
pub(crate) fn detect_psu(text: &str) -> Option<Psu> {
    let contexts: Vec<_> = PSU_CONTEXT.find_iter(text).collect();
    if contexts.is_empty() {
        return None;
    }

    let wattage = WATTAGE
        .captures_iter(text)
        .filter(|caps| {
            let Some(m) = caps.get(0) else { return false };
            contexts.iter().any(|ctx| {
                let gap = if m.start() >= ctx.end() {
                    m.start() - ctx.end()
                } else {
                    ctx.start().saturating_sub(m.end())
                };
                gap <= 40
            })
        })
        .filter_map(|caps| num(&caps, 1))
        .find(|w| (300..=2000).contains(w));

    let efficiency = RATING.captures(text).map(|caps| match caps.get(1) {
        Some(tier) => {
            let tier = tier.as_str();
            let mut chars = tier.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
            format!("80+ {first}{}", chars.as_str())
        }
        None => "80+".to_string(),
    });

    let modularity = if text.contains("semi-modular") || text.contains("semi modular") {
        PsuModularity::Semi
    } else if text.contains("non-modular") || text.contains("non modular") {
        PsuModularity::NonModular
    } else if text.contains("modular") {
        PsuModularity::Full
    } else {
        PsuModularity::NonModular
    };

    let first = contexts[0];
    let brand = nearest_brand(text, first.start(), first.end(), 60, PSU_BRANDS)
        .unwrap_or_else(|| "Unknown".to_string());

    Some(Psu {
        brand,
        wattage,
        efficiency,
        modularity,
        value: None,
    })
}
