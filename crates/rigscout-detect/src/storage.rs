//! Drive detection.
//!
//! NVMe, SATA SSD and HDD patterns are scanned independently and their
//! matches accumulated. A match that overlaps an already accepted span is
//! dropped, so "1TB NVMe SSD" yields one NVMe drive rather than an NVMe and
//! an SSD.

use crate::matcher::{find_brand, window};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rigscout_core::{Storage, StorageKind};
use std::ops::Range;

const SIZE: &str = r"(\d+(?:\.\d+)?)\s*(tb|gb)";

/// Up to four brand/model words between a size and the drive kind
/// ("1TB Samsung 970 Evo Plus NVMe"). Numeric words may not carry a GB/TB
/// unit, so a RAM size is never paired with a later drive keyword.
const FILLER: &str = r"(?:(?:[a-z][a-z0-9+]*|\d{2,4}(?:[a-fh-su-z][a-z0-9]*)?)\s+){1,4}?";

static PATTERNS: Lazy<Vec<(StorageKind, Regex)>> = Lazy::new(|| {
    let nvme = [
        format!(r"\b{SIZE}\s*(?:m\.2\s*)?(?:pcie\s*)?(?:gen\s*\d\s*)?nvme"),
        format!(r"\bnvme\s*(?:m\.2\s*)?(?:ssd\s*)?[:\-]?\s*{SIZE}\b"),
        format!(r"\b{SIZE}\s*m\.2\b"),
        format!(r"\b{SIZE}\s+{FILLER}nvme"),
    ];
    let ssd = [
        format!(r"\b{SIZE}\s*(?:sata\s*)?(?:ssd|solid\s+state)"),
        format!(r"\bssd\s*[:\-]?\s*{SIZE}\b"),
        format!(r"\b{SIZE}\s+{FILLER}ssd"),
    ];
    let hdd = [
        format!(r"\b{SIZE}\s*(?:\d{{4}}\s*rpm\s*)?(?:hdd|hard\s+drive|hard\s+disk)"),
        format!(r"\b(?:hdd|hard\s+drive)\s*[:\-]?\s*{SIZE}\b"),
        format!(r"\b{SIZE}\s+{FILLER}(?:hdd|hard\s+drive)"),
    ];

    nvme.iter()
        .map(|p| (StorageKind::Nvme, p))
        .chain(ssd.iter().map(|p| (StorageKind::Ssd, p)))
        .chain(hdd.iter().map(|p| (StorageKind::Hdd, p)))
        .map(|(kind, p)| (kind, Regex::new(p).expect("valid regex")))
        .collect()
});

const BRANDS: &[(&str, &str)] = &[
    ("samsung", "Samsung"),
    ("western digital", "Western Digital"),
    ("wd ", "Western Digital"),
    ("crucial", "Crucial"),
    ("seagate", "Seagate"),
    ("sabrent", "Sabrent"),
    ("kingston", "Kingston"),
    ("sk hynix", "SK hynix"),
    ("toshiba", "Toshiba"),
    ("adata", "ADATA"),
    ("teamgroup", "TeamGroup"),
];

fn capacity_gb(caps: &Captures<'_>) -> Option<u32> {
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let gb = match caps.get(2)?.as_str() {
        "tb" => amount * 1000.0,
        _ => amount,
    };
    if !(16.0..=100_000.0).contains(&gb) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(gb.round() as u32)
}

fn overlaps(spans: &[Range<usize>], candidate: &Range<usize>) -> bool {
    spans
        .iter()
        .any(|s| s.start < candidate.end && candidate.start < s.end)
}

/// Detect every drive mentioned in `text` (already lowercased), in text order.
pub(crate) fn detect(text: &str) -> Vec<Storage> {
    let mut accepted: Vec<(Range<usize>, Storage)> = Vec::new();

    for (kind, pattern) in PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let span = whole.range();
            let spans: Vec<Range<usize>> = accepted.iter().map(|(r, _)| r.clone()).collect();
            if overlaps(&spans, &span) {
                continue;
            }
            let Some(capacity_gb) = capacity_gb(&caps) else { continue };
            let brand = find_brand(window(text, span.start, span.end, 30), BRANDS);
            accepted.push((
                span,
                Storage {
                    kind: *kind,
                    capacity_gb,
                    brand,
                    value: None,
                },
            ));
        }
    }

    accepted.sort_by_key(|(span, _)| span.start);
    accepted.into_iter().map(|(_, s)| s).collect()
}
