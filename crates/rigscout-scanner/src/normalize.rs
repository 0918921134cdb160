//! Listing URL normalization and deduplication.

use std::collections::HashSet;
use url::Url;

/// Query parameters that only carry tracking data.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "dclid", "msclkid", "ref", "ref_", "mc_cid", "mc_eid", "igshid", "si",
    "spm", "_ga", "_gl", "tracking_id", "referrer",
];

fn is_tracking_param(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.starts_with("utm_") || TRACKING_PARAMS.contains(&name.as_str())
}

/// Canonical form of a listing URL.
///
/// Upgrades `http` to `https`, lowercases the host, drops the fragment and
/// tracking parameters, sorts the remaining query and trims trailing
/// slashes. Input that does not parse as a URL is returned trimmed.
/// Applying the function twice yields the same string.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    // Both schemes are special, so the switch cannot be refused.
    if url.scheme() == "http" && url.set_scheme("https").is_err() {
        return trimmed.to_string();
    }
    url.set_fragment(None);

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&pairs);
    }

    let path = url.path().to_string();
    let trimmed_path = path.trim_end_matches('/');
    if trimmed_path.len() != path.len() && !trimmed_path.is_empty() {
        url.set_path(trimmed_path);
    }

    let mut normalized = url.to_string();
    if url.path() == "/" && url.query().is_none() && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Key used to detect duplicates: case- and scheme-insensitive.
#[must_use]
pub fn dedupe_key(normalized: &str) -> String {
    let lower = normalized.to_lowercase();
    lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower)
        .to_string()
}

/// Trim, drop blanks, normalize and deduplicate; the first occurrence wins.
#[must_use]
pub fn normalize_all<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(|u| u.as_ref().trim())
        .filter(|u| !u.is_empty())
        .map(normalize_url)
        .filter(|u| seen.insert(dedupe_key(u)))
        .collect()
}
