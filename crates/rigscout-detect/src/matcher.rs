use crate::specs::SpecTable;
use regex::{Captures, Regex};

/// Converts a successful match into a component record.
pub(crate) type Handler<T> = fn(&Captures<'_>, &dyn SpecTable) -> Option<T>;

/// One `(pattern, handler)` entry of a category's ordered matcher list.
pub(crate) struct Matcher<T> {
    pattern: Regex,
    handler: Handler<T>,
}

impl<T> Matcher<T> {
    pub(crate) fn new(pattern: &str, handler: Handler<T>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid regex"),
            handler,
        }
    }
}

/// Run matchers in order; the first one whose handler accepts a match wins.
pub(crate) fn first_match<T>(matchers: &[Matcher<T>], text: &str, specs: &dyn SpecTable) -> Option<T> {
    matchers.iter().find_map(|m| {
        m.pattern
            .captures_iter(text)
            .find_map(|caps| (m.handler)(&caps, specs))
    })
}

/// Parse a capture group as a number.
pub(crate) fn num(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// First brand from `brands` mentioned in `text`, as its display name.
pub(crate) fn find_brand(text: &str, brands: &[(&str, &str)]) -> Option<String> {
    brands
        .iter()
        .filter_map(|(needle, name)| text.find(needle).map(|pos| (pos, *name)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, name)| name.to_string())
}

/// Brand from `brands` mentioned closest to `start..end`, at most `radius`
/// bytes away.
pub(crate) fn nearest_brand(
    text: &str,
    start: usize,
    end: usize,
    radius: usize,
    brands: &[(&str, &str)],
) -> Option<String> {
    brands
        .iter()
        .flat_map(|(needle, name)| {
            text.match_indices(needle)
                .map(move |(pos, _)| (pos, pos + needle.len(), *name))
        })
        .filter_map(|(lo, hi, name)| {
            let distance = if lo >= end {
                lo - end
            } else if hi <= start {
                start - hi
            } else {
                0
            };
            (distance <= radius).then_some((distance, name))
        })
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.to_string())
}

/// Slice of `text` around `start..end`, clamped to char boundaries.
pub(crate) fn window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start.saturating_sub(radius);
    while !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + radius).min(text.len());
    while !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}
