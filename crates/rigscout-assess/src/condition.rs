//! Condition scoring from listing text and photo count.

use chrono::{DateTime, Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Components, Condition, Issue, Severity, UsageIntensity};
use tracing::debug;

const BASELINE: i32 = 3;

/// Keyword that moves the overall score.
struct Adjustment {
    regex: Regex,
    delta: i32,
    note: &'static str,
}

/// Keyword that records a discrete defect.
struct IssueRule {
    regex: Regex,
    component: &'static str,
    description: &'static str,
    severity: Severity,
}

fn adjustment(pattern: &str, delta: i32, note: &'static str) -> Adjustment {
    Adjustment {
        regex: Regex::new(pattern).expect("valid regex"),
        delta,
        note,
    }
}

fn issue(pattern: &str, component: &'static str, description: &'static str, severity: Severity) -> IssueRule {
    IssueRule {
        regex: Regex::new(pattern).expect("valid regex"),
        component,
        description,
        severity,
    }
}

static ADJUSTMENTS: Lazy<Vec<Adjustment>> = Lazy::new(|| {
    vec![
        adjustment(
            r"\b(?:like\s+new|mint|excellent|pristine|immaculate|flawless)\b",
            1,
            "Described as like new or excellent",
        ),
        adjustment(
            r"\b(?:fair|okay|ok|decent)\s+(?:condition|shape)\b|\bsigns\s+of\s+wear\b|\bwell\s+used\b",
            -1,
            "Described as fair or worn",
        ),
        adjustment(
            r"\bthermal\s+(?:issues?|problems?|throttl\w*)\b|\boverheat\w*|\bruns\s+(?:very\s+)?hot\b",
            -1,
            "Thermal problems mentioned",
        ),
        adjustment(
            r"\b(?:poor\s+condition|for\s+parts|parts\s+only|broken|not\s+working|doesn'?t\s+work|won'?t\s+(?:boot|post|turn\s+on)|as[\s-]is)\b",
            -2,
            "Sold broken, as-is or for parts",
        ),
    ]
});

static ISSUES: Lazy<Vec<IssueRule>> = Lazy::new(|| {
    vec![
        issue(
            r"\b(?:water|liquid)\s+damage\b|\bleak(?:ed|ing|s)?\b",
            "System",
            "Liquid damage or leak reported",
            Severity::Critical,
        ),
        issue(
            r"\b(?:for\s+parts|parts\s+only|not\s+working|doesn'?t\s+work|won'?t\s+(?:boot|post|turn\s+on))\b",
            "System",
            "Does not work as described",
            Severity::Critical,
        ),
        issue(
            r"\bartifact\w*|\bno\s+(?:display|signal|video)\b",
            "GPU",
            "Display artifacts or no video output",
            Severity::High,
        ),
        issue(
            r"\bbent\s+pins?\b",
            "Motherboard",
            "Bent socket pins",
            Severity::High,
        ),
        issue(
            r"\b(?:blue\s+screens?|bsods?|random(?:ly)?\s+(?:restarts?|shuts?\s+down|crash\w*)|crash(?:es|ing))\b",
            "System",
            "Crashes or blue screens",
            Severity::High,
        ),
        issue(
            r"\bthermal\s+(?:issues?|problems?|throttl\w*)\b|\boverheat\w*|\bruns\s+(?:very\s+)?hot\b",
            "Cooling",
            "Overheating or thermal throttling",
            Severity::Medium,
        ),
        issue(
            r"\b(?:cracked|shattered|broken)\s+(?:tempered\s+)?(?:glass|side\s+panel|panel|front\s+panel|case)\b",
            "Case",
            "Cracked or broken panel",
            Severity::Medium,
        ),
        issue(
            r"\bmissing\s+(?:the\s+)?(?:side\s+panel|cables?|drives?|ram|gpu|graphics\s+card|power\s+supply|psu)\b",
            "System",
            "Parts missing",
            Severity::Medium,
        ),
        issue(
            r"\bcoil\s+whine\b",
            "GPU",
            "Coil whine",
            Severity::Low,
        ),
        issue(
            r"\b(?:loud|noisy|rattl\w*|grinding)\s+fans?\b|\bfans?\s+(?:is\s+|are\s+)?(?:loud|noisy|rattl\w*|grinding)\b",
            "Cooling",
            "Noisy fans",
            Severity::Low,
        ),
        issue(
            r"\b(?:scratch(?:es|ed)?|dents?|dented|scuff(?:s|ed)?)\b",
            "Case",
            "Cosmetic wear",
            Severity::Low,
        ),
    ]
});

static PURCHASE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:bought|purchased|built|from|since)\s+(?:it\s+|this\s+)?(?:new\s+)?(?:in\s+)?(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+)?(20\d{2})\b",
    )
    .expect("valid regex")
});

static AGE_STATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s+(years?|months?)\s+old\b").expect("valid regex")
});

static HEAVY_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:mining|mined|miner|24/7|24-7|24x7|render\s+farm|server\s+use|ran\s+non[\s-]?stop)\b")
        .expect("valid regex")
});

static LIGHT_USE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:barely\s+used|lightly\s+used|light\s+use|rarely\s+used|hardly\s+used|used\s+(?:only\s+)?a\s+few\s+times|office\s+use|never\s+overclocked)\b",
    )
    .expect("valid regex")
});

/// Estimates the physical condition of a listed machine.
///
/// Scores start at 3, move with condition keywords and are capped when the
/// listing has few photos. The result is always within 1..=5.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionAssessor;

impl ConditionAssessor {
    /// Create an assessor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Assess `text` (title and description), given the listing's photo count
    /// and detected components. `now` anchors age estimates.
    #[must_use]
    pub fn assess(
        &self,
        text: &str,
        photo_count: usize,
        components: &Components,
        now: DateTime<Utc>,
    ) -> Condition {
        let text = text.to_lowercase();
        let mut score = BASELINE;
        let mut notes = Vec::new();

        for rule in ADJUSTMENTS.iter() {
            if rule.regex.is_match(&text) {
                score += rule.delta;
                notes.push(rule.note.to_string());
            }
        }

        let mut issues: Vec<Issue> = ISSUES
            .iter()
            .filter(|rule| rule.regex.is_match(&text))
            .map(|rule| Issue {
                component: rule.component.to_string(),
                description: rule.description.to_string(),
                severity: rule.severity,
            })
            .collect();

        let usage = if HEAVY_USE.is_match(&text) {
            notes.push("Heavy use (mining or 24/7 operation)".to_string());
            if components.gpu.is_some() {
                issues.push(Issue {
                    component: "GPU".to_string(),
                    description: "Used for mining or continuous load".to_string(),
                    severity: Severity::Medium,
                });
            }
            UsageIntensity::Heavy
        } else if LIGHT_USE.is_match(&text) {
            notes.push("Light use".to_string());
            UsageIntensity::Light
        } else {
            UsageIntensity::Moderate
        };

        let age_months = estimate_age_months(&text, now);
        if let Some(months) = age_months {
            notes.push(format!("About {months} months old"));
        }

        let cap = match photo_count {
            0 => Some(2),
            1 | 2 => Some(3),
            _ => None,
        };
        if let Some(cap) = cap {
            if score > cap {
                score = cap;
                notes.push(format!("Capped at {cap}: only {photo_count} photo(s)"));
            }
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let overall = score.clamp(1, 5) as u8;

        debug!(overall, issues = issues.len(), ?usage, "condition assessed");

        Condition {
            overall,
            notes,
            issues,
            age_months,
            usage,
        }
    }
}

/// Months since purchase, from "bought in 2021" or "2 years old".
///
/// A bare year is taken as January of that year. Future years are ignored.
fn estimate_age_months(text: &str, now: DateTime<Utc>) -> Option<u32> {
    if let Some(year) = PURCHASE_YEAR
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<i32>().ok())
        .find(|year| *year <= now.year())
    {
        let months = (now.year() - year) * 12 + i32::try_from(now.month0()).ok()?;
        return u32::try_from(months).ok();
    }

    let caps = AGE_STATED.captures(text)?;
    let amount: u32 = caps[1].parse().ok()?;
    Some(if caps[2].starts_with("year") {
        amount * 12
    } else {
        amount
    })
}
