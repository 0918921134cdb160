//! Multi-category risk profile on a 0-10 scale.
//!
//! This is a separate instrument from the 0-100 fraud score. It looks at the
//! listing from five angles and never reads the fraud signals, so the two
//! scales can be compared side by side without double counting.

use rigscout_core::{Listing, RiskCategory, RiskProfile, Severity, UsageIntensity};
use serde::{Deserialize, Serialize};

const MAX_CATEGORY_SCORE: f64 = 10.0;

/// Relative weight of each category in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Price against estimated value
    pub price: f64,
    /// Seller history
    pub seller: f64,
    /// Physical condition
    pub condition: f64,
    /// How much of the hardware could be identified
    pub hardware: f64,
    /// Description and photo quality
    pub listing_quality: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            price: 0.25,
            seller: 0.25,
            condition: 0.20,
            hardware: 0.15,
            listing_quality: 0.15,
        }
    }
}

/// Scores listings into a [`RiskProfile`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRiskScorer {
    weights: RiskWeights,
}

/// Accumulates one category's score and reasons.
struct Category {
    score: f64,
    reasons: Vec<String>,
}

impl Category {
    fn new(base: f64) -> Self {
        Self {
            score: base,
            reasons: Vec::new(),
        }
    }

    fn add(&mut self, amount: f64, reason: impl Into<String>) {
        self.score += amount;
        self.reasons.push(reason.into());
    }

    fn finish(self, name: &str, weight: f64) -> RiskCategory {
        RiskCategory {
            name: name.to_string(),
            score: round1(self.score.clamp(0.0, MAX_CATEGORY_SCORE)),
            weight,
            reasons: self.reasons,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl CategoryRiskScorer {
    /// Scorer with default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scorer with custom weights.
    #[must_use]
    pub fn with_weights(weights: RiskWeights) -> Self {
        Self { weights }
    }

    /// Score `listing` against its estimated fair market value.
    #[must_use]
    pub fn score(&self, listing: &Listing, fmv: f64) -> RiskProfile {
        let w = self.weights;
        let categories = vec![
            price_risk(listing, fmv).finish("price", w.price),
            seller_risk(listing).finish("seller", w.seller),
            condition_risk(listing).finish("condition", w.condition),
            hardware_risk(listing).finish("hardware", w.hardware),
            listing_quality_risk(listing).finish("listing_quality", w.listing_quality),
        ];

        let total_weight: f64 = categories.iter().map(|c| c.weight).sum();
        let overall = if total_weight > 0.0 {
            categories.iter().map(|c| c.score * c.weight).sum::<f64>() / total_weight
        } else {
            0.0
        };

        RiskProfile {
            overall: round1(overall.clamp(0.0, MAX_CATEGORY_SCORE)),
            categories,
        }
    }
}

fn price_risk(listing: &Listing, fmv: f64) -> Category {
    let mut c = Category::new(1.0);
    if fmv <= 0.0 || listing.price <= 0.0 {
        c.add(4.0, "No price or market value to compare");
        return c;
    }
    let ratio = listing.price / fmv;
    if ratio < 0.4 {
        c.add(7.0, "Priced far below estimated value");
    } else if ratio < 0.6 {
        c.add(4.0, "Priced well below estimated value");
    } else if ratio > 1.2 {
        c.add(5.0, "Priced above estimated value");
    } else if ratio > 1.0 {
        c.add(2.0, "Priced at or slightly above estimated value");
    }
    c
}

fn seller_risk(listing: &Listing) -> Category {
    let seller = &listing.seller;
    let mut c = Category::new(2.0);
    match seller.account_age_days {
        None => c.add(2.0, "Account age unknown"),
        Some(d) if d < 30 => c.add(4.0, format!("Account is only {d} days old")),
        Some(d) if d < 180 => c.add(2.0, "Account is less than six months old"),
        Some(_) => {}
    }
    match seller.rating {
        Some(r) if r < 4.0 => c.add(2.0, format!("Low seller rating ({r:.1})")),
        Some(r) if r >= 4.8 && seller.review_count >= 10 => {
            c.add(-1.5, "Highly rated seller");
        }
        _ => {}
    }
    if seller.review_count == 0 {
        c.add(1.0, "No reviews");
    }
    if seller.verified {
        c.add(-1.0, "Verified seller");
    }
    c
}

fn condition_risk(listing: &Listing) -> Category {
    let condition = &listing.condition;
    let mut c = Category::new(f64::from(5u8.saturating_sub(condition.overall)) * 2.0);
    for issue in &condition.issues {
        match issue.severity {
            Severity::Critical => c.add(3.0, format!("{}: {}", issue.component, issue.description)),
            Severity::High => c.add(1.5, format!("{}: {}", issue.component, issue.description)),
            Severity::Medium => c.add(0.5, format!("{}: {}", issue.component, issue.description)),
            Severity::Low => {}
        }
    }
    if condition.usage == UsageIntensity::Heavy {
        c.add(1.5, "Heavy prior use");
    }
    c
}

fn hardware_risk(listing: &Listing) -> Category {
    let components = &listing.components;
    let mut c = Category::new(1.0);
    if components.is_empty() {
        c.add(7.0, "No components identified");
        return c;
    }
    if components.cpu.is_none() {
        c.add(2.0, "CPU not identified");
    }
    if components.gpu.is_none() {
        c.add(1.0, "GPU not identified");
    }
    if components.ram.is_empty() {
        c.add(1.0, "RAM not identified");
    }
    if components.storage.is_empty() {
        c.add(1.0, "Storage not identified");
    }
    c
}

fn listing_quality_risk(listing: &Listing) -> Category {
    let mut c = Category::new(0.0);
    let words = listing.description.split_whitespace().count();
    if words < 10 {
        c.add(3.0, "Very short description");
    } else if words < 30 {
        c.add(1.0, "Short description");
    }
    match listing.images.len() {
        0 => c.add(4.0, "No photos"),
        1 | 2 => c.add(2.0, "Few photos"),
        _ => {}
    }
    if listing.location.is_empty() || listing.location == "Unknown" {
        c.add(1.0, "No location given");
    }
    c
}
