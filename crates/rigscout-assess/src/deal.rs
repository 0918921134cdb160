//! Deal analysis: ROI, suggested offer and human-readable risks and upsides.

use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{Analysis, DealConfig, DealQuality, FraudSignalKind, Listing, RiskProfile, Severity};

/// Category scores at or above this are reported as risks.
const HIGH_CATEGORY_RISK: f64 = 7.0;

static NEGOTIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:obo|or\s+best\s+offer|negotiable|open\s+to\s+offers|make\s+(?:me\s+)?an\s+offer)\b")
        .expect("valid regex")
});

/// Round to the nearest multiple of five dollars.
fn round_to_five(value: f64) -> f64 {
    (value / 5.0).round() * 5.0
}

/// Analyze one listing against its estimated fair market value.
///
/// ROI is `(fmv - price) / price`; a listing with no price gets an ROI of 0
/// rather than an infinite one. The suggested offer never exceeds the
/// asking price.
#[must_use]
pub fn analyze_deal(listing: &Listing, fmv: f64, risk_profile: RiskProfile, config: &DealConfig) -> Analysis {
    let price = listing.price;
    let profit = fmv - price;
    let roi = if price > 0.0 { profit / price } else { 0.0 };
    let roi_percent = roi * 100.0;

    let target = fmv * config.offer_ratio;
    let suggested_offer = if price > 0.0 {
        round_to_five(target.min(price)).max(0.0)
    } else {
        0.0
    };

    let deal_quality = DealQuality::classify(
        roi_percent,
        config.excellent_roi_percent,
        config.good_roi_percent,
        config.fair_roi_percent,
    );

    Analysis {
        fmv,
        suggested_offer,
        profit,
        roi,
        roi_percent,
        deal_quality,
        risks: collect_risks(listing, &risk_profile),
        opportunities: collect_opportunities(listing, fmv, profit, roi_percent, config),
        risk_profile,
    }
}

fn collect_risks(listing: &Listing, profile: &RiskProfile) -> Vec<String> {
    let mut risks: Vec<String> = listing
        .risk
        .signals
        .iter()
        .filter(|s| s.delta > 0)
        .map(|s| s.description.clone())
        .collect();

    risks.extend(
        listing
            .condition
            .issues
            .iter()
            .filter(|i| i.severity >= Severity::Medium)
            .map(|i| format!("{}: {}", i.component, i.description)),
    );

    risks.extend(
        profile
            .categories
            .iter()
            .filter(|c| c.score >= HIGH_CATEGORY_RISK)
            .map(|c| format!("High {} risk ({:.1}/10)", c.name.replace('_', " "), c.score)),
    );
    risks
}

fn collect_opportunities(
    listing: &Listing,
    fmv: f64,
    profit: f64,
    roi_percent: f64,
    config: &DealConfig,
) -> Vec<String> {
    let mut opportunities = Vec::new();
    let components = &listing.components;

    if profit > 0.0 && listing.price > 0.0 {
        opportunities.push(format!("Estimated profit ${profit:.0} ({roi_percent:.0}% ROI)"));
    }
    if roi_percent >= config.excellent_roi_percent {
        opportunities.push("Priced well below estimated value".to_string());
    }

    if let Some(gpu_value) = components.gpu.as_ref().and_then(|g| g.value) {
        if fmv > 0.0 && gpu_value / fmv >= 0.4 {
            opportunities.push(format!("GPU alone is worth about ${gpu_value:.0}; part-out candidate"));
        }
    }
    if components.total_ram_gb() >= 32 {
        opportunities.push(format!("{} GB of RAM", components.total_ram_gb()));
    }
    if components.psu.as_ref().and_then(|p| p.wattage).is_some_and(|w| w >= 750) {
        opportunities.push("High-wattage PSU leaves room for GPU upgrades".to_string());
    }

    if listing.condition.overall >= 4 {
        opportunities.push("Good condition".to_string());
    }
    if listing
        .risk
        .signals
        .iter()
        .any(|s| s.kind == FraudSignalKind::EstablishedSeller)
    {
        opportunities.push("Established seller".to_string());
    }
    if NEGOTIABLE.is_match(&listing.full_text().to_lowercase()) {
        opportunities.push("Seller is open to offers".to_string());
    }
    opportunities
}
