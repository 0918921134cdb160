//! Post-analysis result filters.

use rigscout_core::{Analysis, Listing, Recommendation, ScanFilters};

/// Reason `listing` fails `filters`, or `None` if it passes.
///
/// Filters are checked in a fixed order and the first failing one is
/// reported.
#[must_use]
pub fn rejection_reason(filters: &ScanFilters, listing: &Listing, analysis: &Analysis) -> Option<String> {
    if !filters.platforms.is_empty() && !filters.platforms.contains(&listing.platform) {
        return Some(format!("Filtered: platform {} not selected", listing.platform));
    }
    if let Some(min) = filters.min_price {
        if listing.price < min {
            return Some(format!("Filtered: price ${:.0} below minimum ${min:.0}", listing.price));
        }
    }
    if let Some(max) = filters.max_price {
        if listing.price > max {
            return Some(format!("Filtered: price ${:.0} above maximum ${max:.0}", listing.price));
        }
    }
    if filters.require_gpu && listing.components.gpu.is_none() {
        return Some("Filtered: no GPU detected".to_string());
    }
    if let Some(min) = filters.min_condition {
        if listing.condition.overall < min {
            return Some(format!(
                "Filtered: condition {}/5 below minimum {min}/5",
                listing.condition.overall
            ));
        }
    }
    if let Some(max) = filters.max_fraud_score {
        if listing.risk.score > max {
            return Some(format!(
                "Filtered: fraud score {} above maximum {max}",
                listing.risk.score
            ));
        }
    }
    if filters.exclude_avoid && listing.risk.recommendation == Recommendation::Avoid {
        return Some("Filtered: fraud recommendation is avoid".to_string());
    }
    if let Some(min) = filters.min_roi_percent {
        if analysis.roi_percent < min {
            return Some(format!(
                "Filtered: ROI {:.1}% below minimum {min:.1}%",
                analysis.roi_percent
            ));
        }
    }
    None
}
