//! Additive, rule-based fraud scoring on a 0-100 scale.
//!
//! Every rule inspects the listing independently and may emit one
//! [`FraudSignal`] carrying a signed delta. The score is the clamped sum of
//! deltas; a blacklisted seller forces [`Recommendation::Avoid`] whatever the
//! number says.

use crate::era::cpu_release_year;
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::{
    FraudConfig, FraudSignal, FraudSignalKind, Listing, Recommendation, RiskAssessment,
    Severity,
};
use tracing::debug;

/// Everything the scorer looks at for one listing.
#[derive(Debug, Clone, Copy)]
pub struct FraudInput<'a> {
    /// Listing with seller, images and detected components filled in
    pub listing: &'a Listing,
    /// 25th percentile of comparable asking prices, if known
    pub comparable_p25: Option<f64>,
}

type Rule = fn(&FraudScorer, &FraudInput<'_>, &str) -> Option<FraudSignal>;

const RULES: &[Rule] = &[
    price_anomaly,
    photos,
    stock_photos,
    shipping_only,
    payment,
    urgency,
    serial_removed,
    new_account_high_price,
    template_text,
    generation_mismatch,
    many_listings,
    established_seller,
    blacklisted,
];

static STOCK_IMAGE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"shutterstock|gettyimages|istockphoto|stock[-_]?photo|media-amazon\.com|images-amazon\.com|neweggimages\.com|bbystatic\.com|/press/|/product-images?/")
        .expect("valid regex")
});

static STOCK_IMAGE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:stock\s+(?:photo|image|picture)s?|photos?\s+from\s+(?:the\s+)?(?:internet|google|web)|not\s+(?:the\s+)?actual\s+(?:photo|picture|item|unit)|for\s+illustration)\b")
        .expect("valid regex")
});

static SHIPPING_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:shipping\s+only|ship\s+only|will\s+only\s+ship|no\s+local\s+pick\s*-?\s*up|no\s+pick\s*-?\s*ups?|can'?t\s+meet|cannot\s+meet|no\s+meet\s*-?\s*ups?|currently\s+out\s+of\s+(?:town|state|the\s+country))\b")
        .expect("valid regex")
});

// Crypto only counts when it is asked for as payment; "used for crypto mining" is hardware history.
static NON_REVERSIBLE_PAYMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:wire\s+transfer|western\s+union|money\s*gram|gift\s*cards?|zelle\s+only|cash\s*app\s+only|venmo\s+only|paypal\s+(?:friends|f&f)|friends\s+(?:and|&)\s+family|(?:pay(?:ment)?|paid|accept(?:s|ed|ing)?|tak(?:e|es|ing)|only)\s+(?:(?:in|with|via|by|through)\s+)?(?:bitcoin|btc|crypto(?:currency)?|usdt)|(?:bitcoin|btc|crypto(?:currency)?|usdt)\s+(?:only|payments?|accepted|preferred))\b")
        .expect("valid regex")
});

static URGENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:must\s+(?:sell|go)\s+(?:today|asap|now|fast|quickly)|need\s+(?:it\s+)?(?:gone|sold)\s+(?:today|asap|fast|now)|first\s+come,?\s+first\s+serve\w*|moving\s+(?:tomorrow|tonight|this\s+week)|urgent(?:ly)?|asap|today\s+only|act\s+fast|won'?t\s+last)\b")
        .expect("valid regex")
});

static SERIAL_REMOVED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:serial\s+(?:number\s+|sticker\s+)?(?:removed|scratched(?:\s+off)?|missing|peeled)|no\s+serial(?:\s+number)?|without\s+(?:a\s+)?serial|won'?t\s+(?:share|provide|give)\s+(?:the\s+)?serial)\b")
        .expect("valid regex")
});

static TEMPLATE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:whats\s*app|telegram|kindly|dear\s+(?:buyer|customer|friend)|god\s+bless|100%\s+(?:legit|genuine|original)|contact\s+me\s+(?:via|on|at)\s+(?:my\s+)?(?:email|whatsapp|telegram)|text\s+me\s+on\s+whatsapp)\b|[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}")
        .expect("valid regex")
});

/// Largest CPU/GPU release-year gap that is still a plausible build.
const MAX_GENERATION_GAP: i32 = 5;

/// Fraud scorer configured with thresholds and the seller blacklist.
#[derive(Debug, Clone, Default)]
pub struct FraudScorer {
    config: FraudConfig,
}

impl FraudScorer {
    /// Create a scorer from `config`.
    #[must_use]
    pub fn new(config: FraudConfig) -> Self {
        Self { config }
    }

    /// Score one listing.
    ///
    /// Signals come back sorted by descending delta, so the heaviest reasons
    /// surface first.
    #[must_use]
    pub fn score(&self, input: &FraudInput<'_>) -> RiskAssessment {
        let text = input.listing.full_text().to_lowercase();

        let mut signals: Vec<FraudSignal> = RULES
            .iter()
            .filter_map(|rule| rule(self, input, &text))
            .collect();
        signals.sort_by(|a, b| b.delta.cmp(&a.delta));

        let total: i32 = signals.iter().map(|s| s.delta).sum();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = total.clamp(0, 100) as u8;

        let recommendation = if signals.iter().any(|s| s.auto_block) {
            Recommendation::Avoid
        } else {
            self.recommend(score)
        };

        let mut questions: Vec<String> = Vec::new();
        for signal in &signals {
            if let Some(question) = question_for(signal.kind) {
                if !questions.iter().any(|q| q == question) {
                    questions.push(question.to_string());
                }
            }
        }

        debug!(
            url = %input.listing.url,
            score,
            signals = signals.len(),
            %recommendation,
            "fraud score computed"
        );

        RiskAssessment {
            score,
            signals,
            recommendation,
            questions,
        }
    }

    /// Map a score to a recommendation using the configured thresholds.
    #[must_use]
    pub fn recommend(&self, score: u8) -> Recommendation {
        if score >= self.config.avoid_threshold {
            Recommendation::Avoid
        } else if score >= self.config.caution_threshold {
            Recommendation::Caution
        } else {
            Recommendation::Proceed
        }
    }

    fn is_blacklisted(&self, listing: &Listing) -> bool {
        let name = listing.seller.name.to_lowercase();
        let profile = listing.seller.profile_url.as_deref().map(str::to_lowercase);
        self.config.blacklisted_sellers.iter().any(|entry| {
            let entry = entry.trim().to_lowercase();
            !entry.is_empty() && (entry == name || profile.as_deref() == Some(entry.as_str()))
        })
    }
}

fn signal(
    kind: FraudSignalKind,
    severity: Severity,
    delta: i32,
    description: String,
    mitigation: Option<&str>,
) -> FraudSignal {
    FraudSignal {
        kind,
        severity,
        delta,
        description,
        mitigation: mitigation.map(ToString::to_string),
        auto_block: false,
    }
}

fn price_anomaly(_: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    let p25 = input.comparable_p25.filter(|p| *p > 0.0)?;
    let price = input.listing.price;
    if price <= 0.0 {
        return None;
    }
    let below = (1.0 - price / p25) * 100.0;
    let (severity, delta) = if below > 50.0 {
        (Severity::High, 40)
    } else if below > 30.0 {
        (Severity::Medium, 20)
    } else {
        return None;
    };
    Some(signal(
        FraudSignalKind::PriceAnomaly,
        severity,
        delta,
        format!("Asking ${price:.0} is {below:.0}% below comparable listings (${p25:.0})"),
        Some("Inspect and test the machine in person before paying"),
    ))
}

fn photos(_: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    match input.listing.images.len() {
        0 => Some(signal(
            FraudSignalKind::InsufficientPhotos,
            Severity::High,
            20,
            "No photos".to_string(),
            Some("Ask for photos of the running system"),
        )),
        n @ 1..=2 => Some(signal(
            FraudSignalKind::InsufficientPhotos,
            Severity::Medium,
            10,
            format!("Only {n} photo(s)"),
            Some("Ask for more photos, including the inside of the case"),
        )),
        _ => None,
    }
}

fn stock_photos(_: &FraudScorer, input: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    let stock_url = input
        .listing
        .images
        .iter()
        .any(|url| STOCK_IMAGE_URL.is_match(&url.to_lowercase()));
    if !stock_url && !STOCK_IMAGE_TEXT.is_match(text) {
        return None;
    }
    Some(signal(
        FraudSignalKind::StockPhotos,
        Severity::Medium,
        15,
        "Photos look like stock or manufacturer images".to_string(),
        Some("Ask for a photo with a handwritten note and today's date"),
    ))
}

fn shipping_only(_: &FraudScorer, _: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    SHIPPING_ONLY.find(text).map(|m| {
        signal(
            FraudSignalKind::ShippingOnly,
            Severity::Medium,
            15,
            format!("No local pickup (\"{}\")", m.as_str()),
            Some("Only buy shipped items through a platform with buyer protection"),
        )
    })
}

fn payment(_: &FraudScorer, _: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    NON_REVERSIBLE_PAYMENT.find(text).map(|m| {
        signal(
            FraudSignalKind::NonReversiblePayment,
            Severity::High,
            25,
            format!("Asks for non-reversible payment (\"{}\")", m.as_str()),
            Some("Pay cash in person or use a method with buyer protection"),
        )
    })
}

fn urgency(_: &FraudScorer, _: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    URGENCY.find(text).map(|m| {
        signal(
            FraudSignalKind::UrgencyLanguage,
            Severity::Low,
            10,
            format!("Pressure to buy quickly (\"{}\")", m.as_str()),
            None,
        )
    })
}

fn serial_removed(_: &FraudScorer, _: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    SERIAL_REMOVED.find(text).map(|_| {
        signal(
            FraudSignalKind::SerialRemoved,
            Severity::High,
            25,
            "Serial number removed or withheld".to_string(),
            Some("Check the serial against the manufacturer's warranty lookup"),
        )
    })
}

fn new_account_high_price(scorer: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    let listing = input.listing;
    let age = listing.seller.account_age_days?;
    if age >= 30 || listing.price <= scorer.config.high_price_threshold {
        return None;
    }
    Some(signal(
        FraudSignalKind::NewAccountHighPrice,
        Severity::Medium,
        15,
        format!("Account is {age} days old and asks ${:.0}", listing.price),
        Some("Review the seller's profile and meet in a public place"),
    ))
}

fn template_text(_: &FraudScorer, _: &FraudInput<'_>, text: &str) -> Option<FraudSignal> {
    TEMPLATE_TEXT.find(text).map(|m| {
        signal(
            FraudSignalKind::TemplateText,
            Severity::Low,
            10,
            format!("Text matches common scam templates (\"{}\")", m.as_str()),
            Some("Keep the conversation on the marketplace's own messaging"),
        )
    })
}

fn generation_mismatch(_: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    let components = &input.listing.components;
    let cpu_year = components.cpu.as_ref().and_then(cpu_release_year)?;
    let gpu_year = i32::try_from(components.gpu.as_ref()?.release_year?).ok()?;
    if (gpu_year - cpu_year).abs() <= MAX_GENERATION_GAP {
        return None;
    }
    Some(signal(
        FraudSignalKind::GenerationMismatch,
        Severity::Low,
        10,
        format!("{cpu_year} CPU paired with a {gpu_year} GPU"),
        Some("Ask for a screenshot of the system information or GPU-Z"),
    ))
}

fn many_listings(scorer: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    let active = input.listing.seller.active_listings?;
    if active <= scorer.config.many_listings_threshold {
        return None;
    }
    Some(signal(
        FraudSignalKind::ManyActiveListings,
        Severity::Medium,
        10,
        format!("Seller has {active} active listings"),
        Some("Check whether the same photos appear in other listings"),
    ))
}

fn established_seller(_: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    let seller = &input.listing.seller;
    let long_standing = seller.account_age_days.is_some_and(|d| d >= 365);
    let well_rated = seller.rating.is_some_and(|r| r >= 4.5) && seller.review_count >= 10;
    if !(well_rated && (long_standing || seller.verified)) {
        return None;
    }
    Some(signal(
        FraudSignalKind::EstablishedSeller,
        Severity::Low,
        -10,
        format!("Established seller with {} reviews", seller.review_count),
        None,
    ))
}

fn blacklisted(scorer: &FraudScorer, input: &FraudInput<'_>, _: &str) -> Option<FraudSignal> {
    if !scorer.is_blacklisted(input.listing) {
        return None;
    }
    Some(FraudSignal {
        auto_block: true,
        ..signal(
            FraudSignalKind::BlacklistedSeller,
            Severity::Critical,
            50,
            format!("Seller \"{}\" is blacklisted", input.listing.seller.name),
            Some("Do not engage"),
        )
    })
}

fn question_for(kind: FraudSignalKind) -> Option<&'static str> {
    Some(match kind {
        FraudSignalKind::PriceAnomaly => "Why is the price so far below similar systems?",
        FraudSignalKind::InsufficientPhotos | FraudSignalKind::StockPhotos => {
            "Can you send a photo of the running system with today's date on a note?"
        }
        FraudSignalKind::ShippingOnly => "Is local pickup possible so I can test it first?",
        FraudSignalKind::NonReversiblePayment => "Can we do cash in person or a protected payment?",
        FraudSignalKind::UrgencyLanguage => "Why does it need to sell so quickly?",
        FraudSignalKind::SerialRemoved => "Can you share the serial numbers of the GPU and the case?",
        FraudSignalKind::NewAccountHighPrice => "Do you have the original receipt?",
        FraudSignalKind::TemplateText => "Can we keep talking through the marketplace messages?",
        FraudSignalKind::GenerationMismatch => "Can you send a screenshot of the system specs?",
        FraudSignalKind::ManyActiveListings => "Is this your personal machine?",
        FraudSignalKind::EstablishedSeller | FraudSignalKind::BlacklistedSeller => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscout_core::{Cpu, Gpu, Platform};

    fn listing(price: f64, photos: usize) -> Listing {
        let mut listing = Listing::new(
            Platform::Craigslist,
            "https://sfbay.craigslist.org/sfc/sys/d/gaming-pc/7712345678.html",
            "Gaming PC RTX 3070",
            price,
        );
        listing.description = "Ryzen 7 5800X, RTX 3070, 32GB RAM. Local pickup, cash.".to_string();
        listing.images = (0..photos)
            .map(|i| format!("https://images.craigslist.org/{i}_600x450.jpg"))
            .collect();
        listing
    }

    fn score(listing: &Listing, p25: Option<f64>) -> RiskAssessment {
        FraudScorer::default().score(&FraudInput {
            listing,
            comparable_p25: p25,
        })
    }

    #[test]
    fn test_clean_listing_scores_zero() {
        let l = listing(900.0, 5);
        let risk = score(&l, Some(850.0));
        assert_eq!(risk.score, 0);
        assert!(risk.signals.is_empty());
        assert!(risk.questions.is_empty());
        assert_eq!(risk.recommendation, Recommendation::Proceed);
    }

    #[test]
    fn test_price_far_below_comparables() {
        let l = listing(250.0, 5);
        let risk = score(&l, Some(1000.0));
        assert!(risk.score >= 40);
        assert_ne!(risk.recommendation, Recommendation::Proceed);
        assert_eq!(risk.signals[0].kind, FraudSignalKind::PriceAnomaly);
        assert_eq!(risk.signals[0].delta, 40);

        let l = listing(650.0, 5);
        let risk = score(&l, Some(1000.0));
        assert_eq!(risk.score, 20);
        assert_eq!(risk.recommendation, Recommendation::Proceed);
    }

    #[test]
    fn test_photo_rules() {
        assert_eq!(score(&listing(900.0, 0), None).score, 20);
        assert_eq!(score(&listing(900.0, 2), None).score, 10);
    }

    #[test]
    fn test_signals_sorted_and_summed() {
        let mut l = listing(900.0, 0);
        l.description =
            "Shipping only, payment by wire transfer. Must sell today! Serial removed.".to_string();
        let risk = score(&l, None);

        // 20 photos + 15 shipping + 25 payment + 10 urgency + 25 serial
        assert_eq!(risk.score, 95);
        assert_eq!(risk.recommendation, Recommendation::Avoid);
        let deltas: Vec<i32> = risk.signals.iter().map(|s| s.delta).collect();
        let mut sorted = deltas.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(deltas, sorted);
        assert!(!risk.questions.is_empty());
    }

    #[test]
    fn test_crypto_payment_needs_payment_context() {
        let mut l = listing(900.0, 5);
        l.description = "RTX 3070, never used for crypto mining. Local pickup, cash.".to_string();
        let risk = score(&l, None);
        assert_eq!(risk.score, 0);
        assert!(risk.signals.is_empty());

        for text in [
            "Payment in bitcoin, no cash.",
            "Only accepting crypto for this one.",
            "BTC only, shipped same day.",
        ] {
            l.description = text.to_string();
            let risk = score(&l, None);
            assert!(
                risk.signals
                    .iter()
                    .any(|s| s.kind == FraudSignalKind::NonReversiblePayment),
                "{text}"
            );
        }
    }

    #[test]
    fn test_score_is_capped() {
        let mut l = listing(100.0, 0);
        l.description = "shipping only. bitcoin only. urgent. no serial. whatsapp me. stock photo".to_string();
        l.seller.account_age_days = Some(3);
        l.seller.active_listings = Some(80);
        let risk = FraudScorer::new(FraudConfig {
            high_price_threshold: 50.0,
            ..FraudConfig::default()
        })
        .score(&FraudInput {
            listing: &l,
            comparable_p25: Some(900.0),
        });
        assert_eq!(risk.score, 100);
    }

    #[test]
    fn test_established_seller_credit() {
        let mut l = listing(900.0, 2);
        l.seller.account_age_days = Some(2000);
        l.seller.rating = Some(4.9);
        l.seller.review_count = 120;
        let risk = score(&l, None);
        assert_eq!(risk.score, 0);
        assert!(risk
            .signals
            .iter()
            .any(|s| s.kind == FraudSignalKind::EstablishedSeller && s.delta < 0));
    }

    #[test]
    fn test_blacklist_forces_avoid() {
        let mut l = listing(900.0, 5);
        l.seller.name = "PC Flipper Deals".to_string();
        let scorer = FraudScorer::new(FraudConfig {
            blacklisted_sellers: vec!["pc flipper deals".to_string()],
            avoid_threshold: 90,
            ..FraudConfig::default()
        });
        let risk = scorer.score(&FraudInput {
            listing: &l,
            comparable_p25: None,
        });
        assert!(risk.score < 90);
        assert_eq!(risk.recommendation, Recommendation::Avoid);
        assert!(risk.signals[0].auto_block);
    }

    #[test]
    fn test_generation_mismatch() {
        let mut l = listing(900.0, 5);
        l.components.cpu = Some(Cpu {
            brand: "Intel".to_string(),
            model: "Core i5-4590".to_string(),
            family: "Core i5".to_string(),
            generation: Some(4),
            cores: Some(4),
            threads: Some(4),
            tdp_watts: Some(84),
            socket: Some("LGA1150".to_string()),
            architecture: Some("Haswell".to_string()),
            value: None,
        });
        l.components.gpu = Some(Gpu {
            brand: "NVIDIA".to_string(),
            model: "RTX 4090".to_string(),
            series: Some("RTX 40".to_string()),
            vram_gb: Some(24),
            tdp_watts: Some(450),
            architecture: Some("Ada Lovelace".to_string()),
            release_year: Some(2022),
            value: None,
        });
        let risk = score(&l, None);
        assert_eq!(risk.score, 10);
        assert_eq!(risk.signals[0].kind, FraudSignalKind::GenerationMismatch);
    }

    #[test]
    fn test_recommendation_thresholds() {
        let scorer = FraudScorer::default();
        assert_eq!(scorer.recommend(29), Recommendation::Proceed);
        assert_eq!(scorer.recommend(30), Recommendation::Caution);
        assert_eq!(scorer.recommend(59), Recommendation::Caution);
        assert_eq!(scorer.recommend(60), Recommendation::Avoid);
    }
}
