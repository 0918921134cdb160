//! Processing of a single listing URL.
//!
//! A [`ListingPipeline`] runs one attempt of one scan unit: fetch, extract,
//! detect, assess, value and analyze. Timeouts and retries are the
//! orchestrator's concern.

use crate::filter::rejection_reason;
use chrono::Utc;
use rigscout_assess::{
    analyze_deal, CategoryRiskScorer, ConditionAssessor, FraudInput, FraudScorer, Valuation,
    ValuationError,
};
use rigscout_core::{AppConfig, DealConfig, FraudConfig, Listing, ScanFilters, ScanResult};
use rigscout_detect::ComponentDetector;
use rigscout_extract::{DocumentSource, ExtractionStrategy, ParsedDocument, StrategyRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

/// When no comparable prices are known, the 25th percentile is assumed to
/// sit at this fraction of the estimated value.
const FALLBACK_P25_RATIO: f64 = 0.8;

/// Collaborators for processing one URL.
#[derive(Clone)]
pub struct ListingPipeline {
    source: Arc<dyn DocumentSource>,
    valuation: Arc<dyn Valuation>,
    registry: StrategyRegistry,
    detector: ComponentDetector,
    condition: ConditionAssessor,
    fraud: FraudScorer,
    risk: CategoryRiskScorer,
    deals: DealConfig,
}

impl ListingPipeline {
    /// Pipeline with the built-in strategies, detector and default thresholds.
    #[must_use]
    pub fn new(source: Arc<dyn DocumentSource>, valuation: Arc<dyn Valuation>) -> Self {
        Self {
            source,
            valuation,
            registry: StrategyRegistry::with_defaults(),
            detector: ComponentDetector::new(),
            condition: ConditionAssessor::new(),
            fraud: FraudScorer::default(),
            risk: CategoryRiskScorer::new(),
            deals: DealConfig::default(),
        }
    }

    /// Pipeline using the fraud and deal sections of `config`.
    #[must_use]
    pub fn from_config(
        config: &AppConfig,
        source: Arc<dyn DocumentSource>,
        valuation: Arc<dyn Valuation>,
    ) -> Self {
        Self::new(source, valuation)
            .with_fraud_config(config.fraud.clone())
            .with_deal_config(config.deals.clone())
    }

    /// Replace the strategy registry.
    #[must_use]
    pub fn with_registry(mut self, registry: StrategyRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the component detector.
    #[must_use]
    pub fn with_detector(mut self, detector: ComponentDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Replace the category risk scorer.
    #[must_use]
    pub fn with_risk_scorer(mut self, risk: CategoryRiskScorer) -> Self {
        self.risk = risk;
        self
    }

    /// Use `config` for fraud thresholds and the seller blacklist.
    #[must_use]
    pub fn with_fraud_config(mut self, config: FraudConfig) -> Self {
        self.fraud = FraudScorer::new(config);
        self
    }

    /// Use `config` for deal thresholds, offer ratio and top-N.
    #[must_use]
    pub fn with_deal_config(mut self, config: DealConfig) -> Self {
        self.deals = config;
        self
    }

    /// Deal thresholds in use.
    #[must_use]
    pub fn deal_config(&self) -> &DealConfig {
        &self.deals
    }

    /// Run one attempt for `url`.
    ///
    /// Never fails: errors become failed results, unsupported URLs and
    /// filtered listings become skipped results.
    pub async fn process(&self, url: &str, position: usize, filters: &ScanFilters) -> ScanResult {
        let Some(strategy) = self.registry.select(url) else {
            debug!(url, "no extraction strategy");
            return ScanResult::skipped(url, position, "No extraction strategy for URL");
        };

        let document = match self.source.fetch_and_parse(url).await {
            Ok(doc) => doc,
            Err(e) => {
                debug!(url, error = %e, "fetch failed");
                return ScanResult::failed(url, position, format!("Fetch failed: {e}"));
            }
        };

        let mut listing = Self::extract(strategy.as_ref(), &document, url);
        let text = listing.full_text();
        listing.components = self.detector.detect_all_components(&text);
        listing.condition =
            self.condition
                .assess(&text, listing.images.len(), &listing.components, Utc::now());
        self.valuation.value_components(&mut listing.components);

        let fmv = match self.valuation.estimate_fmv(&listing).await {
            Ok(fmv) => fmv,
            Err(e @ ValuationError::NoData(_)) => {
                let mut result = ScanResult::skipped(url, position, format!("Valuation skipped: {e}"));
                result.listing = Some(listing);
                return result;
            }
            Err(e) => return ScanResult::failed(url, position, format!("Valuation failed: {e}")),
        };

        let p25 = match self.valuation.comparable_prices(&listing).await {
            Ok(Some(band)) => band.p25,
            Ok(None) => fmv * FALLBACK_P25_RATIO,
            Err(e) => {
                warn!(url, error = %e, "comparable prices unavailable");
                fmv * FALLBACK_P25_RATIO
            }
        };

        listing.risk = self.fraud.score(&FraudInput {
            listing: &listing,
            comparable_p25: Some(p25),
        });
        let profile = self.risk.score(&listing, fmv);
        let analysis = analyze_deal(&listing, fmv, profile, &self.deals);

        debug!(
            url,
            platform = %listing.platform,
            fmv,
            roi_percent = analysis.roi_percent,
            fraud_score = listing.risk.score,
            "listing analyzed"
        );

        if let Some(reason) = rejection_reason(filters, &listing, &analysis) {
            let mut result = ScanResult::skipped(url, position, reason);
            result.listing = Some(listing);
            result.analysis = Some(analysis);
            return result;
        }
        ScanResult::success(url, position, listing, analysis)
    }

    /// Parse and extract synchronously; the parsed tree is not `Send`.
    fn extract(strategy: &dyn ExtractionStrategy, document: &ParsedDocument, url: &str) -> Listing {
        let html = document.parse();
        strategy.extract_listing(&html, url)
    }
}
