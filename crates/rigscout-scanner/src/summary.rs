//! Deal summary of a finished scan.

use rigscout_core::{DealQuality, Platform, Recommendation, ScanJob};
use serde::{Deserialize, Serialize};

/// One entry of the top-deals list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    /// Listing URL
    pub url: String,
    /// Discovery index of the URL
    pub position: usize,
    /// Listing title
    pub title: String,
    /// Marketplace
    pub platform: Platform,
    /// Asking price
    pub price: f64,
    /// Estimated fair market value
    pub fmv: f64,
    /// Suggested opening offer
    pub suggested_offer: f64,
    /// ROI percentage
    pub roi_percent: f64,
    /// Deal bucket
    pub deal_quality: DealQuality,
    /// Fraud score, 0-100
    pub fraud_score: u8,
    /// Fraud recommendation
    pub recommendation: Recommendation,
}

/// Aggregate view of a job's successful results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Job the summary describes
    pub job_id: String,
    /// Successful results with an analysis
    pub total_deals: usize,
    /// Deals rated excellent
    pub excellent_deals: usize,
    /// Deals rated good
    pub good_deals: usize,
    /// Deals rated fair
    pub fair_deals: usize,
    /// Deals rated poor
    pub poor_deals: usize,
    /// Sum of ROI percentages
    pub total_roi: f64,
    /// Mean ROI percentage, 0 when there are no deals
    pub avg_roi: f64,
    /// Best deals by ROI, ties broken by discovery order
    pub top_deals: Vec<DealSummary>,
}

impl ScanSummary {
    /// Summarize `job`, keeping at most `top_n` top deals.
    #[must_use]
    pub fn from_job(job: &ScanJob, top_n: usize) -> Self {
        let mut summary = Self {
            job_id: job.id.clone(),
            total_deals: 0,
            excellent_deals: 0,
            good_deals: 0,
            fair_deals: 0,
            poor_deals: 0,
            total_roi: 0.0,
            avg_roi: 0.0,
            top_deals: Vec::new(),
        };

        let mut deals = Vec::new();
        for (result, analysis) in job.deals() {
            summary.total_deals += 1;
            summary.total_roi += analysis.roi_percent;
            match analysis.deal_quality {
                DealQuality::Excellent => summary.excellent_deals += 1,
                DealQuality::Good => summary.good_deals += 1,
                DealQuality::Fair => summary.fair_deals += 1,
                DealQuality::Poor => summary.poor_deals += 1,
            }
            let Some(listing) = result.listing.as_ref() else {
                continue;
            };
            deals.push(DealSummary {
                url: result.url.clone(),
                position: result.position,
                title: listing.title.clone(),
                platform: listing.platform,
                price: listing.price,
                fmv: analysis.fmv,
                suggested_offer: analysis.suggested_offer,
                roi_percent: analysis.roi_percent,
                deal_quality: analysis.deal_quality,
                fraud_score: listing.risk.score,
                recommendation: listing.risk.recommendation,
            });
        }

        if summary.total_deals > 0 {
            #[allow(clippy::cast_precision_loss)]
            let count = summary.total_deals as f64;
            summary.avg_roi = summary.total_roi / count;
        }

        deals.sort_by(|a, b| {
            b.roi_percent
                .total_cmp(&a.roi_percent)
                .then_with(|| a.position.cmp(&b.position))
        });
        deals.truncate(top_n);
        summary.top_deals = deals;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscout_core::{Analysis, Listing, RiskProfile, ScanOptions, ScanResult};

    fn analysis(roi_percent: f64, quality: DealQuality) -> Analysis {
        Analysis {
            fmv: 1000.0,
            suggested_offer: 500.0,
            profit: roi_percent * 5.0,
            roi: roi_percent / 100.0,
            roi_percent,
            deal_quality: quality,
            risks: vec![],
            opportunities: vec![],
            risk_profile: RiskProfile::default(),
        }
    }

    fn job_with(rois: &[(f64, DealQuality)]) -> ScanJob {
        let urls: Vec<String> = (0..=rois.len())
            .map(|i| format!("https://offerup.com/item/detail/{i}"))
            .collect();
        let mut job = ScanJob::new(urls.clone(), ScanOptions::default());
        for (i, (roi, quality)) in rois.iter().enumerate() {
            let listing = Listing::new(rigscout_core::Platform::OfferUp, &urls[i], format!("PC {i}"), 500.0);
            job.record(ScanResult::success(&urls[i], i, listing, analysis(*roi, *quality)));
        }
        job.record(ScanResult::failed(&urls[rois.len()], rois.len(), "Timeout after 10 ms"));
        job
    }

    #[test]
    fn test_counts_and_average() {
        let job = job_with(&[
            (60.0, DealQuality::Excellent),
            (30.0, DealQuality::Good),
            (-10.0, DealQuality::Poor),
        ]);
        let summary = ScanSummary::from_job(&job, 10);
        assert_eq!(summary.total_deals, 3);
        assert_eq!(summary.excellent_deals, 1);
        assert_eq!(summary.good_deals, 1);
        assert_eq!(summary.fair_deals, 0);
        assert_eq!(summary.poor_deals, 1);
        assert!((summary.total_roi - 80.0).abs() < 1e-9);
        assert!((summary.avg_roi - 80.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_deals_has_zero_average() {
        let summary = ScanSummary::from_job(&job_with(&[]), 10);
        assert_eq!(summary.total_deals, 0);
        assert!(summary.avg_roi.abs() < f64::EPSILON);
        assert!(summary.top_deals.is_empty());
    }

    #[test]
    fn test_top_deals_order_and_ties() {
        let job = job_with(&[
            (20.0, DealQuality::Fair),
            (55.0, DealQuality::Excellent),
            (20.0, DealQuality::Fair),
            (40.0, DealQuality::Good),
        ]);
        let summary = ScanSummary::from_job(&job, 3);
        let positions: Vec<usize> = summary.top_deals.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![1, 3, 0]);
    }
}
