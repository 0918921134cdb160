//! JSON and CSV export of scan results.

use crate::error::Result;
use rigscout_core::{ScanJob, ScanResult};
use serde::{Deserialize, Serialize};

/// Output format for [`export_job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON array of results
    Json,
    /// One row per result with a header line
    Csv,
}

const CSV_HEADER: &[&str] = &[
    "URL",
    "Status",
    "Title",
    "Price",
    "Platform",
    "FMV",
    "Suggested Offer",
    "ROI",
    "ROI%",
    "Deal Quality",
    "Risk Count",
    "Opportunities",
];

/// Serialize the results of `job` in `format`.
pub fn export_job(job: &ScanJob, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(&job.results)?),
        ExportFormat::Csv => Ok(to_csv(&job.results)),
    }
}

fn to_csv(results: &[ScanResult]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|h| (*h).to_string()));
    for result in results {
        push_row(&mut out, csv_fields(result));
    }
    out
}

fn csv_fields(result: &ScanResult) -> Vec<String> {
    let listing = result.listing.as_ref();
    let analysis = result.analysis.as_ref();
    vec![
        result.url.clone(),
        result.status.to_string(),
        listing.map(|l| l.title.clone()).unwrap_or_default(),
        listing.map(|l| format!("{:.2}", l.price)).unwrap_or_default(),
        listing.map(|l| l.platform.to_string()).unwrap_or_default(),
        analysis.map(|a| format!("{:.2}", a.fmv)).unwrap_or_default(),
        analysis.map(|a| format!("{:.2}", a.suggested_offer)).unwrap_or_default(),
        analysis.map(|a| format!("{:.4}", a.roi)).unwrap_or_default(),
        analysis.map(|a| format!("{:.1}", a.roi_percent)).unwrap_or_default(),
        analysis.map(|a| a.deal_quality.to_string()).unwrap_or_default(),
        analysis.map(|a| a.risks.len().to_string()).unwrap_or_default(),
        analysis.map(|a| a.opportunities.join("; ")).unwrap_or_default(),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Append one CRLF-terminated RFC 4180 row.
fn push_row(out: &mut String, fields: impl IntoIterator<Item = String>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quotes(&field) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigscout_core::{Analysis, DealQuality, Listing, Platform, RiskProfile, ScanOptions};

    fn job() -> ScanJob {
        let urls = vec![
            "https://offerup.com/item/detail/1".to_string(),
            "https://offerup.com/item/detail/2".to_string(),
        ];
        let mut job = ScanJob::new(urls, ScanOptions::default());
        job.mark_running();

        let listing = Listing::new(
            Platform::OfferUp,
            "https://offerup.com/item/detail/1",
            "Gaming PC, \"RTX 3070\"",
            600.0,
        );
        let analysis = Analysis {
            fmv: 900.0,
            suggested_offer: 600.0,
            profit: 300.0,
            roi: 0.5,
            roi_percent: 50.0,
            deal_quality: DealQuality::Excellent,
            risks: vec!["Only 2 photo(s)".to_string()],
            opportunities: vec!["Good condition".to_string(), "32 GB of RAM".to_string()],
            risk_profile: RiskProfile::default(),
        };
        job.record(ScanResult::success(
            "https://offerup.com/item/detail/1",
            0,
            listing,
            analysis,
        ));
        job.record(ScanResult::failed(
            "https://offerup.com/item/detail/2",
            1,
            "Timeout after 100 ms",
        ));
        job
    }

    #[test]
    fn test_csv_quoting_and_columns() {
        let csv = export_job(&job(), ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(
            lines[0],
            "URL,Status,Title,Price,Platform,FMV,Suggested Offer,ROI,ROI%,Deal Quality,Risk Count,Opportunities"
        );
        assert_eq!(
            lines[1],
            "https://offerup.com/item/detail/1,success,\"Gaming PC, \"\"RTX 3070\"\"\",600.00,OfferUp,900.00,600.00,0.5000,50.0,excellent,1,Good condition; 32 GB of RAM"
        );
        assert_eq!(lines[2], "https://offerup.com/item/detail/2,failed,,,,,,,,,,");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_json_round_trip() {
        let job = job();
        let json = export_job(&job, ExportFormat::Json).unwrap();
        let parsed: Vec<ScanResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].url, job.results[0].url);
        assert_eq!(parsed[0].analysis, job.results[0].analysis);
        assert_eq!(parsed[1].error.as_deref(), Some("Timeout after 100 ms"));
    }
}
