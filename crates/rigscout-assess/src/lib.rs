//! Rigscout Assess - judging a listing once its hardware is known.
//!
//! - [`ConditionAssessor`] scores physical condition from text and photos
//! - [`FraudScorer`] sums rule deltas into a 0-100 fraud score
//! - [`CategoryRiskScorer`] builds the independent 0-10 risk profile
//! - [`Valuation`] estimates fair market value; [`ReferenceValuation`] is the
//!   built-in component price table
//! - [`analyze_deal`] turns price and value into ROI, an offer and notes
//!
//! # Example
//!
//! ```rust
//! use rigscout_assess::{analyze_deal, CategoryRiskScorer};
//! use rigscout_core::{DealConfig, DealQuality, Listing, Platform};
//!
//! let listing = Listing::new(Platform::Craigslist, "https://sfbay.craigslist.org/1.html", "PC", 400.0);
//! let profile = CategoryRiskScorer::new().score(&listing, 700.0);
//! let analysis = analyze_deal(&listing, 700.0, profile, &DealConfig::default());
//!
//! assert_eq!(analysis.deal_quality, DealQuality::Excellent);
//! assert!((analysis.roi_percent - 75.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod condition;
pub mod deal;
mod era;
pub mod error;
pub mod fraud;
pub mod risk;
pub mod valuation;

pub use condition::ConditionAssessor;
pub use deal::analyze_deal;
pub use error::{Result, ValuationError};
pub use fraud::{FraudInput, FraudScorer};
pub use risk::{CategoryRiskScorer, RiskWeights};
pub use valuation::{PriceBand, ReferenceValuation, Valuation};
