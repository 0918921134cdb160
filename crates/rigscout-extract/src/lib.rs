//! Rigscout Extract - turning marketplace pages into listings.
//!
//! Page retrieval sits behind the [`DocumentSource`] trait so callers can
//! plug in plain HTTP ([`HttpDocumentSource`]), a rendering browser, or a
//! fixture source in tests. Each marketplace has an [`ExtractionStrategy`];
//! the [`StrategyRegistry`] picks the first strategy that claims a URL.
//!
//! # Example
//!
//! ```rust
//! use rigscout_extract::{ParsedDocument, StrategyRegistry};
//!
//! let registry = StrategyRegistry::with_defaults();
//! let url = "https://offerup.com/item/detail/42";
//! let doc = ParsedDocument::new(url, "<h1>Gaming PC</h1><p data-testid=\"item-price\">$500</p>");
//!
//! let strategy = registry.select(url).expect("offerup strategy");
//! let listing = strategy.extract_listing(&doc.parse(), url);
//! assert_eq!(listing.title, "Gaming PC");
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod document;
pub mod error;
pub mod html;
pub mod http;
pub mod platforms;
pub mod strategy;

pub use document::{DocumentSource, ParsedDocument};
pub use error::{FetchError, Result};
pub use http::HttpDocumentSource;
pub use platforms::{CraigslistStrategy, EbayStrategy, FacebookStrategy, OfferUpStrategy};
pub use strategy::{ExtractionStrategy, RawListing, StrategyRegistry};
