//! Built-in marketplace strategies.

mod craigslist;
mod ebay;
mod facebook;
mod offerup;

pub use craigslist::CraigslistStrategy;
pub use ebay::EbayStrategy;
pub use facebook::FacebookStrategy;
pub use offerup::OfferUpStrategy;
