//! Listing model shared across the rigscout pipeline.
//!
//! A [`Listing`] is created by an extraction strategy and then enriched in
//! place by the detector ([`Components`]), the condition assessor
//! ([`Condition`]) and the fraud scorer ([`RiskAssessment`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// craigslist.org
    Craigslist,
    /// facebook.com/marketplace
    FacebookMarketplace,
    /// offerup.com
    OfferUp,
    /// ebay.com
    Ebay,
}

impl Platform {
    /// Human-readable platform name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Craigslist => "Craigslist",
            Self::FacebookMarketplace => "Facebook Marketplace",
            Self::OfferUp => "OfferUp",
            Self::Ebay => "eBay",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Seller metadata as far as the source page exposes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerInfo {
    /// Display name, "Unknown" when the page hides it
    pub name: String,
    /// Link to the seller's profile page
    pub profile_url: Option<String>,
    /// Free-text "member since" value as printed on the page
    pub member_since: Option<String>,
    /// Account age derived from `member_since`
    pub account_age_days: Option<u32>,
    /// Average rating (0-5)
    pub rating: Option<f32>,
    /// Number of ratings or feedback entries
    pub review_count: u32,
    /// Other listings the seller currently has live
    pub active_listings: Option<u32>,
    /// Identity verified by the platform
    pub verified: bool,
}

impl Default for SellerInfo {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            profile_url: None,
            member_since: None,
            account_age_days: None,
            rating: None,
            review_count: 0,
            active_listings: None,
            verified: false,
        }
    }
}

/// A marketplace listing for a used computer system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Source marketplace
    pub platform: Platform,
    /// Normalized listing URL
    pub url: String,
    /// Listing title
    pub title: String,
    /// Listing body text
    pub description: String,
    /// Asking price, never negative
    pub price: f64,
    /// ISO currency code, "USD" when the page does not say
    pub currency: String,
    /// Location text, "Unknown" when absent
    pub location: String,
    /// Seller metadata
    pub seller: SellerInfo,
    /// Image URLs in page order
    pub images: Vec<String>,
    /// Hardware detected in title and description
    pub components: Components,
    /// Condition estimate
    pub condition: Condition,
    /// Fraud assessment
    pub risk: RiskAssessment,
    /// When the seller posted the listing, if shown
    pub posted_at: Option<DateTime<Utc>>,
    /// When the page was scraped
    pub scraped_at: DateTime<Utc>,
}

impl Listing {
    /// Create a listing with empty enrichment fields.
    ///
    /// Negative or non-finite prices are clamped to zero.
    #[must_use]
    pub fn new(platform: Platform, url: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            platform,
            url: url.into(),
            title: title.into(),
            description: String::new(),
            price: sanitize_price(price),
            currency: "USD".to_string(),
            location: "Unknown".to_string(),
            seller: SellerInfo::default(),
            images: Vec::new(),
            components: Components::default(),
            condition: Condition::default(),
            risk: RiskAssessment::default(),
            posted_at: None,
            scraped_at: Utc::now(),
        }
    }

    /// Title and description joined for text analysis.
    #[must_use]
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.title, self.description)
    }
}

/// Clamp a scraped price to a finite, non-negative value.
#[must_use]
pub fn sanitize_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

/// Hardware detected in a listing. Every category is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Processor
    pub cpu: Option<Cpu>,
    /// Graphics card
    pub gpu: Option<Gpu>,
    /// Memory kits
    pub ram: Vec<Ram>,
    /// Drives, in detection order
    pub storage: Vec<Storage>,
    /// Mainboard
    pub motherboard: Option<Motherboard>,
    /// Power supply
    pub psu: Option<Psu>,
    /// Chassis
    pub case: Option<Case>,
    /// CPU cooler
    pub cooling: Option<Cooling>,
}

impl Components {
    /// True when nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.gpu.is_none()
            && self.ram.is_empty()
            && self.storage.is_empty()
            && self.motherboard.is_none()
            && self.psu.is_none()
            && self.case.is_none()
            && self.cooling.is_none()
    }

    /// Sum of the provisional component values assigned by valuation.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        let singles = [
            self.cpu.as_ref().and_then(|c| c.value),
            self.gpu.as_ref().and_then(|g| g.value),
            self.motherboard.as_ref().and_then(|m| m.value),
            self.psu.as_ref().and_then(|p| p.value),
            self.case.as_ref().and_then(|c| c.value),
            self.cooling.as_ref().and_then(|c| c.value),
        ];
        singles.iter().flatten().sum::<f64>()
            + self.ram.iter().filter_map(|r| r.value).sum::<f64>()
            + self.storage.iter().filter_map(|s| s.value).sum::<f64>()
    }

    /// Total installed memory in GB.
    #[must_use]
    pub fn total_ram_gb(&self) -> u32 {
        self.ram.iter().map(|r| r.capacity_gb).sum()
    }
}

/// Processor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cpu {
    /// "Intel" or "AMD"
    pub brand: String,
    /// Normalized model string, e.g. "Core i7-12700K"
    pub model: String,
    /// Product family, e.g. "Core i7", "Ryzen 7"
    pub family: String,
    /// Generation number within the family
    pub generation: Option<u32>,
    /// Physical cores
    pub cores: Option<u32>,
    /// Hardware threads
    pub threads: Option<u32>,
    /// Thermal design power in watts
    pub tdp_watts: Option<u32>,
    /// CPU socket
    pub socket: Option<String>,
    /// Microarchitecture name
    pub architecture: Option<String>,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Graphics card record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gpu {
    /// "NVIDIA", "AMD" or "Intel"
    pub brand: String,
    /// Normalized model string, e.g. "RTX 3070 Ti"
    pub model: String,
    /// Series label, e.g. "RTX 30"
    pub series: Option<String>,
    /// Video memory in GB (stated or inferred)
    pub vram_gb: Option<u32>,
    /// Board power in watts
    pub tdp_watts: Option<u32>,
    /// Microarchitecture name
    pub architecture: Option<String>,
    /// Launch year
    pub release_year: Option<u32>,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ram {
    /// Total capacity of the kit in GB
    pub capacity_gb: u32,
    /// "DDR3", "DDR4", "DDR5" or "Unknown"
    pub ram_type: String,
    /// Rated speed in MHz (MT/s)
    pub speed_mhz: Option<u32>,
    /// Number of sticks; 1 unless an "N x M GB" pattern was found
    pub modules: u32,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Kind of storage device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// PCIe NVMe SSD
    Nvme,
    /// SATA SSD
    Ssd,
    /// Spinning disk
    Hdd,
}

/// Storage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    /// Device kind
    pub kind: StorageKind,
    /// Capacity in GB (1 TB = 1000 GB)
    pub capacity_gb: u32,
    /// Brand when named next to the drive
    pub brand: Option<String>,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Motherboard record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motherboard {
    /// Vendor, "Unknown" if not named
    pub brand: String,
    /// Chipset, e.g. "B550"
    pub chipset: Option<String>,
    /// Socket implied by the chipset
    pub socket: Option<String>,
    /// Form factor, "ATX" unless stated
    pub form_factor: String,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Cabling style of a power supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsuModularity {
    /// All cables detachable
    Full,
    /// Main cables fixed, peripherals detachable
    Semi,
    /// Fixed cables (assumed when not stated)
    NonModular,
}

/// Power supply record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psu {
    /// Vendor, "Unknown" if not named
    pub brand: String,
    /// Rated output in watts
    pub wattage: Option<u32>,
    /// 80 Plus rating, e.g. "Gold"
    pub efficiency: Option<String>,
    /// Cable modularity
    pub modularity: PsuModularity,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Chassis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Vendor, "Unknown" if not named
    pub brand: String,
    /// Model line when recognised
    pub model: Option<String>,
    /// Form factor, "Mid Tower" unless stated
    pub form_factor: String,
    /// Tempered glass side panel mentioned
    pub tempered_glass: bool,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Cooler type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoolingKind {
    /// All-in-one liquid cooler
    Liquid,
    /// Aftermarket tower or top-down air cooler
    Air,
    /// Boxed cooler shipped with the CPU
    Stock,
}

/// CPU cooler record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooling {
    /// Cooler type
    pub kind: CoolingKind,
    /// Vendor, "Unknown" if not named
    pub brand: String,
    /// Radiator length for liquid coolers
    pub radiator_mm: Option<u32>,
    /// Provisional value assigned by valuation
    pub value: Option<f64>,
}

/// Severity scale shared by condition issues and fraud signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational
    Low,
    /// Worth asking about
    Medium,
    /// Material to price or safety
    High,
    /// Deal breaker
    Critical,
}

/// How hard the machine has been used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageIntensity {
    /// Office, browsing, "barely used"
    Light,
    /// Regular gaming (default)
    Moderate,
    /// Mining, rendering, 24/7 operation
    Heavy,
}

/// A defect or failure called out in the listing text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Affected component, e.g. "GPU" or "Case"
    pub component: String,
    /// What the listing says
    pub description: String,
    /// Impact on value
    pub severity: Severity,
}

/// Condition estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Overall score, 1 (for parts) to 5 (like new)
    pub overall: u8,
    /// Human-readable notes explaining the score
    pub notes: Vec<String>,
    /// Discrete defects
    pub issues: Vec<Issue>,
    /// Age estimate in months
    pub age_months: Option<u32>,
    /// Usage class
    pub usage: UsageIntensity,
}

impl Default for Condition {
    fn default() -> Self {
        Self {
            overall: 3,
            notes: Vec::new(),
            issues: Vec::new(),
            age_months: None,
            usage: UsageIntensity::Moderate,
        }
    }
}

/// Rule that produced a fraud signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudSignalKind {
    /// Asking price far below comparable listings
    PriceAnomaly,
    /// No photos or too few photos
    InsufficientPhotos,
    /// Stock or watermarked imagery
    StockPhotos,
    /// Shipping only, no local pickup
    ShippingOnly,
    /// Wire, crypto, gift cards or P2P-only payment
    NonReversiblePayment,
    /// Pressure to decide quickly
    UrgencyLanguage,
    /// Serial number removed or withheld
    SerialRemoved,
    /// Brand-new account asking a high price
    NewAccountHighPrice,
    /// Copy-pasted or spam phrasing
    TemplateText,
    /// Components from very different eras
    GenerationMismatch,
    /// Seller runs an unusual number of listings
    ManyActiveListings,
    /// Long-standing, well-rated seller (negative delta)
    EstablishedSeller,
    /// Seller is on the blacklist
    BlacklistedSeller,
}

/// One triggered fraud rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudSignal {
    /// Rule identifier
    pub kind: FraudSignalKind,
    /// Severity bucket
    pub severity: Severity,
    /// Signed contribution to the 0-100 score
    pub delta: i32,
    /// Why the rule fired
    pub description: String,
    /// What the buyer can do about it
    pub mitigation: Option<String>,
    /// Forces an "avoid" recommendation regardless of score
    pub auto_block: bool,
}

/// Recommendation derived from the fraud score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Safe to contact the seller
    Proceed,
    /// Verify before committing
    Caution,
    /// Walk away
    Avoid,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => write!(f, "proceed"),
            Self::Caution => write!(f, "caution"),
            Self::Avoid => write!(f, "avoid"),
        }
    }
}

/// Fraud assessment on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of triggered deltas, clamped to 0..=100
    pub score: u8,
    /// Triggered rules, largest contribution first
    pub signals: Vec<FraudSignal>,
    /// Action derived from score and overrides
    pub recommendation: Recommendation,
    /// Questions to send the seller before meeting
    pub questions: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            score: 0,
            signals: Vec::new(),
            recommendation: Recommendation::Proceed,
            questions: Vec::new(),
        }
    }
}
