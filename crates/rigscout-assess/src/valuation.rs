//! Valuation contract and the built-in reference price table.

use crate::era::cpu_release_year;
use crate::error::{Result, ValuationError};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rigscout_core::{
    Case, Components, Cooling, CoolingKind, Cpu, Gpu, Listing, Motherboard, Psu, PsuModularity,
    Ram, Storage, StorageKind,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Comparable asking prices for similar systems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    /// 25th percentile of comparable asking prices
    pub p25: f64,
    /// Median comparable asking price
    pub median: f64,
}

/// Fair-market-value estimator consumed by the scanner.
///
/// Implementations should be thread-safe (Send + Sync); the scanner shares a
/// single instance across concurrent scan units.
#[async_trait]
pub trait Valuation: Send + Sync {
    /// Estimate the resale value of the listed system.
    ///
    /// # Errors
    /// `ValuationError::NoData` when nothing in the listing can be priced,
    /// `ValuationError::Provider` when the backend fails.
    async fn estimate_fmv(&self, listing: &Listing) -> Result<f64>;

    /// Comparable asking prices, when the implementation has market data.
    async fn comparable_prices(&self, _listing: &Listing) -> Result<Option<PriceBand>> {
        Ok(None)
    }

    /// Fill the provisional `value` of each detected component.
    fn value_components(&self, _components: &mut Components) {}
}

/// Used-market prices for common graphics cards, keyed by lowercase model.
const GPU_PRICES: &[(&str, f64)] = &[
    ("rtx 5090", 2000.0),
    ("rtx 5080", 1000.0),
    ("rtx 5070 ti", 720.0),
    ("rtx 5070", 520.0),
    ("rtx 5060 ti", 380.0),
    ("rtx 4090", 1400.0),
    ("rtx 4080 super", 880.0),
    ("rtx 4080", 820.0),
    ("rtx 4070 ti super", 650.0),
    ("rtx 4070 ti", 560.0),
    ("rtx 4070 super", 500.0),
    ("rtx 4070", 430.0),
    ("rtx 4060 ti", 300.0),
    ("rtx 4060", 240.0),
    ("rtx 3090 ti", 750.0),
    ("rtx 3090", 650.0),
    ("rtx 3080 ti", 480.0),
    ("rtx 3080", 400.0),
    ("rtx 3070 ti", 300.0),
    ("rtx 3070", 260.0),
    ("rtx 3060 ti", 220.0),
    ("rtx 3060", 190.0),
    ("rtx 3050", 140.0),
    ("rtx 2080 ti", 300.0),
    ("rtx 2080 super", 220.0),
    ("rtx 2080", 200.0),
    ("rtx 2070 super", 180.0),
    ("rtx 2070", 160.0),
    ("rtx 2060 super", 150.0),
    ("rtx 2060", 120.0),
    ("gtx 1660 super", 110.0),
    ("gtx 1660 ti", 110.0),
    ("gtx 1660", 95.0),
    ("gtx 1650", 80.0),
    ("gtx 1080 ti", 180.0),
    ("gtx 1080", 130.0),
    ("gtx 1070 ti", 110.0),
    ("gtx 1070", 95.0),
    ("gtx 1060", 65.0),
    ("gtx 1050 ti", 55.0),
    ("rx 9070 xt", 650.0),
    ("rx 9070", 560.0),
    ("rx 7900 xtx", 800.0),
    ("rx 7900 xt", 620.0),
    ("rx 7900 gre", 480.0),
    ("rx 7800 xt", 430.0),
    ("rx 7700 xt", 350.0),
    ("rx 7600", 230.0),
    ("rx 6950 xt", 480.0),
    ("rx 6900 xt", 420.0),
    ("rx 6800 xt", 380.0),
    ("rx 6800", 330.0),
    ("rx 6750 xt", 280.0),
    ("rx 6700 xt", 260.0),
    ("rx 6650 xt", 200.0),
    ("rx 6600 xt", 180.0),
    ("rx 6600", 160.0),
    ("rx 5700 xt", 150.0),
    ("rx 580", 60.0),
    ("rx 570", 50.0),
    ("arc b580", 240.0),
    ("arc a770", 220.0),
    ("arc a750", 170.0),
];

/// Table-driven valuation for well-known consumer hardware.
///
/// Component prices are approximations of used-market values, not quotes.
/// The system FMV is the sum of component values scaled by condition.
#[derive(Debug, Clone)]
pub struct ReferenceValuation {
    reference_year: i32,
}

impl Default for ReferenceValuation {
    fn default() -> Self {
        Self {
            reference_year: Utc::now().year(),
        }
    }
}

impl ReferenceValuation {
    /// Valuation that depreciates against the current year.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Valuation that depreciates against a fixed year.
    #[must_use]
    pub fn with_reference_year(reference_year: i32) -> Self {
        Self { reference_year }
    }

    fn depreciate(&self, base: f64, release_year: Option<i32>, floor: f64) -> f64 {
        let age = release_year.map_or(3, |year| (self.reference_year - year).max(0));
        (base * 0.85_f64.powi(age)).max(floor)
    }

    fn cpu_value(&self, cpu: &Cpu) -> f64 {
        let tier_base = match cpu.family.as_str() {
            f if f.ends_with('3') => 70.0,
            f if f.ends_with('5') => 120.0,
            f if f.ends_with('7') => 180.0,
            f if f.ends_with('9') => 260.0,
            f if f.contains("Threadripper") => 450.0,
            "Xeon" => 60.0,
            _ => 40.0,
        };
        self.depreciate(tier_base, cpu_release_year(cpu), 15.0)
    }

    fn gpu_value(&self, gpu: &Gpu) -> f64 {
        let key = gpu.model.to_lowercase();
        if let Some((_, price)) = GPU_PRICES.iter().find(|(model, _)| *model == key) {
            return *price;
        }
        let base = f64::from(gpu.vram_gb.unwrap_or(4)) * 30.0;
        let year = gpu.release_year.and_then(|y| i32::try_from(y).ok());
        self.depreciate(base, year, 25.0)
    }
}

fn ram_value(ram: &Ram) -> f64 {
    let per_gb = match ram.ram_type.as_str() {
        "DDR5" => 3.0,
        "DDR4" => 1.8,
        "DDR3" => 0.8,
        "DDR2" => 0.3,
        _ => 1.5,
    };
    f64::from(ram.capacity_gb) * per_gb
}

fn storage_value(storage: &Storage) -> f64 {
    let per_tb = match storage.kind {
        StorageKind::Nvme => 50.0,
        StorageKind::Ssd => 40.0,
        StorageKind::Hdd => 15.0,
    };
    (f64::from(storage.capacity_gb) / 1000.0 * per_tb).max(10.0)
}

fn motherboard_value(board: &Motherboard) -> f64 {
    match board.socket.as_deref() {
        Some("LGA1851") => 150.0,
        Some("AM5") => 130.0,
        Some("LGA1700") => 100.0,
        Some("AM4") => 60.0,
        Some("LGA1200") => 50.0,
        _ => 35.0,
    }
}

fn psu_value(psu: &Psu) -> f64 {
    let watts = f64::from(psu.wattage.unwrap_or(500));
    let efficiency = match psu.efficiency.as_deref() {
        Some("80+ Titanium") => 35.0,
        Some("80+ Platinum") => 25.0,
        Some("80+ Gold") => 15.0,
        Some("80+ Silver" | "80+ Bronze") => 5.0,
        _ => 0.0,
    };
    let modular = match psu.modularity {
        PsuModularity::Full => 10.0,
        PsuModularity::Semi => 5.0,
        PsuModularity::NonModular => 0.0,
    };
    watts * 0.06 + efficiency + modular
}

fn case_value(case: &Case) -> f64 {
    let mut value = 35.0;
    if case.tempered_glass {
        value += 15.0;
    }
    if case.brand != "Unknown" {
        value += 10.0;
    }
    value
}

fn cooling_value(cooling: &Cooling) -> f64 {
    match cooling.kind {
        CoolingKind::Liquid => 30.0 + f64::from(cooling.radiator_mm.unwrap_or(240)) / 12.0,
        CoolingKind::Air if cooling.brand == "Noctua" => 50.0,
        CoolingKind::Air => 25.0,
        CoolingKind::Stock => 0.0,
    }
}

/// Value multiplier for a 1..=5 condition score.
fn condition_multiplier(overall: u8) -> f64 {
    match overall {
        5 => 1.0,
        4 => 0.92,
        3 => 0.85,
        2 => 0.65,
        _ => 0.35,
    }
}

fn round_dollars(value: f64) -> f64 {
    value.round()
}

#[async_trait]
impl Valuation for ReferenceValuation {
    async fn estimate_fmv(&self, listing: &Listing) -> Result<f64> {
        let mut components = listing.components.clone();
        if components.is_empty() {
            return Err(ValuationError::NoData(
                "no components detected".to_string(),
            ));
        }
        if components.total_value() <= 0.0 {
            self.value_components(&mut components);
        }
        let fmv = components.total_value() * condition_multiplier(listing.condition.overall);
        debug!(url = %listing.url, fmv, "reference valuation");
        Ok(round_dollars(fmv))
    }

    fn value_components(&self, components: &mut Components) {
        if let Some(cpu) = components.cpu.as_mut() {
            cpu.value = Some(round_dollars(self.cpu_value(cpu)));
        }
        if let Some(gpu) = components.gpu.as_mut() {
            gpu.value = Some(round_dollars(self.gpu_value(gpu)));
        }
        for ram in &mut components.ram {
            ram.value = Some(round_dollars(ram_value(ram)));
        }
        for storage in &mut components.storage {
            storage.value = Some(round_dollars(storage_value(storage)));
        }
        if let Some(board) = components.motherboard.as_mut() {
            board.value = Some(motherboard_value(board));
        }
        if let Some(psu) = components.psu.as_mut() {
            psu.value = Some(round_dollars(psu_value(psu)));
        }
        if let Some(case) = components.case.as_mut() {
            case.value = Some(case_value(case));
        }
        if let Some(cooling) = components.cooling.as_mut() {
            cooling.value = Some(round_dollars(cooling_value(cooling)));
        }
    }
}
