//! Hardware reference data.
//!
//! Detection derives cores, threads, TDP, socket, VRAM and architecture
//! from a [`SpecTable`]. [`ReferenceSpecs`] ships a static table covering common
//! desktop parts; callers with a fresher dataset can supply their own.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup key for a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuQuery {
    /// "Intel" or "AMD"
    pub brand: &'static str,
    /// Family as reported on [`rigscout_core::Cpu::family`], e.g. "Core i7", "Ryzen 5"
    pub family: String,
    /// Tier digit for Core iN / Ryzen N, 0 when not applicable
    pub tier: u8,
    /// Lowercase model number with suffix, e.g. "12700k", "5800x3d"
    pub number: String,
    /// Lowercase model suffix alone, e.g. "k", "x3d", "" when absent
    pub suffix: String,
    /// Generation derived from the model number
    pub generation: Option<u32>,
}

/// Reference data for a processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSpec {
    /// Physical cores
    pub cores: u32,
    /// Hardware threads
    pub threads: u32,
    /// Microarchitecture name
    pub architecture: Option<String>,
    /// Rated TDP in watts
    pub tdp_watts: Option<u32>,
    /// Desktop socket; mobile parts have none
    pub socket: Option<String>,
}

/// Reference data for a graphics card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuSpec {
    /// Memory in GB
    pub vram_gb: u32,
    /// Board power in watts
    pub tdp_watts: u32,
    /// Architecture name
    pub architecture: String,
    /// Launch year
    pub release_year: u32,
}

/// Source of hardware reference data.
pub trait SpecTable: Send + Sync {
    /// Reference data for a processor, if known.
    fn cpu_spec(&self, query: &CpuQuery) -> Option<CpuSpec>;

    /// Reference data for a graphics card keyed by lowercase model,
    /// e.g. "rtx 3070 ti", "rx 7900 xtx", "arc a770".
    fn gpu_spec(&self, model_key: &str) -> Option<GpuSpec>;
}

/// Built-in reference table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceSpecs;

type GpuRow = (&'static str, u32, u32, &'static str, u32);

#[rustfmt::skip]
const GPU_ROWS: &[GpuRow] = &[
    // NVIDIA
    ("gtx 950", 2, 90, "Maxwell", 2015), ("gtx 960", 2, 120, "Maxwell", 2015),
    ("gtx 970", 4, 145, "Maxwell", 2014), ("gtx 980", 4, 165, "Maxwell", 2014),
    ("gtx 980 ti", 6, 250, "Maxwell", 2015),
    ("gtx 1050", 2, 75, "Pascal", 2016), ("gtx 1050 ti", 4, 75, "Pascal", 2016),
    ("gtx 1060", 6, 120, "Pascal", 2016), ("gtx 1070", 8, 150, "Pascal", 2016),
    ("gtx 1070 ti", 8, 180, "Pascal", 2017), ("gtx 1080", 8, 180, "Pascal", 2016),
    ("gtx 1080 ti", 11, 250, "Pascal", 2017),
    ("gtx 1650", 4, 75, "Turing", 2019), ("gtx 1650 super", 4, 100, "Turing", 2019),
    ("gtx 1660", 6, 120, "Turing", 2019), ("gtx 1660 super", 6, 125, "Turing", 2019),
    ("gtx 1660 ti", 6, 120, "Turing", 2019),
    ("rtx 2060", 6, 160, "Turing", 2019), ("rtx 2060 super", 8, 175, "Turing", 2019),
    ("rtx 2070", 8, 175, "Turing", 2018), ("rtx 2070 super", 8, 215, "Turing", 2019),
    ("rtx 2080", 8, 215, "Turing", 2018), ("rtx 2080 super", 8, 250, "Turing", 2019),
    ("rtx 2080 ti", 11, 250, "Turing", 2018),
    ("rtx 3050", 8, 130, "Ampere", 2022), ("rtx 3060", 12, 170, "Ampere", 2021),
    ("rtx 3060 ti", 8, 200, "Ampere", 2020), ("rtx 3070", 8, 220, "Ampere", 2020),
    ("rtx 3070 ti", 8, 290, "Ampere", 2021), ("rtx 3080", 10, 320, "Ampere", 2020),
    ("rtx 3080 ti", 12, 350, "Ampere", 2021), ("rtx 3090", 24, 350, "Ampere", 2020),
    ("rtx 3090 ti", 24, 450, "Ampere", 2022),
    ("rtx 4060", 8, 115, "Ada Lovelace", 2023), ("rtx 4060 ti", 8, 160, "Ada Lovelace", 2023),
    ("rtx 4070", 12, 200, "Ada Lovelace", 2023), ("rtx 4070 super", 12, 220, "Ada Lovelace", 2024),
    ("rtx 4070 ti", 12, 285, "Ada Lovelace", 2023), ("rtx 4070 ti super", 16, 285, "Ada Lovelace", 2024),
    ("rtx 4080", 16, 320, "Ada Lovelace", 2022), ("rtx 4080 super", 16, 320, "Ada Lovelace", 2024),
    ("rtx 4090", 24, 450, "Ada Lovelace", 2022),
    ("rtx 5070", 12, 250, "Blackwell", 2025), ("rtx 5070 ti", 16, 300, "Blackwell", 2025),
    ("rtx 5080", 16, 360, "Blackwell", 2025), ("rtx 5090", 32, 575, "Blackwell", 2025),
    // AMD
    ("rx 470", 4, 120, "Polaris", 2016), ("rx 480", 8, 150, "Polaris", 2016),
    ("rx 570", 4, 150, "Polaris", 2017), ("rx 580", 8, 185, "Polaris", 2017),
    ("rx 590", 8, 225, "Polaris", 2018),
    ("rx 5500 xt", 4, 130, "RDNA", 2019), ("rx 5600 xt", 6, 150, "RDNA", 2020),
    ("rx 5700", 8, 180, "RDNA", 2019), ("rx 5700 xt", 8, 225, "RDNA", 2019),
    ("rx 6500 xt", 4, 107, "RDNA 2", 2022), ("rx 6600", 8, 132, "RDNA 2", 2021),
    ("rx 6600 xt", 8, 160, "RDNA 2", 2021), ("rx 6650 xt", 8, 176, "RDNA 2", 2022),
    ("rx 6700 xt", 12, 230, "RDNA 2", 2021), ("rx 6750 xt", 12, 250, "RDNA 2", 2022),
    ("rx 6800", 16, 250, "RDNA 2", 2020), ("rx 6800 xt", 16, 300, "RDNA 2", 2020),
    ("rx 6900 xt", 16, 300, "RDNA 2", 2020), ("rx 6950 xt", 16, 335, "RDNA 2", 2022),
    ("rx 7600", 8, 165, "RDNA 3", 2023), ("rx 7600 xt", 16, 190, "RDNA 3", 2024),
    ("rx 7700 xt", 12, 245, "RDNA 3", 2023), ("rx 7800 xt", 16, 263, "RDNA 3", 2023),
    ("rx 7900 gre", 16, 260, "RDNA 3", 2023), ("rx 7900 xt", 20, 315, "RDNA 3", 2022),
    ("rx 7900 xtx", 24, 355, "RDNA 3", 2022),
    ("rx 9070", 16, 220, "RDNA 4", 2025), ("rx 9070 xt", 16, 304, "RDNA 4", 2025),
    // Intel
    ("arc a380", 6, 75, "Alchemist", 2022), ("arc a580", 8, 185, "Alchemist", 2023),
    ("arc a750", 8, 225, "Alchemist", 2022), ("arc a770", 16, 225, "Alchemist", 2022),
    ("arc b570", 10, 150, "Battlemage", 2025), ("arc b580", 12, 190, "Battlemage", 2024),
];

#[rustfmt::skip]
const CPU_ROWS: &[(&str, u32, u32)] = &[
    // Intel, keyed "i{tier}-{number}"
    ("i3-12100", 4, 8), ("i3-13100", 4, 8),
    ("i5-8400", 6, 6), ("i5-8600k", 6, 6), ("i5-9400", 6, 6), ("i5-9600k", 6, 6),
    ("i5-12400", 6, 12), ("i5-12600k", 10, 16), ("i5-13400", 10, 16),
    ("i5-13600k", 14, 20), ("i5-14400", 10, 16), ("i5-14600k", 14, 20),
    ("i7-8700", 6, 12), ("i7-8700k", 6, 12), ("i7-9700k", 8, 8), ("i7-9700", 8, 8),
    ("i7-12700", 12, 20), ("i7-12700k", 12, 20), ("i7-13700k", 16, 24), ("i7-14700k", 20, 28),
    ("i9-9900k", 8, 16), ("i9-10900k", 10, 20), ("i9-11900k", 8, 16),
    ("i9-12900k", 16, 24), ("i9-13900k", 24, 32), ("i9-14900k", 24, 32),
    // Intel Core Ultra, keyed by model number
    ("155h", 16, 22), ("185h", 16, 22), ("245k", 14, 14), ("265k", 20, 20), ("285k", 24, 24),
    // AMD, keyed by model number
    ("1600", 6, 12), ("1700", 8, 16), ("2600", 6, 12), ("2700x", 8, 16),
    ("3600", 6, 12), ("3700x", 8, 16), ("3900x", 12, 24), ("3950x", 16, 32),
    ("5600", 6, 12), ("5600x", 6, 12), ("5700x", 8, 16), ("5800x", 8, 16),
    ("5800x3d", 8, 16), ("5900x", 12, 24), ("5950x", 16, 32),
    ("7600", 6, 12), ("7600x", 6, 12), ("7700x", 8, 16), ("7800x3d", 8, 16),
    ("7900x", 12, 24), ("7950x", 16, 32), ("7950x3d", 16, 32),
    ("9600x", 6, 12), ("9700x", 8, 16), ("9800x3d", 8, 16), ("9900x", 12, 24), ("9950x", 16, 32),
    ("threadripper 1950x", 16, 32), ("threadripper 2950x", 16, 32),
    ("threadripper 2990wx", 32, 64), ("threadripper 3960x", 24, 48),
    ("threadripper 3970x", 32, 64), ("threadripper 3990x", 64, 128),
    ("threadripper 7970x", 32, 64), ("threadripper 7980x", 64, 128),
];

static GPU_TABLE: Lazy<HashMap<&'static str, GpuSpec>> = Lazy::new(|| {
    GPU_ROWS
        .iter()
        .map(|&(key, vram_gb, tdp_watts, architecture, release_year)| {
            (
                key,
                GpuSpec {
                    vram_gb,
                    tdp_watts,
                    architecture: architecture.to_string(),
                    release_year,
                },
            )
        })
        .collect()
});

static CPU_TABLE: Lazy<HashMap<&'static str, (u32, u32)>> =
    Lazy::new(|| CPU_ROWS.iter().map(|&(key, c, t)| (key, (c, t))).collect());

/// Microarchitecture of an Intel Core generation.
#[must_use]
pub fn intel_architecture(generation: u32) -> Option<&'static str> {
    Some(match generation {
        2 => "Sandy Bridge",
        3 => "Ivy Bridge",
        4 => "Haswell",
        5 => "Broadwell",
        6 => "Skylake",
        7 => "Kaby Lake",
        8 => "Coffee Lake",
        9 => "Coffee Lake Refresh",
        10 => "Comet Lake",
        11 => "Rocket Lake",
        12 => "Alder Lake",
        13 => "Raptor Lake",
        14 => "Raptor Lake Refresh",
        _ => return None,
    })
}

/// Zen revision of a Ryzen desktop series.
#[must_use]
pub fn ryzen_architecture(series: u32) -> Option<&'static str> {
    Some(match series {
        1 => "Zen",
        2 => "Zen+",
        3 | 4 => "Zen 2",
        5 => "Zen 3",
        7 | 8 => "Zen 4",
        9 => "Zen 5",
        _ => return None,
    })
}

/// Mobile parts are soldered and have no desktop socket.
fn is_mobile(suffix: &str) -> bool {
    matches!(suffix.chars().next(), Some('h' | 'u' | 'p' | 'y' | 'm'))
}

/// Intel desktop socket by Core generation.
fn intel_socket(generation: u32) -> Option<&'static str> {
    Some(match generation {
        2 | 3 => "LGA1155",
        4 | 5 => "LGA1150",
        6..=9 => "LGA1151",
        10 | 11 => "LGA1200",
        12..=14 => "LGA1700",
        _ => return None,
    })
}

/// Intel TDP by model suffix.
fn intel_tdp(suffix: &str, generation: u32) -> u32 {
    match suffix.chars().next() {
        Some('k') if generation >= 10 => 125,
        Some('k') => 95,
        Some('t') => 35,
        Some('h') => 45,
        Some('u') => 15,
        _ => 65,
    }
}

/// Rated TDP and desktop socket of a processor family.
fn cpu_platform(query: &CpuQuery, family: &str) -> (Option<u32>, Option<&'static str>) {
    let suffix = query.suffix.as_str();
    let generation = query.generation.unwrap_or(0);
    let desktop = !is_mobile(suffix);

    if query.brand == "Intel" && family.starts_with("core ultra") {
        let tdp = match suffix.chars().next() {
            Some('k') => 125,
            Some('h') => 45,
            Some('u') => 15,
            Some('v') => 17,
            _ => 65,
        };
        (Some(tdp), (generation >= 2 && desktop).then_some("LGA1851"))
    } else if query.brand == "Intel" && family.starts_with("core i") {
        let socket = if desktop { intel_socket(generation) } else { None };
        (Some(intel_tdp(suffix, generation)), socket)
    } else if family.contains("threadripper") {
        let socket = match generation {
            1 | 2 => Some("TR4"),
            3 => Some("sTRX4"),
            7 => Some("sTR5"),
            _ => None,
        };
        (Some(if generation >= 3 { 280 } else { 180 }), socket)
    } else if family.starts_with("ryzen") {
        let socket = match generation {
            1..=5 if desktop => Some("AM4"),
            7..=9 if desktop => Some("AM5"),
            _ => None,
        };
        (Some(if suffix.starts_with('x') { 105 } else { 65 }), socket)
    } else if family.starts_with("fx") {
        (Some(if query.number.starts_with('9') { 220 } else { 125 }), Some("AM3+"))
    } else {
        (None, None)
    }
}

/// Core/thread counts by tier when a part is not in the table.
fn tier_counts(brand: &str, tier: u8, generation: Option<u32>) -> Option<(u32, u32)> {
    let generation = generation.unwrap_or(0);
    match (brand, tier) {
        ("Intel", 3) if generation >= 10 => Some((4, 8)),
        ("Intel", 3) if generation >= 8 => Some((4, 4)),
        ("Intel", 3) => Some((2, 4)),
        ("Intel", 5) if generation >= 13 => Some((10, 16)),
        ("Intel", 5) if generation >= 10 => Some((6, 12)),
        ("Intel", 5) if generation >= 8 => Some((6, 6)),
        ("Intel", 5) => Some((4, 4)),
        ("Intel", 7) if generation >= 13 => Some((16, 24)),
        ("Intel", 7) if generation == 12 => Some((12, 20)),
        ("Intel", 7) if generation >= 10 => Some((8, 16)),
        ("Intel", 7) if generation >= 8 => Some((6, 12)),
        ("Intel", 7) => Some((4, 8)),
        ("Intel", 9) if generation >= 13 => Some((24, 32)),
        ("Intel", 9) if generation == 12 => Some((16, 24)),
        ("Intel", 9) if generation >= 10 => Some((10, 20)),
        ("Intel", 9) => Some((8, 16)),
        ("AMD", 3) => Some((4, 8)),
        ("AMD", 5) => Some((6, 12)),
        ("AMD", 7) => Some((8, 16)),
        ("AMD", 9) => Some((12, 24)),
        _ => None,
    }
}

impl SpecTable for ReferenceSpecs {
    fn cpu_spec(&self, query: &CpuQuery) -> Option<CpuSpec> {
        let family = query.family.to_ascii_lowercase();
        let number = query.number.to_ascii_lowercase();

        let key = if query.brand == "Intel" && family.starts_with("core i") {
            format!("i{}-{}", query.tier, number)
        } else if family.contains("threadripper") {
            format!("threadripper {number}")
        } else {
            number.clone()
        };
        // KF/F parts share counts with their iGPU siblings.
        let unlocked = key.strip_suffix('f').map(ToString::to_string);

        let counts = CPU_TABLE
            .get(key.as_str())
            .or_else(|| unlocked.as_deref().and_then(|k| CPU_TABLE.get(k)))
            .copied()
            .or_else(|| {
                if family.starts_with("fx") {
                    number.chars().next().and_then(|c| c.to_digit(10)).map(|c| (c, c))
                } else if family.starts_with("core ultra") {
                    None
                } else {
                    tier_counts(query.brand, query.tier, query.generation)
                }
            });

        let architecture = match (query.brand, query.generation) {
            ("Intel", Some(g)) if family.starts_with("core i") => intel_architecture(g),
            ("Intel", Some(1)) if family.starts_with("core ultra") => Some("Meteor Lake"),
            ("Intel", Some(2)) if family.starts_with("core ultra") => Some("Arrow Lake"),
            ("AMD", _) if family.starts_with("fx") => Some("Piledriver"),
            ("AMD", Some(s)) => ryzen_architecture(s),
            _ => None,
        };

        let (tdp_watts, socket) = cpu_platform(query, &family);

        if counts.is_none() && architecture.is_none() && tdp_watts.is_none() {
            return None;
        }
        let (cores, threads) = counts.unwrap_or((0, 0));
        Some(CpuSpec {
            cores,
            threads,
            architecture: architecture.map(ToString::to_string),
            tdp_watts,
            socket: socket.map(ToString::to_string),
        })
    }

    fn gpu_spec(&self, model_key: &str) -> Option<GpuSpec> {
        GPU_TABLE.get(model_key.to_ascii_lowercase().as_str()).cloned()
    }
}
