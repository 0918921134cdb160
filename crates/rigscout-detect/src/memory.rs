//! System memory detection.

use crate::matcher::num;
use once_cell::sync::Lazy;
use regex::Regex;
use rigscout_core::Ram;

static RAM_TYPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(ddr[2-5])\b|\bddr([2-5])[\s-]?\d{4}").expect("valid regex"));

static CAPACITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?P<gb>\d{1,3})\s*gb\s*(?:of\s+)?(?:(?:ddr[2-5])|ram\b|(?P<vague>memory)\b)")
        .expect("valid regex")
});

static CAPACITY_AFTER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:ram|(?P<vague>memory))\s*[:\-]?\s*(?P<gb>\d{1,3})\s*gb\b").expect("valid regex"));

// Graphics card wording that claims a nearby bare "memory" as VRAM.
static GPU_CONTEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:rtx|gtx|geforce|radeon|quadro|gpu|graphics|video|vram|rx\s*\d{3,4}\w*|arc\s*a\d{3}\w*)\b")
        .expect("valid regex")
});

/// Characters before a capacity match searched for graphics wording.
const GPU_WINDOW: usize = 24;

static KIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([1-8])\s*[x×]\s*(\d{1,3})\s*gb\b").expect("valid regex"));

static SPEED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bddr[2-5][\s-]?(\d{4})\b|\b(\d{4})\s*(?:mhz|mt/s)").expect("valid regex")
});

fn plausible_capacity(gb: u32) -> bool {
    (1..=1024).contains(&gb)
}

/// True when the clause just before byte offset `start` names a graphics card.
fn gpu_adjacent(text: &str, start: usize) -> bool {
    let before = &text[..start];
    let clause = before
        .rsplit([',', '.', ';', '|', '(', '\n'])
        .next()
        .unwrap_or(before);
    let skip = clause.chars().count().saturating_sub(GPU_WINDOW);
    let window: String = clause.chars().skip(skip).collect();
    GPU_CONTEXT.is_match(&window)
}

/// First plausible capacity from `pattern` that is not graphics memory.
///
/// "RAM" and "DDRx" always mean system memory; a bare "memory" next to a
/// graphics card name is taken as VRAM.
fn system_capacity(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures_iter(text)
        .filter(|caps| {
            caps.get(0).is_some_and(|m| {
                caps.name("vague").is_none() || !gpu_adjacent(text, m.start())
            })
        })
        .find_map(|caps| {
            caps.name("gb")
                .and_then(|m| m.as_str().parse().ok())
                .filter(|gb| plausible_capacity(*gb))
        })
}

/// Detect the memory kit described in `text` (already lowercased).
///
/// Capacity comes from an explicit "N GB RAM/DDRx" statement, else from an
/// "N x M GB" kit. "N GB memory" right after a graphics card name is VRAM
/// and is ignored. Modules default to 1 when no kit notation is present.
pub(crate) fn detect(text: &str) -> Vec<Ram> {
    let kit = KIT
        .captures(text)
        .and_then(|caps| Some((num(&caps, 1)?, num(&caps, 2)?)))
        .filter(|(_, size)| plausible_capacity(*size));

    let stated = system_capacity(&CAPACITY, text)
        .or_else(|| system_capacity(&CAPACITY_AFTER_LABEL, text));

    let (capacity_gb, modules) = match (stated, kit) {
        (Some(total), Some((count, _))) => (total, count),
        (Some(total), None) => (total, 1),
        (None, Some((count, size))) => (count * size, count),
        (None, None) => return Vec::new(),
    };

    let ram_type = RAM_TYPE
        .captures(text)
        .and_then(|caps| {
            caps.get(1)
                .map(|m| m.as_str().to_ascii_uppercase())
                .or_else(|| caps.get(2).map(|m| format!("DDR{}", m.as_str())))
        })
        .unwrap_or_else(|| "Unknown".to_string());

    let speed_mhz = SPEED
        .captures_iter(text)
        .filter_map(|caps| num(&caps, 1).or_else(|| num(&caps, 2)))
        .find(|mhz| (800..=9000).contains(mhz));

    vec![Ram {
        capacity_gb,
        ram_type,
        speed_mhz,
        modules,
        value: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ram(text: &str) -> Ram {
        detect(&text.to_lowercase()).into_iter().next().expect("ram detected")
    }

    #[test]
    fn test_capacity_type_speed() {
        let r = ram("32GB DDR4 3200MHz");
        assert_eq!(r.capacity_gb, 32);
        assert_eq!(r.ram_type, "DDR4");
        assert_eq!(r.speed_mhz, Some(3200));
        assert_eq!(r.modules, 1);
    }

    #[test]
    fn test_kit_notation() {
        let r = ram("RAM: 2x16GB Corsair Vengeance DDR5-6000");
        assert_eq!(r.capacity_gb, 32);
        assert_eq!(r.modules, 2);
        assert_eq!(r.ram_type, "DDR5");
        assert_eq!(r.speed_mhz, Some(6000));

        let r = ram("64gb ram (4 x 16gb)");
        assert_eq!(r.capacity_gb, 64);
        assert_eq!(r.modules, 4);
    }

    #[test]
    fn test_label_first() {
        let r = ram("Memory: 16 GB");
        assert_eq!(r.capacity_gb, 16);
        assert_eq!(r.ram_type, "Unknown");
        assert!(r.speed_mhz.is_none());
    }

    #[test]
    fn test_vram_is_not_system_memory() {
        assert!(detect("rtx 3060 12gb gddr6").is_empty());
        assert!(detect("rtx 3060 8gb memory").is_empty());
        assert!(detect("radeon rx 6600 xt with 8 gb memory").is_empty());
        assert!(detect("gpu memory: 8gb").is_empty());
    }

    #[test]
    fn test_ram_after_gpu_clause() {
        let r = ram("RTX 3060 8GB memory, 16GB DDR4 RAM");
        assert_eq!(r.capacity_gb, 16);
        assert_eq!(r.ram_type, "DDR4");

        let r = ram("Graphics: GTX 1660. Memory: 32 GB");
        assert_eq!(r.capacity_gb, 32);

        let r = ram("RTX 3070 32GB DDR4 RAM");
        assert_eq!(r.capacity_gb, 32);
    }
}
