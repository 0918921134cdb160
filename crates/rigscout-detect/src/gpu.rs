//! Graphics card matchers.

use crate::matcher::{first_match, num, Matcher};
use crate::specs::SpecTable;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rigscout_core::Gpu;

static GPU_MATCHERS: Lazy<Vec<Matcher<Gpu>>> = Lazy::new(|| {
    vec![
        Matcher::new(
            r"\b(?:nvidia\s+)?(?:geforce\s+)?(rtx|gtx)\s*(\d{3,4})\s*(ti\s*super|ti|super)?(?:\s*(\d{1,2})\s*gb\b(\s*(?:ddr|ram))?)?",
            nvidia,
        ),
        Matcher::new(
            r"\b(?:amd\s+)?(?:radeon\s+)?rx\s*(\d{3,4})\s*(xtx|xt|gre)?(?:\s*(\d{1,2})\s*gb\b(\s*(?:ddr|ram))?)?",
            radeon,
        ),
        Matcher::new(
            r"\b(?:intel\s+)?arc\s+([ab]\d{3})(?:\s*(\d{1,2})\s*gb\b(\s*(?:ddr|ram))?)?",
            arc,
        ),
    ]
});

/// An explicit "N GB GDDRx" or "N GB VRAM" statement.
static EXPLICIT_VRAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s*gb\s*(?:of\s+)?(?:gddr\d?x?|vram|video\s+memory)").expect("valid regex")
});

/// Detect the first graphics card mentioned in `text` (already lowercased).
pub(crate) fn detect(text: &str, specs: &dyn SpecTable) -> Option<Gpu> {
    let mut gpu = first_match(&GPU_MATCHERS, text, specs)?;
    if let Some(vram) = EXPLICIT_VRAM
        .captures(text)
        .and_then(|caps| num(&caps, 1))
        .filter(|v| (1..=48).contains(v))
    {
        gpu.vram_gb = Some(vram);
    }
    Some(gpu)
}

/// VRAM printed right after the model ("RTX 3060 12GB", "RTX 3060 8GB
/// memory"), unless the number is followed by "DDRx" or "RAM" ("RTX 3070
/// 32GB DDR4").
fn trailing_vram(caps: &Captures<'_>, size_group: usize) -> Option<u32> {
    if caps.get(size_group + 1).is_some() {
        return None;
    }
    num(caps, size_group).filter(|v| (1..=48).contains(v))
}

fn build(brand: &str, model: String, series: Option<String>, key: &str, specs: &dyn SpecTable) -> Gpu {
    let spec = specs.gpu_spec(key);
    Gpu {
        brand: brand.to_string(),
        model,
        series,
        vram_gb: spec.as_ref().map(|s| s.vram_gb),
        tdp_watts: spec.as_ref().map(|s| s.tdp_watts),
        architecture: spec.as_ref().map(|s| s.architecture.clone()),
        release_year: spec.as_ref().map(|s| s.release_year),
        value: None,
    }
}

fn nvidia(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Gpu> {
    let line = &caps[1];
    let number = &caps[2];
    let variant = caps
        .get(3)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .map(|v| if v == "tisuper" { "ti super".to_string() } else { v });

    // GTX 10/16 series use four digits, older cards three; RTX always four.
    if line == "rtx" && number.len() != 4 {
        return None;
    }

    let key = match &variant {
        Some(v) => format!("{line} {number} {v}"),
        None => format!("{line} {number}"),
    };
    let display_variant = variant
        .as_deref()
        .map(|v| match v {
            "ti" => " Ti",
            "super" => " Super",
            _ => " Ti Super",
        })
        .unwrap_or_default();
    let series = format!(
        "{} {}",
        line.to_ascii_uppercase(),
        &number[..number.len() - 2]
    );

    let mut gpu = build(
        "NVIDIA",
        format!("{} {number}{display_variant}", line.to_ascii_uppercase()),
        Some(series),
        &key,
        specs,
    );
    if let Some(vram) = trailing_vram(caps, 4) {
        gpu.vram_gb = Some(vram);
    }
    Some(gpu)
}

fn radeon(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Gpu> {
    let number = &caps[1];
    let variant = caps.get(2).map(|m| m.as_str());
    let key = match variant {
        Some(v) => format!("rx {number} {v}"),
        None => format!("rx {number}"),
    };
    let display_variant = variant
        .map(|v| format!(" {}", v.to_ascii_uppercase()))
        .unwrap_or_default();
    let series = format!("RX {}", &number[..number.len() - 2]);

    let mut gpu = build("AMD", format!("RX {number}{display_variant}"), Some(series), &key, specs);
    if let Some(vram) = trailing_vram(caps, 3) {
        gpu.vram_gb = Some(vram);
    }
    Some(gpu)
}

fn arc(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Gpu> {
    let model = &caps[1];
    let series = model[..1].to_ascii_uppercase();
    let mut gpu = build(
        "Intel",
        format!("Arc {}", model.to_ascii_uppercase()),
        Some(format!("Arc {series}")),
        &format!("arc {model}"),
        specs,
    );
    if let Some(vram) = trailing_vram(caps, 2) {
        gpu.vram_gb = Some(vram);
    }
    Some(gpu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::ReferenceSpecs;

    fn gpu(text: &str) -> Gpu {
        detect(&text.to_lowercase(), &ReferenceSpecs).expect("gpu detected")
    }

    #[test]
    fn test_nvidia_from_table() {
        let g = gpu("Gaming PC with RTX 3070 and 32GB DDR4");
        assert_eq!(g.brand, "NVIDIA");
        assert_eq!(g.model, "RTX 3070");
        assert_eq!(g.series.as_deref(), Some("RTX 30"));
        assert_eq!(g.vram_gb, Some(8));
        assert_eq!(g.release_year, Some(2020));
    }

    #[test]
    fn test_nvidia_variants() {
        assert_eq!(gpu("EVGA GTX 1660 Super").model, "GTX 1660 Super");
        assert_eq!(gpu("rtx 4070 ti super").vram_gb, Some(16));
        assert_eq!(gpu("RTX3080Ti").model, "RTX 3080 Ti");
    }

    #[test]
    fn test_trailing_and_explicit_vram() {
        assert_eq!(gpu("RTX 3060 8GB").vram_gb, Some(8));
        assert_eq!(gpu("RTX 3070 32GB DDR4 RAM").vram_gb, Some(8));
        assert_eq!(gpu("RTX 3060 8GB memory").vram_gb, Some(8));
        assert_eq!(gpu("RX 580, 4GB GDDR5").vram_gb, Some(4));
    }

    #[test]
    fn test_amd_and_intel() {
        let g = gpu("Sapphire Radeon RX 7900 XTX");
        assert_eq!(g.model, "RX 7900 XTX");
        assert_eq!(g.vram_gb, Some(24));

        let g = gpu("Intel Arc A770 16GB");
        assert_eq!(g.model, "Arc A770");
        assert_eq!(g.vram_gb, Some(16));
    }

    #[test]
    fn test_unknown_model_keeps_name() {
        let g = gpu("rtx 9999");
        assert_eq!(g.model, "RTX 9999");
        assert!(g.vram_gb.is_none());
        assert!(detect("integrated graphics only", &ReferenceSpecs).is_none());
    }
}
