//! Processor matchers.
//!
//! Handlers receive lowercased text and build canonical model names.

use crate::matcher::{first_match, num, Matcher};
use crate::specs::{CpuQuery, SpecTable};
use once_cell::sync::Lazy;
use regex::Captures;
use rigscout_core::Cpu;

static CPU_MATCHERS: Lazy<Vec<Matcher<Cpu>>> = Lazy::new(|| {
    vec![
        Matcher::new(
            r"\b(?:intel\s+)?core\s+ultra\s+([3579])\s+(\d{3})([a-z]{0,2})\b",
            core_ultra,
        ),
        Matcher::new(
            r"\b(?:intel\s+)?(?:core\s+)?i([3579])[\s-]?(\d{4,5})([a-z]{0,2})\b",
            core_i,
        ),
        Matcher::new(
            r"\b(?:intel\s+)?xeon\s+(?:(e[357])[\s-]?(\d{4})(?:\s*(v\d))?|([wed])[\s-]?(\d{4,5}[a-z]?)|(platinum|gold|silver|bronze)\s+(\d{4}[a-z]?))\b",
            xeon,
        ),
        Matcher::new(
            r"\b(?:amd\s+)?(?:ryzen\s+)?threadripper\s+(?:pro\s+)?(\d{4})(wx|x)?\b",
            threadripper,
        ),
        Matcher::new(
            r"\b(?:amd\s+)?ryzen\s+([3579])\s+(?:pro\s+)?(\d{4})([a-z0-9]{0,3})\b",
            ryzen,
        ),
        Matcher::new(r"\b(?:amd\s+)?fx[\s-]?(\d{4})\b", fx),
    ]
});

/// Detect the first processor mentioned in `text` (already lowercased).
pub(crate) fn detect(text: &str, specs: &dyn SpecTable) -> Option<Cpu> {
    first_match(&CPU_MATCHERS, text, specs)
}

fn with_spec(mut cpu: Cpu, query: &CpuQuery, specs: &dyn SpecTable) -> Cpu {
    if let Some(spec) = specs.cpu_spec(query) {
        if spec.cores > 0 {
            cpu.cores = Some(spec.cores);
            cpu.threads = Some(spec.threads);
        }
        cpu.architecture = spec.architecture;
        cpu.tdp_watts = spec.tdp_watts;
        cpu.socket = spec.socket;
    }
    cpu
}

fn blank(brand: &str, model: String, family: String) -> Cpu {
    Cpu {
        brand: brand.to_string(),
        model,
        family,
        generation: None,
        cores: None,
        threads: None,
        tdp_watts: None,
        socket: None,
        architecture: None,
        value: None,
    }
}

fn core_ultra(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let tier = num(caps, 1)?;
    let number = &caps[2];
    let suffix = caps.get(3).map_or("", |m| m.as_str());
    let series = number.chars().next()?.to_digit(10)?;

    let mut cpu = blank(
        "Intel",
        format!("Core Ultra {tier} {number}{}", suffix.to_ascii_uppercase()),
        format!("Core Ultra {tier}"),
    );
    cpu.generation = Some(series);

    let query = CpuQuery {
        brand: "Intel",
        family: cpu.family.clone(),
        tier: u8::try_from(tier).ok()?,
        number: format!("{number}{suffix}"),
        suffix: suffix.to_string(),
        generation: cpu.generation,
    };
    Some(with_spec(cpu, &query, specs))
}

fn core_i(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let tier = num(caps, 1)?;
    let number = &caps[2];
    let suffix = caps.get(3).map_or("", |m| m.as_str());

    // 5-digit models carry a two-digit generation (12700 -> 12), 4-digit ones a single digit.
    let generation: u32 = if number.len() == 5 {
        number[..2].parse().ok()?
    } else {
        number[..1].parse().ok()?
    };
    if !(2..=14).contains(&generation) {
        return None;
    }

    let mut cpu = blank(
        "Intel",
        format!("Core i{tier}-{number}{}", suffix.to_ascii_uppercase()),
        format!("Core i{tier}"),
    );
    cpu.generation = Some(generation);

    let query = CpuQuery {
        brand: "Intel",
        family: cpu.family.clone(),
        tier: u8::try_from(tier).ok()?,
        number: format!("{number}{suffix}"),
        suffix: suffix.to_string(),
        generation: Some(generation),
    };
    Some(with_spec(cpu, &query, specs))
}

fn xeon(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let model = if let (Some(line), Some(number)) = (caps.get(1), caps.get(2)) {
        let rev = caps.get(3).map(|m| format!(" {}", m.as_str())).unwrap_or_default();
        format!("Xeon {}-{}{rev}", line.as_str().to_ascii_uppercase(), number.as_str())
    } else if let (Some(line), Some(number)) = (caps.get(4), caps.get(5)) {
        format!(
            "Xeon {}-{}",
            line.as_str().to_ascii_uppercase(),
            number.as_str().to_ascii_uppercase()
        )
    } else {
        let tier = caps.get(6)?.as_str();
        let mut chars = tier.chars();
        let tier = chars
            .next()
            .map(|c| c.to_ascii_uppercase().to_string() + chars.as_str())?;
        format!("Xeon {tier} {}", caps.get(7)?.as_str().to_ascii_uppercase())
    };

    let cpu = blank("Intel", model, "Xeon".to_string());
    let query = CpuQuery {
        brand: "Intel",
        family: cpu.family.clone(),
        tier: 0,
        number: cpu.model.trim_start_matches("Xeon ").to_ascii_lowercase(),
        suffix: String::new(),
        generation: None,
    };
    Some(with_spec(cpu, &query, specs))
}

fn threadripper(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let number = &caps[1];
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    let series = number.chars().next()?.to_digit(10)?;

    let mut cpu = blank(
        "AMD",
        format!("Ryzen Threadripper {number}{}", suffix.to_ascii_uppercase()),
        "Ryzen Threadripper".to_string(),
    );
    cpu.generation = Some(series);

    let query = CpuQuery {
        brand: "AMD",
        family: cpu.family.clone(),
        tier: 0,
        number: format!("{number}{suffix}"),
        suffix: suffix.to_string(),
        generation: Some(series),
    };
    Some(with_spec(cpu, &query, specs))
}

fn ryzen(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let tier = num(caps, 1)?;
    let number = &caps[2];
    let suffix = caps.get(3).map_or("", |m| m.as_str());
    let series = number.chars().next()?.to_digit(10)?;

    let mut cpu = blank(
        "AMD",
        format!("Ryzen {tier} {number}{}", suffix.to_ascii_uppercase()),
        format!("Ryzen {tier}"),
    );
    cpu.generation = Some(series);

    let query = CpuQuery {
        brand: "AMD",
        family: cpu.family.clone(),
        tier: u8::try_from(tier).ok()?,
        number: format!("{number}{suffix}"),
        suffix: suffix.to_string(),
        generation: Some(series),
    };
    Some(with_spec(cpu, &query, specs))
}

fn fx(caps: &Captures<'_>, specs: &dyn SpecTable) -> Option<Cpu> {
    let number = &caps[1];
    let cpu = blank("AMD", format!("FX-{number}"), "FX".to_string());

    let query = CpuQuery {
        brand: "AMD",
        family: cpu.family.clone(),
        tier: 0,
        number: number.to_string(),
        suffix: String::new(),
        generation: None,
    };
    Some(with_spec(cpu, &query, specs))
}
