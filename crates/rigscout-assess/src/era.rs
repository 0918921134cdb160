//! Launch-year estimates used to reason about hardware age.

use rigscout_core::Cpu;

/// Approximate launch year of a processor from its family and generation.
pub(crate) fn cpu_release_year(cpu: &Cpu) -> Option<i32> {
    let family = cpu.family.as_str();
    let generation = cpu.generation;
    if family.starts_with("Core Ultra") {
        return Some(match generation? {
            1 => 2023,
            _ => 2024,
        });
    }
    if family.starts_with("Core i") {
        return Some(match generation? {
            2 => 2011,
            3 => 2012,
            4 => 2013,
            5 | 6 => 2015,
            7 | 8 => 2017,
            9 => 2018,
            10 => 2020,
            11 | 12 => 2021,
            13 => 2022,
            14 => 2023,
            _ => return None,
        });
    }
    if family.starts_with("Ryzen Threadripper") {
        return Some(match generation? {
            1 => 2017,
            2 => 2018,
            3 => 2019,
            5 => 2022,
            7 => 2023,
            9 => 2025,
            _ => return None,
        });
    }
    if family.starts_with("Ryzen") {
        return Some(match generation? {
            1 => 2017,
            2 => 2018,
            3 => 2019,
            4 | 5 => 2020,
            7 => 2022,
            8 => 2024,
            9 => 2024,
            _ => return None,
        });
    }
    if family == "FX" {
        return Some(2012);
    }
    None
}
