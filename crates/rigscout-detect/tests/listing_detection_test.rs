//! Detection over complete listing descriptions.

use rigscout_core::{CoolingKind, PsuModularity, StorageKind};
use rigscout_detect::ComponentDetector;

const GAMING_BUILD: &str = "Custom Gaming PC - Ryzen 7 5800X / RTX 3070

Selling my gaming rig, upgraded to a new build.
- CPU: AMD Ryzen 7 5800X with Noctua NH-U12S
- GPU: EVGA RTX 3070 FTW3 8GB GDDR6
- RAM: 32GB (2x16GB) DDR4 3600MHz
- Storage: 1TB Samsung 970 Evo Plus NVMe + 2TB HDD
- Motherboard: MSI B550-A PRO
- PSU: Corsair RM750x 750W 80+ Gold fully modular
- Case: NZXT H510 tempered glass

Cash only, local pickup.";

#[test]
fn test_full_gaming_build() {
    let found = ComponentDetector::new().detect_all_components(GAMING_BUILD);

    let cpu = found.cpu.as_ref().expect("cpu");
    assert_eq!(cpu.brand, "AMD");
    assert_eq!(cpu.cores, Some(8));
    assert_eq!(cpu.socket.as_deref(), Some("AM4"));

    let gpu = found.gpu.as_ref().expect("gpu");
    assert_eq!(gpu.brand, "NVIDIA");
    assert_eq!(gpu.vram_gb, Some(8));

    assert_eq!(found.total_ram_gb(), 32);
    assert_eq!(found.ram[0].ram_type, "DDR4");
    assert_eq!(found.ram[0].modules, 2);
    assert_eq!(found.ram[0].speed_mhz, Some(3600));

    let kinds: Vec<StorageKind> = found.storage.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StorageKind::Nvme, StorageKind::Hdd]);

    let board = found.motherboard.as_ref().expect("motherboard");
    assert_eq!(board.chipset.as_deref(), Some("B550"));
    assert_eq!(board.brand, "MSI");

    let psu = found.psu.as_ref().expect("psu");
    assert_eq!(psu.brand, "Corsair");
    assert_eq!(psu.wattage, Some(750));
    assert_eq!(psu.modularity, PsuModularity::Full);

    let case = found.case.as_ref().expect("case");
    assert_eq!(case.brand, "NZXT");
    assert!(case.tempered_glass);

    assert_eq!(found.cooling.as_ref().map(|c| c.kind), Some(CoolingKind::Air));
}

#[test]
fn test_office_desktop_has_no_gpu() {
    let found = ComponentDetector::new()
        .detect_all_components("Dell Optiplex, Intel Core i5-8500, 8GB DDR4, 256GB SSD, Windows 11");

    let cpu = found.cpu.as_ref().expect("cpu");
    assert_eq!(cpu.generation, Some(8));
    assert!(found.gpu.is_none());
    assert_eq!(found.total_ram_gb(), 8);
    assert_eq!(found.storage.len(), 1);
    assert_eq!(found.storage[0].kind, StorageKind::Ssd);
    assert!(found.psu.is_none());
}

#[test]
fn test_components_serialize_with_snake_case_kinds() {
    let found = ComponentDetector::new().detect_all_components(GAMING_BUILD);
    let value = serde_json::to_value(&found).expect("serialize components");

    assert_eq!(value["storage"][0]["kind"], "nvme");
    assert_eq!(value["psu"]["modularity"], "full");
    assert_eq!(value["ram"][0]["capacity_gb"], 32);
    assert!(value["cpu"]["value"].is_null());
}
