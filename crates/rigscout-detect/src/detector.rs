use crate::specs::{ReferenceSpecs, SpecTable};
use crate::{board, chassis, cpu, gpu, memory, storage};
use rigscout_core::{Case, Components, Cooling, Cpu, Gpu, Motherboard, Psu, Ram, Storage};
use std::sync::Arc;
use tracing::debug;

/// Extracts hardware components from free-form listing text.
///
/// Matching is case-insensitive. Each category runs its own ordered matcher
/// list; categories with no match are left empty.
#[derive(Clone)]
pub struct ComponentDetector {
    specs: Arc<dyn SpecTable>,
}

impl Default for ComponentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentDetector {
    /// Detector backed by the built-in [`ReferenceSpecs`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(Arc::new(ReferenceSpecs))
    }

    /// Detector backed by a custom reference table.
    #[must_use]
    pub fn with_table(specs: Arc<dyn SpecTable>) -> Self {
        Self { specs }
    }

    /// Run every category over `text`.
    #[must_use]
    pub fn detect_all_components(&self, text: &str) -> Components {
        let text = text.to_lowercase();
        let components = Components {
            cpu: cpu::detect(&text, self.specs.as_ref()),
            gpu: gpu::detect(&text, self.specs.as_ref()),
            ram: memory::detect(&text),
            storage: storage::detect(&text),
            motherboard: board::detect_motherboard(&text, self.specs.as_ref()),
            psu: board::detect_psu(&text),
            case: chassis::detect_case(&text),
            cooling: chassis::detect_cooling(&text),
        };

        debug!(
            cpu = components.cpu.as_ref().map(|c| c.model.as_str()),
            gpu = components.gpu.as_ref().map(|g| g.model.as_str()),
            ram_gb = components.total_ram_gb(),
            drives = components.storage.len(),
            "detected components"
        );
        components
    }

    /// First processor mentioned in `text`.
    #[must_use]
    pub fn detect_cpu(&self, text: &str) -> Option<Cpu> {
        cpu::detect(&text.to_lowercase(), self.specs.as_ref())
    }

    /// First graphics card mentioned in `text`.
    #[must_use]
    pub fn detect_gpu(&self, text: &str) -> Option<Gpu> {
        gpu::detect(&text.to_lowercase(), self.specs.as_ref())
    }

    /// Memory kits in `text`.
    #[must_use]
    pub fn detect_ram(&self, text: &str) -> Vec<Ram> {
        memory::detect(&text.to_lowercase())
    }

    /// Drives in `text`, in text order.
    #[must_use]
    pub fn detect_storage(&self, text: &str) -> Vec<Storage> {
        storage::detect(&text.to_lowercase())
    }

    /// Motherboard in `text`.
    #[must_use]
    pub fn detect_motherboard(&self, text: &str) -> Option<Motherboard> {
        board::detect_motherboard(&text.to_lowercase(), self.specs.as_ref())
    }

    /// Power supply in `text`.
    #[must_use]
    pub fn detect_psu(&self, text: &str) -> Option<Psu> {
        board::detect_psu(&text.to_lowercase())
    }

    /// Case in `text`.
    #[must_use]
    pub fn detect_case(&self, text: &str) -> Option<Case> {
        chassis::detect_case(&text.to_lowercase())
    }

    /// CPU cooler in `text`.
    #[must_use]
    pub fn detect_cooling(&self, text: &str) -> Option<Cooling> {
        chassis::detect_cooling(&text.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specs::{CpuQuery, CpuSpec, GpuSpec};

    struct FixedTable;

    impl SpecTable for FixedTable {
        fn cpu_spec(&self, _query: &CpuQuery) -> Option<CpuSpec> {
            None
        }

        fn gpu_spec(&self, _model_key: &str) -> Option<GpuSpec> {
            Some(GpuSpec {
                vram_gb: 99,
                tdp_watts: 1,
                architecture: "Test".to_string(),
                release_year: 2000,
            })
        }
    }

    #[test]
    fn test_custom_table_is_used() {
        let detector = ComponentDetector::with_table(Arc::new(FixedTable));
        let gpu = detector.detect_gpu("RTX 3070").expect("gpu");
        assert_eq!(gpu.vram_gb, Some(99));
        let cpu = detector.detect_cpu("Ryzen 5 5600X").expect("cpu");
        assert!(cpu.cores.is_none());
    }

    /// Table that reports every processor as a 10 W embedded part.
    struct EmbeddedTable;

    impl SpecTable for EmbeddedTable {
        fn cpu_spec(&self, query: &CpuQuery) -> Option<CpuSpec> {
            Some(CpuSpec {
                cores: 2,
                threads: 2,
                architecture: Some(format!("Embedded {}", query.number)),
                tdp_watts: Some(10),
                socket: Some("BGA".to_string()),
            })
        }

        fn gpu_spec(&self, _model_key: &str) -> Option<GpuSpec> {
            None
        }
    }

    #[test]
    fn test_custom_table_sets_tdp_and_socket() {
        let detector = ComponentDetector::with_table(Arc::new(EmbeddedTable));
        let cpu = detector.detect_cpu("Intel Core i7-12700K build").expect("cpu");
        assert_eq!(cpu.model, "Core i7-12700K");
        assert_eq!(cpu.tdp_watts, Some(10));
        assert_eq!(cpu.socket.as_deref(), Some("BGA"));
        assert_eq!(cpu.architecture.as_deref(), Some("Embedded 12700k"));

        let cpu = ComponentDetector::with_table(Arc::new(FixedTable))
            .detect_cpu("Ryzen 5 5600X")
            .expect("cpu");
        assert!(cpu.tdp_watts.is_none());
        assert!(cpu.socket.is_none());
    }

    #[test]
    fn test_empty_text() {
        assert!(ComponentDetector::new().detect_all_components("").is_empty());
    }
}
