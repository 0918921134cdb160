//! Rigscout Detect - hardware component detection.
//!
//! Turns listing text into structured [`rigscout_core::Components`] using
//! ordered pattern/handler lists per category. Reference data (core counts,
//! VRAM, architecture) comes from a [`SpecTable`].
//!
//! # Example
//!
//! ```rust
//! use rigscout_detect::ComponentDetector;
//!
//! let detector = ComponentDetector::new();
//! let found = detector.detect_all_components("i7-12700K, RTX 3070, 32GB DDR4 3200MHz, 1TB NVMe");
//!
//! assert_eq!(found.gpu.as_ref().and_then(|g| g.vram_gb), Some(8));
//! assert_eq!(found.total_ram_gb(), 32);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

mod board;
mod chassis;
mod cpu;
mod detector;
mod gpu;
mod matcher;
mod memory;
pub mod specs;
mod storage;

pub use detector::ComponentDetector;
pub use specs::{CpuQuery, CpuSpec, GpuSpec, ReferenceSpecs, SpecTable};
