//! Multi-scan combination module
//!
//! Merges the readouts of a [`ScanSet`](crate::image_plate::scan_set::ScanSet) into one
//! high dynamic range PSL image and reports how the readouts relate to each other.

mod combiner;
pub mod diagnostics;
pub mod types;

pub use combiner::MultiScanCombiner;
pub use diagnostics::{readout_ratios, ReadoutRatio};
pub use types::{CombineSummary, CombinedImage};
