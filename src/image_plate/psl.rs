//! PSL calibration module
//!
//! Converts raw scanner counts into photo-stimulated luminescence using the scanner's
//! logarithmic calibration, and flags the pixels the scanner clipped.

mod converter;
pub mod types;

pub use converter::PslConverter;
pub use types::PslGrid;

/// Grids with at least this many pixels are processed with rayon.
pub(crate) const PARALLEL_THRESHOLD: usize = 100_000;
