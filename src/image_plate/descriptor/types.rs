//! Calibration data types

use chrono::NaiveDateTime;

use crate::image_plate::raw::types::max_value;

/// `strftime` layout of the descriptor date line
pub const SCAN_TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Readout settings of one scan, as declared by its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationRecord {
    /// Identity of the descriptor this record came from
    pub source: String,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
    pub bit_depth: u32,
    /// Pixel pitch along x in micrometers
    pub resolution: f64,
    /// Pixel pitch along y in micrometers
    pub resolution_y: f64,
    pub sensitivity: f64,
    pub latitude: f64,
    /// Scan date exactly as written in the descriptor
    pub scan_timestamp: Option<String>,
}

impl CalibrationRecord {
    /// Largest raw count representable at this bit depth.
    pub fn max_raw(&self) -> u32 {
        max_value(self.bit_depth)
    }

    /// `None` when width x height does not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Scan time parsed from the descriptor date line, e.g. `Tue Mar 03 14:21:07 2015`.
    pub fn scanned_at(&self) -> Option<NaiveDateTime> {
        self.scan_timestamp
            .as_deref()
            .and_then(|text| NaiveDateTime::parse_from_str(text, SCAN_TIMESTAMP_FORMAT).ok())
    }

    /// Converts a single raw count to PSL.
    ///
    /// `PSL = (R/100)^2 * (4000/S) * 10^(L * (count/maxRaw - 0.5))`
    pub fn to_psl(&self, count: u32) -> f64 {
        self.psl_scale() * 10f64.powf(self.latitude * (count as f64 / self.max_raw() as f64 - 0.5))
    }

    /// Count-independent prefactor of the PSL formula.
    pub(crate) fn psl_scale(&self) -> f64 {
        (self.resolution / 100.0).powi(2) * (4000.0 / self.sensitivity)
    }

    pub fn geometry(&self) -> String {
        format!("{}x{} @ {}um", self.width, self.height, self.resolution)
    }

    pub fn same_geometry(&self, other: &CalibrationRecord) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.resolution == other.resolution
    }
}
