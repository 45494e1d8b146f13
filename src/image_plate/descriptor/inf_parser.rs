//! Line-oriented `.inf` descriptor parser.
//!
//! The descriptor is plain ASCII with one value per line. Which line holds which value is
//! taken from the [`ScannerFormat`] layout table, so other scanner variants only need a
//! different table, not a different parser.

use std::str::FromStr;

use tracing::{debug, warn};
use crate::image_plate::common::error::{ImagePlateError, Result};
use crate::image_plate::descriptor::parser::DescriptorParser;
use crate::image_plate::descriptor::types::CalibrationRecord;
use crate::image_plate::format::ScannerFormat;

/// Parser for Fuji BAS style `.inf` descriptors.
#[derive(Debug, Clone, Default)]
pub struct InfParser {
    format: ScannerFormat,
}

impl InfParser {
    pub fn new(format: ScannerFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &ScannerFormat {
        &self.format
    }
}

fn malformed(source: &str, reason: impl Into<String>) -> ImagePlateError {
    ImagePlateError::MalformedDescriptor {
        file: source.to_string(),
        reason: reason.into(),
    }
}

/// Reads and parses the value on line `index`.
fn field<T: FromStr>(lines: &[&str], index: usize, name: &str, source: &str) -> Result<T> {
    let raw = lines
        .get(index)
        .ok_or_else(|| malformed(source, format!("missing {} on line {}", name, index + 1)))?;
    raw.parse::<T>().map_err(|_| {
        malformed(
            source,
            format!("{} on line {} is not a valid number: {:?}", name, index + 1, raw),
        )
    })
}

fn positive_real(value: f64, name: &str, source: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(malformed(source, format!("{} must be positive, got {}", name, value)))
    }
}

impl DescriptorParser for InfParser {
    fn parse_descriptor(&self, data: &[u8], source: &str) -> Result<CalibrationRecord> {
        let text = std::str::from_utf8(data)
            .map_err(|e| malformed(source, format!("not valid UTF-8 text: {}", e)))?;
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let layout = &self.format.layout;

        debug!("Parsing descriptor {} ({} lines)", source, lines.len());

        let resolution: f64 = field(&lines, layout.resolution_x, "pixel size x", source)?;
        let resolution_y: f64 = field(&lines, layout.resolution_y, "pixel size y", source)?;
        let bit_depth: u32 = field(&lines, layout.bit_depth, "bit depth", source)?;
        let width: usize = field(&lines, layout.width, "width", source)?;
        let height: usize = field(&lines, layout.height, "height", source)?;
        let sensitivity: f64 = field(&lines, layout.sensitivity, "sensitivity", source)?;
        let latitude: f64 = field(&lines, layout.latitude, "latitude", source)?;

        if width == 0 || height == 0 {
            return Err(malformed(
                source,
                format!("dimensions must be positive, got {}x{}", width, height),
            ));
        }
        if width.checked_mul(height).is_none() {
            return Err(malformed(
                source,
                format!("dimensions {}x{} overflow the pixel count", width, height),
            ));
        }
        let resolution = positive_real(resolution, "pixel size x", source)?;
        let resolution_y = positive_real(resolution_y, "pixel size y", source)?;
        let sensitivity = positive_real(sensitivity, "sensitivity", source)?;
        let latitude = positive_real(latitude, "latitude", source)?;

        if !self.format.supports(bit_depth) {
            return Err(ImagePlateError::UnsupportedBitDepth {
                file: source.to_string(),
                bit_depth,
            });
        }

        if resolution != resolution_y {
            warn!(
                "{}: pixels are not square ({}um x {}um)",
                source, resolution, resolution_y
            );
        }

        let scan_timestamp = lines
            .get(layout.timestamp)
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string());

        let record = CalibrationRecord {
            source: source.to_string(),
            width,
            height,
            bit_depth,
            resolution,
            resolution_y,
            sensitivity,
            latitude,
            scan_timestamp,
        };
        if let (Some(text), None) = (&record.scan_timestamp, record.scanned_at()) {
            debug!("{}: unrecognised scan date {:?}, not used for ordering", source, text);
        }
        Ok(record)
    }
}
