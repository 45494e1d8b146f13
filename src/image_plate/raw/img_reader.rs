//! Binary `.img` payload reader.
//!
//! The payload is a headerless, row-major array of fixed-width unsigned integers. The
//! element width follows from the bit depth and the byte order from the [`ScannerFormat`].
//! The byte length is checked before any value is decoded, and every decoded value is
//! checked against the bit depth ceiling, so a descriptor/payload mismatch never yields
//! a silently wrong grid.

use tracing::debug;
use crate::image_plate::common::error::{ImagePlateError, Result};
use crate::image_plate::descriptor::types::CalibrationRecord;
use crate::image_plate::format::{ByteOrder, ScannerFormat};
use crate::image_plate::raw::reader::RawImageReader;
use crate::image_plate::raw::types::RawGrid;

#[derive(Debug, Clone, Default)]
pub struct ImgReader {
    format: ScannerFormat,
}

impl ImgReader {
    pub fn new(format: ScannerFormat) -> Self {
        Self { format }
    }
}

fn decoder(element_bytes: usize, order: ByteOrder) -> fn(&[u8]) -> u32 {
    match (element_bytes, order) {
        (1, _) => |chunk: &[u8]| chunk[0] as u32,
        (2, ByteOrder::BigEndian) => |chunk: &[u8]| u16::from_be_bytes([chunk[0], chunk[1]]) as u32,
        (2, ByteOrder::LittleEndian) => |chunk: &[u8]| u16::from_le_bytes([chunk[0], chunk[1]]) as u32,
        (_, ByteOrder::BigEndian) => {
            |chunk: &[u8]| chunk.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32)
        }
        (_, ByteOrder::LittleEndian) => {
            |chunk: &[u8]| chunk.iter().rev().fold(0u32, |acc, &b| (acc << 8) | b as u32)
        }
    }
}

impl RawImageReader for ImgReader {
    /// Decodes `data` into a grid shaped by `calibration`.
    ///
    /// # Errors
    ///
    /// * `UnsupportedBitDepth` - the bit depth is zero or wider than 32 bits
    /// * `MalformedDescriptor` - the declared grid size does not fit in `usize`
    /// * `SizeMismatch` - the payload does not hold exactly width x height elements
    /// * `ValueOutOfRange` - a decoded value exceeds `2^bit_depth - 1`
    fn read_raw(&self, data: &[u8], calibration: &CalibrationRecord) -> Result<RawGrid> {
        let bit_depth = calibration.bit_depth;
        if bit_depth == 0 || bit_depth > u32::BITS {
            return Err(ImagePlateError::UnsupportedBitDepth {
                file: calibration.source.clone(),
                bit_depth,
            });
        }

        let element_bytes = ScannerFormat::element_bytes(bit_depth);
        let (expected, expected_bytes) = calibration
            .pixel_count()
            .and_then(|count| Some((count, count.checked_mul(element_bytes)?)))
            .ok_or_else(|| ImagePlateError::MalformedDescriptor {
                file: calibration.source.clone(),
                reason: format!(
                    "{}x{} {}-bit pixels overflow the payload size",
                    calibration.width, calibration.height, bit_depth
                ),
            })?;

        debug!(
            "Decoding {} bytes as {}x{} {}-bit pixels ({:?})",
            data.len(),
            calibration.width,
            calibration.height,
            bit_depth,
            self.format.byte_order
        );

        if data.len() % element_bytes != 0 {
            return Err(ImagePlateError::SizeMismatch {
                file: calibration.source.clone(),
                expected: expected_bytes,
                actual: data.len(),
                unit: "bytes",
            });
        }
        let actual = data.len() / element_bytes;
        if actual != expected {
            return Err(ImagePlateError::SizeMismatch {
                file: calibration.source.clone(),
                expected,
                actual,
                unit: "pixels",
            });
        }

        let max = calibration.max_raw();
        let decode = decoder(element_bytes, self.format.byte_order);
        let values = data
            .chunks_exact(element_bytes)
            .enumerate()
            .map(|(index, chunk)| {
                let value = decode(chunk);
                if value > max {
                    Err(ImagePlateError::ValueOutOfRange {
                        file: calibration.source.clone(),
                        index,
                        value,
                        max,
                    })
                } else {
                    Ok(value)
                }
            })
            .collect::<Result<Vec<u32>>>()?;

        Ok(RawGrid::new_unchecked(
            calibration.width,
            calibration.height,
            bit_depth,
            values,
        ))
    }
}
