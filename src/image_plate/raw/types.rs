//! RAW grid types

use crate::image_plate::common::error::{ImagePlateError, Result};

/// Raw scanner counts of one readout, row-major.
///
/// Every value lies in `[0, 2^bit_depth - 1]`; the grid cannot be modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    width: usize,
    height: usize,
    bit_depth: u32,
    values: Vec<u32>,
}

impl RawGrid {
    /// Builds a grid from already decoded values, checking length and range.
    pub fn from_values(width: usize, height: usize, bit_depth: u32, values: Vec<u32>) -> Result<Self> {
        const SOURCE: &str = "in-memory grid";
        let expected = width
            .checked_mul(height)
            .ok_or(ImagePlateError::InvalidDimensions(width, height))?;
        if values.len() != expected {
            return Err(ImagePlateError::SizeMismatch {
                file: SOURCE.to_string(),
                expected,
                actual: values.len(),
                unit: "pixels",
            });
        }
        let max = max_value(bit_depth);
        if let Some((index, &value)) = values.iter().enumerate().find(|&(_, &v)| v > max) {
            return Err(ImagePlateError::ValueOutOfRange {
                file: SOURCE.to_string(),
                index,
                value,
                max,
            });
        }
        Ok(Self::new_unchecked(width, height, bit_depth, values))
    }

    pub(crate) fn new_unchecked(width: usize, height: usize, bit_depth: u32, values: Vec<u32>) -> Self {
        Self {
            width,
            height,
            bit_depth,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    pub fn max_raw(&self) -> u32 {
        max_value(self.bit_depth)
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }
}

pub(crate) fn max_value(bit_depth: u32) -> u32 {
    if bit_depth >= u32::BITS {
        u32::MAX
    } else {
        (1u32 << bit_depth) - 1
    }
}
