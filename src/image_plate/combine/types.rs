//! Combination output types

/// Final PSL image of a plate, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedImage {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl CombinedImage {
    pub(crate) fn new(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// Smallest and largest PSL value, `None` for an empty image.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Where the pixels of a [`CombinedImage`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineSummary {
    /// Pixel count taken from each scan, in scan set order
    pub pixels_from_scan: Vec<usize>,
    /// Pixels saturated in every scan (reported from the least sensitive one)
    pub fully_saturated: usize,
}
