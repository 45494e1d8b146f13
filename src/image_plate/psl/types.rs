//! PSL grid types

/// Calibrated values of one readout plus its saturation mask, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct PslGrid {
    width: usize,
    height: usize,
    values: Vec<f64>,
    saturated: Vec<bool>,
}

impl PslGrid {
    pub(crate) fn new(width: usize, height: usize, values: Vec<f64>, saturated: Vec<bool>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        debug_assert_eq!(saturated.len(), width * height);
        Self {
            width,
            height,
            values,
            saturated,
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

    /// `true` where the raw count sat at the bit depth ceiling.
    pub fn saturation_mask(&self) -> &[bool] {
        &self.saturated
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x, y).map(|i| self.values[i])
    }

    pub fn is_saturated(&self, x: usize, y: usize) -> Option<bool> {
        self.index(x, y).map(|i| self.saturated[i])
    }

    pub fn saturated_count(&self) -> usize {
        self.saturated.iter().filter(|&&s| s).count()
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}
