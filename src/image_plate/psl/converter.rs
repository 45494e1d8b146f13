use rayon::prelude::*;
use tracing::debug;
use crate::image_plate::common::error::{ImagePlateError, Result};
use crate::image_plate::descriptor::types::CalibrationRecord;
use crate::image_plate::psl::PARALLEL_THRESHOLD;
use crate::image_plate::psl::types::PslGrid;
use crate::image_plate::raw::types::RawGrid;

/// Raw count to PSL converter.
///
/// Applies, element-wise,
///
/// ```text
/// PSL = (R/100)^2 * (4000/S) * 10^(L * (count/maxRaw - 0.5))
/// ```
///
/// where `R` is the pixel pitch in micrometers, `S` the sensitivity, `L` the latitude and
/// `maxRaw = 2^bit_depth - 1`. The first factor rescales for pixel area, the second
/// undoes the scanner gain and the exponential undoes the logarithmic digitisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PslConverter;

impl PslConverter {
    pub fn new() -> Self {
        Self
    }

    fn validate(raw: &RawGrid, calibration: &CalibrationRecord) -> Result<()> {
        if calibration.bit_depth < 1 {
            return Err(ImagePlateError::InvalidCalibration(format!(
                "{}: bit depth must be at least 1",
                calibration.source
            )));
        }
        if calibration.sensitivity.is_nan() || calibration.sensitivity <= 0.0 {
            return Err(ImagePlateError::InvalidCalibration(format!(
                "{}: sensitivity must be positive, got {}",
                calibration.source, calibration.sensitivity
            )));
        }
        if raw.bit_depth() != calibration.bit_depth {
            return Err(ImagePlateError::InvalidCalibration(format!(
                "{}: raw grid is {}-bit but the descriptor declares {}-bit",
                calibration.source,
                raw.bit_depth(),
                calibration.bit_depth
            )));
        }
        let expected = calibration
            .pixel_count()
            .ok_or(ImagePlateError::InvalidDimensions(calibration.width, calibration.height))?;
        if raw.width() != calibration.width || raw.height() != calibration.height {
            return Err(ImagePlateError::SizeMismatch {
                file: calibration.source.clone(),
                expected,
                actual: raw.values().len(),
                unit: "pixels",
            });
        }
        Ok(())
    }

    /// Converts every pixel of `raw` and marks those equal to the bit depth ceiling.
    pub fn convert(&self, raw: &RawGrid, calibration: &CalibrationRecord) -> Result<PslGrid> {
        Self::validate(raw, calibration)?;

        let max_raw = calibration.max_raw();
        let pixel = |&count: &u32| (calibration.to_psl(count), count == max_raw);

        let (values, saturated): (Vec<f64>, Vec<bool>) = if raw.values().len() >= PARALLEL_THRESHOLD {
            raw.values().par_iter().map(pixel).unzip()
        } else {
            raw.values().iter().map(pixel).unzip()
        };

        let grid = PslGrid::new(raw.width(), raw.height(), values, saturated);
        debug!(
            "{}: converted {}x{} pixels to PSL, {} saturated",
            calibration.source,
            grid.width(),
            grid.height(),
            grid.saturated_count()
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibration(width: usize, height: usize, bit_depth: u32) -> CalibrationRecord {
        CalibrationRecord {
            source: "scan.inf".to_string(),
            width,
            height,
            bit_depth,
            resolution: 50.0,
            resolution_y: 50.0,
            sensitivity: 4000.0,
            latitude: 5.0,
            scan_timestamp: None,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let cal = calibration(2, 1, 8);
        let raw = RawGrid::from_values(2, 1, 8, vec![255, 0]).unwrap();
        let psl = PslConverter::new().convert(&raw, &cal).unwrap();

        assert_eq!(psl.saturation_mask(), &[true, false]);
        let expected = 0.25 * 1.0 * 10f64.powf(5.0 * (0.0 - 0.5));
        assert!((psl.values()[1] - expected).abs() < 1e-15);
        assert!((psl.values()[1] - 0.000790569).abs() < 1e-9);
        // saturated pixel still carries its value: 0.25 * 10^2.5
        assert!((psl.values()[0] - 0.25 * 10f64.powf(2.5)).abs() < 1e-9);
    }

    #[test]
    fn test_saturation_only_at_ceiling() {
        let cal = calibration(4, 1, 16);
        let raw = RawGrid::from_values(4, 1, 16, vec![0, 65533, 65534, 65535]).unwrap();
        let psl = PslConverter::new().convert(&raw, &cal).unwrap();
        assert_eq!(psl.saturation_mask(), &[false, false, false, true]);
        assert_eq!(psl.saturated_count(), 1);
        assert_eq!(psl.is_saturated(3, 0), Some(true));
    }

    #[test]
    fn test_monotonic_in_raw_value() {
        let cal = calibration(256, 1, 8);
        let raw = RawGrid::from_values(256, 1, 8, (0..256).collect()).unwrap();
        let psl = PslConverter::new().convert(&raw, &cal).unwrap();
        assert!(psl.values().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_matches_single_value_formula() {
        let mut cal = calibration(3, 1, 16);
        cal.resolution = 100.0;
        cal.sensitivity = 1000.0;
        cal.latitude = 4.0;
        let raw = RawGrid::from_values(3, 1, 16, vec![100, 20000, 50000]).unwrap();
        let psl = PslConverter::new().convert(&raw, &cal).unwrap();
        for (i, &count) in raw.values().iter().enumerate() {
            assert_eq!(psl.values()[i], cal.to_psl(count));
        }
        // (100/100)^2 * (4000/1000) * 10^(4 * (50000/65535 - 0.5))
        let expected = 4.0 * 10f64.powf(4.0 * (50000.0 / 65535.0 - 0.5));
        assert!((psl.values()[2] - expected).abs() < 1e-12 * expected);
    }

    #[test]
    fn test_parallel_path_matches_sequential_formula() {
        let width = 400;
        let height = 300;
        let cal = calibration(width, height, 16);
        let values: Vec<u32> = (0..width * height).map(|i| (i % 65536) as u32).collect();
        let raw = RawGrid::from_values(width, height, 16, values).unwrap();
        let psl = PslConverter::new().convert(&raw, &cal).unwrap();
        assert_eq!(psl.values().len(), width * height);
        for i in [0, 1, 65535, 70000, width * height - 1] {
            let count = raw.values()[i];
            assert_eq!(psl.values()[i], cal.to_psl(count));
            assert_eq!(psl.saturation_mask()[i], count == 65535);
        }
    }

    #[test]
    fn test_rejects_non_positive_sensitivity() {
        let mut cal = calibration(1, 1, 8);
        cal.sensitivity = 0.0;
        let raw = RawGrid::from_values(1, 1, 8, vec![1]).unwrap();
        let err = PslConverter::new().convert(&raw, &cal).unwrap_err();
        assert!(matches!(err, ImagePlateError::InvalidCalibration(_)));
    }

    #[test]
    fn test_rejects_grid_of_other_shape() {
        let cal = calibration(2, 2, 8);
        let raw = RawGrid::from_values(4, 1, 8, vec![0; 4]).unwrap();
        let err = PslConverter::new().convert(&raw, &cal).unwrap_err();
        assert!(matches!(err, ImagePlateError::SizeMismatch { .. }));
    }
}
