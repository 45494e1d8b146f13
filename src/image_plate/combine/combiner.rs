use rayon::prelude::*;
use tracing::{debug, info, warn};
use crate::image_plate::combine::types::{CombineSummary, CombinedImage};
use crate::image_plate::psl::PARALLEL_THRESHOLD;
use crate::image_plate::scan_set::{Scan, ScanSet};

/// Saturation-aware merge of several readouts of one plate.
///
/// For every pixel the scans are visited in scan set order (highest sensitivity first)
/// and the first one that is not saturated there supplies the value. A pixel saturated
/// in every scan takes the value of the last, least sensitive scan. Values are copied
/// verbatim, never blended, so the output depends only on the scan set.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiScanCombiner;

/// Index of the scan that supplies pixel `index`.
fn select(scans: &[Scan], index: usize) -> usize {
    scans
        .iter()
        .position(|scan| !scan.psl().saturation_mask()[index])
        .unwrap_or(scans.len() - 1)
}

impl MultiScanCombiner {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(&self, set: &ScanSet) -> CombinedImage {
        self.combine_with_summary(set).0
    }

    pub fn combine_with_summary(&self, set: &ScanSet) -> (CombinedImage, CombineSummary) {
        let scans = set.scans();
        let pixel_count = scans[0].psl().values().len();

        let sources: Vec<usize> = if pixel_count >= PARALLEL_THRESHOLD {
            (0..pixel_count)
                .into_par_iter()
                .map(|index| select(scans, index))
                .collect()
        } else {
            (0..pixel_count).map(|index| select(scans, index)).collect()
        };

        let values: Vec<f64> = sources
            .iter()
            .enumerate()
            .map(|(index, &source)| scans[source].psl().values()[index])
            .collect();

        let mut pixels_from_scan = vec![0usize; scans.len()];
        for &source in &sources {
            pixels_from_scan[source] += 1;
        }
        let last = scans.len() - 1;
        let fully_saturated = sources
            .iter()
            .enumerate()
            .filter(|&(index, &source)| {
                source == last && scans[last].psl().saturation_mask()[index]
            })
            .count();

        for (scan, count) in scans.iter().zip(&pixels_from_scan) {
            debug!(
                "{} supplies {} of {} pixels",
                scan.calibration().source,
                count,
                pixel_count
            );
        }
        if fully_saturated > 0 {
            warn!(
                "{} pixels are saturated in all {} scans",
                fully_saturated,
                scans.len()
            );
        }
        info!(
            "Combined {} scans into a {}x{} PSL image",
            scans.len(),
            set.width(),
            set.height()
        );

        (
            CombinedImage::new(set.width(), set.height(), values),
            CombineSummary {
                pixels_from_scan,
                fully_saturated,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_plate::descriptor::types::CalibrationRecord;
    use crate::image_plate::raw::types::RawGrid;

    fn member(
        source: &str,
        width: usize,
        height: usize,
        sensitivity: f64,
        values: Vec<u32>,
    ) -> (CalibrationRecord, RawGrid) {
        let calibration = CalibrationRecord {
            source: source.to_string(),
            width,
            height,
            bit_depth: 8,
            resolution: 50.0,
            resolution_y: 50.0,
            sensitivity,
            latitude: 5.0,
            scan_timestamp: None,
        };
        (calibration, RawGrid::from_values(width, height, 8, values).unwrap())
    }

    #[test]
    fn test_single_scan_passes_through() {
        let set = ScanSet::new(vec![member("a.inf", 3, 1, 4000.0, vec![0, 128, 255])]).unwrap();
        let combined = MultiScanCombiner::new().combine(&set);
        assert_eq!(combined.values(), set.scans()[0].psl().values());
        assert_eq!((combined.width(), combined.height()), (3, 1));
    }

    #[test]
    fn test_saturated_pixel_falls_back_to_lower_sensitivity() {
        let set = ScanSet::new(vec![
            member("low.inf", 2, 1, 1000.0, vec![200, 40]),
            member("high.inf", 2, 1, 10000.0, vec![255, 90]),
        ])
        .unwrap();
        let high = set.scans()[0].psl();
        let low = set.scans()[1].psl();

        let (combined, summary) = MultiScanCombiner::new().combine_with_summary(&set);

        assert_eq!(combined.values()[0], low.values()[0]);
        assert_eq!(combined.values()[1], high.values()[1]);
        assert_eq!(summary.pixels_from_scan, vec![1, 1]);
        assert_eq!(summary.fully_saturated, 0);
    }

    #[test]
    fn test_first_unsaturated_in_order_wins() {
        let set = ScanSet::new(vec![
            member("s1000.inf", 1, 1, 1000.0, vec![100]),
            member("s4000.inf", 1, 1, 4000.0, vec![180]),
            member("s10000.inf", 1, 1, 10000.0, vec![255]),
        ])
        .unwrap();
        let combined = MultiScanCombiner::new().combine(&set);
        assert_eq!(combined.values()[0], set.scans()[1].psl().values()[0]);
    }

    #[test]
    fn test_fully_saturated_takes_lowest_sensitivity() {
        let set = ScanSet::new(vec![
            member("high.inf", 2, 1, 10000.0, vec![255, 255]),
            member("low.inf", 2, 1, 1000.0, vec![255, 12]),
        ])
        .unwrap();
        let (combined, summary) = MultiScanCombiner::new().combine_with_summary(&set);
        let low = set.scans()[1].psl();
        assert_eq!(combined.values(), low.values());
        assert_eq!(summary.pixels_from_scan, vec![0, 2]);
        assert_eq!(summary.fully_saturated, 1);
    }

    #[test]
    fn test_every_value_comes_from_one_scan() {
        let width = 16;
        let height = 8;
        let high: Vec<u32> = (0..width * height).map(|i| if i % 3 == 0 { 255 } else { (i % 255) as u32 }).collect();
        let low: Vec<u32> = (0..width * height).map(|i| if i % 5 == 0 { 255 } else { (i % 97) as u32 }).collect();
        let set = ScanSet::new(vec![
            member("high.inf", width, height, 10000.0, high),
            member("low.inf", width, height, 1000.0, low),
        ])
        .unwrap();
        let combined = MultiScanCombiner::new().combine(&set);
        for (index, value) in combined.values().iter().enumerate() {
            assert!(set
                .scans()
                .iter()
                .any(|scan| scan.psl().values()[index] == *value));
        }
    }

    #[test]
    fn test_combination_is_deterministic() {
        let width = 400;
        let height = 260;
        let high: Vec<u32> = (0..width * height).map(|i| ((i * 31) % 256) as u32).collect();
        let low: Vec<u32> = (0..width * height).map(|i| ((i * 17) % 200) as u32).collect();
        let set = ScanSet::new(vec![
            member("high.inf", width, height, 10000.0, high),
            member("low.inf", width, height, 1000.0, low),
        ])
        .unwrap();
        let combiner = MultiScanCombiner::new();
        let first = combiner.combine(&set);
        let second = combiner.combine(&set);
        assert_eq!(first, second);
        let bits = |image: &CombinedImage| image.values().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }
}
