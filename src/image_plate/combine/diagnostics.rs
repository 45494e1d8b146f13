//! Readout ratio diagnostics.
//!
//! Two calibrated readouts of the same plate should agree pixel by pixel. The median
//! ratio between consecutive scans shows how well they do: a value near 1 means the
//! calibrations match, a drift exposes fading between readouts or a wrong descriptor.

use crate::image_plate::scan_set::{Scan, ScanSet};

/// Median PSL ratio between two consecutive scans of a scan set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadoutRatio {
    pub upper: String,
    pub lower: String,
    /// Median of `upper / lower`; `None` when no pixel was usable in both
    pub median: Option<f64>,
    /// Number of pixels the median was taken over
    pub samples: usize,
}

impl ReadoutRatio {
    /// True when the median differs from 1 by more than `tolerance`. A ratio without
    /// a median is never drifted.
    pub fn is_drifted(&self, tolerance: f64) -> bool {
        self.median
            .is_some_and(|median| (median - 1.0).abs() > tolerance)
    }
}

fn usable(scan: &Scan, index: usize, floor: f64) -> bool {
    let raw = scan.raw();
    !scan.psl().saturation_mask()[index]
        && raw.values()[index] as f64 / raw.max_raw() as f64 >= floor
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Computes the ratio of every scan to the next one in scan set order.
///
/// Only pixels that are unsaturated in both scans and whose normalized raw value is at
/// least `underexposed_fraction` in both are used; dimmer pixels are dominated by noise.
pub fn readout_ratios(set: &ScanSet, underexposed_fraction: f64) -> Vec<ReadoutRatio> {
    set.scans()
        .windows(2)
        .map(|pair| {
            let (upper, lower) = (&pair[0], &pair[1]);
            let ratios: Vec<f64> = (0..upper.psl().values().len())
                .filter(|&i| {
                    usable(upper, i, underexposed_fraction) && usable(lower, i, underexposed_fraction)
                })
                .map(|i| upper.psl().values()[i] / lower.psl().values()[i])
                .collect();
            ReadoutRatio {
                upper: upper.calibration().source.clone(),
                lower: lower.calibration().source.clone(),
                samples: ratios.len(),
                median: median(ratios),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_plate::descriptor::types::CalibrationRecord;
    use crate::image_plate::raw::types::RawGrid;

    fn member(source: &str, sensitivity: f64, values: Vec<u32>) -> (CalibrationRecord, RawGrid) {
        let width = values.len();
        let calibration = CalibrationRecord {
            source: source.to_string(),
            width,
            height: 1,
            bit_depth: 16,
            resolution: 50.0,
            resolution_y: 50.0,
            sensitivity,
            latitude: 5.0,
            scan_timestamp: None,
        };
        (calibration, RawGrid::from_values(width, 1, 16, values).unwrap())
    }

    #[test]
    fn test_same_counts_at_double_sensitivity_give_ratio_half() {
        // identical counts read at double sensitivity mean half the PSL
        let counts = vec![50000, 52000, 60000, 10, 65535];
        let set = ScanSet::new(vec![
            member("a.inf", 4000.0, counts.clone()),
            member("b.inf", 8000.0, counts),
        ])
        .unwrap();
        let ratios = readout_ratios(&set, 0.5);
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].upper, "b.inf");
        assert_eq!(ratios[0].lower, "a.inf");
        // 10 is underexposed and 65535 saturated
        assert_eq!(ratios[0].samples, 3);
        assert!((ratios[0].median.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_drift_detection() {
        let counts = vec![50000, 52000, 60000];
        let set = ScanSet::new(vec![
            member("a.inf", 4000.0, counts.clone()),
            member("b.inf", 8000.0, counts.clone()),
            member("c.inf", 1000.0, counts),
        ])
        .unwrap();
        let ratios = readout_ratios(&set, 0.5);
        assert_eq!(ratios.len(), 2);
        assert!(ratios.iter().all(|ratio| ratio.is_drifted(0.25)));

        let matched = ReadoutRatio {
            upper: "a.inf".to_string(),
            lower: "b.inf".to_string(),
            median: Some(0.9),
            samples: 10,
        };
        assert!(!matched.is_drifted(0.25));
        assert!(matched.is_drifted(0.05));
        let empty = ReadoutRatio { median: None, samples: 0, ..matched };
        assert!(!empty.is_drifted(0.0));
    }

    #[test]
    fn test_no_usable_pixels() {
        let set = ScanSet::new(vec![
            member("a.inf", 4000.0, vec![65535, 1]),
            member("b.inf", 1000.0, vec![65535, 2]),
        ])
        .unwrap();
        let ratios = readout_ratios(&set, 0.5);
        assert_eq!(ratios[0].samples, 0);
        assert_eq!(ratios[0].median, None);
    }

    #[test]
    fn test_single_scan_has_no_ratios() {
        let set = ScanSet::new(vec![member("a.inf", 4000.0, vec![40000])]).unwrap();
        assert!(readout_ratios(&set, 0.5).is_empty());
    }

    #[test]
    fn test_median_of_even_count() {
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(Vec::new()), None);
    }
}
