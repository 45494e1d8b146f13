//! Grouping of repeated readouts of one image plate.

use tracing::{debug, warn};
use crate::image_plate::common::error::{ImagePlateError, Result};
use crate::image_plate::descriptor::types::CalibrationRecord;
use crate::image_plate::psl::{PslConverter, PslGrid};
use crate::image_plate::raw::types::RawGrid;

/// One readout of the plate: its settings, raw counts and calibrated values.
#[derive(Debug, Clone)]
pub struct Scan {
    calibration: CalibrationRecord,
    raw: RawGrid,
    psl: PslGrid,
}

impl Scan {
    pub fn new(calibration: CalibrationRecord, raw: RawGrid) -> Result<Self> {
        let psl = PslConverter::new().convert(&raw, &calibration)?;
        Ok(Self {
            calibration,
            raw,
            psl,
        })
    }

    pub fn calibration(&self) -> &CalibrationRecord {
        &self.calibration
    }

    pub fn raw(&self) -> &RawGrid {
        &self.raw
    }

    pub fn psl(&self) -> &PslGrid {
        &self.psl
    }
}

/// Scans of one plate sharing the same pixel grid, highest sensitivity first.
#[derive(Debug, Clone)]
pub struct ScanSet {
    scans: Vec<Scan>,
}

impl ScanSet {
    /// Validates geometry, converts every member to PSL and orders the members by
    /// descending sensitivity. Equal sensitivities are ordered by scan time, earliest
    /// readout first; members without a parseable date come before dated ones and
    /// otherwise keep their input order.
    ///
    /// # Errors
    ///
    /// * `EmptyScanSet` - `members` is empty
    /// * `InconsistentScanGeometry` - width, height or resolution differ between members;
    ///   raised before any PSL value is computed
    /// * any conversion error of an individual member
    pub fn new(members: Vec<(CalibrationRecord, RawGrid)>) -> Result<Self> {
        let (first, _) = members.first().ok_or(ImagePlateError::EmptyScanSet)?;

        for (calibration, _) in &members[1..] {
            if !first.same_geometry(calibration) {
                return Err(ImagePlateError::InconsistentScanGeometry {
                    first: first.source.clone(),
                    other: calibration.source.clone(),
                    expected: first.geometry(),
                    found: calibration.geometry(),
                });
            }
            if calibration.bit_depth != first.bit_depth {
                warn!(
                    "{} is {}-bit while {} is {}-bit; saturation is judged per scan",
                    calibration.source, calibration.bit_depth, first.source, first.bit_depth
                );
            }
        }

        let mut scans = members
            .into_iter()
            .map(|(calibration, raw)| Scan::new(calibration, raw))
            .collect::<Result<Vec<Scan>>>()?;
        scans.sort_by(|a, b| {
            b.calibration
                .sensitivity
                .total_cmp(&a.calibration.sensitivity)
                .then_with(|| a.calibration.scanned_at().cmp(&b.calibration.scanned_at()))
        });

        for (position, scan) in scans.iter().enumerate() {
            debug!(
                "Scan {}: {} (S={}, L={}, {} saturated)",
                position,
                scan.calibration.source,
                scan.calibration.sensitivity,
                scan.calibration.latitude,
                scan.psl.saturated_count()
            );
        }

        Ok(Self { scans })
    }

    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Always `false`; a scan set holds at least one scan.
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    pub fn width(&self) -> usize {
        self.scans[0].calibration.width
    }

    pub fn height(&self) -> usize {
        self.scans[0].calibration.height
    }

    pub fn resolution(&self) -> f64 {
        self.scans[0].calibration.resolution
    }
}
