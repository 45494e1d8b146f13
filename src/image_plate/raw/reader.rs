use crate::image_plate::common::error::Result;
use crate::image_plate::descriptor::types::CalibrationRecord;
use crate::image_plate::raw::types::RawGrid;

pub trait RawImageReader {
    fn read_raw(&self, data: &[u8], calibration: &CalibrationRecord) -> Result<RawGrid>;
}
