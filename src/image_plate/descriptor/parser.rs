use crate::image_plate::common::error::Result;
use crate::image_plate::descriptor::types::CalibrationRecord;

pub trait DescriptorParser {
    /// `source` identifies the descriptor in error messages (usually its path).
    fn parse_descriptor(&self, data: &[u8], source: &str) -> Result<CalibrationRecord>;
}
