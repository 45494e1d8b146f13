use std::io::Write;
use crate::image_plate::combine::types::CombinedImage;
use crate::image_plate::common::error::Result;
use crate::image_plate::config::PlateConfig;

pub trait TiffWriter {
    fn write_tiff(&self, image: &CombinedImage, output: &mut dyn Write, config: &PlateConfig) -> Result<()>;
}
