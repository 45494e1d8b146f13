use std::io::Write;
use tracing::debug;
use crate::image_plate::combine::types::CombinedImage;
use crate::image_plate::common::error::{ImagePlateError, Result};
use crate::image_plate::config::{PlateConfig, TiffCompression};
use crate::image_plate::tiff::writer::TiffWriter;

pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &CombinedImage, output: &mut dyn Write, config: &PlateConfig) -> Result<()> {
        debug!("Encoding PSL TIFF image: {}x{}", image.width(), image.height());

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => ::tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => ::tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => ::tiff::encoder::Compression::Deflate(::tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => ::tiff::encoder::Compression::Deflate(::tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => ::tiff::encoder::Compression::Deflate(::tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = ::tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ImagePlateError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => ::tiff::tags::Predictor::Horizontal,
                _ => ::tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        // PSL spans several decades; f32 keeps ~7 significant digits at any magnitude
        let samples: Vec<f32> = image.values().iter().map(|&v| v as f32).collect();

        encoder.write_image::<::tiff::encoder::colortype::Gray32Float>(
            image.width() as u32,
            image.height() as u32,
            &samples,
        ).map_err(|e| ImagePlateError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
