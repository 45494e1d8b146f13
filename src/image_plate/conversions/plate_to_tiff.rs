use tracing::{info, instrument, warn};
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::image_plate::{
    combine::{readout_ratios, CombineSummary, CombinedImage, MultiScanCombiner},
    common::error::{ImagePlateError, Result},
    config::PlateConfig,
    conversions::files::{companion_paths, scan_stems},
    descriptor::{CalibrationRecord, DescriptorParser, InfParser},
    raw::{ImgReader, RawGrid, RawImageReader},
    scan_set::ScanSet,
    tiff::{StandardTiffWriter, TiffWriter},
};

/// The two file contents of one scan.
#[derive(Debug, Clone)]
pub struct ScanBuffers {
    /// Identity used in logs and error messages, usually the stem
    pub source: String,
    pub descriptor: Vec<u8>,
    pub raw: Vec<u8>,
}

pub struct ImagePlatePipeline<P: DescriptorParser, R: RawImageReader, W: TiffWriter> {
    parser: P,
    reader: R,
    writer: W,
    config: PlateConfig,
}

impl ImagePlatePipeline<InfParser, ImgReader, StandardTiffWriter> {
    pub fn new(config: PlateConfig) -> Self {
        Self {
            parser: InfParser::new(config.format.clone()),
            reader: ImgReader::new(config.format.clone()),
            writer: StandardTiffWriter,
            config,
        }
    }
}

fn read_companion(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ImagePlateError::MissingCompanion(path.display().to_string()),
        _ => ImagePlateError::InputReadError(format!("{}: {}", path.display(), e)),
    })
}

impl<P: DescriptorParser, R: RawImageReader, W: TiffWriter> ImagePlatePipeline<P, R, W> {
    pub fn with_custom(parser: P, reader: R, writer: W, config: PlateConfig) -> Self {
        Self {
            parser,
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(ImagePlateError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    width, height, max
                );
                return Err(ImagePlateError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Parses the descriptor and decodes the raw payload of one scan.
    #[instrument(skip(self, buffers), fields(source = %buffers.source))]
    pub fn load_scan(&self, buffers: &ScanBuffers) -> Result<(CalibrationRecord, RawGrid)> {
        let calibration = {
            let _span = tracing::info_span!("parse_descriptor").entered();
            self.parser.parse_descriptor(&buffers.descriptor, &buffers.source)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = calibration.width,
                height = calibration.height
            ).entered();
            self.validate_dimensions(calibration.width, calibration.height)?;
        }

        let raw = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_raw(&buffers.raw, &calibration)?
        };

        info!(
            width = calibration.width,
            height = calibration.height,
            bit_depth = calibration.bit_depth,
            sensitivity = calibration.sensitivity,
            latitude = calibration.latitude,
            "Loaded scan"
        );
        Ok((calibration, raw))
    }

    pub fn build_scan_set(&self, scans: &[ScanBuffers]) -> Result<ScanSet> {
        let members = scans
            .iter()
            .map(|buffers| self.load_scan(buffers))
            .collect::<Result<Vec<_>>>()?;

        let _span = tracing::info_span!("build_scan_set", scans = members.len()).entered();
        ScanSet::new(members)
    }

    /// Loads, converts and combines the given scans of one plate.
    #[instrument(skip(self, scans), fields(scans = scans.len()))]
    pub fn combine(&self, scans: &[ScanBuffers]) -> Result<(CombinedImage, CombineSummary)> {
        let set = self.build_scan_set(scans)?;

        for ratio in readout_ratios(&set, self.config.underexposed_fraction) {
            match ratio.median {
                Some(median) if ratio.is_drifted(self.config.ratio_tolerance) => warn!(
                    "Readout ratio {} / {}: {:.4} over {} pixels is off by more than {}; \
                     check the descriptors and the readout order",
                    ratio.upper, ratio.lower, median, ratio.samples, self.config.ratio_tolerance
                ),
                Some(median) => info!(
                    "Readout ratio {} / {}: {:.4} over {} pixels",
                    ratio.upper, ratio.lower, median, ratio.samples
                ),
                None => warn!(
                    "Readout ratio {} / {}: no pixel usable in both scans",
                    ratio.upper, ratio.lower
                ),
            }
        }

        let _span = tracing::info_span!("combine_scans").entered();
        Ok(MultiScanCombiner::new().combine_with_summary(&set))
    }

    /// Combines the scans and writes the result as TIFF to `output`.
    #[instrument(skip(self, scans, output), fields(scans = scans.len()))]
    pub fn convert(&self, scans: &[ScanBuffers], output: &mut dyn Write) -> Result<CombinedImage> {
        info!("Starting image plate conversion");

        let (image, _) = self.combine(scans)?;

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&image, output, &self.config)?;
        }

        if let Some((min, max)) = image.range() {
            info!(
                width = image.width(),
                height = image.height(),
                "Conversion complete, PSL range {:.4e} .. {:.4e}",
                min,
                max
            );
        }
        Ok(image)
    }

    /// Reads the `.inf`/`.img` pair belonging to `stem`.
    pub fn read_stem(&self, stem: &Path) -> Result<ScanBuffers> {
        let (descriptor_path, raw_path) = companion_paths(stem);
        let _span = tracing::info_span!("read_input_files", stem = %stem.display()).entered();
        Ok(ScanBuffers {
            source: stem.display().to_string(),
            descriptor: read_companion(&descriptor_path)?,
            raw: read_companion(&raw_path)?,
        })
    }

    /// Reads every scan named by `inputs` (descriptor, payload or bare stem), combines
    /// them and writes the result to `output_path`.
    #[instrument(skip(self, inputs, output_path))]
    pub fn convert_files<I: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        inputs: &[I],
        output_path: Q,
    ) -> Result<CombinedImage> {
        let output_path = output_path.as_ref();
        let stems = scan_stems(inputs);

        info!(
            scans = stems.len(),
            output = %output_path.display(),
            "Converting files"
        );

        let scans = stems
            .iter()
            .map(|stem| self.read_stem(stem))
            .collect::<Result<Vec<_>>>()?;

        // combine before creating the output so a bad scan leaves no empty file behind
        let (image, _) = self.combine(&scans)?;

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                ImagePlateError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&image, &mut output_file, &self.config)?;
        }

        info!(output = %output_path.display(), "Wrote combined PSL image");
        Ok(image)
    }

    pub fn config(&self) -> &PlateConfig {
        &self.config
    }
}
