//! Pipeline configuration types

use crate::image_plate::format::ScannerFormat;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Normalized raw level below which a pixel is too dim for readout diagnostics
pub const DEFAULT_UNDEREXPOSED_FRACTION: f64 = 42000.0 / 65535.0;

/// Largest accepted deviation of a readout ratio from 1 before it is reported
pub const DEFAULT_RATIO_TOLERANCE: f64 = 0.25;

/// Configuration for reading, combining and exporting image plate scans
#[derive(Debug, Clone)]
pub struct PlateConfig {
    /// Scanner file format table shared by the descriptor parser and the raw reader
    pub format: ScannerFormat,
    /// Compression method of the exported TIFF
    pub compression: TiffCompression,
    /// Predictor value for compression (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Whether to validate image dimensions before combination
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
    /// Floor used by the readout ratio diagnostics
    pub underexposed_fraction: f64,
    /// Readout ratios further than this from 1 are logged as warnings
    pub ratio_tolerance: f64,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            format: ScannerFormat::default(),
            compression: TiffCompression::None,
            predictor: None,
            validate_dimensions: true,
            max_dimension: None,
            underexposed_fraction: DEFAULT_UNDEREXPOSED_FRACTION,
            ratio_tolerance: DEFAULT_RATIO_TOLERANCE,
        }
    }
}

impl PlateConfig {
    pub fn builder() -> PlateConfigBuilder {
        PlateConfigBuilder::default()
    }
}

/// Builder for PlateConfig
#[derive(Default)]
pub struct PlateConfigBuilder {
    format: Option<ScannerFormat>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    underexposed_fraction: Option<f64>,
    ratio_tolerance: Option<f64>,
}

impl PlateConfigBuilder {
    pub fn format(mut self, format: ScannerFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn underexposed_fraction(mut self, fraction: f64) -> Self {
        self.underexposed_fraction = Some(fraction);
        self
    }

    pub fn ratio_tolerance(mut self, tolerance: f64) -> Self {
        self.ratio_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> PlateConfig {
        let default = PlateConfig::default();
        PlateConfig {
            format: self.format.unwrap_or(default.format),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            underexposed_fraction: self.underexposed_fraction.unwrap_or(default.underexposed_fraction),
            ratio_tolerance: self.ratio_tolerance.unwrap_or(default.ratio_tolerance),
        }
    }
}
