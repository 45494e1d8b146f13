//! Scanner format tables
//!
//! Everything that differs between scanner models (which bit depths exist, how the
//! binary payload is ordered, which descriptor line holds which value) lives here so
//! that several variants can be parsed side by side.

/// Byte order of multi-byte pixel values in the `.img` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// Zero-based line numbers of each calibration value in the `.inf` descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorLayout {
    pub resolution_x: usize,
    pub resolution_y: usize,
    pub bit_depth: usize,
    pub width: usize,
    pub height: usize,
    pub sensitivity: usize,
    pub latitude: usize,
    pub timestamp: usize,
}

impl Default for DescriptorLayout {
    /// Fuji BAS layout
    fn default() -> Self {
        Self {
            resolution_x: 3,
            resolution_y: 4,
            bit_depth: 5,
            width: 6,
            height: 7,
            sensitivity: 8,
            latitude: 9,
            timestamp: 10,
        }
    }
}

/// Configuration table for one scanner file format variant
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerFormat {
    /// Bit depths the scanner can produce; anything else is rejected by the parser
    pub supported_bit_depths: Vec<u32>,
    pub byte_order: ByteOrder,
    pub layout: DescriptorLayout,
}

impl Default for ScannerFormat {
    fn default() -> Self {
        Self {
            supported_bit_depths: vec![8, 16],
            byte_order: ByteOrder::BigEndian,
            layout: DescriptorLayout::default(),
        }
    }
}

impl ScannerFormat {
    pub fn builder() -> ScannerFormatBuilder {
        ScannerFormatBuilder::default()
    }

    pub fn supports(&self, bit_depth: u32) -> bool {
        self.supported_bit_depths.contains(&bit_depth)
    }

    /// Number of bytes one pixel occupies in the binary payload.
    pub fn element_bytes(bit_depth: u32) -> usize {
        bit_depth.div_ceil(8) as usize
    }
}

/// Builder for ScannerFormat
#[derive(Default)]
pub struct ScannerFormatBuilder {
    supported_bit_depths: Option<Vec<u32>>,
    byte_order: Option<ByteOrder>,
    layout: Option<DescriptorLayout>,
}

impl ScannerFormatBuilder {
    pub fn supported_bit_depths(mut self, depths: Vec<u32>) -> Self {
        self.supported_bit_depths = Some(depths);
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = Some(order);
        self
    }

    pub fn layout(mut self, layout: DescriptorLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn build(self) -> ScannerFormat {
        let default = ScannerFormat::default();
        ScannerFormat {
            supported_bit_depths: self.supported_bit_depths.unwrap_or(default.supported_bit_depths),
            byte_order: self.byte_order.unwrap_or(default.byte_order),
            layout: self.layout.unwrap_or(default.layout),
        }
    }
}
