//! Display memory image assembly.
//!
//! The image is the text plane, color plane, font table and palette table
//! laid out back to back, then zero padding up to the configured total:
//!
//! ```text
//! 0x0000          text     (plane bytes, fill 0x20)
//! plane           color    (plane bytes, fill 0xF0)
//! 2*plane         font     (4096 bytes, fill 0x00)
//! 2*plane+4096    palette  (16 bytes, fill 0x00)
//! ...             padding  (0x00 up to total)
//! ```
//!
//! Regions of the wrong length are padded or truncated to fit, and every
//! such correction is returned to the caller and logged at `warn` level.

use std::fmt;
use std::io::{self, Write};

use tracing::{info, warn};

use crate::config::{MemoryImageConfig, FONT_SIZE, PALETTE_SIZE};
use crate::format::hex::HexLineWriter;

// ============================================================================
// Regions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Text,
    Color,
    Font,
    Palette,
}

impl Region {
    /// Byte used to pad a short region
    pub fn fill_byte(self) -> u8 {
        match self {
            Region::Text => 0x20,
            Region::Color => 0xF0,
            Region::Font | Region::Palette => 0x00,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Text => "text",
            Region::Color => "color",
            Region::Font => "font",
            Region::Palette => "palette",
        }
    }
}

/// A non-fatal fix applied while assembling the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCorrection {
    /// Region was short and got filled with its fill byte
    Padded { region: Region, expected: usize, actual: usize },
    /// Region was long and got cut
    Truncated { region: Region, expected: usize, actual: usize },
    /// Requested total could not hold every region
    TotalRaised { requested: usize, required: usize },
}

impl fmt::Display for SizeCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeCorrection::Padded { region, expected, actual } => write!(
                f,
                "{} region has {} bytes, expected {}; padded with 0x{:02X}",
                region.name(),
                actual,
                expected,
                region.fill_byte()
            ),
            SizeCorrection::Truncated { region, expected, actual } => write!(
                f,
                "{} region has {} bytes, expected {}; truncated",
                region.name(),
                actual,
                expected
            ),
            SizeCorrection::TotalRaised { requested, required } => write!(
                f,
                "total size {} is smaller than the regions ({}), raised",
                requested, required
            ),
        }
    }
}

/// Pad or truncate `data` to exactly `expected` bytes.
pub fn fit_region(region: Region, data: &[u8], expected: usize) -> (Vec<u8>, Option<SizeCorrection>) {
    let actual = data.len();
    if actual == expected {
        return (data.to_vec(), None);
    }
    if actual > expected {
        (
            data[..expected].to_vec(),
            Some(SizeCorrection::Truncated { region, expected, actual }),
        )
    } else {
        let mut out = Vec::with_capacity(expected);
        out.extend_from_slice(data);
        out.resize(expected, region.fill_byte());
        (out, Some(SizeCorrection::Padded { region, expected, actual }))
    }
}

// ============================================================================
// Layout
// ============================================================================

/// Region offsets within a memory image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub plane_size: usize,
    pub text_offset: usize,
    pub color_offset: usize,
    pub font_offset: usize,
    pub palette_offset: usize,
    pub padding_offset: usize,
    pub total_size: usize,
}

impl MemoryLayout {
    /// Layout for `plane_size`-byte planes. A `total_size` too small for the
    /// regions is raised to their sum.
    pub fn new(plane_size: usize, total_size: usize) -> Self {
        let color_offset = plane_size;
        let font_offset = plane_size * 2;
        let palette_offset = font_offset + FONT_SIZE;
        let padding_offset = palette_offset + PALETTE_SIZE;
        Self {
            plane_size,
            text_offset: 0,
            color_offset,
            font_offset,
            palette_offset,
            padding_offset,
            total_size: total_size.max(padding_offset),
        }
    }

    /// Sum of all region sizes, excluding padding
    #[inline]
    pub fn data_size(&self) -> usize {
        self.padding_offset
    }

    #[inline]
    pub fn padding_size(&self) -> usize {
        self.total_size - self.padding_offset
    }

    fn log(&self) {
        info!("Text: {} bytes (offset 0x{:04X})", self.plane_size, self.text_offset);
        info!("Color: {} bytes (offset 0x{:04X})", self.plane_size, self.color_offset);
        info!("Font: {} bytes (offset 0x{:04X})", FONT_SIZE, self.font_offset);
        info!("Palette: {} bytes (offset 0x{:04X})", PALETTE_SIZE, self.palette_offset);
        if self.padding_size() > 0 {
            info!("Padding: {} bytes", self.padding_size());
        }
    }
}

// ============================================================================
// Image
// ============================================================================

/// Input regions for one memory image; any of them may have the wrong size.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryRegions<'a> {
    pub text: &'a [u8],
    pub color: &'a [u8],
    pub font: &'a [u8],
    pub palette: &'a [u8],
}

/// Assembled memory image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: Vec<u8>,
    layout: MemoryLayout,
    corrections: Vec<SizeCorrection>,
}

impl MemoryImage {
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// Every pad, truncate and total-size fix applied, in region order
    #[inline]
    pub fn corrections(&self) -> &[SizeCorrection] {
        &self.corrections
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the image as one uppercase hex byte per line.
    pub fn write_hex<W: Write>(&self, out: W) -> io::Result<()> {
        let mut writer = HexLineWriter::new(out);
        writer.write_all(&self.bytes)?;
        writer.flush()
    }
}

/// Assemble a memory image from possibly mis-sized regions.
pub fn assemble(regions: MemoryRegions<'_>, config: &MemoryImageConfig) -> MemoryImage {
    let plane_size = config.profile.plane_size();
    let layout = MemoryLayout::new(plane_size, config.total_size);
    let mut corrections = Vec::new();

    if layout.total_size != config.total_size {
        corrections.push(SizeCorrection::TotalRaised {
            requested: config.total_size,
            required: layout.total_size,
        });
    }

    let mut bytes = Vec::with_capacity(layout.total_size);
    for (region, data, expected) in [
        (Region::Text, regions.text, plane_size),
        (Region::Color, regions.color, plane_size),
        (Region::Font, regions.font, FONT_SIZE),
        (Region::Palette, regions.palette, PALETTE_SIZE),
    ] {
        let (fitted, correction) = fit_region(region, data, expected);
        bytes.extend_from_slice(&fitted);
        corrections.extend(correction);
    }
    bytes.resize(layout.total_size, 0x00);

    for correction in &corrections {
        warn!("{}", correction);
    }
    info!(
        "Memory image for {}: {} bytes",
        config.profile.name(),
        bytes.len()
    );
    layout.log();

    MemoryImage {
        bytes,
        layout,
        corrections,
    }
}
