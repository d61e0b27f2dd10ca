/// Pipeline configuration: display profiles, dithering selection, memory image
/// sizing and serial transport settings.
///
/// Text mode uses 8x16 glyph cells, so a profile's text grid is the pixel
/// resolution divided by (8, 16), rounded down.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Glyph cell width in pixels
pub const CHAR_WIDTH: usize = 8;
/// Glyph cell height in pixels (also bytes per glyph in the font table)
pub const CHAR_HEIGHT: usize = 16;
/// Font table size: 256 glyphs x 16 rows
pub const FONT_SIZE: usize = 256 * CHAR_HEIGHT;
/// Palette table size: 16 one-byte compact codes
pub const PALETTE_SIZE: usize = 16;
/// Default total size of the display memory image, including padding
pub const DEFAULT_TOTAL_SIZE: usize = 24576;
/// Default serial chunk size
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// Default serial baud rate for the text pipeline
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
/// Default serial baud rate for direct pixel push
pub const PIXEL_PUSH_BAUD_RATE: u32 = 1_000_000;
/// Default adaptive diffusion threshold for direct pixel push
pub const PIXEL_PUSH_THRESHOLD: u8 = 10;

// ============================================================================
// Resolution profiles
// ============================================================================

/// Text-mode display resolution profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum ResolutionProfile {
    /// 1440x900, 180x56 characters
    #[default]
    #[value(name = "1440x900")]
    #[serde(rename = "1440x900")]
    R1440x900,
    /// 1024x768, 128x48 characters
    #[value(name = "1024x768")]
    #[serde(rename = "1024x768")]
    R1024x768,
    /// 800x600, 100x37 characters
    #[value(name = "800x600")]
    #[serde(rename = "800x600")]
    R800x600,
}

impl ResolutionProfile {
    pub const ALL: [ResolutionProfile; 3] = [
        ResolutionProfile::R1440x900,
        ResolutionProfile::R1024x768,
        ResolutionProfile::R800x600,
    ];

    /// Pixel resolution (width, height)
    pub fn pixels(self) -> (usize, usize) {
        match self {
            ResolutionProfile::R1440x900 => (1440, 900),
            ResolutionProfile::R1024x768 => (1024, 768),
            ResolutionProfile::R800x600 => (800, 600),
        }
    }

    /// Text grid (columns, rows)
    pub fn text_grid(self) -> (usize, usize) {
        let (w, h) = self.pixels();
        (w / CHAR_WIDTH, h / CHAR_HEIGHT)
    }

    /// Size in bytes of one text or color plane
    pub fn plane_size(self) -> usize {
        let (cols, rows) = self.text_grid();
        cols * rows
    }

    /// Smallest memory image that holds every region without padding
    pub fn minimum_total_size(self) -> usize {
        self.plane_size() * 2 + FONT_SIZE + PALETTE_SIZE
    }

    pub fn name(self) -> &'static str {
        match self {
            ResolutionProfile::R1440x900 => "1440x900",
            ResolutionProfile::R1024x768 => "1024x768",
            ResolutionProfile::R800x600 => "800x600",
        }
    }
}

/// Direct pixel push geometry (graphics mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPushProfile {
    pub width: usize,
    pub height: usize,
}

impl Default for PixelPushProfile {
    fn default() -> Self {
        Self { width: 200, height: 150 }
    }
}

impl PixelPushProfile {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

// ============================================================================
// Dithering selection
// ============================================================================

/// Dithering algorithm applied before quantization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherMethod {
    /// Direct per-pixel quantization, no error or bias
    None,
    /// Floyd-Steinberg error diffusion, raster order
    FloydSteinberg,
    /// 4x4 Bayer threshold bias
    #[default]
    Ordered,
}

impl DitherMethod {
    /// Resolve the method against a "dithering enabled" switch.
    pub fn effective(self, use_dithering: bool) -> DitherMethod {
        if use_dithering {
            self
        } else {
            DitherMethod::None
        }
    }
}

// ============================================================================
// Memory image and transport
// ============================================================================

/// Sizing of the display memory image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryImageConfig {
    pub profile: ResolutionProfile,
    /// Requested total size; raised to the region sum when too small
    pub total_size: usize,
}

impl Default for MemoryImageConfig {
    fn default() -> Self {
        Self {
            profile: ResolutionProfile::default(),
            total_size: DEFAULT_TOTAL_SIZE,
        }
    }
}

/// Serial transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub device: String,
    pub baud_rate: u32,
    pub chunk_size: usize,
}

impl TransportConfig {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_plane_sizes() {
        assert_eq!(ResolutionProfile::R1440x900.text_grid(), (180, 56));
        assert_eq!(ResolutionProfile::R1440x900.plane_size(), 10080);
        assert_eq!(ResolutionProfile::R1024x768.text_grid(), (128, 48));
        assert_eq!(ResolutionProfile::R1024x768.plane_size(), 6144);
        // 600 / 16 rounds down to 37 rows
        assert_eq!(ResolutionProfile::R800x600.text_grid(), (100, 37));
        assert_eq!(ResolutionProfile::R800x600.plane_size(), 3700);
    }

    #[test]
    fn test_minimum_total_size() {
        assert_eq!(ResolutionProfile::R1440x900.minimum_total_size(), 24272);
        assert!(ResolutionProfile::R1440x900.minimum_total_size() <= DEFAULT_TOTAL_SIZE);
    }

    #[test]
    fn test_dither_method_effective() {
        assert_eq!(DitherMethod::Ordered.effective(true), DitherMethod::Ordered);
        assert_eq!(DitherMethod::FloydSteinberg.effective(false), DitherMethod::None);
    }

    #[test]
    fn test_profile_serde_names() {
        let json = serde_json::to_string(&ResolutionProfile::R1024x768).unwrap();
        assert_eq!(json, "\"1024x768\"");
        let method: DitherMethod = serde_json::from_str("\"floyd-steinberg\"").unwrap();
        assert_eq!(method, DitherMethod::FloydSteinberg);
    }
}
