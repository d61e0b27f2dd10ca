/// Fixed display palettes built on the 2-bit-per-channel RGB cube.
///
/// Provides:
/// - `CompactColor`: a 6-bit `RRGGBB` color code
/// - `expand_channel` / `compact_code`: 2-bit <-> 8-bit channel conversion
/// - `Palette`: an immutable ordered color table (16 or 64 entries) with
///   precomputed 8-bit RGB triples for the quantizer
///
/// A palette is built once and shared by reference; nothing mutates it.

use crate::error::{Error, Result};

/// Bits per channel in a compact code
pub const CHANNEL_BITS: u8 = 2;

/// The 16-color text mode palette, in hardware index order.
pub const VGA16_CODES: [u8; 16] = [
    0x00, 0x01, 0x04, 0x05, 0x10, 0x11, 0x14, 0x15,
    0x2A, 0x2B, 0x2E, 0x2F, 0x3A, 0x3B, 0x3E, 0x3F,
];

/// Expand a 2-bit channel to 8 bits: 0 -> 0, 1 -> 85, 2 -> 170, 3 -> 255
#[inline]
pub fn expand_channel(channel2: u8) -> u8 {
    (channel2 & 0x03) * 85
}

/// Encode an 8-bit RGB triple to a compact code by keeping the top two bits
/// of each channel. This truncates; use the quantizer for nearest-color.
#[inline]
pub fn compact_code(r: u8, g: u8, b: u8) -> u8 {
    const SHIFT: u8 = 8 - CHANNEL_BITS;
    ((r >> SHIFT) << (2 * CHANNEL_BITS)) | ((g >> SHIFT) << CHANNEL_BITS) | (b >> SHIFT)
}

// ============================================================================
// Compact color
// ============================================================================

/// A 6-bit color code, two bits per channel, red in the high bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompactColor(u8);

impl CompactColor {
    /// Returns None if the code does not fit in 6 bits.
    pub fn new(code: u8) -> Option<Self> {
        (code < 64).then_some(CompactColor(code))
    }

    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn red(self) -> u8 {
        (self.0 >> 4) & 0x03
    }

    #[inline]
    pub fn green(self) -> u8 {
        (self.0 >> 2) & 0x03
    }

    #[inline]
    pub fn blue(self) -> u8 {
        self.0 & 0x03
    }

    /// 8-bit-per-channel expansion of this code.
    #[inline]
    pub fn expand(self) -> [u8; 3] {
        [
            expand_channel(self.red()),
            expand_channel(self.green()),
            expand_channel(self.blue()),
        ]
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Ordered, immutable palette of compact colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    codes: Vec<CompactColor>,
    /// Expanded RGB, same order as `codes`
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Build a palette from compact codes.
    ///
    /// Only the 16- and 64-entry sizes are accepted, and every code must fit
    /// in 6 bits.
    pub fn from_codes(codes: &[u8]) -> Result<Self> {
        if codes.len() != 16 && codes.len() != 64 {
            return Err(Error::UnsupportedPalette(format!(
                "{} entries, expected 16 or 64",
                codes.len()
            )));
        }
        let codes = codes
            .iter()
            .map(|&c| {
                CompactColor::new(c).ok_or_else(|| {
                    Error::UnsupportedPalette(format!("code 0x{:02X} exceeds 6 bits", c))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let colors = codes.iter().map(|c| c.expand()).collect();
        Ok(Self { codes, colors })
    }

    /// The 16-color text mode palette.
    pub fn vga16() -> Self {
        Self::from_trusted(&VGA16_CODES)
    }

    /// All 64 colors of the 2-bit cube; index equals compact code.
    pub fn rgb222() -> Self {
        let codes: Vec<u8> = (0..64).collect();
        Self::from_trusted(&codes)
    }

    fn from_trusted(codes: &[u8]) -> Self {
        let codes: Vec<CompactColor> = codes.iter().map(|&c| CompactColor(c & 0x3F)).collect();
        let colors = codes.iter().map(|c| c.expand()).collect();
        Self { codes, colors }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Bits needed to address every entry (4 for 16 colors, 6 for 64)
    pub fn index_bits(&self) -> u8 {
        (usize::BITS - (self.len() - 1).leading_zeros()) as u8
    }

    /// Compact code at `index`. Panics on out-of-range index.
    #[inline]
    pub fn code(&self, index: usize) -> CompactColor {
        self.codes[index]
    }

    /// Expanded RGB at `index`. Panics on out-of-range index.
    #[inline]
    pub fn expand(&self, index: usize) -> [u8; 3] {
        self.colors[index]
    }

    /// Expanded RGB of every entry, in index order.
    #[inline]
    pub fn all_colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Compact codes as raw bytes, the layout of the display palette plane.
    pub fn table_bytes(&self) -> Vec<u8> {
        self.codes.iter().map(|c| c.code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_channel() {
        assert_eq!(expand_channel(0), 0);
        assert_eq!(expand_channel(1), 85);
        assert_eq!(expand_channel(2), 170);
        assert_eq!(expand_channel(3), 255);
        // Only the low two bits count
        assert_eq!(expand_channel(0b111), 255);
        for v in 0..4u8 {
            assert_eq!(expand_channel(v) >> 6, v);
        }
    }

    #[test]
    fn test_compact_color_channels() {
        let c = CompactColor::new(0x2B).unwrap();
        assert_eq!((c.red(), c.green(), c.blue()), (2, 2, 3));
        assert_eq!(c.expand(), [170, 170, 255]);
        assert!(CompactColor::new(64).is_none());
    }

    #[test]
    fn test_vga16_palette() {
        let p = Palette::vga16();
        assert_eq!(p.len(), 16);
        assert_eq!(p.index_bits(), 4);
        assert_eq!(p.expand(0), [0, 0, 0]);
        assert_eq!(p.expand(4), [85, 0, 0]);
        assert_eq!(p.expand(12), [255, 170, 170]);
        assert_eq!(p.expand(15), [255, 255, 255]);
        assert_eq!(p.table_bytes(), VGA16_CODES.to_vec());
    }

    #[test]
    fn test_rgb222_palette() {
        let p = Palette::rgb222();
        assert_eq!(p.len(), 64);
        assert_eq!(p.index_bits(), 6);
        for i in 0..64 {
            assert_eq!(p.code(i).code() as usize, i);
        }
        assert_eq!(p.expand(0b01_10_11), [85, 170, 255]);
    }

    #[test]
    fn test_from_codes_validation() {
        assert!(Palette::from_codes(&[0u8; 8]).is_err());
        let mut codes = VGA16_CODES;
        codes[3] = 0x40;
        assert!(Palette::from_codes(&codes).is_err());
        assert_eq!(Palette::from_codes(&VGA16_CODES).unwrap(), Palette::vga16());
    }

    #[test]
    fn test_compact_code_truncates() {
        assert_eq!(compact_code(255, 0, 0), 0x30);
        assert_eq!(compact_code(170, 85, 255), 0b10_01_11);
        assert_eq!(compact_code(63, 64, 127), 0b00_01_01);
    }
}
