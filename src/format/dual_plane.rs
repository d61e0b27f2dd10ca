//! Dual-plane text mode layout.
//!
//! One byte per cell in each of two equal-length planes, sent back to back:
//! the character plane first, then the color attribute plane. Nothing is
//! bit-packed across cells.

use crate::error::{Error, Result};

/// Foreground/background palette pair stored as `fg << 4 | bg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorAttribute {
    pub fg: u8,
    pub bg: u8,
}

impl ColorAttribute {
    /// Returns None if either index does not fit in a nibble.
    pub fn new(fg: u8, bg: u8) -> Option<Self> {
        (fg < 16 && bg < 16).then_some(Self { fg, bg })
    }

    /// Attribute with foreground 0, so the packed byte equals `index`.
    pub fn background(index: u8) -> Option<Self> {
        Self::new(0, index)
    }

    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            fg: byte >> 4,
            bg: byte & 0x0F,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self.fg << 4 | self.bg
    }
}

/// Character and color planes of a text screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualPlane {
    text: Vec<u8>,
    color: Vec<u8>,
}

impl DualPlane {
    /// Both planes must hold one byte per cell.
    pub fn new(text: Vec<u8>, color: Vec<u8>) -> Result<Self> {
        if text.len() != color.len() {
            return Err(Error::DataLength {
                expected: text.len(),
                actual: color.len(),
            });
        }
        Ok(Self { text, color })
    }

    /// Build the planes from per-cell character codes and attributes.
    pub fn from_cells(cells: impl IntoIterator<Item = (u8, ColorAttribute)>) -> Self {
        let (text, color) = cells.into_iter().map(|(ch, attr)| (ch, attr.to_byte())).unzip();
        Self { text, color }
    }

    /// Split a concatenated stream back into its two halves.
    pub fn split(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(Error::DataLength {
                expected: bytes.len() + 1,
                actual: bytes.len(),
            });
        }
        let (text, color) = bytes.split_at(bytes.len() / 2);
        Ok(Self {
            text: text.to_vec(),
            color: color.to_vec(),
        })
    }

    /// Number of cells per plane
    #[inline]
    pub fn cells(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    pub fn color(&self) -> &[u8] {
        &self.color
    }

    pub fn attribute(&self, cell: usize) -> ColorAttribute {
        ColorAttribute::from_byte(self.color[cell])
    }

    /// Text plane followed by color plane.
    pub fn pack(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.text.len() * 2);
        out.extend_from_slice(&self.text);
        out.extend_from_slice(&self.color);
        out
    }

    pub fn into_planes(self) -> (Vec<u8>, Vec<u8>) {
        (self.text, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_byte() {
        let attr = ColorAttribute::new(0xF, 0x0).unwrap();
        assert_eq!(attr.to_byte(), 0xF0);
        assert_eq!(ColorAttribute::from_byte(0x3C), ColorAttribute { fg: 3, bg: 12 });
        assert!(ColorAttribute::new(16, 0).is_none());
        assert_eq!(ColorAttribute::background(12).unwrap().to_byte(), 12);
    }

    #[test]
    fn test_pack_concatenates_planes() {
        let planes = DualPlane::from_cells([
            (b'A', ColorAttribute::background(1).unwrap()),
            (b'B', ColorAttribute::new(2, 3).unwrap()),
        ]);
        assert_eq!(planes.cells(), 2);
        assert_eq!(planes.pack(), vec![b'A', b'B', 0x01, 0x23]);
        assert_eq!(planes.attribute(1), ColorAttribute { fg: 2, bg: 3 });
    }

    #[test]
    fn test_split() {
        let planes = DualPlane::split(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(planes.text(), &[1, 2, 3]);
        assert_eq!(planes.color(), &[4, 5, 6]);
        assert!(DualPlane::split(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_full_screen_stream_length() {
        let planes = DualPlane::new(vec![0x20; 10080], vec![0xF0; 10080]).unwrap();
        let bytes = planes.pack();
        assert_eq!(bytes.len(), 20160);
        assert_eq!(DualPlane::split(&bytes).unwrap(), planes);
    }

    #[test]
    fn test_mismatched_planes() {
        assert!(DualPlane::new(vec![0; 4], vec![0; 3]).is_err());
    }
}
