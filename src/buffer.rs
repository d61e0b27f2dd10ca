/// Image grid containers.
///
/// `RgbGrid` holds decoded 8-bit RGB pixels in raster order and is never
/// modified by the pipeline. `IndexGrid` holds palette indices of the same
/// shape, produced by one dithering pass.

use crate::error::{Error, Result};

// ============================================================================
// RgbGrid
// ============================================================================

/// Row-major grid of RGB triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbGrid {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl RgbGrid {
    /// Create a grid from pixel triples.
    pub fn new(pixels: Vec<[u8; 3]>, width: usize, height: usize) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Create a grid from interleaved RGBRGB... bytes.
    pub fn from_interleaved(data: &[u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        let pixels = data.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self { width, height, pixels })
    }

    pub(crate) fn from_parts(pixels: Vec<[u8; 3]>, width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self { width, height, pixels }
    }

    /// Grid filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgb; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Fail unless the grid has exactly the given dimensions.
    pub fn expect_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(Error::InvalidDimensions {
                expected_width: width,
                expected_height: height,
                actual_width: self.width,
                actual_height: self.height,
            });
        }
        Ok(())
    }

    /// Interleaved RGBRGB... bytes.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.iter().copied()).collect()
    }
}

// ============================================================================
// IndexGrid
// ============================================================================

/// Row-major grid of palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGrid {
    width: usize,
    height: usize,
    indices: Vec<u8>,
}

impl IndexGrid {
    pub(crate) fn from_parts(indices: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(indices.len(), width * height);
        Self { width, height, indices }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.indices[y * self.width + x]
    }

    /// Indices in raster order.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }
}
