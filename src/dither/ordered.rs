/// Ordered (Bayer) dithering.
///
/// Each pixel gets a bias from a fixed 4x4 threshold matrix indexed by
/// `(y mod 4, x mod 4)`. The bias is `matrix / 16 * 64 - 32`, which is always
/// an integer in -32..=28, added to each channel and clamped before
/// quantization. No state is carried between pixels.

use crate::buffer::{IndexGrid, RgbGrid};
use crate::palette::Palette;
use crate::quantize::nearest_index;

/// 4x4 Bayer threshold matrix, values 0-15
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Bias applied at pixel (x, y).
#[inline]
pub fn bayer_bias(x: usize, y: usize) -> i16 {
    BAYER_4X4[y % 4][x % 4] as i16 * 4 - 32
}

/// Add the Bayer bias to every channel and clamp to 0..=255.
#[inline]
pub fn biased(rgb: [u8; 3], x: usize, y: usize) -> [u8; 3] {
    let bias = bayer_bias(x, y);
    rgb.map(|c| (c as i16 + bias).clamp(0, 255) as u8)
}

/// Ordered dither an RGB grid to palette indices.
pub fn ordered_dither(grid: &RgbGrid, palette: &Palette) -> IndexGrid {
    let width = grid.width();
    let height = grid.height();
    let mut indices = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            indices.push(nearest_index(biased(grid.get(x, y), x, y), palette));
        }
    }
    IndexGrid::from_parts(indices, width, height)
}
