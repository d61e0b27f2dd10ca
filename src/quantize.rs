/// Nearest-color search against a fixed palette.
///
/// Distance is squared Euclidean distance in 8-bit RGB, computed in integers.
/// Ties resolve to the lowest palette index, which keeps output byte-exact
/// across runs and platforms.

use crate::palette::Palette;

/// Squared RGB distance between two triples.
#[inline]
pub fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the palette entry closest to `rgb`.
///
/// Scans every entry in order and keeps the first one with strictly
/// smaller distance, so the lowest index wins a tie.
#[inline]
pub fn nearest_index(rgb: [u8; 3], palette: &Palette) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, &color) in palette.all_colors().iter().enumerate() {
        let dist = distance_sq(rgb, color);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best as u8
}

/// Quantize every pixel of a flat slice without dithering.
pub fn quantize_all(pixels: &[[u8; 3]], palette: &Palette) -> Vec<u8> {
    pixels.iter().map(|&p| nearest_index(p, palette)).collect()
}
