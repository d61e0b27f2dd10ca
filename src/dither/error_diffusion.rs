/// Floyd-Steinberg error diffusion against a fixed palette.
///
/// The scan is strictly raster order (left-to-right, top-to-bottom): each
/// pixel's effective color depends on error already pushed into it by its
/// predecessors, so the loop cannot be reordered or split.
///
/// The accumulator is one padded buffer private to a single pass. Padding
/// catches error diffused past the image edges, where it is discarded.

use crate::buffer::{IndexGrid, RgbGrid};
use crate::palette::Palette;
use crate::quantize::nearest_index;

use super::kernels::{FLOYD_STEINBERG, REACH};

// ============================================================================
// Error accumulator
// ============================================================================

/// Per-pixel RGB residual buffer for one diffusion pass.
///
/// Buffer structure:
/// ```text
/// [pad] [real row] [pad]    x height
/// [pad] [overshoot row] [pad]
/// ```
pub struct ErrorAccumulator {
    width: usize,
    height: usize,
    stride: usize,
    cells: Vec<[f32; 3]>,
}

impl ErrorAccumulator {
    /// Seed the accumulator with the source pixels.
    pub fn new(grid: &RgbGrid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let stride = width + REACH * 2;
        let mut cells = vec![[0.0f32; 3]; stride * (height + 1)];
        for y in 0..height {
            for x in 0..width {
                let p = grid.get(x, y);
                cells[y * stride + x + REACH] = [p[0] as f32, p[1] as f32, p[2] as f32];
            }
        }
        Self { width, height, stride, cells }
    }

    #[inline]
    fn offset(&self, bx: usize, y: usize) -> usize {
        y * self.stride + bx
    }

    /// Current value of a real pixel.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [f32; 3] {
        self.cells[self.offset(x + REACH, y)]
    }

    /// Add `error * weight` to a buffer cell and clamp each channel to 0..=255.
    #[inline]
    fn add_clamped(&mut self, bx: usize, y: usize, error: [f64; 3], numerator: u32) {
        let idx = self.offset(bx, y);
        let cell = &mut self.cells[idx];
        for c in 0..3 {
            let share = error[c] * numerator as f64 / 16.0;
            cell[c] = (cell[c] as f64 + share).clamp(0.0, 255.0) as f32;
        }
    }

    /// Diffuse a quantization error from real pixel (x, y) to its neighbors.
    #[inline]
    fn diffuse(&mut self, x: usize, y: usize, error: [f64; 3]) {
        let bx = x + REACH;
        for tap in FLOYD_STEINBERG.iter() {
            let tx = (bx as isize + tap.dx) as usize;
            self.add_clamped(tx, y + tap.dy, error, tap.numerator);
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

    /// Every stored channel of every cell, padding included.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.cells.iter().flat_map(|c| c.iter().copied())
    }
}

// ============================================================================
// Dithering
// ============================================================================

/// Floyd-Steinberg dither an RGB grid to palette indices.
///
/// Args:
///     grid: source pixels
///     palette: target palette
///     threshold: diffuse only when the largest absolute channel error is at
///         least this value; 0 always diffuses
///     progress: optional callback receiving the fraction of rows done
///
/// The quantizer sees each accumulated channel truncated toward zero, while
/// the diffused error uses the full-precision accumulated value.
pub fn floyd_steinberg_dither(
    grid: &RgbGrid,
    palette: &Palette,
    threshold: u8,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> IndexGrid {
    let width = grid.width();
    let height = grid.height();
    let mut acc = ErrorAccumulator::new(grid);
    let mut indices = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let current = acc.get(x, y);
            let probe = [current[0] as u8, current[1] as u8, current[2] as u8];
            let idx = nearest_index(probe, palette);
            indices.push(idx);

            let q = palette.expand(idx as usize);
            let error = [
                current[0] as f64 - q[0] as f64,
                current[1] as f64 - q[1] as f64,
                current[2] as f64 - q[2] as f64,
            ];
            let max_err = error.iter().fold(0.0f64, |m, e| m.max(e.abs()));
            if threshold == 0 || max_err >= threshold as f64 {
                acc.diffuse(x, y, error);
            }
        }
        if let Some(ref mut cb) = progress {
            cb((y + 1) as f32 / height as f32);
        }
    }

    IndexGrid::from_parts(indices, width, height)
}
