//! Dithering engine
//!
//! Turns an RGB grid into a palette index grid using one of the methods in
//! [`DitherMethod`].
//!
//! # Module Structure
//! - `kernels`: Error diffusion kernel taps and weights
//! - `error_diffusion`: Floyd-Steinberg with a per-pass error accumulator
//! - `ordered`: Stateless 4x4 Bayer threshold dithering

pub mod error_diffusion;
pub mod kernels;
pub mod ordered;

use tracing::debug;

use crate::buffer::{IndexGrid, RgbGrid};
use crate::config::DitherMethod;
use crate::palette::Palette;
use crate::quantize::quantize_all;

pub use error_diffusion::{floyd_steinberg_dither, ErrorAccumulator};
pub use kernels::{DiffusionTap, FLOYD_STEINBERG};
pub use ordered::{bayer_bias, ordered_dither, BAYER_4X4};

/// Options for a single dithering pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DitherOptions {
    pub method: DitherMethod,
    /// Minimum absolute channel error that gets diffused (error diffusion
    /// only); 0 always diffuses
    pub diffusion_threshold: u8,
}

impl DitherOptions {
    pub fn new(method: DitherMethod) -> Self {
        Self {
            method,
            diffusion_threshold: 0,
        }
    }
}

/// Quantize a grid to palette indices with the selected method.
///
/// `DitherMethod::None` quantizes each pixel directly with no bias or error.
pub fn dither(
    grid: &RgbGrid,
    palette: &Palette,
    options: DitherOptions,
    progress: Option<&mut dyn FnMut(f32)>,
) -> IndexGrid {
    debug!(
        "Dithering {}x{} grid with {:?} against {} colors",
        grid.width(),
        grid.height(),
        options.method,
        palette.len()
    );
    match options.method {
        DitherMethod::None => IndexGrid::from_parts(
            quantize_all(grid.pixels(), palette),
            grid.width(),
            grid.height(),
        ),
        DitherMethod::FloydSteinberg => {
            floyd_steinberg_dither(grid, palette, options.diffusion_threshold, progress)
        }
        DitherMethod::Ordered => ordered_dither(grid, palette),
    }
}

/// Reconstruct the RGB image the display will show for an index grid.
pub fn preview_grid(indices: &IndexGrid, palette: &Palette) -> RgbGrid {
    let pixels = indices
        .indices()
        .iter()
        .map(|&i| palette.expand(i as usize))
        .collect();
    RgbGrid::from_parts(pixels, indices.width(), indices.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> RgbGrid {
        let pixels = (0..48)
            .map(|i| [(i * 5) as u8, (255 - i * 5) as u8, (i * 11 % 256) as u8])
            .collect();
        RgbGrid::new(pixels, 8, 6).unwrap()
    }

    #[test]
    fn test_none_is_direct_quantization() {
        let grid = sample_grid();
        let palette = Palette::vga16();
        let out = dither(&grid, &palette, DitherOptions::new(DitherMethod::None), None);
        assert_eq!(out.indices(), quantize_all(grid.pixels(), &palette).as_slice());
    }

    #[test]
    fn test_disabled_dithering_degrades_to_none() {
        let grid = sample_grid();
        let palette = Palette::vga16();
        for method in [DitherMethod::FloydSteinberg, DitherMethod::Ordered] {
            let opts = DitherOptions::new(method.effective(false));
            let out = dither(&grid, &palette, opts, None);
            assert_eq!(out.indices(), quantize_all(grid.pixels(), &palette).as_slice());
        }
    }

    #[test]
    fn test_all_methods_produce_valid_indices() {
        let grid = sample_grid();
        let palette = Palette::rgb222();
        for method in [DitherMethod::None, DitherMethod::FloydSteinberg, DitherMethod::Ordered] {
            let out = dither(&grid, &palette, DitherOptions::new(method), None);
            assert_eq!(out.indices().len(), 48);
            assert!(out.indices().iter().all(|&i| (i as usize) < palette.len()));
        }
    }

    #[test]
    fn test_preview_grid() {
        let grid = RgbGrid::filled(2, 2, [255, 0, 0]);
        let palette = Palette::vga16();
        let out = dither(&grid, &palette, DitherOptions::new(DitherMethod::None), None);
        let preview = preview_grid(&out, &palette);
        assert_eq!(preview.pixels(), &[[85, 0, 0]; 4]);
    }
}
