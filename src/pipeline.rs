//! End-to-end conversions from an RGB grid to display byte streams.
//!
//! - Text screen: one cell per grid pixel, character byte from luma and
//!   color byte from the 16-color quantized index (dual-plane layout)
//! - Pixel push: 64-color indices for graphics mode, one byte per pixel
//!   or dense-packed
//!
//! Grids must already have the target dimensions; resizing belongs to the
//! caller.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::{IndexGrid, RgbGrid};
use crate::config::{DitherMethod, PixelPushProfile, ResolutionProfile};
use crate::dither::{dither, preview_grid, DitherOptions};
use crate::error::Result;
use crate::format::dense::pack_dense;
use crate::format::dual_plane::{ColorAttribute, DualPlane};
use crate::palette::Palette;

/// Rec.601 luma in 14-bit fixed point, rounded to nearest.
///
/// `(R*4899 + G*9617 + B*1868 + 8192) >> 14`; the weights sum to 2^14 so
/// white maps to exactly 255.
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(|c| c as u32);
    ((r * 4899 + g * 9617 + b * 1868 + 8192) >> 14) as u8
}

// ============================================================================
// Text screen
// ============================================================================

/// Text mode conversion result.
#[derive(Debug, Clone)]
pub struct TextScreen {
    pub profile: ResolutionProfile,
    pub planes: DualPlane,
    /// 16-color indices, one per cell
    pub indices: IndexGrid,
}

impl TextScreen {
    /// Text plane followed by color plane, the serial wire layout.
    pub fn stream(&self) -> Vec<u8> {
        self.planes.pack()
    }

    /// Cell colors as the display would show them.
    pub fn preview(&self) -> RgbGrid {
        preview_grid(&self.indices, &Palette::vga16())
    }
}

/// Convert a grid sized to the profile's text grid into text and color planes.
///
/// The character byte of each cell is the luma of the source pixel, using
/// the full 0-255 range; the font decides how each level looks. The color
/// byte carries the dithered 16-color index in its low nibble with
/// foreground 0, so it equals the index.
pub fn convert_text_screen(
    grid: &RgbGrid,
    profile: ResolutionProfile,
    options: DitherOptions,
    progress: Option<&mut dyn FnMut(f32)>,
) -> Result<TextScreen> {
    let (cols, rows) = profile.text_grid();
    grid.expect_dimensions(cols, rows)?;

    info!(
        "Converting {}x{} grid for {} text mode ({:?})",
        cols,
        rows,
        profile.name(),
        options.method
    );
    let palette = Palette::vga16();
    let indices = dither(grid, &palette, options, progress);

    let planes = DualPlane::from_cells(
        grid.pixels()
            .iter()
            .zip(indices.indices())
            .map(|(&rgb, &index)| (luma(rgb), ColorAttribute { fg: 0, bg: index })),
    );
    debug!(
        "Text plane {} bytes, color plane {} bytes",
        planes.text().len(),
        planes.color().len()
    );

    Ok(TextScreen {
        profile,
        planes,
        indices,
    })
}

// ============================================================================
// Pixel push
// ============================================================================

/// Wire encoding of graphics mode indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PushEncoding {
    /// One index per byte
    #[default]
    Indexed,
    /// Four 6-bit indices per three bytes
    Dense,
}

/// Graphics mode conversion result.
#[derive(Debug, Clone)]
pub struct PixelPush {
    pub encoding: PushEncoding,
    /// 64-color indices, one per pixel
    pub indices: IndexGrid,
    pub bytes: Vec<u8>,
    /// Zero indices appended by dense packing
    pub padding_indices: usize,
}

impl PixelPush {
    pub fn preview(&self) -> RgbGrid {
        preview_grid(&self.indices, &Palette::rgb222())
    }
}

/// Dither a grid of the push profile's size to the 64-color cube.
pub fn convert_pixel_push(
    grid: &RgbGrid,
    profile: PixelPushProfile,
    options: DitherOptions,
    encoding: PushEncoding,
    progress: Option<&mut dyn FnMut(f32)>,
) -> Result<PixelPush> {
    grid.expect_dimensions(profile.width, profile.height)?;

    info!(
        "Converting {}x{} grid for pixel push ({:?}, threshold {})",
        profile.width, profile.height, options.method, options.diffusion_threshold
    );
    let palette = Palette::rgb222();
    let indices = dither(grid, &palette, options, progress);

    let (bytes, padding_indices) = match encoding {
        PushEncoding::Indexed => (indices.indices().to_vec(), 0),
        PushEncoding::Dense => {
            let packed = pack_dense(indices.indices())?;
            info!(
                "Dense packed {} indices into {} bytes ({:.1}% smaller)",
                packed.real_indices,
                packed.bytes.len(),
                packed.savings_percent()
            );
            (packed.bytes, packed.padding_indices)
        }
    };

    Ok(PixelPush {
        encoding,
        indices,
        bytes,
        padding_indices,
    })
}

// ============================================================================
// Metadata sidecar
// ============================================================================

/// One file written by a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub size_bytes: usize,
}

impl OutputRecord {
    pub fn new(kind: &str, path: &Path, size_bytes: usize) -> Self {
        Self {
            kind: kind.to_string(),
            path: path.display().to_string(),
            size_bytes,
        }
    }
}

/// JSON sidecar describing a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionMetadata {
    pub input: String,
    pub profile: ResolutionProfile,
    pub columns: usize,
    pub rows: usize,
    pub dither_method: DitherMethod,
    pub plane_size: usize,
    pub stream_size: usize,
    /// Compact codes of the palette in index order
    pub palette: Vec<u8>,
    pub outputs: Vec<OutputRecord>,
}

impl ConversionMetadata {
    pub fn for_text_screen(input: &Path, screen: &TextScreen, method: DitherMethod) -> Self {
        let (columns, rows) = screen.profile.text_grid();
        Self {
            input: input.display().to_string(),
            profile: screen.profile,
            columns,
            rows,
            dither_method: method,
            plane_size: screen.planes.cells(),
            stream_size: screen.planes.cells() * 2,
            palette: Palette::vga16().table_bytes(),
            outputs: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| std::io::Error::from(e).into())
    }
}
