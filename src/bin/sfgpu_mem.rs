//! Memory Image CLI Tool
//!
//! Assembles a display memory-initialisation file from raw text, color,
//! font and palette binaries. The output has one uppercase hex byte per
//! line in the order text, color, font, palette, zero padding.

use clap::Parser;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::info;

use sfgpu::config::{MemoryImageConfig, ResolutionProfile, DEFAULT_TOTAL_SIZE, FONT_SIZE, PALETTE_SIZE};
use sfgpu::font::FontTable;
use sfgpu::memory_image::{assemble, MemoryRegions, Region};

// ============================================================================
// Command Line Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sfgpu_mem")]
#[command(author, version, about = "Generate a hex memory image for text mode from binary planes", long_about = None)]
struct Args {
    /// Output .hex file
    #[arg(required_unless_present_any = ["list", "show_font"])]
    output: Option<PathBuf>,

    /// Text plane binary (missing file: spaces)
    text: Option<PathBuf>,

    /// Color plane binary (missing file: 0xF0)
    colors: Option<PathBuf>,

    /// Font binary, 4096 bytes (missing file: zeros)
    font: Option<PathBuf>,

    /// Palette binary, 16 bytes (missing file: zeros)
    palette: Option<PathBuf>,

    /// Display resolution profile
    #[arg(short, long, value_enum, default_value_t = ResolutionProfile::R1440x900)]
    resolution: ResolutionProfile,

    /// Total output size including padding
    #[arg(short, long, default_value_t = DEFAULT_TOTAL_SIZE)]
    total_size: usize,

    /// List the resolution profiles and exit
    #[arg(short, long)]
    list: bool,

    /// Print every glyph of a raw font file and exit
    #[arg(long)]
    show_font: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Helpers
// ============================================================================

fn print_profiles() {
    println!("Resolution profiles:");
    println!("{}", "-".repeat(60));
    for profile in ResolutionProfile::ALL {
        let (cols, rows) = profile.text_grid();
        println!("  {:10} - {:3}x{:2} characters", profile.name(), cols, rows);
        println!("             text/color: {:5} bytes each", profile.plane_size());
        println!("             minimum total: {:5} bytes", profile.minimum_total_size());
        println!();
    }
}

/// Read a region file; a missing file yields `size` fill bytes.
fn read_region(path: Option<&Path>, region: Region, size: usize) -> Result<Vec<u8>, String> {
    match path {
        Some(p) if p.exists() => {
            let data = fs::read(p).map_err(|e| format!("Failed to read {}: {}", p.display(), e))?;
            info!("Read {} bytes from {}", data.len(), p.display());
            Ok(data)
        }
        Some(p) => {
            info!("{} does not exist, using default {} region", p.display(), region.name());
            Ok(vec![region.fill_byte(); size])
        }
        None => Ok(vec![region.fill_byte(); size]),
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<(), String> {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    if args.list {
        print_profiles();
        return Ok(());
    }

    if let Some(ref font_path) = args.show_font {
        let data = fs::read(font_path).map_err(|e| format!("Failed to read {}: {}", font_path.display(), e))?;
        let font = FontTable::from_bytes(&data).map_err(|e| e.to_string())?;
        print!("{}", font.render_sheet('\u{2588}', ' '));
        return Ok(());
    }

    let output = args.output.as_ref().ok_or("No output file given")?;
    let plane = args.resolution.plane_size();
    info!(
        "Resolution {} ({} bytes of text/colors)",
        args.resolution.name(),
        plane
    );

    let text = read_region(args.text.as_deref(), Region::Text, plane)?;
    let color = read_region(args.colors.as_deref(), Region::Color, plane)?;
    let font = read_region(args.font.as_deref(), Region::Font, FONT_SIZE)?;
    let palette = read_region(args.palette.as_deref(), Region::Palette, PALETTE_SIZE)?;

    let config = MemoryImageConfig {
        profile: args.resolution,
        total_size: args.total_size,
    };
    let image = assemble(
        MemoryRegions {
            text: &text,
            color: &color,
            font: &font,
            palette: &palette,
        },
        &config,
    );

    let file = File::create(output).map_err(|e| format!("Failed to create {}: {}", output.display(), e))?;
    image
        .write_hex(BufWriter::new(file))
        .map_err(|e| format!("Failed to write {}: {}", output.display(), e))?;

    info!("Generated {} ({} bytes)", output.display(), image.bytes().len());
    Ok(())
}
