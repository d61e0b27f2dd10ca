//! Graphics Mode Pixel Push CLI Tool
//!
//! Dithers a 200x150 image to the 64-color 2-bit cube and pushes the indices
//! to the display over a serial link, or writes them as a hex memory image.
//! Can also emit the vertical-bar VRAM test pattern.

use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use sfgpu::config::{
    DitherMethod, PixelPushProfile, TransportConfig, DEFAULT_CHUNK_SIZE, PIXEL_PUSH_BAUD_RATE,
    PIXEL_PUSH_THRESHOLD,
};
use sfgpu::dither::DitherOptions;
use sfgpu::format::hex::HexLineWriter;
use sfgpu::pipeline::{convert_pixel_push, PushEncoding};
use sfgpu::test_pattern::{packed_test_pattern, PatternParams};
#[cfg(unix)]
use sfgpu::transport::send_to_device;
use sfgpu::RgbGrid;

// ============================================================================
// Command Line Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sfgpu_push")]
#[command(author, version, about = "Push a 200x150 image to the display in 64-color graphics mode", long_about = None)]
struct Args {
    /// Input image path (must be 200x150 unless --resize is given)
    #[arg(short, long, required_unless_present = "pattern")]
    input: Option<PathBuf>,

    /// Resize the input to 200x150 instead of rejecting other sizes
    #[arg(long)]
    resize: bool,

    /// Dithering method
    #[arg(short, long, value_enum, default_value_t = DitherMethod::FloydSteinberg)]
    method: DitherMethod,

    /// Diffuse error only when the largest channel error reaches this value (0 = always)
    #[arg(long, default_value_t = PIXEL_PUSH_THRESHOLD)]
    threshold: u8,

    /// Wire encoding of the indices
    #[arg(short, long, value_enum, default_value_t = PushEncoding::Indexed)]
    encoding: PushEncoding,

    /// Serial device (e.g. /dev/ttyUSB0)
    #[arg(short, long)]
    device: Option<String>,

    /// Serial baud rate
    #[arg(short, long, default_value_t = PIXEL_PUSH_BAUD_RATE)]
    baud: u32,

    /// Bytes per serial write
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Output hex file, one byte per line (optional)
    #[arg(long)]
    output_hex: Option<PathBuf>,

    /// Output raw binary file (optional)
    #[arg(long)]
    output_bin: Option<PathBuf>,

    /// Emit the dense-packed VRAM test pattern instead of an image
    #[arg(long)]
    pattern: bool,

    /// Test pattern: invert every Nth row
    #[arg(long)]
    invert_every: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Helpers
// ============================================================================

fn load_image(path: &Path, profile: PixelPushProfile, resize: bool) -> Result<RgbGrid, String> {
    info!("Loading: {}", path.display());
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let img = if resize {
        img.resize_exact(
            profile.width as u32,
            profile.height as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        img
    };
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    RgbGrid::from_interleaved(rgb.as_raw(), width as usize, height as usize).map_err(|e| e.to_string())
}

fn write_hex(path: &Path, data: &[u8]) -> Result<(), String> {
    info!("Writing: {} ({} bytes)", path.display(), data.len());
    let file = File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    let mut writer = HexLineWriter::new(BufWriter::new(file));
    writer
        .write_all(data)
        .and_then(|_| writer.flush())
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

#[cfg(unix)]
fn send_serial(config: &TransportConfig, payload: &[u8]) -> Result<usize, String> {
    send_to_device(config, payload, None).map_err(|e| format!("Serial error: {}", e))
}

#[cfg(not(unix))]
fn send_serial(config: &TransportConfig, _payload: &[u8]) -> Result<usize, String> {
    Err(format!("Serial output to {} is only supported on unix", config.device))
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<(), String> {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    if args.output_hex.is_none() && args.output_bin.is_none() && args.device.is_none() {
        return Err("No output specified. Use --output-hex, --output-bin, or --device".to_string());
    }

    let payload = if args.pattern {
        let params = PatternParams {
            invert_every: args.invert_every,
            ..PatternParams::default()
        };
        info!(
            "Test pattern: {} addresses, {} per row, {} colors",
            params.addresses,
            params.row_width,
            params.colors.len()
        );
        packed_test_pattern(&params).map_err(|e| e.to_string())?.bytes
    } else {
        let path = args.input.as_ref().ok_or("No input image given")?;
        let profile = PixelPushProfile::default();
        let grid = load_image(path, profile, args.resize)?;

        let options = DitherOptions {
            method: args.method,
            diffusion_threshold: args.threshold,
        };
        let mut report = |p: f32| debug!("Dithering: {:.0}%", p * 100.0);
        let push = convert_pixel_push(&grid, profile, options, args.encoding, Some(&mut report))
            .map_err(|e| e.to_string())?;
        push.bytes
    };

    if let Some(ref path) = args.output_bin {
        info!("Writing: {} ({} bytes)", path.display(), payload.len());
        fs::write(path, &payload).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }

    if let Some(ref path) = args.output_hex {
        write_hex(path, &payload)?;
    }

    if let Some(ref device) = args.device {
        let config = TransportConfig {
            device: device.clone(),
            baud_rate: args.baud,
            chunk_size: args.chunk_size,
        };
        let sent = send_serial(&config, &payload)?;
        info!("Pushed {} bytes", sent);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_serial_reports_missing_device() {
        let config = TransportConfig {
            device: "/nonexistent/sfgpu-tty".to_string(),
            baud_rate: PIXEL_PUSH_BAUD_RATE,
            chunk_size: DEFAULT_CHUNK_SIZE,
        };
        let err = send_serial(&config, &[0x01, 0x02]).unwrap_err();
        if cfg!(unix) {
            assert!(err.starts_with("Serial error"), "{}", err);
        } else {
            assert!(err.contains("only supported on unix"), "{}", err);
        }
    }
}
