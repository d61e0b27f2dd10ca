//! Text Mode Conversion CLI Tool
//!
//! Converts an image into a 16-color text screen for the FPGA GPU: every
//! character cell takes one resized pixel, its character code from the
//! pixel brightness and its color from the dithered palette index.
//!
//! Supports:
//! - Resolution profiles: 1440x900 (180x56), 1024x768 (128x48), 800x600 (100x37)
//! - Dithering: none, Floyd-Steinberg, ordered (4x4 Bayer)
//! - Outputs: text/color plane binaries, hex memory image, JSON metadata
//! - Serial upload of the dual-plane stream, raw or as controller commands

use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use sfgpu::config::{
    DitherMethod, MemoryImageConfig, ResolutionProfile, TransportConfig, DEFAULT_BAUD_RATE,
    DEFAULT_CHUNK_SIZE, DEFAULT_TOTAL_SIZE,
};
use sfgpu::dither::DitherOptions;
use sfgpu::font::FontTable;
use sfgpu::gpu_command::CommandBuffer;
use sfgpu::memory_image::{assemble, MemoryRegions};
use sfgpu::palette::Palette;
use sfgpu::pipeline::{convert_text_screen, ConversionMetadata, OutputRecord};
#[cfg(unix)]
use sfgpu::transport::send_to_device;
use sfgpu::RgbGrid;

// ============================================================================
// Command Line Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "sfgpu_text")]
#[command(author, version, about = "Convert an image to a 16-color text screen and send it to the display", long_about = None)]
struct Args {
    /// Input image path
    #[arg(short, long)]
    input: PathBuf,

    /// Display resolution profile
    #[arg(short, long, value_enum, default_value_t = ResolutionProfile::R1440x900)]
    resolution: ResolutionProfile,

    /// Dithering method
    #[arg(short, long, value_enum, default_value_t = DitherMethod::Ordered)]
    method: DitherMethod,

    /// Disable dithering (direct nearest-color quantization)
    #[arg(long)]
    no_dither: bool,

    /// Minimum channel error that Floyd-Steinberg diffuses (0 = always)
    #[arg(long, default_value_t = 0)]
    threshold: u8,

    /// Output text plane binary (optional)
    #[arg(long)]
    output_text: Option<PathBuf>,

    /// Output color plane binary (optional)
    #[arg(long)]
    output_color: Option<PathBuf>,

    /// Output hex memory image (optional)
    #[arg(long)]
    output_hex: Option<PathBuf>,

    /// Raw 4096-byte font for the hex memory image
    #[arg(long)]
    font: Option<PathBuf>,

    /// Total size of the hex memory image in bytes
    #[arg(long, default_value_t = DEFAULT_TOTAL_SIZE)]
    total_size: usize,

    /// Output metadata JSON file path (optional)
    #[arg(long)]
    output_meta: Option<PathBuf>,

    /// Serial device to send the text and color planes to (e.g. /dev/ttyUSB0)
    #[arg(short, long)]
    device: Option<String>,

    /// Serial baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Bytes per serial write
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Wrap the serial stream in controller address/write commands
    #[arg(long)]
    frames: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Image Loading
// ============================================================================

fn load_resized(path: &Path, width: usize, height: usize) -> Result<RgbGrid, String> {
    info!("Loading: {}", path.display());
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    debug!("  Dimensions: {}x{}", img.width(), img.height());

    let resized = img
        .resize_exact(width as u32, height as u32, image::imageops::FilterType::Triangle)
        .to_rgb8();
    RgbGrid::from_interleaved(resized.as_raw(), width, height).map_err(|e| e.to_string())
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), String> {
    info!("Writing: {} ({} bytes)", path.display(), data.len());
    fs::write(path, data).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
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

    if args.output_text.is_none()
        && args.output_color.is_none()
        && args.output_hex.is_none()
        && args.output_meta.is_none()
        && args.device.is_none()
    {
        return Err(
            "No output specified. Use --output-text, --output-color, --output-hex, --output-meta, or --device"
                .to_string(),
        );
    }

    let method = args.method.effective(!args.no_dither);
    let options = DitherOptions {
        method,
        diffusion_threshold: args.threshold,
    };
    let (cols, rows) = args.resolution.text_grid();
    info!(
        "Profile {}: {}x{} characters, dither {:?}",
        args.resolution.name(),
        cols,
        rows,
        method
    );

    let grid = load_resized(&args.input, cols, rows)?;

    let mut report = |p: f32| debug!("Dithering: {:.0}%", p * 100.0);
    let screen = convert_text_screen(&grid, args.resolution, options, Some(&mut report))
        .map_err(|e| e.to_string())?;

    let mut outputs: Vec<OutputRecord> = Vec::new();

    if let Some(ref path) = args.output_text {
        write_file(path, screen.planes.text())?;
        outputs.push(OutputRecord::new("text", path, screen.planes.text().len()));
    }

    if let Some(ref path) = args.output_color {
        write_file(path, screen.planes.color())?;
        outputs.push(OutputRecord::new("color", path, screen.planes.color().len()));
    }

    if let Some(ref path) = args.output_hex {
        let font = match args.font {
            Some(ref font_path) => {
                let data = fs::read(font_path)
                    .map_err(|e| format!("Failed to read {}: {}", font_path.display(), e))?;
                FontTable::from_bytes(&data).map_err(|e| e.to_string())?.to_bytes()
            }
            None => Vec::new(),
        };
        let palette = Palette::vga16().table_bytes();
        let config = MemoryImageConfig {
            profile: args.resolution,
            total_size: args.total_size,
        };
        let image = assemble(
            MemoryRegions {
                text: screen.planes.text(),
                color: screen.planes.color(),
                font: &font,
                palette: &palette,
            },
            &config,
        );

        info!("Writing: {}", path.display());
        let file = File::create(path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        image
            .write_hex(BufWriter::new(file))
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        outputs.push(OutputRecord::new("memory_hex", path, image.bytes().len()));
    }

    if let Some(ref device) = args.device {
        let stream = screen.stream();
        let payload = if args.frames {
            let mut cmd = CommandBuffer::new();
            cmd.set_address(0).map_err(|e| e.to_string())?;
            cmd.write_data_extended(&stream);
            cmd.into_bytes()
        } else {
            stream
        };

        let config = TransportConfig {
            device: device.clone(),
            baud_rate: args.baud,
            chunk_size: args.chunk_size,
        };
        let sent = send_serial(&config, &payload)?;
        if sent != payload.len() {
            return Err(format!("Sent {} of {} bytes", sent, payload.len()));
        }
    }

    if let Some(ref meta_path) = args.output_meta {
        let mut meta = ConversionMetadata::for_text_screen(&args.input, &screen, method);
        meta.outputs = outputs;
        let json = meta.to_json().map_err(|e| e.to_string())?;
        info!("Writing metadata: {}", meta_path.display());
        let mut file =
            File::create(meta_path).map_err(|e| format!("Failed to create {}: {}", meta_path.display(), e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| format!("Failed to write {}: {}", meta_path.display(), e))?;
    }

    info!("Done!");
    Ok(())
}
