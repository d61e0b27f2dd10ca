/// Image conversion and transport for the simple FPGA GPU display.
///
/// Turns decoded RGB images into the fixed-palette byte streams the display
/// controller consumes: dual-plane text screens, graphics mode pixel pushes
/// and full memory-initialisation images, plus the serial link that
/// delivers them.
///
/// Everything here is single-threaded and synchronous. Palettes are
/// immutable values passed by reference; the only mutable state is the
/// error accumulator private to one dithering pass.

pub mod buffer;
pub mod config;
pub mod dither;
pub mod error;
pub mod font;
pub mod format;
pub mod gpu_command;
pub mod memory_image;
pub mod palette;
pub mod pipeline;
pub mod quantize;
pub mod test_pattern;
pub mod transport;

pub use buffer::{IndexGrid, RgbGrid};
pub use config::{DitherMethod, MemoryImageConfig, PixelPushProfile, ResolutionProfile, TransportConfig};
pub use error::{Error, Result, TransportError};
pub use memory_image::{assemble, MemoryImage, MemoryLayout, MemoryRegions, SizeCorrection};
pub use palette::Palette;
pub use quantize::nearest_index;
pub use transport::{send, Sink};
