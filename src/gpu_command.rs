//! Display controller command frames.
//!
//! The controller accepts a byte stream of commands with no framing beyond
//! the command byte itself:
//!
//! ```text
//! 0xL1 nn data...   write data at the current address, length 0xLnn (max 4095)
//! 0x02 hi lo        set the memory address
//! 0xM3              set display mode M
//! 0x04 00 00 00     read the vertical counter (reply in bytes 1 and 2)
//! ```
//!
//! The address auto-increments after every written byte, so consecutive
//! writes fill memory contiguously.

use crate::config::ResolutionProfile;
use crate::error::{Error, Result};

/// Largest payload of a single write command (12-bit length)
pub const MAX_WRITE_LEN: usize = 0x0FFF;
/// Fill buffer size used for repeated-byte writes
const REPEAT_CHUNK: usize = 256;
/// Zero bytes that cancel any write still in progress (4095 + 2 header bytes)
pub const SYNC_RESET_LEN: usize = MAX_WRITE_LEN + 2;

const CMD_WRITE: u8 = 0x01;
const CMD_SET_ADDRESS: u8 = 0x02;
const CMD_SET_MODE: u8 = 0x03;
const CMD_READ_VCOUNTER: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    Disabled = 0,
    Text = 1,
    Graphics = 2,
}

/// Vertical counter value from a 4-byte read reply.
pub fn decode_vcounter(reply: [u8; 4]) -> u16 {
    (reply[1] as u16) << 8 | reply[2] as u16
}

/// Builds a controller command stream in memory.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    bytes: Vec<u8>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero bytes that bring the controller back to command state.
    pub fn sync_reset(&mut self) -> &mut Self {
        self.bytes.resize(self.bytes.len() + SYNC_RESET_LEN, 0x00);
        self
    }

    pub fn set_address(&mut self, address: usize) -> Result<&mut Self> {
        let address = u16::try_from(address).map_err(|_| Error::AddressOutOfRange(address))?;
        self.bytes
            .extend_from_slice(&[CMD_SET_ADDRESS, (address >> 8) as u8, address as u8]);
        Ok(self)
    }

    /// Single write command; payloads over 4095 bytes are rejected.
    pub fn write_data(&mut self, data: &[u8]) -> Result<&mut Self> {
        let len = data.len();
        if len > MAX_WRITE_LEN {
            return Err(Error::DataLength {
                expected: MAX_WRITE_LEN,
                actual: len,
            });
        }
        self.bytes
            .extend_from_slice(&[CMD_WRITE | ((len >> 8) as u8) << 4, (len & 0xFF) as u8]);
        self.bytes.extend_from_slice(data);
        Ok(self)
    }

    /// Write any amount of data as consecutive maximum-size commands.
    pub fn write_data_extended(&mut self, data: &[u8]) -> &mut Self {
        for chunk in data.chunks(MAX_WRITE_LEN) {
            self.push_write(chunk);
        }
        self
    }

    /// Write `count` copies of `value`, 256 bytes per command.
    pub fn write_repeated(&mut self, value: u8, count: usize) -> &mut Self {
        let buffer = [value; REPEAT_CHUNK];
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(REPEAT_CHUNK);
            self.push_write(&buffer[..n]);
            remaining -= n;
        }
        self
    }

    pub fn set_mode(&mut self, mode: DisplayMode) -> &mut Self {
        self.bytes.push(CMD_SET_MODE | (mode as u8) << 4);
        self
    }

    pub fn read_vcounter(&mut self) -> &mut Self {
        self.bytes.extend_from_slice(&[CMD_READ_VCOUNTER, 0x00, 0x00, 0x00]);
        self
    }

    /// Write text at cell (x, y) and paint the same cells with `color`.
    ///
    /// Does nothing when (x, y) lies outside the profile's text grid.
    pub fn print_at(
        &mut self,
        profile: ResolutionProfile,
        x: usize,
        y: usize,
        text: &[u8],
        color: u8,
    ) -> Result<&mut Self> {
        let (cols, rows) = profile.text_grid();
        if x >= cols || y >= rows {
            return Ok(self);
        }
        let address = y * cols + x;
        self.set_address(address)?;
        self.write_data_extended(text);
        self.set_address(address + profile.plane_size())?;
        self.write_repeated(color, text.len());
        Ok(self)
    }

    /// Fill the whole text plane with `character` and the color plane with
    /// `color`. The color plane directly follows the text plane, so one
    /// address command covers both.
    pub fn reset_text_screen(
        &mut self,
        profile: ResolutionProfile,
        color: u8,
        character: u8,
    ) -> Result<&mut Self> {
        let plane = profile.plane_size();
        self.set_address(0)?;
        self.write_repeated(character, plane);
        self.write_repeated(color, plane);
        Ok(self)
    }

    /// Upload a font table at the font region of `profile`.
    pub fn load_font(&mut self, profile: ResolutionProfile, font: &[u8]) -> Result<&mut Self> {
        self.set_address(profile.plane_size() * 2)?;
        self.write_data_extended(font);
        Ok(self)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn push_write(&mut self, chunk: &[u8]) {
        let len = chunk.len();
        self.bytes
            .extend_from_slice(&[CMD_WRITE | ((len >> 8) as u8) << 4, (len & 0xFF) as u8]);
        self.bytes.extend_from_slice(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_address() {
        let mut cmd = CommandBuffer::new();
        cmd.set_address(20160).unwrap();
        assert_eq!(cmd.as_bytes(), &[0x02, 0x4E, 0xC0]);
        assert!(matches!(
            CommandBuffer::new().set_address(70000),
            Err(Error::AddressOutOfRange(70000))
        ));
    }

    #[test]
    fn test_write_header_carries_length_high_nibble() {
        let mut cmd = CommandBuffer::new();
        cmd.write_data(&[0xAA; 0x123]).unwrap();
        assert_eq!(&cmd.as_bytes()[..2], &[0x11, 0x23]);
        assert_eq!(cmd.len(), 2 + 0x123);

        let mut cmd = CommandBuffer::new();
        cmd.write_data(&[1, 2]).unwrap();
        assert_eq!(cmd.as_bytes(), &[0x01, 0x02, 1, 2]);

        assert!(CommandBuffer::new().write_data(&[0; 4096]).is_err());
    }

    #[test]
    fn test_write_extended_splits() {
        let mut cmd = CommandBuffer::new();
        cmd.write_data_extended(&[0x55; 5000]);
        let bytes = cmd.as_bytes();
        assert_eq!(&bytes[..2], &[0xF1, 0xFF]);
        // 5000 - 4095 = 905 = 0x389
        assert_eq!(&bytes[2 + 4095..2 + 4095 + 2], &[0x31, 0x89]);
        assert_eq!(bytes.len(), 5000 + 4);
    }

    #[test]
    fn test_mode_and_vcounter() {
        let mut cmd = CommandBuffer::new();
        cmd.set_mode(DisplayMode::Text).set_mode(DisplayMode::Graphics).read_vcounter();
        assert_eq!(cmd.as_bytes(), &[0x13, 0x23, 0x04, 0x00, 0x00, 0x00]);
        assert_eq!(decode_vcounter([0xFF, 0x02, 0x1C, 0x00]), 540);
    }

    #[test]
    fn test_print_at() {
        let mut cmd = CommandBuffer::new();
        cmd.print_at(ResolutionProfile::R1440x900, 2, 1, b"Hi", 0x0F).unwrap();
        // address 182, text, address 182 + 10080 = 10262, color
        assert_eq!(
            cmd.as_bytes(),
            &[
                0x02, 0x00, 0xB6, 0x01, 0x02, b'H', b'i',
                0x02, 0x28, 0x16, 0x01, 0x02, 0x0F, 0x0F,
            ]
        );
    }

    #[test]
    fn test_print_out_of_bounds_is_noop() {
        let mut cmd = CommandBuffer::new();
        cmd.print_at(ResolutionProfile::R1440x900, 180, 0, b"x", 0x0F).unwrap();
        cmd.print_at(ResolutionProfile::R1440x900, 0, 56, b"x", 0x0F).unwrap();
        assert!(cmd.is_empty());
    }

    #[test]
    fn test_reset_text_screen() {
        let mut cmd = CommandBuffer::new();
        cmd.reset_text_screen(ResolutionProfile::R1440x900, 0x80, b' ').unwrap();
        // 10080 = 39 * 256 + 96, so 40 writes per plane
        let writes_per_plane = 40;
        assert_eq!(cmd.len(), 3 + 2 * (10080 + writes_per_plane * 2));
        assert_eq!(&cmd.as_bytes()[3..6], &[0x11, 0x00, b' ']);
    }

    #[test]
    fn test_sync_and_font_upload() {
        let mut cmd = CommandBuffer::new();
        cmd.sync_reset();
        assert_eq!(cmd.len(), 4097);
        assert!(cmd.as_bytes().iter().all(|&b| b == 0));
        cmd.load_font(ResolutionProfile::R1440x900, &[0; 4096]).unwrap();
        assert_eq!(&cmd.as_bytes()[4097..4100], &[0x02, 0x4E, 0xC0]);
        // 4096 bytes need two writes: 4095 + 1
        assert_eq!(cmd.len(), 4097 + 3 + 4096 + 4);
    }
}
