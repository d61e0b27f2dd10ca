//! Hex memory-image text format.
//!
//! One byte per line, two uppercase hex digits followed by `\n`. This is
//! the form memory-initialisation loaders read, so the output must not be
//! reflowed or lowercased.

use std::io::{self, Write};

use crate::error::{Error, Result};

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// `Write` adaptor that renders every byte written through it as one hex line.
pub struct HexLineWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> HexLineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Bytes rendered so far (not text characters).
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for HexLineWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut text = Vec::with_capacity(buf.len() * 3);
        for &b in buf {
            text.push(HEX_DIGITS[(b >> 4) as usize]);
            text.push(HEX_DIGITS[(b & 0x0F) as usize]);
            text.push(b'\n');
        }
        self.inner.write_all(&text)?;
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Parse a hex dump back into bytes. Blank lines are skipped; every other
/// line must be exactly two hex digits.
pub fn parse_hex_lines(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let well_formed = trimmed.len() == 2 && trimmed.bytes().all(|b| b.is_ascii_hexdigit());
        let value = well_formed
            .then(|| u8::from_str_radix(trimmed, 16).ok())
            .flatten()
            .ok_or_else(|| Error::Parse {
                line: i + 1,
                text: trimmed.to_string(),
            })?;
        bytes.push(value);
    }
    Ok(bytes)
}
