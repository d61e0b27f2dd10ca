/// 8x16 bitmap font table, the font region of a memory image.
///
/// 256 glyphs of 16 rows each; every row byte is 8 pixels with the most
/// significant bit leftmost.

use crate::config::{CHAR_HEIGHT, CHAR_WIDTH, FONT_SIZE};
use crate::error::{Error, Result};

/// Glyphs per row when rendering the whole table
const SHEET_COLUMNS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontTable {
    glyphs: Vec<[u8; CHAR_HEIGHT]>,
}

impl FontTable {
    /// Load a raw font; anything other than exactly 4096 bytes is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != FONT_SIZE {
            return Err(Error::FontSize {
                expected: FONT_SIZE,
                actual: data.len(),
            });
        }
        let glyphs = data
            .chunks_exact(CHAR_HEIGHT)
            .map(|rows| {
                let mut glyph = [0u8; CHAR_HEIGHT];
                glyph.copy_from_slice(rows);
                glyph
            })
            .collect();
        Ok(Self { glyphs })
    }

    /// Rows of glyph `code`.
    #[inline]
    pub fn glyph(&self, code: u8) -> &[u8; CHAR_HEIGHT] {
        &self.glyphs[code as usize]
    }

    /// Draw glyph `code`, one line per row.
    pub fn render_glyph(&self, code: u8, on: char, off: char) -> String {
        let mut out = String::with_capacity(CHAR_HEIGHT * (CHAR_WIDTH + 1));
        for &row in self.glyph(code) {
            push_row(&mut out, row, on, off);
            out.push('\n');
        }
        out
    }

    /// Draw all 256 glyphs as a 16x16 sheet, blank line between glyph rows.
    pub fn render_sheet(&self, on: char, off: char) -> String {
        let mut out = String::new();
        for sheet_row in 0..256 / SHEET_COLUMNS {
            for y in 0..CHAR_HEIGHT {
                for col in 0..SHEET_COLUMNS {
                    let code = (sheet_row * SHEET_COLUMNS + col) as u8;
                    push_row(&mut out, self.glyph(code)[y], on, off);
                    out.push_str("  ");
                }
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Raw table, glyph after glyph.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.glyphs.iter().flatten().copied().collect()
    }
}

fn push_row(out: &mut String, row: u8, on: char, off: char) {
    for bit in (0..CHAR_WIDTH).rev() {
        out.push(if row >> bit & 1 == 1 { on } else { off });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_font() -> FontTable {
        let mut data = vec![0u8; FONT_SIZE];
        // Glyph 'A': a left bar, a right bar, and a full row
        let base = b'A' as usize * CHAR_HEIGHT;
        data[base] = 0x80;
        data[base + 1] = 0x01;
        data[base + 2] = 0xFF;
        FontTable::from_bytes(&data).unwrap()
    }

    #[test]
    fn test_size_check() {
        assert!(matches!(
            FontTable::from_bytes(&[0; 4095]),
            Err(Error::FontSize { expected: 4096, actual: 4095 })
        ));
        assert!(FontTable::from_bytes(&[0; 4097]).is_err());
    }

    #[test]
    fn test_glyph_slice() {
        let font = test_font();
        assert_eq!(font.glyph(b'A')[..3], [0x80, 0x01, 0xFF]);
        assert_eq!(font.glyph(255), &[0; 16]);
    }

    #[test]
    fn test_render_glyph_msb_left() {
        let text = test_font().render_glyph(b'A', '#', '.');
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 16);
        assert_eq!(lines[0], "#.......");
        assert_eq!(lines[1], ".......#");
        assert_eq!(lines[2], "########");
        assert_eq!(lines[3], "........");
    }

    #[test]
    fn test_to_bytes() {
        let mut data = vec![0u8; FONT_SIZE];
        data[FONT_SIZE - 1] = 0x7E;
        data[17] = 0x18;
        assert_eq!(FontTable::from_bytes(&data).unwrap().to_bytes(), data);
    }

    #[test]
    fn test_render_sheet_shape() {
        let sheet = test_font().render_sheet('#', ' ');
        // 16 blocks of 16 rows, each followed by a blank line
        assert_eq!(sheet.lines().count(), 16 * 17);
        let first = sheet.lines().next().unwrap();
        assert_eq!(first.chars().count(), 16 * (8 + 2));
    }
}
