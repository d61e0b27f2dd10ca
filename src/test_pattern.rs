/// Graphics memory test pattern.
///
/// Vertical color bars cycling through a short color list, with optional
/// inverted rows, for checking address decoding and the dense packer on
/// real hardware.

use crate::format::dense::{pack_dense, DensePacked};
use crate::error::Result;

/// Primary ramps: black, then red, green and blue at levels 1-3
pub const PRIMARY_RAMP: [u8; 10] = [0x00, 0x10, 0x20, 0x30, 0x04, 0x08, 0x0C, 0x01, 0x02, 0x03];
/// Graphics memory addresses covered by the default pattern
pub const DEFAULT_ADDRESSES: usize = 32768;
/// Pixels per row of the default pattern
pub const DEFAULT_ROW_WIDTH: usize = 200;

/// Pattern parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternParams {
    pub addresses: usize,
    pub row_width: usize,
    pub colors: Vec<u8>,
    /// Invert the last row of every group of this many rows; None disables
    pub invert_every: Option<usize>,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            addresses: DEFAULT_ADDRESSES,
            row_width: DEFAULT_ROW_WIDTH,
            colors: PRIMARY_RAMP.to_vec(),
            invert_every: None,
        }
    }
}

/// Color code for every address: column `a % row_width` picks
/// `colors[col % colors.len()]`.
pub fn vram_test_pattern(params: &PatternParams) -> Vec<u8> {
    if params.colors.is_empty() || params.row_width == 0 {
        return vec![0; params.addresses];
    }
    (0..params.addresses)
        .map(|address| {
            let row = address / params.row_width;
            let col = address % params.row_width;
            let color = params.colors[col % params.colors.len()];
            match params.invert_every {
                Some(n) if n > 0 && row % n == n - 1 => !color & 0x3F,
                _ => color,
            }
        })
        .collect()
}

/// The pattern dense-packed, ready for a hex memory image.
pub fn packed_test_pattern(params: &PatternParams) -> Result<DensePacked> {
    pack_dense(&vram_test_pattern(params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let pattern = vram_test_pattern(&PatternParams::default());
        assert_eq!(pattern.len(), 32768);
        assert_eq!(&pattern[..10], &PRIMARY_RAMP);
        assert_eq!(pattern[10], 0x00);
        // Column 199 -> 199 % 10 = 9, then row 1 restarts at column 0
        assert_eq!(pattern[199], 0x03);
        assert_eq!(pattern[200], 0x00);
        assert_eq!(pattern[201], 0x10);
    }

    #[test]
    fn test_inverted_rows() {
        let params = PatternParams {
            addresses: 40,
            row_width: 4,
            colors: vec![0x01, 0x30],
            invert_every: Some(10),
        };
        let pattern = vram_test_pattern(&params);
        // Row 9 is addresses 36..40
        assert_eq!(&pattern[32..36], &[0x01, 0x30, 0x01, 0x30]);
        assert_eq!(&pattern[36..40], &[0x3E, 0x0F, 0x3E, 0x0F]);
    }

    #[test]
    fn test_packed_size() {
        let packed = packed_test_pattern(&PatternParams::default()).unwrap();
        assert_eq!(packed.bytes.len(), 24576);
        assert_eq!(packed.padding_indices, 0);
        // First group: 00 10 20 30
        assert_eq!(&packed.bytes[..3], &[0x01, 0x08, 0x30]);
    }

    #[test]
    fn test_degenerate_params() {
        let params = PatternParams {
            addresses: 3,
            row_width: 0,
            colors: vec![],
            invert_every: None,
        };
        assert_eq!(vram_test_pattern(&params), vec![0, 0, 0]);
    }
}
