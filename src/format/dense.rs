//! Dense 6-bit index packing.
//!
//! Four 6-bit palette indices pack into three bytes as one continuous
//! big-endian bit stream:
//!
//! ```text
//! i0[5:0] i1[5:4] | i1[3:0] i2[5:2] | i2[1:0] i3[5:0]
//! ```
//!
//! A trailing partial group is zero-padded to four indices before packing.

use crate::error::{Error, Result};

/// Bits per packed index
pub const DENSE_INDEX_BITS: u8 = 6;
/// Indices per packed group
pub const GROUP_INDICES: usize = 4;
/// Bytes per packed group
pub const GROUP_BYTES: usize = 3;

/// Packed byte stream plus the bookkeeping needed for accurate ratio reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensePacked {
    pub bytes: Vec<u8>,
    /// Indices supplied by the caller
    pub real_indices: usize,
    /// Zero indices appended to complete the final group
    pub padding_indices: usize,
}

impl DensePacked {
    /// Real indices per output byte (4/3 for a group-aligned stream).
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes.is_empty() {
            return 0.0;
        }
        self.real_indices as f64 / self.bytes.len() as f64
    }

    /// Percentage saved against sending one byte per index.
    pub fn savings_percent(&self) -> f64 {
        if self.real_indices == 0 {
            return 0.0;
        }
        (1.0 - self.bytes.len() as f64 / self.real_indices as f64) * 100.0
    }
}

/// Number of bytes `count` indices occupy once packed.
#[inline]
pub fn packed_len(count: usize) -> usize {
    (count + GROUP_INDICES - 1) / GROUP_INDICES * GROUP_BYTES
}

#[inline]
fn pack_group(group: [u8; 4]) -> [u8; 3] {
    let [i0, i1, i2, i3] = group.map(|v| v as u32);
    [
        ((i0 << 2 | i1 >> 4) & 0xFF) as u8,
        ((i1 << 4 | i2 >> 2) & 0xFF) as u8,
        ((i2 << 6 | i3) & 0xFF) as u8,
    ]
}

/// Pack indices without range checks.
///
/// Values of 64 or more are not masked: their high bits spill into the
/// neighbouring fields of the same group. Only use this on indices already
/// known to fit in 6 bits, or to reproduce that behavior deliberately.
pub fn pack_dense_unchecked(indices: &[u8]) -> DensePacked {
    let mut bytes = Vec::with_capacity(packed_len(indices.len()));
    let mut chunks = indices.chunks_exact(GROUP_INDICES);
    for chunk in &mut chunks {
        bytes.extend_from_slice(&pack_group([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    let rest = chunks.remainder();
    let mut padding_indices = 0;
    if !rest.is_empty() {
        let mut group = [0u8; GROUP_INDICES];
        group[..rest.len()].copy_from_slice(rest);
        padding_indices = GROUP_INDICES - rest.len();
        bytes.extend_from_slice(&pack_group(group));
    }

    DensePacked {
        bytes,
        real_indices: indices.len(),
        padding_indices,
    }
}

/// Pack indices, rejecting any value that does not fit in 6 bits.
pub fn pack_dense(indices: &[u8]) -> Result<DensePacked> {
    if let Some((position, &value)) = indices
        .iter()
        .enumerate()
        .find(|(_, &v)| v >> DENSE_INDEX_BITS != 0)
    {
        return Err(Error::IndexOutOfRange {
            position,
            value,
            bits: DENSE_INDEX_BITS,
        });
    }
    Ok(pack_dense_unchecked(indices))
}

/// Recover the first `count` indices from a dense stream.
///
/// `bytes` must be a whole number of groups and hold at least `count`
/// indices.
pub fn unpack_dense(bytes: &[u8], count: usize) -> Result<Vec<u8>> {
    if bytes.len() % GROUP_BYTES != 0 || bytes.len() < packed_len(count) {
        return Err(Error::DataLength {
            expected: packed_len(count),
            actual: bytes.len(),
        });
    }
    let mut indices = Vec::with_capacity(bytes.len() / GROUP_BYTES * GROUP_INDICES);
    for group in bytes.chunks_exact(GROUP_BYTES) {
        let (b0, b1, b2) = (group[0], group[1], group[2]);
        indices.push(b0 >> 2);
        indices.push((b0 & 0x03) << 4 | b1 >> 4);
        indices.push((b1 & 0x0F) << 2 | b2 >> 6);
        indices.push(b2 & 0x3F);
    }
    indices.truncate(count);
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_known_group() {
        let packed = pack_dense(&[1, 2, 3, 4]).unwrap();
        assert_eq!(packed.bytes, vec![0x04, 0x20, 0xC4]);
        assert_eq!(packed.real_indices, 4);
        assert_eq!(packed.padding_indices, 0);
        assert_eq!(unpack_dense(&packed.bytes, 4).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_all_ones() {
        let packed = pack_dense(&[63, 63, 63, 63]).unwrap();
        assert_eq!(packed.bytes, vec![0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_partial_group_padding() {
        let packed = pack_dense(&[63, 1]).unwrap();
        // 111111 000001 000000 000000
        assert_eq!(packed.bytes, vec![0xFC, 0x10, 0x00]);
        assert_eq!(packed.padding_indices, 2);
        assert_eq!(unpack_dense(&packed.bytes, 2).unwrap(), vec![63, 1]);
    }

    #[test]
    fn test_empty_input() {
        let packed = pack_dense(&[]).unwrap();
        assert!(packed.bytes.is_empty());
        assert_eq!(packed.compression_ratio(), 0.0);
        assert_eq!(unpack_dense(&[], 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 3);
        assert_eq!(packed_len(4), 3);
        assert_eq!(packed_len(5), 6);
        // 200x150 pixel push
        assert_eq!(packed_len(30000), 22500);
    }

    #[test]
    fn test_ratio_reports() {
        let packed = pack_dense(&[5; 8]).unwrap();
        assert!((packed.compression_ratio() - 8.0 / 6.0).abs() < 1e-12);
        assert!((packed.savings_percent() - 25.0).abs() < 1e-12);

        // Padding shows up in the ratio: 5 real indices take 6 bytes
        let packed = pack_dense(&[5; 5]).unwrap();
        assert_eq!(packed.padding_indices, 3);
        assert!((packed.compression_ratio() - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_strict_rejects_wide_values() {
        match pack_dense(&[0, 1, 64, 2]) {
            Err(Error::IndexOutOfRange { position, value, bits }) => {
                assert_eq!((position, value, bits), (2, 64, 6));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unchecked_spills_into_neighbours() {
        // i0 = 0x40 shifts its seventh bit out of b0; i1 = 0x40 leaks into b0
        let packed = pack_dense_unchecked(&[0x40, 0x40, 0, 0]);
        assert_eq!(packed.bytes, vec![0x04, 0x00, 0x00]);
    }

    #[test]
    fn test_unpack_length_checks() {
        assert!(matches!(
            unpack_dense(&[0, 0], 1),
            Err(Error::DataLength { expected: 3, actual: 2 })
        ));
        assert!(unpack_dense(&[0, 0, 0], 5).is_err());
    }

    #[test]
    fn test_unpack_reverses_pack() {
        let indices: Vec<u8> = (0..61).map(|i| (i * 7 % 64) as u8).collect();
        let packed = pack_dense(&indices).unwrap();
        assert_eq!(unpack_dense(&packed.bytes, indices.len()).unwrap(), indices);
    }
}
