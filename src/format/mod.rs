//! Byte stream formats.
//!
//! This module contains:
//! - `dense`: 6-bit index packing, 4 indices into 3 bytes
//! - `dual_plane`: Separate character and color attribute planes
//! - `hex`: One-byte-per-line hex text used for memory images

pub mod dense;
pub mod dual_plane;
pub mod hex;

// Re-export commonly used types at the format level
pub use dense::{pack_dense, pack_dense_unchecked, packed_len, unpack_dense, DensePacked};
pub use dual_plane::{ColorAttribute, DualPlane};
pub use hex::{parse_hex_lines, HexLineWriter};
