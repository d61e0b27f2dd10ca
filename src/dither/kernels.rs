/// Error diffusion kernel definitions.
///
/// Provides:
/// - `DiffusionTap`: one neighbor offset and its weight
/// - `FLOYD_STEINBERG`: the classic 2-row kernel, left-to-right
/// - `REACH`: how far any tap reaches horizontally, used to size padding

/// One error diffusion target relative to the current pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionTap {
    pub dx: isize,
    pub dy: usize,
    /// Numerator over `DIVISOR`
    pub numerator: u32,
}

impl DiffusionTap {
    #[inline]
    pub fn weight(&self) -> f64 {
        self.numerator as f64 / FLOYD_STEINBERG_DIVISOR as f64
    }
}

pub const FLOYD_STEINBERG_DIVISOR: u32 = 16;

/// FS kernel:   * 7
///            3 5 1
pub const FLOYD_STEINBERG: [DiffusionTap; 4] = [
    DiffusionTap { dx: 1, dy: 0, numerator: 7 },
    DiffusionTap { dx: -1, dy: 1, numerator: 3 },
    DiffusionTap { dx: 0, dy: 1, numerator: 5 },
    DiffusionTap { dx: 1, dy: 1, numerator: 1 },
];

/// Horizontal reach of the Floyd-Steinberg kernel
pub const REACH: usize = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: u32 = FLOYD_STEINBERG.iter().map(|t| t.numerator).sum();
        assert_eq!(total, FLOYD_STEINBERG_DIVISOR);
        let total_f: f64 = FLOYD_STEINBERG.iter().map(|t| t.weight()).sum();
        assert_eq!(total_f, 1.0);
    }

    #[test]
    fn test_taps_only_reach_forward() {
        for tap in FLOYD_STEINBERG.iter() {
            // Raster order: same row must be to the right, otherwise a later row
            assert!(tap.dy > 0 || tap.dx > 0);
            assert!(tap.dx.unsigned_abs() <= REACH);
        }
    }
}
