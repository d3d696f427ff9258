// src/tables.rs

use crate::common::TransformSize;
use crate::fixed::{FixedFormat, Twiddle};
use alloc::vec::Vec;
use core::f64::consts::PI;

/// Reverses the low `bits` bits of `index`.
#[inline]
pub fn bit_reverse(index: usize, bits: u32) -> usize {
    debug_assert!(bits >= 1 && bits <= usize::BITS);
    index.reverse_bits() >> (usize::BITS - bits)
}

/// Fills the bit-reversal table: `table[i]` is the input sample loaded into slot `i`.
pub fn bit_reversal_permutation(size: TransformSize) -> Vec<usize> {
    let n = size.n();
    let mut bitrev = alloc::vec![0; n];
    let mut j = 0;
    for i in 1..n {
        let mut k = n >> 1;
        while j >= k {
            j -= k;
            k >>= 1;
        }
        j += k;
        bitrev[i] = j;
    }
    bitrev
}

/// Agnostic sin/cos helper
pub(crate) fn sin_cos(angle: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    return (angle.sin(), angle.cos());

    #[cfg(not(feature = "std"))]
    return (libm::sin(angle), libm::cos(angle));
}

/// The N/2 truncated rotation factors of one transform size.
///
/// Entry `m` holds `cos(-2πm/N)` and `sin(-2πm/N)` scaled by `2^frac_bits`,
/// computed in `f64` and truncated toward zero.
#[derive(Clone, Debug, PartialEq)]
pub struct TwiddleTable {
    twiddles: Vec<Twiddle>,
    format: FixedFormat,
}

impl TwiddleTable {
    pub fn new(size: TransformSize, format: FixedFormat) -> Self {
        let n = size.n();
        let twiddles = (0..size.half())
            .map(|m| Twiddle::from_angle(-2.0 * (m as f64) * PI / (n as f64), format))
            .collect();
        Self { twiddles, format }
    }

    /// Panics when `m` is outside `[0, N/2)`.
    #[inline]
    pub fn get(&self, m: usize) -> Twiddle {
        assert!(
            m < self.twiddles.len(),
            "twiddle index {} out of table of {} entries",
            m,
            self.twiddles.len()
        );
        self.twiddles[m]
    }

    /// Number of entries, N/2.
    pub fn entries(&self) -> usize {
        self.twiddles.len()
    }

    pub fn format(&self) -> FixedFormat {
        self.format
    }

    pub fn iter(&self) -> impl Iterator<Item = &Twiddle> {
        self.twiddles.iter()
    }
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;
