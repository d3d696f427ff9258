//! Multiply-and-rescale primitives the generated routine calls.

use super::types::FixedFormat;

/// A `(sample * coefficient) >> frac_bits` operation as the target implements it.
pub trait MulPrimitive {
    /// `sample` is already a signed word, `coefficient` an unsigned word.
    fn mul_shift(&self, sample: i32, coefficient: u64) -> i32;

    fn supports(&self, format: FixedFormat) -> bool;
}

/// Model of the AVR `approx_mul_shift16` routine.
///
/// The routine accumulates three of the four 8x8 partial products and drops
/// `lo(x) * lo(y)`, so the result is `floor(x * y / 2^16)` minus 0, 1 or 2.
#[inline]
pub fn approx_mul_shift16(x: i16, y: u16) -> i16 {
    let x_hi = (x >> 8) as i8 as i16;
    let x_lo = (x as u16 & 0xff) as i16;
    let y_hi = (y >> 8) as i16;
    let y_lo = (y & 0xff) as i16;

    // mulsu x_hi, y_hi
    let mut ret = x_hi * y_hi;
    // mul x_lo, y_hi: only the high byte is kept
    ret = ret.wrapping_add(((x_lo as u16 * y_hi as u16) >> 8) as i16);
    // mulsu x_hi, y_lo: signed high byte
    ret = ret.wrapping_add((x_hi * y_lo) >> 8);
    ret
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AvrApproxMul;

impl MulPrimitive for AvrApproxMul {
    #[inline]
    fn mul_shift(&self, sample: i32, coefficient: u64) -> i32 {
        approx_mul_shift16(sample as i16, coefficient as u16) as i32
    }

    fn supports(&self, format: FixedFormat) -> bool {
        format == FixedFormat::Q16
    }
}

/// Floor-exact `(x * y) >> frac_bits` for any supported format.
#[derive(Clone, Copy, Debug)]
pub struct ExactMul {
    format: FixedFormat,
}

impl ExactMul {
    pub fn new(format: FixedFormat) -> Self {
        Self { format }
    }
}

impl MulPrimitive for ExactMul {
    #[inline]
    fn mul_shift(&self, sample: i32, coefficient: u64) -> i32 {
        let product = sample as i64 * coefficient as i64;
        self.format.wrap(product >> self.format.frac_bits())
    }

    fn supports(&self, format: FixedFormat) -> bool {
        format == self.format
    }
}
