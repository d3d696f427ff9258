// src/fixed/types/fixed.rs
use crate::common::GenError;

/// Word layout shared by the generated routine and its multiply primitive.
///
/// Samples are signed `word_bits` integers. Coefficients are unsigned `word_bits`
/// integers read as `c / 2^frac_bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedFormat {
    word_bits: u32,
    frac_bits: u32,
}

impl FixedFormat {
    /// 16-bit samples, coefficients scaled by 2^16.
    pub const Q16: Self = Self {
        word_bits: 16,
        frac_bits: 16,
    };

    pub fn new(word_bits: u32, frac_bits: u32) -> Result<Self, GenError> {
        let word_ok = matches!(word_bits, 8 | 16 | 32);
        if !word_ok || frac_bits == 0 || frac_bits > word_bits {
            return Err(GenError::UnsupportedFormat {
                word_bits,
                frac_bits,
            });
        }
        Ok(Self {
            word_bits,
            frac_bits,
        })
    }

    #[inline]
    pub fn word_bits(self) -> u32 {
        self.word_bits
    }

    #[inline]
    pub fn frac_bits(self) -> u32 {
        self.frac_bits
    }

    /// The real value of one coefficient unit is `1 / scale()`.
    #[inline]
    pub fn scale(self) -> f64 {
        (1u64 << self.frac_bits) as f64
    }

    /// Largest coefficient magnitude the primitive accepts.
    #[inline]
    pub fn max_coefficient(self) -> u64 {
        (1u64 << self.word_bits) - 1
    }

    /// Two's complement truncation to one signed word.
    #[inline]
    pub fn wrap(self, value: i64) -> i32 {
        let shift = 64 - self.word_bits;
        ((value << shift) >> shift) as i32
    }

    pub fn sample_type(self) -> &'static str {
        match self.word_bits {
            8 => "int8_t",
            16 => "int16_t",
            _ => "int32_t",
        }
    }
}

impl Default for FixedFormat {
    fn default() -> Self {
        Self::Q16
    }
}

/// Raw truncated fixed-point coefficient, wide enough to hold `±2^frac_bits` exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Coefficient(i64);

impl Coefficient {
    #[inline]
    pub const fn from_bits(bits: i64) -> Self {
        Self(bits)
    }

    /// Scales by 2^frac_bits and truncates toward zero.
    pub fn from_f64(value: f64, format: FixedFormat) -> Self {
        Self((value * format.scale()) as i64)
    }

    #[inline]
    pub fn to_bits(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value as handed to the primitive.
    ///
    /// `2^frac_bits` does not fit an unsigned word when `frac_bits == word_bits`;
    /// it saturates to the largest representable word.
    pub fn magnitude(self, format: FixedFormat) -> u64 {
        self.0.unsigned_abs().min(format.max_coefficient())
    }
}
