// src/common.rs

use alloc::string::String;
use thiserror::Error;

/// Largest supported `log2(N)`.
pub const MAX_LOG2_SIZE: u32 = 24;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum GenError {
    #[error("Size must be a power of 2, got {0}")]
    NotPowerOfTwo(usize),
    #[error("Transform needs at least 2 points (log2 size >= 1)")]
    SizeTooSmall,
    #[error("log2 size {0} exceeds the supported maximum of {max}", max = MAX_LOG2_SIZE)]
    SizeTooLarge(u32),
    #[error("Size {n} does not match log2 size {log2_n}")]
    InconsistentSize { n: usize, log2_n: u32 },
    #[error("Unsupported fixed-point format: {word_bits}-bit words with {frac_bits} fractional bits")]
    UnsupportedFormat { word_bits: u32, frac_bits: u32 },
    #[error("'{0}' is not a valid C identifier")]
    InvalidIdentifier(String),
}

/// A transform size N = 2^k, k >= 1.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TransformSize {
    n: usize,
    log2_n: u32,
}

impl TransformSize {
    /// Builds a size from the number of points, deriving `k`.
    pub fn new(n: usize) -> Result<Self, GenError> {
        if !n.is_power_of_two() {
            return Err(GenError::NotPowerOfTwo(n));
        }
        Self::from_log2(n.trailing_zeros())
    }

    /// Builds a size from `k = log2(N)`.
    pub fn from_log2(log2_n: u32) -> Result<Self, GenError> {
        if log2_n == 0 {
            return Err(GenError::SizeTooSmall);
        }
        if log2_n > MAX_LOG2_SIZE {
            return Err(GenError::SizeTooLarge(log2_n));
        }
        Ok(Self { n: 1 << log2_n, log2_n })
    }

    /// Accepts an explicit (N, k) pair and checks it once.
    pub fn checked(n: usize, log2_n: u32) -> Result<Self, GenError> {
        let size = Self::from_log2(log2_n)?;
        if size.n != n {
            return Err(GenError::InconsistentSize { n, log2_n });
        }
        Ok(size)
    }

    #[inline]
    pub fn n(self) -> usize {
        self.n
    }

    /// Number of butterfly stages.
    #[inline]
    pub fn log2_n(self) -> u32 {
        self.log2_n
    }

    /// Number of complex bins written by the generated routine.
    #[inline]
    pub fn half(self) -> usize {
        self.n / 2
    }
}

impl Default for TransformSize {
    /// 64 points.
    fn default() -> Self {
        Self { n: 64, log2_n: 6 }
    }
}
