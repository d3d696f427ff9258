// src/reference.rs
//
// Double-precision FFT used as ground truth for generated routines, plus
// helpers to read the packed half spectrum a routine leaves in its buffer.

use crate::common::{GenError, TransformSize};
use crate::tables::{bit_reversal_permutation, sin_cos};
use alloc::vec::Vec;
use core::f64::consts::PI;
use num_complex::{Complex, Complex64};

/// `exp(-2πij/N)` for `j` in `[0, N/2)`.
fn precompute_twiddles(n: usize) -> Vec<Complex64> {
    (0..n / 2)
        .map(|j| {
            let angle = -2.0 * PI * (j as f64) / (n as f64);
            let (sin, cos) = sin_cos(angle);
            Complex64::new(cos, sin)
        })
        .collect()
}

/// Radix-2 decimation-in-time FFT, in place.
pub fn fft_in_place(buffer: &mut [Complex64]) -> Result<(), GenError> {
    let size = TransformSize::new(buffer.len())?;
    let n = size.n();
    let twiddles = precompute_twiddles(n);
    let bitrev = bit_reversal_permutation(size);

    for i in 1..(n - 1) {
        let j = bitrev[i];
        if i < j {
            buffer.swap(i, j);
        }
    }

    let mut stride = 1;
    let mut tw_index = n >> 1;

    while stride < n {
        let jmax = n - stride;

        for j in (0..jmax).step_by(stride << 1) {
            for i in 0..stride {
                let w = twiddles[i * tw_index];

                let index = j + i;
                let a = buffer[index];
                let t = buffer[index + stride] * w;

                buffer[index] = a + t;
                buffer[index + stride] = a - t;
            }
        }
        stride <<= 1;
        tw_index >>= 1;
    }
    Ok(())
}

/// Full N-point spectrum of a real signal.
pub fn real_spectrum(samples: &[f64]) -> Result<Vec<Complex64>, GenError> {
    let mut buffer: Vec<Complex64> = samples.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft_in_place(&mut buffer)?;
    Ok(buffer)
}

/// Reads `[re0, im0, re1, im1, ...]` as complex bins.
pub fn unpack_half_spectrum(packed: &[i32]) -> Vec<Complex<i32>> {
    packed
        .chunks_exact(2)
        .map(|pair| Complex::new(pair[0], pair[1]))
        .collect()
}

/// Rebuilds the N-point spectrum of a real signal from its first N/2 bins.
///
/// Bin `N - i` is `conj(bin i)`. The Nyquist bin N/2 is not part of the half
/// spectrum and comes back as `None`.
pub fn mirror_half_spectrum(half: &[Complex<i32>]) -> Vec<Option<Complex64>> {
    let n = 2 * half.len();
    let as_f64 = |c: Complex<i32>| Complex64::new(c.re as f64, c.im as f64);
    (0..n)
        .map(|bin| {
            if bin < half.len() {
                Some(as_f64(half[bin]))
            } else if bin == half.len() {
                None
            } else {
                Some(as_f64(half[n - bin]).conj())
            }
        })
        .collect()
}
