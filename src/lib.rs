#![no_std]

//! Generator of fully unrolled fixed-point FFT routines in C.
//!
//! For a size N = 2^k the generator emits straight-line code that loads real
//! samples in bit-reversed order, runs the k radix-2 butterfly stages with
//! trivial twiddles and provably zero terms removed, and writes the first N/2
//! complex bins back into the sample buffer.

extern crate alloc;

// Enables the standard library for tests and `std` builds,
// so you can run 'cargo test' on your PC normally.
#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod codegen;
pub mod common;
pub mod config;
pub mod eval;
pub mod fixed;
pub mod reference;
pub mod tables;

pub use codegen::{FftCodeGenerator, Generated, GenerationReport, Program};
pub use common::{GenError, TransformSize};
pub use config::GeneratorConfig;
pub use eval::{EvalError, Interpreter};
pub use fixed::{AvrApproxMul, ExactMul, FixedFormat, MulPrimitive};
