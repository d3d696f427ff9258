mod fixed;
mod fixed_complex;

pub use fixed::{Coefficient, FixedFormat};
pub use fixed_complex::Twiddle;
