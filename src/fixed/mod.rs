pub mod types;
pub mod primitive;

pub use primitive::{approx_mul_shift16, AvrApproxMul, ExactMul, MulPrimitive};
pub use types::{Coefficient, FixedFormat, Twiddle};
