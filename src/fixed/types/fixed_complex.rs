use super::fixed::{Coefficient, FixedFormat};

/// One twiddle factor `(cos(-2πm/N), sin(-2πm/N))` in truncated fixed point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Twiddle {
    pub cos: Coefficient,
    pub sin: Coefficient,
}

impl Twiddle {
    pub fn new(cos: Coefficient, sin: Coefficient) -> Self {
        Self { cos, sin }
    }

    /// Builds the twiddle for `angle` radians.
    pub fn from_angle(angle: f64, format: FixedFormat) -> Self {
        let (sin, cos) = crate::tables::sin_cos(angle);
        Self {
            cos: Coefficient::from_f64(cos, format),
            sin: Coefficient::from_f64(sin, format),
        }
    }
}
