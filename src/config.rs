// src/config.rs

use crate::common::{GenError, TransformSize};
use crate::fixed::FixedFormat;
use alloc::format;
use alloc::string::{String, ToString};

pub const DEFAULT_NAME_PREFIX: &str = "approx_fft";
pub const DEFAULT_MUL_FN: &str = "approx_mul_shift16";
pub const DEFAULT_INCLUDE: &str = "approx_mul.h";
pub const DEFAULT_INDENT: usize = 4;

/// Everything that shapes one generated routine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub size: TransformSize,
    pub format: FixedFormat,
    /// The routine is named `{name_prefix}{N}`.
    pub name_prefix: String,
    /// Name of the multiply-and-rescale primitive.
    pub mul_fn: String,
    /// Header declaring the primitive, `None` to emit no include.
    pub include: Option<String>,
    pub indent: usize,
    pub pragma_once: bool,
}

impl GeneratorConfig {
    pub fn new(size: TransformSize) -> Self {
        Self {
            size,
            format: FixedFormat::Q16,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            mul_fn: DEFAULT_MUL_FN.to_string(),
            include: Some(DEFAULT_INCLUDE.to_string()),
            indent: DEFAULT_INDENT,
            pragma_once: false,
        }
    }

    pub fn with_format(mut self, format: FixedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn with_mul_fn(mut self, name: impl Into<String>) -> Self {
        self.mul_fn = name.into();
        self
    }

    pub fn with_include(mut self, include: Option<String>) -> Self {
        self.include = include;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_pragma_once(mut self, pragma_once: bool) -> Self {
        self.pragma_once = pragma_once;
        self
    }

    /// Encodes N so routines of several sizes can be linked together.
    pub fn routine_name(&self) -> String {
        format!("{}{}", self.name_prefix, self.size.n())
    }

    pub fn validate(&self) -> Result<(), GenError> {
        // Re-check in case the fields were set directly
        FixedFormat::new(self.format.word_bits(), self.format.frac_bits())?;
        check_identifier(&self.name_prefix)?;
        check_identifier(&self.mul_fn)?;
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(TransformSize::default())
    }
}

fn check_identifier(name: &str) -> Result<(), GenError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GenError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size64() -> TransformSize {
        TransformSize::from_log2(6).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.routine_name(), "approx_fft64");
        assert_eq!(config.mul_fn, "approx_mul_shift16");
        assert_eq!(config.include.as_deref(), Some("approx_mul.h"));
        assert_eq!(config.format, FixedFormat::Q16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new(size64())
            .with_name_prefix("fft_q15_")
            .with_mul_fn("mul_q15")
            .with_include(None)
            .with_indent(2)
            .with_pragma_once(true);
        assert_eq!(config.routine_name(), "fft_q15_64");
        assert_eq!(config.indent, 2);
        assert!(config.pragma_once);
        assert!(config.include.is_none());
    }

    #[test]
    fn test_rejects_bad_identifiers() {
        let config = GeneratorConfig::new(size64()).with_name_prefix("9fft");
        assert_eq!(
            config.validate(),
            Err(GenError::InvalidIdentifier("9fft".to_string()))
        );
        let config = GeneratorConfig::new(size64()).with_mul_fn("mul-16");
        assert!(config.validate().is_err());
        let config = GeneratorConfig::new(size64()).with_mul_fn("");
        assert!(config.validate().is_err());
    }
}
