//! Statement-level representation of the generated routine.
//!
//! The emitter builds a [`Program`]; rendering to text and interpretation are
//! separate passes over the same statements.

use crate::common::TransformSize;
use crate::fixed::FixedFormat;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A named value of the generated routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    /// Real component of a storage slot.
    Re(usize),
    /// Imaginary component of a storage slot.
    Im(usize),
    /// Rotated lower input of the current butterfly.
    ReT,
    ImT,
    /// Saved upper input of the current butterfly.
    ReU,
    ImU,
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Re(slot) => write!(f, "re{}", slot),
            Var::Im(slot) => write!(f, "im{}", slot),
            Var::ReT => f.write_str("re_t"),
            Var::ImT => f.write_str("im_t"),
            Var::ReU => f.write_str("re_u"),
            Var::ImU => f.write_str("im_u"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Atom {
    Var(Var),
    /// `samples[index]` of the caller's buffer.
    Sample(usize),
    /// One call of the multiply primitive with an unsigned coefficient.
    Mul { arg: Expr, coefficient: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub negate: bool,
    pub atom: Atom,
}

/// A signed sum of atoms. The empty sum is the literal `0`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Expr {
    terms: Vec<Term>,
}

impl Expr {
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn var(var: Var) -> Self {
        Self::zero().plus(Atom::Var(var))
    }

    pub fn plus(mut self, atom: Atom) -> Self {
        self.terms.push(Term {
            negate: false,
            atom,
        });
        self
    }

    pub fn minus(mut self, atom: Atom) -> Self {
        self.terms.push(Term { negate: true, atom });
        self
    }

    /// Adds `atom` with the given sign.
    pub fn signed(self, negate: bool, atom: Atom) -> Self {
        if negate {
            self.minus(atom)
        } else {
            self.plus(atom)
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Primitive calls in this expression, nested calls included.
    pub fn multiply_count(&self) -> usize {
        self.terms
            .iter()
            .map(|term| match &term.atom {
                Atom::Mul { arg, .. } => 1 + arg.multiply_count(),
                _ => 0,
            })
            .sum()
    }

    /// Calls `visit` for every variable read by this expression.
    pub fn for_each_var(&self, visit: &mut impl FnMut(Var)) {
        for term in &self.terms {
            match &term.atom {
                Atom::Var(var) => visit(*var),
                Atom::Sample(_) => {}
                Atom::Mul { arg, .. } => arg.for_each_var(visit),
            }
        }
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::var(var)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// Declaration with initializer.
    Let { var: Var, expr: Expr },
    /// Declaration without initializer, ahead of the block that first assigns it.
    Declare { var: Var },
    Assign { var: Var, expr: Expr },
    /// One butterfly, rendered as its own scope.
    Butterfly(ButterflyBlock),
    /// `samples[index] = expr`
    Store { index: usize, expr: Expr },
}

impl Stmt {
    pub fn multiply_count(&self) -> usize {
        match self {
            Stmt::Let { expr, .. } | Stmt::Assign { expr, .. } | Stmt::Store { expr, .. } => {
                expr.multiply_count()
            }
            Stmt::Declare { .. } => 0,
            Stmt::Butterfly(block) => block.multiply_count(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButterflyBlock {
    pub stage: u32,
    /// Upper slot, `k0 + j`.
    pub u: usize,
    /// Lower slot, `k0 + j + 2^stage`.
    pub t: usize,
    /// Index into the twiddle table.
    pub twiddle: usize,
    pub body: Vec<Stmt>,
}

impl ButterflyBlock {
    pub fn multiply_count(&self) -> usize {
        self.body.iter().map(Stmt::multiply_count).sum()
    }
}

/// The complete unrolled routine for one transform size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub size: TransformSize,
    pub format: FixedFormat,
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn butterflies(&self) -> impl Iterator<Item = &ButterflyBlock> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Butterfly(block) => Some(block),
            _ => None,
        })
    }

    pub fn multiply_count(&self) -> usize {
        self.body.iter().map(Stmt::multiply_count).sum()
    }

    /// Top-level uninitialized declarations, in program order.
    pub fn declarations(&self) -> impl Iterator<Item = Var> + '_ {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Declare { var } => Some(*var),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_var_names() {
        assert_eq!(Var::Re(12).to_string(), "re12");
        assert_eq!(Var::Im(0).to_string(), "im0");
        assert_eq!(Var::ReT.to_string(), "re_t");
        assert_eq!(Var::ImU.to_string(), "im_u");
    }

    #[test]
    fn test_expr_multiply_count() {
        let inner = Expr::var(Var::Re(3)).plus(Atom::Var(Var::Im(3)));
        let expr = Expr::zero()
            .plus(Atom::Mul {
                arg: inner,
                coefficient: 46340,
            })
            .minus(Atom::Mul {
                arg: Expr::var(Var::Im(3)),
                coefficient: 25079,
            });
        assert_eq!(expr.multiply_count(), 2);
        assert!(!expr.is_zero());
        assert!(Expr::zero().is_zero());

        let mut vars = Vec::new();
        expr.for_each_var(&mut |v| vars.push(v));
        assert_eq!(vars, [Var::Re(3), Var::Im(3), Var::Im(3)]);
    }
}
