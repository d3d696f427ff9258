// src/codegen/butterfly.rs

use super::ir::{Atom, ButterflyBlock, Expr, Stmt, Var};
use super::zero::ZeroTracker;
use crate::common::TransformSize;
use crate::tables::TwiddleTable;
use alloc::vec::Vec;
use tracing::trace;

/// How the twiddle of one butterfly is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    /// m = 0, coefficient (1, 0).
    Identity,
    /// m = N/4, coefficient (0, -1).
    MinusI,
    /// m = N/8, coefficient (c, -c).
    EighthTurn,
    /// m = 3N/8, coefficient (-c, -c).
    ThreeEighthsTurn,
    General,
}

impl Rotation {
    pub fn classify(m: usize, size: TransformSize) -> Self {
        let n = size.n();
        if m == 0 {
            Rotation::Identity
        } else if m == n / 4 {
            Rotation::MinusI
        } else if m == n / 8 {
            Rotation::EighthTurn
        } else if m == 3 * (n / 8) {
            Rotation::ThreeEighthsTurn
        } else {
            Rotation::General
        }
    }

    /// Upper bound on primitive calls for this rotation.
    pub fn max_multiplies(self) -> usize {
        match self {
            Rotation::Identity | Rotation::MinusI => 0,
            Rotation::EighthTurn | Rotation::ThreeEighthsTurn => 2,
            Rotation::General => 4,
        }
    }
}

/// What one stage emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageStats {
    pub butterflies: usize,
    pub multiplies: usize,
    /// Imaginary variables declared during this stage.
    pub declarations: usize,
}

/// Emits the butterflies of a stage, skipping every term proven zero.
pub struct ButterflyEmitter<'a> {
    size: TransformSize,
    twiddles: &'a TwiddleTable,
}

impl<'a> ButterflyEmitter<'a> {
    pub fn new(size: TransformSize, twiddles: &'a TwiddleTable) -> Self {
        assert_eq!(
            twiddles.entries(),
            size.half(),
            "twiddle table does not match transform size"
        );
        Self { size, twiddles }
    }

    /// Emits stage `stage` in increasing block start, then offset, order.
    pub fn emit_stage(&self, stage: u32, zeros: &mut ZeroTracker, out: &mut Vec<Stmt>) -> StageStats {
        assert!(
            stage < self.size.log2_n(),
            "stage {} out of {} stages",
            stage,
            self.size.log2_n()
        );
        let n = self.size.n();
        assert_eq!(zeros.slots(), n, "zero tracker does not match transform size");
        let power = 1usize << stage;
        // m = j * N / (2 * power), without forming j * N
        let twiddle_shift = self.size.log2_n() - 1 - stage;
        let mut stats = StageStats::default();

        for k0 in (0..n).step_by(2 * power) {
            for j in 0..power {
                let m = j << twiddle_shift;
                let before = out.len();
                let multiplies = self.emit_butterfly(stage, k0 + j, k0 + j + power, m, zeros, out);
                stats.butterflies += 1;
                stats.multiplies += multiplies;
                // Everything pushed ahead of the block is a declaration
                stats.declarations += out.len() - before - 1;
            }
        }
        stats
    }

    /// Emits one butterfly combining slots `u` and `t` with twiddle `m`.
    ///
    /// Declarations of imaginary components that become live are pushed right
    /// before the block. `zeros` is updated before returning.
    pub fn emit_butterfly(
        &self,
        stage: u32,
        u: usize,
        t: usize,
        m: usize,
        zeros: &mut ZeroTracker,
        out: &mut Vec<Stmt>,
    ) -> usize {
        assert!(u < t && t < self.size.n(), "butterfly slots ({}, {}) out of range", u, t);
        let rotation = Rotation::classify(m, self.size);
        let (re_t, im_t) = self.rotate(rotation, m, t, zeros.is_live(t));

        let has_re_t = re_t.is_some();
        let has_im_t = im_t.is_some();

        let mut body = Vec::new();
        if let Some(expr) = re_t {
            body.push(Stmt::Let { var: Var::ReT, expr });
        }
        if let Some(expr) = im_t {
            body.push(Stmt::Let { var: Var::ImT, expr });
        }

        // u = samples[k + j]
        body.push(Stmt::Let {
            var: Var::ReU,
            expr: Expr::var(Var::Re(u)),
        });
        let im_u_live = zeros.is_live(u);
        if im_u_live {
            body.push(Stmt::Let {
                var: Var::ImU,
                expr: Expr::var(Var::Im(u)),
            });
        }

        // samples[k + j] = u + t, samples[k + j + power] = u - t
        if has_re_t {
            body.push(Stmt::Assign {
                var: Var::Re(u),
                expr: combine(true, Some(Var::ReU), Some(Var::ReT)),
            });
        }
        body.push(Stmt::Assign {
            var: Var::Re(t),
            expr: combine(false, Some(Var::ReU), has_re_t.then_some(Var::ReT)),
        });

        if im_u_live || has_im_t {
            let im_u = im_u_live.then_some(Var::ImU);
            let im_t_var = has_im_t.then_some(Var::ImT);
            if has_im_t {
                body.push(Stmt::Assign {
                    var: Var::Im(u),
                    expr: combine(true, im_u, im_t_var),
                });
            }
            body.push(Stmt::Assign {
                var: Var::Im(t),
                expr: combine(false, im_u, im_t_var),
            });

            if zeros.mark_live(u) {
                out.push(Stmt::Declare { var: Var::Im(u) });
            }
            if zeros.mark_live(t) {
                out.push(Stmt::Declare { var: Var::Im(t) });
            }
        }

        let block = ButterflyBlock {
            stage,
            u,
            t,
            twiddle: m,
            body,
        };
        let multiplies = block.multiply_count();
        debug_assert!(multiplies <= rotation.max_multiplies());
        trace!(stage, u, t, m, ?rotation, multiplies, "butterfly");
        out.push(Stmt::Butterfly(block));
        multiplies
    }

    /// Builds `(re_t, im_t)` for `twiddle(m) * slot t`; `None` marks a component
    /// that is statically zero.
    fn rotate(&self, rotation: Rotation, m: usize, t: usize, im_live: bool) -> (Option<Expr>, Option<Expr>) {
        let re = Atom::Var(Var::Re(t));
        let im = im_live.then_some(Atom::Var(Var::Im(t)));
        let twiddle = self.twiddles.get(m);
        let format = self.twiddles.format();

        match rotation {
            // t * 1
            Rotation::Identity => (Some(Expr::zero().plus(re)), im.map(|im| Expr::zero().plus(im))),
            // t * -i: (re, im) -> (im, -re)
            Rotation::MinusI => (im.map(|im| Expr::zero().plus(im)), Some(Expr::zero().minus(re))),
            // re_t = c * (re + im), im_t = c * (im - re)
            Rotation::EighthTurn => {
                let c = twiddle.cos.magnitude(format);
                let re_arg = with_optional(Expr::zero().plus(re.clone()), false, im.clone());
                let im_arg = match im {
                    Some(im) => Expr::zero().plus(im).minus(re),
                    None => Expr::zero().minus(re),
                };
                (Some(scaled(re_arg, c)), Some(scaled(im_arg, c)))
            }
            // re_t = c * (-re + im), im_t = c * (-im - re)
            Rotation::ThreeEighthsTurn => {
                let c = twiddle.cos.magnitude(format);
                let re_arg = with_optional(Expr::zero().minus(re.clone()), false, im.clone());
                let im_arg = match im {
                    Some(im) => Expr::zero().minus(im).minus(re),
                    None => Expr::zero().minus(re),
                };
                (Some(scaled(re_arg, c)), Some(scaled(im_arg, c)))
            }
            // re_t = cos * re - sin * im, im_t = sin * re + cos * im
            Rotation::General => {
                let (cos, sin) = (twiddle.cos, twiddle.sin);
                let mut re_t = Expr::zero();
                let mut im_t = Expr::zero();
                if !cos.is_zero() {
                    re_t = re_t.signed(cos.is_negative(), mul(re.clone(), cos.magnitude(format)));
                }
                if !sin.is_zero() {
                    if let Some(im) = &im {
                        re_t = re_t.signed(!sin.is_negative(), mul(im.clone(), sin.magnitude(format)));
                    }
                    im_t = im_t.signed(sin.is_negative(), mul(re, sin.magnitude(format)));
                }
                if !cos.is_zero() {
                    if let Some(im) = im {
                        im_t = im_t.signed(cos.is_negative(), mul(im, cos.magnitude(format)));
                    }
                }
                (non_zero(re_t), non_zero(im_t))
            }
        }
    }
}

fn mul(operand: Atom, coefficient: u64) -> Atom {
    Atom::Mul {
        arg: Expr::zero().plus(operand),
        coefficient,
    }
}

fn scaled(arg: Expr, coefficient: u64) -> Expr {
    Expr::zero().plus(Atom::Mul { arg, coefficient })
}

fn with_optional(expr: Expr, negate: bool, atom: Option<Atom>) -> Expr {
    match atom {
        Some(atom) => expr.signed(negate, atom),
        None => expr,
    }
}

fn non_zero(expr: Expr) -> Option<Expr> {
    (!expr.is_zero()).then_some(expr)
}

/// `a + b` or `a - b` with absent operands dropped.
fn combine(add: bool, a: Option<Var>, b: Option<Var>) -> Expr {
    let expr = with_optional(Expr::zero(), false, a.map(Atom::Var));
    with_optional(expr, !add, b.map(Atom::Var))
}

#[cfg(test)]
#[path = "butterfly_tests.rs"]
mod tests;
