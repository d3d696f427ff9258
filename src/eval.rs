//! Executes a generated [`Program`] on the host.
//!
//! The interpreter follows the routine statement by statement with word-sized
//! two's complement arithmetic, calling a [`MulPrimitive`] wherever the routine
//! calls the multiply primitive. Reading a name that is not declared, or declared
//! but never assigned, is an error rather than a silent zero.

use crate::codegen::ir::{Atom, Expr, Program, Stmt, Var};
use crate::fixed::{FixedFormat, MulPrimitive};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum EvalError {
    #[error("Buffer holds {got} samples, routine expects {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
    #[error("Variable {0} used before its declaration")]
    UndeclaredVariable(Var),
    #[error("Variable {0} read before assignment")]
    Uninitialized(Var),
    #[error("Variable {0} declared twice in one scope")]
    Redeclared(Var),
    #[error("Sample index {0} out of range")]
    SampleOutOfRange(usize),
    #[error("Multiply primitive does not support {word_bits}-bit words with {frac_bits} fractional bits")]
    UnsupportedFormat { word_bits: u32, frac_bits: u32 },
}

type Scope = BTreeMap<Var, Option<i32>>;

pub struct Interpreter<M> {
    primitive: M,
}

impl<M: MulPrimitive> Interpreter<M> {
    pub fn new(primitive: M) -> Self {
        Self { primitive }
    }

    /// Runs the routine in place. Samples are read as signed words of the
    /// program's format; results are written back as such.
    pub fn run(&self, program: &Program, samples: &mut [i32]) -> Result<(), EvalError> {
        let format = program.format;
        if !self.primitive.supports(format) {
            return Err(EvalError::UnsupportedFormat {
                word_bits: format.word_bits(),
                frac_bits: format.frac_bits(),
            });
        }
        let expected = program.size.n();
        if samples.len() != expected {
            return Err(EvalError::BufferSizeMismatch {
                expected,
                got: samples.len(),
            });
        }

        let mut machine = Machine {
            primitive: &self.primitive,
            format,
            samples,
            scopes: alloc::vec![Scope::new()],
        };
        for stmt in &program.body {
            machine.exec(stmt)?;
        }
        Ok(())
    }

    /// Convenience wrapper for 16-bit buffers.
    pub fn run_i16(&self, program: &Program, samples: &mut [i16]) -> Result<(), EvalError> {
        let mut wide: Vec<i32> = samples.iter().map(|&s| s as i32).collect();
        self.run(program, &mut wide)?;
        for (dst, src) in samples.iter_mut().zip(wide) {
            *dst = src as i16;
        }
        Ok(())
    }
}

struct Machine<'a, M> {
    primitive: &'a M,
    format: FixedFormat,
    samples: &'a mut [i32],
    scopes: Vec<Scope>,
}

impl<M: MulPrimitive> Machine<'_, M> {
    fn exec(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        match stmt {
            Stmt::Let { var, expr } => {
                let value = self.eval_word(expr)?;
                self.declare(*var, Some(value))
            }
            Stmt::Declare { var } => self.declare(*var, None),
            Stmt::Assign { var, expr } => {
                let value = self.eval_word(expr)?;
                let slot = self
                    .scopes
                    .iter_mut()
                    .rev()
                    .find_map(|scope| scope.get_mut(var))
                    .ok_or(EvalError::UndeclaredVariable(*var))?;
                *slot = Some(value);
                Ok(())
            }
            Stmt::Butterfly(block) => {
                self.scopes.push(Scope::new());
                let result = block.body.iter().try_for_each(|inner| self.exec(inner));
                self.scopes.pop();
                result
            }
            Stmt::Store { index, expr } => {
                let value = self.eval_word(expr)?;
                let dst = self
                    .samples
                    .get_mut(*index)
                    .ok_or(EvalError::SampleOutOfRange(*index))?;
                *dst = value;
                Ok(())
            }
        }
    }

    fn declare(&mut self, var: Var, value: Option<i32>) -> Result<(), EvalError> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or(EvalError::UndeclaredVariable(var))?;
        if scope.insert(var, value).is_some() {
            return Err(EvalError::Redeclared(var));
        }
        Ok(())
    }

    fn lookup(&self, var: Var) -> Result<i32, EvalError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&var).copied())
            .ok_or(EvalError::UndeclaredVariable(var))?
            .ok_or(EvalError::Uninitialized(var))
    }

    /// Integer sum of the terms, truncated to one word as on assignment.
    fn eval_word(&self, expr: &Expr) -> Result<i32, EvalError> {
        let mut acc = 0i64;
        for term in expr.terms() {
            let value = match &term.atom {
                Atom::Var(var) => self.lookup(*var)? as i64,
                Atom::Sample(index) => {
                    let raw = *self
                        .samples
                        .get(*index)
                        .ok_or(EvalError::SampleOutOfRange(*index))?;
                    self.format.wrap(raw as i64) as i64
                }
                Atom::Mul { arg, coefficient } => {
                    let arg = self.eval_word(arg)?;
                    self.primitive.mul_shift(arg, *coefficient) as i64
                }
            };
            acc = if term.negate { acc - value } else { acc + value };
        }
        Ok(self.format.wrap(acc))
    }
}
