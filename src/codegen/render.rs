//! C rendering of a [`Program`].

use super::ir::{Atom, Expr, Program, Stmt};
use crate::config::GeneratorConfig;
use alloc::string::{String, ToString};
use core::fmt::{self, Write};

impl Program {
    pub fn render(&self, config: &GeneratorConfig) -> String {
        CSource::new(self, config).to_string()
    }
}

/// Displays `program` as a C translation unit.
pub struct CSource<'a> {
    program: &'a Program,
    config: &'a GeneratorConfig,
}

impl<'a> CSource<'a> {
    pub fn new(program: &'a Program, config: &'a GeneratorConfig) -> Self {
        Self { program, config }
    }

    fn write_line(&self, f: &mut fmt::Formatter<'_>, depth: usize, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..depth * self.config.indent {
            f.write_char(' ')?;
        }
        f.write_fmt(args)?;
        f.write_char('\n')
    }

    fn write_stmt(&self, f: &mut fmt::Formatter<'_>, depth: usize, stmt: &Stmt) -> fmt::Result {
        let word = self.program.format.sample_type();
        match stmt {
            Stmt::Let { var, expr } => {
                self.write_line(f, depth, format_args!("{} {} = {};", word, var, self.expr(expr)))
            }
            Stmt::Declare { var } => self.write_line(f, depth, format_args!("{} {};", word, var)),
            Stmt::Assign { var, expr } => {
                self.write_line(f, depth, format_args!("{} = {};", var, self.expr(expr)))
            }
            Stmt::Store { index, expr } => {
                self.write_line(f, depth, format_args!("samples[{}] = {};", index, self.expr(expr)))
            }
            Stmt::Butterfly(block) => {
                self.write_line(f, depth, format_args!("{{"))?;
                for inner in &block.body {
                    self.write_stmt(f, depth + 1, inner)?;
                }
                self.write_line(f, depth, format_args!("}}"))
            }
        }
    }

    fn expr<'e>(&'e self, expr: &'e Expr) -> ExprSource<'e> {
        ExprSource {
            expr,
            mul_fn: &self.config.mul_fn,
        }
    }
}

impl fmt::Display for CSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.config.pragma_once {
            f.write_str("#pragma once\n")?;
        }
        if let Some(include) = &self.config.include {
            writeln!(f, "#include \"{}\"", include)?;
            f.write_char('\n')?;
        }
        writeln!(
            f,
            "void {}({} *samples)",
            self.program.name,
            self.program.format.sample_type()
        )?;
        f.write_str("{\n")?;
        for stmt in &self.program.body {
            self.write_stmt(f, 1, stmt)?;
        }
        f.write_str("}\n")
    }
}

struct ExprSource<'a> {
    expr: &'a Expr,
    mul_fn: &'a str,
}

impl fmt::Display for ExprSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expr.is_zero() {
            return f.write_char('0');
        }
        for (i, term) in self.expr.terms().iter().enumerate() {
            match (i, term.negate) {
                (0, false) => {}
                (0, true) => f.write_char('-')?,
                (_, false) => f.write_str(" + ")?,
                (_, true) => f.write_str(" - ")?,
            }
            match &term.atom {
                Atom::Var(var) => write!(f, "{}", var)?,
                Atom::Sample(index) => write!(f, "samples[{}]", index)?,
                Atom::Mul { arg, coefficient } => {
                    let arg = ExprSource {
                        expr: arg,
                        mul_fn: self.mul_fn,
                    };
                    write!(f, "{}({}, {})", self.mul_fn, arg, coefficient)?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::ir::{ButterflyBlock, Var};
    use crate::common::TransformSize;
    use crate::fixed::FixedFormat;
    use alloc::vec;

    fn render_expr(expr: &Expr) -> String {
        ExprSource {
            expr,
            mul_fn: "approx_mul_shift16",
        }
        .to_string()
    }

    #[test]
    fn test_render_expressions() {
        assert_eq!(render_expr(&Expr::zero()), "0");
        assert_eq!(render_expr(&Expr::var(Var::Re(3))), "re3");
        assert_eq!(render_expr(&Expr::zero().minus(Atom::Var(Var::Re(3)))), "-re3");
        let arg = Expr::var(Var::Re(5)).plus(Atom::Var(Var::Im(5)));
        let expr = Expr::zero()
            .minus(Atom::Mul {
                arg,
                coefficient: 46340,
            })
            .plus(Atom::Var(Var::ImT));
        assert_eq!(render_expr(&expr), "-approx_mul_shift16(re5 + im5, 46340) + im_t");
    }

    #[test]
    fn test_render_program() {
        let size = TransformSize::new(2).unwrap();
        let config = GeneratorConfig::new(size).with_pragma_once(true);
        let program = Program {
            name: config.routine_name(),
            size,
            format: FixedFormat::Q16,
            body: vec![
                Stmt::Let { var: Var::Re(0), expr: Expr::zero().plus(Atom::Sample(0)) },
                Stmt::Declare { var: Var::Im(0) },
                Stmt::Butterfly(ButterflyBlock {
                    stage: 0,
                    u: 0,
                    t: 1,
                    twiddle: 0,
                    body: vec![Stmt::Assign { var: Var::Im(0), expr: Expr::var(Var::Re(0)) }],
                }),
                Stmt::Store { index: 1, expr: Expr::zero() },
            ],
        };
        let expected = "#pragma once\n\
                        #include \"approx_mul.h\"\n\
                        \n\
                        void approx_fft2(int16_t *samples)\n\
                        {\n    \
                        int16_t re0 = samples[0];\n    \
                        int16_t im0;\n    \
                        {\n        \
                        im0 = re0;\n    \
                        }\n    \
                        samples[1] = 0;\n\
                        }\n";
        assert_eq!(CSource::new(&program, &config).to_string(), expected);
        assert_eq!(program.render(&config), expected);
    }
}
