//! Unrolled FFT routine generation.

pub mod butterfly;
pub mod ir;
pub mod render;
pub mod zero;

pub use butterfly::{ButterflyEmitter, Rotation, StageStats};
pub use ir::{Atom, ButterflyBlock, Expr, Program, Stmt, Term, Var};
pub use render::CSource;
pub use zero::ZeroTracker;

use crate::common::GenError;
use crate::config::GeneratorConfig;
use crate::tables::{bit_reversal_permutation, TwiddleTable};
use alloc::string::String;
use alloc::vec::Vec;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageReport {
    pub stage: u32,
    pub stats: StageStats,
    /// Slots with a live imaginary component once the stage is done.
    pub live_imaginary: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub stages: Vec<StageReport>,
}

impl GenerationReport {
    pub fn total_multiplies(&self) -> usize {
        self.stages.iter().map(|s| s.stats.multiplies).sum()
    }

    pub fn total_declarations(&self) -> usize {
        self.stages.iter().map(|s| s.stats.declarations).sum()
    }
}

/// A generated routine and the statistics collected while emitting it.
#[derive(Clone, Debug)]
pub struct Generated {
    pub program: Program,
    pub report: GenerationReport,
}

/// Drives bit reversal, twiddle precomputation and the butterfly stages.
pub struct FftCodeGenerator {
    config: GeneratorConfig,
}

impl FftCodeGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Builds the routine: prologue loads, stages `0..k`, epilogue stores.
    pub fn generate(&self) -> Generated {
        let size = self.config.size;
        let n = size.n();
        info!(
            n,
            stages = size.log2_n(),
            word_bits = self.config.format.word_bits(),
            frac_bits = self.config.format.frac_bits(),
            "generating unrolled FFT"
        );

        let mut body = Vec::new();

        // Get samples (bit reversed)
        for (slot, &index) in bit_reversal_permutation(size).iter().enumerate() {
            body.push(Stmt::Let {
                var: Var::Re(slot),
                expr: Expr::zero().plus(Atom::Sample(index)),
            });
        }

        let twiddles = TwiddleTable::new(size, self.config.format);
        let emitter = ButterflyEmitter::new(size, &twiddles);
        let mut zeros = ZeroTracker::new(n);
        let mut report = GenerationReport::default();

        for stage in 0..size.log2_n() {
            let stats = emitter.emit_stage(stage, &mut zeros, &mut body);
            let live_imaginary = zeros.live_count();
            debug!(
                stage,
                butterflies = stats.butterflies,
                multiplies = stats.multiplies,
                declarations = stats.declarations,
                live_imaginary,
                "stage emitted"
            );
            report.stages.push(StageReport {
                stage,
                stats,
                live_imaginary,
            });
        }

        // Only the first N/2 bins: the rest follow by conjugate symmetry
        for slot in 0..size.half() {
            body.push(Stmt::Store {
                index: 2 * slot,
                expr: Expr::var(Var::Re(slot)),
            });
            let imag = if zeros.is_live(slot) {
                Expr::var(Var::Im(slot))
            } else {
                Expr::zero()
            };
            body.push(Stmt::Store {
                index: 2 * slot + 1,
                expr: imag,
            });
        }

        info!(
            multiplies = report.total_multiplies(),
            declarations = report.total_declarations(),
            "generation done"
        );

        Generated {
            program: Program {
                name: self.config.routine_name(),
                size,
                format: self.config.format,
                body,
            },
            report,
        }
    }

    /// Renders a program produced by this generator.
    pub fn render(&self, program: &Program) -> String {
        program.render(&self.config)
    }

    /// Generates and renders in one go.
    pub fn generate_source(&self) -> String {
        let generated = self.generate();
        self.render(&generated.program)
    }
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
