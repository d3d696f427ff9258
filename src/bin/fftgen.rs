use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use unrolled_fft_gen::config::{DEFAULT_INCLUDE, DEFAULT_INDENT, DEFAULT_MUL_FN, DEFAULT_NAME_PREFIX};
use unrolled_fft_gen::{FftCodeGenerator, FixedFormat, GenError, GenerationReport, GeneratorConfig, TransformSize};

/// Generates a fully unrolled fixed-point FFT routine in C.
#[derive(Parser, Debug)]
#[command(name = "fftgen", author, version)]
struct Cli {
    /// log2 of the transform size.
    #[arg(short = 'k', long = "log2-n", value_name = "K", default_value_t = 6)]
    log2_n: u32,

    /// Write the routine to this file. Defaults to stdout.
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Routine name prefix; the size is appended.
    #[arg(long, default_value = DEFAULT_NAME_PREFIX)]
    name_prefix: String,

    /// Name of the multiply-and-rescale primitive.
    #[arg(long, default_value = DEFAULT_MUL_FN)]
    mul_fn: String,

    /// Header declaring the primitive. Pass an empty string to emit no include.
    #[arg(long, default_value = DEFAULT_INCLUDE)]
    include: String,

    /// Fractional bits of the twiddle coefficients.
    #[arg(long, default_value_t = 16)]
    frac_bits: u32,

    /// Sample word width in bits (8, 16 or 32).
    #[arg(long, default_value_t = 16)]
    word_bits: u32,

    /// Spaces per indentation level.
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Start the output with `#pragma once`.
    #[arg(long)]
    pragma_once: bool,

    /// Print per-stage statistics to stderr.
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid configuration")]
    Config(#[from] GenError),
    #[error("failed to write output '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] io::Error),
}

fn main() -> ExitCode {
    // Select verbosity with env_var: e.g. `RUST_LOG=unrolled_fft_gen=debug`
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .compact()
        .without_time()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let size = TransformSize::from_log2(cli.log2_n)?;
    let format = FixedFormat::new(cli.word_bits, cli.frac_bits)?;
    let include = (!cli.include.is_empty()).then_some(cli.include);
    let config = GeneratorConfig::new(size)
        .with_format(format)
        .with_name_prefix(cli.name_prefix)
        .with_mul_fn(cli.mul_fn)
        .with_include(include)
        .with_indent(cli.indent)
        .with_pragma_once(cli.pragma_once);

    let generator = FftCodeGenerator::new(config)?;
    let generated = generator.generate();
    let source = generator.render(&generated.program);

    match &cli.output {
        Some(path) => {
            fs::write(path, &source).map_err(|source| CliError::WriteFile {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), bytes = source.len(), "routine written");
        }
        None => io::stdout()
            .lock()
            .write_all(source.as_bytes())
            .map_err(CliError::Stdout)?,
    }

    if cli.stats {
        print_stats(&generated.report);
    }
    Ok(())
}

fn print_stats(report: &GenerationReport) {
    eprintln!("stage  butterflies  multiplies  declarations  live_im");
    for stage in &report.stages {
        eprintln!(
            "{:>5}  {:>11}  {:>10}  {:>12}  {:>7}",
            stage.stage,
            stage.stats.butterflies,
            stage.stats.multiplies,
            stage.stats.declarations,
            stage.live_imaginary
        );
    }
    eprintln!(
        "total multiplies: {}, imaginary declarations: {}",
        report.total_multiplies(),
        report.total_declarations()
    );
}

fn report_error(err: &CliError) {
    eprintln!("error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
