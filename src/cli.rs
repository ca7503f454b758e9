//! Command-line surface.
//!
//! Malformed combinations (neither `-i` nor `-n`, both at once, `--alpha`
//! out of range, non-power-of-two `--align`) are rejected here with a
//! usage error before any buffer exists; the kernels never see them.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::kernel::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "fastcase",
    version,
    about = "SIMD ASCII case converter with a scalar reference path",
    group(ArgGroup::new("input").required(true).args(["input_file", "generate"]))
)]
pub struct Cli {
    /// Conversion direction.
    #[arg(long, value_enum, default_value_t = Mode::Upper)]
    pub mode: Mode,

    /// Read the buffer from this file (raw bytes, no framing).
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Generate a random buffer of this many bytes instead.
    #[arg(short = 'n', long = "size", value_name = "COUNT")]
    pub generate: Option<usize>,

    /// Alphabetic density of a generated buffer, in percent.
    #[arg(long, value_name = "PCT", default_value_t = 80,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    pub alpha: u8,

    /// Deterministic generator seed; omitted = OS entropy.
    // `requires` alone still accepts `--seed` next to `-i`.
    #[arg(long, value_name = "SEED", requires = "generate", conflicts_with = "input_file")]
    pub seed: Option<u64>,

    /// Pin the buffer start to this power-of-two alignment.
    #[arg(long, value_name = "BYTES", value_parser = parse_align)]
    pub align: Option<usize>,

    /// Write the converted buffer to this file, bytes as-is.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Worker threads for striped conversion (default: single-threaded).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Force the scalar reference kernel.
    #[arg(long)]
    pub scalar: bool,
}

fn parse_align(s: &str) -> Result<usize, String> {
    let align: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if align.is_power_of_two() {
        Ok(align)
    } else {
        Err(format!("alignment must be a power of two, got {align}"))
    }
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */
