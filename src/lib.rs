//! fastcase — SIMD-accelerated ASCII case conversion.
//!
//! In-place upper/lower conversion of ASCII letters in a byte buffer,
//! processed in fixed-width lanes with branchless compare-and-select
//! (AVX2, SSE2 or NEON, chosen at runtime) and validated against a
//! scalar reference kernel. An FNV-1a checksum proves the two paths
//! produce byte-identical output; a small harness reports wall-clock
//! time and best-effort resident-memory deltas.

pub mod checksum;
pub mod cli;
pub mod error;
pub mod harness;
pub mod kernel;
pub mod source;

pub use error::{Error, Result};
pub use kernel::{Backend, Mode, convert, convert_parallel, convert_with};
