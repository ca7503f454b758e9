//! In-place ASCII case conversion kernels.
//!
//! One semantic transform, three renditions: a scalar reference, wide
//! x86 kernels (SSE2/AVX2) and a NEON kernel, all byte-for-byte
//! interchangeable. The vector kernels process full lanes with a
//! branchless compare-and-select and hand the `len % width` tail to the
//! scalar kernel; nothing ever reads or writes past `len`.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod neon;

/* ===================================================================== */
/*                      Performance thresholds                           */
/* ===================================================================== */

/// Below this size the dispatcher goes straight to the scalar kernel;
/// lane setup costs more than it saves on tiny buffers.
pub const SIMD_THRESHOLD_BYTES: usize = 64;

/// Buffers below this size are never worth fanning out across threads.
pub const PARALLEL_THRESHOLD_BYTES: usize = 1 << 20;

/// Widest lane any backend uses. Parallel chunk sizes are rounded up to
/// a multiple of this so only the final chunk carries a scalar tail.
pub const MAX_LANE_WIDTH: usize = 32;

/* ===================================================================== */
/*                           Conversion mode                             */
/* ===================================================================== */

/// Conversion direction, fixed for one invocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum Mode {
    /// Map ['a','z'] down by 0x20.
    Upper,
    /// Map ['A','Z'] up by 0x20.
    Lower,
}

impl Mode {
    /// Inclusive source range whose members get shifted by ±0x20.
    pub const fn source_range(self) -> (u8, u8) {
        match self {
            Mode::Upper => (b'a', b'z'),
            Mode::Lower => (b'A', b'Z'),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Upper => "TO_UPPER",
            Mode::Lower => "TO_LOWER",
        }
    }
}

/* ===================================================================== */
/*                         Backend selection                             */
/* ===================================================================== */

/// A concrete kernel implementation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Backend {
    Scalar,
    #[cfg(target_arch = "x86_64")]
    Sse2,
    #[cfg(target_arch = "x86_64")]
    Avx2,
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl Backend {
    /// Best vector backend the running CPU supports.
    #[cfg(target_arch = "x86_64")]
    pub fn detect() -> Self {
        if is_x86_feature_detected!("avx2") {
            Backend::Avx2
        } else {
            Backend::Sse2
        }
    }

    #[cfg(target_arch = "aarch64")]
    pub fn detect() -> Self {
        Backend::Neon
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    pub fn detect() -> Self {
        Backend::Scalar
    }

    /// Every backend that can run on this machine, scalar included.
    pub fn available() -> Vec<Self> {
        let mut backends = vec![Backend::Scalar];
        #[cfg(target_arch = "x86_64")]
        {
            backends.push(Backend::Sse2);
            if is_x86_feature_detected!("avx2") {
                backends.push(Backend::Avx2);
            }
        }
        #[cfg(target_arch = "aarch64")]
        backends.push(Backend::Neon);
        backends
    }

    /// Bytes consumed per vectorized step (1 for the scalar kernel).
    pub const fn lane_width(self) -> usize {
        match self {
            Backend::Scalar => 1,
            #[cfg(target_arch = "x86_64")]
            Backend::Sse2 => x86::SSE2_WIDTH,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => x86::AVX2_WIDTH,
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => neon::NEON_WIDTH,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            #[cfg(target_arch = "x86_64")]
            Backend::Sse2 => "sse2",
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => "avx2",
            #[cfg(target_arch = "aarch64")]
            Backend::Neon => "neon",
        }
    }
}

/* ===================================================================== */
/*                            Entry points                               */
/* ===================================================================== */

/// In-place case conversion through the best backend for this CPU.
/// Short buffers skip lane setup and go scalar.
#[inline]
pub fn convert(buf: &mut [u8], mode: Mode) {
    if buf.len() < SIMD_THRESHOLD_BYTES {
        return scalar::convert(buf, mode);
    }
    convert_with(Backend::detect(), buf, mode)
}

/// In-place case conversion through an explicit backend.
///
/// Panics if `backend` is not supported by the running CPU; pick from
/// [`Backend::available`] or [`Backend::detect`] to avoid that.
pub fn convert_with(backend: Backend, buf: &mut [u8], mode: Mode) {
    match backend {
        Backend::Scalar => scalar::convert(buf, mode),
        #[cfg(target_arch = "x86_64")]
        Backend::Sse2 => unsafe { x86::convert_sse2(buf, mode) },
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => {
            assert!(
                is_x86_feature_detected!("avx2"),
                "AVX2 backend selected on a CPU without AVX2"
            );
            unsafe { x86::convert_avx2(buf, mode) }
        }
        #[cfg(target_arch = "aarch64")]
        Backend::Neon => unsafe { neon::convert_neon(buf, mode) },
    }
}

/// Parallel striping: the buffer is split into contiguous chunks whose
/// sizes are multiples of [`MAX_LANE_WIDTH`] (except possibly the last)
/// and converted on the current rayon pool. Each chunk does its own
/// lane/tail accounting, so output is identical to the serial path.
pub fn convert_parallel(buf: &mut [u8], mode: Mode, backend: Backend) {
    use rayon::prelude::*;

    if buf.len() < PARALLEL_THRESHOLD_BYTES {
        return convert_with(backend, buf, mode);
    }

    let threads = rayon::current_num_threads().max(1);
    let per_chunk = (buf.len() / threads)
        .max(MAX_LANE_WIDTH)
        .next_multiple_of(MAX_LANE_WIDTH);

    tracing::debug!(
        backend = backend.name(),
        threads,
        per_chunk,
        "striped conversion"
    );

    buf.par_chunks_mut(per_chunk)
        .for_each(|chunk| convert_with(backend, chunk, mode));
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */
