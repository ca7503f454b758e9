//! Timing and memory instrumentation around one conversion call.
//!
//! The memory figure is the OS-reported resident set sampled just
//! before and after the call. Background allocation and paging add
//! noise, so the delta is approximate, never exact.

use std::fmt;
use std::time::{Duration, Instant};

use crate::checksum::fnv1a64;
use crate::kernel::{Backend, Mode};

/// Best-effort resident set size in KB, from `/proc/self/status`.
#[cfg(target_os = "linux")]
pub fn resident_kb() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    line["VmRSS:".len()..]
        .trim()
        .trim_end_matches("kB")
        .trim()
        .parse()
        .ok()
}

/// Resident set sampling is only wired up for Linux procfs.
#[cfg(not(target_os = "linux"))]
pub fn resident_kb() -> Option<u64> {
    None
}

/// One conversion run, measured.
pub struct Report {
    pub mode: Mode,
    pub backend: Backend,
    pub bytes: usize,
    pub elapsed: Duration,
    /// RSS delta in KB; `None` where sampling is unavailable.
    pub mem_delta_kb: Option<i64>,
    pub checksum: u64,
}

/// Runs `kernel` over `buf`, bracketed by RSS and wall-clock samples,
/// then checksums the result.
pub fn measure(
    buf: &mut [u8],
    mode: Mode,
    backend: Backend,
    kernel: impl FnOnce(&mut [u8]),
) -> Report {
    let mem_before = resident_kb();
    let start = Instant::now();
    kernel(buf);
    let elapsed = start.elapsed();
    let mem_after = resident_kb();

    Report {
        mode,
        backend,
        bytes: buf.len(),
        elapsed,
        mem_delta_kb: match (mem_before, mem_after) {
            (Some(before), Some(after)) => Some(after as i64 - before as i64),
            _ => None,
        },
        checksum: fnv1a64(buf),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Results ({}) ===", self.backend.name())?;
        writeln!(f, "Mode: {}", self.mode.label())?;
        writeln!(f, "Size: {} bytes", self.bytes)?;
        writeln!(f, "Time: {:.3} ms", self.elapsed.as_secs_f64() * 1e3)?;
        match self.mem_delta_kb {
            Some(kb) => writeln!(f, "Memory delta (VmRSS): {kb} KB (approximate)")?,
            None => writeln!(f, "Memory delta (VmRSS): unavailable")?,
        }
        writeln!(f, "Checksum: 0x{:x}", self.checksum)
    }
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_converts_and_checksums() {
        let mut buf = b"AbC123".to_vec();
        let report = measure(&mut buf, Mode::Lower, Backend::Scalar, |b| {
            crate::kernel::convert_with(Backend::Scalar, b, Mode::Lower)
        });
        assert_eq!(buf, b"abc123");
        assert_eq!(report.bytes, 6);
        assert_eq!(report.checksum, fnv1a64(b"abc123"));
    }

    #[test]
    fn empty_buffer_checksum_is_offset_basis() {
        let mut buf = Vec::new();
        let report = measure(&mut buf, Mode::Upper, Backend::Scalar, |b| {
            crate::kernel::convert(b, Mode::Upper)
        });
        assert_eq!(report.checksum, crate::checksum::FNV_OFFSET_BASIS);
        assert_eq!(report.bytes, 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn rss_sampling_works_on_linux() {
        assert!(resident_kb().is_some());
    }

    #[test]
    fn report_renders_all_fields() {
        let report = Report {
            mode: Mode::Upper,
            backend: Backend::Scalar,
            bytes: 33,
            elapsed: Duration::from_micros(1500),
            mem_delta_kb: Some(4),
            checksum: 0xdead_beef,
        };
        let text = report.to_string();
        assert!(text.contains("TO_UPPER"));
        assert!(text.contains("33 bytes"));
        assert!(text.contains("1.500 ms"));
        assert!(text.contains("0xdeadbeef"));
    }
}
