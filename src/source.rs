//! Buffer sources and the alignment-controlled buffer they fill.
//!
//! A source produces the raw bytes the kernels operate on, either read
//! verbatim from a file or synthesized with a configurable alphabetic
//! density. Buffers are raw bytes end to end: no header, no encoding.

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};

/* ===================================================================== */
/*                            Buffer sources                             */
/* ===================================================================== */

/// Something that can produce a byte buffer to convert.
pub trait BufferSource {
    fn produce(&self) -> Result<Vec<u8>>;

    /// Human-readable provenance for the report header.
    fn describe(&self) -> String;
}

/// Reads an external file fully into memory, bytes as-is.
pub struct FileSource {
    pub path: PathBuf,
}

impl BufferSource for FileSource {
    fn produce(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|source| Error::ReadInput {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Synthesizes a buffer of `len` bytes. Each byte is independently: with
/// probability `alpha/100` an ASCII letter (upper/lower equiprobable),
/// otherwise a uniform printable byte in 32..=126.
pub struct SyntheticSource {
    pub len: usize,
    /// Alphabetic density percentage, 0..=100.
    pub alpha: u8,
    /// Deterministic seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl BufferSource for SyntheticSource {
    fn produce(&self) -> Result<Vec<u8>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let p_alpha = f64::from(self.alpha.min(100)) / 100.0;

        tracing::debug!(
            len = self.len,
            alpha = self.alpha,
            seeded = self.seed.is_some(),
            "generating buffer"
        );

        let mut buf = Vec::with_capacity(self.len);
        for _ in 0..self.len {
            let byte = if rng.gen_bool(p_alpha) {
                if rng.gen_bool(0.5) {
                    rng.gen_range(b'A'..=b'Z')
                } else {
                    rng.gen_range(b'a'..=b'z')
                }
            } else {
                rng.gen_range(32u8..=126)
            };
            buf.push(byte);
        }
        Ok(buf)
    }

    fn describe(&self) -> String {
        format!("synthetic, {}% alphabetic", self.alpha)
    }
}

/// Writes a buffer back out verbatim.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/* ===================================================================== */
/*                     Alignment-controlled buffer                       */
/* ===================================================================== */

/// Owned byte buffer whose starting address can be pinned to a chosen
/// alignment. The kernels never *require* alignment; this exists so
/// benchmarks can reproduce aligned-vs-unaligned layouts.
pub struct Buffer {
    raw: Vec<u8>,
    offset: usize,
    len: usize,
}

impl Buffer {
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        Buffer {
            raw: bytes,
            offset: 0,
            len,
        }
    }

    /// Copies `bytes` into storage whose first byte sits on an `align`
    /// boundary. `align` must be a power of two.
    pub fn aligned(bytes: &[u8], align: usize) -> Self {
        assert!(align.is_power_of_two(), "alignment must be a power of two");
        let mut raw = vec![0u8; bytes.len() + align];
        let offset = raw.as_ptr().align_offset(align);
        raw[offset..offset + bytes.len()].copy_from_slice(bytes);
        Buffer {
            raw,
            offset,
            len: bytes.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.raw[self.offset..self.offset + self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.raw[self.offset..self.offset + self.len]
    }
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seeded_generation_is_reproducible() {
        let source = SyntheticSource {
            len: 4096,
            alpha: 80,
            seed: Some(42),
        };
        assert_eq!(source.produce().unwrap(), source.produce().unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let a = SyntheticSource { len: 4096, alpha: 80, seed: Some(1) };
        let b = SyntheticSource { len: 4096, alpha: 80, seed: Some(2) };
        assert_ne!(a.produce().unwrap(), b.produce().unwrap());
    }

    #[test]
    fn full_density_is_all_letters() {
        // At 100% every byte takes the alphabetic branch. (At 0% letters
        // can still appear: the printable fallback range contains them.)
        let all = SyntheticSource { len: 2048, alpha: 100, seed: Some(7) };
        assert!(all.produce().unwrap().iter().all(|b| b.is_ascii_alphabetic()));
    }

    #[test]
    fn generated_bytes_are_printable_ascii() {
        let source = SyntheticSource { len: 2048, alpha: 50, seed: Some(3) };
        assert!(source.produce().unwrap().iter().all(|&b| (32..=126).contains(&b)));
    }

    #[test]
    fn file_source_reads_raw_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let payload = [0u8, 1, 2, 0xFF, b'A', b'z'];
        file.write_all(&payload).unwrap();
        let source = FileSource {
            path: file.path().to_path_buf(),
        };
        assert_eq!(source.produce().unwrap(), payload);
    }

    #[test]
    fn file_source_missing_path_errors() {
        let source = FileSource {
            path: PathBuf::from("/definitely/not/here.bin"),
        };
        assert!(matches!(source.produce(), Err(Error::ReadInput { .. })));
    }

    #[test]
    fn write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let payload: Vec<u8> = (0u8..=255).collect();
        write_file(&path, &payload).unwrap();
        assert_eq!(fs::read(&path).unwrap(), payload);
    }

    #[test]
    fn aligned_buffer_honors_alignment() {
        for align in [16usize, 32, 64] {
            let data: Vec<u8> = (0..100).map(|i| i as u8).collect();
            let buf = Buffer::aligned(&data, align);
            assert_eq!(buf.as_slice(), &data[..]);
            assert_eq!(buf.as_slice().as_ptr() as usize % align, 0);
        }
    }

    #[test]
    fn empty_buffer() {
        let buf = Buffer::from_vec(Vec::new());
        assert!(buf.is_empty());
        assert_eq!(buf.as_slice(), &[] as &[u8]);
    }
}
