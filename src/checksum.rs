//! Order-sensitive FNV-1a checksum.
//!
//! Used to prove that the scalar and vector kernels produced identical
//! output on the same buffer. Deterministic and position-sensitive, but
//! not a cryptographic integrity check.

pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `data`. An empty slice hashes to the offset basis.
#[inline]
pub fn fnv1a64(data: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */
