//! SSE2 / AVX2 conversion kernels.
//!
//! The x86 byte comparison (`cmpgt_epi8`) is signed, while the range
//! test the kernel needs is over unsigned byte order. Both the lane and
//! the range bounds are therefore remapped into the signed domain by
//! XOR with 0x80 before comparing; the remap preserves unsigned order
//! exactly, so `(b > lo-1) AND (hi+1 > b)` is an inclusive unsigned
//! range test. The delta is applied to the *unremapped* lane.

use std::arch::x86_64::*;

use crate::kernel::{Mode, scalar};

/// Bytes per AVX2 lane.
pub const AVX2_WIDTH: usize = 32;
/// Bytes per SSE2 lane.
pub const SSE2_WIDTH: usize = 16;

/// AVX2 kernel: 32 bytes per step, unaligned loads/stores, scalar tail.
///
/// # Safety
/// Caller must verify AVX2 support via `is_x86_feature_detected!("avx2")`.
#[target_feature(enable = "avx2")]
pub unsafe fn convert_avx2(buf: &mut [u8], mode: Mode) {
    unsafe {
        let (lo, hi) = mode.source_range();
        let len = buf.len();
        let ptr = buf.as_mut_ptr();

        let bias = _mm256_set1_epi8(0x80u8 as i8);
        let lo_m1 = _mm256_set1_epi8((lo.wrapping_sub(1) ^ 0x80) as i8);
        let hi_p1 = _mm256_set1_epi8((hi.wrapping_add(1) ^ 0x80) as i8);
        let delta = _mm256_set1_epi8(0x20);

        let mut off = 0;
        while off + AVX2_WIDTH <= len {
            let v = _mm256_loadu_si256(ptr.add(off) as *const __m256i);
            let vb = _mm256_xor_si256(v, bias);
            let ge_lo = _mm256_cmpgt_epi8(vb, lo_m1);
            let le_hi = _mm256_cmpgt_epi8(hi_p1, vb);
            let hit = _mm256_and_si256(ge_lo, le_hi);
            let shift = _mm256_and_si256(hit, delta);
            let out = match mode {
                Mode::Upper => _mm256_sub_epi8(v, shift),
                Mode::Lower => _mm256_add_epi8(v, shift),
            };
            _mm256_storeu_si256(ptr.add(off) as *mut __m256i, out);
            off += AVX2_WIDTH;
        }

        scalar::convert(&mut buf[off..], mode);
    }
}

/// SSE2 kernel: 16 bytes per step. SSE2 is baseline on x86_64, so this
/// is the guaranteed vector path when AVX2 is absent.
///
/// # Safety
/// Requires SSE2, which every x86_64 target ships.
#[target_feature(enable = "sse2")]
pub unsafe fn convert_sse2(buf: &mut [u8], mode: Mode) {
    unsafe {
        let (lo, hi) = mode.source_range();
        let len = buf.len();
        let ptr = buf.as_mut_ptr();

        let bias = _mm_set1_epi8(0x80u8 as i8);
        let lo_m1 = _mm_set1_epi8((lo.wrapping_sub(1) ^ 0x80) as i8);
        let hi_p1 = _mm_set1_epi8((hi.wrapping_add(1) ^ 0x80) as i8);
        let delta = _mm_set1_epi8(0x20);

        let mut off = 0;
        while off + SSE2_WIDTH <= len {
            let v = _mm_loadu_si128(ptr.add(off) as *const __m128i);
            let vb = _mm_xor_si128(v, bias);
            let ge_lo = _mm_cmpgt_epi8(vb, lo_m1);
            let le_hi = _mm_cmpgt_epi8(hi_p1, vb);
            let hit = _mm_and_si128(ge_lo, le_hi);
            let shift = _mm_and_si128(hit, delta);
            let out = match mode {
                Mode::Upper => _mm_sub_epi8(v, shift),
                Mode::Lower => _mm_add_epi8(v, shift),
            };
            _mm_storeu_si128(ptr.add(off) as *mut __m128i, out);
            off += SSE2_WIDTH;
        }

        scalar::convert(&mut buf[off..], mode);
    }
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_copy(data: &[u8], mode: Mode) -> Vec<u8> {
        let mut out = data.to_vec();
        scalar::convert(&mut out, mode);
        out
    }

    #[test]
    fn sse2_matches_scalar_full_byte_range() {
        let data: Vec<u8> = (0..512).map(|i| (i % 256) as u8).collect();
        for mode in [Mode::Upper, Mode::Lower] {
            let mut buf = data.clone();
            unsafe { convert_sse2(&mut buf, mode) };
            assert_eq!(buf, scalar_copy(&data, mode));
        }
    }

    #[test]
    fn avx2_matches_scalar_full_byte_range() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let data: Vec<u8> = (0..512).map(|i| (i % 256) as u8).collect();
        for mode in [Mode::Upper, Mode::Lower] {
            let mut buf = data.clone();
            unsafe { convert_avx2(&mut buf, mode) };
            assert_eq!(buf, scalar_copy(&data, mode));
        }
    }

    #[test]
    fn lane_and_tail_split() {
        // 33 bytes of 'A' crosses the AVX2 lane boundary: 32 vectorized,
        // one byte through the scalar tail.
        let mut buf = vec![b'A'; 33];
        if is_x86_feature_detected!("avx2") {
            unsafe { convert_avx2(&mut buf, Mode::Lower) };
        } else {
            unsafe { convert_sse2(&mut buf, Mode::Lower) };
        }
        assert_eq!(buf, vec![b'a'; 33]);
    }

    #[test]
    fn misaligned_starts() {
        // Kernels must tolerate any buffer alignment.
        let mut padded = vec![0u8; 256];
        for off in 0..SSE2_WIDTH {
            let data: Vec<u8> = (0..100u8).map(|i| b'a' + (i % 26)).collect();
            padded[off..off + data.len()].copy_from_slice(&data);
            unsafe { convert_sse2(&mut padded[off..off + data.len()], Mode::Upper) };
            assert_eq!(padded[off..off + data.len()], scalar_copy(&data, Mode::Upper));
        }
    }
}
