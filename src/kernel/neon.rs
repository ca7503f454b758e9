//! aarch64 NEON conversion kernel.
//!
//! NEON compares unsigned bytes natively (`vcgeq_u8` / `vcleq_u8`), so
//! the signed-domain bias the x86 kernels need does not apply here; the
//! range test is expressed directly in unsigned order.

use std::arch::aarch64::*;

use crate::kernel::{Mode, scalar};

/// Bytes per NEON lane.
pub const NEON_WIDTH: usize = 16;

/// NEON kernel: 16 bytes per step, unaligned loads/stores, scalar tail.
///
/// # Safety
/// Requires NEON, which every aarch64 target ships.
#[target_feature(enable = "neon")]
pub unsafe fn convert_neon(buf: &mut [u8], mode: Mode) {
    unsafe {
        let (lo, hi) = mode.source_range();
        let len = buf.len();
        let ptr = buf.as_mut_ptr();

        let vlo = vdupq_n_u8(lo);
        let vhi = vdupq_n_u8(hi);
        let delta = vdupq_n_u8(0x20);

        let mut off = 0;
        while off + NEON_WIDTH <= len {
            let v = vld1q_u8(ptr.add(off));
            let hit = vandq_u8(vcgeq_u8(v, vlo), vcleq_u8(v, vhi));
            let shift = vandq_u8(hit, delta);
            let out = match mode {
                Mode::Upper => vsubq_u8(v, shift),
                Mode::Lower => vaddq_u8(v, shift),
            };
            vst1q_u8(ptr.add(off), out);
            off += NEON_WIDTH;
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

    #[test]
    fn neon_matches_scalar_full_byte_range() {
        let data: Vec<u8> = (0..512).map(|i| (i % 256) as u8).collect();
        for mode in [Mode::Upper, Mode::Lower] {
            let mut buf = data.clone();
            unsafe { convert_neon(&mut buf, mode) };
            let mut reference = data.clone();
            scalar::convert(&mut reference, mode);
            assert_eq!(buf, reference);
        }
    }

    #[test]
    fn lane_and_tail_split() {
        // 17 bytes: one full NEON lane plus a single scalar-tail byte.
        let mut buf = vec![b'A'; 17];
        unsafe { convert_neon(&mut buf, Mode::Lower) };
        assert_eq!(buf, vec![b'a'; 17]);
    }
}
