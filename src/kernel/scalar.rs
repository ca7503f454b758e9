//! Byte-at-a-time reference kernel.
//!
//! Ground truth for every vector backend, and the tail handler for all
//! of them: any trailing `len % width` bytes land here. Output must be
//! byte-identical in both roles.

use crate::kernel::Mode;

/// In-place scalar case conversion. Bytes outside the mode's source
/// range are left untouched; an empty buffer is a no-op.
#[inline]
pub fn convert(buf: &mut [u8], mode: Mode) {
    match mode {
        Mode::Upper => {
            for b in buf.iter_mut() {
                if b.is_ascii_lowercase() {
                    *b -= 0x20;
                }
            }
        }
        Mode::Lower => {
            for b in buf.iter_mut() {
                if b.is_ascii_uppercase() {
                    *b += 0x20;
                }
            }
        }
    }
}

/* ===================================================================== */
/*                               Tests                                   */
/* ===================================================================== */
