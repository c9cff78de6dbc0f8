/*-
 * Copyright 2003-2005 Colin Percival
 * Copyright 2012 Matthew Endsley
 * Modified 2017 Pieter-Jan Briers
 * Modified 2025 - Performance optimizations
 * All rights reserved
 *
 * Redistribution and use in source and binary forms, with or without
 * modification, are permitted providing that the following conditions
 * are met:
 * 1. Redistributions of source code must retain the above copyright
 *    notice, this list of conditions and the following disclaimer.
 * 2. Redistributions in binary form must reproduce the above copyright
 *    notice, this list of conditions and the following disclaimer in the
 *    documentation and/or other materials provided with the distribution.
 *
 * THIS SOFTWARE IS PROVIDED BY THE AUTHOR ``AS IS'' AND ANY EXPRESS OR
 * IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED
 * WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
 * ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
 * DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
 * OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
 * HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
 * STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING
 * IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
 * POSSIBILITY OF SUCH DAMAGE.
 */

//! Sign-magnitude little-endian encoding for the signed 64-bit integers
//! that appear in every header and control field of a bsdiff patch.
//!
//! This is *not* two's complement: the high bit of the last byte is a
//! sign flag over an 8-byte little-endian magnitude. `-0` is representable
//! (`0x00..0x80`) but never produced by [`encode_int64`], which always
//! emits all-zero bytes for zero.

/// Encode `x` into `buf` (which must be exactly 8 bytes) as sign-magnitude
/// little-endian, matching the classic bspatch/bsdiff wire format.
#[inline]
pub fn encode_int64(x: i64, buf: &mut [u8]) {
    debug_assert_eq!(buf.len(), 8);
    if x >= 0 {
        buf.copy_from_slice(&x.to_le_bytes());
    } else {
        let magnitude = (x.unsigned_abs()) | (1u64 << 63);
        buf.copy_from_slice(&magnitude.to_le_bytes());
    }
}

/// Decode 8 sign-magnitude little-endian bytes back into a signed 64-bit
/// integer. Inverse of [`encode_int64`].
#[inline]
pub fn decode_int64(buf: [u8; 8]) -> i64 {
    let y = i64::from_le_bytes(buf);
    if y & i64::MIN == 0 {
        y
    } else {
        -(y & !i64::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_round_trips_as_all_zero_bytes() {
        let mut buf = [0u8; 8];
        encode_int64(0, &mut buf);
        assert_eq!(buf, [0u8; 8]);
        assert_eq!(decode_int64(buf), 0);
    }

    #[test]
    fn positive_value() {
        let mut buf = [0u8; 8];
        encode_int64(42, &mut buf);
        assert_eq!(buf, [42, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode_int64(buf), 42);
    }

    #[test]
    fn negative_value_sets_sign_bit() {
        let mut buf = [0u8; 8];
        encode_int64(-42, &mut buf);
        assert_eq!(buf, [42, 0, 0, 0, 0, 0, 0, 0x80]);
        assert_eq!(decode_int64(buf), -42);
    }

    #[test]
    fn extremes_round_trip() {
        for &x in &[i64::MAX, i64::MIN + 1, -1, 1, i64::MIN + 2] {
            let mut buf = [0u8; 8];
            encode_int64(x, &mut buf);
            assert_eq!(decode_int64(buf), x);
        }
    }

    #[test]
    fn exhaustive_small_range_round_trips() {
        for x in -1000i64..=1000 {
            let mut buf = [0u8; 8];
            encode_int64(x, &mut buf);
            assert_eq!(decode_int64(buf), x);
        }
    }
}
