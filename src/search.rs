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

//! Approximate-match search: given a query prefix of `NEW`, binary-search
//! the suffix array for a long (not necessarily the longest) common
//! prefix with some suffix of `OLD`.
//!
//! The bisection only ever compares the first `L = min(old_len, new_len)`
//! bytes of each side at the midpoint, so it is not guaranteed to land on
//! the globally longest match. That is intentional: the delta driver's
//! greedy heuristic is tuned around this exact behavior, and reproducing
//! it bit-for-bit is required for byte-identical patches.

/// Longest common prefix length between two byte slices.
#[inline]
fn matchlen(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Search `sa[st..=en]` for a long common-prefix match against `new`.
///
/// Returns `(pos, len)`: the position in `old` of the matched suffix and
/// the length of the common prefix found there.
pub fn search(sa: &[i64], old: &[u8], new: &[u8], st: usize, en: usize) -> (i64, usize) {
    if en - st < 2 {
        let x = matchlen(&old[sa[st] as usize..], new);
        let y = matchlen(&old[sa[en] as usize..], new);
        if x > y {
            (sa[st], x)
        } else {
            (sa[en], y)
        }
    } else {
        let mid = st + (en - st) / 2;
        let old_suffix = &old[sa[mid] as usize..];
        let check = old_suffix.len().min(new.len());
        if old_suffix[..check] < new[..check] {
            search(sa, old, new, mid, en)
        } else {
            search(sa, old, new, st, mid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix;

    #[test]
    fn exact_match_found() {
        let old = b"the quick brown fox jumps over the lazy dog";
        let sa = suffix::build(old);
        let (pos, len) = search(&sa, old, b"brown fox", 0, old.len());
        assert_eq!(len, "brown fox".len());
        assert_eq!(&old[pos as usize..pos as usize + len], b"brown fox");
    }

    #[test]
    fn no_match_returns_zero_length() {
        let old = b"aaaaaaaaaa";
        let sa = suffix::build(old);
        let (_, len) = search(&sa, old, b"z", 0, old.len());
        assert_eq!(len, 0);
    }

    #[test]
    fn empty_old_has_length_zero_match() {
        let old: &[u8] = b"";
        let sa = suffix::build(old);
        let (pos, len) = search(&sa, old, b"anything", 0, old.len());
        assert_eq!(pos, 0);
        assert_eq!(len, 0);
    }
}
