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

//! Suffix array construction over `OLD`, using the Larsson-Sadakane
//! doubling ("qsufsort") scheme: O(n) bucket-sort bootstrap followed by
//! O(log n) doubling passes, each an O(n) three-way partition.
//!
//! `I` doubles as both the working array and the output: during
//! doubling, negative entries are run-length markers collapsing already
//! distinguishable suffixes, and are never valid positions. By the time
//! [`build`] returns, every entry is a non-negative offset into `old`.

use std::cmp::Ordering;

#[inline(always)]
fn at(i: i64) -> usize {
    debug_assert!(i >= 0);
    i as usize
}

/// Bounds of one as-yet-unsorted run, handed from `split` back to its
/// caller so the outer partition can tail-recurse into the right half
/// instead of growing the call stack by one frame per partition.
struct Pending {
    start: usize,
    len: usize,
}

/// One partitioning pass over `I[start..start+len]`, keyed on
/// `V[I[k] + h]`. Returns the right partition to process next, if any,
/// so [`split`] can iterate instead of recursing on the tail call.
fn split_once(i_arr: &mut [i64], v_arr: &mut [i64], start: usize, len: usize, h: usize) -> Option<Pending> {
    if len < 16 {
        // Insertion-sort variant: for each minimum key found, gather every
        // suffix sharing it into a contiguous run, then mark singletons.
        let mut k = start;
        while k < start + len {
            let mut j = 1;
            let mut x = v_arr[at(i_arr[k] + h as i64)];
            let mut i = 1;
            while k + i < start + len {
                let v = v_arr[at(i_arr[k + i] + h as i64)];
                if v < x {
                    x = v;
                    j = 0;
                }
                if v == x {
                    i_arr.swap(k + j, k + i);
                    j += 1;
                }
                i += 1;
            }
            let kj = (k + j) as i64;
            for &entry in &i_arr[k..k + j] {
                v_arr[at(entry)] = kj - 1;
            }
            if j == 1 {
                i_arr[k] = -1;
            }
            k += j;
        }
        None
    } else {
        // Median-of-position pivot, then a Dutch-flag three-way partition.
        let pivot = v_arr[at(i_arr[start + len / 2] + h as i64)];

        let mut jj = 0usize;
        let mut kk = 0usize;
        for &entry in &i_arr[start..start + len] {
            let v = v_arr[at(entry + h as i64)];
            if v < pivot {
                jj += 1;
            }
            if v == pivot {
                kk += 1;
            }
        }
        let jj = jj + start;
        let kk = kk + jj;

        let mut j = 0;
        let mut k = 0;
        let mut i = start;
        while i < jj {
            match v_arr[at(i_arr[i] + h as i64)].cmp(&pivot) {
                Ordering::Less => i += 1,
                Ordering::Equal => {
                    i_arr.swap(i, jj + j);
                    j += 1;
                }
                Ordering::Greater => {
                    i_arr.swap(i, kk + k);
                    k += 1;
                }
            }
        }

        while jj + j < kk {
            if v_arr[at(i_arr[jj + j] + h as i64)] == pivot {
                j += 1;
            } else {
                i_arr.swap(jj + j, kk + k);
                k += 1;
            }
        }

        if jj > start {
            split(i_arr, v_arr, start, jj - start, h);
        }

        let kk_minus_1 = (kk - 1) as i64;
        for &entry in &i_arr[jj..kk] {
            v_arr[at(entry)] = kk_minus_1;
        }
        if jj == kk - 1 {
            i_arr[jj] = -1;
        }

        if start + len > kk {
            Some(Pending { start: kk, len: start + len - kk })
        } else {
            None
        }
    }
}

fn split(i_arr: &mut [i64], v_arr: &mut [i64], start: usize, len: usize, h: usize) {
    let mut pending = Some(Pending { start, len });
    while let Some(p) = pending {
        pending = split_once(i_arr, v_arr, p.start, p.len, h);
    }
}

/// Build the suffix array of `old`: a permutation `I[0..=n]` of
/// `{0, ..., n}` such that `old[I[k]..]` is lexicographically
/// non-decreasing in `k` (the empty suffix, represented by `n`, sorts
/// first). `V`, the doubling scratch array, is freed before returning.
pub fn build(old: &[u8]) -> Vec<i64> {
    let n = old.len();
    let mut i_arr = vec![0i64; n + 1];
    let mut v_arr = vec![0i64; n + 1];

    // Stage 1: bucket-sort by first byte.
    let mut buckets = [0i64; 256];
    for &b in old {
        buckets[b as usize] += 1;
    }
    for i in 1..256 {
        buckets[i] += buckets[i - 1];
    }
    for i in (1..256).rev() {
        buckets[i] = buckets[i - 1];
    }
    buckets[0] = 0;

    for (i, &b) in old.iter().enumerate() {
        buckets[b as usize] += 1;
        i_arr[at(buckets[b as usize])] = i as i64;
    }
    i_arr[0] = n as i64;

    for (i, &b) in old.iter().enumerate() {
        v_arr[i] = buckets[b as usize];
    }
    v_arr[n] = 0;

    for i in 1..256 {
        if buckets[i] == buckets[i - 1] + 1 {
            i_arr[at(buckets[i])] = -1;
        }
    }
    i_arr[0] = -1;

    // Stage 2: doubling. Each pass distinguishes suffixes that agreed on
    // their first `h` bytes using their rank `h` bytes further in.
    let mut h: i64 = 1;
    while i_arr[0] != -(n as i64 + 1) {
        let mut len: i64 = 0;
        let mut i: i64 = 0;
        while i < n as i64 + 1 {
            if i_arr[at(i)] < 0 {
                len -= i_arr[at(i)];
                i -= i_arr[at(i)];
            } else {
                if len != 0 {
                    i_arr[at(i - len)] = -len;
                }
                len = v_arr[at(i_arr[at(i)])] + 1 - i;
                split(&mut i_arr, &mut v_arr, at(i), at(len), h as usize);
                i += len;
                len = 0;
            }
        }
        if len != 0 {
            i_arr[at(i - len)] = -len;
        }
        h += h;
    }

    // Stage 3: finalize — replace I by the inverse of V.
    for i in 0..=n as i64 {
        i_arr[at(v_arr[at(i)])] = i;
    }

    i_arr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffix_order_is_lexicographic(old: &[u8], sa: &[i64]) {
        assert_eq!(sa.len(), old.len() + 1);

        let mut seen = vec![false; old.len() + 1];
        for &p in sa {
            let idx = p as usize;
            assert!(!seen[idx], "suffix array is not a permutation");
            seen[idx] = true;
        }

        for w in sa.windows(2) {
            let a = &old[w[0] as usize..];
            let b = &old[w[1] as usize..];
            assert!(a <= b, "suffix array order violated: {:?} > {:?}", a, b);
        }
    }

    #[test]
    fn empty_input() {
        let sa = build(b"");
        assert_eq!(sa, vec![0]);
    }

    #[test]
    fn single_byte() {
        let sa = build(b"a");
        suffix_order_is_lexicographic(b"a", &sa);
    }

    #[test]
    fn all_same_byte() {
        let data = vec![b'a'; 64];
        let sa = build(&data);
        suffix_order_is_lexicographic(&data, &sa);
    }

    #[test]
    fn mixed_text() {
        let data = b"abracadabra".to_vec();
        let sa = build(&data);
        suffix_order_is_lexicographic(&data, &sa);
        // "a" is the most common starting byte; its suffixes lead the
        // non-empty block directly after the sentinel.
        assert_eq!(data[sa[1] as usize], b'a');
    }

    #[test]
    fn forces_three_way_partition_path() {
        // len >= 16 so split_once takes the pivot/partition branch at least once.
        let data: Vec<u8> = (0u8..200).map(|i| (i % 5) as u8).collect();
        let sa = build(&data);
        suffix_order_is_lexicographic(&data, &sa);
    }

    #[test]
    fn pseudo_random_bytes() {
        // Deterministic xorshift so the test has no external rand dependency.
        let mut state: u32 = 0x1234_5678;
        let data: Vec<u8> = (0..1000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 0xff) as u8
            })
            .collect();
        let sa = build(&data);
        suffix_order_is_lexicographic(&data, &sa);
    }
}
