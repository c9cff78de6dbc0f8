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

//! The delta driver: scans `NEW`, greedily extends approximate matches
//! found via [`crate::search`], and emits a sequence of control triples
//! plus the two auxiliary byte buffers (`diff`, the wrapping byte
//! differences of matched runs, and `extra`, the literal bytes between
//! runs).
//!
//! This is pure: it never touches a file, a compressor, or a `Write`
//! sink. [`diff`] takes two byte slices and returns a [`DiffResult`];
//! framing that into an on-disk patch is the job of [`crate::container`].

use crate::suffix;
use log::trace;

/// One decoded control triple, in the order the spec's CTRL stream
/// records them: copy `diff_len` bytes from `old` (mixed with `diff`),
/// then append `extra_len` literal bytes from `extra`, then move the
/// `old` cursor by `seek`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEntry {
    pub diff_len: i64,
    pub extra_len: i64,
    pub seek: i64,
}

/// Output of the delta-construction engine: the control stream plus the
/// two auxiliary byte buffers, uncompressed and unframed.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub control: Vec<ControlEntry>,
    pub diff: Vec<u8>,
    pub extra: Vec<u8>,
}

/// Compute the delta between `old` and `new`.
///
/// Builds a suffix array over `old`, then greedily extends approximate
/// matches as described in spec.md §4.4: for each candidate match,
/// widen a forward extension from the previous anchor and a backward
/// extension from the new one, resolve any overlap by the boundary that
/// maximizes `2*matches - length`, and emit one control triple per
/// accepted run.
pub fn diff(old: &[u8], new: &[u8]) -> DiffResult {
    let sa = suffix::build(old);
    let old_len = old.len();
    let new_len = new.len();

    let mut result = DiffResult {
        control: Vec::new(),
        diff: Vec::with_capacity(new_len),
        extra: Vec::with_capacity(new_len),
    };

    let mut scan: usize = 0;
    let mut len: usize = 0;
    let mut pos: usize = 0;
    let mut lastscan: usize = 0;
    let mut lastpos: usize = 0;
    let mut lastoffset: i64 = 0;

    while scan < new_len {
        let mut oldscore: usize = 0;
        scan += len;
        let mut scsc = scan;

        while scan < new_len {
            let (p, l) = crate::search::search(&sa, old, &new[scan..], 0, old_len);
            pos = p as usize;
            len = l;

            while scsc < scan + len {
                let shifted = scsc as i64 + lastoffset;
                if shifted >= 0 && (shifted as usize) < old_len && old[shifted as usize] == new[scsc] {
                    oldscore += 1;
                }
                scsc += 1;
            }

            if (len == oldscore && len != 0) || len > oldscore + 8 {
                break;
            }

            let shifted = scan as i64 + lastoffset;
            if shifted >= 0 && (shifted as usize) < old_len && old[shifted as usize] == new[scan] {
                oldscore -= 1;
            }
            scan += 1;
        }

        if len != oldscore || scan == new_len {
            // Forward extension from the previous anchor: walk while both
            // cursors stay in bounds, tracking the best 2*matches - length.
            let mut s: i64 = 0;
            let mut best_s: i64 = 0;
            let mut lenf: usize = 0;
            let mut i: usize = 0;
            while lastscan + i < scan && lastpos + i < old_len {
                if old[lastpos + i] == new[lastscan + i] {
                    s += 1;
                }
                i += 1;
                if s * 2 - i as i64 > best_s * 2 - lenf as i64 {
                    best_s = s;
                    lenf = i;
                }
            }

            // Backward extension from the new anchor.
            let mut lenb: usize = 0;
            if scan < new_len {
                let mut s: i64 = 0;
                let mut best_s: i64 = 0;
                let mut i: usize = 1;
                while scan >= lastscan + i && pos >= i {
                    if old[pos - i] == new[scan - i] {
                        s += 1;
                    }
                    if s * 2 - i as i64 > best_s * 2 - lenb as i64 {
                        best_s = s;
                        lenb = i;
                    }
                    i += 1;
                }
            }

            // Resolve any overlap between the two extensions by the split
            // point that maximizes matches within the overlap region.
            if lastscan + lenf > scan - lenb {
                let overlap = (lastscan + lenf) - (scan - lenb);
                let mut s: i64 = 0;
                let mut best_s: i64 = 0;
                let mut lens: usize = 0;
                for i in 0..overlap {
                    if new[lastscan + lenf - overlap + i] == old[lastpos + lenf - overlap + i] {
                        s += 1;
                    }
                    if new[scan - lenb + i] == old[pos - lenb + i] {
                        s -= 1;
                    }
                    if s > best_s {
                        best_s = s;
                        lens = i + 1;
                    }
                }
                lenf = (lenf as i64 + lens as i64 - overlap as i64) as usize;
                lenb -= lens;
            }

            result.diff.extend(
                new[lastscan..lastscan + lenf]
                    .iter()
                    .zip(&old[lastpos..lastpos + lenf])
                    .map(|(n, o)| n.wrapping_sub(*o)),
            );

            let extra_start = lastscan + lenf;
            let extra_len = (scan - lenb) - extra_start;
            result.extra.extend_from_slice(&new[extra_start..extra_start + extra_len]);

            let seek = (pos as i64 - lenb as i64) - (lastpos as i64 + lenf as i64);
            result.control.push(ControlEntry {
                diff_len: lenf as i64,
                extra_len: extra_len as i64,
                seek,
            });
            trace!(
                "control entry: diff_len={} extra_len={} seek={}",
                lenf,
                extra_len,
                seek
            );

            lastscan = scan - lenb;
            lastpos = pos - lenb;
            lastoffset = pos as i64 - scan as i64;
        }
    }

    result
}
