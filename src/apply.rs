//! The inverse of [`crate::container`]: parses a BSDIFF40/BSDF2 patch
//! and replays its control triples against `old` to reconstruct `new`.
//!
//! Grounded in the teacher crate's `bsdf2.rs` (header/stream parsing,
//! decompression dispatch) and `patch.rs` (bounds-checked mix/copy/seek
//! replay), merged into one apply path that handles both magics. The
//! apply path is an external collaborator per spec.md §1 ("out of
//! scope... the inverse apply path"), carried here so the crate's own
//! round-trip tests don't need an external bspatch binary.

use log::debug;

use crate::compression::{self, CompressionAlgorithm};
use crate::error::BsdiffError;
use crate::intcodec::decode_int64;

const BSDIFF_MAGIC: &[u8; 8] = b"BSDIFF40";
const BSDF2_MAGIC: &[u8; 5] = b"BSDF2";

struct ParsedHeader {
    control_alg: CompressionAlgorithm,
    diff_alg: CompressionAlgorithm,
    extra_alg: CompressionAlgorithm,
    control_len: usize,
    diff_len: usize,
    new_size: usize,
}

fn parse_header(patch: &[u8]) -> Result<ParsedHeader, BsdiffError> {
    if patch.len() < 32 {
        return Err(BsdiffError::Truncated("patch shorter than the 32-byte header"));
    }

    let magic = &patch[0..8];
    let (control_alg, diff_alg, extra_alg) = if magic == BSDIFF_MAGIC {
        (CompressionAlgorithm::Bz2, CompressionAlgorithm::Bz2, CompressionAlgorithm::Bz2)
    } else if &magic[0..5] == BSDF2_MAGIC {
        (
            CompressionAlgorithm::from_u8(magic[5])?,
            CompressionAlgorithm::from_u8(magic[6])?,
            CompressionAlgorithm::from_u8(magic[7])?,
        )
    } else {
        return Err(BsdiffError::InvalidMagic);
    };

    let control_len = decode_int64(patch[8..16].try_into().unwrap());
    let diff_len = decode_int64(patch[16..24].try_into().unwrap());
    let new_size = decode_int64(patch[24..32].try_into().unwrap());

    if control_len < 0 || diff_len < 0 || new_size < 0 {
        return Err(BsdiffError::NegativeLength("header declares a negative stream length or new size"));
    }

    let control_len = control_len as usize;
    let diff_len = diff_len as usize;
    let new_size = new_size as usize;

    let streams_end = 32usize
        .checked_add(control_len)
        .and_then(|p| p.checked_add(diff_len))
        .ok_or(BsdiffError::Truncated("control/diff lengths overflow"))?;
    if streams_end > patch.len() {
        return Err(BsdiffError::Truncated("control/diff streams exceed patch bounds"));
    }

    Ok(ParsedHeader { control_alg, diff_alg, extra_alg, control_len, diff_len, new_size })
}

/// Apply `patch` (a BSDIFF40 or BSDF2 container) to `old`, reconstructing
/// the original `new` buffer.
pub fn apply(old: &[u8], patch: &[u8]) -> Result<Vec<u8>, BsdiffError> {
    let header = parse_header(patch)?;

    let control_start = 32;
    let control_end = control_start + header.control_len;
    let diff_end = control_end + header.diff_len;

    let control_data = compression::decompress(header.control_alg, &patch[control_start..control_end])?;
    let diff_data = compression::decompress(header.diff_alg, &patch[control_end..diff_end])?;
    let extra_data = compression::decompress(header.extra_alg, &patch[diff_end..])?;

    if control_data.len() % 24 != 0 {
        return Err(BsdiffError::Truncated("control stream length is not a multiple of 24"));
    }

    // Every output byte comes from either the diff or the extra stream, so
    // `new_size` can never legitimately exceed what's already resident in
    // `diff_data`/`extra_data`. Bounding on that, rather than trusting the
    // header field directly, keeps a crafted `new_size` from driving an
    // unbounded `Vec::with_capacity` before a single control entry is read.
    let available = diff_data
        .len()
        .checked_add(extra_data.len())
        .ok_or(BsdiffError::SizeMismatch("diff/extra stream lengths overflow".into()))?;
    if header.new_size > available {
        return Err(BsdiffError::SizeMismatch(
            "declared new_size exceeds the total available diff+extra bytes".into(),
        ));
    }

    debug!(
        "applying patch: {} control entries, new_size={}",
        control_data.len() / 24,
        header.new_size
    );

    let mut new = Vec::with_capacity(header.new_size);
    let mut oldpos: i64 = 0;
    let mut diff_pos = 0usize;
    let mut extra_pos = 0usize;

    let mut ctrl_idx = 0usize;
    while ctrl_idx < control_data.len() {
        let diff_len = decode_int64(control_data[ctrl_idx..ctrl_idx + 8].try_into().unwrap());
        let extra_len = decode_int64(control_data[ctrl_idx + 8..ctrl_idx + 16].try_into().unwrap());
        let seek = decode_int64(control_data[ctrl_idx + 16..ctrl_idx + 24].try_into().unwrap());
        ctrl_idx += 24;

        if diff_len < 0 || extra_len < 0 {
            return Err(BsdiffError::NegativeLength("control entry has a negative diff_len or extra_len"));
        }
        let diff_len = diff_len as usize;
        let extra_len = extra_len as usize;

        let run_total = diff_len
            .checked_add(extra_len)
            .ok_or(BsdiffError::SizeMismatch("control entry length overflows".into()))?;
        if new.len() + run_total > header.new_size {
            return Err(BsdiffError::SizeMismatch("control entry would exceed declared new_size".into()));
        }

        if diff_len > 0 {
            if diff_pos + diff_len > diff_data.len() {
                return Err(BsdiffError::Truncated("diff stream exhausted before control stream"));
            }
            for i in 0..diff_len {
                let idx = oldpos
                    .checked_add(i as i64)
                    .ok_or(BsdiffError::SizeMismatch("old-file cursor overflows".into()))?;
                if idx < 0 {
                    return Err(BsdiffError::NegativeLength("control entry reads old at a negative offset"));
                }
                let old_byte = old.get(idx as usize).copied().unwrap_or(0);
                new.push(old_byte.wrapping_add(diff_data[diff_pos + i]));
            }
            diff_pos += diff_len;
            oldpos += diff_len as i64;
        }

        if extra_len > 0 {
            if extra_pos + extra_len > extra_data.len() {
                return Err(BsdiffError::Truncated("extra stream exhausted before control stream"));
            }
            new.extend_from_slice(&extra_data[extra_pos..extra_pos + extra_len]);
            extra_pos += extra_len;
        }

        oldpos = oldpos
            .checked_add(seek)
            .ok_or(BsdiffError::SizeMismatch("seek overflows the old-file cursor".into()))?;
    }

    if new.len() != header.new_size {
        return Err(BsdiffError::SizeMismatch(format!(
            "reconstructed {} bytes but header declared {}",
            new.len(),
            header.new_size
        )));
    }
    if diff_pos != diff_data.len() || extra_pos != extra_data.len() {
        return Err(BsdiffError::SizeMismatch("diff or extra stream not fully consumed".into()));
    }

    Ok(new)
}
