//! Patch assembly: frames a [`crate::diff::DiffResult`] with the
//! BSDIFF40/BSDF2 header and per-stream compression (spec.md §4.5/§6).
//!
//! Grounded in the teacher crate's `bsdf2_writer.rs`, generalized to
//! take a whole `DiffResult` at once instead of being fed one control
//! entry at a time by a hand-rolled caller loop.

use std::io;

use log::debug;

use crate::compression::{self, CompressionProfile};
use crate::diff::DiffResult;
use crate::error::BsdiffError;
use crate::intcodec::encode_int64;

const BSDIFF_MAGIC: &[u8; 8] = b"BSDIFF40";
const BSDF2_MAGIC: &[u8; 5] = b"BSDF2";

/// Build a complete patch file: 32-byte header followed by the three
/// compressed streams, in control/diff/extra order, concatenated
/// without delimiters (their boundaries are recovered from the header
/// lengths and EOF).
pub fn build_patch(
    result: &DiffResult,
    new_len: usize,
    profile: CompressionProfile,
) -> Result<Vec<u8>, BsdiffError> {
    crate::error::check_size(new_len)?;

    let mut control_bytes = Vec::with_capacity(result.control.len() * 24);
    for entry in &result.control {
        let mut buf = [0u8; 24];
        encode_int64(entry.diff_len, &mut buf[0..8]);
        encode_int64(entry.extra_len, &mut buf[8..16]);
        encode_int64(entry.seek, &mut buf[16..24]);
        control_bytes.extend_from_slice(&buf);
    }

    let ctrl_compressed = compression::compress(profile.control, &control_bytes)?;
    let diff_compressed = compression::compress(profile.diff, &result.diff)?;
    let extra_compressed = compression::compress(profile.extra, &result.extra)?;

    debug!(
        "assembled patch: {} control entries, streams {}/{}/{} bytes compressed",
        result.control.len(),
        ctrl_compressed.len(),
        diff_compressed.len(),
        extra_compressed.len()
    );

    let mut out = Vec::with_capacity(32 + ctrl_compressed.len() + diff_compressed.len() + extra_compressed.len());
    let mut header = [0u8; 32];
    if profile.is_legacy() {
        header[0..8].copy_from_slice(BSDIFF_MAGIC);
    } else {
        header[0..5].copy_from_slice(BSDF2_MAGIC);
        header[5] = profile.control as u8;
        header[6] = profile.diff as u8;
        header[7] = profile.extra as u8;
    }
    encode_int64(ctrl_compressed.len() as i64, &mut header[8..16]);
    encode_int64(diff_compressed.len() as i64, &mut header[16..24]);
    encode_int64(new_len as i64, &mut header[24..32]);

    out.extend_from_slice(&header);
    out.extend_from_slice(&ctrl_compressed);
    out.extend_from_slice(&diff_compressed);
    out.extend_from_slice(&extra_compressed);
    Ok(out)
}

/// Build a patch using the `io::Result`-returning signature ambient
/// call sites (file writers, higher-level APIs) expect.
pub fn build_patch_io(
    result: &DiffResult,
    new_len: usize,
    profile: CompressionProfile,
) -> io::Result<Vec<u8>> {
    build_patch(result, new_len, profile).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff;

    #[test]
    fn header_has_correct_magic_and_sizes() {
        let old = b"hello world";
        let new = b"hello there world";
        let result = diff(old, new);
        let patch = build_patch(&result, new.len(), CompressionProfile::legacy_bsdiff40()).unwrap();

        assert_eq!(&patch[0..8], BSDIFF_MAGIC);
        let new_size = crate::intcodec::decode_int64(patch[24..32].try_into().unwrap());
        assert_eq!(new_size, new.len() as i64);

        let ctrl_len = crate::intcodec::decode_int64(patch[8..16].try_into().unwrap()) as usize;
        let diff_len = crate::intcodec::decode_int64(patch[16..24].try_into().unwrap()) as usize;
        assert!(32 + ctrl_len + diff_len < patch.len(), "extra stream should be non-empty here");
    }

    #[test]
    fn bsdf2_profile_encodes_algorithm_bytes() {
        let old = b"hello world";
        let new = b"hello there world";
        let result = diff(old, new);
        let patch = build_patch(&result, new.len(), CompressionProfile::brotli()).unwrap();
        assert_eq!(&patch[0..5], BSDF2_MAGIC);
        assert_eq!(patch[5], compression::CompressionAlgorithm::Bz2 as u8);
        assert_eq!(patch[6], compression::CompressionAlgorithm::Brotli as u8);
        assert_eq!(patch[7], compression::CompressionAlgorithm::Brotli as u8);
    }
}
