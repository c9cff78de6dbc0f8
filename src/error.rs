//! Error types for the ambient layer (patch container assembly and
//! apply). The delta-construction engine itself (`suffix`, `search`,
//! `diff`) is infallible given in-bounds `usize` inputs and never
//! returns a `Result` — see spec.md §7.

use std::io;
use thiserror::Error;

/// Everything that can go wrong assembling or applying a patch.
#[derive(Debug, Error)]
pub enum BsdiffError {
    #[error("input too large: {0} bytes would overflow a 63-bit signed offset")]
    InputTooLarge(usize),

    #[error("not a BSDIFF40 or BSDF2 patch: bad magic bytes")]
    InvalidMagic,

    #[error("unknown compression algorithm byte: {0}")]
    UnknownAlgorithm(u8),

    #[error("patch data truncated: {0}")]
    Truncated(&'static str),

    #[error("negative length where only non-negative is valid: {0}")]
    NegativeLength(&'static str),

    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<BsdiffError> for io::Error {
    fn from(err: BsdiffError) -> Self {
        match err {
            BsdiffError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

/// `n` must fit in a signed 63-bit offset the way the patch format's
/// sign-magnitude int64 fields expect (spec.md §1 non-goal: "inputs
/// exceeding signed 63-bit byte counts").
pub fn check_size(n: usize) -> Result<(), BsdiffError> {
    const MAX: usize = ((1u64 << 63) - 1) as usize;
    if n > MAX {
        Err(BsdiffError::InputTooLarge(n))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasonable_sizes_pass() {
        assert!(check_size(0).is_ok());
        assert!(check_size(1024 * 1024).is_ok());
    }

    #[test]
    fn converts_to_invalid_data_io_error() {
        let err: io::Error = BsdiffError::InvalidMagic.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
