#![allow(clippy::needless_doctest_main)]
#![doc = include_str!("../README.md")]

mod apply;
mod compression;
mod container;
mod diff;
mod error;
mod intcodec;
mod search;
mod suffix;

pub use compression::{CompressionAlgorithm, CompressionProfile};
pub use diff::{diff, ControlEntry, DiffResult};
pub use error::BsdiffError;

use std::io;

/// Compute the delta between `old` and `new` and frame it into a
/// complete BSDIFF40/BSDF2 patch file, compressed per `profile`.
///
/// This composes the pure engine ([`diff`]) with the ambient container
/// layer ([`container`]); the engine itself never picks a compression
/// algorithm (spec.md §1: "out of scope: choice of compression codec").
pub fn create_patch(old: &[u8], new: &[u8], profile: CompressionProfile) -> Result<Vec<u8>, BsdiffError> {
    error::check_size(old.len())?;
    error::check_size(new.len())?;
    let result = diff::diff(old, new);
    container::build_patch(&result, new.len(), profile)
}

/// `io::Result`-returning form of [`create_patch`] for call sites that
/// are already threading `io::Error` (file writers, CLI wrappers).
pub fn create_patch_io(old: &[u8], new: &[u8], profile: CompressionProfile) -> io::Result<Vec<u8>> {
    create_patch(old, new, profile).map_err(Into::into)
}

/// Apply a BSDIFF40 or BSDF2 `patch` to `old`, reconstructing `new`.
pub fn apply_patch(old: &[u8], patch: &[u8]) -> Result<Vec<u8>, BsdiffError> {
    apply::apply(old, patch)
}

/// `io::Result`-returning form of [`apply_patch`].
pub fn apply_patch_io(old: &[u8], patch: &[u8]) -> io::Result<Vec<u8>> {
    apply_patch(old, patch).map_err(Into::into)
}
