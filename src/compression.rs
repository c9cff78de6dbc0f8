//! The block-compression codec used for each of the three patch
//! streams is an external collaborator (spec.md §1): the engine never
//! picks one, and this module's only contract is lossless encode/decode
//! of an arbitrary byte sequence per algorithm tag.

use std::io::{self, Read, Write};

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression as BzCompression;

use crate::error::BsdiffError;

/// Per-stream compression choice, stored as one byte in the `BSDF2`
/// magic (or implied `Bz2` for every stream under the classic
/// `BSDIFF40` magic).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    None = 0,
    Bz2 = 1,
    Brotli = 2,
}

impl CompressionAlgorithm {
    pub fn from_u8(value: u8) -> Result<Self, BsdiffError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Bz2),
            2 => Ok(Self::Brotli),
            other => Err(BsdiffError::UnknownAlgorithm(other)),
        }
    }
}

/// One algorithm choice per stream (control, diff, extra).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    pub control: CompressionAlgorithm,
    pub diff: CompressionAlgorithm,
    pub extra: CompressionAlgorithm,
}

impl CompressionProfile {
    /// The classic BSDIFF40 profile: bzip2 for all three streams.
    pub fn legacy_bsdiff40() -> Self {
        Self {
            control: CompressionAlgorithm::Bz2,
            diff: CompressionAlgorithm::Bz2,
            extra: CompressionAlgorithm::Bz2,
        }
    }

    /// Brotli for the bulkier diff/extra streams, bzip2 for the small,
    /// highly structured control stream.
    pub fn brotli() -> Self {
        Self {
            control: CompressionAlgorithm::Bz2,
            diff: CompressionAlgorithm::Brotli,
            extra: CompressionAlgorithm::Brotli,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.control == CompressionAlgorithm::Bz2
            && self.diff == CompressionAlgorithm::Bz2
            && self.extra == CompressionAlgorithm::Bz2
    }
}

pub fn compress(alg: CompressionAlgorithm, data: &[u8]) -> io::Result<Vec<u8>> {
    match alg {
        CompressionAlgorithm::None => Ok(data.to_vec()),
        CompressionAlgorithm::Bz2 => {
            let mut encoder = BzEncoder::new(Vec::new(), BzCompression::best());
            encoder.write_all(data)?;
            encoder.finish()
        }
        CompressionAlgorithm::Brotli => {
            let mut compressed = Vec::new();
            {
                let mut encoder = brotli::CompressorWriter::new(
                    &mut compressed,
                    4096, // buffer size
                    11,   // quality (11 = max)
                    20,   // lg_window_size (matches Android kBrotliDefaultLgwin)
                );
                encoder.write_all(data)?;
                encoder.flush()?;
            }
            Ok(compressed)
        }
    }
}

pub fn decompress(alg: CompressionAlgorithm, data: &[u8]) -> io::Result<Vec<u8>> {
    match alg {
        CompressionAlgorithm::None => Ok(data.to_vec()),
        CompressionAlgorithm::Bz2 => {
            let mut decompressed = Vec::new();
            let mut decoder = BzDecoder::new(data);
            decoder.read_to_end(&mut decompressed)?;
            Ok(decompressed)
        }
        CompressionAlgorithm::Brotli => {
            let mut decompressed = Vec::new();
            let mut decoder = brotli::Decompressor::new(data, 4096);
            decoder.read_to_end(&mut decompressed)?;
            Ok(decompressed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_round_trips() {
        let data = b"the quick brown fox";
        let compressed = compress(CompressionAlgorithm::None, data).unwrap();
        assert_eq!(compressed, data);
        let decompressed = decompress(CompressionAlgorithm::None, &compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn bz2_round_trips() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let compressed = compress(CompressionAlgorithm::Bz2, data).unwrap();
        let decompressed = decompress(CompressionAlgorithm::Bz2, &compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn brotli_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(10);
        let compressed = compress(CompressionAlgorithm::Brotli, &data).unwrap();
        let decompressed = decompress(CompressionAlgorithm::Brotli, &compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn from_u8_rejects_unknown_tags() {
        assert!(CompressionAlgorithm::from_u8(0).is_ok());
        assert!(CompressionAlgorithm::from_u8(1).is_ok());
        assert!(CompressionAlgorithm::from_u8(2).is_ok());
        assert!(CompressionAlgorithm::from_u8(3).is_err());
    }

    #[test]
    fn legacy_profile_detection() {
        assert!(CompressionProfile::legacy_bsdiff40().is_legacy());
        assert!(!CompressionProfile::brotli().is_legacy());
    }
}
