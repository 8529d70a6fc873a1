//! Section decompression
//!
//! LSF sections are compressed independently with the method named in the
//! header's compression-flags byte. Every codec path verifies that it produced
//! exactly the declared uncompressed size.

use crate::error::{Error, Result};
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Compression method stored in the low nibble of the flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    None,
    Zlib,
    Lz4,
    Zstd,
}

impl CompressionMethod {
    /// Parse a method code.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedCompressionMethod`] for codes other than 0-3.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(CompressionMethod::None),
            1 => Ok(CompressionMethod::Zlib),
            2 => Ok(CompressionMethod::Lz4),
            3 => Ok(CompressionMethod::Zstd),
            method => Err(Error::UnsupportedCompressionMethod { method }),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CompressionMethod::None => "none",
            CompressionMethod::Zlib => "zlib",
            CompressionMethod::Lz4 => "lz4",
            CompressionMethod::Zstd => "zstd",
        }
    }
}

/// Raw compression-flags byte: low nibble = method, high nibble = level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionFlags(pub u8);

impl CompressionFlags {
    /// The method code, without validation.
    #[must_use]
    pub fn method_code(self) -> u8 {
        self.0 & 0x0F
    }

    /// # Errors
    /// Returns [`Error::UnsupportedCompressionMethod`] for unknown method codes.
    pub fn method(self) -> Result<CompressionMethod> {
        CompressionMethod::from_code(self.method_code())
    }

    /// Compression level chosen by the writer. Decoding ignores it.
    #[must_use]
    pub fn level(self) -> u8 {
        (self.0 >> 4) & 0x0F
    }
}

/// Decompress one section payload to exactly `expected_size` bytes.
///
/// `chunked` selects LZ4 frame decoding; without it LZ4 data is a single raw
/// block. The other methods ignore it.
///
/// # Errors
/// Returns [`Error::DecompressionSizeMismatch`] when the output length differs
/// from `expected_size`, or [`Error::DecompressionFailed`] when the codec
/// rejects the stream.
pub fn decompress(
    compressed: &[u8],
    method: CompressionMethod,
    expected_size: usize,
    chunked: bool,
    section: &'static str,
) -> Result<Vec<u8>> {
    let decompressed = match method {
        CompressionMethod::None => compressed.to_vec(),
        CompressionMethod::Zlib => decompress_zlib(compressed, expected_size)?,
        CompressionMethod::Lz4 if chunked => decompress_lz4_frame(compressed, expected_size)?,
        CompressionMethod::Lz4 => decompress_lz4_block(compressed, expected_size)?,
        CompressionMethod::Zstd => decompress_zstd(compressed, expected_size)?,
    };

    if decompressed.len() != expected_size {
        return Err(Error::DecompressionSizeMismatch {
            section,
            expected: expected_size,
            actual: decompressed.len(),
        });
    }

    tracing::trace!(
        "{section}: {} -> {} bytes ({})",
        compressed.len(),
        decompressed.len(),
        method.as_str()
    );
    Ok(decompressed)
}

/// Streaming readers stop one byte past the declared size, so an oversized
/// stream shows up as a size mismatch without being inflated in full.
fn read_bounded<R: Read>(reader: R, expected_size: usize, method: &'static str) -> Result<Vec<u8>> {
    let mut decompressed = Vec::with_capacity(expected_size);
    reader
        .take((expected_size as u64).saturating_add(1))
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::DecompressionFailed {
            method,
            message: e.to_string(),
        })?;
    Ok(decompressed)
}

fn decompress_zlib(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    read_bounded(ZlibDecoder::new(compressed), expected_size, "zlib")
}

fn decompress_lz4_frame(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    read_bounded(
        lz4_flex::frame::FrameDecoder::new(compressed),
        expected_size,
        "lz4",
    )
}

fn decompress_lz4_block(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    lz4_flex::block::decompress(compressed, expected_size).map_err(|e| {
        Error::DecompressionFailed {
            method: "lz4",
            message: e.to_string(),
        }
    })
}

fn decompress_zstd(compressed: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let decoder = zstd::Decoder::new(compressed).map_err(|e| Error::DecompressionFailed {
        method: "zstd",
        message: e.to_string(),
    })?;
    read_bounded(decoder, expected_size, "zstd")
}
