//! Error types for `Lsf2Lsx`

use thiserror::Error;

/// The error type for LSF decoding and LSX conversion.
///
/// Every variant is terminal for the conversion that raised it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== LSF Header Errors ====================
    /// The file does not start with the LSOF signature.
    #[error("invalid LSF signature: expected {expected:08X}, got {actual:08X}")]
    MalformedMagic {
        /// The signature this reader accepts.
        expected: u32,
        /// The signature found in the file.
        actual: u32,
    },

    /// The LSF version is outside the supported range.
    #[error("unsupported LSF version: {version} (supported: 5-7)")]
    UnsupportedVersion {
        /// The version number found in the file.
        version: u32,
    },

    /// Fewer bytes were available than a fixed-size field or record requires.
    #[error("truncated input in {context}: needed {needed} bytes, {available} available")]
    TruncatedInput {
        /// What was being read.
        context: &'static str,
        /// Bytes required by the field or record.
        needed: usize,
        /// Bytes remaining in the source.
        available: usize,
    },

    // ==================== Compression Errors ====================
    /// A section decompressed to a different size than its header declared.
    #[error("{section} section decompressed to {actual} bytes, expected {expected}")]
    DecompressionSizeMismatch {
        /// The section being decoded.
        section: &'static str,
        /// Uncompressed size declared in the header.
        expected: usize,
        /// Bytes the codec produced.
        actual: usize,
    },

    /// The codec rejected the compressed stream.
    #[error("{method} decompression failed: {message}")]
    DecompressionFailed {
        /// Name of the compression method.
        method: &'static str,
        /// The codec's error message.
        message: String,
    },

    /// The compression flags name a method this reader does not know.
    #[error("unsupported compression method: {method}")]
    UnsupportedCompressionMethod {
        /// The method code from the low nibble of the flags byte.
        method: u8,
    },

    // ==================== LSF Content Errors ====================
    /// An attribute carries a type tag without a decoder.
    #[error("unsupported attribute type: {0}")]
    UnsupportedAttributeType(u32),

    /// A length prefix inside the value blob is negative.
    #[error("invalid length {length} in {context}")]
    InvalidLength {
        /// What was being read.
        context: &'static str,
        /// The length as stored.
        length: i32,
    },

    /// A name, node, or attribute reference points outside its table.
    #[error("dangling reference: {0}")]
    DanglingReference(String),

    /// Node or value nesting exceeds what the reader accepts.
    #[error("{context} nested deeper than {limit} levels")]
    NestingTooDeep {
        /// What was nested.
        context: &'static str,
        /// The deepest nesting accepted.
        limit: usize,
    },

    // ==================== Output Errors ====================
    /// XML serialization error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Build a `TruncatedInput` error for a read of `needed` bytes at `position`.
    pub(crate) fn truncated(context: &'static str, needed: usize, position: u64, len: usize) -> Self {
        let available = len.saturating_sub(usize::try_from(position).unwrap_or(usize::MAX));
        Error::TruncatedInput {
            context,
            needed,
            available,
        }
    }
}

/// A specialized Result type for `Lsf2Lsx` operations.
pub type Result<T> = std::result::Result<T, Error>;
