//! LSF magic, version, and section metadata
//!
//! Only the BG3 layout is read: versions 5-7 with the 64-bit engine version
//! and the V6 metadata record that includes the keys section.

use super::cursor::ByteCursor;
use crate::compression::CompressionFlags;
use crate::error::{Error, Result};

/// "LSOF" read as a little-endian u32
pub const LSF_MAGIC: u32 = u32::from_le_bytes(*b"LSOF");

// V5: BG3 extended header (64-bit engine version)
// V6: BG3 node keys section
// V7: BG3 Patch 3
pub const LSF_VERSION_MIN: u32 = 5;
pub const LSF_VERSION_MAX: u32 = 7;

/// Magic + version + engine version + metadata
pub const HEADER_SIZE: usize = 64;

/// Engine version substituted when a file stores zero (merged LSF files).
const FALLBACK_ENGINE_VERSION: PackedVersion = PackedVersion {
    major: 4,
    minor: 0,
    revision: 9,
    build: 0,
};

/// Divinity Engine version quadruple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
    pub build: u32,
}

impl PackedVersion {
    /// Unpack the 64-bit engine version field.
    #[must_use]
    pub fn from_packed(packed: u64) -> Self {
        PackedVersion {
            major: ((packed >> 55) & 0x7F) as u32,
            minor: ((packed >> 47) & 0xFF) as u32,
            revision: ((packed >> 31) & 0xFFFF) as u32,
            build: (packed & 0x7FFF_FFFF) as u32,
        }
    }

    /// Unpack, replacing a missing (zero-major) version with 4.0.9.0.
    #[must_use]
    pub fn from_packed_or_fallback(packed: u64) -> Self {
        let version = Self::from_packed(packed);
        if version.major == 0 {
            tracing::debug!("Engine version missing, using {FALLBACK_ENGINE_VERSION}");
            FALLBACK_ENGINE_VERSION
        } else {
            version
        }
    }
}

impl std::fmt::Display for PackedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.revision, self.build)
    }
}

/// Layout of the node/attribute tables and presence of the keys section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LsfMetadataFormat {
    None,
    KeysAndAdjacency,
    None2,
}

impl From<u32> for LsfMetadataFormat {
    fn from(value: u32) -> Self {
        match value {
            1 => LsfMetadataFormat::KeysAndAdjacency,
            2 => LsfMetadataFormat::None2,
            _ => LsfMetadataFormat::None,
        }
    }
}

/// Uncompressed and on-disk sizes of one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionSize {
    pub uncompressed: u32,
    pub on_disk: u32,
}

/// The V6 metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfMetadata {
    pub strings: SectionSize,
    pub keys: SectionSize,
    pub nodes: SectionSize,
    pub attributes: SectionSize,
    pub values: SectionSize,
    pub compression_flags: CompressionFlags,
    pub metadata_format: LsfMetadataFormat,
}

impl LsfMetadata {
    /// Whether a keys section follows the values section.
    #[must_use]
    pub fn has_keys(&self) -> bool {
        self.metadata_format == LsfMetadataFormat::KeysAndAdjacency && self.keys.on_disk > 0
    }
}

/// Everything before the first section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsfHeader {
    pub version: u32,
    pub engine_version: PackedVersion,
    pub metadata: LsfMetadata,
}

/// Parse and validate the fixed 64-byte file header.
///
/// # Errors
/// Returns [`Error::MalformedMagic`], [`Error::UnsupportedVersion`], or
/// [`Error::TruncatedInput`] if the header is shorter than 64 bytes.
pub fn read_header(cursor: &mut ByteCursor<'_>) -> Result<LsfHeader> {
    let magic = cursor.read_u32()?;
    if magic != LSF_MAGIC {
        return Err(Error::MalformedMagic {
            expected: LSF_MAGIC,
            actual: magic,
        });
    }

    let version = cursor.read_u32()?;
    if !(LSF_VERSION_MIN..=LSF_VERSION_MAX).contains(&version) {
        return Err(Error::UnsupportedVersion { version });
    }

    let engine_version = PackedVersion::from_packed_or_fallback(cursor.read_u64()?);
    let metadata = read_metadata(cursor)?;

    tracing::debug!(
        "LSF v{version}, engine {engine_version}, compression {:#04x}, format {:?}",
        metadata.compression_flags.0,
        metadata.metadata_format
    );

    Ok(LsfHeader {
        version,
        engine_version,
        metadata,
    })
}

fn read_section_size(cursor: &mut ByteCursor<'_>) -> Result<SectionSize> {
    // ORDER IS: (uncompressed_size, size_on_disk)
    let uncompressed = cursor.read_u32()?;
    let on_disk = cursor.read_u32()?;
    Ok(SectionSize {
        uncompressed,
        on_disk,
    })
}

fn read_metadata(cursor: &mut ByteCursor<'_>) -> Result<LsfMetadata> {
    let strings = read_section_size(cursor)?;
    let keys = read_section_size(cursor)?;
    let nodes = read_section_size(cursor)?;
    let attributes = read_section_size(cursor)?;
    let values = read_section_size(cursor)?;

    let compression_flags = CompressionFlags(cursor.read_u8()?);
    let _unknown2 = cursor.read_u8()?;
    let _unknown3 = cursor.read_u16()?;
    let metadata_format = LsfMetadataFormat::from(cursor.read_u32()?);

    Ok(LsfMetadata {
        strings,
        keys,
        nodes,
        attributes,
        values,
        compression_flags,
        metadata_format,
    })
}
