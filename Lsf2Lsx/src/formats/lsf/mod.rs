//! LSF (Larian Story Format) binary format module
//!
//! Decoding runs strictly forward: header, compressed sections, flat tables,
//! then the owned [`Resource`] tree.

mod builder;
mod cursor;
mod header;
mod primitive;
mod reader;
mod resource;
mod sections;
mod tables;
mod values;

// Public API
pub use builder::MAX_TREE_DEPTH;
pub use cursor::ByteCursor;
pub use header::{
    HEADER_SIZE, LSF_MAGIC, LSF_VERSION_MAX, LSF_VERSION_MIN, LsfHeader, LsfMetadata,
    LsfMetadataFormat, PackedVersion, SectionSize, read_header,
};
pub use primitive::read_primitive;
pub use reader::{parse_lsf_bytes, read_lsf};
pub use resource::{Node, Region, Resource};
pub use tables::{AttributeEntry, KeyEntry, NameRef, NameTable, NodeEntry};
pub use values::{MAX_FS_STRING_DEPTH, read_attribute_value};
