//! LSX document structures
//!
//! An [`LsxDocument`] is already in output order: the writer emits its
//! regions, attributes, and children exactly as stored.

use crate::formats::common::AttributeValue;
use crate::formats::lsf::PackedVersion;

/// An LSX (Larian Save XML) document.
#[derive(Debug, Clone, PartialEq)]
pub struct LsxDocument {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// Revision number.
    pub revision: u32,
    /// Build number.
    pub build: u32,
    /// Document regions containing the data.
    pub regions: Vec<LsxRegion>,
}

/// A region in an LSX document.
#[derive(Debug, Clone, PartialEq)]
pub struct LsxRegion {
    /// Region identifier.
    pub id: String,
    /// The region's root node, whose id matches the region id.
    pub node: LsxNode,
}

/// A node in an LSX document.
#[derive(Debug, Clone, PartialEq)]
pub struct LsxNode {
    /// Node identifier/type.
    pub id: String,
    /// Optional key for this node.
    pub key: Option<String>,
    /// Attributes on this node.
    pub attributes: Vec<LsxAttribute>,
    /// Child nodes.
    pub children: Vec<LsxNode>,
}

/// An attribute on an LSX node.
#[derive(Debug, Clone, PartialEq)]
pub struct LsxAttribute {
    /// Attribute identifier/name.
    pub id: String,
    /// The typed value; its variant determines the `type` attribute.
    pub value: AttributeValue,
}

impl LsxAttribute {
    /// Type name (e.g., "`FixedString`", "`int32`").
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.value.attribute_type().name()
    }
}

impl LsxDocument {
    /// Creates a new LSX document with the specified version.
    #[must_use]
    pub fn new(version: PackedVersion) -> Self {
        LsxDocument {
            major: version.major,
            minor: version.minor,
            revision: version.revision,
            build: version.build,
            regions: Vec::new(),
        }
    }
}
