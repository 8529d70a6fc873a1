//! # lsf2lsx
//!
//! A pure-Rust converter from Baldur's Gate 3 LSF (binary) resources to
//! canonical LSX (XML).
//!
//! The output is deterministic: regions, attributes, and child groups are
//! sorted by name, and same-named siblings are sorted by a content hash of
//! their subtree. Converting the same data twice gives byte-identical XML,
//! which makes the tool usable as a `git` diff driver.
//!
//! ## Quick Start
//!
//! ### Converting Files
//!
//! ```no_run
//! use lsf2lsx::converter::convert_lsf_to_lsx;
//!
//! // Convert LSF (binary) to LSX (XML) file
//! convert_lsf_to_lsx("meta.lsf", "meta.lsx")?;
//! # Ok::<(), lsf2lsx::Error>(())
//! ```
//!
//! ### Inspecting a Resource
//!
//! ```no_run
//! use lsf2lsx::formats::lsf;
//!
//! let resource = lsf::read_lsf("meta.lsf")?;
//! println!("engine {}, {} nodes", resource.version, resource.node_count());
//! resource.visit(|node, parent| {
//!     if let Some(parent) = parent {
//!         println!("{} -> {}", parent.name, node.name);
//!     }
//! });
//! # Ok::<(), lsf2lsx::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `lsf2lsx` command-line binary

pub mod compression;
pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::common::{AttributeType, AttributeValue, TypeId};
    pub use crate::formats::lsf::{Node, PackedVersion, Region, Resource};
    pub use crate::formats::lsx::{LsxAttribute, LsxDocument, LsxNode, LsxRegion};

    pub use crate::converter;
    pub use crate::converter::{convert_lsf_to_lsx, lsf_bytes_to_lsx, to_lsx};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
