//! File format handlers for Larian Studios formats

pub mod common;
pub mod lsf;
pub mod lsx;

// Re-export common types for convenience
pub use common::{AttributeType, AttributeValue, TypeId};

// Re-export main document types
pub use lsf::{Node, Region, Resource};
pub use lsx::{LsxAttribute, LsxDocument, LsxNode, LsxRegion};
