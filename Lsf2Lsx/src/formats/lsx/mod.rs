//! LSX (XML) format module

mod canonical;
mod document;
mod writer;

pub use canonical::{canonicalize, content_hash};
pub use document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion};
pub use writer::serialize_lsx;
