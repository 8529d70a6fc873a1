//! Common types shared by the LSF reader and the LSX writer

pub mod types;

pub use types::*;
