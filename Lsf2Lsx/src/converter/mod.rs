//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Format conversion utilities
//!
//! LSF (binary) → LSX (XML). The whole document is decoded and rendered in
//! memory before anything is written.

mod lsf_to_lsx;

/// Stage of a conversion reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    ReadingSource,
    Converting,
    WritingOutput,
}

impl ConvertPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConvertPhase::ReadingSource => "Reading",
            ConvertPhase::Converting => "Converting",
            ConvertPhase::WritingOutput => "Writing",
        }
    }
}

/// A progress update: step `current` of `total`, with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertProgress {
    pub phase: ConvertPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ConvertProgress {
    #[must_use]
    pub fn new(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        ConvertProgress {
            phase,
            current,
            total,
            message: message.into(),
        }
    }
}

/// Progress callback type for conversion operations.
/// The callback receives the phase, step count, and a message describing the current step.
pub type ConvertProgressCallback<'a> = &'a dyn Fn(&ConvertProgress);

pub use lsf_to_lsx::{
    convert_lsf_to_lsx, convert_lsf_to_lsx_with_progress, convert_lsf_to_writer,
    lsf_bytes_to_lsx, to_lsx,
};
