//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! LSF to LSX conversion

use super::{ConvertPhase, ConvertProgress, ConvertProgressCallback};
use crate::error::{Error, Result};
use crate::formats::lsf::{self, Resource};
use crate::formats::lsx;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Convert LSF file to LSX format
///
/// # Errors
/// Returns an error if reading or conversion fails. The destination is
/// left untouched on failure.
pub fn convert_lsf_to_lsx<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<()> {
    convert_lsf_to_lsx_with_progress(source, dest, &|_| {})
}

/// Convert LSF file to LSX format with progress callback
///
/// # Errors
/// Returns an error if reading or conversion fails. The destination is
/// left untouched on failure.
pub fn convert_lsf_to_lsx_with_progress<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    dest: Q,
    progress: ConvertProgressCallback,
) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    tracing::info!("Converting LSF→LSX: {:?} → {:?}", source, dest);

    let xml = render(source, progress)?;

    progress(&ConvertProgress::new(
        ConvertPhase::WritingOutput,
        3,
        3,
        format!("Writing LSX ({} bytes)...", xml.len()),
    ));
    write_atomic(dest, xml.as_bytes())?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert an LSF file and write the LSX document to `out`.
///
/// Nothing is written unless the whole document renders.
///
/// # Errors
/// Returns an error if reading, conversion, or writing fails.
pub fn convert_lsf_to_writer<P: AsRef<Path>, W: Write>(source: P, out: &mut W) -> Result<()> {
    let source = source.as_ref();
    tracing::info!("Converting LSF→LSX: {:?}", source);

    let xml = render(source, &|_| {})?;
    out.write_all(xml.as_bytes())?;
    out.flush()?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert in-memory LSF data to an LSX XML string
///
/// # Errors
/// Returns an error if the data is not a valid LSF file.
pub fn lsf_bytes_to_lsx(data: &[u8]) -> Result<String> {
    let resource = lsf::parse_lsf_bytes(data)?;
    to_lsx(&resource)
}

/// Convert a decoded resource to an LSX XML string in canonical order
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn to_lsx(resource: &Resource) -> Result<String> {
    lsx::serialize_lsx(&lsx::canonicalize(resource))
}

fn render(source: &Path, progress: ConvertProgressCallback) -> Result<String> {
    progress(&ConvertProgress::new(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading LSF binary...",
    ));
    let resource = lsf::read_lsf(source)?;

    let node_count = resource.node_count();
    progress(&ConvertProgress::new(
        ConvertPhase::Converting,
        2,
        3,
        format!("Converting {node_count} nodes to XML..."),
    ));
    tracing::debug!(
        "{} regions, {node_count} nodes, engine {}",
        resource.regions.len(),
        resource.version
    );
    to_lsx(&resource)
}

/// Write through a temporary file in the destination directory, then rename
/// it into place.
fn write_atomic(dest: &Path, contents: &[u8]) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(dest).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
