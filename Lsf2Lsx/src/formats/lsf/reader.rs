//! LSF file reading and parsing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::builder::{FlatTables, build_regions};
use super::cursor::ByteCursor;
use super::header::read_header;
use super::resource::Resource;
use super::sections::read_section;
use super::tables::{self, NameTable};
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read an LSF file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has an invalid format.
pub fn read_lsf<P: AsRef<Path>>(path: P) -> Result<Resource> {
    let mut buffer = Vec::new();
    {
        let mut file = File::open(path)?;
        file.read_to_end(&mut buffer)?;
    }
    parse_lsf_bytes(&buffer)
}

/// Parse LSF data from bytes
///
/// # Errors
/// Returns an error if the data has an invalid LSF format.
pub fn parse_lsf_bytes(data: &[u8]) -> Result<Resource> {
    let mut cursor = ByteCursor::new(data, "header");
    let header = read_header(&mut cursor)?;
    let meta = header.metadata;
    let flags = meta.compression_flags;

    // Sections in FILE ORDER: Strings, Nodes, Attributes, Values, [Keys]
    // Only the name table uses the non-chunked encoding.
    let names_data = read_section(&mut cursor, meta.strings, flags, false, "names")?;
    let nodes_data = read_section(&mut cursor, meta.nodes, flags, true, "nodes")?;
    let attributes_data = read_section(&mut cursor, meta.attributes, flags, true, "attributes")?;
    let values = read_section(&mut cursor, meta.values, flags, true, "values")?;
    let keys_data = if meta.has_keys() {
        read_section(&mut cursor, meta.keys, flags, true, "keys")?
    } else {
        Vec::new()
    };

    let names = NameTable::parse(&names_data)?;
    let nodes = tables::parse_nodes(&nodes_data)?;
    let attributes = tables::parse_attributes(&attributes_data)?;
    let keys = tables::parse_keys(&keys_data)?;
    let node_keys = tables::resolve_keys(&keys, &names, nodes.len())?;

    tracing::debug!(
        "LSF tables: {} name buckets, {} nodes, {} attributes, {} value bytes, {} keys",
        names.bucket_count(),
        nodes.len(),
        attributes.len(),
        values.len(),
        keys.len()
    );

    let regions = build_regions(&FlatTables {
        names: &names,
        nodes: &nodes,
        attributes: &attributes,
        values: &values,
        node_keys: &node_keys,
    })?;

    Ok(Resource {
        version: header.engine_version,
        regions,
    })
}
