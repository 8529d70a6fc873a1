//! Flat LSF tables: names, nodes, attributes, and keys
//!
//! These are the raw records as stored. They only live until the tree is
//! rebuilt from them.

use super::cursor::ByteCursor;
use crate::error::{Error, Result};

const NODE_ENTRY_SIZE: usize = 16;
const ATTRIBUTE_ENTRY_SIZE: usize = 16;
const KEY_ENTRY_SIZE: usize = 8;

/// Packed name reference: upper 16 bits = bucket, lower 16 bits = offset in bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRef {
    pub bucket: u16,
    pub offset: u16,
}

impl From<u32> for NameRef {
    fn from(packed: u32) -> Self {
        NameRef {
            bucket: (packed >> 16) as u16,
            offset: (packed & 0xFFFF) as u16,
        }
    }
}

impl std::fmt::Display for NameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.bucket, self.offset)
    }
}

/// Hash-bucketed string table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    buckets: Vec<Vec<String>>,
}

impl NameTable {
    /// Parse the decompressed names section.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::default());
        }

        let mut cursor = ByteCursor::new(data, "name table");
        let num_hash_entries = cursor.read_u32()? as usize;

        let mut buckets = Vec::with_capacity(num_hash_entries.min(cursor.remaining() / 2));
        for _ in 0..num_hash_entries {
            let num_strings = cursor.read_u16()? as usize;
            let mut string_list = Vec::with_capacity(num_strings);

            for _ in 0..num_strings {
                let string_len = cursor.read_u16()? as usize;
                let string_bytes = cursor.read_bytes(string_len)?;
                string_list.push(String::from_utf8_lossy(&string_bytes).into_owned());
            }
            buckets.push(string_list);
        }

        tracing::trace!("Name table: {} buckets", buckets.len());
        Ok(NameTable { buckets })
    }

    /// Resolve a name reference.
    ///
    /// # Errors
    /// Returns [`Error::DanglingReference`] if either index is out of range.
    pub fn get(&self, name: NameRef) -> Result<&str> {
        self.buckets
            .get(name.bucket as usize)
            .and_then(|list| list.get(name.offset as usize))
            .map(String::as_str)
            .ok_or_else(|| Error::DanglingReference(format!("name {name} not in name table")))
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl From<Vec<Vec<String>>> for NameTable {
    fn from(buckets: Vec<Vec<String>>) -> Self {
        NameTable { buckets }
    }
}

/// A node record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEntry {
    pub name: NameRef,
    /// -1 for region roots
    pub parent_index: i32,
    /// Not used for reconstruction; parents own their children.
    pub next_sibling_index: i32,
    /// -1 when the node has no attributes
    pub first_attribute_index: i32,
}

/// An attribute record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEntry {
    pub name: NameRef,
    /// Lower 6 bits = type, upper 26 bits = length
    pub type_and_length: u32,
    /// -1 ends the node's attribute list
    pub next_index: i32,
    /// Byte offset into the values section
    pub offset: u32,
}

impl AttributeEntry {
    #[must_use]
    pub fn type_id(&self) -> u32 {
        self.type_and_length & 0x3F
    }

    #[must_use]
    pub fn length(&self) -> usize {
        (self.type_and_length >> 6) as usize
    }
}

/// A key record assigning a key attribute name to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    pub node_index: u32,
    pub key_name: NameRef,
}

fn record_count(data: &[u8], record_size: usize, context: &'static str) -> Result<usize> {
    let remainder = data.len() % record_size;
    if remainder != 0 {
        return Err(Error::TruncatedInput {
            context,
            needed: record_size,
            available: remainder,
        });
    }
    Ok(data.len() / record_size)
}

/// Parse the node section: 16-byte records until the section is exhausted.
pub fn parse_nodes(data: &[u8]) -> Result<Vec<NodeEntry>> {
    let node_count = record_count(data, NODE_ENTRY_SIZE, "node table")?;
    let mut cursor = ByteCursor::new(data, "node table");
    let mut nodes = Vec::with_capacity(node_count);

    while !cursor.is_exhausted() {
        nodes.push(NodeEntry {
            name: NameRef::from(cursor.read_u32()?),
            parent_index: cursor.read_i32()?,
            next_sibling_index: cursor.read_i32()?,
            first_attribute_index: cursor.read_i32()?,
        });
    }

    tracing::trace!("Node table: {} entries", nodes.len());
    Ok(nodes)
}

/// Parse the attribute section: 16-byte records until the section is exhausted.
pub fn parse_attributes(data: &[u8]) -> Result<Vec<AttributeEntry>> {
    let attr_count = record_count(data, ATTRIBUTE_ENTRY_SIZE, "attribute table")?;
    let mut cursor = ByteCursor::new(data, "attribute table");
    let mut attributes = Vec::with_capacity(attr_count);

    while !cursor.is_exhausted() {
        attributes.push(AttributeEntry {
            name: NameRef::from(cursor.read_u32()?),
            type_and_length: cursor.read_u32()?,
            next_index: cursor.read_i32()?,
            offset: cursor.read_u32()?,
        });
    }

    tracing::trace!("Attribute table: {} entries", attributes.len());
    Ok(attributes)
}

/// Parse the keys section: 8-byte records until the section is exhausted.
pub fn parse_keys(data: &[u8]) -> Result<Vec<KeyEntry>> {
    let key_count = record_count(data, KEY_ENTRY_SIZE, "key table")?;
    let mut cursor = ByteCursor::new(data, "key table");
    let mut keys = Vec::with_capacity(key_count);

    while !cursor.is_exhausted() {
        keys.push(KeyEntry {
            node_index: cursor.read_u32()?,
            key_name: NameRef::from(cursor.read_u32()?),
        });
    }

    Ok(keys)
}

/// Resolve key records into a per-node key attribute list.
///
/// # Errors
/// Returns [`Error::DanglingReference`] if a record names a node or string
/// outside its table.
pub fn resolve_keys(
    keys: &[KeyEntry],
    names: &NameTable,
    node_count: usize,
) -> Result<Vec<Option<String>>> {
    let mut node_keys = vec![None; node_count];
    for key in keys {
        let key_name = names.get(key.key_name)?;
        let slot = node_keys.get_mut(key.node_index as usize).ok_or_else(|| {
            Error::DanglingReference(format!(
                "key {key_name:?} targets node {} of {node_count}",
                key.node_index
            ))
        })?;
        *slot = Some(key_name.to_string());
    }
    Ok(node_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{LittleEndian, WriteBytesExt};

    fn names_section(buckets: &[&[&str]]) -> Vec<u8> {
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(buckets.len() as u32).unwrap();
        for bucket in buckets {
            data.write_u16::<LittleEndian>(bucket.len() as u16).unwrap();
            for name in *bucket {
                data.write_u16::<LittleEndian>(name.len() as u16).unwrap();
                data.extend_from_slice(name.as_bytes());
            }
        }
        data
    }

    #[test]
    fn test_name_table_lookup() {
        let data = names_section(&[&["Root", "Child"], &[], &["Name"]]);
        let names = NameTable::parse(&data).unwrap();
        assert_eq!(names.bucket_count(), 3);
        assert_eq!(names.get(NameRef::from(0x0000_0001)).unwrap(), "Child");
        assert_eq!(names.get(NameRef::from(0x0002_0000)).unwrap(), "Name");
        assert!(matches!(
            names.get(NameRef::from(0x0001_0000)),
            Err(Error::DanglingReference(_))
        ));
        assert!(matches!(
            names.get(NameRef::from(0x0003_0000)),
            Err(Error::DanglingReference(_))
        ));
    }

    #[test]
    fn test_name_table_truncated_string() {
        let mut data = names_section(&[&["Root"]]);
        data.truncate(data.len() - 2);
        assert!(matches!(
            NameTable::parse(&data),
            Err(Error::TruncatedInput { context: "name table", .. })
        ));
    }

    #[test]
    fn test_name_ref_packing() {
        let name = NameRef::from(0x0012_0034);
        assert_eq!(name.bucket, 0x12);
        assert_eq!(name.offset, 0x34);
    }

    #[test]
    fn test_parse_nodes() {
        let mut data = Vec::new();
        for (name, parent, first_attr) in [(0u32, -1i32, -1i32), (1, 0, 0)] {
            data.write_u32::<LittleEndian>(name).unwrap();
            data.write_i32::<LittleEndian>(parent).unwrap();
            data.write_i32::<LittleEndian>(-1).unwrap();
            data.write_i32::<LittleEndian>(first_attr).unwrap();
        }
        let nodes = parse_nodes(&data).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].parent_index, -1);
        assert_eq!(nodes[1].name, NameRef { bucket: 0, offset: 1 });
        assert_eq!(nodes[1].first_attribute_index, 0);
    }

    #[test]
    fn test_partial_node_record_is_truncated() {
        let data = [0u8; 20];
        assert!(matches!(
            parse_nodes(&data),
            Err(Error::TruncatedInput {
                context: "node table",
                needed: 16,
                available: 4
            })
        ));
    }

    #[test]
    fn test_attribute_type_and_length() {
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(0x0001_0002).unwrap();
        data.write_u32::<LittleEndian>((37 << 6) | 22).unwrap();
        data.write_i32::<LittleEndian>(-1).unwrap();
        data.write_u32::<LittleEndian>(128).unwrap();

        let attrs = parse_attributes(&data).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].type_id(), 22);
        assert_eq!(attrs[0].length(), 37);
        assert_eq!(attrs[0].offset, 128);
        assert_eq!(attrs[0].next_index, -1);
    }

    #[test]
    fn test_resolve_keys() {
        let names = NameTable::from(vec![vec!["MapKey".to_string(), "UUID".to_string()]]);
        let mut data = Vec::new();
        data.write_u32::<LittleEndian>(2).unwrap();
        data.write_u32::<LittleEndian>(0x0000_0001).unwrap();
        let keys = parse_keys(&data).unwrap();

        let node_keys = resolve_keys(&keys, &names, 3).unwrap();
        assert_eq!(node_keys, vec![None, None, Some("UUID".to_string())]);

        assert!(matches!(
            resolve_keys(&keys, &names, 2),
            Err(Error::DanglingReference(_))
        ));
    }
}
