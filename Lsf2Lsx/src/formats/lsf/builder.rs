//! Tree reconstruction from the flat LSF tables
//!
//! Nodes are first collected into an index-addressed arena, in table order,
//! with their attributes decoded. The owned tree is then assembled from the
//! last record backwards: a parent always precedes its children, so every
//! child is complete by the time its parent takes ownership of it.

use super::cursor::ByteCursor;
use super::resource::{Node, Region};
use super::tables::{AttributeEntry, NameTable, NodeEntry};
use super::values::read_attribute_value;
use crate::error::{Error, Result};
use crate::formats::common::{AttributeType, AttributeValue};
use indexmap::IndexMap;

/// Deepest node nesting accepted, counting a region root as level 1.
///
/// Canonical ordering and XML emission recurse once per level.
pub const MAX_TREE_DEPTH: usize = 512;

/// The decoded tables a tree is rebuilt from
pub struct FlatTables<'a> {
    pub names: &'a NameTable,
    pub nodes: &'a [NodeEntry],
    pub attributes: &'a [AttributeEntry],
    pub values: &'a [u8],
    /// Key attribute per node index, from the keys section
    pub node_keys: &'a [Option<String>],
}

struct PendingNode {
    name: String,
    key: Option<String>,
    attributes: IndexMap<String, AttributeValue>,
    children: Vec<usize>,
}

/// Rebuild the region trees.
///
/// # Errors
/// Returns [`Error::DanglingReference`] for parent, attribute, or name indices
/// outside their tables (or a parent that does not precede its child),
/// [`Error::NestingTooDeep`] for trees deeper than [`MAX_TREE_DEPTH`], plus
/// any value decoding error.
pub fn build_regions(tables: &FlatTables<'_>) -> Result<IndexMap<String, Region>> {
    let mut values = ByteCursor::new(tables.values, "value blob");
    let mut pending: Vec<PendingNode> = Vec::with_capacity(tables.nodes.len());
    let mut depths: Vec<usize> = Vec::with_capacity(tables.nodes.len());
    let mut roots = Vec::new();

    for (index, entry) in tables.nodes.iter().enumerate() {
        let name = tables.names.get(entry.name)?.to_string();

        let depth = match parent_of(entry, index)? {
            None => {
                roots.push(index);
                1
            }
            Some(parent) => {
                pending[parent].children.push(index);
                depths[parent] + 1
            }
        };
        if depth > MAX_TREE_DEPTH {
            return Err(Error::NestingTooDeep {
                context: "node tree",
                limit: MAX_TREE_DEPTH,
            });
        }
        depths.push(depth);

        let attributes = read_node_attributes(tables, entry, &name, &mut values)?;
        pending.push(PendingNode {
            name,
            key: tables.node_keys.get(index).cloned().flatten(),
            attributes,
            children: Vec::new(),
        });
    }

    let mut built: Vec<Option<Node>> = Vec::with_capacity(pending.len());
    built.resize_with(pending.len(), || None);

    for (index, node) in pending.into_iter().enumerate().rev() {
        let mut owned = Node {
            name: node.name,
            key: node.key,
            attributes: node.attributes,
            children: IndexMap::new(),
        };
        for child_index in node.children {
            if let Some(child) = built[child_index].take() {
                owned.add_child(child);
            }
        }
        built[index] = Some(owned);
    }

    let mut regions = IndexMap::with_capacity(roots.len());
    for index in roots {
        if let Some(node) = built[index].take() {
            if regions.contains_key(&node.name) {
                tracing::warn!("Duplicate region {:?}, keeping the later one", node.name);
            }
            regions.insert(
                node.name.clone(),
                Region {
                    name: node.name.clone(),
                    node,
                },
            );
        }
    }

    tracing::debug!(
        "Rebuilt {} regions from {} nodes",
        regions.len(),
        tables.nodes.len()
    );
    Ok(regions)
}

/// Parent index of a node record, or `None` for a region root.
fn parent_of(entry: &NodeEntry, index: usize) -> Result<Option<usize>> {
    if entry.parent_index == -1 {
        return Ok(None);
    }
    match usize::try_from(entry.parent_index) {
        Ok(parent) if parent < index => Ok(Some(parent)),
        _ => Err(Error::DanglingReference(format!(
            "node {index} has parent {} which does not precede it",
            entry.parent_index
        ))),
    }
}

fn attribute_at(tables: &FlatTables<'_>, index: i32, node_name: &str) -> Result<AttributeEntry> {
    usize::try_from(index)
        .ok()
        .and_then(|i| tables.attributes.get(i))
        .copied()
        .ok_or_else(|| {
            Error::DanglingReference(format!(
                "node {node_name:?} references attribute {index} of {}",
                tables.attributes.len()
            ))
        })
}

/// Follow a node's attribute chain and decode each value.
fn read_node_attributes(
    tables: &FlatTables<'_>,
    entry: &NodeEntry,
    node_name: &str,
    values: &mut ByteCursor<'_>,
) -> Result<IndexMap<String, AttributeValue>> {
    let mut attributes = IndexMap::new();
    let mut next = entry.first_attribute_index;
    let mut steps = 0usize;

    while next != -1 {
        steps += 1;
        if steps > tables.attributes.len() {
            return Err(Error::DanglingReference(format!(
                "attribute chain of node {node_name:?} loops"
            )));
        }

        let attr = attribute_at(tables, next, node_name)?;
        let attr_name = tables.names.get(attr.name)?;
        let attr_type = AttributeType::from_id(attr.type_id())?;

        values.seek(attr.offset as usize)?;
        let value = read_attribute_value(attr_type, attr.length(), values)?;
        tracing::trace!("{node_name}.{attr_name}: {} = {:?}", attr_type.name(), value);

        attributes.insert(attr_name.to_string(), value);
        next = attr.next_index;
    }

    Ok(attributes)
}
