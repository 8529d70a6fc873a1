//! Deterministic ordering of a decoded resource
//!
//! Regions, attributes, and child groups are sorted by name. Same-named
//! siblings are sorted by a content hash string built bottom-up, so the
//! output does not depend on table order in the source file.

use super::document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion};
use crate::formats::lsf::{Node, Resource};
use std::fmt::Write as _;

/// Build the ordered document for a resource.
#[must_use]
pub fn canonicalize(resource: &Resource) -> LsxDocument {
    let mut doc = LsxDocument::new(resource.version);

    let mut region_names: Vec<&String> = resource.regions.keys().collect();
    region_names.sort();

    for name in region_names {
        let region = &resource.regions[name];
        let (node, _) = order_node(&region.node);
        doc.regions.push(LsxRegion {
            id: region.name.clone(),
            node,
        });
    }

    doc
}

/// Content hash of a node subtree, as used to order same-named siblings.
#[must_use]
pub fn content_hash(node: &Node) -> String {
    order_node(node).1
}

/// Order a subtree and compute its content hash in the same pass.
///
/// Hash layout: `key:<key>|` if keyed, then `<attr>:<text>|` per attribute
/// in name order, then `<child>:<child hash>|` per child in output order.
fn order_node(node: &Node) -> (LsxNode, String) {
    let mut hash = String::new();
    if let Some(key) = &node.key {
        let _ = write!(hash, "key:{key}|");
    }

    let mut attributes: Vec<LsxAttribute> = node
        .attributes
        .iter()
        .map(|(id, value)| LsxAttribute {
            id: id.clone(),
            value: value.clone(),
        })
        .collect();
    attributes.sort_by(|a, b| a.id.cmp(&b.id));
    for attr in &attributes {
        let _ = write!(hash, "{}:{}|", attr.id, attr.value.to_text());
    }

    let mut group_names: Vec<&String> = node.children.keys().collect();
    group_names.sort();

    let mut children = Vec::with_capacity(node.child_count());
    for group_name in group_names {
        let mut group: Vec<(LsxNode, String)> =
            node.children[group_name].iter().map(order_node).collect();
        if group.len() > 1 {
            // stable: identical subtrees keep source order
            group.sort_by(|a, b| a.1.cmp(&b.1));
        }
        for (child, child_hash) in group {
            let _ = write!(hash, "{group_name}:{child_hash}|");
            children.push(child);
        }
    }

    let ordered = LsxNode {
        id: node.name.clone(),
        key: node.key.clone(),
        attributes,
        children,
    };
    (ordered, hash)
}
