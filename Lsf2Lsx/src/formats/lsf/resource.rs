//! Owned resource tree produced by the LSF reader

use super::header::PackedVersion;
use crate::formats::common::AttributeValue;
use indexmap::IndexMap;

/// A decoded LSF file: engine version plus its named regions.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub version: PackedVersion,
    /// Regions keyed by name, in the order they were first created
    pub regions: IndexMap<String, Region>,
}

/// A top-level subtree. The region name is also its root node's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub node: Node,
}

/// A tree vertex. Children are grouped by name; each group keeps source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub name: String,
    pub key: Option<String>,
    pub attributes: IndexMap<String, AttributeValue>,
    pub children: IndexMap<String, Vec<Node>>,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a child to the group matching its name.
    pub fn add_child(&mut self, child: Node) {
        self.children.entry(child.name.clone()).or_default().push(child);
    }

    /// Iterate over all direct children, group by group.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values().flatten()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().map(Node::node_count).sum::<usize>()
    }

    /// Depth-first pre-order walk. The visitor receives each node and its
    /// parent, which is `None` only for `self`.
    pub fn visit<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Node, Option<&'a Node>),
    {
        self.visit_with_parent(None, f);
    }

    fn visit_with_parent<'a, F>(&'a self, parent: Option<&'a Node>, f: &mut F)
    where
        F: FnMut(&'a Node, Option<&'a Node>),
    {
        f(self, parent);
        for child in self.children() {
            child.visit_with_parent(Some(self), f);
        }
    }
}

impl Resource {
    /// Total nodes across all regions, counting region roots.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.regions.values().map(|r| r.node.node_count()).sum()
    }

    /// Walk every region tree in region order. Region roots have no parent.
    pub fn visit<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a Node, Option<&'a Node>),
    {
        for region in self.regions.values() {
            region.node.visit(&mut f);
        }
    }
}
