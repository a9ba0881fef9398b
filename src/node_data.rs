//! Arena record backing every node of a document tree.
//!
//! `NodeData` stores the node kind, its canonicalized name, its textual
//! value, the attribute list and the tree linkage expressed as arena
//! indices. Down-edges (first child, siblings) own nothing; the arena in
//! [`Document`](crate::document::Document) owns all records, so parent
//! back-references are plain indices and cannot extend any lifetime.

use crate::attribute::Attribute;
use crate::defs::NodeIdx;
use crate::node_type::NodeType;

/// A node record inside the document arena.
///
/// # Linkage invariants
/// - `parent` is `None` for the document node and for detached nodes.
/// - `first_child` is `0` when the node has no children.
/// - The first child's `prev_sibling` references the parent's *last* child,
///   which keeps `last_child` and append both O(1).
/// - The last child's `next_sibling` is `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) node_type: NodeType,
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) number: u32,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) prev_sibling: NodeIdx,
    pub(crate) next_sibling: NodeIdx,
    pub(crate) first_child: NodeIdx,
    pub(crate) attributes: Vec<Attribute>,
}

impl NodeData {
    /// Creates a detached record of the given kind.
    ///
    /// The record initially references itself as its own previous sibling,
    /// so that it is a well-formed single-element child list the moment it
    /// is attached.
    pub(crate) fn new(node_idx: NodeIdx, node_type: NodeType) -> Self {
        NodeData {
            node_type,
            name: String::new(),
            value: String::new(),
            number: 0,
            parent: None,
            prev_sibling: node_idx,
            next_sibling: 0,
            first_child: 0,
            attributes: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}
