//! Document module for the `html_reader` crate.
//!
//! The `Document` owns every node of a parsed tree in a single arena
//! vector. Navigation hands out borrowed [`Node`] handles; mutation goes
//! through the methods below, keyed by node index, so the arena can keep
//! the sibling links consistent.

#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use log::debug;

use crate::attribute::Attribute;
use crate::defs::{NodeIdx, DOCUMENT_NODE};
use crate::node::{Descendants, Node};
use crate::node_data::NodeData;
use crate::node_type::NodeType;

/// A document tree.
///
/// The arena at index 0 always holds the unique `Document`-typed node; it
/// has no parent and transitively owns the whole tree. Dropping the
/// `Document` drops every node.
///
/// # Example
/// ```
/// use html_reader::Parser;
///
/// let doc = Parser::new().parse("<html><body>Text</body></html>").unwrap();
/// let root = doc.root_element().unwrap();
///
/// assert_eq!(root.name(), "HTML");
/// assert_eq!(root.first_child().unwrap().name(), "BODY");
/// ```
#[must_use]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// Creates an empty document holding only the document node.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(16);
        nodes.push(NodeData::new(DOCUMENT_NODE, NodeType::Document));
        Document { nodes }
    }

    /// Creates an empty document sized for an estimated node count.
    pub(crate) fn with_capacity(node_count: usize) -> Self {
        debug!("estimated node count: {node_count}");
        let mut nodes = Vec::with_capacity(node_count + 1);
        nodes.push(NodeData::new(DOCUMENT_NODE, NodeType::Document));
        Document { nodes }
    }

    /// Returns the document node, the root of the whole tree.
    #[inline]
    pub fn document_node(&self) -> Node<'_> {
        Node::new(DOCUMENT_NODE, self)
    }

    /// Returns the first element child of the document node, if any.
    #[inline]
    pub fn root_element(&self) -> Option<Node<'_>> {
        self.document_node().children().find(Node::is_element)
    }

    /// Checks if the document is empty.
    ///
    /// # Returns
    /// - `true`: if the document node has no children.
    /// - `false`: otherwise.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.document_node().has_children()
    }

    /// Retrieves a node handle by its arena index.
    #[inline]
    pub fn get_node(&self, node_idx: NodeIdx) -> Option<Node<'_>> {
        if (node_idx as usize) < self.nodes.len() {
            Some(Node::new(node_idx, self))
        } else {
            None
        }
    }

    /// Returns an iterator over every node of the tree below the document
    /// node, in depth-first pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self, DOCUMENT_NODE)
    }

    // ----- mutation -----

    /// Creates a new detached node of the given kind and returns its index.
    ///
    /// The node belongs to this document's arena but is not part of the
    /// tree until it is attached with [`append_child`](Document::append_child)
    /// or [`prepend_child`](Document::prepend_child).
    pub fn new_node(&mut self, node_type: NodeType) -> NodeIdx {
        let node_idx = self.nodes.len() as NodeIdx;
        self.nodes.push(NodeData::new(node_idx, node_type));
        node_idx
    }

    /// Checks whether `child` may become a child of `parent`.
    ///
    /// Only `Document` and `Element` nodes receive children; `Document` and
    /// `Null` nodes are never inserted; `Declaration` and `DocType` only go
    /// under the document node; an already-attached node cannot be attached
    /// twice.
    fn insertion_allowed(&self, parent: NodeIdx, child: NodeIdx) -> bool {
        if parent as usize >= self.nodes.len()
            || child as usize >= self.nodes.len()
            || parent == child
        {
            return false;
        }
        let parent_type = self.nodes[parent as usize].node_type;
        let child_type = self.nodes[child as usize].node_type;
        if !parent_type.allows_children() {
            return false;
        }
        if matches!(child_type, NodeType::Document | NodeType::Null) {
            return false;
        }
        if matches!(child_type, NodeType::Declaration | NodeType::DocType)
            && parent_type != NodeType::Document
        {
            return false;
        }
        self.nodes[child as usize].parent.is_none()
    }

    /// Attaches `child` as the last child of `parent`.
    ///
    /// Returns `false` without modifying the tree when the insertion rules
    /// reject the pair.
    pub fn append_child(&mut self, parent: NodeIdx, child: NodeIdx) -> bool {
        if !self.insertion_allowed(parent, child) {
            return false;
        }

        let first = self.nodes[parent as usize].first_child;
        if first == 0 {
            self.nodes[parent as usize].first_child = child;
            self.nodes[child as usize].prev_sibling = child;
        } else {
            let last = self.nodes[first as usize].prev_sibling;
            self.nodes[last as usize].next_sibling = child;
            self.nodes[child as usize].prev_sibling = last;
            self.nodes[first as usize].prev_sibling = child;
        }
        self.nodes[child as usize].next_sibling = 0;
        self.nodes[child as usize].parent = Some(parent);
        true
    }

    /// Attaches `child` as the first child of `parent`.
    ///
    /// Returns `false` without modifying the tree when the insertion rules
    /// reject the pair.
    pub fn prepend_child(&mut self, parent: NodeIdx, child: NodeIdx) -> bool {
        if !self.insertion_allowed(parent, child) {
            return false;
        }

        let first = self.nodes[parent as usize].first_child;
        if first == 0 {
            self.nodes[child as usize].prev_sibling = child;
            self.nodes[child as usize].next_sibling = 0;
        } else {
            let last = self.nodes[first as usize].prev_sibling;
            self.nodes[child as usize].prev_sibling = last;
            self.nodes[child as usize].next_sibling = first;
            self.nodes[first as usize].prev_sibling = child;
        }
        self.nodes[parent as usize].first_child = child;
        self.nodes[child as usize].parent = Some(parent);
        true
    }

    /// Detaches the first child of `parent` whose name equals `name`.
    ///
    /// Only a matching child is ever removed; the removed node stays in the
    /// arena as a detached node.
    ///
    /// # Returns
    /// `true` if a child was removed, `false` if no child matched.
    pub fn remove_child_by_name(&mut self, parent: NodeIdx, name: &str) -> bool {
        if parent as usize >= self.nodes.len() {
            return false;
        }

        let mut previous: Option<NodeIdx> = None;
        let mut current = self.nodes[parent as usize].first_child;
        while current != 0 {
            let next = self.nodes[current as usize].next_sibling;
            if self.nodes[current as usize].name == name {
                self.unlink_child(parent, previous, current, next);
                return true;
            }
            previous = Some(current);
            current = next;
        }
        false
    }

    fn unlink_child(
        &mut self,
        parent: NodeIdx,
        previous: Option<NodeIdx>,
        child: NodeIdx,
        next: NodeIdx,
    ) {
        match previous {
            None => {
                // child was the first; the new first inherits the last-child link
                let last = self.nodes[child as usize].prev_sibling;
                self.nodes[parent as usize].first_child = next;
                if next != 0 {
                    self.nodes[next as usize].prev_sibling = last;
                }
            }
            Some(previous) => {
                self.nodes[previous as usize].next_sibling = next;
                if next != 0 {
                    self.nodes[next as usize].prev_sibling = previous;
                } else {
                    // removed the last child; retarget the first child's link
                    let first = self.nodes[parent as usize].first_child;
                    self.nodes[first as usize].prev_sibling = previous;
                }
            }
        }
        let data = &mut self.nodes[child as usize];
        data.parent = None;
        data.next_sibling = 0;
        data.prev_sibling = child;
    }

    /// Appends an attribute to the node's attribute list.
    ///
    /// Returns `false` if the node is not an element.
    pub fn append_attribute(&mut self, node: NodeIdx, attribute: Attribute) -> bool {
        match self.nodes.get_mut(node as usize) {
            Some(data) if data.is_element() => {
                data.attributes.push(attribute);
                true
            }
            _ => false,
        }
    }

    /// Inserts an attribute at the front of the node's attribute list.
    ///
    /// Returns `false` if the node is not an element.
    pub fn prepend_attribute(&mut self, node: NodeIdx, attribute: Attribute) -> bool {
        match self.nodes.get_mut(node as usize) {
            Some(data) if data.is_element() => {
                data.attributes.insert(0, attribute);
                true
            }
            _ => false,
        }
    }

    /// Removes the first attribute with the given name from the node.
    ///
    /// # Returns
    /// `true` if an attribute was removed, `false` if none matched.
    pub fn remove_attribute(&mut self, node: NodeIdx, name: &str) -> bool {
        match self.nodes.get_mut(node as usize) {
            Some(data) => match data.attributes.iter().position(|attr| attr.is(name)) {
                Some(position) => {
                    data.attributes.remove(position);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Sets the name of a node.
    ///
    /// Element names are truncated at the first whitespace character, a
    /// tolerant normalization for callers passing raw tag text. Only
    /// elements, attributes, processing instructions and declarations carry
    /// a name; the call is a no-op (returning `false`) on other kinds.
    pub fn set_name(&mut self, node: NodeIdx, name: &str) -> bool {
        let Some(data) = self.nodes.get_mut(node as usize) else {
            return false;
        };
        match data.node_type {
            NodeType::Element => {
                let end = name
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(name.len());
                data.name = name[..end].to_string();
                true
            }
            NodeType::Attribute
            | NodeType::ProcessingInstruction
            | NodeType::Declaration => {
                data.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Sets the textual value of a node.
    ///
    /// Only processing instructions, cdata, text, comments and doctypes
    /// carry a value; the call is a no-op (returning `false`) on any other
    /// kind.
    pub fn set_value(&mut self, node: NodeIdx, value: &str) -> bool {
        match self.nodes.get_mut(node as usize) {
            Some(data) if data.node_type.allows_value() => {
                data.value = value.to_string();
                true
            }
            _ => false,
        }
    }

    // ----- document-level queries -----

    /// Returns every `A` and `AREA` element of the document, in depth-first
    /// pre-order.
    pub fn links(&self) -> Vec<Node<'_>> {
        self.descendants()
            .filter(|node| node.is("A") || node.is("AREA"))
            .collect()
    }

    /// Returns the first element whose `ID` attribute equals `id`, searching
    /// in depth-first pre-order.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<div id=\"a\"><span id=\"b\"></span></div>").unwrap();
    ///
    /// assert_eq!(doc.get_element_by_id("b").unwrap().name(), "SPAN");
    /// assert!(doc.get_element_by_id("c").is_none());
    /// ```
    pub fn get_element_by_id(&self, id: &str) -> Option<Node<'_>> {
        self.descendants()
            .find(|node| node.attribute("ID") == Some(id))
    }

    /// Returns every element whose name equals `name`, in depth-first
    /// pre-order. Element names are uppercase, so `name` must be passed
    /// uppercased.
    pub fn get_elements_by_tag_name(&self, name: &str) -> Vec<Node<'_>> {
        self.descendants()
            .filter(|node| node.is_element() && node.is(name))
            .collect()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fn print_node(
            node: &Node,
            indent: usize,
            f: &mut fmt::Formatter,
        ) -> Result<(), fmt::Error> {
            for _ in 0..indent {
                write!(f, "    ")?;
            }
            match node.node_type() {
                NodeType::Element => {
                    write!(f, "Element({}", node.name())?;
                    for attr in node.attributes() {
                        write!(f, " {}=\"{}\"", attr.name(), attr.value())?;
                    }
                    writeln!(f, ")")?;
                    for child in node.children() {
                        print_node(&child, indent + 1, f)?;
                    }
                }
                kind => {
                    writeln!(f, "{:?}({:?})", kind, node.value())?;
                }
            }
            Ok(())
        }

        writeln!(f, "Document [")?;
        for child in self.document_node().children() {
            print_node(&child, 1, f)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert!(doc.root_element().is_none());
        assert_eq!(doc.document_node().node_type(), NodeType::Document);
    }

    #[test]
    fn test_document_debug_output() {
        let doc = Parser::new()
            .parse("<html><body id=\"b\">Text</body></html>")
            .unwrap();
        let printed = format!("{doc:?}");
        assert!(printed.contains("Element(HTML)"));
        assert!(printed.contains("Element(BODY ID=\"b\")"));
        assert!(printed.contains("CData(\"Text\")"));
    }

    #[test]
    fn test_sibling_links_after_removal() {
        let mut doc = Document::new();
        let parent = doc.new_node(NodeType::Element);
        doc.set_name(parent, "UL");
        doc.append_child(DOCUMENT_NODE, parent);

        for name in ["A", "B", "C"] {
            let child = doc.new_node(NodeType::Element);
            doc.set_name(child, name);
            doc.append_child(parent, child);
        }

        assert!(doc.remove_child_by_name(parent, "B"));
        let node = doc.get_node(parent).unwrap();
        let names: Vec<_> = node.children().map(|child| child.name()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(node.last_child().unwrap().name(), "C");
        assert_eq!(node.last_child().unwrap().prev_sibling().unwrap().name(), "A");
    }
}
