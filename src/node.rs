//! Node representation and navigation in a document tree.
//!
//! This module defines the `Node` struct, a lightweight handle over one
//! record of the document arena. It provides methods to access node
//! properties, navigate the tree, search descendants and serialize a
//! subtree back to text.
//!
//! # Example
//!
//! ```
//! use html_reader::Parser;
//!
//! let doc = Parser::new().parse("<html><body>Text</body></html>").unwrap();
//! let html = doc.root_element().unwrap();
//!
//! assert!(html.is("HTML"));
//!
//! let body = html.first_child().unwrap();
//!
//! assert_eq!(body.name(), "BODY");
//! assert_eq!(body.text_content(), "Text");
//! ```

use crate::attribute::Attributes;
use crate::defs::NodeIdx;
use crate::document::Document;
use crate::node_data::NodeData;
use crate::node_type::NodeType;

/// A set of callbacks driving [`Node::traverse`].
///
/// `begin` and `end` bracket the walk and default to `true`; `for_each` is
/// invoked once per visited node in depth-first pre-order with the node's
/// depth below the traversal root (immediate children are at depth 0).
/// Returning `false` from any callback aborts the traversal.
pub trait TreeWalker {
    /// Called once before the first node is visited.
    fn begin(&mut self, _node: &Node<'_>) -> bool {
        true
    }

    /// Called for each node of the subtree, in depth-first pre-order.
    fn for_each(&mut self, depth: usize, node: &Node<'_>) -> bool;

    /// Called once after the last node was visited.
    fn end(&mut self, _node: &Node<'_>) -> bool {
        true
    }
}

/// A handle to a node in a document tree.
///
/// `Node` borrows its [`Document`] and is cheap to copy. It gives access to
/// the node's kind, name, value, attributes, and to the surrounding tree.
#[derive(Clone, Copy)]
pub struct Node<'doc> {
    idx: NodeIdx,
    pub(crate) doc: &'doc Document,
}

impl<'doc> Node<'doc> {
    pub(crate) fn new(idx: NodeIdx, doc: &'doc Document) -> Self {
        Node { idx, doc }
    }

    #[inline]
    fn data(&self) -> &'doc NodeData {
        &self.doc.nodes[self.idx as usize]
    }

    /// Returns the index of the node in the document arena.
    ///
    /// The index is the node's stable identity: it never changes while the
    /// document is alive and is the key used by the mutation methods on
    /// [`Document`].
    #[inline]
    #[must_use]
    pub fn idx(&self) -> NodeIdx {
        self.idx
    }

    /// Returns the kind of this node.
    #[inline]
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.data().node_type
    }

    /// Returns the canonicalized name of the node.
    ///
    /// Element and attribute names are uppercase ASCII; text, comment and
    /// cdata nodes have an empty name.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<html></html>").unwrap();
    ///
    /// assert_eq!(doc.root_element().unwrap().name(), "HTML");
    /// ```
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'doc str {
        &self.data().name
    }

    /// Returns true if the node's name matches the provided name.
    #[inline]
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    /// Returns the textual payload of the node.
    ///
    /// Meaningful for text, cdata, comment, doctype and processing
    /// instruction nodes; empty for elements.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &'doc str {
        &self.data().value
    }

    /// Returns the parse-time sequence number of the node.
    ///
    /// Elements are numbered 1, 2, 3… in the order their opening tags were
    /// attached; nodes created through the public API carry 0.
    #[inline]
    #[must_use]
    pub fn number(&self) -> u32 {
        self.data().number
    }

    /// Returns `true` if this is the document node.
    #[inline]
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.data().node_type == NodeType::Document
    }

    /// Returns `true` if this node is an element.
    #[inline]
    #[must_use]
    pub fn is_element(&self) -> bool {
        self.data().is_element()
    }

    /// Returns `true` if this node carries character data (PCData or CData).
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self.data().node_type,
            NodeType::PCData | NodeType::CData
        )
    }

    /// Returns `true` if the node has at least one child.
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.data().first_child != 0
    }

    /// Returns the parent of this node, or `None` for the document node.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Node<'doc>> {
        self.data()
            .parent
            .map(|parent_idx| Node::new(parent_idx, self.doc))
    }

    /// Returns the root of the tree this node belongs to.
    ///
    /// For any attached node this is the document node.
    #[must_use]
    pub fn root(&self) -> Node<'doc> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Returns the first child of the node, if any.
    #[inline]
    #[must_use]
    pub fn first_child(&self) -> Option<Node<'doc>> {
        match self.data().first_child {
            0 => None,
            idx => Some(Node::new(idx, self.doc)),
        }
    }

    /// Returns the last child of the node, if any.
    ///
    /// O(1): the first child's previous-sibling slot references the last
    /// child.
    #[inline]
    #[must_use]
    pub fn last_child(&self) -> Option<Node<'doc>> {
        match self.data().first_child {
            0 => None,
            first => {
                let last = self.doc.nodes[first as usize].prev_sibling;
                Some(Node::new(last, self.doc))
            }
        }
    }

    /// Returns the next sibling of the node, if any. O(1).
    #[inline]
    #[must_use]
    pub fn next_sibling(&self) -> Option<Node<'doc>> {
        match self.data().next_sibling {
            0 => None,
            idx => Some(Node::new(idx, self.doc)),
        }
    }

    /// Returns the previous sibling of the node, if any. O(1).
    #[inline]
    #[must_use]
    pub fn prev_sibling(&self) -> Option<Node<'doc>> {
        let parent_idx = self.data().parent?;
        if self.doc.nodes[parent_idx as usize].first_child == self.idx {
            None
        } else {
            Some(Node::new(self.data().prev_sibling, self.doc))
        }
    }

    /// Returns the closest preceding sibling with the given name.
    ///
    /// Scans the parent's child list from the beginning up to this node and
    /// keeps the last match, so the result is the matching sibling nearest
    /// to `self`.
    #[must_use]
    pub fn prev_sibling_named(&self, name: &str) -> Option<Node<'doc>> {
        let parent = self.parent()?;
        let mut found = None;
        for sibling in parent.children() {
            if sibling.idx == self.idx {
                break;
            }
            if sibling.is(name) {
                found = Some(sibling);
            }
        }
        found
    }

    /// Returns the first child with the given name, if any.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<html><head></head><body></body></html>").unwrap();
    /// let html = doc.root_element().unwrap();
    ///
    /// assert!(html.child("BODY").is_some());
    /// assert!(html.child("TABLE").is_none());
    /// ```
    #[must_use]
    pub fn child(&self, name: &str) -> Option<Node<'doc>> {
        self.children().find(|child| child.is(name))
    }

    /// Returns an iterator over the children of the node, in tree order.
    #[must_use]
    pub fn children(&self) -> NodeChildren<'doc> {
        NodeChildren {
            front: self.first_child(),
            back: self.last_child(),
        }
    }

    /// Returns an iterator over all descendants of the node, in depth-first
    /// pre-order. The node itself is not included.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'doc> {
        Descendants::new(self.doc, self.idx)
    }

    /// Returns an iterator over the attributes of the node, in source order.
    #[must_use]
    pub fn attributes(&self) -> Attributes<'doc> {
        Attributes::new(&self.data().attributes)
    }

    /// Returns the value of the first attribute with the given name.
    ///
    /// Names are matched by exact string equality. The parser uppercases
    /// attribute names, so callers passing literals must uppercase them.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<a href=\"index.html\"></a>").unwrap();
    /// let link = doc.root_element().unwrap();
    ///
    /// assert_eq!(link.attribute("HREF"), Some("index.html"));
    /// assert_eq!(link.attribute("href"), None);
    /// ```
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'doc str> {
        self.data()
            .attributes
            .iter()
            .find(|attr| attr.is(name))
            .map(|attr| attr.value())
    }

    /// Concatenates the values of this node and all its descendants, in
    /// depth-first pre-order.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<p>one <b>two</b> three</p>").unwrap();
    ///
    /// assert_eq!(doc.root_element().unwrap().text_content(), "one two three");
    /// ```
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut text = String::from(self.value());
        for node in self.descendants() {
            text.push_str(node.value());
        }
        text
    }

    /// Returns the value of the first text child (PCData or CData) of this
    /// node, if any.
    #[must_use]
    pub fn child_value(&self) -> Option<&'doc str> {
        self.children()
            .find(Node::is_text)
            .map(|child| child.value())
    }

    /// Returns the [`child_value`](Node::child_value) of the first child
    /// with the given name.
    #[must_use]
    pub fn child_value_of(&self, name: &str) -> Option<&'doc str> {
        self.child(name)?.child_value()
    }

    /// Returns the first direct child satisfying the predicate. No
    /// recursion into grandchildren.
    #[must_use]
    pub fn find_child<P>(&self, pred: P) -> Option<Node<'doc>>
    where
        P: FnMut(&Node<'doc>) -> bool,
    {
        let mut pred = pred;
        self.children().find(|child| pred(child))
    }

    /// Returns the first direct child carrying the given attribute value,
    /// optionally restricted to children with the given tag name.
    #[must_use]
    pub fn find_child_by_attribute(
        &self,
        tag_name: Option<&str>,
        attr_name: &str,
        attr_value: &str,
    ) -> Option<Node<'doc>> {
        self.children().find(|child| {
            tag_name.map_or(true, |tag| child.is(tag))
                && child.attribute(attr_name) == Some(attr_value)
        })
    }

    /// Returns the first descendant satisfying the predicate, searching in
    /// depth-first pre-order.
    #[must_use]
    pub fn find_node<P>(&self, pred: P) -> Option<Node<'doc>>
    where
        P: FnMut(&Node<'doc>) -> bool,
    {
        let mut pred = pred;
        self.descendants().find(|node| pred(node))
    }

    /// Returns every descendant satisfying the predicate, in depth-first
    /// pre-order.
    #[must_use]
    pub fn find_nodes<P>(&self, pred: P) -> Vec<Node<'doc>>
    where
        P: FnMut(&Node<'doc>) -> bool,
    {
        let mut pred = pred;
        self.descendants().filter(|node| pred(node)).collect()
    }

    /// Concatenates the names of the ancestors of this node, from the root
    /// element down to the node itself, separated by `delimiter`.
    ///
    /// # Example
    /// ```
    /// use html_reader::Parser;
    ///
    /// let doc = Parser::new().parse("<html><body><a/></body></html>").unwrap();
    /// let link = doc.get_elements_by_tag_name("A")[0];
    ///
    /// assert_eq!(link.path('/'), "HTML/BODY/A");
    /// ```
    #[must_use]
    pub fn path(&self, delimiter: char) -> String {
        let mut names = Vec::new();
        let mut current = Some(*self);
        while let Some(node) = current {
            if !node.is_document() {
                names.push(node.name());
            }
            current = node.parent();
        }
        names.reverse();
        names.join(&delimiter.to_string())
    }

    /// Walks the subtree below this node in depth-first pre-order, feeding
    /// each node to `walker.for_each` with its depth (immediate children
    /// are at depth 0).
    ///
    /// Returns `false` as soon as any callback returns `false`; no further
    /// callbacks run after an abort.
    pub fn traverse<W: TreeWalker>(&self, walker: &mut W) -> bool {
        if !walker.begin(self) {
            return false;
        }

        let mut stack: Vec<(NodeIdx, usize)> = Vec::new();
        for child in self.children().rev() {
            stack.push((child.idx, 0));
        }

        while let Some((idx, depth)) = stack.pop() {
            let node = Node::new(idx, self.doc);
            if !walker.for_each(depth, &node) {
                return false;
            }
            for child in node.children().rev() {
                stack.push((child.idx, depth + 1));
            }
        }

        walker.end(self)
    }

    /// Serializes the subtree rooted at this node, one node per line,
    /// indented with one tab per depth level starting at `indent`.
    ///
    /// Elements are rendered with their attributes and close tag (or as
    /// `<NAME/>` when empty); text nodes print their value; comments,
    /// doctypes and processing instructions use their source syntax.
    #[must_use]
    pub fn to_html(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_html(&mut out, indent);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let data = self.data();
        match data.node_type {
            NodeType::Document => {
                for child in self.children() {
                    child.write_html(out, depth);
                }
            }
            NodeType::Element => {
                push_tabs(out, depth);
                out.push('<');
                out.push_str(&data.name);
                for attr in &data.attributes {
                    out.push(' ');
                    out.push_str(attr.name());
                    out.push_str("=\"");
                    out.push_str(attr.value());
                    out.push('"');
                }
                if self.has_children() {
                    out.push_str(">\n");
                    for child in self.children() {
                        child.write_html(out, depth + 1);
                    }
                    push_tabs(out, depth);
                    out.push_str("</");
                    out.push_str(&data.name);
                    out.push_str(">\n");
                } else {
                    out.push_str("/>\n");
                }
            }
            NodeType::PCData | NodeType::CData => {
                push_tabs(out, depth);
                out.push_str(&data.value);
                out.push('\n');
            }
            NodeType::Comment => {
                push_tabs(out, depth);
                out.push_str("<!--");
                out.push_str(&data.value);
                out.push_str("-->\n");
            }
            NodeType::DocType => {
                push_tabs(out, depth);
                out.push_str("<!DOCTYPE ");
                out.push_str(&data.value);
                out.push_str(">\n");
            }
            NodeType::ProcessingInstruction | NodeType::Declaration => {
                push_tabs(out, depth);
                out.push_str("<?");
                out.push_str(&data.name);
                if !data.value.is_empty() {
                    out.push(' ');
                    out.push_str(&data.value);
                }
                out.push_str("?>\n");
            }
            NodeType::Null | NodeType::Attribute => {}
        }
    }
}

fn push_tabs(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('\t');
    }
}

impl<'doc> Eq for Node<'doc> {}

impl<'doc> PartialEq for Node<'doc> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.idx == other.idx && std::ptr::eq(self.doc, other.doc)
    }
}

impl<'doc> std::fmt::Debug for Node<'doc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node_type() {
            NodeType::Element => write!(f, "Element({})", self.name()),
            NodeType::PCData | NodeType::CData => {
                write!(f, "{:?}({:?})", self.node_type(), self.value())
            }
            other => write!(f, "{other:?}"),
        }
    }
}

/// Iterator over the children of a node.
///
/// Walks the sibling chain in both directions.
///
/// # Example
///
/// ```
/// use html_reader::Parser;
///
/// let doc = Parser::new().parse("<ul><li>1</li><li>2</li></ul>").unwrap();
/// let list = doc.root_element().unwrap();
/// let items: Vec<_> = list.children().collect();
///
/// assert_eq!(items.len(), 2);
/// assert!(items[0].is("LI"));
/// assert!(items[1].is("LI"));
/// ```
pub struct NodeChildren<'doc> {
    front: Option<Node<'doc>>,
    back: Option<Node<'doc>>,
}

impl<'doc> Iterator for NodeChildren<'doc> {
    type Item = Node<'doc>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            let node = self.front.take();
            self.back = None;
            node
        } else {
            let node = self.front.take();
            self.front = node.as_ref().and_then(Node::next_sibling);
            node
        }
    }
}

impl<'doc> DoubleEndedIterator for NodeChildren<'doc> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back == self.front {
            let node = self.back.take();
            self.front = None;
            node
        } else {
            let node = self.back.take();
            self.back = node.as_ref().and_then(Node::prev_sibling);
            node
        }
    }
}

/// Iterator over the descendants of a node, in depth-first pre-order.
///
/// Pre-order with an explicit stack: a node is yielded before any of its
/// children, children before following siblings.
pub struct Descendants<'doc> {
    doc: &'doc Document,
    stack: Vec<NodeIdx>,
}

impl<'doc> Descendants<'doc> {
    pub(crate) fn new(doc: &'doc Document, start: NodeIdx) -> Self {
        let mut stack = Vec::new();
        for child in Node::new(start, doc).children().rev() {
            stack.push(child.idx());
        }
        Descendants { doc, stack }
    }
}

impl<'doc> Iterator for Descendants<'doc> {
    type Item = Node<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = Node::new(idx, self.doc);
        for child in node.children().rev() {
            self.stack.push(child.idx());
        }
        Some(node)
    }
}
