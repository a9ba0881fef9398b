//! Node kinds of the document tree.
//!
//! Every node in the tree carries one of these kinds. The kind decides which
//! payload fields are meaningful (name, value) and which structural
//! operations are permitted (receiving children, carrying a value).

/// The kind of a tree node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeType {
    /// Empty node.
    Null,
    /// A document tree's absolute root.
    Document,
    /// Element tag, i.e. `<node/>`.
    Element,
    /// A tree node's attribute, i.e. `href="foo.bar"`.
    Attribute,
    /// Plain character data, i.e. `text`.
    #[default]
    PCData,
    /// Character data, i.e. `<![CDATA[text]]>`.
    CData,
    /// Comment tag, i.e. `<!-- text -->`.
    Comment,
    /// Processing instruction, i.e. `<?name?>`.
    ProcessingInstruction,
    /// Document declaration, i.e. `<?xml version="1.0"?>`.
    Declaration,
    /// Document type declaration, i.e. `<!DOCTYPE doc>`.
    DocType,
}

impl NodeType {
    /// Returns `true` for the kinds that may receive children.
    #[inline]
    #[must_use]
    pub fn allows_children(self) -> bool {
        matches!(self, NodeType::Document | NodeType::Element)
    }

    /// Returns `true` for the kinds that carry a textual value.
    #[inline]
    #[must_use]
    pub fn allows_value(self) -> bool {
        matches!(
            self,
            NodeType::ProcessingInstruction
                | NodeType::CData
                | NodeType::PCData
                | NodeType::Comment
                | NodeType::DocType
        )
    }
}
