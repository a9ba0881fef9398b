//! `html_reader` definitions
//!
//! This file is part of the `html_reader` project.
//! It contains definitions and types used throughout the parser.

/// Index of a node inside the document arena.
///
/// All tree linkage (parent, siblings, first child) is expressed with these
/// indices. Index `0` is always the document node; for sibling and
/// first-child links, `0` doubles as the "no node" sentinel, since the
/// document node can never be a child or a sibling.
pub type NodeIdx = u32;

/// Arena index of the document node.
pub const DOCUMENT_NODE: NodeIdx = 0;
