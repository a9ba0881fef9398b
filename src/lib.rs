//! This is the `html_reader` crate, a permissive tree-based HTML parser.
//!
//! It reads real-world HTML — implicit tag closures, void elements, mixed
//! tag-name case, literal `<script>` bodies, comments, CDATA sections,
//! processing instructions and DOCTYPE declarations — and builds a
//! navigable document tree. Element and attribute names are canonicalized
//! to uppercase ASCII; children and attributes keep their source order.
//!
//! The parser targets the well-meaning HTML that real pages contain, with
//! a documented set of implicit-close rules and void elements; it does not
//! implement the full WHATWG parsing algorithm. Inputs the heuristics
//! cannot make sense of abort the parse with a positioned
//! [`ParseError`](error::ParseError).
//!
//! All nodes of a tree live in a single pre-allocated vector owned by the
//! [`Document`](document::Document); tree edges are vector indices, so
//! parent back-references never extend a lifetime. [`Node`](node::Node)
//! handles borrow the document and are cheap to copy.
//!
//! # Example
//!
//! ```
//! use html_reader::Parser;
//!
//! let doc = Parser::new()
//!     .parse("<html><body><p>hi<br>there</p></body></html>")
//!     .unwrap();
//!
//! let paragraph = doc.get_elements_by_tag_name("P")[0];
//!
//! assert_eq!(paragraph.text_content(), "hithere");
//! assert_eq!(paragraph.path('/'), "HTML/BODY/P");
//! ```
//!
//! A minimal tag-scanning [`Tokens`](tokenizer::Tokens) iterator is
//! available as an alternative front-end for lightweight inspection; it is
//! independent of the tree-building parser.

pub mod attribute;
pub mod defs;
pub mod document;
pub mod error;
pub mod node;
pub mod node_type;
pub mod parser;
pub mod tokenizer;

mod chartype;
mod node_data;

pub use attribute::Attribute;
pub use document::Document;
pub use error::{ParseError, ParseStatus};
pub use node::{Node, TreeWalker};
pub use node_type::NodeType;
pub use parser::{ParseOptions, Parser};
pub use tokenizer::{Token, TokenKind, Tokens};
