//! Parser for permissive HTML documents.
//!
//! This module provides the primary, character-driven front-end. It walks
//! the input byte by byte, maintains a cursor into the tree being built and
//! applies the recovery heuristics real-world HTML needs: void elements,
//! implicit closes by sibling, implicit closes by parent end tag, and
//! literal `<script>` bodies. Recovery is part of the happy path; syntax
//! the parser cannot make sense of aborts the parse with a positioned
//! [`ParseError`].

#![allow(clippy::cast_possible_truncation)]

use std::path::Path;

use kmp::kmp_find;
use log::{debug, trace};
use memchr::{memchr, memchr_iter};
use phf::{phf_map, phf_set};

use crate::attribute::Attribute;
use crate::chartype::{is_chartype, Chartype};
use crate::defs::{NodeIdx, DOCUMENT_NODE};
use crate::document::Document;
use crate::error::{ParseError, ParseStatus};
use crate::node_type::NodeType;

/// Option mask deciding which node kinds the parser materializes and which
/// normalizations it applies to textual content.
///
/// Flags combine with `|`:
///
/// ```
/// use html_reader::{ParseOptions, Parser};
///
/// let options = ParseOptions::DEFAULT | ParseOptions::COMMENTS;
/// let doc = Parser::with_options(options).parse("<p><!-- note --></p>").unwrap();
///
/// assert!(doc.root_element().unwrap().has_children());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions(u32);

impl ParseOptions {
    /// Insert processing-instruction nodes.
    pub const PI: ParseOptions = ParseOptions(0x0001);
    /// Insert comment nodes.
    pub const COMMENTS: ParseOptions = ParseOptions(0x0002);
    /// Insert `<![CDATA[…]]>` section nodes.
    pub const CDATA: ParseOptions = ParseOptions(0x0004);
    /// Keep whitespace-only text runs as nodes.
    pub const WS_PCDATA: ParseOptions = ParseOptions(0x0008);
    /// Expand character/entity references. Reserved; expansion is currently
    /// not performed.
    pub const ESCAPES: ParseOptions = ParseOptions(0x0010);
    /// Normalize `\r\n` and `\r` to `\n` in textual payloads.
    pub const EOL: ParseOptions = ParseOptions(0x0020);
    /// Replace whitespace characters in attribute values with spaces.
    pub const WCONV_ATTRIBUTE: ParseOptions = ParseOptions(0x0040);
    /// Collapse and trim attribute-value whitespace, NMTOKENS-style.
    /// Takes precedence over [`WCONV_ATTRIBUTE`](ParseOptions::WCONV_ATTRIBUTE).
    pub const WNORM_ATTRIBUTE: ParseOptions = ParseOptions(0x0080);
    /// Insert declaration nodes (`<?xml …?>`).
    pub const DECLARATION: ParseOptions = ParseOptions(0x0100);
    /// Insert doctype nodes.
    pub const DOCTYPE: ParseOptions = ParseOptions(0x0200);

    /// The default mask: `CDATA | ESCAPES | WCONV_ATTRIBUTE | EOL`.
    pub const DEFAULT: ParseOptions = ParseOptions(0x0004 | 0x0010 | 0x0040 | 0x0020);
    /// The default mask plus every insertable node kind:
    /// `DEFAULT | PI | COMMENTS | DECLARATION | DOCTYPE`.
    pub const FULL: ParseOptions =
        ParseOptions(ParseOptions::DEFAULT.0 | 0x0001 | 0x0002 | 0x0100 | 0x0200);

    /// The empty mask.
    #[must_use]
    pub const fn empty() -> ParseOptions {
        ParseOptions(0)
    }

    /// Returns `true` if every flag of `flags` is set in `self`.
    #[must_use]
    pub const fn contains(self, flags: ParseOptions) -> bool {
        (self.0 & flags.0) == flags.0
    }

    /// Returns the raw bit representation of the mask.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for ParseOptions {
    type Output = ParseOptions;

    fn bitor(self, rhs: ParseOptions) -> ParseOptions {
        ParseOptions(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ParseOptions {
    fn bitor_assign(&mut self, rhs: ParseOptions) {
        self.0 |= rhs.0;
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::DEFAULT
    }
}

/// HTML void elements: no content, no end tag.
#[rustfmt::skip]
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "AREA",
    "BASE", "BR",
    "COL",
    "EMBED",
    "HR",
    "IMG", "INPUT",
    "KEYGEN",
    "LINK",
    "MENUITEM", "META",
    "PARAM",
    "SOURCE",
    "TRACK",
    "WBR",
};

/// End tags may be omitted for some elements when a specific sibling
/// follows, e.g.
/// ```text
/// <ul>
///   <li>item1
///   <li>item2
/// </ul>
/// ```
static NO_END_TAG_BY_SIBLING: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "LI"    => &["LI"],
    "TD"    => &["TD"],
    "TR"    => &["TR", "TD"],
    "TH"    => &["TH"],
    "TBODY" => &["THEAD"],
    "DD"    => &["DD", "DT"],
    "DT"    => &["DT"],
    "P"     => &["P"],
};

/// End tags may be omitted for some elements when they are the last child
/// of their parent, e.g. `<ul><li>item1</ul>`.
static NO_END_TAG_BY_CHILD: phf::Set<&'static str> = phf_set! {
    "LI", "P", "TD", "TR", "TBODY", "THEAD", "TH", "DD",
};

/// Checks if an open element named `prev_sibling_name` is implicitly closed
/// by a following start tag named `tag_name`.
fn autoclose_prev_sibling(tag_name: &str, prev_sibling_name: &str) -> bool {
    NO_END_TAG_BY_SIBLING
        .get(tag_name)
        .is_some_and(|siblings| siblings.iter().any(|&sibling| sibling == prev_sibling_name))
}

/// Checks if an open element may be implicitly closed by its parent's end
/// tag.
fn autoclose_last_child(tag_name: &str) -> bool {
    NO_END_TAG_BY_CHILD.contains(tag_name)
}

fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name)
}

fn to_upper(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).to_ascii_uppercase()
}

/// Permissive HTML parser.
///
/// A `Parser` is configured once with a [`ParseOptions`] mask and turns
/// input text into a [`Document`]. One instance is exclusive-use for the
/// duration of a `parse` call; distinct instances are independent and may
/// run in parallel on independent inputs.
///
/// # Example
/// ```
/// use html_reader::Parser;
///
/// let doc = Parser::new().parse("<ul><li>one<li>two</ul>").unwrap();
/// let items = doc.get_elements_by_tag_name("LI");
///
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].text_content(), "one");
/// ```
pub struct Parser {
    options: ParseOptions,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    /// Creates a parser with [`ParseOptions::DEFAULT`].
    #[must_use]
    pub fn new() -> Self {
        Parser {
            options: ParseOptions::DEFAULT,
        }
    }

    /// Creates a parser with the given option mask.
    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Parser { options }
    }

    /// Returns the option mask this parser was built with.
    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parses an HTML string into a [`Document`].
    ///
    /// # Errors
    /// Returns a [`ParseError`] carrying the [`ParseStatus`] kind and a
    /// positioned message when the input cannot be parsed. Empty input is
    /// not an error: it yields an empty document.
    pub fn parse(&mut self, html: &str) -> Result<Document, ParseError> {
        self.parse_bytes(html.as_bytes())
    }

    /// Parses an HTML byte sequence into a [`Document`].
    ///
    /// The sequence may carry a terminating NUL sentinel; parsing stops at
    /// the first NUL byte or at the end of the slice, whichever comes
    /// first. Invalid UTF-8 is replaced, not rejected.
    ///
    /// # Errors
    /// Same as [`parse`](Parser::parse).
    pub fn parse_bytes(&mut self, html: &[u8]) -> Result<Document, ParseError> {
        let end = memchr(0, html).unwrap_or(html.len());
        let input = &html[..end];

        if input.is_empty() {
            debug!("empty input, returning an empty document");
            return Ok(Document::new());
        }

        let node_count = memchr_iter(b'<', input).count();

        let run = ParseRun {
            input,
            pos: 0,
            doc: Document::with_capacity(node_count),
            current: DOCUMENT_NODE,
            last_element_void: false,
            next_number: 1,
            options: self.options,
        };
        run.run()
    }

    /// Reads a file and parses its content.
    ///
    /// # Errors
    /// A file that cannot be opened maps to [`ParseStatus::FileNotFound`],
    /// a failed read to [`ParseStatus::IoError`]; parse failures are
    /// reported as by [`parse`](Parser::parse).
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Document, ParseError> {
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }
}

/// State of one `parse` call.
///
/// `current` is the cursor node new content is attached to.
/// `last_element_void` is raised after a void or self-closed element and
/// makes the next tag, text run or end-of-input pop the cursor first.
struct ParseRun<'input> {
    input: &'input [u8],
    pos: usize,
    doc: Document,
    current: NodeIdx,
    last_element_void: bool,
    next_number: u32,
    options: ParseOptions,
}

impl<'input> ParseRun<'input> {
    fn run(mut self) -> Result<Document, ParseError> {
        while self.pos < self.input.len() {
            if self.input[self.pos] == b'<' {
                self.tag_open()?;
            } else if self.current_name() == "SCRIPT" {
                self.script_body();
            } else {
                self.pcdata();
            }
        }

        self.pop_void();
        if self.current != DOCUMENT_NODE {
            let extra = format!(
                "Expected: '{}', found: end of input",
                self.current_name()
            );
            return Err(self.error_with(ParseStatus::EndElementMismatch, self.pos, &extra));
        }

        debug!("document created with {} nodes", self.doc.nodes.len());
        Ok(self.doc)
    }

    #[inline]
    fn current_name(&self) -> &str {
        &self.doc.nodes[self.current as usize].name
    }

    fn error(&self, status: ParseStatus, pos: usize) -> ParseError {
        ParseError::at_position(status, self.input, pos, "")
    }

    fn error_with(&self, status: ParseStatus, pos: usize, extra: &str) -> ParseError {
        ParseError::at_position(status, self.input, pos, extra)
    }

    #[inline]
    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len()
            && is_chartype(self.input[self.pos], Chartype::Space)
        {
            self.pos += 1;
        }
    }

    /// Moves the cursor to its parent when the last parsed element was a
    /// void element. Every tag, text run and the end of input settle the
    /// pending closure this way before doing their own work.
    fn pop_void(&mut self) {
        if self.last_element_void {
            if let Some(parent) = self.doc.nodes[self.current as usize].parent {
                self.current = parent;
            }
            self.last_element_void = false;
        }
    }

    #[inline]
    fn pop_current(&mut self) {
        if let Some(parent) = self.doc.nodes[self.current as usize].parent {
            self.current = parent;
        }
    }

    /// Creates a detached node carrying a value and attaches it to the
    /// cursor. Attachment may be rejected by the insertion rules (a doctype
    /// outside the document level); the node is silently dropped then.
    fn append_value_node(&mut self, node_type: NodeType, value: String) {
        let node_idx = self.doc.new_node(node_type);
        self.doc.nodes[node_idx as usize].value = value;
        let _ = self.doc.append_child(self.current, node_idx);
    }

    /// Collects a text run terminated by `<` or the end of input and emits
    /// it as a `CData` child of the cursor. Whitespace-only runs are
    /// dropped unless [`ParseOptions::WS_PCDATA`] is set.
    fn pcdata(&mut self) {
        let start = self.pos;
        while self.pos < self.input.len()
            && !is_chartype(self.input[self.pos], Chartype::ParsePCData)
        {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];

        if !self.options.contains(ParseOptions::WS_PCDATA)
            && text.iter().all(|&byte| is_chartype(byte, Chartype::Space))
        {
            return;
        }

        self.pop_void();
        let value = self.decode_text(text);
        self.append_value_node(NodeType::CData, value);
    }

    /// Collects a script body up to the literal `</script>` close tag
    /// (case-sensitive) and emits it as a `CData` child of the cursor. The
    /// close tag itself is left for the regular tag handling.
    fn script_body(&mut self) {
        let start = self.pos;
        let body_len = match kmp_find(b"</script>".as_slice(), &self.input[start..]) {
            Some(offset) => offset,
            None => self.input.len() - start,
        };
        self.pos = start + body_len;

        if body_len > 0 {
            let value = self.decode_text(&self.input[start..start + body_len]);
            self.append_value_node(NodeType::CData, value);
        }
    }

    /// Dispatches on the character following `<`.
    fn tag_open(&mut self) -> Result<(), ParseError> {
        let open_pos = self.pos;
        self.pos += 1;
        if self.pos >= self.input.len() {
            return Err(self.error(ParseStatus::UnrecognizedTag, open_pos));
        }

        let byte = self.input[self.pos];
        if is_chartype(byte, Chartype::StartSymbol) {
            self.start_tag()
        } else if byte == b'/' {
            self.end_tag()
        } else if byte == b'!' {
            self.exclamation()
        } else if byte == b'?' {
            self.question()
        } else {
            Err(self.error(ParseStatus::UnrecognizedTag, self.pos))
        }
    }

    fn start_tag(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.input.len()
            && is_chartype(self.input[self.pos], Chartype::Symbol)
        {
            self.pos += 1;
        }
        let tag_name = to_upper(&self.input[start..self.pos]);
        self.open_element(tag_name, start)?;

        if self.pos >= self.input.len() {
            return Err(self.error(ParseStatus::BadStartElement, self.pos));
        }
        match self.input[self.pos] {
            b'>' => {
                self.last_element_void = is_void_element(self.current_name());
            }
            b'/' => self.self_closing()?,
            byte if is_chartype(byte, Chartype::Space) => self.attribute_list()?,
            _ => return Err(self.error(ParseStatus::BadStartElement, self.pos)),
        }
        self.pos += 1; // step over the closing '>'
        Ok(())
    }

    /// Settles a pending void closure, creates the element, reparents it
    /// past implicitly closed siblings and moves the cursor onto it.
    fn open_element(&mut self, tag_name: String, err_pos: usize) -> Result<(), ParseError> {
        self.pop_void();

        let parent_idx = self.find_parent_for(&tag_name);
        trace!(
            "<{tag_name}> ({}), parent: {}",
            self.next_number,
            self.doc.nodes[parent_idx as usize].name
        );

        let node_idx = self.doc.new_node(NodeType::Element);
        {
            let data = &mut self.doc.nodes[node_idx as usize];
            data.name = tag_name;
            data.number = self.next_number;
        }
        self.next_number += 1;

        if !self.doc.append_child(parent_idx, node_idx) {
            return Err(self.error(ParseStatus::InternalError, err_pos));
        }
        self.current = node_idx;
        Ok(())
    }

    /// Finds the node a new element must be attached to, walking up past
    /// every open element the new tag implicitly closes.
    fn find_parent_for(&self, tag_name: &str) -> NodeIdx {
        let current = &self.doc.nodes[self.current as usize];
        match current.parent {
            Some(up) if autoclose_prev_sibling(tag_name, &current.name) => {
                let mut parent_idx = up;
                loop {
                    let parent = &self.doc.nodes[parent_idx as usize];
                    match parent.parent {
                        Some(next_up) if autoclose_prev_sibling(tag_name, &parent.name) => {
                            parent_idx = next_up;
                        }
                        _ => break,
                    }
                }
                parent_idx
            }
            _ => self.current,
        }
    }

    /// Handles `/` at the end of a start tag. Leaves the position on the
    /// required `>`.
    fn self_closing(&mut self) -> Result<(), ParseError> {
        self.pos += 1;
        if self.pos >= self.input.len() || self.input[self.pos] != b'>' {
            return Err(self.error(ParseStatus::BadStartElement, self.pos));
        }
        self.last_element_void = true;
        Ok(())
    }

    /// Reads the attribute list of a start tag. Returns with the position
    /// on the closing `>`.
    fn attribute_list(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                return Err(self.error(ParseStatus::BadAttribute, self.pos));
            }
            match self.input[self.pos] {
                b'/' => {
                    self.self_closing()?;
                    return Ok(());
                }
                b'>' => {
                    self.last_element_void = is_void_element(self.current_name());
                    return Ok(());
                }
                byte if is_chartype(byte, Chartype::StartSymbol) => self.attribute()?,
                _ => return Err(self.error(ParseStatus::BadStartElement, self.pos)),
            }
        }
    }

    /// Reads one attribute. `NAME`, `NAME=value`, `NAME="value"` and
    /// `NAME='value'` forms are accepted; a missing value yields the empty
    /// string.
    fn attribute(&mut self) -> Result<(), ParseError> {
        let input = self.input;

        let start = self.pos;
        while self.pos < input.len() && is_chartype(input[self.pos], Chartype::Symbol) {
            self.pos += 1;
        }
        if self.pos >= input.len() {
            return Err(self.error(ParseStatus::BadAttribute, self.pos));
        }
        let name = to_upper(&input[start..self.pos]);

        self.skip_whitespace();
        if self.pos >= input.len() {
            return Err(self.error(ParseStatus::BadAttribute, self.pos));
        }

        let mut value = String::new();
        if input[self.pos] == b'=' {
            self.pos += 1;
            self.skip_whitespace();
            if self.pos >= input.len() {
                return Err(self.error(ParseStatus::BadAttribute, self.pos));
            }

            let quote = input[self.pos];
            if quote == b'"' || quote == b'\'' {
                self.pos += 1;
                let value_start = self.pos;
                match memchr(quote, &input[self.pos..]) {
                    Some(offset) => {
                        value = self.decode_attribute(&input[value_start..value_start + offset]);
                        self.pos = value_start + offset + 1; // step over the closing quote
                    }
                    None => {
                        return Err(self.error_with(
                            ParseStatus::BadAttribute,
                            self.pos,
                            "Bad attribute value closing symbol.",
                        ));
                    }
                }
            } else {
                let value_start = self.pos;
                while self.pos < input.len()
                    && !is_chartype(input[self.pos], Chartype::ParseAttr)
                {
                    self.pos += 1;
                }
                value = self.decode_attribute(&input[value_start..self.pos]);
                self.skip_whitespace();
            }
        }

        trace!("  {name} = '{value}'");
        let attribute = Attribute::from_canonical(name, value);
        self.doc.append_attribute(self.current, attribute);
        Ok(())
    }

    fn end_tag(&mut self) -> Result<(), ParseError> {
        self.pos += 1; // step over '/'
        let start = self.pos;
        while self.pos < self.input.len()
            && is_chartype(self.input[self.pos], Chartype::Symbol)
        {
            self.pos += 1;
        }
        let tag_name = to_upper(&self.input[start..self.pos]);

        self.close_element(&tag_name, start)?;

        self.skip_whitespace();
        if self.pos >= self.input.len() || self.input[self.pos] != b'>' {
            return Err(self.error(ParseStatus::BadEndElement, self.pos));
        }
        self.pos += 1;
        Ok(())
    }

    /// Reconciles an end tag with the cursor: settles a pending void
    /// closure, then pops implicitly closable ancestors until the names
    /// agree. Disagreement after recovery aborts the parse.
    fn close_element(&mut self, tag_name: &str, err_pos: usize) -> Result<(), ParseError> {
        trace!("</{tag_name}>, current: {}", self.current_name());
        self.pop_void();

        if tag_name != self.current_name() && autoclose_last_child(self.current_name()) {
            while autoclose_last_child(self.current_name()) {
                self.pop_current();
                trace!("implicit close, current: {}", self.current_name());
                if tag_name == self.current_name() {
                    break;
                }
            }
        }

        let expected = self.current_name();
        if expected != tag_name {
            let extra = format!("Expected: '{expected}', found: '{tag_name}'");
            return Err(self.error_with(ParseStatus::EndElementMismatch, err_pos, &extra));
        }

        if self.current != DOCUMENT_NODE {
            self.pop_current();
        }
        Ok(())
    }

    /// Handles `<!`: comments, CDATA sections and DOCTYPE declarations.
    fn exclamation(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        let bang_pos = self.pos;
        self.pos += 1;
        let rest = &input[self.pos..];

        if rest.starts_with(b"--") {
            self.pos += 2;
            let start = self.pos;
            match kmp_find(b"-->".as_slice(), &self.input[start..]) {
                Some(offset) => {
                    if self.options.contains(ParseOptions::COMMENTS) {
                        let value = self.decode_text(&self.input[start..start + offset]);
                        self.append_value_node(NodeType::Comment, value);
                    }
                    self.pos = start + offset + 3;
                    Ok(())
                }
                None => Err(self.error(ParseStatus::BadComment, bang_pos)),
            }
        } else if rest.starts_with(b"[CDATA[") {
            self.pos += 7;
            let start = self.pos;
            match kmp_find(b"]]>".as_slice(), &self.input[start..]) {
                Some(offset) => {
                    if self.options.contains(ParseOptions::CDATA) {
                        let value = self.decode_text(&self.input[start..start + offset]);
                        self.append_value_node(NodeType::CData, value);
                    }
                    self.pos = start + offset + 3;
                    Ok(())
                }
                None => Err(self.error(ParseStatus::BadCdata, bang_pos)),
            }
        } else if rest.starts_with(b"DOCTYPE") {
            self.doctype(bang_pos)
        } else if rest.first() == Some(&b'-') {
            Err(self.error(ParseStatus::BadComment, bang_pos))
        } else if rest.first() == Some(&b'[') {
            Err(self.error(ParseStatus::BadCdata, bang_pos))
        } else {
            Err(self.error(ParseStatus::UnrecognizedTag, bang_pos))
        }
    }

    /// Advances past a DOCTYPE declaration, including an internal subset,
    /// and emits a `DocType` node when the option is set.
    fn doctype(&mut self, bang_pos: usize) -> Result<(), ParseError> {
        let content_start = self.pos + 7; // past "DOCTYPE"
        let end = self.advance_doctype_group(bang_pos - 1)?;
        self.pos = end;

        if self.options.contains(ParseOptions::DOCTYPE) {
            let payload = &self.input[content_start.min(end - 1)..end - 1];
            let value = self.decode_text(payload).trim().to_string();
            self.append_value_node(NodeType::DocType, value);
        }
        Ok(())
    }

    /// Advances past a `<!…>` group of the doctype grammar. Groups nest;
    /// they may contain ignore sections, quoted strings, `<?…?>` and
    /// `<!--…-->` primitives. Returns the index just past the closing `>`.
    fn advance_doctype_group(&self, start: usize) -> Result<usize, ParseError> {
        let input = self.input;
        let mut i = start + 2;

        while i < input.len() {
            if input[i] == b'<' && input.get(i + 1) == Some(&b'!') {
                if input.get(i + 2) == Some(&b'[') {
                    i = self.advance_doctype_ignore(i)?;
                } else if input.get(i + 2) == Some(&b'-') {
                    i = self.advance_doctype_primitive(i)?;
                } else {
                    i = self.advance_doctype_group(i)?;
                }
            } else if input[i] == b'<' || input[i] == b'"' || input[i] == b'\'' {
                i = self.advance_doctype_primitive(i)?;
            } else if input[i] == b'>' {
                return Ok(i + 1);
            } else {
                i += 1;
            }
        }

        Err(self.error(ParseStatus::BadDoctype, i))
    }

    /// Advances past a `<![…]]>` ignore section, which may nest itself.
    fn advance_doctype_ignore(&self, start: usize) -> Result<usize, ParseError> {
        let input = self.input;
        let mut i = start + 3;

        while i < input.len() {
            if input[i..].starts_with(b"<![") {
                i = self.advance_doctype_ignore(i)?;
            } else if input[i..].starts_with(b"]]>") {
                return Ok(i + 3);
            } else {
                i += 1;
            }
        }

        Err(self.error(ParseStatus::BadDoctype, i))
    }

    /// Advances past a non-nesting doctype primitive: a quoted string, a
    /// `<?…?>` instruction or a `<!--…-->` comment.
    fn advance_doctype_primitive(&self, start: usize) -> Result<usize, ParseError> {
        let input = self.input;
        let byte = input[start];

        if byte == b'"' || byte == b'\'' {
            match memchr(byte, &input[start + 1..]) {
                Some(offset) => Ok(start + 1 + offset + 1),
                None => Err(self.error(ParseStatus::BadDoctype, input.len())),
            }
        } else if input[start..].starts_with(b"<?") {
            match kmp_find(b"?>".as_slice(), &input[start + 2..]) {
                Some(offset) => Ok(start + 2 + offset + 2),
                None => Err(self.error(ParseStatus::BadDoctype, input.len())),
            }
        } else if input[start..].starts_with(b"<!--") {
            match kmp_find(b"-->".as_slice(), &input[start + 4..]) {
                Some(offset) => Ok(start + 4 + offset + 3),
                None => Err(self.error(ParseStatus::BadDoctype, input.len())),
            }
        } else {
            Err(self.error(ParseStatus::BadDoctype, start))
        }
    }

    /// Handles `<?`: a target of `xml` or `html` becomes a declaration,
    /// any other target a processing instruction.
    fn question(&mut self) -> Result<(), ParseError> {
        let question_pos = self.pos;
        self.pos += 1;

        if self.pos >= self.input.len()
            || !is_chartype(self.input[self.pos], Chartype::StartSymbol)
        {
            return Err(self.error(ParseStatus::BadPi, question_pos));
        }
        let start = self.pos;
        while self.pos < self.input.len()
            && is_chartype(self.input[self.pos], Chartype::Symbol)
        {
            self.pos += 1;
        }
        let target = to_upper(&self.input[start..self.pos]);

        match kmp_find(b"?>".as_slice(), &self.input[self.pos..]) {
            Some(offset) => {
                let payload = self
                    .decode_text(&self.input[self.pos..self.pos + offset])
                    .trim()
                    .to_string();
                self.pos += offset + 2;

                let is_declaration = target == "XML" || target == "HTML";
                let node_type = if is_declaration {
                    NodeType::Declaration
                } else {
                    NodeType::ProcessingInstruction
                };
                let wanted = if is_declaration {
                    ParseOptions::DECLARATION
                } else {
                    ParseOptions::PI
                };
                if self.options.contains(wanted) {
                    let node_idx = self.doc.new_node(node_type);
                    {
                        let data = &mut self.doc.nodes[node_idx as usize];
                        data.name = target;
                        data.value = payload;
                    }
                    let _ = self.doc.append_child(self.current, node_idx);
                }
                Ok(())
            }
            None => Err(self.error(ParseStatus::BadPi, question_pos)),
        }
    }

    // ----- content decoding -----

    fn decode_text(&self, bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        if self.options.contains(ParseOptions::EOL) {
            normalize_eol(&text)
        } else {
            text.into_owned()
        }
    }

    fn decode_attribute(&self, bytes: &[u8]) -> String {
        let text = String::from_utf8_lossy(bytes);
        if self.options.contains(ParseOptions::WNORM_ATTRIBUTE) {
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        } else if self.options.contains(ParseOptions::WCONV_ATTRIBUTE) {
            convert_whitespace(&text)
        } else {
            text.into_owned()
        }
    }
}

/// Replaces `\r\n` and `\r` with `\n`.
fn normalize_eol(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// CDATA-style attribute normalization: every whitespace character becomes
/// a space, with `\r\n` counting as one.
fn convert_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
