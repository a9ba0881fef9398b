//! Parse diagnostics.
//!
//! This module defines the status taxonomy reported by the parser and the
//! positioned error type carried by failed parses. Error messages embed the
//! line and column of the failure plus a short excerpt of the source so
//! callers can render them directly.

use memchr::memchr_iter;
use thiserror::Error;

/// Number of source bytes quoted in a positioned error message.
const EXCERPT_LEN: usize = 20;

/// Status of a parse, or the reason it was aborted.
///
/// The [`description`](ParseStatus::description) table is stable and intended
/// for UI rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// No error.
    Ok,
    /// The input loader could not open the file.
    FileNotFound,
    /// A read failed mid-stream.
    IoError,
    /// An allocation failed.
    OutOfMemory,
    /// An invariant violation inside the parser.
    InternalError,
    /// `<` not followed by a name, `/`, `!` or `?`.
    UnrecognizedTag,
    /// Malformed processing instruction.
    BadPi,
    /// Comment not terminated by `-->`.
    BadComment,
    /// CDATA section not terminated by `]]>`.
    BadCdata,
    /// Malformed document type declaration.
    BadDoctype,
    /// Malformed PCDATA section.
    BadPcdata,
    /// Start-tag syntax error.
    BadStartElement,
    /// Attribute name or value syntax error, or end of input inside attributes.
    BadAttribute,
    /// End tag missing its closing `>`.
    BadEndElement,
    /// End tag name does not match any unclosed ancestor.
    EndElementMismatch,
}

impl ParseStatus {
    /// Returns the human-readable description of this status.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            ParseStatus::Ok => "No error.",
            ParseStatus::FileNotFound => "File was not found.",
            ParseStatus::IoError => "Error reading from file/stream.",
            ParseStatus::OutOfMemory => "Could not allocate memory.",
            ParseStatus::InternalError => "Internal error occurred.",
            ParseStatus::UnrecognizedTag => "Could not determine tag type.",
            ParseStatus::BadPi => {
                "Error parsing document declaration/processing instruction."
            }
            ParseStatus::BadComment => "Error parsing comment.",
            ParseStatus::BadCdata => "Error parsing CDATA section.",
            ParseStatus::BadDoctype => "Error parsing document type declaration.",
            ParseStatus::BadPcdata => "Error parsing PCDATA section.",
            ParseStatus::BadStartElement => "Error parsing start element tag.",
            ParseStatus::BadAttribute => "Error parsing element attribute.",
            ParseStatus::BadEndElement => "Error parsing end element tag.",
            ParseStatus::EndElementMismatch => "Start-end tags mismatch.",
        }
    }
}

impl std::fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Error raised when a parse is aborted.
///
/// Carries the [`ParseStatus`] kind plus a formatted message of the form
/// `"<description> Line: <n>, column: <m>: '<excerpt>...'. <extra>"` when the
/// failure position is known.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    status: ParseStatus,
    message: String,
}

impl ParseError {
    /// Creates an error carrying only the status description.
    pub(crate) fn from_status(status: ParseStatus) -> Self {
        ParseError {
            status,
            message: status.description().to_string(),
        }
    }

    /// Creates an error located at a byte offset of the source.
    ///
    /// # Arguments
    /// - `status`: The failure kind.
    /// - `html`: The full source being parsed.
    /// - `pos`: The byte offset the parser last examined.
    /// - `extra`: An additional message appended to the formatted error.
    pub(crate) fn at_position(
        status: ParseStatus,
        html: &[u8],
        pos: usize,
        extra: &str,
    ) -> Self {
        ParseError {
            status,
            message: format_error_msg(status, html, pos, extra),
        }
    }

    /// Returns the parse status this error was raised with.
    #[must_use]
    pub fn status(&self) -> ParseStatus {
        self.status
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        let status = match err.kind() {
            std::io::ErrorKind::NotFound => ParseStatus::FileNotFound,
            std::io::ErrorKind::OutOfMemory => ParseStatus::OutOfMemory,
            _ => ParseStatus::IoError,
        };
        ParseError {
            status,
            message: format!("{} {err}", status.description()),
        }
    }
}

/// Formats a positioned error message.
///
/// The line number is the count of newlines before `pos`; the column is the
/// distance from the last newline (or from the start of the input on the
/// first line). Up to [`EXCERPT_LEN`] bytes of source following the failure
/// position are quoted.
fn format_error_msg(status: ParseStatus, html: &[u8], pos: usize, extra: &str) -> String {
    let pos = pos.min(html.len());

    let mut line_nr = 0;
    let mut last_newline = 0;
    for nl in memchr_iter(b'\n', &html[..pos]) {
        line_nr += 1;
        last_newline = nl;
    }
    let column = pos - last_newline;

    let excerpt_len = (html.len() - pos).min(EXCERPT_LEN);
    let excerpt = String::from_utf8_lossy(&html[pos..pos + excerpt_len]);

    format!(
        "{} Line: {}, column: {}: '{}...'. {}",
        status.description(),
        line_nr,
        column,
        excerpt,
        extra
    )
}
