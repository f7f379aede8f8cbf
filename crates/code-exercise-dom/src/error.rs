//! Error types for document parsing and tree manipulation.

use thiserror::Error;

/// Result type alias for code-exercise-dom operations.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while loading or mutating a [`Document`](crate::Document).
#[derive(Debug, Clone, Error)]
pub enum DomError {
    /// Markup syntax error reported by quick-xml.
    #[error("Markup syntax error at byte {position}: {message}")]
    Syntax {
        message: String,
        /// Byte offset where the error occurred.
        position: u64,
    },

    /// An end tag did not match the innermost open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Input ended while elements were still open.
    #[error("Unexpected end of input, expected closing tag </{0}>")]
    UnclosedElement(String),

    /// An end tag appeared with no open element.
    #[error("Unexpected closing tag </{0}>")]
    UnexpectedEndTag(String),

    /// Inserting the node would make it its own ancestor, or move the document root.
    #[error("Cannot insert node {child} under node {parent}")]
    HierarchyRequest { parent: usize, child: usize },

    /// The operation needs an element but the node is text or the document itself.
    #[error("Node {0} is not an element")]
    NotAnElement(usize),
}
