use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while loading or saving a controller document.
///
/// Only genuinely unparseable input is fatal; a document merely missing
/// expected elements is handled by `Option` returns at the access layer,
/// never by one of these.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Underlying XML is malformed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document contains no root element
    #[error("document has no root element")]
    NoRoot,

    /// Closing tag without a matching opening tag
    #[error("unbalanced element nesting near {0}")]
    Unbalanced(String),
}
