use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the reconciliation and repair engines.
///
/// Classification ambiguity (unsupported language, inconsistent
/// override, disallowed or non-standard template text) is never an
/// error: it is surfaced as a `BitStatus` value. These variants cover
/// lookups the caller asked for by name and document-level failures.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Named instance does not exist among the controller tags
    #[error("no controller tag named '{0}'")]
    UnknownInstance(String),

    /// Instance's AOI type has no diagnostic template in the catalog
    #[error("no diagnostic template for AOI type '{0}'")]
    UnknownTemplate(String),

    /// Document could not be loaded or saved
    #[error(transparent)]
    Document(#[from] diagsync_document::DocumentError),
}
