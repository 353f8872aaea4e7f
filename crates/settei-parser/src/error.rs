//! Parse errors, I/O errors, and tree-contract errors are kept as distinct
//! types rather than one shared struct, since only the first two ever
//! populate [`crate::Document`]'s last-error fields. Contract errors are
//! plain `Result`s the caller is expected to handle locally.

use std::path::PathBuf;
use std::sync::Arc;

/// A syntactic or semantic violation encountered while reading a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({file}:{line})", file = file.as_deref().unwrap_or("<string>"))]
pub struct ParseError {
    pub message: String,
    pub file: Option<Arc<str>>,
    pub line: u32,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, file: Option<Arc<str>>, line: u32) -> Self {
        Self {
            message: message.into(),
            file,
            line,
        }
    }
}

/// File open/read/write failures, including include resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve include {path:?}: {message}")]
    Include { path: String, message: String },
}

/// Top-level error returned by [`crate::Document`] read/write entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Invalid-usage errors from the tree mutation API. These never touch the
/// document's last-error fields. Callers validate their own usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("setting is not a container")]
    NotAContainer,
    #[error("a name is required for a member of a group")]
    NameRequired,
    #[error("a name is not allowed outside of a group")]
    NameNotAllowed,
    #[error("invalid setting name")]
    InvalidName,
    #[error("duplicate name within group")]
    DuplicateName,
    #[error("index out of range")]
    OutOfRange,
    #[error("array elements must be scalar and share one kind")]
    HeterogeneousArray,
    #[error("kind does not match and cannot be converted")]
    KindMismatch,
    #[error("value does not fit in the target numeric kind")]
    NumericOverflow,
    #[error("format is only applicable to integer-kind settings")]
    FormatNotApplicable,
    #[error("the setting has been removed")]
    Stale,
    #[error("the target setting is the root group")]
    IsRoot,
}

/// Failure of a typed `try_lookup_<kind>` call: the path resolved but to a
/// setting of an incompatible kind. A path that fails to resolve at all is
/// not an error, it is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("resolved setting is not convertible to the requested kind")]
pub struct LookupTypeError;
