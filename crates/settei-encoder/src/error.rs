use std::path::PathBuf;

/// Failures specific to turning a [`settei_parser::Document`] back into text.
/// File I/O failures reuse the parser crate's [`settei_parser::IoError`]
/// rather than duplicating a second file-error type.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot serialize a non-finite float value")]
    NonFiniteFloat,
    #[error("cannot serialize a removed (stale) setting")]
    StaleSetting,
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] settei_parser::IoError),
}
