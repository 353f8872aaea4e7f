//! Resolves `@include "path"` directives to file contents. The default
//! resolver reads from disk relative to [`Document::include_dir`]; callers
//! embedding configuration in something other than a filesystem (an
//! in-memory bundle, a VFS) provide their own [`IncludeResolver`].

use std::path::{Path, PathBuf};

use crate::error::IoError;

pub trait IncludeResolver: Send + Sync {
    /// Returns the resolved absolute-ish path and file contents for an
    /// `@include "path"` directive seen while parsing `from_dir`.
    fn resolve(&self, from_dir: Option<&Path>, path: &str) -> Result<(PathBuf, String), IoError>;
}

#[derive(Debug, Default)]
pub(crate) struct DefaultIncludeResolver;

impl IncludeResolver for DefaultIncludeResolver {
    fn resolve(&self, from_dir: Option<&Path>, path: &str) -> Result<(PathBuf, String), IoError> {
        let full = match from_dir {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        };
        let text = std::fs::read_to_string(&full).map_err(|source| IoError::Read {
            path: full.clone(),
            source,
        })?;
        Ok((full, text))
    }
}
