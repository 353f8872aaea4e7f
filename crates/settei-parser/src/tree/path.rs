//! Dotted/bracketed path resolution: `"a.b.c"`, `"a.b[2]"`, `"[0].name"`.
//! A leading `.` anchors the path at the document root rather than at the
//! setting `lookup` was called on.

use super::{Document, Kind, SettingId};

/// One step of a parsed path: a group member name or a container index.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    Member(String),
    Index(usize),
}

/// A malformed path string. `Document::lookup` swallows this into `None`
/// since lookups never surface as errors; it is exposed for callers that
/// want to report the parse failure instead (e.g. a config-editing tool).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,
    #[error("malformed path at byte {pos}: {message}")]
    InvalidSyntax { message: String, pos: usize },
}

pub fn parse(path: &str) -> Result<(bool, Vec<PathStep>), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let bytes = path.as_bytes();
    let mut pos = 0;
    let absolute = bytes[0] == b'.';
    if absolute {
        pos += 1;
    }

    let mut steps = Vec::new();
    let mut expect_step = true;

    while pos < bytes.len() {
        match bytes[pos] {
            b'[' => {
                let start = pos + 1;
                let end = path[start..]
                    .find(']')
                    .map(|i| start + i)
                    .ok_or_else(|| PathError::InvalidSyntax {
                        message: "unterminated '['".into(),
                        pos,
                    })?;
                let digits = &path[start..end];
                let idx: usize = digits.parse().map_err(|_| PathError::InvalidSyntax {
                    message: format!("expected a non-negative integer index, found '{digits}'"),
                    pos: start,
                })?;
                steps.push(PathStep::Index(idx));
                pos = end + 1;
                expect_step = false;
            }
            b'.' => {
                if expect_step {
                    return Err(PathError::InvalidSyntax {
                        message: "unexpected '.'".into(),
                        pos,
                    });
                }
                pos += 1;
                expect_step = true;
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' {
                    pos += 1;
                }
                let name = &path[start..pos];
                if name.is_empty() {
                    return Err(PathError::InvalidSyntax {
                        message: "empty path segment".into(),
                        pos: start,
                    });
                }
                steps.push(PathStep::Member(name.to_string()));
                expect_step = false;
            }
        }
    }

    if expect_step {
        return Err(PathError::InvalidSyntax {
            message: "path ends with a separator".into(),
            pos,
        });
    }

    Ok((absolute, steps))
}

pub fn resolve(doc: &Document, from: SettingId, path: &str) -> Option<SettingId> {
    let (absolute, steps) = parse(path).ok()?;
    let mut current = if absolute { doc.root() } else { from };

    for step in steps {
        current = match step {
            PathStep::Member(name) => {
                if doc.kind(current).ok()? != Kind::Group {
                    return None;
                }
                doc.get_member(current, &name)?
            }
            PathStep::Index(idx) => {
                let kind = doc.kind(current).ok()?;
                if !matches!(kind, Kind::Array | Kind::List | Kind::Group) {
                    return None;
                }
                doc.get_elem(current, idx)?
            }
        };
    }

    Some(current)
}
