//! Scanner, parser, tree model, and path resolver for the settei
//! configuration format: a typed, mutable document tree with group/array/
//! list containers, scalar settings, and dotted-path lookups.
//!
//! [`Document`] owns the whole tree as a flat arena addressed by
//! [`SettingId`]. Build one from text with [`Document::read_string`] or
//! [`Document::read_file`], walk it with [`Document::get_member`] /
//! [`Document::get_elem`] / [`Document::lookup`], and mutate it with
//! [`Document::add`] and the typed `set_*` methods. Serialization back to
//! text lives in the sibling `settei-encoder` crate.

mod error;
mod fatal;
mod include;
mod lexer;
mod limit;
mod options;
mod parser;
mod tree;

pub use error::{Error, IoError, LookupTypeError, ParseError, TreeError};
pub use fatal::set_fatal_error_handler;
pub use include::IncludeResolver;
pub use options::Options;
pub use tree::{is_valid_name, Document, DocumentError, ErrorKind, Kind, NumFormat, PathError, PathStep, SettingId};
