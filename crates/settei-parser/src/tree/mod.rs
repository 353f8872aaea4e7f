//! The owned configuration tree: a single arena of [`Node`]s addressed by
//! stable [`SettingId`] indices. Parent pointers are back-references encoded
//! as indices rather than `Rc`/`RefCell`, per the arena strategy called out
//! as an implementation option for a persistent, top-down-owned tree with
//! no internal cycles.

mod document;
mod path;

pub use document::{Document, DocumentError, ErrorKind};
pub use path::{PathError, PathStep};

use indexmap::IndexMap;

/// The nine setting kinds. `None` is transient: a freshly [`Document::add`]ed
/// scalar starts out `None` until its first typed setter gives it a value
/// and a permanent kind; it never appears in a fully parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    None,
    Int,
    Int64,
    Float,
    Bool,
    String,
    Array,
    List,
    Group,
}

impl Kind {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Int64 | Kind::Float | Kind::Bool | Kind::String
        )
    }

    pub fn is_number(self) -> bool {
        matches!(self, Kind::Int | Kind::Int64 | Kind::Float)
    }

    pub fn is_container(self) -> bool {
        matches!(self, Kind::Array | Kind::List | Kind::Group)
    }
}

/// Per-setting display format for integer kinds; meaningless otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumFormat {
    #[default]
    Default,
    Hex,
}

/// A stable handle into a [`Document`]'s arena. Never reused after the
/// setting it names is removed. A lookup against a stale id is always
/// rejected rather than silently resolving to whatever later took the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettingId(pub(crate) u32);

#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Scalar(Scalar),
    Array {
        elem_kind: Option<Kind>,
        children: Vec<SettingId>,
    },
    List {
        children: Vec<SettingId>,
    },
    Group {
        children: IndexMap<String, SettingId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Scalar {
    None,
    Int(i32),
    Int64(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl Scalar {
    pub(crate) fn kind(&self) -> Kind {
        match self {
            Scalar::None => Kind::None,
            Scalar::Int(_) => Kind::Int,
            Scalar::Int64(_) => Kind::Int64,
            Scalar::Float(_) => Kind::Float,
            Scalar::Bool(_) => Kind::Bool,
            Scalar::String(_) => Kind::String,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub name: Option<String>,
    pub parent: Option<SettingId>,
    pub file: Option<u32>,
    pub line: u32,
    pub format: NumFormat,
    pub hook: bool,
    pub payload: Payload,
    pub live: bool,
}

impl Node {
    pub(crate) fn kind(&self) -> Kind {
        match &self.payload {
            Payload::Scalar(s) => s.kind(),
            Payload::Array { .. } => Kind::Array,
            Payload::List { .. } => Kind::List,
            Payload::Group { .. } => Kind::Group,
        }
    }
}

/// Case-folds a setting name for comparison when `IGNORECASE` is active;
/// names are always stored and serialized in their original case.
pub(crate) fn name_eq(a: &str, b: &str, ignorecase: bool) -> bool {
    if ignorecase {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// `[A-Za-z*][-A-Za-z0-9_*]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '*' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '*' || c == '-')
}
