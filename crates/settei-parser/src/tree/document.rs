use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{Error, IoError, LookupTypeError, ParseError, TreeError};
use crate::include::{DefaultIncludeResolver, IncludeResolver};
use crate::options::Options;
use crate::parser;

use super::{name_eq, is_valid_name, Kind, NumFormat, Node, Payload, Scalar, SettingId};

/// The three error taxonomies a document's last-error fields can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    None,
    FileIo,
    Parse,
}

/// The most recent parse or I/O failure observed by [`Document::read_string`],
/// [`Document::read_file`], or an encoder's write call. Tree-contract errors
/// never populate this: they are returned directly as `Result`s.
#[derive(Debug, Clone, Default)]
pub struct DocumentError {
    pub kind_is_parse: bool,
    pub message: String,
    pub file: Option<Arc<str>>,
    pub line: u32,
}

impl DocumentError {
    pub fn kind(&self) -> ErrorKind {
        if self.message.is_empty() {
            ErrorKind::None
        } else if self.kind_is_parse {
            ErrorKind::Parse
        } else {
            ErrorKind::FileIo
        }
    }
}

/// Numeric value supplied to a typed scalar setter, before it is converted
/// into whatever kind the target setting ends up holding.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Numeric {
    I32(i32),
    I64(i64),
    F64(f64),
}

impl Numeric {
    fn nominal_kind(self) -> Kind {
        match self {
            Numeric::I32(_) => Kind::Int,
            Numeric::I64(_) => Kind::Int64,
            Numeric::F64(_) => Kind::Float,
        }
    }

    /// Converts into a scalar of `target`, applying the truncate-toward-zero
    /// and range-check rules for lossy numeric conversions.
    fn convert_to(self, target: Kind) -> Result<Scalar, TreeError> {
        match (self, target) {
            (Numeric::I32(v), Kind::Int) => Ok(Scalar::Int(v)),
            (Numeric::I32(v), Kind::Int64) => Ok(Scalar::Int64(v as i64)),
            (Numeric::I32(v), Kind::Float) => Ok(Scalar::Float(v as f64)),
            (Numeric::I64(v), Kind::Int) => i32::try_from(v)
                .map(Scalar::Int)
                .map_err(|_| TreeError::NumericOverflow),
            (Numeric::I64(v), Kind::Int64) => Ok(Scalar::Int64(v)),
            (Numeric::I64(v), Kind::Float) => Ok(Scalar::Float(v as f64)),
            (Numeric::F64(v), Kind::Int) => {
                let truncated = v.trunc();
                if truncated.is_finite() && truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64 {
                    Ok(Scalar::Int(truncated as i32))
                } else {
                    Err(TreeError::NumericOverflow)
                }
            }
            (Numeric::F64(v), Kind::Int64) => {
                let truncated = v.trunc();
                if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
                    Ok(Scalar::Int64(truncated as i64))
                } else {
                    Err(TreeError::NumericOverflow)
                }
            }
            (Numeric::F64(v), Kind::Float) => Ok(Scalar::Float(v)),
            _ => Err(TreeError::KindMismatch),
        }
    }
}

/// The owned configuration document: arena, options, and everything the
/// parser/serializer need in order to round-trip text.
pub struct Document {
    pub(crate) arena: Vec<Node>,
    pub(crate) root: SettingId,
    pub(crate) options: Options,
    pub(crate) default_format: NumFormat,
    pub(crate) tab_width: u8,
    pub(crate) float_precision: u8,
    pub(crate) include_dir: Option<PathBuf>,
    pub(crate) include_resolver: Box<dyn IncludeResolver>,
    filenames: Vec<Arc<str>>,
    filename_index: HashMap<Arc<str>, u32>,
    hooks: HashMap<SettingId, Box<dyn Any>>,
    hook_destructor: Option<Box<dyn FnMut(Box<dyn Any>)>>,
    last_error: Option<DocumentError>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("settings", &self.arena.len())
            .field("options", &self.options)
            .field("tab_width", &self.tab_width)
            .field("float_precision", &self.float_precision)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root_node = Node {
            name: None,
            parent: None,
            file: None,
            line: 0,
            format: NumFormat::Default,
            hook: false,
            payload: Payload::Group {
                children: IndexMap::new(),
            },
            live: true,
        };
        Self {
            arena: vec![root_node],
            root: SettingId(0),
            options: Options::empty(),
            default_format: NumFormat::Default,
            tab_width: 2,
            float_precision: 6,
            include_dir: None,
            include_resolver: Box::new(DefaultIncludeResolver),
            filenames: Vec::new(),
            filename_index: HashMap::new(),
            hooks: HashMap::new(),
            hook_destructor: None,
            last_error: None,
        }
    }

    pub fn root(&self) -> SettingId {
        self.root
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    pub fn set_option(&mut self, flag: Options, enabled: bool) {
        self.options.set(flag, enabled);
    }

    pub fn option(&self, flag: Options) -> bool {
        self.options.contains(flag)
    }

    pub fn default_format(&self) -> NumFormat {
        self.default_format
    }

    pub fn set_default_format(&mut self, format: NumFormat) {
        self.default_format = format;
    }

    /// 1-15; 0 disables indentation entirely.
    pub fn tab_width(&self) -> u8 {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, width: u8) {
        self.tab_width = width.min(15);
    }

    pub fn float_precision(&self) -> u8 {
        self.float_precision
    }

    pub fn set_float_precision(&mut self, digits: u8) {
        self.float_precision = digits.clamp(1, 17);
    }

    pub fn include_dir(&self) -> Option<&Path> {
        self.include_dir.as_deref()
    }

    pub fn set_include_dir(&mut self, dir: impl Into<PathBuf>) {
        self.include_dir = Some(dir.into());
    }

    pub fn set_include_resolver(&mut self, resolver: impl IncludeResolver + 'static) {
        self.include_resolver = Box::new(resolver);
    }

    pub fn set_hook_destructor(&mut self, destructor: impl FnMut(Box<dyn Any>) + 'static) {
        self.hook_destructor = Some(Box::new(destructor));
    }

    pub fn set_hook(&mut self, id: SettingId, hook: Box<dyn Any>) {
        if let Some(node) = self.arena.get_mut(id.0 as usize) {
            node.hook = true;
        }
        self.hooks.insert(id, hook);
    }

    pub fn hook(&self, id: SettingId) -> Option<&dyn Any> {
        self.hooks.get(&id).map(|b| b.as_ref())
    }

    pub fn last_error(&self) -> Option<&DocumentError> {
        self.last_error.as_ref()
    }

    /// Resets the tree to a single empty root group. The document remains
    /// usable afterwards: options, formatting preferences, and callbacks
    /// are untouched.
    pub fn clear(&mut self) {
        self.run_hook_destructors_for_all();
        self.arena.clear();
        self.arena.push(Node {
            name: None,
            parent: None,
            file: None,
            line: 0,
            format: NumFormat::Default,
            hook: false,
            payload: Payload::Group {
                children: IndexMap::new(),
            },
            live: true,
        });
        self.root = SettingId(0);
        self.last_error = None;
    }

    fn run_hook_destructors_for_all(&mut self) {
        if self.hooks.is_empty() {
            return;
        }
        let ids: Vec<SettingId> = self.hooks.keys().copied().collect();
        for id in ids {
            self.run_hook_destructor(id);
        }
    }

    fn run_hook_destructor(&mut self, id: SettingId) {
        if let Some(hook) = self.hooks.remove(&id) {
            if let Some(destructor) = self.hook_destructor.as_mut() {
                destructor(hook);
            }
        }
    }

    // -- filename interning -------------------------------------------------

    pub(crate) fn intern_file(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.filename_index.get(name) {
            return id;
        }
        let arc: Arc<str> = Arc::from(name);
        let id = self.filenames.len() as u32;
        self.filenames.push(arc.clone());
        self.filename_index.insert(arc, id);
        id
    }

    pub(crate) fn file_name(&self, id: u32) -> &str {
        &self.filenames[id as usize]
    }

    pub(crate) fn file_arc(&self, id: u32) -> Arc<str> {
        self.filenames[id as usize].clone()
    }

    pub(crate) fn resolve_include(
        &self,
        path: &str,
    ) -> Result<(PathBuf, String), IoError> {
        self.include_resolver.resolve(self.include_dir.as_deref(), path)
    }

    // -- arena access ---------------------------------------------------------

    pub(crate) fn node(&self, id: SettingId) -> Result<&Node, TreeError> {
        self.arena
            .get(id.0 as usize)
            .filter(|n| n.live)
            .ok_or(TreeError::Stale)
    }

    pub(crate) fn node_mut(&mut self, id: SettingId) -> Result<&mut Node, TreeError> {
        self.arena
            .get_mut(id.0 as usize)
            .filter(|n| n.live)
            .ok_or(TreeError::Stale)
    }

    pub fn kind(&self, id: SettingId) -> Result<Kind, TreeError> {
        Ok(self.node(id)?.kind())
    }

    pub fn name(&self, id: SettingId) -> Result<Option<&str>, TreeError> {
        Ok(self.node(id)?.name.as_deref())
    }

    pub fn parent(&self, id: SettingId) -> Result<Option<SettingId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    pub fn is_root(&self, id: SettingId) -> bool {
        id == self.root
    }

    pub fn source(&self, id: SettingId) -> Result<(Option<&str>, u32), TreeError> {
        let node = self.node(id)?;
        Ok((node.file.map(|f| self.file_name(f)), node.line))
    }

    pub fn format(&self, id: SettingId) -> Result<NumFormat, TreeError> {
        Ok(self.node(id)?.format)
    }

    pub fn set_format(&mut self, id: SettingId, format: NumFormat) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if matches!(node.kind(), Kind::Int | Kind::Int64) {
            node.format = format;
        }
        // Non-integer settings silently retain Default; not an error.
        Ok(())
    }

    pub fn index(&self, id: SettingId) -> Result<usize, TreeError> {
        if id == self.root {
            return Ok(0);
        }
        let parent = self.node(id)?.parent.ok_or(TreeError::Stale)?;
        let siblings = self.children_of(parent)?;
        siblings
            .iter()
            .position(|&s| s == id)
            .ok_or(TreeError::Stale)
    }

    pub fn length(&self, id: SettingId) -> Result<usize, TreeError> {
        Ok(self.children_of(id)?.len())
    }

    pub(crate) fn children_of(&self, id: SettingId) -> Result<Vec<SettingId>, TreeError> {
        match &self.node(id)?.payload {
            Payload::Array { children, .. } | Payload::List { children } => Ok(children.clone()),
            Payload::Group { children } => Ok(children.values().copied().collect()),
            Payload::Scalar(_) => Err(TreeError::NotAContainer),
        }
    }

    /// All immediate children of a container, in iteration order. Empty for
    /// a scalar or a stale id rather than an error. Callers that need to
    /// distinguish "empty container" from "not a container" should check
    /// [`Document::kind`] first.
    pub fn children(&self, id: SettingId) -> Vec<SettingId> {
        self.children_of(id).unwrap_or_default()
    }

    pub fn get_elem(&self, id: SettingId, idx: usize) -> Option<SettingId> {
        self.children_of(id).ok()?.get(idx).copied()
    }

    pub fn get_member(&self, id: SettingId, name: &str) -> Option<SettingId> {
        let node = self.node(id).ok()?;
        let Payload::Group { children } = &node.payload else {
            return None;
        };
        if let Some(&found) = children.get(name) {
            return Some(found);
        }
        if self.options.contains(Options::IGNORECASE) {
            return children
                .iter()
                .find(|(n, _)| name_eq(n, name, true))
                .map(|(_, &id)| id);
        }
        None
    }

    // -- mutation ---------------------------------------------------------

    fn next_id(&self) -> SettingId {
        let len = self.arena.len();
        if len >= u32::MAX as usize {
            crate::fatal::fatal("arena exhausted: more than u32::MAX settings in one document");
        }
        SettingId(len as u32)
    }

    fn fresh_payload(kind: Kind) -> Payload {
        match kind {
            Kind::Array => Payload::Array {
                elem_kind: None,
                children: Vec::new(),
            },
            Kind::List => Payload::List {
                children: Vec::new(),
            },
            Kind::Group => Payload::Group {
                children: IndexMap::new(),
            },
            Kind::None => Payload::Scalar(Scalar::None),
            Kind::Int => Payload::Scalar(Scalar::Int(0)),
            Kind::Int64 => Payload::Scalar(Scalar::Int64(0)),
            Kind::Float => Payload::Scalar(Scalar::Float(0.0)),
            Kind::Bool => Payload::Scalar(Scalar::Bool(false)),
            Kind::String => Payload::Scalar(Scalar::String(String::new())),
        }
    }

    pub fn add(
        &mut self,
        parent: SettingId,
        name: Option<&str>,
        kind: Kind,
    ) -> Result<SettingId, TreeError> {
        self.add_with_source(parent, name, kind, None, 0)
    }

    pub(crate) fn add_with_source(
        &mut self,
        parent: SettingId,
        name: Option<&str>,
        kind: Kind,
        file: Option<u32>,
        line: u32,
    ) -> Result<SettingId, TreeError> {
        let ignorecase = self.options.contains(Options::IGNORECASE);
        {
            let parent_node = self.node(parent)?;
            match &parent_node.payload {
                Payload::Group { children } => {
                    let name = name.ok_or(TreeError::NameRequired)?;
                    if !is_valid_name(name) {
                        return Err(TreeError::InvalidName);
                    }
                    let dup = children.get(name).is_some()
                        || (ignorecase
                            && children.keys().any(|k| name_eq(k, name, true)));
                    if dup {
                        return Err(TreeError::DuplicateName);
                    }
                }
                Payload::Array { elem_kind, .. } => {
                    if name.is_some() {
                        return Err(TreeError::NameNotAllowed);
                    }
                    if !kind.is_scalar() && kind != Kind::None {
                        return Err(TreeError::HeterogeneousArray);
                    }
                    if let Some(existing) = elem_kind {
                        let compatible = *existing == kind || kind == Kind::None;
                        if !compatible {
                            return Err(TreeError::HeterogeneousArray);
                        }
                    }
                }
                Payload::List { .. } => {
                    if name.is_some() {
                        return Err(TreeError::NameNotAllowed);
                    }
                }
                Payload::Scalar(_) => return Err(TreeError::NotAContainer),
            }
        }

        let id = self.next_id();
        self.arena.push(Node {
            name: name.map(str::to_owned),
            parent: Some(parent),
            file,
            line,
            format: self.default_format,
            hook: false,
            payload: Self::fresh_payload(kind),
            live: true,
        });

        let parent_node = self.node_mut(parent)?;
        match &mut parent_node.payload {
            Payload::Group { children } => {
                children.insert(name.unwrap().to_owned(), id);
            }
            Payload::Array { elem_kind, children } => {
                if elem_kind.is_none() && kind != Kind::None {
                    *elem_kind = Some(kind);
                }
                children.push(id);
            }
            Payload::List { children } => children.push(id),
            Payload::Scalar(_) => unreachable!("validated above"),
        }

        Ok(id)
    }

    pub fn remove(&mut self, parent: SettingId, name: &str) -> Result<(), TreeError> {
        let id = self.get_member(parent, name).ok_or(TreeError::OutOfRange)?;
        let ignorecase = self.options.contains(Options::IGNORECASE);
        {
            let parent_node = self.node_mut(parent)?;
            let Payload::Group { children } = &mut parent_node.payload else {
                return Err(TreeError::NotAContainer);
            };
            let key = if children.contains_key(name) {
                name.to_owned()
            } else if ignorecase {
                children
                    .keys()
                    .find(|k| name_eq(k, name, true))
                    .cloned()
                    .ok_or(TreeError::OutOfRange)?
            } else {
                return Err(TreeError::OutOfRange);
            };
            children.shift_remove(&key);
        }
        self.tombstone_subtree(id);
        Ok(())
    }

    pub fn remove_elem(&mut self, parent: SettingId, idx: usize) -> Result<(), TreeError> {
        let id;
        {
            let parent_node = self.node_mut(parent)?;
            id = match &mut parent_node.payload {
                Payload::Array { children, elem_kind } => {
                    if idx >= children.len() {
                        return Err(TreeError::OutOfRange);
                    }
                    let removed = children.remove(idx);
                    if children.is_empty() {
                        *elem_kind = None;
                    }
                    removed
                }
                Payload::List { children } => {
                    if idx >= children.len() {
                        return Err(TreeError::OutOfRange);
                    }
                    children.remove(idx)
                }
                Payload::Group { children } => {
                    if idx >= children.len() {
                        return Err(TreeError::OutOfRange);
                    }
                    children.shift_remove_index(idx).map(|(_, v)| v).unwrap()
                }
                Payload::Scalar(_) => return Err(TreeError::NotAContainer),
            };
        }
        self.tombstone_subtree(id);
        Ok(())
    }

    fn tombstone_subtree(&mut self, id: SettingId) {
        let children = self.children_of(id).unwrap_or_default();
        for child in children {
            self.tombstone_subtree(child);
        }
        self.run_hook_destructor(id);
        if let Ok(node) = self.node_mut(id) {
            node.live = false;
        }
    }

    // -- typed scalar setters ----------------------------------------------

    fn set_numeric(&mut self, id: SettingId, input: Numeric) -> Result<(), TreeError> {
        let autoconvert = self.options.contains(Options::AUTOCONVERT);
        let in_array = {
            let parent = self.node(id)?.parent;
            parent
                .map(|p| matches!(self.node(p).map(|n| n.kind()), Ok(Kind::Array)))
                .unwrap_or(false)
        };
        let node = self.node(id)?;
        let current = node.kind();
        let nominal = input.nominal_kind();

        let scalar = if current == Kind::None {
            input.convert_to(nominal)?
        } else if current == nominal {
            input.convert_to(nominal)?
        } else if current == Kind::Int && nominal == Kind::Int64 && !in_array {
            // Widening is lossless and needs no AUTOCONVERT gate.
            input.convert_to(Kind::Int64)?
        } else if current.is_number() && !in_array {
            if !autoconvert {
                return Err(TreeError::KindMismatch);
            }
            input.convert_to(current)?
        } else if current.is_number() && in_array {
            // Homogeneity forbids an element from drifting to a different
            // kind than its array's element kind.
            if current != nominal {
                return Err(TreeError::HeterogeneousArray);
            }
            input.convert_to(current)?
        } else {
            return Err(TreeError::KindMismatch);
        };

        self.assign_scalar(id, scalar)
    }

    fn assign_scalar(&mut self, id: SettingId, scalar: Scalar) -> Result<(), TreeError> {
        let new_kind = scalar.kind();
        let node = self.node_mut(id)?;
        node.payload = Payload::Scalar(scalar);
        if !matches!(new_kind, Kind::Int | Kind::Int64) {
            node.format = NumFormat::Default;
        }
        Ok(())
    }

    pub fn set_int(&mut self, id: SettingId, value: i32) -> Result<(), TreeError> {
        self.set_numeric(id, Numeric::I32(value))
    }

    pub fn set_int64(&mut self, id: SettingId, value: i64) -> Result<(), TreeError> {
        self.set_numeric(id, Numeric::I64(value))
    }

    pub fn set_float(&mut self, id: SettingId, value: f64) -> Result<(), TreeError> {
        self.set_numeric(id, Numeric::F64(value))
    }

    pub fn set_bool(&mut self, id: SettingId, value: bool) -> Result<(), TreeError> {
        let node = self.node(id)?;
        match node.kind() {
            Kind::None | Kind::Bool => self.assign_scalar(id, Scalar::Bool(value)),
            _ => Err(TreeError::KindMismatch),
        }
    }

    pub fn set_string(&mut self, id: SettingId, value: impl Into<String>) -> Result<(), TreeError> {
        let node = self.node(id)?;
        match node.kind() {
            Kind::None | Kind::String => self.assign_scalar(id, Scalar::String(value.into())),
            _ => Err(TreeError::KindMismatch),
        }
    }

    // -- typed scalar getters (AUTOCONVERT-aware) ---------------------------

    pub fn as_int(&self, id: SettingId) -> Option<i32> {
        match self.scalar(id)? {
            Scalar::Int(v) => Some(*v),
            Scalar::Int64(v) if self.option(Options::AUTOCONVERT) => i32::try_from(*v).ok(),
            Scalar::Float(v) if self.option(Options::AUTOCONVERT) => {
                let t = v.trunc();
                (t >= i32::MIN as f64 && t <= i32::MAX as f64).then_some(t as i32)
            }
            _ => None,
        }
    }

    pub fn as_int64(&self, id: SettingId) -> Option<i64> {
        match self.scalar(id)? {
            Scalar::Int64(v) => Some(*v),
            Scalar::Int(v) if self.option(Options::AUTOCONVERT) => Some(*v as i64),
            Scalar::Float(v) if self.option(Options::AUTOCONVERT) => {
                let t = v.trunc();
                (t >= i64::MIN as f64 && t <= i64::MAX as f64).then_some(t as i64)
            }
            _ => None,
        }
    }

    pub fn as_float(&self, id: SettingId) -> Option<f64> {
        match self.scalar(id)? {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) if self.option(Options::AUTOCONVERT) => Some(*v as f64),
            Scalar::Int64(v) if self.option(Options::AUTOCONVERT) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self, id: SettingId) -> Option<bool> {
        match self.scalar(id)? {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self, id: SettingId) -> Option<&str> {
        match self.scalar(id)? {
            Scalar::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    fn scalar(&self, id: SettingId) -> Option<&Scalar> {
        match &self.node(id).ok()?.payload {
            Payload::Scalar(s) => Some(s),
            _ => None,
        }
    }

    // -- parsing entry points ------------------------------------------------

    pub fn read_string(&mut self, text: &str) -> Result<(), ParseError> {
        match parser::parse_into(self, text, None) {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(file = ?e.file, line = e.line, "parse failed: {}", e.message);
                self.clear();
                self.last_error = Some(DocumentError {
                    kind_is_parse: true,
                    message: e.message.clone(),
                    file: e.file.clone(),
                    line: e.line,
                });
                Err(e)
            }
        }
    }

    // -- path lookups ---------------------------------------------------------

    /// Resolves a dotted/bracketed path starting at `from`. Never errors:
    /// a malformed path or a missing member simply yields `None`.
    pub fn lookup(&self, from: SettingId, path: &str) -> Option<SettingId> {
        super::path::resolve(self, from, path)
    }

    pub fn lookup_int(&self, from: SettingId, path: &str) -> Option<i32> {
        self.as_int(self.lookup(from, path)?)
    }

    pub fn lookup_int64(&self, from: SettingId, path: &str) -> Option<i64> {
        self.as_int64(self.lookup(from, path)?)
    }

    pub fn lookup_float(&self, from: SettingId, path: &str) -> Option<f64> {
        self.as_float(self.lookup(from, path)?)
    }

    pub fn lookup_bool(&self, from: SettingId, path: &str) -> Option<bool> {
        self.as_bool(self.lookup(from, path)?)
    }

    pub fn lookup_str(&self, from: SettingId, path: &str) -> Option<&str> {
        self.as_str(self.lookup(from, path)?)
    }

    /// Like [`Self::lookup_int`], but distinguishes "path did not resolve"
    /// (`Ok(None)`) from "path resolved to a setting of an incompatible
    /// kind" (`Err`).
    pub fn try_lookup_int(&self, from: SettingId, path: &str) -> Result<Option<i32>, LookupTypeError> {
        match self.lookup(from, path) {
            None => Ok(None),
            Some(id) => self.as_int(id).map(Some).ok_or(LookupTypeError),
        }
    }

    pub fn try_lookup_int64(&self, from: SettingId, path: &str) -> Result<Option<i64>, LookupTypeError> {
        match self.lookup(from, path) {
            None => Ok(None),
            Some(id) => self.as_int64(id).map(Some).ok_or(LookupTypeError),
        }
    }

    pub fn try_lookup_float(&self, from: SettingId, path: &str) -> Result<Option<f64>, LookupTypeError> {
        match self.lookup(from, path) {
            None => Ok(None),
            Some(id) => self.as_float(id).map(Some).ok_or(LookupTypeError),
        }
    }

    pub fn try_lookup_bool(&self, from: SettingId, path: &str) -> Result<Option<bool>, LookupTypeError> {
        match self.lookup(from, path) {
            None => Ok(None),
            Some(id) => self.as_bool(id).map(Some).ok_or(LookupTypeError),
        }
    }

    pub fn try_lookup_str(&self, from: SettingId, path: &str) -> Result<Option<&str>, LookupTypeError> {
        match self.lookup(from, path) {
            None => Ok(None),
            Some(id) => self.as_str(id).map(Some).ok_or(LookupTypeError),
        }
    }

    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            let err = IoError::Read {
                path: path.to_path_buf(),
                source,
            };
            warn!(path = %path.display(), "failed to read config file");
            err
        })?;
        if self.include_dir.is_none() {
            if let Some(dir) = path.parent() {
                self.include_dir = Some(dir.to_path_buf());
            }
        }
        self.read_string(&text).map_err(Error::from)
    }
}
