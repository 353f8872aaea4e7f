use std::collections::HashMap;
use std::path::{Path, PathBuf};

use settei_parser::{Document, IncludeResolver, IoError, Kind, Options};

/// An in-memory stand-in for a filesystem, so include tests don't need to
/// touch disk.
#[derive(Default)]
struct MemoryIncludes {
    files: HashMap<String, String>,
}

impl IncludeResolver for MemoryIncludes {
    fn resolve(&self, _from_dir: Option<&Path>, path: &str) -> Result<(PathBuf, String), IoError> {
        self.files
            .get(path)
            .map(|text| (PathBuf::from(path), text.clone()))
            .ok_or_else(|| IoError::Include {
                path: path.to_string(),
                message: "not found in memory store".into(),
            })
    }
}

#[test]
fn include_splices_tokens_with_correct_file_attribution() {
    let mut includes = MemoryIncludes::default();
    includes
        .files
        .insert("child.cfg".into(), "child_setting = 7;".into());

    let mut doc = Document::new();
    doc.set_include_resolver(includes);
    doc.read_string(
        r#"
        parent_setting = 1;
        @include "child.cfg"
        trailer = 2;
        "#,
    )
    .unwrap();

    let root = doc.root();
    assert_eq!(doc.length(root).unwrap(), 3);
    let child = doc.get_member(root, "child_setting").unwrap();
    assert_eq!(doc.as_int(child), Some(7));
    let (file, line) = doc.source(child).unwrap();
    assert_eq!(file, Some("child.cfg"));
    assert_eq!(line, 1);

    let trailer = doc.get_member(root, "trailer").unwrap();
    let (file, _) = doc.source(trailer).unwrap();
    assert_eq!(file, None);
}

#[test]
fn include_cycle_is_rejected_not_stack_overflowed() {
    let mut includes = MemoryIncludes::default();
    includes.files.insert("a.cfg".into(), r#"@include "b.cfg""#.into());
    includes.files.insert("b.cfg".into(), r#"@include "a.cfg""#.into());

    let mut doc = Document::new();
    doc.set_include_resolver(includes);
    let err = doc.read_string(r#"@include "a.cfg""#);
    assert!(err.is_err());
}

#[test]
fn path_lookup_resolves_mixed_member_and_index_steps() {
    let mut doc = Document::new();
    doc.read_string(
        r#"
        servers = (
          { name = "a"; port = 80; },
          { name = "b"; port = 81; }
        );
        "#,
    )
    .unwrap();

    let root = doc.root();
    assert_eq!(doc.lookup_str(root, "servers[1].name"), Some("b"));
    assert_eq!(doc.lookup_int(root, "servers[0].port"), Some(80));
    assert_eq!(doc.lookup(root, "servers[99].name"), None);
    assert_eq!(doc.lookup(root, "nonexistent.path"), None);
}

#[test]
fn try_lookup_distinguishes_missing_path_from_wrong_kind() {
    let mut doc = Document::new();
    doc.read_string(r#"name = "alice"; age = 30;"#).unwrap();
    let root = doc.root();

    assert_eq!(doc.try_lookup_int(root, "age"), Ok(Some(30)));
    assert_eq!(doc.try_lookup_int(root, "nonexistent"), Ok(None));
    assert!(doc.try_lookup_int(root, "name").is_err());
}

#[test]
fn ignorecase_option_affects_member_lookup_not_storage() {
    let mut doc = Document::new();
    doc.set_option(Options::IGNORECASE, true);
    doc.read_string("MyValue = 1;").unwrap();
    let root = doc.root();
    let found = doc.get_member(root, "myvalue").unwrap();
    assert_eq!(doc.name(found).unwrap(), Some("MyValue"));
}

#[test]
fn deep_nesting_within_limit_parses_successfully() {
    let depth = 80;
    let mut text = String::new();
    for i in 0..depth {
        text.push_str(&format!("g{i} = {{\n", i = i));
    }
    text.push_str("leaf = 1;\n");
    for _ in 0..depth {
        text.push_str("};\n");
    }

    let mut doc = Document::new();
    doc.read_string(&text).unwrap();

    let mut cursor = doc.root();
    for i in 0..depth {
        cursor = doc.get_member(cursor, &format!("g{i}")).unwrap();
    }
    let leaf = doc.get_member(cursor, "leaf").unwrap();
    assert_eq!(doc.as_int(leaf), Some(1));
}

#[test]
fn array_rejects_heterogeneous_elements_via_add() {
    let mut doc = Document::new();
    let root = doc.root();
    let array = doc.add(root, Some("a"), Kind::Array).unwrap();
    let first = doc.add(array, None, Kind::Int).unwrap();
    doc.set_int(first, 1).unwrap();
    let second = doc.add(array, None, Kind::String);
    assert!(second.is_err());
}

#[test]
fn array_rejects_heterogeneous_elements_via_add_even_with_autoconvert() {
    let mut doc = Document::new();
    doc.set_option(Options::AUTOCONVERT, true);
    let root = doc.root();
    let array = doc.add(root, Some("a"), Kind::Array).unwrap();
    let first = doc.add(array, None, Kind::Int).unwrap();
    doc.set_int(first, 1).unwrap();
    let second = doc.add(array, None, Kind::Float);
    assert!(second.is_err());
}

#[test]
fn remove_tombstones_and_stale_lookups_fail() {
    let mut doc = Document::new();
    let root = doc.root();
    let id = doc.add(root, Some("x"), Kind::Int).unwrap();
    doc.set_int(id, 5).unwrap();
    doc.remove(root, "x").unwrap();
    assert!(doc.kind(id).is_err());
    assert_eq!(doc.get_member(root, "x"), None);
}

#[test]
fn autoconvert_allows_cross_kind_setter_without_changing_kind() {
    let mut doc = Document::new();
    doc.set_option(Options::AUTOCONVERT, true);
    let root = doc.root();
    let id = doc.add(root, Some("n"), Kind::Float).unwrap();
    doc.set_float(id, 2.0).unwrap();
    doc.set_int(id, 5).unwrap();
    assert_eq!(doc.kind(id).unwrap(), Kind::Float);
    assert_eq!(doc.as_float(id), Some(5.0));
}

#[test]
fn without_autoconvert_cross_kind_setter_fails() {
    let mut doc = Document::new();
    let root = doc.root();
    let id = doc.add(root, Some("n"), Kind::Float).unwrap();
    doc.set_float(id, 2.0).unwrap();
    assert!(doc.set_int(id, 5).is_err());
}
