use pretty_assertions::assert_eq;
use settei_parser::{Document, Kind, NumFormat, Options};
use settei_encoder::ToConfigText;

#[test]
fn semicolon_separators_option_controls_trailing_punctuation() {
    let mut doc = Document::new();
    doc.set_option(Options::SEMICOLON_SEPARATORS, true);
    let root = doc.root();
    let id = doc.add(root, Some("x"), Kind::Int).unwrap();
    doc.set_int(id, 1).unwrap();

    let text = doc.to_config_string().unwrap();
    assert_eq!(text, "x = 1;\n");

    doc.set_option(Options::SEMICOLON_SEPARATORS, false);
    let text = doc.to_config_string().unwrap();
    assert_eq!(text, "x = 1\n");
}

#[test]
fn colon_assign_groups_only_affects_group_settings() {
    let mut doc = Document::new();
    doc.set_option(Options::COLON_ASSIGN_GROUPS, true);
    let root = doc.root();
    let group = doc.add(root, Some("g"), Kind::Group).unwrap();
    let leaf = doc.add(group, Some("leaf"), Kind::Int).unwrap();
    doc.set_int(leaf, 1).unwrap();

    let text = doc.to_config_string().unwrap();
    assert!(text.starts_with("g : {"));
    assert!(text.contains("  leaf = 1"));
}

#[test]
fn colon_assign_nongroups_affects_scalars_and_sequences() {
    let mut doc = Document::new();
    doc.set_option(Options::COLON_ASSIGN_NONGROUPS, true);
    let root = doc.root();
    let id = doc.add(root, Some("x"), Kind::Int).unwrap();
    doc.set_int(id, 5).unwrap();

    let text = doc.to_config_string().unwrap();
    assert_eq!(text, "x : 5\n");
}

#[test]
fn open_brace_on_separate_line_moves_brace_to_its_own_line() {
    let mut doc = Document::new();
    doc.set_option(Options::OPEN_BRACE_SEP_LINE, true);
    let root = doc.root();
    let group = doc.add(root, Some("g"), Kind::Group).unwrap();
    doc.add(group, Some("leaf"), Kind::Int).unwrap();

    let text = doc.to_config_string().unwrap();
    assert_eq!(text, "g = \n{\n  leaf = 0\n}\n");
}

#[test]
fn long_string_wraps_at_line_wrap_boundary() {
    let mut doc = Document::new();
    let root = doc.root();
    let id = doc.add(root, Some("s"), Kind::String).unwrap();
    let long = "a".repeat(130);
    doc.set_string(id, &long).unwrap();

    let text = doc.to_config_string().unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines.len() > 1, "expected the long string to wrap across lines: {text}");
    for line in &lines {
        let segments: Vec<&str> = line.split('"').collect();
        assert_eq!(segments.len(), 3, "expected exactly one quoted segment per line: {line}");
        assert!(segments[1].chars().count() <= 64);
    }

    let mut reparsed = Document::new();
    reparsed.read_string(&text).unwrap();
    let reread = reparsed.get_member(reparsed.root(), "s").unwrap();
    assert_eq!(reparsed.as_str(reread), Some(long.as_str()));
}

#[test]
fn int64_hex_round_trips_with_l_suffix() {
    let mut doc = Document::new();
    let root = doc.root();
    let id = doc.add(root, Some("mask"), Kind::Int64).unwrap();
    doc.set_int64(id, 0x5).unwrap();
    doc.set_format(id, NumFormat::Hex).unwrap();

    let text = doc.to_config_string().unwrap();
    assert!(text.contains("0x5L"));

    let mut reparsed = Document::new();
    reparsed.read_string(&text).unwrap();
    let reread = reparsed.get_member(reparsed.root(), "mask").unwrap();
    assert_eq!(reparsed.kind(reread).unwrap(), Kind::Int64);
    assert_eq!(reparsed.as_int64(reread), Some(0x5));
}

#[test]
fn nested_group_array_list_round_trip() {
    let mut doc = Document::new();
    doc.read_string(
        r#"
        outer = {
          inner_list = ( 1, 2.5, "three" );
          inner_array = [ 1, 2, 3 ];
          empty_group = {};
        };
        "#,
    )
    .unwrap();

    let text = doc.to_config_string().unwrap();

    let mut reparsed = Document::new();
    reparsed.read_string(&text).unwrap();
    let root = reparsed.root();
    let outer = reparsed.get_member(root, "outer").unwrap();
    let inner_list = reparsed.get_member(outer, "inner_list").unwrap();
    assert_eq!(reparsed.length(inner_list).unwrap(), 3);
    let inner_array = reparsed.get_member(outer, "inner_array").unwrap();
    assert_eq!(reparsed.length(inner_array).unwrap(), 3);
    let empty_group = reparsed.get_member(outer, "empty_group").unwrap();
    assert_eq!(reparsed.length(empty_group).unwrap(), 0);
}

#[test]
fn canonical_format_snapshot_for_a_hex_int() {
    let mut doc = Document::new();
    let root = doc.root();
    let id = doc.add(root, Some("mask"), Kind::Int).unwrap();
    doc.set_int(id, 255).unwrap();
    doc.set_format(id, NumFormat::Hex).unwrap();

    let text = doc.to_config_string().unwrap();
    insta::assert_snapshot!(text.trim_end(), @"mask = 0xFF");
}

#[test]
fn scientific_notation_used_only_past_magnitude_threshold() {
    let mut doc = Document::new();
    doc.set_option(Options::ALLOW_SCI_NOTATION, true);
    let root = doc.root();

    let small = doc.add(root, Some("small"), Kind::Float).unwrap();
    doc.set_float(small, 0.00001).unwrap();
    let normal = doc.add(root, Some("normal"), Kind::Float).unwrap();
    doc.set_float(normal, 3.5).unwrap();

    let text = doc.to_config_string().unwrap();
    assert!(text.contains("small = ") && text.to_lowercase().contains("e-"));
    assert!(text.contains("normal = 3.5"));
}
