//! Recursive-descent parser with one token of lookahead. Tokenization is
//! eager per file; an `@include` directive pushes a whole already-tokenized
//! frame onto a stack rather than threading a nested call into the lexer,
//! which is what lets an included file's tokens simply replace the
//! enclosing stream until it runs dry.

use std::sync::Arc;

use crate::error::ParseError;
use crate::lexer::{self, Token, TokenKind};
use crate::limit::{LimitTracker, DEFAULT_RECURSION_LIMIT};
use crate::options::Options;
use crate::tree::{is_valid_name, Document, Kind, SettingId};

struct Frame {
    tokens: Vec<Token>,
    pos: usize,
    file_id: Option<u32>,
    included_path: Option<String>,
}

struct State {
    frames: Vec<Frame>,
    limit: LimitTracker,
    options: Options,
}

impl State {
    fn sync(&mut self) {
        while self.frames.len() > 1 {
            let f = self.frames.last().unwrap();
            if matches!(f.tokens[f.pos].kind, TokenKind::Eof) {
                let finished = self.frames.pop().unwrap();
                if finished.included_path.is_some() {
                    self.limit.release();
                }
            } else {
                break;
            }
        }
    }

    fn peek(&mut self) -> TokenKind {
        self.sync();
        let f = self.frames.last().unwrap();
        f.tokens[f.pos].kind.clone()
    }

    fn peek_line(&mut self) -> u32 {
        self.sync();
        let f = self.frames.last().unwrap();
        f.tokens[f.pos].line
    }

    fn peek_preceded_by_newline(&mut self) -> bool {
        self.sync();
        let f = self.frames.last().unwrap();
        f.tokens[f.pos].preceded_by_newline
    }

    fn advance(&mut self) -> Token {
        self.sync();
        let f = self.frames.last_mut().unwrap();
        let tok = f.tokens[f.pos].clone();
        if !matches!(tok.kind, TokenKind::Eof) {
            f.pos += 1;
        }
        tok
    }

    fn current_file_id(&mut self) -> Option<u32> {
        self.sync();
        self.frames.last().unwrap().file_id
    }

    fn current_file_arc(&mut self, doc: &Document) -> Option<Arc<str>> {
        self.current_file_id().map(|id| doc.file_arc(id))
    }

    fn error_at(&mut self, doc: &Document, message: impl Into<String>, line: u32) -> ParseError {
        ParseError::new(message, self.current_file_arc(doc), line)
    }

    fn error(&mut self, doc: &Document, message: impl Into<String>) -> ParseError {
        let line = self.peek_line();
        self.error_at(doc, message, line)
    }
}

/// Parses `text` into `doc`'s arena, grafting everything under `doc.root()`.
/// `file` names the source for error messages and setting provenance; pass
/// `None` for in-memory strings with no file of their own.
pub(crate) fn parse_into(doc: &mut Document, text: &str, file: Option<&str>) -> Result<(), ParseError> {
    let file_id = file.map(|f| doc.intern_file(f));
    let tokens = tag_tokenize(doc, text, file_id)?;

    let mut state = State {
        frames: vec![Frame {
            tokens,
            pos: 0,
            file_id,
            included_path: None,
        }],
        limit: LimitTracker::new(DEFAULT_RECURSION_LIMIT),
        options: doc.options(),
    };

    let root = doc.root();
    parse_setting_list(doc, &mut state, root)?;

    if !matches!(state.peek(), TokenKind::Eof) {
        let line = state.peek_line();
        return Err(state.error_at(doc, "expected end of input", line));
    }

    Ok(())
}

fn tag_tokenize(doc: &Document, text: &str, file_id: Option<u32>) -> Result<Vec<Token>, ParseError> {
    lexer::tokenize(text).map_err(|e| {
        let file = file_id.map(|id| doc.file_arc(id));
        ParseError::new(e.message, file, e.line)
    })
}

fn parse_setting_list(doc: &mut Document, state: &mut State, parent: SettingId) -> Result<(), ParseError> {
    loop {
        skip_includes(doc, state)?;
        match state.peek() {
            TokenKind::Eof | TokenKind::RBrace => return Ok(()),
            TokenKind::Ident(_) => parse_setting(doc, state, parent)?,
            other => {
                let line = state.peek_line();
                return Err(state.error_at(doc, format!("expected a setting name, found {}", other.describe()), line));
            }
        }
    }
}

fn skip_includes(doc: &mut Document, state: &mut State) -> Result<(), ParseError> {
    while let TokenKind::Include(_) = state.peek() {
        let tok = state.advance();
        let TokenKind::Include(path) = tok.kind else {
            unreachable!()
        };
        do_include(doc, state, &path, tok.line)?;
    }
    Ok(())
}

fn do_include(doc: &mut Document, state: &mut State, raw_path: &str, line: u32) -> Result<(), ParseError> {
    let (resolved, text) = doc
        .resolve_include(raw_path)
        .map_err(|e| state.error_at(doc, format!("failed to resolve include '{raw_path}': {e}"), line))?;
    let canon = resolved.to_string_lossy().into_owned();

    if state
        .frames
        .iter()
        .any(|f| f.included_path.as_deref() == Some(canon.as_str()))
    {
        return Err(state.error_at(
            doc,
            format!("include cycle detected: '{raw_path}' is already being processed"),
            line,
        ));
    }

    if state.limit.limited() {
        return Err(state.error_at(doc, "maximum include depth exceeded", line));
    }

    let file_id = doc.intern_file(&canon);
    let tokens = tag_tokenize(doc, &text, Some(file_id))?;

    state.limit.consume();
    state.frames.push(Frame {
        tokens,
        pos: 0,
        file_id: Some(file_id),
        included_path: Some(canon),
    });
    Ok(())
}

fn parse_setting(doc: &mut Document, state: &mut State, parent: SettingId) -> Result<(), ParseError> {
    let name_tok = state.advance();
    let (name, line) = match name_tok.kind {
        TokenKind::Ident(s) => (s, name_tok.line),
        _ => unreachable!("caller already peeked an Ident"),
    };
    if !is_valid_name(&name) {
        return Err(state.error_at(doc, format!("invalid setting name '{name}'"), line));
    }

    let used_colon = match state.peek() {
        TokenKind::Eq => {
            state.advance();
            false
        }
        TokenKind::Colon => {
            state.advance();
            true
        }
        other => {
            return Err(state.error_at(
                doc,
                format!("expected '=' or ':' after setting name, found {}", other.describe()),
                line,
            ))
        }
    };

    let allow_overrides = state.options.contains(Options::ALLOW_OVERRIDES);
    if let Some(existing) = doc.get_member(parent, &name) {
        if !allow_overrides {
            return Err(state.error_at(doc, format!("duplicate setting name '{name}'"), line));
        }
        let _ = existing;
        doc.remove(parent, &name)
            .map_err(|e| state.error_at(doc, format!("failed to override '{name}': {e}"), line))?;
    }

    let file_id = state.current_file_id();
    let id = parse_value(doc, state, parent, Some(&name), file_id, line)?;

    if used_colon {
        let kind = doc.kind(id).map_err(|e| state.error_at(doc, e.to_string(), line))?;
        let allowed = if kind == Kind::Group {
            state.options.contains(Options::COLON_ASSIGN_GROUPS)
        } else {
            state.options.contains(Options::COLON_ASSIGN_NONGROUPS)
        };
        if !allowed {
            return Err(state.error_at(
                doc,
                format!("':' assignment is not enabled for setting '{name}'"),
                line,
            ));
        }
    }

    consume_separator(doc, state)?;
    Ok(())
}

/// Enforces the setting-list separator rule: between two settings at
/// least one of newline, `;`, or `,` is required, and `;` is required
/// rather than merely accepted when `SEMICOLON_SEPARATORS` is set. No
/// separator is required before the closing `}` or end of input.
fn consume_separator(doc: &mut Document, state: &mut State) -> Result<(), ParseError> {
    let semicolon_required = state.options.contains(Options::SEMICOLON_SEPARATORS);

    if matches!(state.peek(), TokenKind::Eof | TokenKind::RBrace) {
        return Ok(());
    }

    match state.peek() {
        TokenKind::Semicolon => {
            state.advance();
            return Ok(());
        }
        TokenKind::Comma => {
            if semicolon_required {
                let line = state.peek_line();
                return Err(state.error_at(
                    doc,
                    "expected ';' between settings (SEMICOLON_SEPARATORS is set)",
                    line,
                ));
            }
            state.advance();
            return Ok(());
        }
        _ => {}
    }

    if semicolon_required {
        let line = state.peek_line();
        return Err(state.error_at(
            doc,
            "expected ';' between settings (SEMICOLON_SEPARATORS is set)",
            line,
        ));
    }

    if !state.peek_preceded_by_newline() {
        let line = state.peek_line();
        return Err(state.error_at(
            doc,
            "expected a newline, ';', or ',' between settings",
            line,
        ));
    }
    Ok(())
}

fn parse_value(
    doc: &mut Document,
    state: &mut State,
    parent: SettingId,
    name: Option<&str>,
    file_id: Option<u32>,
    line: u32,
) -> Result<SettingId, ParseError> {
    match state.peek() {
        TokenKind::LBrace => parse_group(doc, state, parent, name, file_id, line),
        TokenKind::LBracket => parse_array(doc, state, parent, name, file_id, line),
        TokenKind::LParen => parse_list(doc, state, parent, name, file_id, line),
        TokenKind::Int { value, width64, format } => {
            state.advance();
            let kind = if width64 { Kind::Int64 } else { Kind::Int };
            let id = doc
                .add_with_source(parent, name, kind, file_id, line)
                .map_err(|e| state.error_at(doc, e.to_string(), line))?;
            if width64 {
                let _ = doc.set_int64(id, value);
            } else {
                let _ = doc.set_int(id, value as i32);
            }
            let _ = doc.set_format(id, format);
            Ok(id)
        }
        TokenKind::Float { value, scientific } => {
            state.advance();
            if scientific && !state.options.contains(Options::ALLOW_SCI_NOTATION) {
                return Err(state.error_at(
                    doc,
                    "scientific notation is not enabled for this document",
                    line,
                ));
            }
            let id = doc
                .add_with_source(parent, name, Kind::Float, file_id, line)
                .map_err(|e| state.error_at(doc, e.to_string(), line))?;
            let _ = doc.set_float(id, value);
            Ok(id)
        }
        TokenKind::Str(first) => {
            state.advance();
            let mut combined = first;
            while let TokenKind::Str(more) = state.peek() {
                state.advance();
                combined.push_str(&more);
            }
            let id = doc
                .add_with_source(parent, name, Kind::String, file_id, line)
                .map_err(|e| state.error_at(doc, e.to_string(), line))?;
            let _ = doc.set_string(id, combined);
            Ok(id)
        }
        TokenKind::Ident(word) if word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false") => {
            state.advance();
            let value = word.eq_ignore_ascii_case("true");
            let id = doc
                .add_with_source(parent, name, Kind::Bool, file_id, line)
                .map_err(|e| state.error_at(doc, e.to_string(), line))?;
            let _ = doc.set_bool(id, value);
            Ok(id)
        }
        other => Err(state.error_at(doc, format!("expected a value, found {}", other.describe()), line)),
    }
}

fn parse_group(
    doc: &mut Document,
    state: &mut State,
    parent: SettingId,
    name: Option<&str>,
    file_id: Option<u32>,
    line: u32,
) -> Result<SettingId, ParseError> {
    state.advance(); // '{'
    if state.limit.limited() {
        return Err(state.error_at(doc, "maximum nesting depth exceeded", line));
    }
    state.limit.consume();

    let id = doc
        .add_with_source(parent, name, Kind::Group, file_id, line)
        .map_err(|e| state.error_at(doc, e.to_string(), line))?;

    parse_setting_list(doc, state, id)?;

    match state.peek() {
        TokenKind::RBrace => {
            state.advance();
        }
        other => {
            let line = state.peek_line();
            return Err(state.error_at(doc, format!("expected '}}', found {}", other.describe()), line));
        }
    }

    state.limit.release();
    Ok(id)
}

fn parse_array(
    doc: &mut Document,
    state: &mut State,
    parent: SettingId,
    name: Option<&str>,
    file_id: Option<u32>,
    line: u32,
) -> Result<SettingId, ParseError> {
    state.advance(); // '['
    if state.limit.limited() {
        return Err(state.error_at(doc, "maximum nesting depth exceeded", line));
    }
    state.limit.consume();

    let id = doc
        .add_with_source(parent, name, Kind::Array, file_id, line)
        .map_err(|e| state.error_at(doc, e.to_string(), line))?;

    loop {
        if matches!(state.peek(), TokenKind::RBracket) {
            break;
        }
        let elem_line = state.peek_line();
        if matches!(state.peek(), TokenKind::LBrace | TokenKind::LBracket | TokenKind::LParen) {
            return Err(state.error_at(doc, "array elements must be scalar values", elem_line));
        }
        let file_id = state.current_file_id();
        parse_value(doc, state, id, None, file_id, elem_line)?;

        match state.peek() {
            TokenKind::Comma => {
                state.advance();
            }
            TokenKind::RBracket => break,
            other => {
                let line = state.peek_line();
                return Err(state.error_at(doc, format!("expected ',' or ']', found {}", other.describe()), line));
            }
        }
    }

    match state.peek() {
        TokenKind::RBracket => {
            state.advance();
        }
        other => {
            let line = state.peek_line();
            return Err(state.error_at(doc, format!("expected ']', found {}", other.describe()), line));
        }
    }

    state.limit.release();
    Ok(id)
}

fn parse_list(
    doc: &mut Document,
    state: &mut State,
    parent: SettingId,
    name: Option<&str>,
    file_id: Option<u32>,
    line: u32,
) -> Result<SettingId, ParseError> {
    state.advance(); // '('
    if state.limit.limited() {
        return Err(state.error_at(doc, "maximum nesting depth exceeded", line));
    }
    state.limit.consume();

    let id = doc
        .add_with_source(parent, name, Kind::List, file_id, line)
        .map_err(|e| state.error_at(doc, e.to_string(), line))?;

    loop {
        if matches!(state.peek(), TokenKind::RParen) {
            break;
        }
        let elem_line = state.peek_line();
        let file_id = state.current_file_id();
        parse_value(doc, state, id, None, file_id, elem_line)?;

        match state.peek() {
            TokenKind::Comma => {
                state.advance();
            }
            TokenKind::RParen => break,
            other => {
                let line = state.peek_line();
                return Err(state.error_at(doc, format!("expected ',' or ')', found {}", other.describe()), line));
            }
        }
    }

    match state.peek() {
        TokenKind::RParen => {
            state.advance();
        }
        other => {
            let line = state.peek_line();
            return Err(state.error_at(doc, format!("expected ')', found {}", other.describe()), line));
        }
    }

    state.limit.release();
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Kind;

    fn parse(text: &str) -> Document {
        let mut doc = Document::new();
        doc.read_string(text).expect("parse should succeed");
        doc
    }

    #[test]
    fn parses_basic_scalars() {
        let doc = parse(r#"name = "alice"; age = 30; pi = 3.5;"#);
        let root = doc.root();
        let name = doc.get_member(root, "name").unwrap();
        assert_eq!(doc.as_str(name), Some("alice"));
        let age = doc.get_member(root, "age").unwrap();
        assert_eq!(doc.as_int(age), Some(30));
        assert_eq!(doc.kind(age).unwrap(), Kind::Int);
    }

    #[test]
    fn rejects_duplicate_names_by_default() {
        let mut doc = Document::new();
        let err = doc.read_string("a = 1; a = 2;");
        assert!(err.is_err());
    }

    #[test]
    fn allow_overrides_replaces_prior_value() {
        let mut doc = Document::new();
        doc.set_option(Options::ALLOW_OVERRIDES, true);
        doc.read_string("a = 1; a = 2;").unwrap();
        let root = doc.root();
        let a = doc.get_member(root, "a").unwrap();
        assert_eq!(doc.as_int(a), Some(2));
        assert_eq!(doc.length(root).unwrap(), 1);
    }

    #[test]
    fn rejects_heterogeneous_array() {
        let mut doc = Document::new();
        let err = doc.read_string("a = [1, \"two\"];");
        assert!(err.is_err());
    }

    #[test]
    fn rejects_scientific_notation_when_disabled() {
        let mut doc = Document::new();
        let err = doc.read_string("a = 1.5e10;");
        assert!(err.is_err());
    }

    #[test]
    fn allows_scientific_notation_when_enabled() {
        let mut doc = Document::new();
        doc.set_option(Options::ALLOW_SCI_NOTATION, true);
        doc.read_string("a = 1.5e10;").unwrap();
        let root = doc.root();
        let a = doc.get_member(root, "a").unwrap();
        assert_eq!(doc.as_float(a), Some(1.5e10));
    }

    #[test]
    fn rejects_settings_with_no_separator_between_them() {
        let mut doc = Document::new();
        let err = doc.read_string("a=1 b=2");
        assert!(err.is_err());
    }

    #[test]
    fn newline_alone_separates_settings() {
        let mut doc = Document::new();
        doc.read_string("a = 1\nb = 2\n").unwrap();
        let root = doc.root();
        assert_eq!(doc.as_int(doc.get_member(root, "a").unwrap()), Some(1));
        assert_eq!(doc.as_int(doc.get_member(root, "b").unwrap()), Some(2));
    }

    #[test]
    fn comma_alone_separates_settings() {
        let mut doc = Document::new();
        doc.read_string("a = 1, b = 2,").unwrap();
        let root = doc.root();
        assert_eq!(doc.as_int(doc.get_member(root, "a").unwrap()), Some(1));
        assert_eq!(doc.as_int(doc.get_member(root, "b").unwrap()), Some(2));
    }

    #[test]
    fn no_separator_required_before_closing_brace_or_eof() {
        let mut doc = Document::new();
        doc.read_string("g = { a = 1 }").unwrap();
        let root = doc.root();
        let g = doc.get_member(root, "g").unwrap();
        assert_eq!(doc.as_int(doc.get_member(g, "a").unwrap()), Some(1));
    }

    #[test]
    fn semicolon_separators_option_rejects_comma_and_bare_newline() {
        let mut doc = Document::new();
        doc.set_option(Options::SEMICOLON_SEPARATORS, true);
        assert!(doc.read_string("a = 1, b = 2;").is_err());

        let mut doc = Document::new();
        doc.set_option(Options::SEMICOLON_SEPARATORS, true);
        assert!(doc.read_string("a = 1\nb = 2;").is_err());

        let mut doc = Document::new();
        doc.set_option(Options::SEMICOLON_SEPARATORS, true);
        doc.read_string("a = 1; b = 2;").unwrap();
    }

    #[test]
    fn colon_rejected_for_group_without_colon_assign_groups() {
        let mut doc = Document::new();
        let err = doc.read_string("g : { x = 1; };");
        assert!(err.is_err());
    }

    #[test]
    fn colon_accepted_for_group_with_colon_assign_groups() {
        let mut doc = Document::new();
        doc.set_option(Options::COLON_ASSIGN_GROUPS, true);
        doc.read_string("g : { x = 1; };").unwrap();
    }

    #[test]
    fn colon_rejected_for_scalar_without_colon_assign_nongroups() {
        let mut doc = Document::new();
        let err = doc.read_string("x : 1;");
        assert!(err.is_err());
    }

    #[test]
    fn colon_accepted_for_scalar_with_colon_assign_nongroups() {
        let mut doc = Document::new();
        doc.set_option(Options::COLON_ASSIGN_NONGROUPS, true);
        doc.read_string("x : 1;").unwrap();
        let root = doc.root();
        assert_eq!(doc.as_int(doc.get_member(root, "x").unwrap()), Some(1));
    }

    #[test]
    fn group_named_true_parses_as_identifier() {
        let doc = parse("true = { x = 1; };");
        let root = doc.root();
        let g = doc.get_member(root, "true").unwrap();
        assert_eq!(doc.kind(g).unwrap(), Kind::Group);
    }
}
