//! Canonical text rendering. One [`Writer`] walks the tree once, indenting
//! as it descends and honoring the document's formatting options.

use std::fmt::Write as _;

use settei_parser::{Document, Kind, NumFormat, Options, SettingId};

use crate::error::EncodeError;

const LINE_WRAP: usize = 64;

pub(crate) struct Writer<'a> {
    doc: &'a Document,
    out: String,
    indent_unit: usize,
    semicolons: bool,
    colon_groups: bool,
    colon_nongroups: bool,
    brace_on_own_line: bool,
    float_precision: usize,
    allow_sci: bool,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(doc: &'a Document) -> Self {
        let options = doc.options();
        Self {
            doc,
            out: String::new(),
            indent_unit: doc.tab_width() as usize,
            semicolons: options.contains(Options::SEMICOLON_SEPARATORS),
            colon_groups: options.contains(Options::COLON_ASSIGN_GROUPS),
            colon_nongroups: options.contains(Options::COLON_ASSIGN_NONGROUPS),
            brace_on_own_line: options.contains(Options::OPEN_BRACE_SEP_LINE),
            float_precision: doc.float_precision().max(1) as usize,
            allow_sci: options.contains(Options::ALLOW_SCI_NOTATION),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..(depth * self.indent_unit) {
            self.out.push(' ');
        }
    }

    pub(crate) fn write_document(&mut self) -> Result<(), EncodeError> {
        let root = self.doc.root();
        let children = self.doc.children(root);
        for id in children {
            self.write_setting(id, 0)?;
        }
        Ok(())
    }

    fn write_setting(&mut self, id: SettingId, depth: usize) -> Result<(), EncodeError> {
        let name = self
            .doc
            .name(id)
            .map_err(|_| EncodeError::StaleSetting)?
            .expect("non-root settings always have a name or are array/list elements");
        let kind = self.doc.kind(id).map_err(|_| EncodeError::StaleSetting)?;

        self.indent(depth);
        write!(self.out, "{name}").unwrap();
        let assign = if kind == Kind::Group {
            if self.colon_groups { ":" } else { "=" }
        } else if self.colon_nongroups {
            ":"
        } else {
            "="
        };
        write!(self.out, " {assign} ").unwrap();

        self.write_value(id, kind, depth)?;

        if self.semicolons {
            self.out.push(';');
        }
        self.out.push('\n');
        Ok(())
    }

    fn write_value(&mut self, id: SettingId, kind: Kind, depth: usize) -> Result<(), EncodeError> {
        match kind {
            Kind::Group => self.write_group(id, depth),
            Kind::Array => self.write_sequence(id, depth, '[', ']'),
            Kind::List => self.write_sequence(id, depth, '(', ')'),
            Kind::Int => {
                let v = self.doc.as_int(id).unwrap_or(0);
                let format = self.doc.format(id).unwrap_or(NumFormat::Default);
                self.write_int(v as i64, format, false);
                Ok(())
            }
            Kind::Int64 => {
                let v = self.doc.as_int64(id).unwrap_or(0);
                let format = self.doc.format(id).unwrap_or(NumFormat::Default);
                self.write_int(v, format, true);
                Ok(())
            }
            Kind::Float => {
                let v = self.doc.as_float(id).unwrap_or(0.0);
                self.write_float(v)
            }
            Kind::Bool => {
                let v = self.doc.as_bool(id).unwrap_or(false);
                self.out.push_str(if v { "true" } else { "false" });
                Ok(())
            }
            Kind::String => {
                let v = self.doc.as_str(id).unwrap_or("");
                self.write_string(v, depth);
                Ok(())
            }
            Kind::None => {
                // A fresh, never-set scalar. Round-trips as an empty string
                // rather than failing the whole write.
                self.out.push_str("\"\"");
                Ok(())
            }
        }
    }

    fn write_group(&mut self, id: SettingId, depth: usize) -> Result<(), EncodeError> {
        let children = self.doc.children(id);
        if children.is_empty() {
            self.out.push_str("{ }");
            return Ok(());
        }
        if self.brace_on_own_line {
            self.out.push('\n');
            self.indent(depth);
        }
        self.out.push('{');
        self.out.push('\n');
        for child in children {
            self.write_setting(child, depth + 1)?;
        }
        self.indent(depth);
        self.out.push('}');
        Ok(())
    }

    fn write_sequence(
        &mut self,
        id: SettingId,
        depth: usize,
        open: char,
        close: char,
    ) -> Result<(), EncodeError> {
        let len = self.doc.length(id).unwrap_or(0);
        if len == 0 {
            self.out.push(open);
            self.out.push(close);
            return Ok(());
        }
        self.out.push(open);
        self.out.push(' ');
        for i in 0..len {
            if i > 0 {
                self.out.push_str(", ");
            }
            let elem = self
                .doc
                .get_elem(id, i)
                .ok_or(EncodeError::StaleSetting)?;
            let kind = self.doc.kind(elem).map_err(|_| EncodeError::StaleSetting)?;
            self.write_value(elem, kind, depth)?;
        }
        self.out.push(' ');
        self.out.push(close);
        Ok(())
    }

    fn write_int(&mut self, value: i64, format: NumFormat, is64: bool) {
        match format {
            NumFormat::Hex => {
                if is64 {
                    write!(self.out, "0x{:X}L", value as u64).unwrap();
                } else {
                    write!(self.out, "0x{:X}", value as i32 as u32).unwrap();
                }
            }
            NumFormat::Default => {
                if is64 {
                    write!(self.out, "{value}L").unwrap();
                } else {
                    write!(self.out, "{value}").unwrap();
                }
            }
        }
    }

    fn write_float(&mut self, value: f64) -> Result<(), EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteFloat);
        }
        let magnitude = value.abs();
        let scientific =
            self.allow_sci && magnitude != 0.0 && (magnitude >= 1e15 || magnitude < 1e-4);
        if scientific {
            write!(self.out, "{:.*e}", self.float_precision, value).unwrap();
        } else {
            let mut text = format!("{:.*}", self.float_precision, value);
            if !text.contains('.') {
                text.push_str(".0");
            }
            self.out.push_str(&text);
        }
        Ok(())
    }

    fn write_string(&mut self, value: &str, depth: usize) {
        if value.chars().count() <= LINE_WRAP {
            self.out.push('"');
            escape_into(&mut self.out, value);
            self.out.push('"');
            return;
        }

        let chars: Vec<char> = value.chars().collect();
        let mut first = true;
        for chunk in chars.chunks(LINE_WRAP) {
            if !first {
                self.out.push('\n');
                self.indent(depth + 1);
            }
            self.out.push('"');
            let piece: String = chunk.iter().collect();
            escape_into(&mut self.out, &piece);
            self.out.push('"');
            first = false;
        }
    }
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                write!(out, "\\x{:02x}", c as u32).unwrap();
            }
            c => out.push(c),
        }
    }
}
