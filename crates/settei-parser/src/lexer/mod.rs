mod cursor;
mod token;

use cursor::Cursor;
pub(crate) use token::{Token, TokenKind};

use crate::error::ParseError;
use crate::tree::NumFormat;

/// Turns one source file's text into a flat token list.
///
/// Tokenization is eager (mirroring how a whole file is read before a
/// single [`crate::parser::Parser`] frame works through it) rather than
/// streaming. The parser's include stack pushes and pops whole
/// already-tokenized frames, which keeps splicing an included file's
/// tokens into the middle of the enclosing stream a matter of pushing a
/// new frame rather than threading lifetimes through a lazy iterator.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut tokens = Vec::new();

    loop {
        let line_before = cursor.line;
        skip_trivia(&mut cursor)?;
        let line = cursor.line;
        let preceded_by_newline = line != line_before;
        if cursor.is_eof() {
            tokens.push(Token {
                kind: TokenKind::Eof,
                line,
                preceded_by_newline,
            });
            break;
        }

        let kind = scan_token(&mut cursor, line)?;
        tokens.push(Token {
            kind,
            line,
            preceded_by_newline,
        });
    }

    Ok(tokens)
}

fn skip_trivia(cursor: &mut Cursor) -> Result<(), ParseError> {
    loop {
        cursor.eat_while(|c| c.is_whitespace());

        if cursor.first() == '#' {
            cursor.eat_while(|c| c != '\n');
            continue;
        }

        if cursor.first() == '/' && cursor.second() == '/' {
            cursor.eat_while(|c| c != '\n');
            continue;
        }

        if cursor.first() == '/' && cursor.second() == '*' {
            let start_line = cursor.line;
            cursor.bump();
            cursor.bump();
            loop {
                if cursor.is_eof() {
                    return Err(ParseError::new(
                        "unterminated block comment",
                        None,
                        start_line,
                    ));
                }
                if cursor.first() == '*' && cursor.second() == '/' {
                    cursor.bump();
                    cursor.bump();
                    break;
                }
                cursor.bump();
            }
            continue;
        }

        break;
    }
    Ok(())
}

fn scan_token(cursor: &mut Cursor, line: u32) -> Result<TokenKind, ParseError> {
    let c = cursor.first();
    match c {
        '{' => {
            cursor.bump();
            Ok(TokenKind::LBrace)
        }
        '}' => {
            cursor.bump();
            Ok(TokenKind::RBrace)
        }
        '[' => {
            cursor.bump();
            Ok(TokenKind::LBracket)
        }
        ']' => {
            cursor.bump();
            Ok(TokenKind::RBracket)
        }
        '(' => {
            cursor.bump();
            Ok(TokenKind::LParen)
        }
        ')' => {
            cursor.bump();
            Ok(TokenKind::RParen)
        }
        ',' => {
            cursor.bump();
            Ok(TokenKind::Comma)
        }
        ';' => {
            cursor.bump();
            Ok(TokenKind::Semicolon)
        }
        ':' => {
            cursor.bump();
            Ok(TokenKind::Colon)
        }
        '=' => {
            cursor.bump();
            Ok(TokenKind::Eq)
        }
        '"' => scan_string(cursor, line),
        '@' => scan_include(cursor, line),
        c if is_ident_start(c) => Ok(TokenKind::Ident(scan_ident(cursor))),
        c if c.is_ascii_digit() || c == '-' || c == '+' => scan_number(cursor, line),
        c => Err(ParseError::new(
            format!("stray character '{c}'"),
            None,
            line,
        )),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '*'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '*' || c == '-'
}

fn scan_ident(cursor: &mut Cursor) -> String {
    cursor.eat_while(is_ident_continue).to_string()
}

fn scan_include(cursor: &mut Cursor, line: u32) -> Result<TokenKind, ParseError> {
    cursor.bump(); // '@'
    let kw = cursor.eat_while(|c| c.is_ascii_alphabetic());
    if kw != "include" {
        return Err(ParseError::new(
            format!("unknown directive '@{kw}'"),
            None,
            line,
        ));
    }
    cursor.eat_while(|c| c.is_whitespace());
    if cursor.first() != '"' {
        return Err(ParseError::new(
            "expected a quoted path after @include",
            None,
            line,
        ));
    }
    match scan_string(cursor, line)? {
        TokenKind::Str(path) => Ok(TokenKind::Include(path)),
        _ => unreachable!(),
    }
}

fn scan_string(cursor: &mut Cursor, line: u32) -> Result<TokenKind, ParseError> {
    cursor.bump(); // opening quote
    let mut out = String::new();
    loop {
        if cursor.is_eof() {
            return Err(ParseError::new("unterminated string literal", None, line));
        }
        match cursor.first() {
            '"' => {
                cursor.bump();
                break;
            }
            '\\' => {
                cursor.bump();
                let esc = cursor.first();
                match esc {
                    '\\' => {
                        out.push('\\');
                        cursor.bump();
                    }
                    '"' => {
                        out.push('"');
                        cursor.bump();
                    }
                    'n' => {
                        out.push('\n');
                        cursor.bump();
                    }
                    'r' => {
                        out.push('\r');
                        cursor.bump();
                    }
                    't' => {
                        out.push('\t');
                        cursor.bump();
                    }
                    'f' => {
                        out.push('\u{000C}');
                        cursor.bump();
                    }
                    'x' => {
                        cursor.bump();
                        let mut hex = String::with_capacity(2);
                        for _ in 0..2 {
                            if cursor.first().is_ascii_hexdigit() {
                                hex.push(cursor.first());
                                cursor.bump();
                            }
                        }
                        if hex.is_empty() {
                            return Err(ParseError::new(
                                "invalid \\x escape: expected hex digits",
                                None,
                                line,
                            ));
                        }
                        let byte = u8::from_str_radix(&hex, 16).unwrap();
                        out.push(byte as char);
                    }
                    other => {
                        return Err(ParseError::new(
                            format!("invalid escape sequence '\\{other}'"),
                            None,
                            line,
                        ));
                    }
                }
            }
            c => {
                out.push(c);
                cursor.bump();
            }
        }
    }
    Ok(TokenKind::Str(out))
}

fn scan_number(cursor: &mut Cursor, line: u32) -> Result<TokenKind, ParseError> {
    let mut buf = String::new();
    if cursor.first() == '-' || cursor.first() == '+' {
        if cursor.first() == '-' {
            buf.push('-');
        }
        cursor.bump();
    }

    if cursor.first() == '0' && (cursor.second() == 'x' || cursor.second() == 'X') {
        cursor.bump();
        cursor.bump();
        let negative = buf.starts_with('-');
        let digits = cursor.eat_while(|c| c.is_ascii_hexdigit());
        if digits.is_empty() {
            return Err(ParseError::new("malformed hex literal", None, line));
        }
        let mut width64 = digits.trim_start_matches('0').len() > 8;
        if matches!(cursor.first(), 'L' | 'l') {
            cursor.bump();
            width64 = true;
        }
        let raw = u64::from_str_radix(digits, 16)
            .map_err(|_| ParseError::new("hex literal out of range", None, line))?;
        let value = if width64 {
            if negative {
                -(raw as i64)
            } else {
                raw as i64
            }
        } else {
            if raw > u32::MAX as u64 {
                return Err(ParseError::new("hex literal out of range", None, line));
            }
            let v = (raw as u32 as i32) as i64;
            if negative {
                -v
            } else {
                v
            }
        };
        return Ok(TokenKind::Int {
            value,
            width64,
            format: NumFormat::Hex,
        });
    }

    buf.push_str(cursor.eat_while(|c| c.is_ascii_digit()));
    let mut is_float = false;
    let mut scientific = false;

    if cursor.first() == '.' && cursor.second().is_ascii_digit() {
        is_float = true;
        buf.push('.');
        cursor.bump();
        buf.push_str(cursor.eat_while(|c| c.is_ascii_digit()));
    }

    if matches!(cursor.first(), 'e' | 'E') {
        let mut exp = String::new();
        exp.push(cursor.first());
        cursor.bump();
        if matches!(cursor.first(), '+' | '-') {
            exp.push(cursor.first());
            cursor.bump();
        }
        let digits = cursor.eat_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(ParseError::new(
                "malformed exponent in float literal",
                None,
                line,
            ));
        }
        exp.push_str(digits);
        buf.push_str(&exp);
        is_float = true;
        scientific = true;
    }

    if is_float {
        let value: f64 = buf
            .parse()
            .map_err(|_| ParseError::new("malformed float literal", None, line))?;
        return Ok(TokenKind::Float { value, scientific });
    }

    let mut width64 = false;
    if matches!(cursor.first(), 'L' | 'l') {
        cursor.bump();
        width64 = true;
    }

    let value: i64 = buf
        .parse()
        .map_err(|_| ParseError::new("integer literal out of range", None, line))?;
    if !width64 && (value > i32::MAX as i64 || value < i32::MIN as i64) {
        width64 = true;
    }

    Ok(TokenKind::Int {
        value,
        width64,
        format: NumFormat::Default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_basic_scalars() {
        let toks = kinds(r#"n = 42; pi = 3.14; flag = true; msg = "hello";"#);
        assert!(matches!(toks[0], TokenKind::Ident(ref s) if s == "n"));
        assert!(matches!(toks[1], TokenKind::Eq));
        assert!(matches!(
            toks[2],
            TokenKind::Int {
                value: 42,
                width64: false,
                ..
            }
        ));
    }

    #[test]
    fn scans_hex_literal() {
        let toks = kinds("mask = 0xFF;");
        assert!(matches!(
            toks[2],
            TokenKind::Int {
                value: 255,
                format: NumFormat::Hex,
                ..
            }
        ));
    }

    #[test]
    fn scans_negative_hex_32bit() {
        let toks = kinds("mask = 0xFFFFFFFF;");
        assert!(matches!(
            toks[2],
            TokenKind::Int {
                value: -1,
                width64: false,
                format: NumFormat::Hex,
            }
        ));
    }

    #[test]
    fn scans_int64_suffix() {
        let toks = kinds("big = 9223372036854775807L;");
        assert!(matches!(
            toks[2],
            TokenKind::Int {
                value: 9223372036854775807,
                width64: true,
                ..
            }
        ));
    }

    #[test]
    fn scans_include_directive() {
        let toks = kinds(r#"@include "b.cfg""#);
        assert!(matches!(toks[0], TokenKind::Include(ref s) if s == "b.cfg"));
    }

    #[test]
    fn rejects_stray_char() {
        assert!(tokenize("n = 1 ~ 2;").is_err());
    }

    #[test]
    fn concatenated_string_escapes() {
        let toks = kinds(r#""a\nb""#);
        assert!(matches!(toks[0], TokenKind::Str(ref s) if s == "a\nb"));
    }
}
