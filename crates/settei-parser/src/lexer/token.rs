use crate::tree::NumFormat;

/// A lexical token together with the source line it started on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: u32,
    /// Whether a newline was skipped as trivia between the previous token
    /// and this one. Used to enforce the setting-list separator rule.
    pub preceded_by_newline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Int {
        value: i64,
        width64: bool,
        format: NumFormat,
    },
    Float {
        value: f64,
        scientific: bool,
    },
    Str(String),
    /// The path argument of an `@include "path"` directive.
    Include(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Colon,
    Eq,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int { .. } => "integer literal",
            TokenKind::Float { .. } => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Include(_) => "@include directive",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Eq => "'='",
            TokenKind::Eof => "end of input",
        }
    }
}
