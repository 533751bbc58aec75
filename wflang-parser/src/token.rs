//! Token definitions for WFLang
//!
//! [`TokenKind`] is the closed vocabulary produced by the lexer. Words are
//! classified after scanning: the keyword table is consulted first, then the
//! builtin catalog, and anything else is an identifier. Both lookups ignore
//! case, while the token literal keeps the casing found in the source.

use crate::builtins;
use crate::position::{Position, Span};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Reasons a run of source bytes could not become a regular token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Error, Serialize)]
pub enum LexErrorKind {
    #[default]
    #[error("illegal character")]
    IllegalByte,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("malformed date or time literal")]
    MalformedDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Illegal(LexErrorKind),
    Eof,

    // Literals
    Ident,
    Builtin,
    Int,
    Float,
    String,
    Date,
    Time,
    CommentLine,
    CommentBlock,

    // Operators
    Eq,
    Plus,
    Minus,
    Bang,
    Neq,
    Asterisk,
    Slash,
    Modulo,
    Gt,
    Lt,
    Gte,
    Lte,
    And,
    Or,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Period,
    Dollar,

    // Keywords
    Var,
    Over,
    Where,
    Order,
    By,
    Asc,
    Desc,
    Alias,
    In,
    Set,
    Null,
    True,
    False,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Over
                | TokenKind::Where
                | TokenKind::Order
                | TokenKind::By
                | TokenKind::Asc
                | TokenKind::Desc
                | TokenKind::Alias
                | TokenKind::In
                | TokenKind::Set
                | TokenKind::Null
                | TokenKind::True
                | TokenKind::False
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::CommentLine | TokenKind::CommentBlock)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Illegal(_) => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Builtin => "BUILTIN",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Date => "DATE",
            TokenKind::Time => "TIME",
            TokenKind::CommentLine => "COMMENT_LINE",
            TokenKind::CommentBlock => "COMMENT_BLOCK",
            TokenKind::Eq => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Neq => "!=",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Modulo => "%",
            TokenKind::Gt => ">",
            TokenKind::Lt => "<",
            TokenKind::Gte => ">=",
            TokenKind::Lte => "<=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Period => ".",
            TokenKind::Dollar => "$",
            TokenKind::Var => "var",
            TokenKind::Over => "over",
            TokenKind::Where => "where",
            TokenKind::Order => "order",
            TokenKind::By => "by",
            TokenKind::Asc => "asc",
            TokenKind::Desc => "desc",
            TokenKind::Alias => "alias",
            TokenKind::In => "in",
            TokenKind::Set => "set",
            TokenKind::Null => "null",
            TokenKind::True => "true",
            TokenKind::False => "false",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned token with its source span.
///
/// `start` and `end` are both inclusive; `span` is the half-open byte range the
/// token occupies, so `span.len()` is the token length in bytes. For strings the
/// literal omits the quotes while the span keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub start: Position,
    pub end: Position,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        literal: impl Into<String>,
        start: Position,
        end: Position,
        span: Range<usize>,
    ) -> Self {
        Self {
            kind,
            literal: literal.into(),
            start,
            end,
            span,
        }
    }

    pub fn eof(at: Position, offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", at, at, offset..offset)
    }

    /// Length of the token in source bytes.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Only EOF tokens carry an empty literal.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn location(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @ {}", self.kind, self.literal, self.location())
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("var", TokenKind::Var),
        ("over", TokenKind::Over),
        ("where", TokenKind::Where),
        ("order", TokenKind::Order),
        ("by", TokenKind::By),
        ("asc", TokenKind::Asc),
        ("desc", TokenKind::Desc),
        ("alias", TokenKind::Alias),
        ("in", TokenKind::In),
        ("set", TokenKind::Set),
        ("null", TokenKind::Null),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Bang),
    ])
});

/// Keyword words, lowercased.
pub fn keywords() -> impl Iterator<Item = &'static str> {
    KEYWORDS.keys().copied()
}

/// Case-insensitive keyword lookup.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
}

/// Classify a scanned word as keyword, builtin or identifier.
pub fn lookup_word(word: &str) -> TokenKind {
    if let Some(kind) = keyword(word) {
        kind
    } else if builtins::is_builtin(word) {
        TokenKind::Builtin
    } else {
        TokenKind::Ident
    }
}

/// Reserved words may not be declared or referenced as identifiers.
pub fn is_reserved(word: &str) -> bool {
    keyword(word).is_some() || builtins::is_builtin(word)
}
