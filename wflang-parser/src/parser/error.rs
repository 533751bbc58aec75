//! Parse errors
//!
//! A [`ParseError`] always names the token it was raised at, so editors can
//! underline the exact place. The same value doubles as a placeholder node
//! (see [`crate::ast::ErrorExpr`]) when the parser recovers inside a call.

use crate::dates::DateError;
use crate::token::{LexErrorKind, Token, TokenKind};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: Vec<TokenKind> },
    ReservedWord,
    BlankIdent,
    MissingSemicolon,
    UnclosedDelimiter { open: TokenKind },
    NoPrefix,
    MissingLeft,
    Lexical(LexErrorKind),
    InvalidDate(DateError),
    InvalidTime(DateError),
    InvalidNumber,
    TooDeep,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParseErrorKind::UnexpectedToken { .. } => "unexpected token",
            ParseErrorKind::ReservedWord => "reserved word",
            ParseErrorKind::BlankIdent => "blank identifier",
            ParseErrorKind::MissingSemicolon => "missing semicolon",
            ParseErrorKind::UnclosedDelimiter { .. } => "unclosed delimiter",
            ParseErrorKind::NoPrefix => "no prefix parser",
            ParseErrorKind::MissingLeft => "missing left expression",
            ParseErrorKind::Lexical(_) => "lexical error",
            ParseErrorKind::InvalidDate(_) => "invalid date",
            ParseErrorKind::InvalidTime(_) => "invalid time",
            ParseErrorKind::InvalidNumber => "invalid number",
            ParseErrorKind::TooDeep => "nesting too deep",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub token: Token,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, token: &Token) -> Self {
        Self {
            kind,
            message: message.into(),
            token: token.clone(),
        }
    }

    pub(crate) fn unexpected(token: &Token, expected: &[TokenKind]) -> Self {
        let wanted = expected
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(" or ");
        let message = format!("token type: have {}, want {}", describe(token), wanted);
        Self::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_vec(),
            },
            message,
            token,
        )
    }

    pub(crate) fn reserved(token: &Token) -> Self {
        Self::new(
            ParseErrorKind::ReservedWord,
            format!(
                "token {} is a reserved word, and cannot be used as an identifier",
                token.literal
            ),
            token,
        )
    }

    pub(crate) fn no_prefix(token: &Token) -> Self {
        match token.kind {
            TokenKind::Illegal(lex) => Self::new(
                ParseErrorKind::Lexical(lex),
                format!("{}: {:?}", lex, token.literal),
                token,
            ),
            _ => Self::new(
                ParseErrorKind::NoPrefix,
                format!("no prefix parser mapped for token type {}", describe(token)),
                token,
            ),
        }
    }

    pub(crate) fn unclosed(open: TokenKind, found: &Token) -> Self {
        let closing = match open {
            TokenKind::LParen => ")",
            TokenKind::LBracket => "]",
            _ => "$",
        };
        Self::new(
            ParseErrorKind::UnclosedDelimiter { open },
            format!("expected {} to close {}, found {}", closing, open, describe(found)),
            found,
        )
    }

    pub fn location(&self) -> crate::position::Span {
        self.token.location()
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "EOF".to_string(),
        TokenKind::Ident | TokenKind::Builtin | TokenKind::Int | TokenKind::Float => {
            format!("{} {:?}", token.kind, token.literal)
        }
        kind => kind.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn token(kind: TokenKind, literal: &str) -> Token {
        Token::new(kind, literal, Position::new(0, 0), Position::new(0, 0), 0..1)
    }

    #[test]
    fn test_unexpected_message_lists_expected_kinds() {
        let err = ParseError::unexpected(
            &token(TokenKind::Int, "4"),
            &[TokenKind::LBracket, TokenKind::Set],
        );
        assert_eq!(err.to_string(), "token type: have INT \"4\", want [ or set");
    }

    #[test]
    fn test_illegal_tokens_become_lexical_errors() {
        let err = ParseError::no_prefix(&token(
            TokenKind::Illegal(LexErrorKind::IllegalByte),
            "&",
        ));
        assert_eq!(err.kind, ParseErrorKind::Lexical(LexErrorKind::IllegalByte));
        assert_eq!(err.to_string(), "illegal character: \"&\"");
    }
}
