//! Lexer
//!
//!     Tokenization happens in two layers. The raw layer is a logos scanner that only knows
//!     byte shapes: operators, numbers, words, strings, comments and braced date/time
//!     literals. The positional layer, [`Lexer`], pulls raw tokens on demand, classifies
//!     words against the keyword table and the builtin catalog, and resolves every token to
//!     an inclusive line:column span.
//!
//!     The lexer never fails. Bytes that cannot start a token, unterminated strings and
//!     comments, and braced literals that are neither `{YYYY-MM-DD}` nor `{HH:MM}` are all
//!     emitted as [`TokenKind::Illegal`] tokens, leaving the decision to the parser. Once
//!     the input is exhausted every further call returns the same EOF token.

use crate::dates;
use crate::position::SourceLocation;
use crate::token::{lookup_word, LexErrorKind, Token, TokenKind};
use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BraceLiteral {
    Date,
    Time,
}

/// Byte-level token shapes recognized by logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\x0B\x0C]+")]
enum RawToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
    #[regex(r"[0-9]+")]
    Int,
    #[regex(r"[0-9]+\.[0-9]+")]
    Float,
    #[token("\"", lex_string)]
    String,
    #[regex(r"//[^\n]*")]
    CommentLine,
    #[token("/*", lex_block_comment)]
    CommentBlock,
    #[regex(r"\{[0-9:\- \t]*\}", classify_brace_literal)]
    BraceLiteral(BraceLiteral),

    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("!")]
    Bang,
    #[token("!=")]
    Neq,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[token("%")]
    Modulo,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token(">=")]
    Gte,
    #[token("<=")]
    Lte,
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Period,
    #[token("$")]
    Dollar,
}

fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match rest.find('"') {
        Some(idx) => {
            lex.bump(idx + 1);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedString)
        }
    }
}

fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(idx) => {
            lex.bump(idx + 2);
            Ok(())
        }
        None => {
            lex.bump(rest.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn classify_brace_literal(lex: &mut logos::Lexer<RawToken>) -> Result<BraceLiteral, LexErrorKind> {
    let slice = lex.slice();
    if dates::is_date_shape(slice) {
        Ok(BraceLiteral::Date)
    } else if dates::is_time_shape(slice) {
        Ok(BraceLiteral::Time)
    } else {
        Err(LexErrorKind::MalformedDateTime)
    }
}

impl RawToken {
    fn kind(self, slice: &str) -> TokenKind {
        match self {
            RawToken::Word => lookup_word(slice),
            RawToken::Int => TokenKind::Int,
            RawToken::Float => TokenKind::Float,
            RawToken::String => TokenKind::String,
            RawToken::CommentLine => TokenKind::CommentLine,
            RawToken::CommentBlock => TokenKind::CommentBlock,
            RawToken::BraceLiteral(BraceLiteral::Date) => TokenKind::Date,
            RawToken::BraceLiteral(BraceLiteral::Time) => TokenKind::Time,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Neq => TokenKind::Neq,
            RawToken::Asterisk => TokenKind::Asterisk,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Modulo => TokenKind::Modulo,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gte => TokenKind::Gte,
            RawToken::Lte => TokenKind::Lte,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Period => TokenKind::Period,
            RawToken::Dollar => TokenKind::Dollar,
        }
    }
}

/// Stateful, positional token source.
pub struct Lexer<'a> {
    raw: logos::Lexer<'a, RawToken>,
    location: SourceLocation,
    source_len: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            raw: RawToken::lexer(source),
            location: SourceLocation::new(source),
            source_len: source.len(),
            finished: false,
        }
    }

    /// Produce the next token, or EOF once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        if self.finished {
            return self.eof();
        }
        let Some(result) = self.raw.next() else {
            self.finished = true;
            return self.eof();
        };

        let span = self.raw.span();
        let slice = self.raw.slice();
        let (kind, literal) = match result {
            Ok(RawToken::String) => (TokenKind::String, &slice[1..slice.len() - 1]),
            Ok(raw) => (raw.kind(slice), slice),
            Err(error) => (TokenKind::Illegal(error), slice),
        };
        let location = self.location.byte_range_to_span(&span);
        Token::new(kind, literal, location.start, location.end, span)
    }

    fn eof(&self) -> Token {
        Token::eof(self.location.end_position(), self.source_len)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

/// Tokenize source code, excluding the terminal EOF token.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use rstest::rstest;

    fn first(source: &str) -> Token {
        Lexer::new(source).next_token()
    }

    #[rstest]
    #[case("=", TokenKind::Eq)]
    #[case("+", TokenKind::Plus)]
    #[case("-", TokenKind::Minus)]
    #[case("!", TokenKind::Bang)]
    #[case("*", TokenKind::Asterisk)]
    #[case("/", TokenKind::Slash)]
    #[case("%", TokenKind::Modulo)]
    #[case(">", TokenKind::Gt)]
    #[case(">=", TokenKind::Gte)]
    #[case("<", TokenKind::Lt)]
    #[case("<=", TokenKind::Lte)]
    #[case("!=", TokenKind::Neq)]
    #[case("||", TokenKind::Or)]
    #[case("&&", TokenKind::And)]
    #[case("or", TokenKind::Or)]
    #[case("AND", TokenKind::And)]
    #[case("\"hello world\"", TokenKind::String)]
    #[case("42", TokenKind::Int)]
    #[case("45.5", TokenKind::Float)]
    #[case("Aardvark", TokenKind::Ident)]
    #[case("Var", TokenKind::Var)]
    #[case("order", TokenKind::Order)]
    #[case("// comment line", TokenKind::CommentLine)]
    #[case("/* comment/*\nblock */", TokenKind::CommentBlock)]
    #[case("{1900-01-01}", TokenKind::Date)]
    #[case("{23:59}", TokenKind::Time)]
    #[case("{", TokenKind::LBrace)]
    #[case("$", TokenKind::Dollar)]
    fn lexes_single_token(#[case] source: &str, #[case] expected: TokenKind) {
        assert_eq!(first(source).kind, expected);
    }

    #[test]
    fn positions_are_end_inclusive() {
        let source = "var x = 1;\nx * 42\n\"so long\"";
        let tokens = tokenize(source);
        let spans: Vec<_> = tokens
            .iter()
            .map(|t| (t.start.line, t.start.column, t.end.line, t.end.column))
            .collect();
        assert_eq!(
            spans,
            vec![
                (0, 0, 0, 2),
                (0, 4, 0, 4),
                (0, 6, 0, 6),
                (0, 8, 0, 8),
                (0, 9, 0, 9),
                (1, 0, 1, 0),
                (1, 2, 1, 2),
                (1, 4, 1, 5),
                (2, 0, 2, 8),
            ]
        );
        assert_eq!(tokens[8].literal, "so long");
        assert_eq!(tokens[8].len(), 9);
    }

    #[test]
    fn builtins_keep_original_casing() {
        let token = first("sumTime");
        assert_eq!(token.kind, TokenKind::Builtin);
        assert_eq!(token.literal, "sumTime");
    }

    #[test]
    fn trailing_period_is_not_a_float() {
        let kinds: Vec<_> = tokenize("1.").into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Int, TokenKind::Period]);
    }

    #[test]
    fn unpaired_ampersand_is_illegal() {
        let token = first("& x");
        assert_eq!(token.kind, TokenKind::Illegal(LexErrorKind::IllegalByte));
        assert_eq!(token.literal, "&");
    }

    #[test]
    fn unterminated_string_is_illegal() {
        let token = first("\"abc");
        assert_eq!(
            token.kind,
            TokenKind::Illegal(LexErrorKind::UnterminatedString)
        );
    }

    #[test]
    fn unterminated_block_comment_is_illegal() {
        let tokens = tokenize("1 /* never closed\n 2");
        assert_eq!(tokens.len(), 2);
        assert_eq!(
            tokens[1].kind,
            TokenKind::Illegal(LexErrorKind::UnterminatedComment)
        );
    }

    #[rstest]
    #[case("{2024-1-01}")]
    #[case("{ 23:59}")]
    #[case("{2359}")]
    fn malformed_braced_literals_are_illegal(#[case] source: &str) {
        assert_eq!(
            first(source).kind,
            TokenKind::Illegal(LexErrorKind::MalformedDateTime)
        );
    }

    #[test]
    fn line_comment_excludes_newline() {
        let tokens = tokenize("// note\nx");
        assert_eq!(tokens[0].literal, "// note");
        assert_eq!(tokens[1].start, Position::new(1, 0));
    }

    #[test]
    fn multi_line_block_comment_spans_lines() {
        let token = first("/* a\nbc */");
        assert_eq!(token.start, Position::new(0, 0));
        assert_eq!(token.end, Position::new(1, 4));
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        let eof = lexer.next_token();
        assert!(eof.is_eof());
        assert_eq!(lexer.next_token(), eof);
        assert_eq!(lexer.next_token(), eof);
        assert_eq!(eof.start, Position::new(0, 1));
    }

    #[test]
    fn empty_input_yields_eof() {
        assert!(tokenize("").is_empty());
        assert!(first("   \n\t").is_eof());
    }
}
