//! Parser
//!
//!     A Pratt parser over the full token vector. Prefix and infix handlers are
//!     looked up by token kind in two dispatch tables ([`prefix_parser`] and
//!     [`infix_parser`]); binding power comes from [`Precedence`].
//!
//!     Handlers follow one convention: they start with `current` on the first token
//!     of their construct and return with `current` on its last token. `peek` is the
//!     next token that is not a comment, so comments inside expressions are skipped
//!     while comments between statements become statements of their own.
//!
//!     The parser never gives up on a document. A failing statement is recorded and
//!     parsing resumes after the next top-level `;`. A failing builtin-call argument
//!     is recorded and replaced by an [`Expression::Error`] placeholder, and parsing
//!     resumes at the next `,` or `)` of that call.
//!
//!     Nesting is capped at [`MAX_DEPTH`]. Every expression entered and every
//!     operator chained onto a left operand counts one level, so the depth of any
//!     tree the parser hands out is bounded and the recursive passes over it
//!     (evaluation, walking, display, drop) stay within a worker thread's stack.

mod error;
mod expressions;
mod precedence;
mod statements;

pub use error::{ParseError, ParseErrorKind};
pub use precedence::Precedence;

use crate::ast::{Expression, Program};
use crate::lexer::Lexer;
use crate::position::{Position, Span};
use crate::token::{Token, TokenKind};
use tracing::debug;

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest expression nesting the parser accepts.
pub const MAX_DEPTH: usize = 128;

type PrefixFn = fn(&mut Parser) -> ParseResult<Expression>;
type InfixFn = fn(&mut Parser, Expression) -> ParseResult<Expression>;

/// Everything produced by one parser run.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub program: Program,
    /// Every non-EOF token in the source, comments included.
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

/// Parse a complete WFLang source.
pub fn parse(source: &str) -> ParseOutput {
    Parser::new(Lexer::new(source)).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    eof: Token,
    pos: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

fn prefix_parser(kind: TokenKind) -> Option<PrefixFn> {
    let handler: PrefixFn = match kind {
        TokenKind::Int | TokenKind::Float => Parser::parse_number_literal,
        TokenKind::Ident => Parser::parse_ident_expression,
        TokenKind::Minus | TokenKind::Bang => Parser::parse_prefix_expression,
        TokenKind::String => Parser::parse_string_literal,
        TokenKind::True | TokenKind::False => Parser::parse_boolean_literal,
        TokenKind::LParen => Parser::parse_paren_expression,
        TokenKind::Dollar => Parser::parse_macro_expression,
        TokenKind::Builtin => Parser::parse_builtin_call,
        TokenKind::Over => Parser::parse_over_expression,
        TokenKind::Alias => Parser::parse_alias_expression,
        TokenKind::Where => Parser::parse_where_expression,
        TokenKind::Order => Parser::parse_order_by_expression,
        TokenKind::Date => Parser::parse_date_literal,
        TokenKind::Time => Parser::parse_time_literal,
        TokenKind::Set => Parser::parse_set_expression,
        TokenKind::LBracket => Parser::parse_list_expression,
        _ => return None,
    };
    Some(handler)
}

fn infix_parser(kind: TokenKind) -> Option<InfixFn> {
    let handler: InfixFn = match kind {
        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Asterisk
        | TokenKind::Slash
        | TokenKind::Modulo
        | TokenKind::Gt
        | TokenKind::Gte
        | TokenKind::Lt
        | TokenKind::Lte
        | TokenKind::Eq
        | TokenKind::Neq
        | TokenKind::And
        | TokenKind::Or => Parser::parse_infix_expression,
        TokenKind::In => Parser::parse_in_expression,
        _ => return None,
    };
    Some(handler)
}

impl Parser {
    pub fn new(mut lexer: Lexer<'_>) -> Self {
        let mut tokens = Vec::new();
        let eof = loop {
            let token = lexer.next_token();
            if token.is_eof() {
                break token;
            }
            tokens.push(token);
        };
        Self {
            tokens,
            eof,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    /// Run the parser to completion.
    pub fn parse(mut self) -> ParseOutput {
        debug!(tokens = self.tokens.len(), "starting parser run");
        let mut statements = Vec::new();

        while !self.current().is_eof() {
            if self.current().kind == TokenKind::Semicolon {
                self.advance_raw();
                continue;
            }
            match self.parse_statement() {
                Ok(statement) => {
                    statements.push(statement);
                    self.advance_raw();
                }
                Err(error) => {
                    debug!(%error, at = %error.token.location(), "statement failed to parse");
                    self.errors.push(error);
                    if !self.synchronize() {
                        break;
                    }
                }
            }
        }

        if !self.errors.is_empty() {
            debug!(count = self.errors.len(), "parser run finished with errors");
        }

        let program = Program {
            statements,
            span: Span::new(Position::default(), self.eof.start),
        };
        ParseOutput {
            program,
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    pub(crate) fn current(&self) -> &Token {
        self.token_at(self.pos)
    }

    /// The next token after `current` that is not a comment.
    pub(crate) fn peek(&self) -> &Token {
        self.token_at(self.peek_index())
    }

    pub(crate) fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Move to the next non-comment token.
    pub(crate) fn advance(&mut self) {
        self.pos = self.peek_index();
    }

    /// Advance only when the next token is `kind`.
    pub(crate) fn expect_peek(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_is(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected(self.peek(), &[kind]))
        }
    }

    pub(crate) fn record(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    fn advance_raw(&mut self) {
        self.pos = (self.pos + 1).min(self.tokens.len());
    }

    fn token_at(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    fn peek_index(&self) -> usize {
        let mut index = self.pos + 1;
        while self
            .tokens
            .get(index)
            .is_some_and(|token| token.kind.is_comment())
        {
            index += 1;
        }
        index.min(self.tokens.len())
    }

    /// Index of the first token at or after `from` whose kind is in `stops`,
    /// ignoring anything nested inside brackets opened after `from`.
    pub(crate) fn recovery_point(&self, from: usize, stops: &[TokenKind]) -> Option<usize> {
        let mut depth = 0usize;
        for (index, token) in self.tokens.iter().enumerate().skip(from) {
            if depth == 0 && stops.contains(&token.kind) {
                return Some(index);
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        None
    }

    pub(crate) fn tokens_between(&self, from: usize, to: usize) -> Vec<Token> {
        self.tokens
            .get(from..to)
            .unwrap_or_default()
            .iter()
            .filter(|token| !token.kind.is_comment())
            .cloned()
            .collect()
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn seek(&mut self, index: usize) {
        self.pos = index.min(self.tokens.len());
    }

    /// Skip past the next top-level `;`. Returns false when there is none, in
    /// which case the parser is left at EOF.
    fn synchronize(&mut self) -> bool {
        match self.recovery_point(self.pos, &[TokenKind::Semicolon]) {
            Some(index) => {
                self.seek(index + 1);
                true
            }
            None => {
                self.seek(self.tokens.len());
                false
            }
        }
    }

    pub(crate) fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let entry = self.depth;
        let result = self.parse_nested_expression(precedence);
        self.depth = entry;
        result
    }

    fn parse_nested_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        self.descend()?;
        let Some(prefix) = prefix_parser(self.current().kind) else {
            return Err(self.no_prefix_error());
        };
        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon)
            && !self.peek_is(TokenKind::Eof)
            && precedence < Precedence::of(self.peek().kind)
        {
            let Some(infix) = infix_parser(self.peek().kind) else {
                return Ok(left);
            };
            self.advance();
            // `left` sinks one level under each chained operator.
            self.descend()?;
            left = infix(self, left)?;
        }
        Ok(left)
    }

    fn descend(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::TooDeep,
                format!("expression nested deeper than {} levels", MAX_DEPTH),
                self.current(),
            ));
        }
        Ok(())
    }

    fn no_prefix_error(&self) -> ParseError {
        let token = self.current();
        if infix_parser(token.kind).is_some() {
            ParseError::new(
                ParseErrorKind::MissingLeft,
                format!("operator {} has no left-hand expression", token.kind),
                token,
            )
        } else {
            ParseError::no_prefix(token)
        }
    }
}
