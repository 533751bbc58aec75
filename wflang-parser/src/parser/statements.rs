//! Statement triage.

use super::{ParseError, ParseErrorKind, ParseResult, Parser, Precedence};
use crate::ast::{Comment, ExpressionStmt, Statement, VarBinding};
use crate::token::TokenKind;

impl Parser {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().kind {
            TokenKind::Var => self.parse_var_binding().map(Statement::Var),
            TokenKind::CommentLine => Ok(Statement::LineComment(Comment {
                token: self.current().clone(),
            })),
            TokenKind::CommentBlock => Ok(Statement::BlockComment(Comment {
                token: self.current().clone(),
            })),
            _ => self.parse_expression_statement(),
        }
    }

    /// An expression, optionally followed by `;`.
    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
        Ok(Statement::Expression(ExpressionStmt { expression }))
    }

    /// `var NAME = EXPR ;`
    pub(crate) fn parse_var_binding(&mut self) -> ParseResult<VarBinding> {
        let token = self.current().clone();
        let name = self.expect_name()?;
        self.expect_peek(TokenKind::Eq)?;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;

        if !self.peek_is(TokenKind::Semicolon) {
            return Err(ParseError::new(
                ParseErrorKind::MissingSemicolon,
                format!("expected ; after var binding {}", name.name),
                self.peek(),
            ));
        }
        self.advance();
        let semicolon = self.current().clone();
        Ok(VarBinding {
            token,
            name,
            value,
            semicolon,
        })
    }
}
