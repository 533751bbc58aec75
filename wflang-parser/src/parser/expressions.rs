//! Prefix and infix handlers.

use super::{ParseError, ParseErrorKind, ParseResult, Parser, Precedence};
use crate::ast::*;
use crate::dates;
use crate::token::{is_reserved, Token, TokenKind};

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Asterisk => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Modulo => InfixOp::Mod,
        TokenKind::Gt => InfixOp::Gt,
        TokenKind::Lt => InfixOp::Lt,
        TokenKind::Gte => InfixOp::Gte,
        TokenKind::Lte => InfixOp::Lte,
        TokenKind::Eq => InfixOp::Eq,
        TokenKind::Neq => InfixOp::Neq,
        TokenKind::And => InfixOp::And,
        TokenKind::Or => InfixOp::Or,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    pub(crate) fn parse_number_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Ok(Expression::Number(NumberLiteral { token, value })),
            Err(err) => Err(ParseError::new(
                ParseErrorKind::InvalidNumber,
                format!("error parsing number literal: {}", err),
                &token,
            )),
        }
    }

    pub(crate) fn parse_string_literal(&mut self) -> ParseResult<Expression> {
        Ok(Expression::String(StringLiteral {
            token: self.current().clone(),
        }))
    }

    pub(crate) fn parse_boolean_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        let value = token.kind == TokenKind::True;
        Ok(Expression::Boolean(BooleanLiteral { token, value }))
    }

    pub(crate) fn parse_date_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match dates::parse_date(&token.literal) {
            Ok(date) => Ok(Expression::Date(DateLiteral { token, date })),
            Err(err) => Err(ParseError::new(
                ParseErrorKind::InvalidDate(err.clone()),
                err.to_string(),
                &token,
            )),
        }
    }

    pub(crate) fn parse_time_literal(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match dates::parse_time(&token.literal) {
            Ok(clock) => Ok(Expression::Time(TimeLiteral { token, clock })),
            Err(err) => Err(ParseError::new(
                ParseErrorKind::InvalidTime(err.clone()),
                err.to_string(),
                &token,
            )),
        }
    }

    /// Validate `current` as an identifier.
    pub(crate) fn parse_ident(&mut self) -> ParseResult<Ident> {
        let token = self.current().clone();
        if token.literal.is_empty() || token.literal == "_" {
            return Err(ParseError::new(
                ParseErrorKind::BlankIdent,
                "blank identifier cannot be used as a name",
                &token,
            ));
        }
        if is_reserved(&token.literal) {
            return Err(ParseError::reserved(&token));
        }
        let name = token.literal.clone();
        Ok(Ident { token, name })
    }

    pub(crate) fn parse_ident_expression(&mut self) -> ParseResult<Expression> {
        self.parse_ident().map(Expression::Ident)
    }

    /// Advance onto the next token and read it as a declared name. Keywords
    /// and builtins are rejected as reserved words.
    pub(crate) fn expect_name(&mut self) -> ParseResult<Ident> {
        let next = self.peek().clone();
        match next.kind {
            TokenKind::Ident => {
                self.advance();
                self.parse_ident()
            }
            kind if kind == TokenKind::Builtin || kind.is_keyword() => {
                Err(ParseError::reserved(&next))
            }
            TokenKind::And | TokenKind::Or | TokenKind::Bang if is_reserved(&next.literal) => {
                Err(ParseError::reserved(&next))
            }
            _ => Err(ParseError::unexpected(&next, &[TokenKind::Ident])),
        }
    }

    pub(crate) fn parse_prefix_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        let op = if token.kind == TokenKind::Minus {
            PrefixOp::Negate
        } else {
            PrefixOp::Not
        };
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix(Box::new(PrefixExpr { token, op, right })))
    }

    pub(crate) fn parse_infix_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.current().clone();
        let Some(op) = infix_op(token.kind) else {
            return Err(ParseError::no_prefix(&token));
        };
        let precedence = Precedence::of(token.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Ok(Expression::Infix(Box::new(InfixExpr {
            token,
            left,
            op,
            right,
        })))
    }

    /// `LEFT in [ ... ]` or `LEFT in set NAME`
    pub(crate) fn parse_in_expression(&mut self, left: Expression) -> ParseResult<Expression> {
        let token = self.current().clone();
        let list = match self.peek().kind {
            TokenKind::LBracket => {
                self.advance();
                InList::List(self.parse_list_literal()?)
            }
            TokenKind::Set => {
                self.advance();
                InList::Set(self.parse_set()?)
            }
            _ => {
                return Err(ParseError::unexpected(
                    self.peek(),
                    &[TokenKind::LBracket, TokenKind::Set],
                ))
            }
        };
        Ok(Expression::In(Box::new(InExpr { token, left, list })))
    }

    /// Zero or more var bindings, then exactly one value expression.
    pub(crate) fn parse_block(&mut self) -> ParseResult<BlockExpr> {
        let mut vars = Vec::new();
        while self.current().kind == TokenKind::Var {
            vars.push(self.parse_var_binding()?);
            self.advance();
        }
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(BlockExpr { vars, value })
    }

    pub(crate) fn parse_paren_expression(&mut self) -> ParseResult<Expression> {
        let lparen = self.current().clone();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            let inner = BlockExpr {
                vars: Vec::new(),
                value: Expression::Blank(BlankExpr {
                    token: lparen.clone(),
                }),
            };
            let rparen = self.current().clone();
            return Ok(Expression::Paren(Box::new(ParenExpr {
                lparen,
                inner,
                rparen,
            })));
        }

        self.advance();
        let inner = self.parse_block()?;
        if !self.peek_is(TokenKind::RParen) {
            return Err(ParseError::unclosed(TokenKind::LParen, self.peek()));
        }
        self.advance();
        let rparen = self.current().clone();
        Ok(Expression::Paren(Box::new(ParenExpr {
            lparen,
            inner,
            rparen,
        })))
    }

    /// `$NAME(args...)$`
    pub(crate) fn parse_macro_expression(&mut self) -> ParseResult<Expression> {
        let dollar = self.current().clone();
        let name = self.expect_name()?;
        self.expect_peek(TokenKind::LParen)?;
        let lparen = self.current().clone();

        let mut args = Vec::new();
        if !self.peek_is(TokenKind::RParen) {
            loop {
                self.advance();
                args.push(self.parse_expression(Precedence::Lowest)?);
                if !self.peek_is(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }

        if !self.peek_is(TokenKind::RParen) {
            return Err(ParseError::unclosed(TokenKind::LParen, self.peek()));
        }
        self.advance();
        let rparen = self.current().clone();
        if !self.peek_is(TokenKind::Dollar) {
            return Err(ParseError::unclosed(TokenKind::Dollar, self.peek()));
        }
        self.advance();
        let closing = self.current().clone();

        Ok(Expression::Macro(Box::new(MacroExpr {
            dollar,
            name,
            lparen,
            args,
            rparen,
            closing,
        })))
    }

    /// `NAME(arg, arg, ...)` where each argument is a block expression.
    pub(crate) fn parse_builtin_call(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        let name = token.literal.to_ascii_lowercase();
        self.expect_peek(TokenKind::LParen)?;
        let lparen = self.current().clone();

        let mut args = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            let rparen = self.current().clone();
            return Ok(Expression::BuiltinCall(Box::new(BuiltinCall {
                token,
                name,
                lparen,
                args,
                rparen,
            })));
        }

        let rparen = loop {
            self.advance();
            let start = self.position();
            let parsed = self.parse_argument().and_then(|arg| {
                if self.peek_is(TokenKind::Comma) || self.peek_is(TokenKind::RParen) {
                    Ok(arg)
                } else {
                    Err(ParseError::unclosed(TokenKind::LParen, self.peek()))
                }
            });
            match parsed {
                Ok(arg) => {
                    args.push(arg);
                    self.advance();
                    if self.current().kind == TokenKind::RParen {
                        break self.current().clone();
                    }
                }
                Err(error) => {
                    let Some(stop) =
                        self.recovery_point(start, &[TokenKind::Comma, TokenKind::RParen])
                    else {
                        return Err(error);
                    };
                    let tokens = self.tokens_between(start, stop);
                    self.record(error.clone());
                    args.push(Expression::Error(Box::new(ErrorExpr { error, tokens })));
                    self.seek(stop);
                    if self.current().kind == TokenKind::RParen {
                        break self.current().clone();
                    }
                }
            }
        };

        Ok(Expression::BuiltinCall(Box::new(BuiltinCall {
            token,
            name,
            lparen,
            args,
            rparen,
        })))
    }

    /// A call argument. Blocks without bindings collapse to their value.
    fn parse_argument(&mut self) -> ParseResult<Expression> {
        let block = self.parse_block()?;
        if block.vars.is_empty() {
            Ok(block.value)
        } else {
            Ok(Expression::Block(Box::new(block)))
        }
    }

    /// `over CONTEXT [alias NAME]`
    pub(crate) fn parse_over_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        self.advance();
        let context = self.parse_expression(Precedence::Lowest)?;
        let alias = if self.peek_is(TokenKind::Alias) {
            self.advance();
            Some(self.parse_alias()?)
        } else {
            None
        };
        Ok(Expression::Over(Box::new(OverExpr {
            token,
            context,
            alias,
        })))
    }

    fn parse_alias(&mut self) -> ParseResult<AliasExpr> {
        let token = self.current().clone();
        let name = self.expect_name()?;
        Ok(AliasExpr { token, name })
    }

    pub(crate) fn parse_alias_expression(&mut self) -> ParseResult<Expression> {
        self.parse_alias().map(Expression::Alias)
    }

    /// `where CONDITION`
    pub(crate) fn parse_where_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        Ok(Expression::Where(Box::new(WhereExpr { token, condition })))
    }

    /// `order by EXPR [asc|desc]`
    pub(crate) fn parse_order_by_expression(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        self.expect_peek(TokenKind::By)?;
        let by = self.current().clone();
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;

        let direction = match self.peek().kind {
            TokenKind::Asc | TokenKind::Desc => {
                self.advance();
                let token = self.current().clone();
                let direction = if token.kind == TokenKind::Asc {
                    Direction::Asc
                } else {
                    Direction::Desc
                };
                Some(OrderDirection { token, direction })
            }
            _ => None,
        };
        Ok(Expression::OrderBy(Box::new(OrderByExpr {
            token,
            by,
            expr,
            direction,
        })))
    }

    fn parse_set(&mut self) -> ParseResult<SetExpr> {
        let token = self.current().clone();
        let name = self.expect_name()?;
        Ok(SetExpr { token, name })
    }

    pub(crate) fn parse_set_expression(&mut self) -> ParseResult<Expression> {
        self.parse_set().map(Expression::Set)
    }

    /// `[ "A", "B", ... ]`, possibly empty.
    fn parse_list_literal(&mut self) -> ParseResult<ListLiteral> {
        let lbracket = self.current().clone();
        if !self.peek_is(TokenKind::String) && !self.peek_is(TokenKind::RBracket) {
            return Err(ParseError::unexpected(
                self.peek(),
                &[TokenKind::String, TokenKind::RBracket],
            ));
        }

        let mut strings = Vec::new();
        while self.peek_is(TokenKind::String) {
            self.advance();
            strings.push(StringLiteral {
                token: self.current().clone(),
            });
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        if !self.peek_is(TokenKind::RBracket) {
            return Err(ParseError::unclosed(TokenKind::LBracket, self.peek()));
        }
        self.advance();
        let rbracket: Token = self.current().clone();
        Ok(ListLiteral {
            lbracket,
            strings,
            rbracket,
        })
    }

    pub(crate) fn parse_list_expression(&mut self) -> ParseResult<Expression> {
        self.parse_list_literal().map(Expression::List)
    }
}
