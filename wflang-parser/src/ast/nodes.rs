//! AST node definitions.
//!
//! Every node keeps the tokens it was built from, so spans are read straight
//! off the tokens and never recomputed.

use crate::dates::{Clock, Date};
use crate::parser::ParseError;
use crate::position::Span;
use crate::token::Token;

/// Root of a parsed formula.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
    /// Covers the whole source, from `0:0` through the EOF position.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStmt),
    Var(VarBinding),
    LineComment(Comment),
    BlockComment(Comment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expression,
}

/// `var NAME = EXPR ;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarBinding {
    pub token: Token,
    pub name: Ident,
    pub value: Expression,
    pub semicolon: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Ident(Ident),
    Number(NumberLiteral),
    String(StringLiteral),
    Boolean(BooleanLiteral),
    Date(DateLiteral),
    Time(TimeLiteral),
    Blank(BlankExpr),
    Prefix(Box<PrefixExpr>),
    Infix(Box<InfixExpr>),
    Paren(Box<ParenExpr>),
    Block(Box<BlockExpr>),
    Macro(Box<MacroExpr>),
    BuiltinCall(Box<BuiltinCall>),
    Over(Box<OverExpr>),
    Where(Box<WhereExpr>),
    OrderBy(Box<OrderByExpr>),
    Alias(AliasExpr),
    Set(SetExpr),
    List(ListLiteral),
    In(Box<InExpr>),
    /// Placeholder for a subtree that failed to parse but was recovered from.
    Error(Box<ErrorExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub token: Token,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
}

impl StringLiteral {
    /// The string contents without quotes.
    pub fn value(&self) -> &str {
        &self.token.literal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateLiteral {
    pub token: Token,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeLiteral {
    pub token: Token,
    pub clock: Clock,
}

/// Stands in for the missing contents of `()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlankExpr {
    pub token: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Negate,
    Not,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Negate => "-",
            PrefixOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub token: Token,
    pub op: PrefixOp,
    pub right: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
    And,
    Or,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Gt => ">",
            InfixOp::Lt => "<",
            InfixOp::Gte => ">=",
            InfixOp::Lte => "<=",
            InfixOp::Eq => "=",
            InfixOp::Neq => "!=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub token: Token,
    pub left: Expression,
    pub op: InfixOp,
    pub right: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub lparen: Token,
    pub inner: BlockExpr,
    pub rparen: Token,
}

/// Zero or more bindings followed by exactly one value expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockExpr {
    pub vars: Vec<VarBinding>,
    pub value: Expression,
}

/// `$NAME(args...)$`
#[derive(Debug, Clone, PartialEq)]
pub struct MacroExpr {
    pub dollar: Token,
    pub name: Ident,
    pub lparen: Token,
    pub args: Vec<Expression>,
    pub rparen: Token,
    pub closing: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinCall {
    pub token: Token,
    /// Lowercased catalog key.
    pub name: String,
    pub lparen: Token,
    pub args: Vec<Expression>,
    pub rparen: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverExpr {
    pub token: Token,
    pub context: Expression,
    pub alias: Option<AliasExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereExpr {
    pub token: Token,
    pub condition: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDirection {
    pub token: Token,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub token: Token,
    pub by: Token,
    pub expr: Expression,
    pub direction: Option<OrderDirection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AliasExpr {
    pub token: Token,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetExpr {
    pub token: Token,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub lbracket: Token,
    pub strings: Vec<StringLiteral>,
    pub rbracket: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InList {
    List(ListLiteral),
    Set(SetExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InExpr {
    pub token: Token,
    pub left: Expression,
    pub list: InList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorExpr {
    pub error: ParseError,
    /// Tokens skipped while recovering. Empty when the argument was missing.
    pub tokens: Vec<Token>,
}

fn token_span(first: &Token, last: &Token) -> Span {
    Span::new(first.start, last.end)
}

impl Program {
    pub fn span(&self) -> Span {
        self.span
    }
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Expression(stmt) => stmt.expression.span(),
            Statement::Var(binding) => binding.span(),
            Statement::LineComment(comment) | Statement::BlockComment(comment) => {
                comment.token.location()
            }
        }
    }
}

impl VarBinding {
    pub fn span(&self) -> Span {
        token_span(&self.token, &self.semicolon)
    }
}

impl Ident {
    pub fn span(&self) -> Span {
        self.token.location()
    }
}

impl BlockExpr {
    pub fn span(&self) -> Span {
        let value = self.value.span();
        match self.vars.first() {
            Some(first) => first.span().to(value),
            None => value,
        }
    }
}

impl AliasExpr {
    pub fn span(&self) -> Span {
        token_span(&self.token, &self.name.token)
    }
}

impl SetExpr {
    pub fn span(&self) -> Span {
        token_span(&self.token, &self.name.token)
    }
}

impl ListLiteral {
    pub fn span(&self) -> Span {
        token_span(&self.lbracket, &self.rbracket)
    }
}

impl StringLiteral {
    pub fn span(&self) -> Span {
        self.token.location()
    }
}

impl InList {
    pub fn span(&self) -> Span {
        match self {
            InList::List(list) => list.span(),
            InList::Set(set) => set.span(),
        }
    }
}

impl ErrorExpr {
    pub fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => token_span(first, last),
            _ => self.error.token.location(),
        }
    }
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Ident(ident) => ident.span(),
            Expression::Number(lit) => lit.token.location(),
            Expression::String(lit) => lit.span(),
            Expression::Boolean(lit) => lit.token.location(),
            Expression::Date(lit) => lit.token.location(),
            Expression::Time(lit) => lit.token.location(),
            Expression::Blank(blank) => blank.token.location(),
            Expression::Prefix(prefix) => prefix.token.location().to(prefix.right.span()),
            Expression::Infix(infix) => infix.left.span().to(infix.right.span()),
            Expression::Paren(paren) => token_span(&paren.lparen, &paren.rparen),
            Expression::Block(block) => block.span(),
            Expression::Macro(mac) => token_span(&mac.dollar, &mac.closing),
            Expression::BuiltinCall(call) => token_span(&call.token, &call.rparen),
            Expression::Over(over) => {
                let end = match &over.alias {
                    Some(alias) => alias.span(),
                    None => over.context.span(),
                };
                over.token.location().to(end)
            }
            Expression::Where(clause) => clause.token.location().to(clause.condition.span()),
            Expression::OrderBy(order) => {
                let end = match &order.direction {
                    Some(direction) => direction.token.location(),
                    None => order.expr.span(),
                };
                order.token.location().to(end)
            }
            Expression::Alias(alias) => alias.span(),
            Expression::Set(set) => set.span(),
            Expression::List(list) => list.span(),
            Expression::In(in_expr) => in_expr.left.span().to(in_expr.list.span()),
            Expression::Error(error) => error.span(),
        }
    }

    /// Short variant name, used for debugging output and tests.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Ident(_) => "Ident",
            Expression::Number(_) => "NumberLiteral",
            Expression::String(_) => "StringLiteral",
            Expression::Boolean(_) => "BooleanLiteral",
            Expression::Date(_) => "DateLiteral",
            Expression::Time(_) => "TimeLiteral",
            Expression::Blank(_) => "BlankExpr",
            Expression::Prefix(_) => "Prefix",
            Expression::Infix(_) => "Infix",
            Expression::Paren(_) => "Paren",
            Expression::Block(_) => "Block",
            Expression::Macro(_) => "Macro",
            Expression::BuiltinCall(_) => "BuiltinCall",
            Expression::Over(_) => "Over",
            Expression::Where(_) => "Where",
            Expression::OrderBy(_) => "OrderBy",
            Expression::Alias(_) => "Alias",
            Expression::Set(_) => "Set",
            Expression::List(_) => "ListLiteral",
            Expression::In(_) => "InExpr",
            Expression::Error(_) => "Error",
        }
    }
}

