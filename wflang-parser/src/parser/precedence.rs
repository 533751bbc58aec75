//! Binding power of infix operators.

use crate::token::TokenKind;

/// Precedence levels, loosest first. All infix operators associate left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Or,
    And,
    In,
    Equals,
    Compare,
    Sum,
    Product,
    Prefix,
}

impl Precedence {
    /// Binding power of `kind` in infix position; `Lowest` for non-operators.
    pub fn of(kind: TokenKind) -> Precedence {
        match kind {
            TokenKind::Or => Precedence::Or,
            TokenKind::And => Precedence::And,
            TokenKind::In => Precedence::In,
            TokenKind::Eq | TokenKind::Neq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt | TokenKind::Lte | TokenKind::Gte => {
                Precedence::Compare
            }
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Modulo => Precedence::Product,
            _ => Precedence::Lowest,
        }
    }
}
