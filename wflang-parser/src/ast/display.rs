//! Source printing.
//!
//! `Display` renders a node back to WFLang source. Parsing the printed text
//! yields a tree that prints identically: parentheses are explicit nodes, so
//! printing never needs to add grouping of its own.

use super::nodes::*;
use std::fmt::{self, Display, Formatter};

fn join<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Program {
    /// Expression statements other than the last are terminated with `;` so
    /// that a following prefix operator is not read as an infix one.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let last = self.statements.len().saturating_sub(1);
        for (idx, statement) in self.statements.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", statement)?;
            if idx < last && matches!(statement, Statement::Expression(_)) {
                f.write_str(";")?;
            }
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Expression(stmt) => write!(f, "{}", stmt.expression),
            Statement::Var(binding) => write!(f, "{}", binding),
            Statement::LineComment(comment) | Statement::BlockComment(comment) => {
                f.write_str(&comment.token.literal)
            }
        }
    }
}

impl Display for VarBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "var {} = {};", self.name, self.value)
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.value())
    }
}

impl Display for BlockExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for var in &self.vars {
            write!(f, "{} ", var)?;
        }
        write!(f, "{}", self.value)
    }
}

impl Display for AliasExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "alias {}", self.name)
    }
}

impl Display for SetExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "set {}", self.name)
    }
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        join(f, &self.strings, ", ")?;
        f.write_str("]")
    }
}

impl Display for InList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InList::List(list) => write!(f, "{}", list),
            InList::Set(set) => write!(f, "{}", set),
        }
    }
}

impl Display for ErrorExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            match token.kind {
                crate::token::TokenKind::String => write!(f, "\"{}\"", token.literal)?,
                _ => f.write_str(&token.literal)?,
            }
        }
        Ok(())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Ident(ident) => write!(f, "{}", ident),
            Expression::Number(lit) => f.write_str(&lit.token.literal),
            Expression::String(lit) => write!(f, "{}", lit),
            Expression::Boolean(lit) => f.write_str(if lit.value { "true" } else { "false" }),
            Expression::Date(lit) => write!(f, "{}", lit.date),
            Expression::Time(lit) => write!(f, "{}", lit.clock),
            Expression::Blank(_) => Ok(()),
            Expression::Prefix(prefix) => write!(f, "{}{}", prefix.op.as_str(), prefix.right),
            Expression::Infix(infix) => {
                write!(f, "{} {} {}", infix.left, infix.op.as_str(), infix.right)
            }
            Expression::Paren(paren) => write!(f, "({})", paren.inner),
            Expression::Block(block) => write!(f, "{}", block),
            Expression::Macro(mac) => {
                write!(f, "${}(", mac.name)?;
                join(f, &mac.args, ", ")?;
                f.write_str(")$")
            }
            Expression::BuiltinCall(call) => {
                write!(f, "{}(", call.token.literal)?;
                join(f, &call.args, ", ")?;
                f.write_str(")")
            }
            Expression::Over(over) => {
                write!(f, "over {}", over.context)?;
                if let Some(alias) = &over.alias {
                    write!(f, " {}", alias)?;
                }
                Ok(())
            }
            Expression::Where(clause) => write!(f, "where {}", clause.condition),
            Expression::OrderBy(order) => {
                write!(f, "order by {}", order.expr)?;
                match order.direction.as_ref().map(|d| d.direction) {
                    Some(Direction::Asc) => f.write_str(" asc"),
                    Some(Direction::Desc) => f.write_str(" desc"),
                    None => Ok(()),
                }
            }
            Expression::Alias(alias) => write!(f, "{}", alias),
            Expression::Set(set) => write!(f, "{}", set),
            Expression::List(list) => write!(f, "{}", list),
            Expression::In(in_expr) => write!(f, "{} in {}", in_expr.left, in_expr.list),
            Expression::Error(error) => write!(f, "{}", error),
        }
    }
}
