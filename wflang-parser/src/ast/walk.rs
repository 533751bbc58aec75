//! Uniform traversal over the tree.
//!
//! [`Node`] is a borrowed view of any node that can be visited. Statements are
//! not nodes of their own: a program's children are its var bindings,
//! expressions and comments directly.

use super::nodes::*;
use crate::position::Span;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Program(&'a Program),
    VarBinding(&'a VarBinding),
    Comment(&'a Comment),
    Expression(&'a Expression),
    Block(&'a BlockExpr),
    Ident(&'a Ident),
    Alias(&'a AliasExpr),
    Set(&'a SetExpr),
    List(&'a ListLiteral),
    StringLiteral(&'a StringLiteral),
}

impl<'a> Node<'a> {
    pub fn span(&self) -> Span {
        match self {
            Node::Program(program) => program.span(),
            Node::VarBinding(binding) => binding.span(),
            Node::Comment(comment) => comment.token.location(),
            Node::Expression(expr) => expr.span(),
            Node::Block(block) => block.span(),
            Node::Ident(ident) => ident.span(),
            Node::Alias(alias) => alias.span(),
            Node::Set(set) => set.span(),
            Node::List(list) => list.span(),
            Node::StringLiteral(lit) => lit.span(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program(_) => "Program",
            Node::VarBinding(_) => "VarBinding",
            Node::Comment(_) => "Comment",
            Node::Expression(expr) => expr.kind_name(),
            Node::Block(_) => "Block",
            Node::Ident(_) => "Ident",
            Node::Alias(_) => "Alias",
            Node::Set(_) => "Set",
            Node::List(_) => "ListLiteral",
            Node::StringLiteral(_) => "StringLiteral",
        }
    }

    /// The identifier this node is, whether it appears as a name or as an
    /// expression.
    pub fn ident(&self) -> Option<&'a Ident> {
        match *self {
            Node::Ident(ident) => Some(ident),
            Node::Expression(Expression::Ident(ident)) => Some(ident),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&'a Expression> {
        match *self {
            Node::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Program(program) => program
                .statements
                .iter()
                .map(|statement| match statement {
                    Statement::Expression(stmt) => Node::Expression(&stmt.expression),
                    Statement::Var(binding) => Node::VarBinding(binding),
                    Statement::LineComment(comment) | Statement::BlockComment(comment) => {
                        Node::Comment(comment)
                    }
                })
                .collect(),
            Node::VarBinding(binding) => {
                vec![Node::Ident(&binding.name), Node::Expression(&binding.value)]
            }
            Node::Block(block) => block_children(block),
            Node::Alias(alias) => vec![Node::Ident(&alias.name)],
            Node::Set(set) => vec![Node::Ident(&set.name)],
            Node::List(list) => list.strings.iter().map(Node::StringLiteral).collect(),
            Node::Expression(expr) => expression_children(expr),
            Node::Comment(_) | Node::Ident(_) | Node::StringLiteral(_) => Vec::new(),
        }
    }
}

fn block_children(block: &BlockExpr) -> Vec<Node<'_>> {
    let mut children: Vec<Node<'_>> = block.vars.iter().map(Node::VarBinding).collect();
    children.push(Node::Expression(&block.value));
    children
}

fn expression_children(expr: &Expression) -> Vec<Node<'_>> {
    match expr {
        Expression::Ident(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::Boolean(_)
        | Expression::Date(_)
        | Expression::Time(_)
        | Expression::Blank(_)
        | Expression::Error(_) => Vec::new(),
        Expression::Prefix(prefix) => vec![Node::Expression(&prefix.right)],
        Expression::Infix(infix) => {
            vec![Node::Expression(&infix.left), Node::Expression(&infix.right)]
        }
        Expression::Paren(paren) => vec![Node::Block(&paren.inner)],
        Expression::Block(block) => block_children(block),
        Expression::Macro(mac) => {
            let mut children = vec![Node::Ident(&mac.name)];
            children.extend(mac.args.iter().map(Node::Expression));
            children
        }
        Expression::BuiltinCall(call) => call.args.iter().map(Node::Expression).collect(),
        Expression::Over(over) => {
            let mut children = vec![Node::Expression(&over.context)];
            if let Some(alias) = &over.alias {
                children.push(Node::Alias(alias));
            }
            children
        }
        Expression::Where(clause) => vec![Node::Expression(&clause.condition)],
        Expression::OrderBy(order) => vec![Node::Expression(&order.expr)],
        Expression::Alias(alias) => vec![Node::Ident(&alias.name)],
        Expression::Set(set) => vec![Node::Ident(&set.name)],
        Expression::List(list) => list.strings.iter().map(Node::StringLiteral).collect(),
        Expression::In(in_expr) => {
            let list = match &in_expr.list {
                InList::List(list) => Node::List(list),
                InList::Set(set) => Node::Set(set),
            };
            vec![Node::Expression(&in_expr.left), list]
        }
    }
}

/// Visitor for traversing the AST
///
/// `visit` is called before a node's children and `leave` after them.
/// Returning `false` from `visit` skips the children (`leave` still runs).
pub trait Visitor<'a> {
    fn visit(&mut self, _node: Node<'a>) -> bool {
        true
    }
    fn leave(&mut self, _node: Node<'a>) {}
}

/// Depth-first, pre-order walk starting at `node`.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: Node<'a>) {
    if visitor.visit(node) {
        for child in node.children() {
            walk(visitor, child);
        }
    }
    visitor.leave(node);
}

impl Program {
    pub fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        walk(visitor, Node::Program(self));
    }
}
