//! Hover documentation.
//!
//! Builtin names show their catalog docstring. Identifiers that name a
//! declared variable show the variable's inferred type.

use crate::document::Document;
use lsp_types::MarkupKind;
use wflang_parser::{builtins, Position, Span, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct HoverResult {
    pub kind: MarkupKind,
    pub value: String,
    /// The hovered token.
    pub span: Span,
}

pub fn hover(document: &Document, position: Position) -> Option<HoverResult> {
    let token = document.token_at(position)?;
    let value = match token.kind {
        TokenKind::Builtin => builtins::lookup(&token.literal)?.docstring(),
        TokenKind::Ident => {
            let variable = document.variable_at(&token.literal, token.start)?;
            format!("```wflang\n{}\n```", variable)
        }
        _ => return None,
    };
    Some(HoverResult {
        kind: MarkupKind::Markdown,
        value,
        span: token.location(),
    })
}
