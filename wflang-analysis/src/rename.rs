//! Variable rename.
//!
//! A rename rewrites every identifier that refers to the same declaration as
//! the identifier under the cursor: the declared name plus each use that
//! resolves to it. Shadowing declarations with the same name are left alone.

use crate::document::Document;
use thiserror::Error;
use wflang_parser::ast::{node_at, Cancellation, Ident, Node, SearchError, Visitor};
use wflang_parser::token::{lookup_word, TokenKind};
use wflang_parser::{tokenize, Position, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("`{0}` is a reserved word")]
    Reserved(String),
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),
    #[error("rename aborted")]
    Aborted,
}

/// Check that `name` lexes as exactly one plain identifier.
pub fn validate_name(name: &str) -> Result<(), RenameError> {
    let tokens = tokenize(name);
    match tokens.as_slice() {
        [token] if token.len() == name.len() && token.kind == TokenKind::Ident => {
            if token.literal == "_" {
                Err(RenameError::InvalidName(name.to_string()))
            } else {
                Ok(())
            }
        }
        [token] if token.len() == name.len() && lookup_word(name) != TokenKind::Ident => {
            Err(RenameError::Reserved(name.to_string()))
        }
        _ => Err(RenameError::InvalidName(name.to_string())),
    }
}

/// Edits renaming the variable under the cursor to `new_name`.
///
/// `Ok(None)` means the cursor is not on a declared variable.
pub fn rename(
    document: &Document,
    position: Position,
    new_name: &str,
    cancel: &Cancellation,
) -> Result<Option<Vec<TextEdit>>, RenameError> {
    validate_name(new_name)?;

    let node = match node_at(document.program(), position, cancel) {
        Ok(node) => node,
        Err(SearchError::OutOfRange(_)) => return Ok(None),
        Err(SearchError::Aborted) => return Err(RenameError::Aborted),
    };
    let Some(target) = node.ident().and_then(|ident| document.resolve(ident)) else {
        return Ok(None);
    };
    let target_span = target.name_span();

    let mut collector = References {
        document,
        name: &target.name,
        target: target_span,
        cancel,
        found: Vec::new(),
        aborted: false,
    };
    document.program().accept(&mut collector);
    if collector.aborted {
        return Err(RenameError::Aborted);
    }

    Ok(Some(
        collector
            .found
            .into_iter()
            .map(|span| TextEdit {
                span,
                new_text: new_name.to_string(),
            })
            .collect(),
    ))
}

struct References<'d> {
    document: &'d Document,
    name: &'d str,
    target: Span,
    cancel: &'d Cancellation,
    found: Vec<Span>,
    aborted: bool,
}

impl References<'_> {
    fn refers_to_target(&self, ident: &Ident) -> bool {
        ident.name == self.name
            && self
                .document
                .resolve(ident)
                .is_some_and(|variable| variable.name_span() == self.target)
    }
}

impl<'a> Visitor<'a> for References<'_> {
    fn visit(&mut self, node: Node<'a>) -> bool {
        if self.aborted || self.cancel.is_cancelled() {
            self.aborted = true;
            return false;
        }
        if let Some(ident) = node.ident() {
            if self.refers_to_target(ident) {
                self.found.push(ident.span());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn edit_starts(edits: &[TextEdit]) -> Vec<(u32, u32)> {
        edits
            .iter()
            .map(|edit| (edit.span.start.line, edit.span.start.column))
            .collect()
    }

    #[test]
    fn test_rename_binding_and_uses() {
        let document = Document::new("var x = 1;\nvar y = x + 2;\nx * y");
        let edits = rename(&document, Position::new(2, 0), "hours", &Cancellation::new())
            .unwrap()
            .unwrap();
        assert_eq!(edit_starts(&edits), vec![(0, 4), (1, 8), (2, 0)]);
        assert!(edits.iter().all(|edit| edit.new_text == "hours"));
    }

    #[test]
    fn test_rename_respects_shadowing() {
        let document = Document::new("var x = 1;\nvar y = x;\nvar x = 2;\nx");
        let edits = rename(&document, Position::new(0, 4), "first", &Cancellation::new())
            .unwrap()
            .unwrap();
        assert_eq!(edit_starts(&edits), vec![(0, 4), (1, 8)]);
    }

    #[rstest]
    #[case("sum", RenameError::Reserved("sum".into()))]
    #[case("WHERE", RenameError::Reserved("WHERE".into()))]
    #[case("true", RenameError::Reserved("true".into()))]
    #[case("two words", RenameError::InvalidName("two words".into()))]
    #[case("9lives", RenameError::InvalidName("9lives".into()))]
    #[case("", RenameError::InvalidName("".into()))]
    #[case("_", RenameError::InvalidName("_".into()))]
    fn test_invalid_names_are_rejected(#[case] name: &str, #[case] expected: RenameError) {
        let document = Document::new("var x = 1;\nx");
        let result = rename(&document, Position::new(1, 0), name, &Cancellation::new());
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn test_non_variable_positions_yield_none() {
        let document = Document::new("var x = 1;\nmax(x, 2)");
        let cancel = Cancellation::new();
        assert_eq!(rename(&document, Position::new(1, 1), "y", &cancel), Ok(None));
        assert_eq!(rename(&document, Position::new(0, 8), "y", &cancel), Ok(None));
        assert_eq!(rename(&document, Position::new(7, 0), "y", &cancel), Ok(None));
    }

    #[test]
    fn test_cancelled_rename_aborts() {
        let document = Document::new("var x = 1;\nx");
        document.cancel();
        let result = rename(&document, Position::new(1, 0), "y", document.cancellation());
        assert_eq!(result, Err(RenameError::Aborted));
    }
}
