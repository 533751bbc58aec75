//! Document snapshots.

use crate::semantic_tokens::{collect_semantic_tokens, encode_semantic_tokens};
use tracing::debug;
use wflang_parser::ast::{Cancellation, Ident, Program};
use wflang_parser::{evaluate, parse, ParseError, Position, SourceLocation, Token, Variable};

/// Everything known about one version of a source text.
///
/// Built once per edit and never mutated afterwards. The only shared state is
/// the cancellation flag, which the owner raises when a newer snapshot
/// replaces this one.
#[derive(Debug)]
pub struct Document {
    source: String,
    tokens: Vec<Token>,
    program: Program,
    errors: Vec<ParseError>,
    variables: Vec<Variable>,
    location: SourceLocation,
    semantic_tokens: Vec<u32>,
    cancellation: Cancellation,
}

impl Document {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let output = parse(&source);
        let evaluation = evaluate(&output.program);
        let location = SourceLocation::new(&source);
        let semantic_tokens =
            encode_semantic_tokens(&collect_semantic_tokens(&output.tokens, &source));
        debug!(
            tokens = output.tokens.len(),
            errors = output.errors.len(),
            variables = evaluation.variables.len(),
            "built document snapshot"
        );
        Self {
            source,
            tokens: output.tokens,
            program: output.program,
            errors: output.errors,
            variables: evaluation.variables,
            location,
            semantic_tokens,
            cancellation: Cancellation::new(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All tokens in source order, comments included.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Declared variables in source order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Delta-encoded semantic tokens, five integers per entry.
    pub fn semantic_tokens(&self) -> &[u32] {
        &self.semantic_tokens
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Signal in-flight queries on this snapshot to stop.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// The token whose span contains `pos`.
    pub fn token_at(&self, pos: Position) -> Option<&Token> {
        self.tokens.iter().find(|token| token.location().contains(pos))
    }

    /// The variable a name refers to at `pos`: the latest one declared with
    /// that name whose declaration starts at or before `pos`.
    pub fn variable_at(&self, name: &str, pos: Position) -> Option<&Variable> {
        self.variables
            .iter()
            .rev()
            .find(|var| var.name == name && var.name_span().start <= pos)
    }

    /// The variable an identifier node refers to.
    pub fn resolve(&self, ident: &Ident) -> Option<&Variable> {
        self.variable_at(&ident.name, ident.span().start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wflang_parser::TokenKind;

    #[test]
    fn test_snapshot_holds_every_stage() {
        let document = Document::new("var x = 1;\n// note\nx * 42");
        assert_eq!(document.source(), "var x = 1;\n// note\nx * 42");
        assert_eq!(document.tokens().len(), 9);
        assert_eq!(document.program().statements.len(), 3);
        assert!(document.errors().is_empty());
        assert_eq!(document.variables().len(), 1);
        assert_eq!(document.location().line_count(), 3);
        assert_eq!(document.semantic_tokens().len() % 5, 0);
    }

    #[test]
    fn test_token_at_uses_inclusive_ends() {
        let document = Document::new("var total = 1;");
        let token = document.token_at(Position::new(0, 8)).unwrap();
        assert_eq!(token.literal, "total");
        assert_eq!(document.token_at(Position::new(0, 3)), None);
        assert_eq!(
            document.token_at(Position::new(0, 13)).map(|t| t.kind),
            Some(TokenKind::Semicolon)
        );
    }

    #[test]
    fn test_variable_at_prefers_latest_earlier_declaration() {
        let document = Document::new("var x = 1;\nvar x = \"two\";\nx");
        let first = document.variable_at("x", Position::new(0, 9)).unwrap();
        assert_eq!(first.binding.name.span().start, Position::new(0, 4));
        let second = document.variable_at("x", Position::new(2, 0)).unwrap();
        assert_eq!(second.binding.name.span().start, Position::new(1, 4));
        assert!(document.variable_at("y", Position::new(2, 0)).is_none());
    }

    #[test]
    fn test_cancel_is_visible_through_the_flag() {
        let document = Document::new("1");
        let flag = document.cancellation().clone();
        assert!(!flag.is_cancelled());
        document.cancel();
        assert!(flag.is_cancelled());
    }
}
