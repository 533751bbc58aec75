use crate::document::Document;
use lsp_types::DiagnosticSeverity;
use wflang_parser::{ParseError, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WfDiagnostic {
    /// Span of the offending token.
    pub span: Span,
    pub message: String,
    pub severity: DiagnosticSeverity,
    /// Short error category, e.g. `reserved word`.
    pub code: String,
}

impl From<&ParseError> for WfDiagnostic {
    fn from(error: &ParseError) -> Self {
        Self {
            span: error.location(),
            message: error.message.clone(),
            severity: DiagnosticSeverity::ERROR,
            code: error.kind.to_string(),
        }
    }
}

/// One diagnostic per parse error, in the order the errors were found.
pub fn diagnostics(document: &Document) -> Vec<WfDiagnostic> {
    document.errors().iter().map(WfDiagnostic::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wflang_parser::Position;

    #[test]
    fn test_clean_document_has_no_diagnostics() {
        assert!(diagnostics(&Document::new("var x = 1;\nx")).is_empty());
    }

    #[test]
    fn test_reserved_word_is_reported_at_its_token() {
        let found = diagnostics(&Document::new("var sum = 1;"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "reserved word");
        assert_eq!(found[0].severity, DiagnosticSeverity::ERROR);
        assert_eq!(found[0].span, Span::new(Position::new(0, 4), Position::new(0, 6)));
    }

    #[test]
    fn test_one_diagnostic_per_error() {
        let found = diagnostics(&Document::new("var = 1;\nvar y = {2020-13-01};\ny"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].message, "invalid calendar date");
    }
}
