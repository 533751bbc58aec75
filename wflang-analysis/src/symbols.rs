use crate::document::Document;
use lsp_types::SymbolKind;
use wflang_parser::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct WfDocumentSymbol {
    pub name: String,
    /// Inferred type of the bound value.
    pub detail: Option<String>,
    pub kind: SymbolKind,
    /// The whole binding, `var` through `;`.
    pub range: Span,
    /// The declared name.
    pub selection_range: Span,
}

/// One symbol per declared variable, in source order.
pub fn document_symbols(document: &Document) -> Vec<WfDocumentSymbol> {
    document
        .variables()
        .iter()
        .map(|variable| WfDocumentSymbol {
            name: variable.name.clone(),
            detail: Some(variable.type_tag().to_string()),
            kind: SymbolKind::VARIABLE,
            range: variable.binding.span(),
            selection_range: variable.name_span(),
        })
        .collect()
}
