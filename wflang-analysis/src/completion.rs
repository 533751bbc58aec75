use crate::document::Document;
use lsp_types::CompletionItemKind;
use std::collections::BTreeSet;
use wflang_parser::token::keywords;
use wflang_parser::{builtins, Position};

/// Describes a semantic completion candidate that can be translated into protocol specific items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CompletionItemKind,
    pub insert_text: Option<String>,
    /// Markdown documentation.
    pub documentation: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            insert_text: None,
            documentation: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Which groups of candidates to offer. Builtins are always offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOptions {
    pub variables: bool,
    pub keywords: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            variables: true,
            keywords: false,
        }
    }
}

/// Produce completion candidates for the document at the provided position.
///
/// The list does not depend on the position beyond variable visibility:
/// variables declared after the cursor are not offered.
pub fn completion(
    document: &Document,
    position: Position,
    options: CompletionOptions,
) -> Vec<CompletionCandidate> {
    let mut items = builtin_completions();
    if options.variables {
        items.extend(variable_completions(document, position));
    }
    if options.keywords {
        items.extend(keyword_completions());
    }
    items
}

fn builtin_completions() -> Vec<CompletionCandidate> {
    builtins::all()
        .into_iter()
        .map(|function| {
            CompletionCandidate::new(function.display_name, CompletionItemKind::FUNCTION)
                .with_detail(function.signature())
                .with_insert_text(function.display_name)
                .with_documentation(function.docstring())
        })
        .collect()
}

fn variable_completions(document: &Document, position: Position) -> Vec<CompletionCandidate> {
    let mut seen = BTreeSet::new();
    document
        .variables()
        .iter()
        .rev()
        .filter(|variable| variable.name_span().start < position)
        .filter(|variable| seen.insert(variable.name.clone()))
        .map(|variable| {
            CompletionCandidate::new(&variable.name, CompletionItemKind::VARIABLE)
                .with_detail(variable.type_tag().to_string())
                .with_insert_text(&variable.name)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}

fn keyword_completions() -> Vec<CompletionCandidate> {
    let words: BTreeSet<_> = keywords().collect();
    words
        .into_iter()
        .map(|word| CompletionCandidate::new(word, CompletionItemKind::KEYWORD).with_insert_text(word))
        .collect()
}
