//! Editor queries over WFLang documents.
//!
//! A [`Document`] is an immutable snapshot of one source text: its tokens,
//! tree, parse errors, declared variables and the encoded semantic tokens.
//! Every query in this crate is a plain function over a snapshot, so callers
//! may share snapshots freely across threads. Queries that walk the tree take
//! a [`Cancellation`] and give up with [`SearchError::Aborted`] once it fires.

pub mod completion;
pub mod definition;
pub mod diagnostics;
pub mod document;
pub mod hover;
pub mod rename;
pub mod semantic_tokens;
pub mod signature_help;
pub mod symbols;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use completion::{completion, CompletionCandidate, CompletionOptions};
pub use definition::goto_definition;
pub use diagnostics::{diagnostics, WfDiagnostic};
pub use document::Document;
pub use hover::{hover, HoverResult};
pub use rename::{rename, RenameError, TextEdit};
pub use semantic_tokens::{semantic_tokens, WfSemanticTokenKind, SEMANTIC_TOKEN_KINDS};
pub use signature_help::{signature_help, ParameterInfo, SignatureHelpResult};
pub use symbols::{document_symbols, WfDocumentSymbol};
pub use wflang_parser::ast::{Cancellation, SearchError};
