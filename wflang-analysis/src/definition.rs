use crate::document::Document;
use wflang_parser::ast::{node_at, Cancellation, SearchError};
use wflang_parser::{Position, Span};

/// Span of the declaration name for the variable under the cursor.
///
/// Returns `Ok(None)` when the cursor is not on an identifier that names a
/// declared variable, including positions outside the document.
pub fn goto_definition(
    document: &Document,
    position: Position,
    cancel: &Cancellation,
) -> Result<Option<Span>, SearchError> {
    let node = match node_at(document.program(), position, cancel) {
        Ok(node) => node,
        Err(SearchError::OutOfRange(_)) => return Ok(None),
        Err(err) => return Err(err),
    };
    Ok(node
        .ident()
        .and_then(|ident| document.resolve(ident))
        .map(|variable| variable.name_span()))
}
