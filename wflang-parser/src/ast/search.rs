//! Positional queries over the tree.
//!
//! Both searches descend into the first child whose span contains the
//! position and check the cancellation flag before every descent.

use super::nodes::Program;
use super::walk::Node;
use crate::position::Position;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Cooperative cancellation flag shared between a snapshot and its readers.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SearchError> {
        if self.is_cancelled() {
            Err(SearchError::Aborted)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("position {0} is outside the document")]
    OutOfRange(Position),
    #[error("search aborted")]
    Aborted,
}

/// Deepest node whose span contains `pos`.
pub fn node_at<'a>(
    program: &'a Program,
    pos: Position,
    cancel: &Cancellation,
) -> Result<Node<'a>, SearchError> {
    let root = Node::Program(program);
    let chain = descend(root, pos, cancel)?;
    Ok(chain.last().copied().unwrap_or(root))
}

/// Every node containing `pos`, outermost first. The program itself is not
/// included.
pub fn nodes_enclosing<'a>(
    program: &'a Program,
    pos: Position,
    cancel: &Cancellation,
) -> Result<Vec<Node<'a>>, SearchError> {
    descend(Node::Program(program), pos, cancel)
}

fn descend<'a>(
    root: Node<'a>,
    pos: Position,
    cancel: &Cancellation,
) -> Result<Vec<Node<'a>>, SearchError> {
    if !root.span().contains(pos) {
        return Err(SearchError::OutOfRange(pos));
    }
    let mut chain = Vec::new();
    let mut current = root;
    loop {
        cancel.check()?;
        match current
            .children()
            .into_iter()
            .find(|child| child.span().contains(pos))
        {
            Some(child) => {
                chain.push(child);
                current = child;
            }
            None => return Ok(chain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_node_at_finds_deepest() {
        let output = parse("var x = 1;\nx * 42");
        let cancel = Cancellation::new();

        let node = node_at(&output.program, Position::new(1, 0), &cancel).unwrap();
        assert_eq!(node.ident().map(|i| i.name.as_str()), Some("x"));

        let node = node_at(&output.program, Position::new(1, 2), &cancel).unwrap();
        assert_eq!(node.kind_name(), "Infix");

        let node = node_at(&output.program, Position::new(0, 4), &cancel).unwrap();
        assert_eq!(node.kind_name(), "Ident");
    }

    #[test]
    fn test_nodes_enclosing_excludes_program() {
        let output = parse("var x = 1;\nx * 42");
        let chain =
            nodes_enclosing(&output.program, Position::new(1, 5), &Cancellation::new()).unwrap();
        let kinds: Vec<_> = chain.iter().map(|n| n.kind_name()).collect();
        assert_eq!(kinds, vec!["Infix", "NumberLiteral"]);
    }

    #[test]
    fn test_out_of_range() {
        let output = parse("x");
        let err = node_at(&output.program, Position::new(4, 0), &Cancellation::new());
        assert_eq!(err, Err(SearchError::OutOfRange(Position::new(4, 0))));
    }

    #[test]
    fn test_cancelled_search_aborts() {
        let output = parse("x + 1");
        let cancel = Cancellation::new();
        cancel.cancel();
        let err = nodes_enclosing(&output.program, Position::new(0, 0), &cancel);
        assert_eq!(err, Err(SearchError::Aborted));
    }
}
