//! Abstract syntax tree
//!
//! The tree is a closed set of tagged variants ([`Statement`], [`Expression`])
//! rooted at [`Program`]. Nodes own the tokens they were built from, which is
//! where every `span()` comes from.
//!
//! - [`nodes`]: node definitions and span accessors
//! - [`display`]: printing nodes back to source
//! - [`walk`]: the [`Node`] view, [`Visitor`] and [`walk()`](walk::walk)
//! - [`search`]: node-at-position and enclosing-node queries

pub mod display;
pub mod nodes;
pub mod search;
pub mod walk;

pub use nodes::*;
pub use search::{node_at, nodes_enclosing, Cancellation, SearchError};
pub use walk::{walk, Node, Visitor};
