//! # wflang-parser
//!
//! Front end for WFLang, the formula language used by payroll rule authors.
//!
//! File Layout
//!
//! The pipeline runs source text through three stages, each usable alone:
//!
//! src/
//!   ├── lexer        logos scanner plus positional token stream
//!   ├── parser       Pratt parser with statement-level error recovery
//!   ├── ast          node types, printing, traversal and position search
//!   └── eval         static evaluation: variables and known types
//!
//! Supporting modules hold positions ([`position`]), date and time literals
//! ([`dates`]), the closed type set ([`object`]) and the builtin function
//! catalog ([`builtins`]).
//!
//! Positions are zero-based `line:column` pairs and every span is inclusive at
//! both ends. Nothing in this crate executes a formula.

pub mod ast;
pub mod builtins;
pub mod dates;
pub mod eval;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod position;
pub mod token;

pub use ast::Program;
pub use eval::{evaluate, Evaluation};
pub use lexer::{tokenize, Lexer};
pub use object::{Object, TypeTag, Variable};
pub use parser::{parse, ParseError, ParseErrorKind, ParseOutput};
pub use position::{Position, SourceLocation, Span};
pub use token::{Token, TokenKind};
