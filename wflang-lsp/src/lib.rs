//! Language Server Protocol (LSP) implementation for WFLang
//!
//!     This crate serves the queries of `wflang-analysis` to any LSP-capable editor over
//!     stdin/stdout, using tower-lsp for the JSON-RPC plumbing.
//!
//! Architecture
//!
//!     LSP Layer (tower-lsp):
//!         - JSON-RPC transport, capability negotiation, request routing
//!
//!     Server Layer (this crate):
//!         - Implements the LanguageServer trait
//!         - Keeps one immutable Document snapshot per open URI (see documents)
//!         - Converts between analysis types and lsp-types
//!         - Thin tests asserting the feature layer is called and its answers are converted
//!
//!     Feature Layer (wflang-analysis):
//!         - Pure functions over a snapshot, with the dense unit tests
//!
//! Positions
//!
//!     Lines and columns are zero-based and columns count bytes. Analysis spans include
//!     their last character, so every range sent to the client ends one column later.
//!
//! Cancellation
//!
//!     A change replaces the stored snapshot and cancels the previous one. Requests still
//!     walking the old tree fail with the `ContentModified` error code (-32801) and the
//!     client retries against the new text.
//!
//! Usage
//!
//!     $ wflang-lsp [-v] [--config path/to/wflang.toml]
//!     Starts the language server on stdin/stdout. Logs go to stderr.

pub mod documents;
pub mod server;

pub use documents::DocumentStore;
pub use server::{DefaultFeatureProvider, FeatureProvider, LspClient, WflangLanguageServer};
