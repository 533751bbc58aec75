//! Semantic token classification and encoding.
//!
//! Coloring is lexical: each token kind maps to at most one legend entry.
//! The encoded form is the flat integer array editors expect, five integers
//! per entry: line delta, column delta, length, legend index and modifiers.

use crate::document::Document;
use wflang_parser::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WfSemanticTokenKind {
    Type,
    Class,
    Parameter,
    Variable,
    Property,
    EnumMember,
    Function,
    Method,
    Macro,
    Keyword,
    Comment,
    String,
    Number,
    Operator,
}

impl WfSemanticTokenKind {
    /// Standard token type name, as advertised in the legend.
    pub fn as_str(self) -> &'static str {
        match self {
            WfSemanticTokenKind::Type => "type",
            WfSemanticTokenKind::Class => "class",
            WfSemanticTokenKind::Parameter => "parameter",
            WfSemanticTokenKind::Variable => "variable",
            WfSemanticTokenKind::Property => "property",
            WfSemanticTokenKind::EnumMember => "enumMember",
            WfSemanticTokenKind::Function => "function",
            WfSemanticTokenKind::Method => "method",
            WfSemanticTokenKind::Macro => "macro",
            WfSemanticTokenKind::Keyword => "keyword",
            WfSemanticTokenKind::Comment => "comment",
            WfSemanticTokenKind::String => "string",
            WfSemanticTokenKind::Number => "number",
            WfSemanticTokenKind::Operator => "operator",
        }
    }

    /// Position in [`SEMANTIC_TOKEN_KINDS`].
    pub fn legend_index(self) -> u32 {
        SEMANTIC_TOKEN_KINDS
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(0) as u32
    }

    /// Legend entry for a token kind, if the kind is colored at all.
    pub fn for_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::CommentLine | TokenKind::CommentBlock => Some(WfSemanticTokenKind::Comment),
            TokenKind::Int | TokenKind::Float => Some(WfSemanticTokenKind::Number),
            TokenKind::String => Some(WfSemanticTokenKind::String),
            TokenKind::Builtin => Some(WfSemanticTokenKind::Function),
            kind if kind.is_keyword() => Some(WfSemanticTokenKind::Keyword),
            _ => None,
        }
    }
}

/// The legend, in index order.
pub const SEMANTIC_TOKEN_KINDS: &[WfSemanticTokenKind] = &[
    WfSemanticTokenKind::Type,
    WfSemanticTokenKind::Class,
    WfSemanticTokenKind::Parameter,
    WfSemanticTokenKind::Variable,
    WfSemanticTokenKind::Property,
    WfSemanticTokenKind::EnumMember,
    WfSemanticTokenKind::Function,
    WfSemanticTokenKind::Method,
    WfSemanticTokenKind::Macro,
    WfSemanticTokenKind::Keyword,
    WfSemanticTokenKind::Comment,
    WfSemanticTokenKind::String,
    WfSemanticTokenKind::Number,
    WfSemanticTokenKind::Operator,
];

/// A colored run on a single line. Columns and lengths are in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WfSemanticToken {
    pub kind: WfSemanticTokenKind,
    pub line: u32,
    pub column: u32,
    pub length: u32,
}

/// Classify tokens, splitting multi-line tokens into one entry per line.
pub fn collect_semantic_tokens(tokens: &[Token], source: &str) -> Vec<WfSemanticToken> {
    let mut collected = Vec::new();
    for token in tokens {
        let Some(kind) = WfSemanticTokenKind::for_token(token.kind) else {
            continue;
        };
        let Some(text) = source.get(token.span.clone()) else {
            continue;
        };
        for (idx, segment) in text.split('\n').enumerate() {
            if segment.is_empty() {
                continue;
            }
            let column = if idx == 0 { token.start.column } else { 0 };
            collected.push(WfSemanticToken {
                kind,
                line: token.start.line + idx as u32,
                column,
                length: segment.len() as u32,
            });
        }
    }
    collected
}

/// Delta-encode single-line tokens in emission order.
pub fn encode_semantic_tokens(tokens: &[WfSemanticToken]) -> Vec<u32> {
    let mut data = Vec::with_capacity(tokens.len() * 5);
    let mut prev_line = 0u32;
    let mut prev_column = 0u32;

    for token in tokens {
        let delta_line = token.line - prev_line;
        let delta_column = if delta_line == 0 {
            token.column - prev_column
        } else {
            token.column
        };
        data.extend_from_slice(&[
            delta_line,
            delta_column,
            token.length,
            token.kind.legend_index(),
            0,
        ]);
        prev_line = token.line;
        prev_column = token.column;
    }

    data
}

/// The snapshot's precomputed encoding.
pub fn semantic_tokens(document: &Document) -> &[u32] {
    document.semantic_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use wflang_parser::tokenize;

    const K: u32 = 9;
    const C: u32 = 10;
    const S: u32 = 11;
    const N: u32 = 12;
    const F: u32 = 6;

    fn encode(source: &str) -> Vec<u32> {
        encode_semantic_tokens(&collect_semantic_tokens(&tokenize(source), source))
    }

    #[test]
    fn test_legend_indices_match_order() {
        assert_eq!(WfSemanticTokenKind::Keyword.legend_index(), K);
        assert_eq!(WfSemanticTokenKind::Comment.legend_index(), C);
        assert_eq!(WfSemanticTokenKind::String.legend_index(), S);
        assert_eq!(WfSemanticTokenKind::Number.legend_index(), N);
        assert_eq!(WfSemanticTokenKind::Function.legend_index(), F);
        assert_eq!(SEMANTIC_TOKEN_KINDS.len(), 14);
    }

    #[test]
    fn test_var_binding_encoding() {
        assert_eq!(encode("var x = 1;"), vec![0, 0, 3, K, 0, 0, 8, 1, N, 0]);
    }

    #[test]
    fn test_string_length_includes_quotes() {
        assert_eq!(
            encode("var x = \"hello, world!\";"),
            vec![0, 0, 3, K, 0, 0, 8, 15, S, 0]
        );
    }

    #[test]
    fn test_multi_line_block_comment_is_split() {
        assert_eq!(encode("/*1\n2*/"), vec![0, 0, 3, C, 0, 1, 0, 3, C, 0]);
    }

    #[test]
    fn test_builtins_and_clause_keywords() {
        let data = encode("sumTime(over day alias d)\n// done");
        assert_eq!(
            data,
            vec![
                0, 0, 7, F, 0, // sumTime
                0, 8, 4, K, 0, // over
                0, 9, 5, K, 0, // alias
                1, 0, 7, C, 0, // comment
            ]
        );
    }

    #[rstest]
    #[case("x")]
    #[case("+")]
    #[case("(")]
    #[case("&")]
    fn test_uncolored_tokens_are_skipped(#[case] source: &str) {
        assert!(encode(source).is_empty());
    }
}
