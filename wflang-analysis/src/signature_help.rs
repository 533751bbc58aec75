//! Signature help.
//!
//! The query looks at the character just before the cursor, finds the
//! innermost call around it and reports which parameter the cursor is on.
//! While the user is mid-typing the call may not parse at all; the token
//! stream is then scanned backward for an unmatched `(` that follows a
//! builtin name.

use crate::document::Document;
use wflang_parser::ast::{nodes_enclosing, Cancellation, Expression, SearchError};
use wflang_parser::builtins::{self, param_doc, Function};
use wflang_parser::{Position, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterInfo {
    /// Half-open byte offsets of the parameter within the signature label.
    pub label: [u32; 2],
    pub documentation: String,
}

/// Signature of the call under the cursor. The default value is the empty
/// result returned for macros.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignatureHelpResult {
    pub label: String,
    pub params: Vec<ParameterInfo>,
    pub active_param: u32,
    pub documentation: String,
}

impl SignatureHelpResult {
    fn for_function(function: &Function, commas: usize) -> Self {
        let params = function
            .params
            .iter()
            .zip(function.param_label_offsets())
            .map(|(param, label)| ParameterInfo {
                label,
                documentation: param_doc(param),
            })
            .collect();
        Self {
            label: function.signature(),
            params,
            active_param: function.param_index(commas) as u32,
            documentation: function.docstring(),
        }
    }
}

enum CallSite<'a> {
    Builtin { name: &'a str, lparen: &'a Token },
    Macro,
}

pub fn signature_help(
    document: &Document,
    position: Position,
    cancel: &Cancellation,
) -> Result<Option<SignatureHelpResult>, SearchError> {
    let before = position.left(1);
    let site = match innermost_call(document, before, cancel)? {
        Some(site) => Some(site),
        None => scan_for_call(document.tokens(), position),
    };
    let Some(site) = site else {
        return Ok(None);
    };
    match site {
        CallSite::Macro => Ok(Some(SignatureHelpResult::default())),
        CallSite::Builtin { name, lparen } => {
            let Some(function) = builtins::lookup(name) else {
                return Ok(None);
            };
            let commas = count_commas(document.tokens(), lparen, position);
            Ok(Some(SignatureHelpResult::for_function(function, commas)))
        }
    }
}

fn innermost_call<'a>(
    document: &'a Document,
    before: Position,
    cancel: &Cancellation,
) -> Result<Option<CallSite<'a>>, SearchError> {
    let chain = match nodes_enclosing(document.program(), before, cancel) {
        Ok(chain) => chain,
        Err(SearchError::OutOfRange(_)) => return Ok(None),
        Err(err) => return Err(err),
    };
    Ok(chain
        .iter()
        .rev()
        .filter_map(|node| node.as_expression())
        .find_map(|expr| match expr {
            Expression::BuiltinCall(call) => Some(CallSite::Builtin {
                name: &call.name,
                lparen: &call.lparen,
            }),
            Expression::Macro(_) => Some(CallSite::Macro),
            _ => None,
        }))
}

/// Walk backward from the cursor to the nearest `(` left open, and accept it
/// when a builtin name sits right before it.
fn scan_for_call(tokens: &[Token], position: Position) -> Option<CallSite<'_>> {
    let mut depth = 0usize;
    let before = tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.start < position && !token.kind.is_comment());
    for (idx, token) in before.rev() {
        match token.kind {
            TokenKind::RParen | TokenKind::RBracket => depth += 1,
            TokenKind::LBracket if depth > 0 => depth -= 1,
            TokenKind::LParen if depth > 0 => depth -= 1,
            TokenKind::LParen => {
                let name = tokens[..idx]
                    .iter()
                    .rev()
                    .find(|token| !token.kind.is_comment())?;
                return match name.kind {
                    TokenKind::Builtin => Some(CallSite::Builtin {
                        name: &name.literal,
                        lparen: token,
                    }),
                    TokenKind::Ident if idx >= 2 && tokens[idx - 2].kind == TokenKind::Dollar => {
                        Some(CallSite::Macro)
                    }
                    _ => None,
                };
            }
            TokenKind::Semicolon if depth == 0 => return None,
            _ => {}
        }
    }
    None
}

/// Commas at nesting depth zero between the call's `(` and the cursor.
fn count_commas(tokens: &[Token], lparen: &Token, position: Position) -> usize {
    let mut depth = 0usize;
    let mut commas = 0;
    for token in tokens
        .iter()
        .filter(|token| token.span.start >= lparen.span.end && token.start < position)
    {
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => commas += 1,
            _ => {}
        }
    }
    commas
}
