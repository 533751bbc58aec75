//! Rendering for the inspection subcommands.
//!
//! Each function takes source text and returns what the command prints, so the
//! binary stays a thin shell around them.

use wflang_analysis::{diagnostics, Document};
use wflang_parser::{parse, tokenize};

/// Output formats accepted by `wflang tokens`.
pub const TOKEN_FORMATS: &[&str] = &["json", "simple"];

pub fn render_tokens(source: &str, format: &str) -> Result<String, String> {
    let tokens = tokenize(source);
    match format {
        "json" => serde_json::to_string_pretty(&tokens)
            .map_err(|e| format!("JSON serialization failed: {}", e)),
        "simple" => Ok(tokens
            .iter()
            .map(|token| format!("{}\n", token))
            .collect()),
        other => Err(format!(
            "Unknown format '{}'. Available formats: {}",
            other,
            TOKEN_FORMATS.join(", ")
        )),
    }
}

/// Debug tree of the parsed program, followed by any parse errors.
pub fn render_ast(source: &str) -> String {
    let output = parse(source);
    let mut rendered = format!("{:#?}\n", output.program);
    for error in &output.errors {
        rendered.push_str(&format!("error: {} at {}\n", error, error.location()));
    }
    rendered
}

/// Report lines for `wflang check`, one per diagnostic, with one-based
/// line and column numbers. The flag is true when anything was reported.
pub fn render_check(label: &str, source: &str) -> (String, bool) {
    let document = Document::new(source);
    let found = diagnostics(&document);
    if found.is_empty() {
        return (format!("{}: ok\n", label), false);
    }
    let report = found
        .iter()
        .map(|diagnostic| {
            format!(
                "{}:{}:{}: error[{}]: {}\n",
                label,
                diagnostic.span.start.line + 1,
                diagnostic.span.start.column + 1,
                diagnostic.code,
                diagnostic.message
            )
        })
        .collect();
    (report, true)
}
