//! Line-at-a-time formula inspection.
//!
//! Every line is parsed on its own. A line starting with `:tokens` prints the
//! tokens of the rest of the line, `:ast` prints its tree, anything else is
//! evaluated statically. `.q` quits.

use std::io::{self, BufRead, Write};

use wflang_parser::{evaluate, parse, tokenize};

const GREETING: &str = "Welcome to WFLang. Enter a formula, or '.q' to quit.";

pub fn run<R: BufRead, W: Write>(input: R, output: &mut W) -> io::Result<()> {
    writeln!(output, "{}", GREETING)?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.eq_ignore_ascii_case(".q") {
            writeln!(output, "Bye.")?;
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }
        respond(line, output)?;
    }
    Ok(())
}

fn respond<W: Write>(line: &str, output: &mut W) -> io::Result<()> {
    if let Some(source) = line.strip_prefix(":tokens") {
        for token in tokenize(source.trim_start()) {
            writeln!(output, "{}", token)?;
        }
        return Ok(());
    }

    let (source, show_tree) = match line.strip_prefix(":ast") {
        Some(rest) => (rest.trim_start(), true),
        None => (line, false),
    };
    let parsed = parse(source);
    if show_tree {
        writeln!(output, "{:#?}", parsed.program)?;
    }
    for error in &parsed.errors {
        writeln!(output, "error: {} at {}", error, error.location())?;
    }
    if !show_tree && parsed.errors.is_empty() {
        let evaluation = evaluate(&parsed.program);
        if let Some(value) = evaluation.value {
            writeln!(output, "=> {}", value)?;
        }
    }
    Ok(())
}
