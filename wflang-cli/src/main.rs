//! Command-line interface for WFLang
//! This binary inspects formulas the same way the language server sees them.
//!
//! Usage:
//!   wflang tokens `<path>` [--format json|simple]   - Print the token stream
//!   wflang ast `<path>`                             - Print the syntax tree
//!   wflang check `<path>`                           - Print diagnostics, exit 1 on errors
//!   wflang repl                                     - Inspect formulas line by line

mod commands;
mod repl;

use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let path = Arg::new("path")
        .help("Path to the formula file")
        .required(true)
        .index(1);

    Command::new("wflang")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting WFLang formulas")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log parser activity to stderr (-v: debug, -vv: trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream")
                .arg(path.clone())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(commands::TOKEN_FORMATS.to_vec())
                        .default_value("json"),
                ),
        )
        .subcommand(
            Command::new("ast")
                .about("Print the syntax tree")
                .arg(path.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Report parse errors")
                .arg(path),
        )
        .subcommand(Command::new("repl").about("Inspect formulas line by line"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(matches: &ArgMatches) -> Result<(String, String), String> {
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| "missing path".to_string())?;
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path, e))?;
    Ok((path.clone(), source))
}

fn run(matches: &ArgMatches) -> Result<ExitCode, String> {
    match matches.subcommand() {
        Some(("tokens", sub)) => {
            let (_, source) = read_source(sub)?;
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("json");
            println!("{}", commands::render_tokens(&source, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(("ast", sub)) => {
            let (_, source) = read_source(sub)?;
            print!("{}", commands::render_ast(&source));
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", sub)) => {
            let (path, source) = read_source(sub)?;
            let (report, failed) = commands::render_check(&path, &source);
            print!("{}", report);
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Some(("repl", _)) => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            repl::run(stdin.lock(), &mut stdout).map_err(|e| format!("REPL error: {}", e))?;
            Ok(ExitCode::SUCCESS)
        }
        Some((other, _)) => Err(format!("Unknown command: {}", other)),
        None => Err("No command given".to_string()),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));
    match run(&matches) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::from(2)
        }
    }
}
