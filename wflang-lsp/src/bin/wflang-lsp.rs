use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;
use wflang_config::{ConfigError, ConfigLoader, LogLevel, WflangConfig};
use wflang_lsp::WflangLanguageServer;

#[derive(Debug, Parser)]
#[command(name = "wflang-lsp", version, about = "WFLang language server")]
struct Cli {
    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// TOML file layered over the built-in defaults; WFLANG_* variables still win
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<WflangConfig, ConfigError> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.file(path, true);
    }
    loader.env().load()
}

/// Filter used when RUST_LOG is unset. `-v` flags win over the configured level.
fn directive(verbose: u8, configured: LogLevel) -> String {
    let level = match verbose {
        0 => configured.as_str(),
        1 => "debug",
        _ => "trace",
    };
    format!("wflang_lsp={level},wflang_analysis={level},wflang_parser={level},tower_lsp=warn")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("wflang-lsp: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive(cli.verbose, config.logging.level))),
        )
        // Editors capture stderr verbatim.
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) =
        LspService::new(move |client| WflangLanguageServer::new(client, config.clone()));
    Server::new(stdin, stdout, socket).serve(service).await;
    ExitCode::SUCCESS
}
