//! Settings shared by the WFLang binaries.
//!
//! Sources are layered in this order, later ones winning:
//!
//! 1. `defaults/wflang.default.toml`, compiled into the binary
//! 2. TOML files added with [`ConfigLoader::file`]
//! 3. `WFLANG_*` environment variables, when [`ConfigLoader::env`] is used
//! 4. single keys set with [`ConfigLoader::set`]
//!
//! Environment keys use `__` between table and field, so
//! `WFLANG_COMPLETION__KEYWORDS=true` sets `completion.keywords`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULTS: &str = include_str!("../defaults/wflang.default.toml");

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "WFLANG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WflangConfig {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    pub publish_diagnostics: bool,
}

/// Which candidate groups completion offers besides builtins.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionConfig {
    pub variables: bool,
    pub keywords: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by tracing filters.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    layers: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULTS, FileFormat::Toml);
        Self {
            layers: Config::builder().add_source(defaults),
        }
    }

    /// Add a TOML file. A missing `required` file fails [`load`](Self::load);
    /// a missing optional one is skipped.
    pub fn file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        let layer = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(required);
        self.layers = self.layers.add_source(layer);
        self
    }

    /// Read `WFLANG_<TABLE>__<FIELD>` variables from the process environment.
    pub fn env(mut self) -> Self {
        let layer = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        self.layers = self.layers.add_source(layer);
        self
    }

    /// Override one dotted key, e.g. `logging.level`.
    pub fn set<V>(mut self, key: &str, value: V) -> Result<Self, ConfigError>
    where
        V: Into<ValueKind>,
    {
        self.layers = self.layers.set_override(key, value)?;
        Ok(self)
    }

    pub fn load(self) -> Result<WflangConfig, ConfigError> {
        self.layers.build()?.try_deserialize()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled-in settings with nothing layered on top.
pub fn load_defaults() -> Result<WflangConfig, ConfigError> {
    ConfigLoader::new().load()
}
