use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::session::DEFAULT_GREETING;

/// API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "assistant-chat.yaml";

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the assistant API
    #[arg(long, env = "NEXT_PUBLIC_MS")]
    pub api_url: Option<String>,

    /// Give up on API requests after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Answer locally with canned replies instead of calling the API
    #[arg(long)]
    pub simulated: bool,

    /// Transcript width in columns
    #[arg(long)]
    pub width: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub view: ViewConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Unset means wait forever.
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Where answers come from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Http,
    Simulated,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub greeting: String,
    pub backend: BackendKind,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    pub width: usize,
    pub viewport_rows: usize,
    pub input_min_rows: usize,
    pub input_max_rows: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Build the layered configuration.
    ///
    /// Priority: CLI flag (and its env alias) > `CHAT_` environment > config
    /// file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("chat.greeting", DEFAULT_GREETING)?
            .set_default("chat.backend", "http")?
            .set_default("view.width", 80)?
            .set_default("view.viewport_rows", 20)?
            .set_default("view.input_min_rows", 1)?
            .set_default("view.input_max_rows", 8)?
            .set_default("logging.json", false)?
            .set_default("logging.filter", "info")?;

        match &cli.config {
            Some(path) => builder = builder.add_source(File::with_name(path).required(true)),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
            None => {}
        }

        // E.g. CHAT_API__BASE_URL=http://10.0.0.5:8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.api_url {
            builder = builder.set_override("api.base_url", url.as_str())?;
        }
        if let Some(secs) = cli.timeout_secs {
            builder = builder.set_override("api.timeout_secs", secs)?;
        }
        if cli.simulated {
            builder = builder.set_override("chat.backend", "simulated")?;
        }
        if let Some(width) = cli.width {
            builder = builder.set_override("view.width", width)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}
