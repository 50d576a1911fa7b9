//! Assistant Chat terminal client.
//!
//! Entry point: loads configuration, sets up logging, and runs the REPL on
//! stdin/stdout.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use assistant_chat::api::backend_from_config;
use assistant_chat::config::{AppConfig, LoggingConfig};
use assistant_chat::repl::Repl;
use assistant_chat::session::{ChatSession, ConversationStore};
use assistant_chat::view::ChatView;

/// Logs go to stderr so they never interleave with the transcript.
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));

    if config.json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load().context("Configuration error")?;
    init_tracing(&config.logging);

    info!(
        name: "config.loaded",
        base_url = %config.api.base_url,
        backend = ?config.chat.backend,
        timeout_secs = ?config.api.timeout_secs,
        "Configuration loaded"
    );

    let backend = backend_from_config(&config).context("Failed to build API client")?;
    let session = ChatSession::with_conversation(
        backend,
        ConversationStore::with_greeting(config.chat.greeting.clone()),
    );
    let view = ChatView::new(&config.view);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let mut repl = Repl::new(session, view, stdin, stdout);
    repl.run().await?;

    info!(
        name: "session.closed",
        messages = repl.session().conversation().len(),
        "Session closed"
    );
    Ok(())
}
