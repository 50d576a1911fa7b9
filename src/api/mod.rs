//! Assistant API access.
//!
//! The session never talks HTTP directly; it goes through the
//! [`AssistantBackend`] trait so the same state machine can drive the real
//! server or the local simulation.
//!
//! # Backends
//!
//! - [`Client`]: the remote HTTP API (`/list-assistants`, `/list-vector-stores`,
//!   `/create-thread`, `/ask/assistant`)
//! - [`SimulatedBackend`]: canned replies, no catalog

pub mod client;
pub mod error;
pub mod simulated;
pub mod types;

pub use client::Client;
pub use error::ApiError;
pub use simulated::SimulatedBackend;
pub use types::{AskRequest, AssistantSummary, VectorStoreSummary};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{AppConfig, BackendKind};

/// Operations the chat session needs from the assistant service.
#[async_trait]
pub trait AssistantBackend: Send + Sync + std::fmt::Debug {
    /// Fetch the assistant personas that can answer queries.
    async fn list_assistants(&self) -> error::Result<Vec<AssistantSummary>>;

    /// Fetch the vector stores that can back a query.
    async fn list_vector_stores(&self) -> error::Result<Vec<VectorStoreSummary>>;

    /// Create a conversation thread and return its id.
    async fn create_thread(&self) -> error::Result<String>;

    /// Ask the assistant and return the response text.
    async fn ask(&self, request: &AskRequest) -> error::Result<String>;

    /// Get the backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected by the configuration.
pub fn backend_from_config(config: &AppConfig) -> error::Result<Arc<dyn AssistantBackend>> {
    match config.chat.backend {
        BackendKind::Simulated => Ok(Arc::new(SimulatedBackend::new())),
        BackendKind::Http => {
            let client = match config.api.timeout() {
                Some(timeout) => Client::with_timeout(&config.api.base_url, timeout)?,
                None => Client::new(&config.api.base_url)?,
            };
            Ok(Arc::new(client))
        }
    }
}
