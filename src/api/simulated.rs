//! In-process backend that answers without a server.
//!
//! Used by the stand-alone chat mode: every query gets the same canned
//! reply after a fixed delay, there is no catalog, and threads are local ids.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    AssistantBackend,
    error::Result,
    types::{AskRequest, AssistantSummary, VectorStoreSummary},
};

/// Reply returned for every query.
pub const SIMULATED_REPLY: &str = "Esta es una respuesta simulada del asistente.";

/// Delay before the reply arrives.
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1000);

/// Backend that fakes the assistant locally.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    reply: String,
    delay: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBackend {
    /// Create a backend with the stock reply and delay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reply: SIMULATED_REPLY.to_string(),
            delay: SIMULATED_DELAY,
        }
    }

    /// Override the canned reply.
    #[must_use]
    pub fn with_reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = reply.into();
        self
    }

    /// Override the reply delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl AssistantBackend for SimulatedBackend {
    async fn list_assistants(&self) -> Result<Vec<AssistantSummary>> {
        Ok(Vec::new())
    }

    async fn list_vector_stores(&self) -> Result<Vec<VectorStoreSummary>> {
        Ok(Vec::new())
    }

    async fn create_thread(&self) -> Result<String> {
        Ok(format!("local-{}", Uuid::new_v4()))
    }

    async fn ask(&self, request: &AskRequest) -> Result<String> {
        tracing::debug!(query_length = request.query.len(), "Simulating assistant reply");
        tokio::time::sleep(self.delay).await;
        Ok(self.reply.clone())
    }

    fn backend_name(&self) -> &'static str {
        "simulated"
    }
}
