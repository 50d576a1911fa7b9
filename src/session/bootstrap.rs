//! Session start-up: catalog fetch and thread creation.

use std::sync::Arc;

use crate::api::{ApiError, AssistantBackend};

use super::selection::SelectableOption;

/// Loading state of the assistant/vector-store lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogState {
    /// Fetch not settled yet.
    #[default]
    Loading,
    /// Fetch settled, whether or not it succeeded.
    Ready,
}

/// Lifecycle of the backend conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThreadState {
    #[default]
    Absent,
    Creating,
    Created(String),
}

impl ThreadState {
    /// Thread id, once created.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Created(id) => Some(id),
            _ => None,
        }
    }
}

/// Both candidate lists, already shaped for the pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub assistants: Vec<SelectableOption>,
    pub vector_stores: Vec<SelectableOption>,
}

/// Outcome of one bootstrap run.
///
/// Failures are already logged; they are returned so the caller can decide
/// whether to show them.
#[derive(Debug)]
pub struct BootstrapReport {
    pub catalog: Result<(), ApiError>,
    pub thread: Result<String, ApiError>,
}

impl BootstrapReport {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.catalog.is_ok() && self.thread.is_ok()
    }
}

/// Issues the start-up requests against a backend.
#[derive(Debug, Clone)]
pub struct SessionBootstrapper {
    backend: Arc<dyn AssistantBackend>,
}

impl SessionBootstrapper {
    #[must_use]
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self { backend }
    }

    /// Fetch both lists concurrently.
    ///
    /// All-or-nothing: if either request fails, no list is returned.
    pub async fn load_catalog(&self) -> Result<Catalog, ApiError> {
        let (assistants, vector_stores) = tokio::try_join!(
            self.backend.list_assistants(),
            self.backend.list_vector_stores()
        )?;

        Ok(Catalog {
            assistants: assistants.into_iter().map(Into::into).collect(),
            vector_stores: vector_stores.into_iter().map(Into::into).collect(),
        })
    }

    /// Ask the backend for a fresh thread.
    pub async fn create_thread(&self) -> Result<String, ApiError> {
        self.backend.create_thread().await
    }
}
