//! Wire types for the assistant API.
//!
//! These mirror the backend's JSON bodies exactly. Absent arrays and
//! absent names are tolerated on the way in.

use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// An assistant persona offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSummary {
    /// Backend identifier, sent back as `assistant_id`.
    pub id: String,
    /// Display name. The backend may omit it or send null.
    #[serde(default)]
    pub name: Option<String>,
}

/// A vector store offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreSummary {
    /// Backend identifier, sent back as `vector_store_id`.
    pub id: String,
    /// Display name. The backend may omit it or send null.
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `GET /list-assistants`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListAssistantsResponse {
    #[serde(default)]
    pub assistants: Vec<AssistantSummary>,
}

/// Response of `GET /list-vector-stores`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListVectorStoresResponse {
    #[serde(default)]
    pub vector_stores: Vec<VectorStoreSummary>,
}

// =============================================================================
// Thread Types
// =============================================================================

/// Response of `POST /create-thread`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateThreadResponse {
    pub thread_id: String,
}

// =============================================================================
// Ask Types
// =============================================================================

/// Body of `POST /ask/assistant`.
///
/// `thread_id` serializes as `null` when no thread exists yet; empty
/// selections go out as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub thread_id: Option<String>,
    pub query: String,
    pub assistant_id: String,
    pub vector_store_id: String,
}

/// Response of `POST /ask/assistant`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}
