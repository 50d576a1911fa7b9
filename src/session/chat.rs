//! The chat session state machine.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::api::{ApiError, AskRequest, AssistantBackend};

use super::bootstrap::{BootstrapReport, CatalogState, SessionBootstrapper, ThreadState};
use super::composer::Composer;
use super::message::{Attachment, Message};
use super::selection::{SelectionKind, SelectionState};
use super::store::ConversationStore;

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The assistant service call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A previous send has not been answered yet.
    #[error("a response is still pending")]
    Busy,

    /// A completion arrived for a send that is no longer the pending one.
    #[error("send {request_id} is no longer pending")]
    Stale { request_id: Uuid },

    /// The file could not be attached.
    #[error("cannot attach {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse lifecycle of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Bootstrapping,
    Ready,
}

/// Whether a send is waiting for the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Pending { request_id: Uuid },
}

/// What a call to [`ChatSession::send`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing to send; no state changed.
    Ignored,
    /// The user message and the assistant reply were both appended.
    Answered,
}

/// A send that has been applied locally and awaits the backend.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub request_id: Uuid,
    pub request: AskRequest,
}

/// One conversation with the assistant service.
///
/// Owns the message history, the composer, both pickers, and the thread.
/// All mutation goes through `&mut self`, so at most one operation runs at
/// a time.
#[derive(Debug)]
pub struct ChatSession {
    backend: Arc<dyn AssistantBackend>,
    conversation: ConversationStore,
    composer: Composer,
    selection: SelectionState,
    phase: SessionPhase,
    catalog: CatalogState,
    thread: ThreadState,
    thread_task: Option<JoinHandle<Result<String, ApiError>>>,
    send_state: SendState,
}

impl ChatSession {
    /// Create a session seeded with the default greeting.
    #[must_use]
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self::with_conversation(backend, ConversationStore::default())
    }

    /// Create a session with a custom starting conversation.
    #[must_use]
    pub fn with_conversation(
        backend: Arc<dyn AssistantBackend>,
        conversation: ConversationStore,
    ) -> Self {
        Self {
            backend,
            conversation,
            composer: Composer::new(),
            selection: SelectionState::new(),
            phase: SessionPhase::Uninitialized,
            catalog: CatalogState::Loading,
            thread: ThreadState::Absent,
            thread_task: None,
            send_state: SendState::Idle,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    #[must_use]
    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn catalog_state(&self) -> CatalogState {
        self.catalog
    }

    /// True until the catalog fetch settles.
    #[must_use]
    pub fn is_data_loading(&self) -> bool {
        self.catalog == CatalogState::Loading
    }

    #[must_use]
    pub fn thread(&self) -> &ThreadState {
        &self.thread
    }

    #[must_use]
    pub fn thread_id(&self) -> Option<&str> {
        self.thread.id()
    }

    #[must_use]
    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.send_state, SendState::Pending { .. })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.composer.set_draft(text);
    }

    pub fn attach(&mut self, attachment: Attachment) {
        debug!(
            file_name = %attachment.file_name,
            mime_type = %attachment.mime_type,
            "File attached"
        );
        self.composer.attach(attachment);
    }

    /// Attach a file from disk.
    pub async fn attach_path(&mut self, path: impl AsRef<Path>) -> Result<Attachment, SessionError> {
        let path = path.as_ref();
        let attachment = Attachment::from_path(path)
            .await
            .map_err(|source| SessionError::Attachment {
                path: path.display().to_string(),
                source,
            })?;
        self.attach(attachment.clone());
        Ok(attachment)
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.composer.detach()
    }

    pub fn choose(&mut self, kind: SelectionKind, value: impl Into<String>) {
        let value = value.into();
        debug!(kind = ?kind, value = %value, "Selection changed");
        self.selection.choose(kind, value);
    }

    pub fn clear_selection(&mut self, kind: SelectionKind) {
        self.selection.clear(kind);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bootstrap & threads
    // ─────────────────────────────────────────────────────────────────────────

    /// Load the catalog and make sure a thread exists.
    ///
    /// The thread request runs in the background while the lists load, and
    /// the catalog becomes ready as soon as the lists settle, whatever
    /// happens to the thread. A thread is requested only if none exists and
    /// none is on its way.
    pub async fn bootstrap(&mut self) -> BootstrapReport {
        info!(
            name: "session.bootstrap.started",
            backend = self.backend.backend_name(),
            has_thread = self.thread.id().is_some(),
            "Bootstrapping session"
        );

        self.start_thread();
        let catalog = self.load_catalog().await;
        let thread = self.ensure_thread().await;

        BootstrapReport { catalog, thread }
    }

    /// Fetch both lists and hand them to the pickers.
    ///
    /// Loading ends when the fetch settles. On failure both lists go back to
    /// not loaded, so stale candidates from an earlier run are not shown.
    pub async fn load_catalog(&mut self) -> Result<(), ApiError> {
        self.phase = SessionPhase::Bootstrapping;
        self.catalog = CatalogState::Loading;

        let result = SessionBootstrapper::new(Arc::clone(&self.backend))
            .load_catalog()
            .await;

        self.catalog = CatalogState::Ready;
        self.phase = SessionPhase::Ready;

        match result {
            Ok(catalog) => {
                info!(
                    name: "session.catalog.loaded",
                    assistants = catalog.assistants.len(),
                    vector_stores = catalog.vector_stores.len(),
                    "Catalog loaded"
                );
                self.selection
                    .set_candidates(SelectionKind::Assistant, catalog.assistants);
                self.selection
                    .set_candidates(SelectionKind::VectorStore, catalog.vector_stores);
                Ok(())
            }
            Err(err) => {
                error!(name: "session.catalog.failed", error = %err, "Failed to load catalog");
                self.selection.reset_candidates(SelectionKind::Assistant);
                self.selection.reset_candidates(SelectionKind::VectorStore);
                Err(err)
            }
        }
    }

    /// Request a thread in the background unless one exists or is on its way.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_thread(&mut self) {
        if self.thread.id().is_some() || self.thread_task.is_some() {
            return;
        }

        let bootstrapper = SessionBootstrapper::new(Arc::clone(&self.backend));
        self.thread = ThreadState::Creating;
        self.thread_task = Some(tokio::spawn(async move {
            bootstrapper.create_thread().await
        }));
    }

    /// Return the current thread id, creating a thread if there is none.
    ///
    /// Waits for a background request started by
    /// [`start_thread`](Self::start_thread) instead of issuing a second one.
    pub async fn ensure_thread(&mut self) -> Result<String, ApiError> {
        if let Some(id) = self.thread.id() {
            return Ok(id.to_owned());
        }

        self.thread = ThreadState::Creating;
        let result = match self.thread_task.as_mut() {
            Some(task) => task.await.unwrap_or_else(|err| Err(err.into())),
            None => self.backend.create_thread().await,
        };
        self.thread_task = None;
        self.apply_thread_result(result)
    }

    /// Apply a background thread request if it has already finished.
    ///
    /// Returns `None` while the request is running or when none was started.
    pub async fn poll_thread(&mut self) -> Option<Result<String, ApiError>> {
        if !self
            .thread_task
            .as_ref()
            .is_some_and(JoinHandle::is_finished)
        {
            return None;
        }
        Some(self.ensure_thread().await)
    }

    fn apply_thread_result(&mut self, result: Result<String, ApiError>) -> Result<String, ApiError> {
        match result {
            Ok(id) => {
                if self.thread.id() != Some(id.as_str()) {
                    info!(name: "session.thread.created", thread_id = %id, "Conversation thread created");
                }
                self.thread = ThreadState::Created(id.clone());
                Ok(id)
            }
            Err(err) => {
                error!(name: "session.thread.failed", error = %err, "Failed to create thread");
                self.thread = ThreadState::Absent;
                Err(err)
            }
        }
    }

    /// Forget the current thread so the next bootstrap or send opens a new one.
    ///
    /// Messages and selections are kept.
    pub fn back(&mut self) {
        if let Some(task) = self.thread_task.take() {
            task.abort();
        }
        if let Some(id) = self.thread.id() {
            info!(name: "session.thread.released", thread_id = %id, "Thread released");
        }
        self.thread = ThreadState::Absent;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sending
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a send locally: append the user message, clear the composer,
    /// and enter the pending state.
    ///
    /// Returns `Ok(None)` with no state change when there is nothing to send,
    /// and [`SessionError::Busy`] while a previous send is pending.
    pub fn begin_send(&mut self) -> Result<Option<PendingSend>, SessionError> {
        if self.is_pending() {
            warn!("Send rejected while a response is pending");
            return Err(SessionError::Busy);
        }

        let Some(submission) = self.composer.take_submission() else {
            return Ok(None);
        };

        let request = AskRequest {
            thread_id: self.thread.id().map(str::to_owned),
            query: submission.text.clone(),
            assistant_id: self.selection.selected(SelectionKind::Assistant).to_owned(),
            vector_store_id: self
                .selection
                .selected(SelectionKind::VectorStore)
                .to_owned(),
        };

        self.conversation
            .push(Message::user(submission.text, submission.attachment));

        let request_id = Uuid::new_v4();
        self.send_state = SendState::Pending { request_id };

        debug!(
            request_id = %request_id,
            query_length = request.query.len(),
            has_thread = request.thread_id.is_some(),
            "Send started"
        );

        Ok(Some(PendingSend {
            request_id,
            request,
        }))
    }

    /// Apply the backend's answer to a pending send and leave the pending state.
    ///
    /// On success exactly one assistant message is appended; on failure
    /// nothing is appended and the error is returned. A completion whose
    /// request id is not the one pending (already completed, or superseded
    /// by a newer send) changes nothing and returns [`SessionError::Stale`].
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        result: Result<String, ApiError>,
    ) -> Result<(), SessionError> {
        let request_id = pending.request_id;
        if self.send_state != (SendState::Pending { request_id }) {
            warn!(request_id = %request_id, "Ignoring completion of a send that is not pending");
            return Err(SessionError::Stale { request_id });
        }
        self.send_state = SendState::Idle;

        match result {
            Ok(response) => {
                info!(
                    name: "session.ask.answered",
                    request_id = %request_id,
                    response_length = response.len(),
                    "Assistant answered"
                );
                self.conversation.push(Message::assistant(response));
                Ok(())
            }
            Err(err) => {
                error!(
                    name: "session.ask.failed",
                    request_id = %request_id,
                    error = %err,
                    "Assistant request failed"
                );
                Err(err.into())
            }
        }
    }

    /// Send the current draft and wait for the assistant.
    ///
    /// Creates a thread first if none exists. If that fails the ask is not
    /// issued; the user message stays in the conversation.
    pub async fn send(&mut self) -> Result<SendOutcome, SessionError> {
        let Some(pending) = self.begin_send()? else {
            return Ok(SendOutcome::Ignored);
        };
        self.resolve(pending).await?;
        Ok(SendOutcome::Answered)
    }

    /// Finish a send started with [`begin_send`](Self::begin_send): make sure
    /// a thread exists, ask the backend, and apply the answer.
    pub async fn resolve(&mut self, mut pending: PendingSend) -> Result<(), SessionError> {
        let thread = if pending.request.thread_id.is_some() {
            Ok(())
        } else {
            self.ensure_thread()
                .await
                .map(|id| pending.request.thread_id = Some(id))
        };

        let result = match thread {
            Ok(()) => {
                let backend = Arc::clone(&self.backend);
                backend.ask(&pending.request).await
            }
            Err(err) => Err(err),
        };
        self.complete_send(pending, result)
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(task) = self.thread_task.take() {
            task.abort();
        }
    }
}
