//! Conversation session state.
//!
//! This module holds everything the chat front-end keeps in memory for one
//! conversation: the message history, the draft being typed, the two
//! pickers, and the backend thread.
//!
//! # Architecture
//!
//! - [`ChatSession`]: the state machine tying the parts together
//! - [`SessionBootstrapper`]: start-up requests (catalog, thread)
//! - [`ConversationStore`]: append-only message history
//! - [`Composer`]: draft text and attachment
//! - [`SelectionState`]: assistant and vector-store pickers
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use assistant_chat::api::SimulatedBackend;
//! use assistant_chat::session::ChatSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = ChatSession::new(Arc::new(SimulatedBackend::new()));
//! session.bootstrap().await;
//!
//! session.set_draft("Hola");
//! session.send().await?;
//! assert_eq!(session.messages().len(), 3);
//! # Ok(())
//! # }
//! ```

mod bootstrap;
mod chat;
mod composer;
mod message;
mod selection;
mod store;

pub use bootstrap::{BootstrapReport, Catalog, CatalogState, SessionBootstrapper, ThreadState};
pub use chat::{ChatSession, PendingSend, SendOutcome, SendState, SessionError, SessionPhase};
pub use composer::{Composer, Submission};
pub use message::{Attachment, Message, MessageRole};
pub use selection::{SelectableOption, SelectionKind, SelectionState, UNNAMED_LABEL};
pub use store::{ConversationStore, DEFAULT_GREETING};
