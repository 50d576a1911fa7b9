//! Presentation of a [`ChatSession`] as terminal rows.
//!
//! Rendering is a pure function of the session; the only state kept here
//! is the scroll position and the input height, which are recomputed when
//! the conversation or the draft changes.

pub mod input;
pub mod scroll;
pub mod transcript;

pub use input::InputSizer;
pub use scroll::ScrollViewport;
pub use transcript::{PENDING_INDICATOR, TranscriptRenderer};

use crate::config::ViewConfig;
use crate::session::{ChatSession, SelectionKind};

/// One screenful, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Picker labels, assistant first.
    pub header: String,
    /// Transcript rows inside the viewport.
    pub rows: Vec<String>,
    /// Height of the input box.
    pub input_rows: usize,
    pub pending: bool,
}

/// Keeps the viewport pinned to the latest message and the input sized to
/// the draft.
#[derive(Debug, Clone)]
pub struct ChatView {
    renderer: TranscriptRenderer,
    viewport: ScrollViewport,
    sizer: InputSizer,
    seen_messages: usize,
    seen_pending: bool,
    seen_draft: String,
    input_rows: usize,
}

impl ChatView {
    #[must_use]
    pub fn new(config: &ViewConfig) -> Self {
        let sizer = InputSizer::new(config.width, config.input_min_rows, config.input_max_rows);
        Self {
            renderer: TranscriptRenderer::new(config.width),
            viewport: ScrollViewport::new(config.viewport_rows),
            input_rows: sizer.rows_for(""),
            sizer,
            seen_messages: 0,
            seen_pending: false,
            seen_draft: String::new(),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &ScrollViewport {
        &self.viewport
    }

    #[must_use]
    pub fn input_rows(&self) -> usize {
        self.input_rows
    }

    /// Render the session, scrolling to the bottom if the conversation changed
    /// and resizing the input if the draft changed.
    pub fn frame(&mut self, session: &ChatSession) -> Frame {
        let pending = session.is_pending();
        let rows = self.renderer.render(session.messages(), pending);

        let messages = session.conversation().len();
        if messages != self.seen_messages || pending != self.seen_pending {
            self.seen_messages = messages;
            self.seen_pending = pending;
            self.viewport.content_changed(rows.len());
        }

        let draft = session.composer().draft();
        if draft != self.seen_draft {
            self.seen_draft = draft.to_string();
            self.input_rows = self.sizer.rows_for(draft);
        }

        let selection = session.selection();
        let header = format!(
            "[{}] [{}]",
            selection.label(SelectionKind::Assistant),
            selection.label(SelectionKind::VectorStore)
        );

        Frame {
            header,
            rows: rows[self.viewport.visible_range()].to_vec(),
            input_rows: self.input_rows,
            pending,
        }
    }
}
