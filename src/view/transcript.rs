//! Plain-text rendering of the conversation.

use unicode_width::UnicodeWidthStr;

use crate::session::{Message, MessageRole};

/// Row drawn while waiting for the assistant.
pub const PENDING_INDICATOR: &str = "…";

/// Lays messages out as terminal rows.
///
/// User messages hug the right edge and assistant messages the left, each
/// wrapped to 80% of the width. A blank row separates messages.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptRenderer {
    width: usize,
}

impl TranscriptRenderer {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(10),
        }
    }

    fn bubble_width(&self) -> usize {
        (self.width * 4 / 5).max(1)
    }

    fn place(&self, role: MessageRole, line: &str) -> String {
        match role {
            MessageRole::Assistant => line.to_string(),
            MessageRole::User => {
                let pad = self.width.saturating_sub(line.width());
                format!("{}{line}", " ".repeat(pad))
            }
        }
    }

    /// Rows for a single message.
    #[must_use]
    pub fn render_message(&self, message: &Message) -> Vec<String> {
        let mut rows = Vec::new();

        if !message.content.is_empty() {
            for line in message.content.split('\n') {
                for wrapped in textwrap::wrap(line, self.bubble_width()) {
                    rows.push(self.place(message.role, &wrapped));
                }
            }
        }

        if let Some(attachment) = &message.attachment {
            let tag = if attachment.is_image() { "imagen" } else { "archivo" };
            rows.push(self.place(
                message.role,
                &format!("[{tag}: {}]", attachment.file_name),
            ));
        }

        rows
    }

    /// Rows for the whole conversation, with the pending row if waiting.
    #[must_use]
    pub fn render(&self, messages: &[Message], pending: bool) -> Vec<String> {
        let mut rows = Vec::new();
        for (i, message) in messages.iter().enumerate() {
            if i > 0 {
                rows.push(String::new());
            }
            rows.extend(self.render_message(message));
        }
        if pending {
            if !rows.is_empty() {
                rows.push(String::new());
            }
            rows.push(PENDING_INDICATOR.to_string());
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Attachment;
    use std::path::PathBuf;

    #[test]
    fn test_alignment_by_role() {
        let renderer = TranscriptRenderer::new(20);
        let rows = renderer.render(
            &[Message::assistant("Hola"), Message::user("Buenas", None)],
            false,
        );

        assert_eq!(rows, vec!["Hola".to_string(), String::new(), format!("{}Buenas", " ".repeat(14))]);
    }

    #[test]
    fn test_wraps_at_bubble_width() {
        let renderer = TranscriptRenderer::new(20);
        let rows = renderer.render_message(&Message::assistant("uno dos tres cuatro cinco"));

        assert!(rows.len() > 1);
        assert!(rows.iter().all(|r| r.width() <= 16));
    }

    #[test]
    fn test_pending_row() {
        let renderer = TranscriptRenderer::new(20);
        let rows = renderer.render(&[Message::assistant("Hola")], true);
        assert_eq!(rows.last().map(String::as_str), Some(PENDING_INDICATOR));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_attachment_row() {
        let renderer = TranscriptRenderer::new(40);
        let attachment = Attachment {
            path: PathBuf::from("foto.jpg"),
            file_name: "foto.jpg".into(),
            mime_type: "image/jpeg".into(),
            size_bytes: 10,
        };
        let rows = renderer.render_message(&Message::user("", Some(attachment)));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trim_start(), "[imagen: foto.jpg]");
        assert_eq!(rows[0].width(), 40);
    }
}
