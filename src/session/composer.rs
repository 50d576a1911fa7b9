//! Draft text and pending attachment.

use super::message::Attachment;

/// What leaves the composer when the user submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Draft exactly as typed; not trimmed.
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// Message input state.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    draft: String,
    attachment: Option<Attachment>,
}

impl Composer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    #[must_use]
    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Attach a file, replacing any previous one.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachment = Some(attachment);
    }

    /// Remove the attachment, returning it.
    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    /// A draft with visible text, or any attachment, can be sent.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty() || self.attachment.is_some()
    }

    /// Take the draft and attachment together, leaving both empty.
    ///
    /// Returns `None` and changes nothing when there is nothing to send.
    pub fn take_submission(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        Some(Submission {
            text: std::mem::take(&mut self.draft),
            attachment: self.attachment.take(),
        })
    }
}
