//! Scroll position over rendered transcript rows.

use std::ops::Range;

/// Vertical viewport over a column of rows.
///
/// Follows the tail unconditionally: every content change moves the offset
/// to the content height. There is no "user scrolled up" detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollViewport {
    offset: usize,
    content_height: usize,
    viewport_height: usize,
}

impl ScrollViewport {
    #[must_use]
    pub fn new(viewport_height: usize) -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: viewport_height.max(1),
        }
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn content_height(&self) -> usize {
        self.content_height
    }

    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Record new content and jump to the bottom.
    pub fn content_changed(&mut self, content_height: usize) {
        self.content_height = content_height;
        self.offset = content_height;
    }

    /// First row on screen.
    ///
    /// The stored offset can point past the last full page (it is set to
    /// the content height), so it is clamped here.
    #[must_use]
    pub fn first_visible_row(&self) -> usize {
        let max_offset = self.content_height.saturating_sub(self.viewport_height);
        self.offset.min(max_offset)
    }

    /// Rows to draw.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.first_visible_row();
        let end = (start + self.viewport_height).min(self.content_height);
        start..end
    }
}
