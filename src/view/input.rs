//! Auto-sizing for the message input.

/// Computes the input box height from the draft.
///
/// Height is the number of wrapped rows, clamped to `[min_rows, max_rows]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSizer {
    width: usize,
    min_rows: usize,
    max_rows: usize,
}

impl InputSizer {
    #[must_use]
    pub fn new(width: usize, min_rows: usize, max_rows: usize) -> Self {
        let min_rows = min_rows.max(1);
        Self {
            width: width.max(1),
            min_rows,
            max_rows: max_rows.max(min_rows),
        }
    }

    /// Rows the draft needs before clamping.
    #[must_use]
    pub fn content_rows(&self, draft: &str) -> usize {
        draft
            .split('\n')
            .map(|line| textwrap::wrap(line, self.width).len().max(1))
            .sum()
    }

    /// Rows to give the input box.
    #[must_use]
    pub fn rows_for(&self, draft: &str) -> usize {
        self.content_rows(draft).clamp(self.min_rows, self.max_rows)
    }
}
