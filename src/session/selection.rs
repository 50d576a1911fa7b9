//! Assistant and vector-store pickers.

use crate::api::{AssistantSummary, VectorStoreSummary};

/// Label used when the backend sends an option without a usable name.
pub const UNNAMED_LABEL: &str = "Sin Nombre";

/// Which picker an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    Assistant,
    VectorStore,
}

impl SelectionKind {
    /// Text shown on a picker with nothing chosen.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Assistant => "Select assistant...",
            Self::VectorStore => "Select vectorStore...",
        }
    }

    /// Text shown when the candidate list is empty.
    #[must_use]
    pub fn empty_notice(self) -> &'static str {
        match self {
            Self::Assistant => "No assistant found.",
            Self::VectorStore => "No vectorStore found.",
        }
    }
}

/// One entry in a picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableOption {
    pub value: String,
    pub label: String,
}

impl SelectableOption {
    fn labeled(value: String, name: Option<String>) -> Self {
        let label = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_LABEL.to_string());
        Self { value, label }
    }
}

impl From<AssistantSummary> for SelectableOption {
    fn from(summary: AssistantSummary) -> Self {
        Self::labeled(summary.id, summary.name)
    }
}

impl From<VectorStoreSummary> for SelectableOption {
    fn from(summary: VectorStoreSummary) -> Self {
        Self::labeled(summary.id, summary.name)
    }
}

#[derive(Debug, Clone, Default)]
struct Picker {
    /// `None` until the catalog has loaded.
    candidates: Option<Vec<SelectableOption>>,
    /// Empty string means nothing chosen.
    chosen: String,
}

impl Picker {
    fn label(&self, kind: SelectionKind) -> &str {
        if self.chosen.is_empty() {
            return kind.placeholder();
        }
        self.candidates
            .iter()
            .flatten()
            .find(|o| o.value == self.chosen)
            .map_or(self.chosen.as_str(), |o| o.label.as_str())
    }
}

/// Two independent single-choice selectors.
///
/// Chosen values are not validated against the candidate lists and there
/// is no relationship between the two selections.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    assistant: Picker,
    vector_store: Picker,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn picker(&self, kind: SelectionKind) -> &Picker {
        match kind {
            SelectionKind::Assistant => &self.assistant,
            SelectionKind::VectorStore => &self.vector_store,
        }
    }

    fn picker_mut(&mut self, kind: SelectionKind) -> &mut Picker {
        match kind {
            SelectionKind::Assistant => &mut self.assistant,
            SelectionKind::VectorStore => &mut self.vector_store,
        }
    }

    /// Replace the candidate list of one picker.
    pub fn set_candidates(&mut self, kind: SelectionKind, options: Vec<SelectableOption>) {
        self.picker_mut(kind).candidates = Some(options);
    }

    /// Forget the candidate list; the chosen value is kept.
    pub fn reset_candidates(&mut self, kind: SelectionKind) {
        self.picker_mut(kind).candidates = None;
    }

    /// Candidate options, or `None` if the catalog never loaded.
    #[must_use]
    pub fn candidates(&self, kind: SelectionKind) -> Option<&[SelectableOption]> {
        self.picker(kind).candidates.as_deref()
    }

    /// Set the chosen value.
    pub fn choose(&mut self, kind: SelectionKind, value: impl Into<String>) {
        self.picker_mut(kind).chosen = value.into();
    }

    /// Reset one picker to nothing chosen.
    pub fn clear(&mut self, kind: SelectionKind) {
        self.picker_mut(kind).chosen.clear();
    }

    /// Chosen value, empty if none.
    #[must_use]
    pub fn selected(&self, kind: SelectionKind) -> &str {
        &self.picker(kind).chosen
    }

    #[must_use]
    pub fn is_selected(&self, kind: SelectionKind, value: &str) -> bool {
        let chosen = self.selected(kind);
        !chosen.is_empty() && chosen == value
    }

    /// Text for the picker button.
    ///
    /// The chosen option's label, the placeholder when nothing is chosen,
    /// or the raw value when it is not among the candidates.
    #[must_use]
    pub fn label(&self, kind: SelectionKind) -> &str {
        self.picker(kind).label(kind)
    }
}
