//! Drag-and-drop reordering of sections

use super::editor::EditorAction;

/// Idle when `dragged` is `None`, dragging otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragController {
    dragged: Option<usize>,
    hover: Option<usize>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, index: usize) {
        tracing::debug!("Drag started at {}", index);
        self.dragged = Some(index);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragged.is_some()
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    /// Advisory drop target, for highlighting only
    pub fn hover_index(&self) -> Option<usize> {
        self.hover
    }

    pub fn hover(&mut self, index: usize) {
        self.hover = Some(index);
    }

    pub fn leave(&mut self) {
        self.hover = None;
    }

    /// Finish the drag over `target`. Returns the reorder to apply, if any.
    pub fn drop_at(&mut self, target: usize) -> Option<EditorAction> {
        let action = match self.dragged {
            Some(from) if from != target => Some(EditorAction::ReorderSections { from, to: target }),
            _ => None,
        };
        self.end();
        action
    }

    /// Cancel the drag
    pub fn end(&mut self) {
        self.dragged = None;
        self.hover = None;
    }
}
