//! The document being edited, wired to debounced persistence
//!
//! The UI collects `EditorAction`s during a frame and hands them to
//! `EditSession::apply`. Any change restarts the autosave quiet period.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use super::autosave::AutosaveScheduler;
use super::document::ResumeDocument;
use super::editor::{EditorAction, EditorState};
use super::storage::{Persistence, Storage, StorageKey};

pub struct EditSession<S: Storage + 'static> {
    editor: EditorState,
    /// Last revision handed to the scheduler
    scheduled_revision: u64,
    autosave: AutosaveScheduler<S>,
    persistence: Arc<Persistence<S>>,
}

impl<S: Storage + 'static> EditSession<S> {
    /// Start from the saved document, or the default one if nothing usable is stored
    pub fn open(runtime: Handle, persistence: Arc<Persistence<S>>, delay: Duration) -> Self {
        let document = persistence.load(StorageKey::ResumeData, ResumeDocument::default());
        tracing::info!("Loaded resume with {} section(s)", document.sections.len());

        let autosave = AutosaveScheduler::new(runtime, Arc::clone(&persistence), delay);
        let editor = EditorState::new(document);
        Self {
            scheduled_revision: editor.revision(),
            editor,
            autosave,
            persistence,
        }
    }

    pub fn document(&self) -> &ResumeDocument {
        self.editor.document()
    }

    /// Whether an autosave is waiting for the quiet period to end
    pub fn is_saving(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Dispatch `actions` in order; returns whether the document changed
    pub fn apply(&mut self, actions: impl IntoIterator<Item = EditorAction>) -> bool {
        for action in actions {
            self.editor.dispatch(action);
        }
        self.schedule_if_changed()
    }

    fn schedule_if_changed(&mut self) -> bool {
        if self.editor.revision() == self.scheduled_revision {
            return false;
        }
        self.scheduled_revision = self.editor.revision();
        self.autosave.schedule(self.editor.document().clone());
        true
    }

    /// Write the current document now, skipping the quiet period
    pub fn save_now(&mut self) {
        self.autosave.flush(self.editor.document());
        self.scheduled_revision = self.editor.revision();
    }

    /// Forget saved data and start over from the default document.
    /// The pending write is dropped and the fresh document is autosaved.
    pub fn reset(&mut self) {
        self.autosave.cancel();
        self.persistence.clear();
        self.editor.replace_document(ResumeDocument::default());
        self.schedule_if_changed();
    }
}
