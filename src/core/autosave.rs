//! Debounced autosave
//!
//! Each `schedule` call cancels the pending write and starts a new quiet
//! period. Only the last document seen before the editor goes quiet is
//! written.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::document::ResumeDocument;
use super::storage::{Persistence, Storage, StorageKey};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

pub struct AutosaveScheduler<S: Storage + 'static> {
    runtime: Handle,
    delay: Duration,
    persistence: Arc<Persistence<S>>,
    pending: Option<JoinHandle<()>>,
}

impl<S: Storage + 'static> AutosaveScheduler<S> {
    pub fn new(runtime: Handle, persistence: Arc<Persistence<S>>, delay: Duration) -> Self {
        Self {
            runtime,
            delay,
            persistence,
            pending: None,
        }
    }

    /// Restart the quiet period with `document` as the value to persist
    pub fn schedule(&mut self, document: ResumeDocument) {
        self.cancel();

        let persistence = Arc::clone(&self.persistence);
        let delay = self.delay;
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            persistence.save(StorageKey::ResumeData, &document);
        }));
    }

    /// Whether a write is waiting for the quiet period to end
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Drop the pending write, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    /// Write `document` now and drop any pending write
    pub fn flush(&mut self, document: &ResumeDocument) {
        self.cancel();
        self.persistence.save(StorageKey::ResumeData, document);
    }
}

impl<S: Storage + 'static> Drop for AutosaveScheduler<S> {
    fn drop(&mut self) {
        if self.is_pending() {
            tracing::warn!("Discarding unsaved autosave on shutdown");
        }
        self.cancel();
    }
}
