//! Core resume model: document, sections, editing, persistence and export

pub mod autosave;
pub mod config;
pub mod document;
pub mod drag;
pub mod editor;
pub mod export;
pub mod fonts;
pub mod preview;
pub mod section;
pub mod session;
pub mod storage;
pub mod util;
