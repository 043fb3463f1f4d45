//! Editor state and the actions that mutate it

use super::document::{PersonalInfoPatch, ResumeDocument, ThemePatch};
use super::section::{DataPatch, Section, SectionData, SectionType};
use super::util::reorder;

/// A single user-level change to the document
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    AddSection(SectionType),
    RemoveSection(String),
    UpdateSectionData { id: String, patch: DataPatch },
    ApplySuggestion { id: String, kind: SectionType },
    SetPersonalInfo(PersonalInfoPatch),
    SetTheme(ThemePatch),
    ReorderSections { from: usize, to: usize },
    ReplaceDocument(Box<ResumeDocument>),
}

/// Apply `action` to `document`, producing the next document
pub fn reduce(mut document: ResumeDocument, action: EditorAction) -> ResumeDocument {
    match action {
        EditorAction::AddSection(kind) => {
            document.sections.push(Section::new(kind));
        }
        EditorAction::RemoveSection(id) => {
            document.sections.retain(|s| s.id != id);
        }
        EditorAction::UpdateSectionData { id, patch } => {
            if let Some(section) = document.section_mut(&id) {
                section.merge(patch);
            }
        }
        EditorAction::ApplySuggestion { id, kind } => {
            if let (Some(section), Some(suggestion)) =
                (document.section_mut(&id), SectionData::suggestion(kind))
            {
                section.merge(DataPatch::from_data(&suggestion));
            }
        }
        EditorAction::SetPersonalInfo(patch) => document.personal_info.merge(patch),
        EditorAction::SetTheme(patch) => document.theme.merge(patch),
        EditorAction::ReorderSections { from, to } => reorder(&mut document.sections, from, to),
        EditorAction::ReplaceDocument(next) => document = *next,
    }
    document
}

/// The document being edited plus a change counter
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    document: ResumeDocument,
    revision: u64,
}

impl EditorState {
    pub fn new(document: ResumeDocument) -> Self {
        Self {
            document,
            revision: 0,
        }
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    /// Incremented once per dispatched action
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, action: EditorAction) {
        tracing::trace!("Dispatching {:?}", action);
        let current = std::mem::take(&mut self.document);
        self.document = reduce(current, action);
        self.revision += 1;
    }

    pub fn add_section(&mut self, kind: SectionType) {
        self.dispatch(EditorAction::AddSection(kind));
    }

    pub fn remove_section(&mut self, id: &str) {
        self.dispatch(EditorAction::RemoveSection(id.to_string()));
    }

    pub fn update_section_data(&mut self, id: &str, patch: DataPatch) {
        self.dispatch(EditorAction::UpdateSectionData {
            id: id.to_string(),
            patch,
        });
    }

    pub fn apply_suggestion(&mut self, id: &str, kind: SectionType) {
        self.dispatch(EditorAction::ApplySuggestion {
            id: id.to_string(),
            kind,
        });
    }

    pub fn set_personal_info(&mut self, patch: PersonalInfoPatch) {
        self.dispatch(EditorAction::SetPersonalInfo(patch));
    }

    pub fn set_theme(&mut self, patch: ThemePatch) {
        self.dispatch(EditorAction::SetTheme(patch));
    }

    pub fn reorder_sections(&mut self, from: usize, to: usize) {
        self.dispatch(EditorAction::ReorderSections { from, to });
    }

    pub fn replace_document(&mut self, document: ResumeDocument) {
        self.dispatch(EditorAction::ReplaceDocument(Box::new(document)));
    }
}
