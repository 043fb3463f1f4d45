//! Section editor cards
//!
//! Each card renders the fields listed in the section type's table entry and
//! reports edits as `EditorAction`s. Cards are reordered by dragging the grip.

use std::collections::HashMap;

use eframe::egui::{self, Color32, CursorIcon, RichText, Sense, Ui};

use crate::core::drag::DragController;
use crate::core::editor::EditorAction;
use crate::core::section::{DataPatch, FieldKind, FieldSpec, Section};

const BADGE: Color32 = Color32::from_rgb(234, 88, 12);
const HOVER_STROKE: Color32 = Color32::from_rgb(59, 130, 246);

/// Raw text of skill lists while they are being typed, keyed by section id.
///
/// The stored list drops blank lines, so editing straight from it would eat
/// a freshly typed newline.
#[derive(Debug, Default)]
pub struct SkillDrafts {
    drafts: HashMap<String, String>,
}

impl SkillDrafts {
    /// Draft for `id`, reset when it no longer matches the stored list
    pub fn text_for(&mut self, id: &str, skills: &[String]) -> &mut String {
        let draft = self
            .drafts
            .entry(id.to_string())
            .or_insert_with(|| skills.join("\n"));
        if parse_list(draft) != skills {
            *draft = skills.join("\n");
        }
        draft
    }

    /// Forget drafts of sections that no longer exist
    pub fn retain_sections(&mut self, sections: &[Section]) {
        self.drafts.retain(|id, _| sections.iter().any(|s| &s.id == id));
    }
}

/// One entry per non-blank line
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub struct SectionCard;

impl SectionCard {
    /// Show the card for `section` at position `index`
    pub fn show(
        ui: &mut Ui,
        index: usize,
        section: &Section,
        drag: &mut DragController,
        drafts: &mut SkillDrafts,
        actions: &mut Vec<EditorAction>,
    ) {
        let is_hover_target = drag.hover_index() == Some(index) && drag.dragged() != Some(index);
        let is_dragged = drag.dragged() == Some(index);

        let stroke = if is_hover_target {
            egui::Stroke::new(2.0, HOVER_STROKE)
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        ui.push_id(&section.id, |ui| {
            if is_dragged {
                ui.multiply_opacity(0.5);
            }

            let card = egui::Frame::group(ui.style())
                .stroke(stroke)
                .inner_margin(egui::Margin::same(10))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    Self::show_header(ui, index, section, drag, actions);
                    ui.add_space(6.0);
                    Self::show_fields(ui, section, drafts, actions);
                })
                .response;

            if drag.is_dragging() {
                if card.contains_pointer() {
                    drag.hover(index);
                } else if drag.hover_index() == Some(index) {
                    drag.leave();
                }
            }
        });
    }

    fn show_header(
        ui: &mut Ui,
        index: usize,
        section: &Section,
        drag: &mut DragController,
        actions: &mut Vec<EditorAction>,
    ) {
        ui.horizontal(|ui| {
            let grip = ui
                .add(egui::Label::new(RichText::new("\u{2630}").weak()).sense(Sense::drag()))
                .on_hover_cursor(CursorIcon::Grab)
                .on_hover_text("Drag to reorder");

            if grip.drag_started() {
                drag.start(index);
            }
            if grip.dragged() {
                ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            }
            if grip.drag_stopped() {
                match drag.hover_index() {
                    Some(target) => actions.extend(drag.drop_at(target)),
                    None => drag.end(),
                }
            }

            ui.strong(section.kind().label());
            if !section.is_valid() {
                ui.label(RichText::new("Incomplete").small().color(BADGE));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("\u{1F5D1}").on_hover_text("Remove section").clicked() {
                    actions.push(EditorAction::RemoveSection(section.id.clone()));
                }
                if ui.button("\u{2728}").on_hover_text("Fill with an example").clicked() {
                    actions.push(EditorAction::ApplySuggestion {
                        id: section.id.clone(),
                        kind: section.kind(),
                    });
                }
            });
        });
    }

    fn show_fields(
        ui: &mut Ui,
        section: &Section,
        drafts: &mut SkillDrafts,
        actions: &mut Vec<EditorAction>,
    ) {
        for spec in section.kind().spec().fields {
            if let Some(patch) = Self::show_field(ui, section, spec, drafts) {
                actions.push(EditorAction::UpdateSectionData {
                    id: section.id.clone(),
                    patch,
                });
            }
        }
    }

    fn show_field(
        ui: &mut Ui,
        section: &Section,
        spec: &FieldSpec,
        drafts: &mut SkillDrafts,
    ) -> Option<DataPatch> {
        let hint = if spec.required {
            format!("{} *", spec.placeholder)
        } else {
            spec.placeholder.to_string()
        };

        match spec.kind {
            FieldKind::Text => {
                let mut text = section.data().text(spec.field)?.to_string();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text(hint)
                        .desired_width(f32::INFINITY),
                );
                response
                    .changed()
                    .then(|| DataPatch::text(spec.field, text))
            }
            FieldKind::TextArea { rows } => {
                let mut text = section.data().text(spec.field)?.to_string();
                let response = ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .hint_text(hint)
                        .desired_rows(rows)
                        .desired_width(f32::INFINITY),
                );
                response
                    .changed()
                    .then(|| DataPatch::text(spec.field, text))
            }
            FieldKind::List { rows } => {
                let items = section.data().list(spec.field)?;
                let draft = drafts.text_for(&section.id, items);
                let response = ui.add(
                    egui::TextEdit::multiline(&mut *draft)
                        .hint_text(hint)
                        .desired_rows(rows)
                        .desired_width(f32::INFINITY),
                );
                response
                    .changed()
                    .then(|| DataPatch::list(spec.field, parse_list(draft)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::{SectionData, SectionType};

    #[test]
    fn test_parse_list_skips_blank_lines() {
        assert_eq!(parse_list("Rust\n\n  SQL  \n"), vec!["Rust", "SQL"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_draft_keeps_trailing_newline() {
        let mut drafts = SkillDrafts::default();
        let skills = vec!["Rust".to_string()];

        let draft = drafts.text_for("s1", &skills);
        assert_eq!(draft.as_str(), "Rust");
        draft.push('\n');

        // Stored list is unchanged by the newline, so the draft survives.
        assert_eq!(drafts.text_for("s1", &skills).as_str(), "Rust\n");
    }

    #[test]
    fn test_draft_resets_on_external_change() {
        let mut drafts = SkillDrafts::default();
        drafts.text_for("s1", &["Rust".to_string()]);

        let replaced = vec!["Go".to_string(), "C".to_string()];
        assert_eq!(drafts.text_for("s1", &replaced).as_str(), "Go\nC");
    }

    #[test]
    fn test_retain_sections() {
        let mut drafts = SkillDrafts::default();
        drafts.text_for("keep", &[]);
        drafts.text_for("drop", &[]);

        let sections = vec![Section::with_id("keep", SectionData::empty(SectionType::Skills))];
        drafts.retain_sections(&sections);
        assert_eq!(drafts.drafts.len(), 1);
        assert!(drafts.drafts.contains_key("keep"));
    }
}
