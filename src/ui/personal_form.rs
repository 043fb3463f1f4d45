//! Personal information form

use eframe::egui::{self, Color32, RichText, Ui};

use crate::core::document::{PersonalInfo, PersonalInfoPatch};
use crate::core::editor::EditorAction;
use crate::core::util::{is_valid_email, is_valid_phone};

const HINT: Color32 = Color32::from_rgb(234, 88, 12);

pub struct PersonalInfoForm;

impl PersonalInfoForm {
    /// Show the form; edits are pushed onto `actions`
    pub fn show(ui: &mut Ui, info: &PersonalInfo, actions: &mut Vec<EditorAction>) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.strong("Personal information");
            ui.add_space(6.0);

            if let Some(name) = Self::field(ui, &info.name, "Full name") {
                actions.push(Self::patch(PersonalInfoPatch {
                    name: Some(name),
                    ..Default::default()
                }));
            }
            if let Some(title) = Self::field(ui, &info.title, "Position") {
                actions.push(Self::patch(PersonalInfoPatch {
                    title: Some(title),
                    ..Default::default()
                }));
            }

            ui.columns(2, |cols| {
                if let Some(email) = Self::field(&mut cols[0], &info.email, "Email") {
                    actions.push(Self::patch(PersonalInfoPatch {
                        email: Some(email),
                        ..Default::default()
                    }));
                }
                if !info.email.is_empty() && !is_valid_email(&info.email) {
                    cols[0].label(RichText::new("Email looks incomplete").small().color(HINT));
                }

                if let Some(phone) = Self::field(&mut cols[1], &info.phone, "Phone") {
                    actions.push(Self::patch(PersonalInfoPatch {
                        phone: Some(phone),
                        ..Default::default()
                    }));
                }
                if !info.phone.is_empty() && !is_valid_phone(&info.phone) {
                    cols[1].label(RichText::new("Phone number looks off").small().color(HINT));
                }
            });

            if let Some(location) = Self::field(ui, &info.location, "Location") {
                actions.push(Self::patch(PersonalInfoPatch {
                    location: Some(location),
                    ..Default::default()
                }));
            }
        });
    }

    /// Single-line input; returns the new value when edited
    fn field(ui: &mut Ui, value: &str, hint: &str) -> Option<String> {
        let mut text = value.to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text)
                .hint_text(hint)
                .desired_width(f32::INFINITY),
        );
        response.changed().then_some(text)
    }

    fn patch(patch: PersonalInfoPatch) -> EditorAction {
        EditorAction::SetPersonalInfo(patch)
    }
}
