//! Resume preview panel

use eframe::egui::{self, Color32, FontId, RichText, Ui};

use super::{font_family, primary_color};
use crate::core::document::Theme;
use crate::core::preview::{PreviewBlock, PreviewHeader, PreviewModel, PreviewSection, EMPTY_MESSAGE};

const PAPER: Color32 = Color32::WHITE;
const TEXT: Color32 = Color32::from_rgb(31, 41, 55);
const MUTED: Color32 = Color32::from_rgb(75, 85, 99);
const PLACEHOLDER: Color32 = Color32::from_rgb(156, 163, 175);
const TAG_FILL: Color32 = Color32::from_rgb(243, 244, 246);

/// Read-only resume preview
pub struct PreviewPanel;

impl PreviewPanel {
    /// Show the preview panel
    pub fn show(ui: &mut Ui, model: &PreviewModel, theme: &Theme) {
        let accent = primary_color(theme);
        let family = font_family(theme);
        let font = |size: f32| FontId::new(size, family.clone());

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                egui::Frame::new()
                    .fill(PAPER)
                    .stroke(egui::Stroke::new(1.0, Color32::from_gray(220)))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::same(24))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        Self::show_header(ui, &model.header, accent, &font);

                        for section in &model.sections {
                            Self::show_section(ui, section, accent, &font);
                        }

                        if model.is_empty() {
                            Self::show_empty(ui, &font);
                        }
                    });
            });
    }

    fn show_header(ui: &mut Ui, header: &PreviewHeader, accent: Color32, font: &dyn Fn(f32) -> FontId) {
        let name_color = if header.name_placeholder { PLACEHOLDER } else { TEXT };
        ui.label(RichText::new(&header.name).font(font(24.0)).color(name_color).strong());
        ui.label(RichText::new(&header.title).font(font(17.0)).color(accent));
        ui.add_space(4.0);
        for contact in &header.contacts {
            ui.label(RichText::new(contact).font(font(13.0)).color(MUTED));
        }
        ui.add_space(8.0);
        Self::rule(ui, accent, 2.0);
        ui.add_space(16.0);
    }

    fn show_section(ui: &mut Ui, section: &PreviewSection, accent: Color32, font: &dyn Fn(f32) -> FontId) {
        ui.push_id(&section.id, |ui| {
            ui.label(RichText::new(section.title).font(font(17.0)).color(accent).strong());
            Self::rule(ui, Color32::from_gray(229), 1.0);
            ui.add_space(6.0);

            for block in &section.blocks {
                match block {
                    PreviewBlock::Heading(text) => {
                        ui.label(RichText::new(text).font(font(15.0)).color(TEXT).strong());
                    }
                    PreviewBlock::Meta(text) => {
                        ui.label(RichText::new(text).font(font(13.0)).color(MUTED));
                    }
                    PreviewBlock::Paragraph(text) => {
                        ui.add_space(2.0);
                        ui.add(egui::Label::new(RichText::new(text).font(font(13.0)).color(TEXT)).wrap());
                    }
                    PreviewBlock::Tags(tags) => {
                        ui.horizontal_wrapped(|ui| {
                            for tag in tags {
                                egui::Frame::new()
                                    .fill(TAG_FILL)
                                    .corner_radius(egui::CornerRadius::same(4))
                                    .inner_margin(egui::Margin::symmetric(8, 4))
                                    .show(ui, |ui| {
                                        ui.label(RichText::new(tag).font(font(13.0)).color(TEXT));
                                    });
                            }
                        });
                    }
                }
            }
            ui.add_space(18.0);
        });
    }

    fn rule(ui: &mut Ui, color: Color32, thickness: f32) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, thickness), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, color);
    }

    /// Show empty state
    fn show_empty(ui: &mut Ui, font: &dyn Fn(f32) -> FontId) {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.label(RichText::new("\u{1F4DD}").font(font(24.0)));
            ui.label(RichText::new(EMPTY_MESSAGE).font(font(14.0)).color(PLACEHOLDER));
            ui.add_space(30.0);
        });
    }
}
