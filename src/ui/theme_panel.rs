//! Theme picker: primary color and font

use eframe::egui::{self, Color32, Sense, Ui};

use crate::core::document::{parse_hex_color, Theme, ThemePatch, COLOR_PRESETS, FONT_PRESETS};
use crate::core::editor::EditorAction;

const SWATCH_SIZE: f32 = 26.0;

pub struct ThemePanel;

impl ThemePanel {
    pub fn show(ui: &mut Ui, theme: &Theme, actions: &mut Vec<EditorAction>) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Color:");
            for preset in COLOR_PRESETS {
                let Some([r, g, b]) = parse_hex_color(preset.color) else {
                    continue;
                };
                let selected = theme.primary_color.eq_ignore_ascii_case(preset.color);
                if Self::swatch(ui, Color32::from_rgb(r, g, b), selected)
                    .on_hover_text(preset.name)
                    .clicked()
                {
                    actions.push(Self::color(preset.color));
                }
            }

            ui.separator();

            ui.label("Font:");
            egui::ComboBox::from_id_salt("theme_font")
                .selected_text(theme.font_family.as_str())
                .show_ui(ui, |ui| {
                    for font in FONT_PRESETS {
                        if ui
                            .selectable_label(theme.font_family == font, font)
                            .clicked()
                        {
                            actions.push(EditorAction::SetTheme(ThemePatch {
                                font_family: Some(font.to_string()),
                                ..Default::default()
                            }));
                        }
                    }
                });
        });
    }

    fn color(color: &str) -> EditorAction {
        EditorAction::SetTheme(ThemePatch {
            primary_color: Some(color.to_string()),
            ..Default::default()
        })
    }

    fn swatch(ui: &mut Ui, color: Color32, selected: bool) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), Sense::click());
        let painter = ui.painter();
        let radius = SWATCH_SIZE / 2.0 - 2.0;
        painter.circle_filled(rect.center(), radius, color);

        let outline = if selected {
            egui::Stroke::new(2.5, ui.visuals().strong_text_color())
        } else if response.hovered() {
            egui::Stroke::new(1.5, Color32::from_gray(160))
        } else {
            egui::Stroke::new(1.0, Color32::from_gray(200))
        };
        painter.circle_stroke(rect.center(), radius, outline);
        response
    }
}
