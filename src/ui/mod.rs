//! UI components for the resume editor

pub mod personal_form;
pub mod preview;
pub mod section_form;
pub mod theme_panel;

use eframe::egui::{self, Color32};

use crate::core::document::{FontClass, Theme};

/// Theme primary color for egui
pub fn primary_color(theme: &Theme) -> Color32 {
    let [r, g, b] = theme.primary_rgb();
    Color32::from_rgb(r, g, b)
}

/// Closest egui font family for the theme font
pub fn font_family(theme: &Theme) -> egui::FontFamily {
    match theme.font_class() {
        FontClass::Mono => egui::FontFamily::Monospace,
        FontClass::Sans | FontClass::Serif => egui::FontFamily::Proportional,
    }
}
