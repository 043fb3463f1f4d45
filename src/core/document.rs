//! The resume document: personal info, ordered sections and theme

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::section::{AboutData, Section, SectionData};
use super::util::null_as_default;

/// Format tag written into JSON exports
pub const EXPORT_VERSION: &str = "1.0";

/// Contact details shown in the resume header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

/// Partial personal info; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl PersonalInfo {
    pub const FIELD_COUNT: usize = 5;

    fn fields(&self) -> [&str; Self::FIELD_COUNT] {
        [
            self.name.as_str(),
            self.title.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.location.as_str(),
        ]
    }

    /// Number of non-empty fields
    pub fn filled_count(&self) -> usize {
        self.fields().iter().filter(|f| !f.is_empty()).count()
    }

    pub fn merge(&mut self, patch: PersonalInfoPatch) {
        let PersonalInfoPatch {
            name,
            title,
            email,
            phone,
            location,
        } = patch;
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = title {
            self.title = v;
        }
        if let Some(v) = email {
            self.email = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
    }
}

/// Visual preferences applied to the preview and PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    #[serde(deserialize_with = "primary_color_or_default")]
    pub primary_color: String,
    #[serde(deserialize_with = "font_family_or_default")]
    pub font_family: String,
}

fn primary_color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| Theme::default().primary_color))
}

fn font_family_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(|| Theme::default().font_family))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemePatch {
    pub primary_color: Option<String>,
    pub font_family: Option<String>,
}

/// A named color offered by the theme picker
#[derive(Debug, Clone, Copy)]
pub struct ColorPreset {
    pub name: &'static str,
    pub color: &'static str,
}

pub const COLOR_PRESETS: [ColorPreset; 8] = [
    ColorPreset { name: "Blue", color: "#2563eb" },
    ColorPreset { name: "Green", color: "#16a34a" },
    ColorPreset { name: "Purple", color: "#7c3aed" },
    ColorPreset { name: "Red", color: "#dc2626" },
    ColorPreset { name: "Orange", color: "#ea580c" },
    ColorPreset { name: "Indigo", color: "#4f46e5" },
    ColorPreset { name: "Pink", color: "#ec4899" },
    ColorPreset { name: "Dark gray", color: "#374151" },
];

pub const FONT_PRESETS: [&str; 4] = ["Inter", "Georgia", "Times New Roman", "Courier New"];

const DEFAULT_PRIMARY_COLOR: [u8; 3] = [0x25, 0x63, 0xeb];

/// Coarse font classification used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontClass {
    Sans,
    Serif,
    Mono,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#2563eb".to_string(),
            font_family: "Inter".to_string(),
        }
    }
}

impl Theme {
    pub fn merge(&mut self, patch: ThemePatch) {
        if let Some(color) = patch.primary_color {
            self.primary_color = color;
        }
        if let Some(font) = patch.font_family {
            self.font_family = font;
        }
    }

    /// Primary color as RGB; unparsable values fall back to the default blue
    pub fn primary_rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.primary_color).unwrap_or(DEFAULT_PRIMARY_COLOR)
    }

    pub fn font_class(&self) -> FontClass {
        let family = self.font_family.to_lowercase();
        if family.contains("mono") || family.contains("courier") {
            FontClass::Mono
        } else if family.contains("serif") && !family.contains("sans")
            || ["georgia", "times", "garamond", "merriweather"]
                .iter()
                .any(|f| family.contains(f))
        {
            FontClass::Serif
        } else {
            FontClass::Sans
        }
    }
}

/// Parse `#rrggbb` or `#rgb`
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => Some([
            u8::from_str_radix(&hex[0..2], 16).ok()?,
            u8::from_str_radix(&hex[2..4], 16).ok()?,
            u8::from_str_radix(&hex[4..6], 16).ok()?,
        ]),
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 16 + v;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// The unit of persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal_info: PersonalInfo,
    #[serde(default = "default_sections", deserialize_with = "lenient_sections")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: Theme,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            sections: default_sections(),
            theme: Theme::default(),
        }
    }
}

fn default_sections() -> Vec<Section> {
    vec![Section::with_id("1", SectionData::About(AboutData::default()))]
}

/// Keep every section entry that parses; drop (and log) the rest
fn lenient_sections<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(default_sections());
    };
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Section>(value) {
            Ok(section) => Some(section),
            Err(e) => {
                tracing::warn!("Dropping unreadable section: {}", e);
                None
            }
        })
        .collect())
}

impl ResumeDocument {
    pub fn completeness(&self) -> u8 {
        completeness(&self.personal_info, &self.sections)
    }

    pub fn valid_section_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_valid()).count()
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }
}

/// Resume completeness percentage.
///
/// Half the score comes from filled personal fields, half from the share of
/// valid sections. No sections counts as zero valid out of one.
pub fn completeness(personal_info: &PersonalInfo, sections: &[Section]) -> u8 {
    let personal = personal_info.filled_count() as f64 / PersonalInfo::FIELD_COUNT as f64;
    let valid = sections.iter().filter(|s| s.is_valid()).count() as f64;
    let total = sections.len().max(1) as f64;
    let score = 50.0 * personal + 50.0 * (valid / total);
    score.round().clamp(0.0, 100.0) as u8
}

/// Snapshot written by the JSON export
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub personal_info: PersonalInfo,
    pub sections: Vec<Section>,
    pub theme: Theme,
    pub export_date: String,
    pub version: &'static str,
}

/// Build an export snapshot; invalid sections are dropped
pub fn format_for_export(
    personal_info: &PersonalInfo,
    sections: &[Section],
    theme: &Theme,
) -> ExportDocument {
    format_for_export_at(personal_info, sections, theme, Utc::now())
}

pub fn format_for_export_at(
    personal_info: &PersonalInfo,
    sections: &[Section],
    theme: &Theme,
    at: DateTime<Utc>,
) -> ExportDocument {
    ExportDocument {
        personal_info: personal_info.clone(),
        sections: sections.iter().filter(|s| s.is_valid()).cloned().collect(),
        theme: theme.clone(),
        export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        version: EXPORT_VERSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::{DataPatch, Field, SectionType};

    fn full_info() -> PersonalInfo {
        PersonalInfo {
            name: "Jane Doe".into(),
            title: "Engineer".into(),
            email: "jane@example.com".into(),
            phone: "+15551234".into(),
            location: "Berlin".into(),
        }
    }

    fn valid_about() -> Section {
        let mut s = Section::new(SectionType::About);
        s.merge(DataPatch::text(Field::Description, "Hello"));
        s
    }

    #[test]
    fn test_completeness_empty() {
        assert_eq!(completeness(&PersonalInfo::default(), &[]), 0);
    }

    #[test]
    fn test_completeness_full() {
        let sections = vec![valid_about(), valid_about()];
        assert_eq!(completeness(&full_info(), &sections), 100);
    }

    #[test]
    fn test_completeness_default_document_scenario() {
        let mut doc = ResumeDocument::default();
        assert_eq!(doc.completeness(), 0);

        doc.sections[0].merge(DataPatch::text(Field::Description, "Rustacean"));
        assert_eq!(doc.completeness(), 50);
    }

    #[test]
    fn test_completeness_rounding() {
        let info = PersonalInfo {
            name: "A".into(),
            ..Default::default()
        };
        let sections = vec![valid_about(), Section::new(SectionType::Skills), Section::new(SectionType::Skills)];
        // 10 + 16.67
        assert_eq!(completeness(&info, &sections), 27);
    }

    #[test]
    fn test_completeness_monotonic() {
        let mut info = PersonalInfo::default();
        let mut sections = vec![Section::new(SectionType::About), Section::new(SectionType::About)];
        let mut last = completeness(&info, &sections);

        for patch in [
            PersonalInfoPatch { name: Some("n".into()), ..Default::default() },
            PersonalInfoPatch { email: Some("e".into()), ..Default::default() },
            PersonalInfoPatch { location: Some("l".into()), ..Default::default() },
        ] {
            info.merge(patch);
            let next = completeness(&info, &sections);
            assert!(next >= last);
            last = next;
        }
        for i in 0..sections.len() {
            sections[i].merge(DataPatch::text(Field::Description, "x"));
            let next = completeness(&info, &sections);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_personal_info_merge_is_shallow() {
        let mut info = full_info();
        info.merge(PersonalInfoPatch {
            title: Some("Lead".into()),
            ..Default::default()
        });
        assert_eq!(info.title, "Lead");
        assert_eq!(info.name, "Jane Doe");
    }

    #[test]
    fn test_theme_colors() {
        let mut theme = Theme::default();
        assert_eq!(theme.primary_rgb(), [0x25, 0x63, 0xeb]);
        theme.merge(ThemePatch {
            primary_color: Some("#dc2626".into()),
            ..Default::default()
        });
        assert_eq!(theme.primary_rgb(), [0xdc, 0x26, 0x26]);
        assert_eq!(theme.font_family, "Inter");

        theme.primary_color = "not a color".into();
        assert_eq!(theme.primary_rgb(), DEFAULT_PRIMARY_COLOR);
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
    }

    #[test]
    fn test_font_class() {
        let theme = |f: &str| Theme {
            font_family: f.into(),
            ..Default::default()
        };
        assert_eq!(theme("Inter").font_class(), FontClass::Sans);
        assert_eq!(theme("Georgia").font_class(), FontClass::Serif);
        assert_eq!(theme("Times New Roman").font_class(), FontClass::Serif);
        assert_eq!(theme("Courier New").font_class(), FontClass::Mono);
        assert_eq!(theme("Open Sans").font_class(), FontClass::Sans);
    }

    #[test]
    fn test_document_json_layout() {
        let doc = ResumeDocument::default();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("personalInfo").is_some());
        assert_eq!(value["theme"]["primaryColor"], "#2563eb");
        assert_eq!(value["theme"]["fontFamily"], "Inter");
        assert_eq!(value["sections"][0]["id"], "1");
        assert_eq!(value["sections"][0]["type"], "about");
    }

    #[test]
    fn test_lenient_load() {
        let doc: ResumeDocument = serde_json::from_str(
            r#"{"sections":[{"id":"a","type":"about","data":{"description":"hi"}},
                            {"id":"b","type":"projects","data":{}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].id, "a");
        assert_eq!(doc.theme, Theme::default());

        let missing: ResumeDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(missing, ResumeDocument::default());

        let empty: ResumeDocument = serde_json::from_str(r#"{"sections":[]}"#).unwrap();
        assert!(empty.sections.is_empty());
    }

    #[test]
    fn test_null_personal_info_keeps_sections() {
        let doc: ResumeDocument = serde_json::from_str(
            r##"{"personalInfo":null,
                "sections":[{"id":"a","type":"about","data":{"description":"hi"}}],
                "theme":{"primaryColor":"#dc2626","fontFamily":"Georgia"}}"##,
        )
        .unwrap();
        assert_eq!(doc.personal_info, PersonalInfo::default());
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.theme.primary_color, "#dc2626");
    }

    #[test]
    fn test_null_theme_keeps_sections() {
        let doc: ResumeDocument = serde_json::from_str(
            r#"{"sections":[{"id":"a","type":"about","data":{"description":"hi"}}],"theme":null}"#,
        )
        .unwrap();
        assert_eq!(doc.theme, Theme::default());
        assert_eq!(doc.sections[0].id, "a");

        let partial: Theme =
            serde_json::from_str(r#"{"primaryColor":null,"fontFamily":"Georgia"}"#).unwrap();
        assert_eq!(partial.primary_color, "#2563eb");
        assert_eq!(partial.font_family, "Georgia");
    }

    #[test]
    fn test_null_personal_fields_become_empty() {
        let doc: ResumeDocument = serde_json::from_str(
            r#"{"personalInfo":{"name":null,"title":"Engineer","email":null},
                "sections":[{"id":"a","type":"about","data":{"description":"hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.personal_info.name, "");
        assert_eq!(doc.personal_info.title, "Engineer");
        assert_eq!(doc.personal_info.email, "");
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_null_section_fields_keep_section() {
        let doc: ResumeDocument = serde_json::from_str(
            r#"{"sections":[
                {"id":"e","type":"experience","data":{"position":"Engineer","company":null}},
                {"id":"s","type":"skills","data":{"skills":null}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].data().text(Field::Company), Some(""));
        assert_eq!(doc.sections[1].data().list(Field::Skills), Some(&[][..]));
    }

    #[test]
    fn test_format_for_export_drops_invalid() {
        let sections = vec![valid_about(), Section::new(SectionType::Experience)];
        let at = DateTime::parse_from_rfc3339("2024-03-05T10:20:30.456Z")
            .unwrap()
            .with_timezone(&Utc);
        let export = format_for_export_at(&full_info(), &sections, &Theme::default(), at);

        assert_eq!(export.sections.len(), 1);
        assert_eq!(export.version, "1.0");
        assert_eq!(export.export_date, "2024-03-05T10:20:30.456Z");

        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["exportDate"], "2024-03-05T10:20:30.456Z");
        assert_eq!(value["personalInfo"]["name"], "Jane Doe");
    }
}
