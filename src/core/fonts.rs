//! Fonts embedded into PDF exports
//!
//! The DejaVu faces cover Latin, Greek and Cyrillic text. Characters a face
//! has no glyph for are reported so an export never silently loses text.

use ttf_parser::{Face, FaceParsingError};

use super::document::FontClass;

static SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
static SERIF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif.ttf");
static SERIF_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Bold.ttf");
static MONO: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");
static MONO_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono-Bold.ttf");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// TrueType bytes for the face matching `class` and `weight`
pub fn font_data(class: FontClass, weight: Weight) -> &'static [u8] {
    match (class, weight) {
        (FontClass::Sans, Weight::Regular) => SANS,
        (FontClass::Sans, Weight::Bold) => SANS_BOLD,
        (FontClass::Serif, Weight::Regular) => SERIF,
        (FontClass::Serif, Weight::Bold) => SERIF_BOLD,
        (FontClass::Mono, Weight::Regular) => MONO,
        (FontClass::Mono, Weight::Bold) => MONO_BOLD,
    }
}

/// Character map lookups for one face
pub struct GlyphCoverage<'a> {
    face: Face<'a>,
}

impl<'a> GlyphCoverage<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, FaceParsingError> {
        Ok(Self {
            face: Face::parse(data, 0)?,
        })
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face.glyph_index(c).map(|id| id.0)
    }

    /// Append characters of `text` without a glyph to `missing`, once each
    pub fn collect_missing(&self, text: &str, missing: &mut Vec<char>) {
        for c in text.chars() {
            if c.is_control() || missing.contains(&c) {
                continue;
            }
            if self.glyph_id(c).is_none() {
                missing.push(c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSES: [FontClass; 3] = [FontClass::Sans, FontClass::Serif, FontClass::Mono];

    #[test]
    fn test_every_face_parses() {
        for class in CLASSES {
            for weight in [Weight::Regular, Weight::Bold] {
                assert!(GlyphCoverage::parse(font_data(class, weight)).is_ok());
            }
        }
    }

    #[test]
    fn test_cyrillic_and_latin_are_covered() {
        for class in CLASSES {
            let coverage = GlyphCoverage::parse(font_data(class, Weight::Regular)).unwrap();
            let mut missing = Vec::new();
            coverage.collect_missing("Иван Петров, Jürgen Ødegård • 2020 – 2024", &mut missing);
            assert!(missing.is_empty(), "{:?} lacks {:?}", class, missing);
        }
    }

    #[test]
    fn test_missing_glyphs_reported_once() {
        let coverage = GlyphCoverage::parse(font_data(FontClass::Sans, Weight::Regular)).unwrap();
        let mut missing = Vec::new();
        coverage.collect_missing("Разработчик 李李", &mut missing);
        coverage.collect_missing("李", &mut missing);
        assert_eq!(missing, vec!['李']);
    }
}
