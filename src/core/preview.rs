//! Read-only layout of the resume, shared by the on-screen preview and the
//! PDF renderer. Incomplete sections are left out.

use super::document::{PersonalInfo, ResumeDocument};
use super::section::{Section, SectionData};

pub const NAME_PLACEHOLDER: &str = "Your name";
pub const TITLE_PLACEHOLDER: &str = "Position";
pub const EMPTY_MESSAGE: &str = "Add and fill in sections to see your resume";

/// Resume header block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHeader {
    pub name: String,
    pub title: String,
    /// True when `name`/`title` are placeholders rather than user input
    pub name_placeholder: bool,
    pub title_placeholder: bool,
    pub contacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBlock {
    Heading(String),
    /// Secondary line such as "Company • 2020 - 2022"
    Meta(String),
    Paragraph(String),
    Tags(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSection {
    pub id: String,
    pub title: &'static str,
    pub blocks: Vec<PreviewBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewModel {
    pub header: PreviewHeader,
    pub sections: Vec<PreviewSection>,
}

impl PreviewModel {
    pub fn build(document: &ResumeDocument) -> Self {
        Self {
            header: build_header(&document.personal_info),
            sections: document.sections.iter().filter_map(build_section).collect(),
        }
    }

    /// No section is complete enough to show
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn build_header(info: &PersonalInfo) -> PreviewHeader {
    let contacts = [&info.email, &info.phone, &info.location]
        .into_iter()
        .filter(|c| !c.is_empty())
        .cloned()
        .collect();

    PreviewHeader {
        name: or_placeholder(&info.name, NAME_PLACEHOLDER),
        title: or_placeholder(&info.title, TITLE_PLACEHOLDER),
        name_placeholder: info.name.is_empty(),
        title_placeholder: info.title.is_empty(),
        contacts,
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Join the non-empty parts with a bullet
fn meta_line(parts: &[&str]) -> Option<PreviewBlock> {
    let parts: Vec<&str> = parts.iter().copied().filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(PreviewBlock::Meta(parts.join(" \u{2022} ")))
    }
}

fn build_section(section: &Section) -> Option<PreviewSection> {
    if !section.is_valid() {
        return None;
    }

    let mut blocks = Vec::new();
    match section.data() {
        SectionData::Experience(d) => {
            blocks.push(PreviewBlock::Heading(d.position.clone()));
            blocks.extend(meta_line(&[d.company.as_str(), d.period.as_str()]));
            if !d.description.is_empty() {
                blocks.push(PreviewBlock::Paragraph(d.description.clone()));
            }
        }
        SectionData::Education(d) => {
            blocks.push(PreviewBlock::Heading(d.degree.clone()));
            blocks.extend(meta_line(&[d.institution.as_str(), d.period.as_str()]));
        }
        SectionData::Skills(d) => blocks.push(PreviewBlock::Tags(d.skills.clone())),
        SectionData::Certificates(d) => {
            blocks.push(PreviewBlock::Heading(d.name.clone()));
            blocks.extend(meta_line(&[d.issuer.as_str(), d.date.as_str()]));
        }
        SectionData::About(d) => blocks.push(PreviewBlock::Paragraph(d.description.clone())),
    }

    Some(PreviewSection {
        id: section.id.clone(),
        title: section.kind().label(),
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::{DataPatch, Field, SectionType};

    #[test]
    fn test_default_document_is_empty() {
        let model = PreviewModel::build(&ResumeDocument::default());
        assert!(model.is_empty());
        assert_eq!(model.header.name, NAME_PLACEHOLDER);
        assert!(model.header.name_placeholder);
        assert_eq!(model.header.title, TITLE_PLACEHOLDER);
        assert!(model.header.contacts.is_empty());
    }

    #[test]
    fn test_experience_without_description() {
        let mut section = Section::new(SectionType::Experience);
        section.merge(
            DataPatch::text(Field::Position, "Engineer")
                .with_text(Field::Company, "Acme")
                .with_text(Field::Period, "2020 - 2023"),
        );
        let doc = ResumeDocument {
            sections: vec![section],
            ..Default::default()
        };

        let model = PreviewModel::build(&doc);
        assert_eq!(model.sections.len(), 1);
        assert_eq!(model.sections[0].title, "Work experience");
        assert_eq!(
            model.sections[0].blocks,
            vec![
                PreviewBlock::Heading("Engineer".into()),
                PreviewBlock::Meta("Acme \u{2022} 2020 - 2023".into()),
            ]
        );
    }

    #[test]
    fn test_incomplete_sections_are_hidden() {
        let mut skills = Section::new(SectionType::Skills);
        skills.merge(DataPatch::list(Field::Skills, vec!["Rust".into(), "SQL".into()]));
        let doc = ResumeDocument {
            sections: vec![Section::new(SectionType::Education), skills],
            ..Default::default()
        };

        let model = PreviewModel::build(&doc);
        assert_eq!(model.sections.len(), 1);
        assert_eq!(
            model.sections[0].blocks,
            vec![PreviewBlock::Tags(vec!["Rust".into(), "SQL".into()])]
        );
    }

    #[test]
    fn test_meta_skips_empty_parts() {
        let mut cert = Section::new(SectionType::Certificates);
        cert.merge(DataPatch::text(Field::Name, "CKA").with_text(Field::Date, "2024"));
        let doc = ResumeDocument {
            sections: vec![cert],
            ..Default::default()
        };
        let model = PreviewModel::build(&doc);
        assert_eq!(model.sections[0].blocks[1], PreviewBlock::Meta("2024".into()));
    }

    #[test]
    fn test_header_contacts_in_order() {
        let mut doc = ResumeDocument::default();
        doc.personal_info = PersonalInfo {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            location: "Oslo".into(),
            ..Default::default()
        };
        let header = PreviewModel::build(&doc).header;
        assert_eq!(header.name, "Jane");
        assert!(!header.name_placeholder);
        assert_eq!(header.contacts, vec!["jane@example.com", "Oslo"]);
    }
}
