//! Resume sections: the closed set of section types, their data shapes,
//! and the per-type table that forms and previews are driven from.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::util::{generate_id, null_as_default};

/// Kind of a resume section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Experience,
    Education,
    Skills,
    Certificates,
    About,
}

impl SectionType {
    /// All section types in the order offered by the "Add section" menu
    pub const ALL: [SectionType; 5] = [
        SectionType::Experience,
        SectionType::Education,
        SectionType::Skills,
        SectionType::Certificates,
        SectionType::About,
    ];

    /// Wire name used in storage and exports
    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Experience => "experience",
            SectionType::Education => "education",
            SectionType::Skills => "skills",
            SectionType::Certificates => "certificates",
            SectionType::About => "about",
        }
    }

    /// Parse a wire name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Look up the table entry for this type
    pub fn spec(self) -> &'static SectionSpec {
        &SECTION_SPECS[self as usize]
    }

    /// Display label
    pub fn label(self) -> &'static str {
        self.spec().label
    }
}

/// A named field inside a section's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Position,
    Company,
    Period,
    Description,
    Institution,
    Degree,
    Skills,
    Name,
    Issuer,
    Date,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea { rows: usize },
    /// One entry per line
    List { rows: usize },
}

/// Form description of a single field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Table entry describing one section type
pub struct SectionSpec {
    pub kind: SectionType,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub empty: fn() -> SectionData,
    pub suggestion: fn() -> Option<SectionData>,
}

const fn text(field: Field, placeholder: &'static str, required: bool) -> FieldSpec {
    FieldSpec {
        field,
        placeholder,
        kind: FieldKind::Text,
        required,
    }
}

const fn area(field: Field, placeholder: &'static str, rows: usize) -> FieldSpec {
    FieldSpec {
        field,
        placeholder,
        kind: FieldKind::TextArea { rows },
        required: false,
    }
}

// Indexed by `SectionType as usize`.
static SECTION_SPECS: [SectionSpec; 5] = [
    SectionSpec {
        kind: SectionType::Experience,
        label: "Work experience",
        fields: &[
            text(Field::Position, "Position", true),
            text(Field::Company, "Company", true),
            text(Field::Period, "Period", false),
            area(Field::Description, "Responsibilities and achievements", 4),
        ],
        empty: || SectionData::Experience(ExperienceData::default()),
        suggestion: || {
            Some(SectionData::Experience(ExperienceData {
                position: "Senior Frontend Developer".into(),
                company: "Tech Solutions Inc.".into(),
                period: "2022 - present".into(),
                description: "Building modern web applications with React, TypeScript and \
                              Next.js. Leading a team of 4 developers, introducing best \
                              practices and code review processes."
                    .into(),
            }))
        },
    },
    SectionSpec {
        kind: SectionType::Education,
        label: "Education",
        fields: &[
            text(Field::Institution, "Institution", true),
            text(Field::Degree, "Degree / major", true),
            text(Field::Period, "Period", false),
        ],
        empty: || SectionData::Education(EducationData::default()),
        suggestion: || {
            Some(SectionData::Education(EducationData {
                institution: "Moscow State University".into(),
                degree: "Bachelor of Computer Science".into(),
                period: "2018 - 2022".into(),
            }))
        },
    },
    SectionSpec {
        kind: SectionType::Skills,
        label: "Skills",
        fields: &[FieldSpec {
            field: Field::Skills,
            placeholder: "Skills (one per line)",
            kind: FieldKind::List { rows: 4 },
            required: true,
        }],
        empty: || SectionData::Skills(SkillsData::default()),
        suggestion: || {
            Some(SectionData::Skills(SkillsData {
                skills: ["JavaScript", "React", "Node.js", "TypeScript", "PostgreSQL", "Docker"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }))
        },
    },
    SectionSpec {
        kind: SectionType::Certificates,
        label: "Certificates",
        fields: &[
            text(Field::Name, "Certificate name", true),
            text(Field::Issuer, "Issuing organization", false),
            text(Field::Date, "Date received", false),
        ],
        empty: || SectionData::Certificates(CertificateData::default()),
        suggestion: || {
            Some(SectionData::Certificates(CertificateData {
                name: "AWS Solutions Architect".into(),
                issuer: "Amazon Web Services".into(),
                date: "2023".into(),
            }))
        },
    },
    SectionSpec {
        kind: SectionType::About,
        label: "About me",
        fields: &[area(Field::Description, "Tell a little about yourself", 6)],
        empty: || SectionData::About(AboutData::default()),
        suggestion: || {
            Some(SectionData::About(AboutData {
                description: "Frontend developer with 5+ years of experience building \
                              scalable web applications. Focused on the React ecosystem \
                              and modern development tooling."
                    .into(),
            }))
        },
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceData {
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationData {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub period: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsData {
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateData {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutData {
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Value written into a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Partial section data, merged shallowly into a section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataPatch {
    entries: Vec<(Field, FieldValue)>,
}

impl DataPatch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch holding a single text field
    pub fn text(field: Field, value: impl Into<String>) -> Self {
        Self::new().with_text(field, value)
    }

    /// Patch holding a single list field
    pub fn list(field: Field, value: Vec<String>) -> Self {
        Self::new().with_list(field, value)
    }

    pub fn with_text(mut self, field: Field, value: impl Into<String>) -> Self {
        self.entries.push((field, FieldValue::Text(value.into())));
        self
    }

    pub fn with_list(mut self, field: Field, value: Vec<String>) -> Self {
        self.entries.push((field, FieldValue::List(value)));
        self
    }

    /// Patch that overwrites every field of `data`
    pub fn from_data(data: &SectionData) -> Self {
        let mut patch = Self::new();
        for spec in data.kind().spec().fields {
            if let Some(value) = data.text(spec.field) {
                patch = patch.with_text(spec.field, value);
            } else if let Some(values) = data.list(spec.field) {
                patch = patch.with_list(spec.field, values.to_vec());
            }
        }
        patch
    }
}

/// Type-specific section payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionData {
    Experience(ExperienceData),
    Education(EducationData),
    Skills(SkillsData),
    Certificates(CertificateData),
    About(AboutData),
}

impl SectionData {
    /// Zero-value data for a section type
    pub fn empty(kind: SectionType) -> Self {
        (kind.spec().empty)()
    }

    /// Canned example payload for a section type, if one exists
    pub fn suggestion(kind: SectionType) -> Option<Self> {
        (kind.spec().suggestion)()
    }

    pub fn kind(&self) -> SectionType {
        match self {
            SectionData::Experience(_) => SectionType::Experience,
            SectionData::Education(_) => SectionType::Education,
            SectionData::Skills(_) => SectionType::Skills,
            SectionData::Certificates(_) => SectionType::Certificates,
            SectionData::About(_) => SectionType::About,
        }
    }

    /// Whether the required fields of this shape are filled
    pub fn is_valid(&self) -> bool {
        match self {
            SectionData::Experience(d) => !d.position.is_empty() && !d.company.is_empty(),
            SectionData::Education(d) => !d.institution.is_empty() && !d.degree.is_empty(),
            SectionData::Skills(d) => !d.skills.is_empty(),
            SectionData::Certificates(d) => !d.name.is_empty(),
            SectionData::About(d) => !d.description.is_empty(),
        }
    }

    /// Read a text field; `None` if this shape has no such text field
    pub fn text(&self, field: Field) -> Option<&str> {
        let value = match (self, field) {
            (SectionData::Experience(d), Field::Position) => &d.position,
            (SectionData::Experience(d), Field::Company) => &d.company,
            (SectionData::Experience(d), Field::Period) => &d.period,
            (SectionData::Experience(d), Field::Description) => &d.description,
            (SectionData::Education(d), Field::Institution) => &d.institution,
            (SectionData::Education(d), Field::Degree) => &d.degree,
            (SectionData::Education(d), Field::Period) => &d.period,
            (SectionData::Certificates(d), Field::Name) => &d.name,
            (SectionData::Certificates(d), Field::Issuer) => &d.issuer,
            (SectionData::Certificates(d), Field::Date) => &d.date,
            (SectionData::About(d), Field::Description) => &d.description,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Read a list field; `None` if this shape has no such list field
    pub fn list(&self, field: Field) -> Option<&[String]> {
        match (self, field) {
            (SectionData::Skills(d), Field::Skills) => Some(&d.skills),
            _ => None,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let value = match (self, field) {
            (SectionData::Experience(d), Field::Position) => &mut d.position,
            (SectionData::Experience(d), Field::Company) => &mut d.company,
            (SectionData::Experience(d), Field::Period) => &mut d.period,
            (SectionData::Experience(d), Field::Description) => &mut d.description,
            (SectionData::Education(d), Field::Institution) => &mut d.institution,
            (SectionData::Education(d), Field::Degree) => &mut d.degree,
            (SectionData::Education(d), Field::Period) => &mut d.period,
            (SectionData::Certificates(d), Field::Name) => &mut d.name,
            (SectionData::Certificates(d), Field::Issuer) => &mut d.issuer,
            (SectionData::Certificates(d), Field::Date) => &mut d.date,
            (SectionData::About(d), Field::Description) => &mut d.description,
            _ => return None,
        };
        Some(value)
    }

    /// Write one field. Returns `false` when the shape has no matching field.
    pub fn set(&mut self, field: Field, value: FieldValue) -> bool {
        match (self, value) {
            (SectionData::Skills(d), FieldValue::List(values)) if field == Field::Skills => {
                d.skills = values;
                true
            }
            (data, FieldValue::Text(text)) => match data.text_mut(field) {
                Some(slot) => {
                    *slot = text;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Shallow merge; entries for fields this shape lacks are ignored
    pub fn merge(&mut self, patch: DataPatch) {
        for (field, value) in patch.entries {
            if !self.set(field, value) {
                tracing::debug!("Ignoring {:?} for {} section", field, self.kind().as_str());
            }
        }
    }

    fn to_value(&self) -> Value {
        let value = match self {
            SectionData::Experience(d) => serde_json::to_value(d),
            SectionData::Education(d) => serde_json::to_value(d),
            SectionData::Skills(d) => serde_json::to_value(d),
            SectionData::Certificates(d) => serde_json::to_value(d),
            SectionData::About(d) => serde_json::to_value(d),
        };
        // Plain string/list structs always serialize.
        value.unwrap_or(Value::Null)
    }

    fn from_value(kind: SectionType, value: Value) -> Result<Self, serde_json::Error> {
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };
        Ok(match kind {
            SectionType::Experience => SectionData::Experience(serde_json::from_value(value)?),
            SectionType::Education => SectionData::Education(serde_json::from_value(value)?),
            SectionType::Skills => SectionData::Skills(serde_json::from_value(value)?),
            SectionType::Certificates => SectionData::Certificates(serde_json::from_value(value)?),
            SectionType::About => SectionData::About(serde_json::from_value(value)?),
        })
    }
}

/// A resume section with a stable id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct Section {
    pub id: String,
    data: SectionData,
}

/// Wire form `{"id", "type", "data"}`
#[derive(Serialize, Deserialize)]
struct RawSection {
    id: String,
    #[serde(rename = "type")]
    kind: SectionType,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawSection> for Section {
    type Error = serde_json::Error;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            data: SectionData::from_value(raw.kind, raw.data)?,
        })
    }
}

impl From<Section> for RawSection {
    fn from(section: Section) -> Self {
        Self {
            kind: section.kind(),
            data: section.data.to_value(),
            id: section.id,
        }
    }
}

impl Section {
    /// Create an empty section of the given type with a fresh id
    pub fn new(kind: SectionType) -> Self {
        Self::with_id(generate_id(), SectionData::empty(kind))
    }

    pub fn with_id(id: impl Into<String>, data: SectionData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn kind(&self) -> SectionType {
        self.data.kind()
    }

    pub fn data(&self) -> &SectionData {
        &self.data
    }

    pub fn is_valid(&self) -> bool {
        self.data.is_valid()
    }

    /// Shallow-merge a patch into this section's data
    pub fn merge(&mut self, patch: DataPatch) {
        self.data.merge(patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_type() {
        for kind in SectionType::ALL {
            assert_eq!(kind.spec().kind, kind);
            assert_eq!(SectionData::empty(kind).kind(), kind);
        }
    }

    #[test]
    fn test_fresh_sections_are_invalid() {
        for kind in SectionType::ALL {
            assert!(!Section::new(kind).is_valid(), "{} should start incomplete", kind.as_str());
        }
    }

    #[test]
    fn test_suggestions_are_valid() {
        for kind in SectionType::ALL {
            let suggestion = SectionData::suggestion(kind).unwrap();
            assert_eq!(suggestion.kind(), kind);
            assert!(suggestion.is_valid());
        }
    }

    #[test]
    fn test_validity_ignores_optional_fields() {
        let mut section = Section::new(SectionType::Experience);
        section.merge(DataPatch::text(Field::Position, "Engineer").with_text(Field::Company, "Acme"));
        assert!(section.is_valid());

        section.merge(DataPatch::text(Field::Period, "2020").with_text(Field::Description, "Stuff"));
        assert!(section.is_valid());

        section.merge(DataPatch::text(Field::Company, ""));
        assert!(!section.is_valid());
    }

    #[test]
    fn test_required_fields_per_type() {
        let mut education = Section::new(SectionType::Education);
        education.merge(DataPatch::text(Field::Institution, "MIT"));
        assert!(!education.is_valid());
        education.merge(DataPatch::text(Field::Degree, "BSc"));
        assert!(education.is_valid());

        let mut skills = Section::new(SectionType::Skills);
        skills.merge(DataPatch::list(Field::Skills, vec!["Rust".into()]));
        assert!(skills.is_valid());

        let mut cert = Section::new(SectionType::Certificates);
        cert.merge(DataPatch::text(Field::Issuer, "AWS"));
        assert!(!cert.is_valid());
        cert.merge(DataPatch::text(Field::Name, "Architect"));
        assert!(cert.is_valid());
    }

    #[test]
    fn test_merge_ignores_foreign_fields() {
        let mut section = Section::new(SectionType::About);
        section.merge(DataPatch::text(Field::Company, "Acme").with_list(Field::Description, vec![]));
        assert_eq!(section.data(), &SectionData::About(AboutData::default()));
        assert_eq!(section.kind(), SectionType::About);
    }

    #[test]
    fn test_parse_unknown_type() {
        assert_eq!(SectionType::parse("skills"), Some(SectionType::Skills));
        assert_eq!(SectionType::parse("projects"), None);
    }

    #[test]
    fn test_wire_format() {
        let mut section = Section::with_id("42", SectionData::empty(SectionType::Certificates));
        section.merge(DataPatch::text(Field::Name, "CKA"));

        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "42",
                "type": "certificates",
                "data": { "name": "CKA", "issuer": "", "date": "" }
            })
        );

        let back: Section = serde_json::from_value(value).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn test_missing_data_fields_default_to_empty() {
        let section: Section =
            serde_json::from_str(r#"{"id":"7","type":"experience","data":{"position":"Dev"}}"#)
                .unwrap();
        assert_eq!(section.data().text(Field::Position), Some("Dev"));
        assert_eq!(section.data().text(Field::Company), Some(""));

        let bare: Section = serde_json::from_str(r#"{"id":"8","type":"skills"}"#).unwrap();
        assert_eq!(bare.data().list(Field::Skills), Some(&[][..]));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<Section, _> =
            serde_json::from_str(r#"{"id":"9","type":"projects","data":{}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_from_data_overwrites_everything() {
        let suggestion = SectionData::suggestion(SectionType::Experience).unwrap();
        let mut section = Section::new(SectionType::Experience);
        section.merge(DataPatch::text(Field::Period, "old"));
        section.merge(DataPatch::from_data(&suggestion));
        assert_eq!(section.data(), &suggestion);
    }
}
