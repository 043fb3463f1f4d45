//! JSON and PDF export
//!
//! PDF export renders the same `PreviewModel` shown on screen. Rendering
//! runs on the blocking pool so the editor stays responsive; the result
//! comes back through a oneshot channel polled by the UI.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use directories::UserDirs;
use printpdf::{Color, IndirectFontRef, Line, Mm, PdfDocument, Point, Rgb};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::document::{format_for_export, FontClass, ResumeDocument, Theme};
use super::fonts::{font_data, GlyphCoverage, Weight};
use super::preview::{PreviewBlock, PreviewModel};

const MM_PER_PT: f32 = 0.3528;
/// Average glyph advance of the embedded fonts, as a fraction of the size
const AVG_CHAR_WIDTH: f32 = 0.55;
const LINE_SPACING: f32 = 1.35;
const TEXT_COLOR: [u8; 3] = [0x1f, 0x29, 0x37];
const MUTED_COLOR: [u8; 3] = [0x4b, 0x55, 0x63];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render document: {0}")]
    Render(String),

    #[error("the PDF font has no characters for: {0}")]
    MissingGlyphs(String),

    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("export was interrupted")]
    Interrupted,
}

/// Turns the preview layout into file bytes
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, preview: &PreviewModel, theme: &Theme) -> Result<Vec<u8>, ExportError>;
}

/// Page geometry for PDF output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl Default for PageOptions {
    /// A4 portrait with half-inch margins
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 12.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        color: [u8; 3],
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: [u8; 3],
    },
}

/// Positions in millimetres from the bottom-left corner, as PDF expects
#[derive(Debug, Default, Clone, PartialEq)]
struct PageLayout {
    ops: Vec<DrawOp>,
}

/// Flows text top-down and starts a new page when the bottom margin is reached
struct Flow {
    options: PageOptions,
    pages: Vec<PageLayout>,
    y: f32,
}

impl Flow {
    fn new(options: PageOptions) -> Self {
        Self {
            options,
            pages: vec![PageLayout::default()],
            y: options.height_mm - options.margin_mm,
        }
    }

    fn usable_width(&self) -> f32 {
        self.options.width_mm - 2.0 * self.options.margin_mm
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < self.options.margin_mm {
            self.pages.push(PageLayout::default());
            self.y = self.options.height_mm - self.options.margin_mm;
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, text: &str, size: f32, weight: Weight, color: [u8; 3]) {
        let line_height = size * MM_PER_PT * LINE_SPACING;
        let max_chars = (self.usable_width() / (size * MM_PER_PT * AVG_CHAR_WIDTH)) as usize;
        for line in wrap_text(text, max_chars.max(1)) {
            self.ensure_room(line_height);
            self.y -= line_height;
            if line.is_empty() {
                continue;
            }
            let x = self.options.margin_mm;
            let y = self.y;
            self.push(DrawOp::Text {
                x,
                y,
                size,
                weight,
                color,
                text: line,
            });
        }
    }

    fn rule(&mut self, thickness: f32, color: [u8; 3]) {
        self.ensure_room(2.0);
        self.y -= 2.0;
        let (x1, y) = (self.options.margin_mm, self.y);
        let x2 = self.options.width_mm - self.options.margin_mm;
        self.push(DrawOp::Rule {
            x1,
            x2,
            y,
            thickness,
            color,
        });
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }
}

/// Greedy word wrap to at most `max_chars` characters per line.
/// Explicit newlines are kept, a blank line becomes an empty entry, and
/// overlong words are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !word.is_empty() {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn layout(preview: &PreviewModel, theme: &Theme, options: PageOptions) -> Vec<PageLayout> {
    let primary = theme.primary_rgb();
    let mut flow = Flow::new(options);

    let header = &preview.header;
    flow.text(&header.name, 22.0, Weight::Bold, TEXT_COLOR);
    flow.gap(1.0);
    flow.text(&header.title, 14.0, Weight::Regular, primary);
    for contact in &header.contacts {
        flow.text(contact, 10.0, Weight::Regular, MUTED_COLOR);
    }
    flow.gap(2.0);
    flow.rule(1.0, primary);
    flow.gap(4.0);

    if preview.is_empty() {
        flow.text(super::preview::EMPTY_MESSAGE, 11.0, Weight::Regular, MUTED_COLOR);
    }

    for section in &preview.sections {
        // Keep a section title together with at least its first line.
        flow.ensure_room(14.0 * MM_PER_PT * LINE_SPACING * 2.0 + 4.0);
        flow.text(section.title, 14.0, Weight::Bold, primary);
        flow.rule(0.3, primary);
        flow.gap(1.5);
        for block in &section.blocks {
            match block {
                PreviewBlock::Heading(text) => flow.text(text, 12.0, Weight::Bold, TEXT_COLOR),
                PreviewBlock::Meta(text) => flow.text(text, 10.0, Weight::Regular, MUTED_COLOR),
                PreviewBlock::Paragraph(text) => {
                    flow.gap(1.0);
                    flow.text(text, 10.5, Weight::Regular, TEXT_COLOR);
                }
                PreviewBlock::Tags(tags) => {
                    flow.text(&tags.join(", "), 10.5, Weight::Regular, TEXT_COLOR)
                }
            }
        }
        flow.gap(5.0);
    }

    flow.pages
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(color[0]) / 255.0,
        f32::from(color[1]) / 255.0,
        f32::from(color[2]) / 255.0,
        None,
    ))
}

/// Fail with the characters the faces for `class` cannot draw
fn check_glyphs(pages: &[PageLayout], class: FontClass) -> Result<(), ExportError> {
    let parse_err = |e| ExportError::Render(format!("unreadable font: {}", e));
    let regular = GlyphCoverage::parse(font_data(class, Weight::Regular)).map_err(parse_err)?;
    let bold = GlyphCoverage::parse(font_data(class, Weight::Bold)).map_err(parse_err)?;

    let mut missing = Vec::new();
    for op in pages.iter().flat_map(|page| &page.ops) {
        if let DrawOp::Text { weight, text, .. } = op {
            match weight {
                Weight::Regular => regular.collect_missing(text, &mut missing),
                Weight::Bold => bold.collect_missing(text, &mut missing),
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ExportError::MissingGlyphs(missing.into_iter().collect()))
    }
}

/// PDF output with embedded TrueType fonts
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    options: PageOptions,
}

impl PdfRenderer {
    pub fn new(options: PageOptions) -> Self {
        Self { options }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, preview: &PreviewModel, theme: &Theme) -> Result<Vec<u8>, ExportError> {
        let render_err = |e: printpdf::Error| ExportError::Render(e.to_string());
        let PageOptions {
            width_mm,
            height_mm,
            ..
        } = self.options;

        let class = theme.font_class();
        let pages = layout(preview, theme, self.options);
        check_glyphs(&pages, class)?;

        let (doc, first_page, first_layer) =
            PdfDocument::new("Resume", Mm(width_mm), Mm(height_mm), "Layer 1");
        let regular: IndirectFontRef = doc
            .add_external_font(font_data(class, Weight::Regular))
            .map_err(render_err)?;
        let bold: IndirectFontRef = doc
            .add_external_font(font_data(class, Weight::Bold))
            .map_err(render_err)?;
        for (index, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(width_mm), Mm(height_mm), "Layer 1")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for op in &page.ops {
                match op {
                    DrawOp::Text {
                        x,
                        y,
                        size,
                        weight,
                        color,
                        text,
                    } => {
                        let font = match weight {
                            Weight::Regular => &regular,
                            Weight::Bold => &bold,
                        };
                        layer.set_fill_color(rgb(*color));
                        layer.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font);
                    }
                    DrawOp::Rule {
                        x1,
                        x2,
                        y,
                        thickness,
                        color,
                    } => {
                        layer.set_outline_color(rgb(*color));
                        layer.set_outline_thickness(*thickness);
                        layer.add_line(Line {
                            points: vec![
                                (Point::new(Mm(*x1), Mm(*y)), false),
                                (Point::new(Mm(*x2), Mm(*y)), false),
                            ],
                            is_closed: false,
                        });
                    }
                }
            }
        }

        tracing::debug!("Rendered {} PDF page(s)", pages.len());
        doc.save_to_bytes().map_err(render_err)
    }
}

/// Replace characters that are not allowed in file names
fn sanitize_file_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn pdf_file_name(name: &str, date: NaiveDate) -> String {
    let name = sanitize_file_component(name);
    let name = if name.is_empty() { "user".to_string() } else { name };
    format!("resume_{}_{}.pdf", name, date.format("%Y-%m-%d"))
}

pub fn json_file_name(date: NaiveDate) -> String {
    format!("resume_{}.json", date.format("%Y-%m-%d"))
}

/// Configured directory, else the user's downloads, else the working directory
pub fn resolve_export_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    tracing::info!("Exported resume to: {}", path.display());
    Ok(path)
}

/// Write the valid sections as pretty JSON
pub fn export_json(document: &ResumeDocument, dir: &Path) -> Result<PathBuf, ExportError> {
    let export = format_for_export(&document.personal_info, &document.sections, &document.theme);
    let json = serde_json::to_string_pretty(&export)?;
    write_export(dir, &json_file_name(Utc::now().date_naive()), json.as_bytes())
}

/// Render the preview and write it as a PDF
pub fn export_pdf(
    renderer: &dyn DocumentRenderer,
    document: &ResumeDocument,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let preview = PreviewModel::build(document);
    let bytes = renderer.render(&preview, &document.theme)?;
    let file_name = pdf_file_name(&document.personal_info.name, Utc::now().date_naive());
    write_export(dir, &file_name, &bytes)
}

/// A PDF export running in the background
pub struct ExportJob {
    rx: oneshot::Receiver<Result<PathBuf, ExportError>>,
}

impl ExportJob {
    /// Start exporting a snapshot of `document`
    pub fn spawn_pdf(
        runtime: &Handle,
        renderer: Arc<dyn DocumentRenderer>,
        document: ResumeDocument,
        dir: PathBuf,
    ) -> Self {
        let (tx, rx) = oneshot::channel();
        runtime.spawn_blocking(move || {
            let result = export_pdf(renderer.as_ref(), &document, &dir);
            if tx.send(result).is_err() {
                tracing::debug!("Export finished after the editor stopped waiting");
            }
        });
        Self { rx }
    }

    /// `None` while still running
    pub fn poll(&mut self) -> Option<Result<PathBuf, ExportError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(ExportError::Interrupted)),
        }
    }
}
