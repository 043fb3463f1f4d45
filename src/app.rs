//! Main application state and UI coordination

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;

use crate::core::config::AppConfig;
use crate::core::drag::DragController;
use crate::core::editor::EditorAction;
use crate::core::export::{self, DocumentRenderer, ExportJob, PageOptions, PdfRenderer};
use crate::core::preview::PreviewModel;
use crate::core::section::SectionType;
use crate::core::session::EditSession;
use crate::core::storage::{FileStorage, MemoryStorage, Persistence, Storage};
use crate::ui::{
    personal_form::PersonalInfoForm,
    preview::PreviewPanel,
    section_form::{SectionCard, SkillDrafts},
    theme_panel::ThemePanel,
};

/// Main application state
pub struct ResumeEditorApp {
    /// The document being edited, autosaved on change
    session: EditSession<Box<dyn Storage>>,
    /// Runtime for timers and background export
    runtime: Handle,
    /// Application configuration
    config: AppConfig,
    /// PDF renderer
    renderer: Arc<dyn DocumentRenderer>,
    /// Running PDF export, if any
    export_job: Option<ExportJob>,
    /// Section drag state
    drag: DragController,
    /// In-progress skill list text
    skill_drafts: SkillDrafts,
    /// Whether the theme panel is visible
    show_theme_panel: bool,
}

impl ResumeEditorApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, runtime: Handle, config: AppConfig) -> Self {
        let persistence = Arc::new(Persistence::new(Self::open_storage(&config)));
        let session = EditSession::open(runtime.clone(), persistence, config.autosave.delay());

        Self {
            session,
            runtime,
            show_theme_panel: config.ui.show_theme_panel,
            config,
            renderer: Arc::new(PdfRenderer::new(PageOptions::default())),
            export_job: None,
            drag: DragController::new(),
            skill_drafts: SkillDrafts::default(),
        }
    }

    fn open_storage(config: &AppConfig) -> Box<dyn Storage> {
        match config.storage_dir() {
            Some(dir) => {
                tracing::info!("Storing resume data in: {}", dir.display());
                Box::new(FileStorage::new(dir))
            }
            None => {
                tracing::warn!("No data directory available; changes will not survive a restart");
                Box::new(MemoryStorage::new())
            }
        }
    }

    fn export_dir(&self) -> PathBuf {
        export::resolve_export_dir(self.config.export.dir.as_deref())
    }

    /// Start a PDF export of the current document
    pub fn export_pdf(&mut self) {
        if self.export_job.is_some() {
            return;
        }
        tracing::info!("Starting PDF export");
        self.export_job = Some(ExportJob::spawn_pdf(
            &self.runtime,
            Arc::clone(&self.renderer),
            self.session.document().clone(),
            self.export_dir(),
        ));
    }

    /// Write the JSON export
    pub fn export_json(&mut self) {
        if let Err(e) = export::export_json(self.session.document(), &self.export_dir()) {
            tracing::error!("JSON export failed: {}", e);
            Self::notify_error("Export failed", &e.to_string());
        }
    }

    /// Discard saved data and start over
    pub fn reset(&mut self) {
        self.session.reset();
        self.skill_drafts = SkillDrafts::default();
    }

    fn poll_export(&mut self, ctx: &egui::Context) {
        let Some(job) = self.export_job.as_mut() else {
            return;
        };
        match job.poll() {
            None => ctx.request_repaint_after(Duration::from_millis(100)),
            Some(Ok(path)) => {
                self.export_job = None;
                if self.config.export.open_after_export {
                    if let Err(e) = open::that(&path) {
                        tracing::error!("Failed to open {}: {}", path.display(), e);
                    }
                }
            }
            Some(Err(e)) => {
                self.export_job = None;
                tracing::error!("PDF export failed: {}", e);
                Self::notify_error("Export failed", &format!("Could not create the PDF: {}", e));
            }
        }
    }

    /// Blocking notice
    fn notify_error(title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn apply(&mut self, actions: Vec<EditorAction>) {
        if self.session.apply(actions) {
            self.skill_drafts.retain_sections(&self.session.document().sections);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<EditorAction>) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New resume").clicked() {
                        self.reset();
                        ui.close();
                    }
                    if ui.button("Save").clicked() {
                        self.session.save_now();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Export PDF").clicked() {
                        self.export_pdf();
                        ui.close();
                    }
                    if ui.button("Export JSON").clicked() {
                        self.export_json();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Sections", |ui| {
                    for kind in SectionType::ALL {
                        if ui.button(kind.label()).clicked() {
                            actions.push(EditorAction::AddSection(kind));
                            ui.close();
                        }
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.show_theme_panel, "Theme panel").clicked() {
                        ui.close();
                    }
                });
            });
        });
    }

    /// Title row with actions and the completeness bar
    fn render_toolbar(&mut self, ctx: &egui::Context, actions: &mut Vec<EditorAction>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Resume Editor");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.menu_button("\u{2795} Add section", |ui| {
                        for kind in SectionType::ALL {
                            if ui.button(kind.label()).clicked() {
                                actions.push(EditorAction::AddSection(kind));
                                ui.close();
                            }
                        }
                    });

                    let exporting = self.export_job.is_some();
                    if ui
                        .add_enabled(!exporting, egui::Button::new("\u{2B07} Download PDF"))
                        .clicked()
                    {
                        self.export_pdf();
                    }
                    if exporting {
                        ui.spinner();
                    }

                    if ui.button("{ } JSON").on_hover_text("Export as JSON").clicked() {
                        self.export_json();
                    }

                    if ui
                        .selectable_label(self.show_theme_panel, "\u{1F3A8} Theme")
                        .clicked()
                    {
                        self.show_theme_panel = !self.show_theme_panel;
                    }
                });
            });

            let completeness = self.session.document().completeness();
            ui.add(
                egui::ProgressBar::new(f32::from(completeness) / 100.0)
                    .text(format!("Resume completeness: {}%", completeness)),
            );
            ui.add_space(6.0);

            if self.show_theme_panel {
                ui.separator();
                ThemePanel::show(ui, &self.session.document().theme, actions);
                ui.add_space(6.0);
            }
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        let document = self.session.document();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "Sections complete: {} of {}",
                    document.valid_section_count(),
                    document.sections.len()
                ));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let status = if self.session.is_saving() {
                        "Saving\u{2026}"
                    } else {
                        "Autosave on"
                    };
                    ui.weak(status);
                });
            });
        });
    }
}

impl eframe::App for ResumeEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // Handle keyboard shortcuts
        let (save, export_pdf, toggle_theme, closing) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.key_pressed(egui::Key::P),
                i.modifiers.command && i.key_pressed(egui::Key::T),
                i.viewport().close_requested(),
            )
        });
        if save {
            self.session.save_now();
        }
        if export_pdf {
            self.export_pdf();
        }
        if toggle_theme {
            self.show_theme_panel = !self.show_theme_panel;
        }

        self.poll_export(ctx);

        self.render_menu_bar(ctx, &mut actions);
        self.render_toolbar(ctx, &mut actions);
        self.render_status_bar(ctx);

        // Render main content area: editor on the left, preview on the right
        egui::CentralPanel::default().show(ctx, |ui| {
            let document = self.session.document();
            let drag = &mut self.drag;
            let drafts = &mut self.skill_drafts;

            ui.columns(2, |cols| {
                egui::ScrollArea::vertical()
                    .id_salt("editor_scroll")
                    .show(&mut cols[0], |ui| {
                        PersonalInfoForm::show(ui, &document.personal_info, &mut actions);
                        ui.add_space(12.0);

                        for (index, section) in document.sections.iter().enumerate() {
                            SectionCard::show(ui, index, section, drag, drafts, &mut actions);
                            ui.add_space(8.0);
                        }

                        if document.sections.is_empty() {
                            ui.vertical_centered(|ui| {
                                ui.add_space(20.0);
                                ui.weak("No sections yet. Use \"Add section\" to start.");
                            });
                        }
                    });

                PreviewPanel::show(&mut cols[1], &PreviewModel::build(document), &document.theme);
            });

            // A release outside every card cancels the drag.
            if drag.is_dragging() && !ctx.input(|i| i.pointer.any_down()) {
                drag.end();
            }
        });

        self.apply(actions);

        if closing {
            self.config.ui.show_theme_panel = self.show_theme_panel;
            if let Err(e) = self.config.save() {
                tracing::error!("Failed to save config: {}", e);
            }
            self.session.save_now();
        }
    }
}
