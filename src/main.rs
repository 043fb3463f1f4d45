//! Resume Editor - desktop resume builder
//!
//! Edit personal details and reorderable sections with a live preview.
//! Changes are autosaved locally and can be exported as PDF or JSON.

mod app;
mod core;
mod ui;

use anyhow::Context;
use app::ResumeEditorApp;
use crate::core::config::AppConfig;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Resume Editor...");

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });

    // Background runtime for autosave timers and PDF export
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("resume-editor-worker")
        .enable_time()
        .build()
        .context("Failed to start background runtime")?;
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Resume Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Resume Editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(ResumeEditorApp::new(cc, handle, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    tracing::info!("Resume Editor closed");
    Ok(())
}
