// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sketchbook - several drawings side by side, autosaved locally.
//!
//! Desktop shell around the `sketchbook` session core.

mod app;
mod ui;

use anyhow::Result;
use app::SketchbookApp;
use sketchbook::Config;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("{}; using default configuration", e);
        Config::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Sketchbook"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Sketchbook",
        options,
        Box::new(move |_cc| Ok(Box::new(SketchbookApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
