// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! The app owns the session controller and feeds it user actions from the
//! sidebar and menus. Canvas edits reach the controller through the
//! engine's change subscription and are autosaved at the start of each
//! frame.

use crate::ui::{
    canvas::{self, SketchCanvas},
    sidebar::{self, SidebarAction},
};
use sketchbook::io::serialization;
use sketchbook::{Config, FileStorage, SessionController, SessionError};
use std::path::PathBuf;

/// Main application state.
pub struct SketchbookApp {
    /// Projects, autosave, and the canvas engine
    controller: SessionController<FileStorage, SketchCanvas>,

    /// Last warning to show in the status bar
    status: Option<String>,
}

impl SketchbookApp {
    /// Create the app, restoring the persisted session.
    pub fn new(config: &Config) -> Self {
        log::info!("Storing projects in {}", config.storage_dir.display());
        let storage = FileStorage::new(&config.storage_dir, config.quota_bytes);
        let controller = SessionController::start(storage, SketchCanvas::new(), config);
        Self {
            controller,
            status: None,
        }
    }

    /// Surface a non-fatal session error in the status bar.
    fn report<T>(&mut self, result: Result<T, SessionError>) {
        if let Err(err) = result {
            log::warn!("{}", err);
            self.status = Some(err.to_string());
        }
    }

    /// Export the open canvas to a file.
    fn export_scene(&mut self, path: PathBuf) {
        let scene = self.controller.active_snapshot().cloned().unwrap_or_default();
        match serialization::export_scene(&scene, &path) {
            Ok(()) => log::info!("Exported canvas to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export canvas: {:#}", e);
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Import a canvas file as a new project.
    fn import_scene(&mut self, path: PathBuf) {
        match serialization::import_scene(&path) {
            Ok(scene) => {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned());
                log::info!("Imported {} elements from {}", scene.elements.len(), path.display());
                let result = self.controller.import_project(name, scene);
                self.report(result);
            }
            Err(e) => {
                log::error!("Failed to import canvas: {:#}", e);
                self.status = Some(format!("Import failed: {}", e));
            }
        }
    }

    /// Save queued canvas edits, keeping the last failure for the status bar.
    fn autosave(&mut self) {
        let report = self.controller.process_events();
        if let Some(err) = report.failures.last() {
            self.status = Some(err.to_string());
        } else if report.applied > 0 {
            self.status = None;
        }
    }

    fn export_file_name(&self, extension: &str) -> String {
        let stem = self
            .controller
            .session()
            .active_project()
            .map_or("canvas", |p| p.name.as_str());
        format!("{}.{}", stem, extension)
    }
}

impl eframe::App for SketchbookApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Edits made in the last frame have not been drained yet
        self.autosave();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Autosave edits delivered since the last frame
        self.autosave();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Canvas").clicked() {
                        let result = self.controller.create_project(None);
                        self.report(result);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Import Canvas...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Canvas", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.import_scene(path);
                        }
                        ui.close_menu();
                    }
                    let has_active = self.controller.active_project_id().is_some();
                    ui.add_enabled_ui(has_active, |ui| {
                        ui.menu_button("Export Canvas", |ui| {
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name(self.export_file_name("json"))
                                    .save_file()
                                {
                                    self.export_scene(path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name(self.export_file_name("yaml"))
                                    .save_file()
                                {
                                    self.export_scene(path);
                                }
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.controller.session().active_project() {
                    Some(project) => ui.label(format!(
                        "{} - {} elements",
                        project.name,
                        project.element_count()
                    )),
                    None => ui.label("No canvas open"),
                };
                if let Some(ref status) = self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(220, 140, 0), status);
                }
            });
        });

        // Project list (left side)
        let sidebar_action = egui::SidePanel::left("projects")
            .default_width(240.0)
            .show(ctx, |ui| {
                sidebar::show(
                    ui,
                    self.controller.projects(),
                    self.controller.active_project_id(),
                )
            })
            .inner;

        match sidebar_action {
            SidebarAction::Create => {
                let result = self.controller.create_project(None);
                self.report(result);
            }
            SidebarAction::Select(id) => {
                let result = self.controller.select_project(&id);
                self.report(result);
            }
            SidebarAction::Delete(id) => {
                let result = self.controller.delete_project(&id);
                self.report(result);
            }
            SidebarAction::Rename(id, name) => {
                let result = self.controller.rename_project(&id, name);
                self.report(result);
            }
            SidebarAction::None => {}
        }

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.controller.active_project_id().is_some() {
                if canvas::show(ui, self.controller.engine_mut()) {
                    ctx.request_repaint();
                }
            } else {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("Sketchbook")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new("Create a canvas to start drawing")
                                .color(egui::Color32::from_gray(180)),
                        );
                    });
                });
            }
        });
    }
}
