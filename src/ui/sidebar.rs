// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project list panel.
//!
//! Lists every project with an editable name and Load / Delete buttons,
//! plus a button to start a new canvas.

use sketchbook::{Project, ProjectId};

/// Result of sidebar interaction.
pub enum SidebarAction {
    None,
    Create,
    Select(ProjectId),
    Delete(ProjectId),
    Rename(ProjectId, String),
}

/// Display the project list.
pub fn show(ui: &mut egui::Ui, projects: &[Project], active: Option<&ProjectId>) -> SidebarAction {
    let mut action = SidebarAction::None;

    if ui.button("+ New Canvas").clicked() {
        action = SidebarAction::Create;
    }
    ui.separator();

    if projects.is_empty() {
        ui.label(egui::RichText::new("No canvases yet").italics().weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for project in projects {
            let is_active = active == Some(project.id());
            ui.horizontal(|ui| {
                let mut name = project.name.clone();
                let edit = egui::TextEdit::singleline(&mut name).desired_width(110.0);
                if ui.add(edit).changed() {
                    action = SidebarAction::Rename(project.id().clone(), name);
                }
                if ui.selectable_label(is_active, "Load").clicked() {
                    action = SidebarAction::Select(project.id().clone());
                }
                if ui.button("🗑").on_hover_text("Delete canvas").clicked() {
                    action = SidebarAction::Delete(project.id().clone());
                }
            });
        }
    });

    action
}
