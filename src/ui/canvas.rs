// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas.
//!
//! A minimal in-process drawing engine: it holds a scene, paints ellipse
//! and rectangle elements, and inserts an ellipse wherever the user
//! clicks. Every scene update notifies change listeners, which is how the
//! session core hears about edits.

use serde_json::{json, Value};
use sketchbook::{ChangeListener, DrawingEngine, Element, ListenerId, SceneSnapshot, SceneUpdate};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Diameter of inserted ellipses, in canvas units.
const ELLIPSE_SIZE: f64 = 50.0;

/// Scene state plus its change listeners.
#[derive(Default)]
pub struct SketchCanvas {
    scene: SceneSnapshot,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener: u64,
}

impl SketchCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ellipse whose top-left corner is at (x, y).
    pub fn insert_ellipse(&mut self, x: f64, y: f64) {
        let mut elements = self.scene_elements().to_vec();
        elements.push(json!({
            "type": "ellipse",
            "id": Uuid::new_v4().to_string(),
            "x": x,
            "y": y,
            "width": ELLIPSE_SIZE,
            "height": ELLIPSE_SIZE,
            "angle": 0,
            "strokeColor": "#000000",
            "backgroundColor": "#ffb3c1",
            "fillStyle": "solid",
            "strokeWidth": 2,
            "strokeStyle": "solid",
            "roughness": 1,
            "opacity": 100,
            "isDeleted": false,
            "groupIds": [],
            "boundElements": null,
            "locked": false,
            "updated": now_millis(),
            "roundness": null,
        }));
        self.update_scene(SceneUpdate::elements(elements));
        log::info!("Added ellipse at ({:.0}, {:.0}), total elements: {}", x, y, self.scene.elements.len());
    }

    fn notify(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.scene);
        }
    }
}

impl DrawingEngine for SketchCanvas {
    fn on_change(&mut self, listener: ChangeListener) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push((id, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn scene_elements(&self) -> &[Element] {
        &self.scene.elements
    }

    fn update_scene(&mut self, update: SceneUpdate) {
        if let Some(elements) = update.elements {
            self.scene.elements = elements;
        }
        if let Some(app_state) = update.app_state {
            self.scene.app_state = app_state;
        }
        if let Some(files) = update.files {
            self.scene.files = files;
        }
        self.notify();
    }
}

/// Display the canvas and handle clicks. Returns `true` if the scene changed.
pub fn show(ui: &mut egui::Ui, canvas: &mut SketchCanvas) -> bool {
    let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
    let origin = response.rect.min;

    painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(250));
    for element in canvas.scene_elements() {
        draw_element(&painter, element, origin);
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let local = pos - origin;
            let half = ELLIPSE_SIZE / 2.0;
            canvas.insert_ellipse(local.x as f64 - half, local.y as f64 - half);
            return true;
        }
    }
    false
}

/// Draw one element. Unknown types and deleted elements are skipped.
fn draw_element(painter: &egui::Painter, element: &Value, origin: egui::Pos2) {
    if element["isDeleted"].as_bool() == Some(true) {
        return;
    }
    let Some(rect) = element_rect(element, origin) else {
        return;
    };
    let fill = egui::Color32::from_rgb(255, 179, 193);
    let stroke = egui::Stroke::new(2.0, egui::Color32::BLACK);

    match element["type"].as_str() {
        Some("ellipse") => {
            let radius = rect.width().min(rect.height()) / 2.0;
            painter.circle(rect.center(), radius, fill, stroke);
        }
        Some("rectangle") => {
            painter.rect(rect, 0.0, fill, stroke);
        }
        _ => {}
    }
}

fn element_rect(element: &Value, origin: egui::Pos2) -> Option<egui::Rect> {
    let x = element["x"].as_f64()? as f32;
    let y = element["y"].as_f64()? as f32;
    let width = element["width"].as_f64()? as f32;
    let height = element["height"].as_f64()? as f32;
    Some(egui::Rect::from_min_size(
        origin + egui::vec2(x, y),
        egui::vec2(width, height),
    ))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
